//! Rendering of query results for tool callers.

pub mod markdown;

pub use markdown::{
    format_frame, FormatOptions, DEFAULT_MAX_COLS, MAX_RESULT_ROWS, MIN_RESULT_ROWS,
    NO_DATA_SENTINEL, RENDER_ERROR_SENTINEL,
};
