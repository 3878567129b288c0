//! Document state management and text utilities.
//!
//! This module provides:
//! - the line locator functions (`split_lines`, `line_at`, `line_start`, ...)
//! - `LineIndex` for byte offset <-> LSP position conversion
//! - `DocumentState` and `DocumentStore` for document lifecycle management

mod state;
mod text;

pub use state::{DocumentState, DocumentStore};
pub use text::{
    cursor_line, line_at, line_bounds, line_end, line_index_at, line_start, split_lines,
    CursorLine, LineIndex,
};
pub(crate) use text::{byte_to_char, utf16_len};
