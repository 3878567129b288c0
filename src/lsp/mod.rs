//! LSP protocol feature implementations.
//!
//! This module provides:
//! - custom requests for the line under a cursor and toggle instructions
//! - code actions toggling Markdown line decorations

mod code_action;
mod line_info;

pub use code_action::toggle_actions;
pub use line_info::{
    instructions, line_info, InstructionsParams, LineInfo, LineInfoParams,
    INSTRUCTIONS_METHOD, LINE_INFO_METHOD,
};
