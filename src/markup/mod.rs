//! Markdown line toggles (headings, quotes, lists, ...) for selections.

mod instructions;
mod toggle;

pub use instructions::{
    instructions, toggle_edits, Instruction, Instructions, ToggleAction, ToggleEdit,
};
pub use toggle::{builtin_toggles, Toggle};
