//! Per-line decisions for adding or removing a toggle on a selection.
//!
//! A selection is toggled as a whole: if any line lacks the marker, the marker
//! is applied to the lines missing it and the others are left alone; only when
//! every line carries it is it removed everywhere.

use serde::{Deserialize, Serialize};
use tower_lsp::lsp_types::{Position, Range, TextEdit};

use crate::document::{split_lines, utf16_len};

use super::toggle::Toggle;

/// What to do with one selected line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Instruction {
    Apply,
    Remove,
    None,
}

/// Selected lines together with the instruction for each of them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Instructions {
    pub lines: Vec<String>,
    pub instructions: Vec<Instruction>,
}

/// Whether a toggle adds or strips its markers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleAction {
    Apply,
    Remove,
}

/// Text edits realizing a toggle over a run of lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToggleEdit {
    pub action: ToggleAction,
    pub edits: Vec<TextEdit>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct LineDecision {
    instruction: Instruction,
    /// The marker text found on the line, when it is to be removed.
    matched: Option<String>,
}

impl LineDecision {
    fn none() -> Self {
        Self {
            instruction: Instruction::None,
            matched: None,
        }
    }
}

/// Compute the toggle instructions for the selected text.
pub fn instructions(selected: &str, toggle: &Toggle) -> Instructions {
    let lines = split_lines(selected);
    let instructions = decide(&lines, toggle)
        .into_iter()
        .map(|decision| decision.instruction)
        .collect();

    Instructions {
        lines: lines.into_iter().map(str::to_string).collect(),
        instructions,
    }
}

/// Build the edits toggling `toggle` on `lines`, the first of which is
/// document line `first_line`.
///
/// Returns `None` when no line needs changing.
pub fn toggle_edits<S: AsRef<str>>(
    lines: &[S],
    first_line: u32,
    toggle: &Toggle,
) -> Option<ToggleEdit> {
    let decisions = decide(lines, toggle);

    let action = if decisions
        .iter()
        .any(|d| d.instruction == Instruction::Apply)
    {
        ToggleAction::Apply
    } else if decisions
        .iter()
        .any(|d| d.instruction == Instruction::Remove)
    {
        ToggleAction::Remove
    } else {
        return None;
    };

    let marker = toggle.primary_marker();
    let mut number = 1;
    let mut edits = Vec::new();

    for (offset, (line, decision)) in lines.iter().zip(&decisions).enumerate() {
        let line_no = first_line + offset as u32;
        let line_len = utf16_len(line.as_ref());

        match (decision.instruction, decision.matched.as_deref()) {
            (Instruction::Apply, _) => {
                let prefix = if toggle.increment {
                    format!("{number}{marker}")
                } else {
                    marker.to_string()
                };
                number += 1;

                edits.push(insert(line_no, 0, prefix));
                if toggle.check_line_end {
                    edits.push(insert(line_no, line_len, marker.to_string()));
                }
            }
            (Instruction::Remove, Some(matched)) => {
                let marker_len = utf16_len(matched);
                if toggle.check_line_end && line_len < marker_len * 2 {
                    // Opening and closing markers overlap.
                    edits.push(delete(line_no, 0, line_len));
                    continue;
                }

                edits.push(delete(line_no, 0, marker_len));
                if toggle.check_line_end {
                    edits.push(delete(line_no, line_len - marker_len, line_len));
                }
            }
            _ => {}
        }
    }

    Some(ToggleEdit { action, edits })
}

fn decide<S: AsRef<str>>(lines: &[S], toggle: &Toggle) -> Vec<LineDecision> {
    let multi_line = lines.len() > 1;
    let mut counter = 1usize;

    let mut decisions: Vec<LineDecision> = lines
        .iter()
        .map(|line| {
            let line = line.as_ref();
            if line.is_empty() && multi_line {
                return LineDecision::none();
            }

            let mut matched = None;
            for marker in &toggle.markers {
                let expected = if toggle.increment {
                    let numbered = format!("{counter}{marker}");
                    counter += 1;
                    numbered
                } else {
                    marker.clone()
                };

                // The first marker opening the line decides, even when it
                // fails to close it.
                if line.starts_with(&expected) {
                    if !toggle.check_line_end || line.ends_with(&expected) {
                        matched = Some(expected);
                    }
                    break;
                }
            }

            match matched {
                Some(matched) => LineDecision {
                    instruction: Instruction::Remove,
                    matched: Some(matched),
                },
                None => LineDecision {
                    instruction: Instruction::Apply,
                    matched: None,
                },
            }
        })
        .collect();

    if decisions.iter().any(|d| d.instruction == Instruction::Apply) {
        for decision in &mut decisions {
            if decision.instruction == Instruction::Remove {
                *decision = LineDecision::none();
            }
        }
    }

    decisions
}

fn insert(line: u32, character: u32, text: String) -> TextEdit {
    let at = Position::new(line, character);
    TextEdit::new(Range::new(at, at), text)
}

fn delete(line: u32, start: u32, end: u32) -> TextEdit {
    TextEdit::new(
        Range::new(Position::new(line, start), Position::new(line, end)),
        String::new(),
    )
}
