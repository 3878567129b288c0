//! Code actions toggling Markdown line decorations on the selected lines.

use std::collections::HashMap;

use tower_lsp::lsp_types::{
    CodeAction, CodeActionKind, CodeActionOrCommand, Range, Url, WorkspaceEdit,
};

use crate::document::LineIndex;
use crate::markup::{toggle_edits, Toggle, ToggleAction};

/// Document lines covered by `range`.
///
/// A selection ending at column 0 of a later line does not include that line.
fn selected_lines(line_index: &LineIndex, range: Range) -> std::ops::RangeInclusive<u32> {
    let last_line = line_index.line_count().saturating_sub(1) as u32;
    let start = range.start.line.min(last_line);
    let mut end = range.end.line.min(last_line);
    if range.end.line > range.start.line && range.end.character == 0 && end > start {
        end -= 1;
    }
    start..=end
}

/// Build one code action per toggle that would change the selection.
pub fn toggle_actions(
    uri: &Url,
    line_index: &LineIndex,
    range: Range,
    toggles: &[Toggle],
) -> Vec<CodeActionOrCommand> {
    let lines_range = selected_lines(line_index, range);
    let first_line = *lines_range.start();
    let lines: Vec<&str> = lines_range
        .filter_map(|line| line_index.line(line as usize))
        .collect();

    toggles
        .iter()
        .filter_map(|toggle| {
            let edit = toggle_edits(&lines, first_line, toggle)?;
            let verb = match edit.action {
                ToggleAction::Apply => "Apply",
                ToggleAction::Remove => "Remove",
            };

            Some(CodeActionOrCommand::CodeAction(CodeAction {
                title: format!("{} {}", verb, toggle.name.to_lowercase()),
                kind: Some(CodeActionKind::REFACTOR_REWRITE),
                edit: Some(WorkspaceEdit {
                    changes: Some(HashMap::from([(uri.clone(), edit.edits)])),
                    ..Default::default()
                }),
                ..Default::default()
            }))
        })
        .collect()
}
