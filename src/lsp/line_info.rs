//! Custom requests exposing the line locator and toggle instructions.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tower_lsp::lsp_types::{Position, Range, TextDocumentIdentifier};

use crate::document::{byte_to_char, cursor_line, DocumentState};
use crate::error::LocateError;
use crate::markup::{self, Instructions, Toggle};

/// Method name of the line info request.
pub const LINE_INFO_METHOD: &str = "notes/lineInfo";

/// Method name of the toggle instructions request.
pub const INSTRUCTIONS_METHOD: &str = "notes/instructions";

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineInfoParams {
    pub text_document: TextDocumentIdentifier,
    /// Cursor as a character offset into the document.
    #[serde(default)]
    pub offset: Option<usize>,
    /// Cursor as an LSP position; used when `offset` is absent.
    #[serde(default)]
    pub position: Option<Position>,
}

/// The line under a cursor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineInfo {
    pub index: usize,
    pub line: String,
    pub column: usize,
    pub start: usize,
    pub end: usize,
    pub range: Range,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstructionsParams {
    pub text: String,
    pub markers: Vec<String>,
    #[serde(default)]
    pub check_line_end: bool,
    #[serde(default)]
    pub apply_increment: bool,
}

/// Why a line info request could not be answered.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LineInfoError {
    #[error("expected an offset or a position inside the document")]
    NoCursor,

    #[error(transparent)]
    Locate(#[from] LocateError),
}

/// Locate the line under the cursor described by `params`.
pub fn line_info(state: &DocumentState, params: &LineInfoParams) -> Result<LineInfo, LineInfoError> {
    let source = state.source();
    let offset = match (params.offset, params.position) {
        (Some(offset), _) => offset,
        (None, Some(position)) => {
            let byte = state
                .line_index
                .position_to_offset(position)
                .ok_or(LineInfoError::NoCursor)?;
            byte_to_char(source, byte)
        }
        (None, None) => return Err(LineInfoError::NoCursor),
    };

    let found = cursor_line(source, offset)?;
    let range = state
        .line_index
        .char_span_to_range(&(found.start..found.end))
        .ok_or(LocateError::OutOfRange {
            offset,
            len: source.chars().count(),
        })?;

    Ok(LineInfo {
        index: found.index,
        line: found.line.to_string(),
        column: found.column,
        start: found.start,
        end: found.end,
        range,
    })
}

/// Compute toggle instructions for an ad-hoc marker set.
pub fn instructions(params: &InstructionsParams) -> Instructions {
    let toggle = Toggle {
        name: String::new(),
        markers: params.markers.clone(),
        check_line_end: params.check_line_end,
        increment: params.apply_increment,
    };
    markup::instructions(&params.text, &toggle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tower_lsp::lsp_types::Url;

    fn params(offset: Option<usize>, position: Option<Position>) -> LineInfoParams {
        LineInfoParams {
            text_document: TextDocumentIdentifier::new(Url::parse("file:///n.md").unwrap()),
            offset,
            position,
        }
    }

    #[test]
    fn by_offset() {
        let state = DocumentState::new("abc\ndef\nghi".to_string(), 1);
        let info = line_info(&state, &params(Some(5), None)).unwrap();
        assert_eq!(info.index, 1);
        assert_eq!(info.line, "def");
        assert_eq!(info.column, 1);
        assert_eq!(info.range, Range::new(Position::new(1, 0), Position::new(1, 3)));
    }

    #[test]
    fn by_position_with_wide_chars() {
        let state = DocumentState::new("😀\nab😀cd".to_string(), 1);
        let info = line_info(&state, &params(None, Some(Position::new(1, 4)))).unwrap();
        assert_eq!(info.line, "ab😀cd");
        assert_eq!(info.column, 3);
        assert_eq!((info.start, info.end), (2, 7));
        assert_eq!(info.range.end, Position::new(1, 6));
    }

    #[test]
    fn missing_cursor() {
        let state = DocumentState::new("abc".to_string(), 1);
        assert_eq!(
            line_info(&state, &params(None, None)),
            Err(LineInfoError::NoCursor)
        );
        assert_eq!(
            line_info(&state, &params(None, Some(Position::new(3, 0)))),
            Err(LineInfoError::NoCursor)
        );
    }

    #[test]
    fn offset_out_of_range() {
        let state = DocumentState::new("abc".to_string(), 1);
        let err = line_info(&state, &params(Some(9), None)).unwrap_err();
        assert_eq!(
            err.to_string(),
            "cursor offset 9 is out of range for text of length 3"
        );
    }

    #[test]
    fn instructions_from_params() {
        let params: InstructionsParams = serde_json::from_value(serde_json::json!({
            "text": "1. a\nb",
            "markers": [". "],
            "applyIncrement": true,
        }))
        .unwrap();
        let result = instructions(&params);
        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            serde_json::json!({
                "lines": ["1. a", "b"],
                "instructions": ["none", "apply"],
            })
        );
    }
}
