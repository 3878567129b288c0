//! Markdown notes language server.
//!
//! Locates the line under an editor cursor and toggles Markdown line
//! decorations (headings, quotes, lists, ...) over selections.

use std::sync::OnceLock;

use tower_lsp::jsonrpc::{Error, Result};
use tower_lsp::lsp_types::*;
use tower_lsp::{Client, LanguageServer, LspService};
use tracing::{debug, trace};

mod document;
mod error;
mod lsp;
mod markup;
pub(crate) mod settings;

pub use document::{
    cursor_line, line_at, line_bounds, line_end, line_index_at, line_start, split_lines,
    CursorLine, DocumentState, LineIndex,
};
pub use error::{LocateError, SettingsError};
pub use lsp::{
    toggle_actions, InstructionsParams, LineInfo, LineInfoParams, INSTRUCTIONS_METHOD,
    LINE_INFO_METHOD,
};
pub use markup::{
    builtin_toggles, instructions, toggle_edits, Instruction, Instructions, Toggle, ToggleAction,
    ToggleEdit,
};
pub use settings::{discover_settings, load_settings, parse_settings, toggles_from_settings};

use document::DocumentStore;

pub struct Backend {
    client: Client,
    documents: DocumentStore,
    toggles: OnceLock<Vec<Toggle>>,
}

impl Backend {
    pub(crate) fn new(client: Client) -> Self {
        Self {
            client,
            documents: DocumentStore::new(),
            toggles: OnceLock::new(),
        }
    }

    fn toggles(&self) -> &[Toggle] {
        self.toggles.get_or_init(builtin_toggles)
    }

    /// Store the new text of a document.
    fn on_document_change(&self, uri: Url, text: String, version: i32) {
        let state = self.documents.open(uri.clone(), text, version);
        debug!(%uri, version = state.version, lines = state.line_index.line_count(), "document updated");
    }

    /// `notes/lineInfo`: the line under a cursor of an open document.
    async fn line_info(&self, params: LineInfoParams) -> Result<LineInfo> {
        let uri = &params.text_document.uri;
        let Some(doc) = self.documents.get(uri) else {
            return Err(Error::invalid_params(format!("unknown document {}", uri)));
        };

        let info = lsp::line_info(&doc, &params)
            .map_err(|e| Error::invalid_params(e.to_string()))?;
        trace!(%uri, index = info.index, column = info.column, "line info");
        Ok(info)
    }

    /// `notes/instructions`: toggle instructions for arbitrary selected text.
    async fn instructions(&self, params: InstructionsParams) -> Result<Instructions> {
        Ok(lsp::instructions(&params))
    }
}

#[tower_lsp::async_trait]
impl LanguageServer for Backend {
    async fn initialize(&self, params: InitializeParams) -> Result<InitializeResult> {
        let workspace_root = params
            .workspace_folders
            .as_ref()
            .and_then(|folders| folders.first())
            .and_then(|f| f.uri.to_file_path().ok())
            .or_else(|| {
                #[allow(deprecated)]
                params.root_uri.as_ref()?.to_file_path().ok()
            });

        if let Some(root) = workspace_root {
            let (settings, settings_dir) = settings::discover_settings(&root);
            let toggles = settings::toggles_from_settings(&settings);
            debug!(
                root = %root.display(),
                settings_dir = %settings_dir.display(),
                toggles = toggles.len(),
                "workspace configured"
            );
            let _ = self.toggles.set(toggles);
        }

        Ok(InitializeResult {
            capabilities: ServerCapabilities {
                text_document_sync: Some(TextDocumentSyncCapability::Kind(
                    TextDocumentSyncKind::FULL,
                )),
                code_action_provider: Some(CodeActionProviderCapability::Options(
                    CodeActionOptions {
                        code_action_kinds: Some(vec![CodeActionKind::REFACTOR_REWRITE]),
                        resolve_provider: Some(false),
                        ..Default::default()
                    },
                )),
                ..Default::default()
            },
            ..Default::default()
        })
    }

    async fn initialized(&self, _: InitializedParams) {
        self.client
            .log_message(MessageType::INFO, "notes language server initialized")
            .await;
    }

    async fn shutdown(&self) -> Result<()> {
        Ok(())
    }

    async fn did_open(&self, params: DidOpenTextDocumentParams) {
        self.on_document_change(
            params.text_document.uri,
            params.text_document.text,
            params.text_document.version,
        );
    }

    async fn did_change(&self, params: DidChangeTextDocumentParams) {
        // We use FULL sync, so there's exactly one change with the full text
        if let Some(change) = params.content_changes.into_iter().next() {
            self.on_document_change(
                params.text_document.uri,
                change.text,
                params.text_document.version,
            );
        }
    }

    async fn did_close(&self, params: DidCloseTextDocumentParams) {
        debug!(uri = %params.text_document.uri, "document closed");
        self.documents.close(&params.text_document.uri);
    }

    async fn code_action(&self, params: CodeActionParams) -> Result<Option<CodeActionResponse>> {
        let uri = &params.text_document.uri;
        let Some(doc) = self.documents.get(uri) else {
            debug!(%uri, "code action for unknown document");
            return Ok(None);
        };

        let actions = lsp::toggle_actions(uri, &doc.line_index, params.range, self.toggles());
        if actions.is_empty() {
            return Ok(None);
        }
        Ok(Some(actions))
    }
}

pub fn create_service() -> (LspService<Backend>, tower_lsp::ClientSocket) {
    LspService::build(Backend::new)
        .custom_method(LINE_INFO_METHOD, Backend::line_info)
        .custom_method(INSTRUCTIONS_METHOD, Backend::instructions)
        .finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_can_be_created() {
        let (_service, _socket) = create_service();
    }

    #[test]
    fn uninitialized_backend_offers_builtin_toggles() {
        let (service, _socket) = create_service();
        assert_eq!(service.inner().toggles(), builtin_toggles().as_slice());
    }
}
