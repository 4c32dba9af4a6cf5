//! Page state machine driving the client.
//!
//! ```text
//!            open_create                 view(i) / edit(i)
//!   Create <───────────── List ──────────────────────────> View { i, ReadOnly | Edit }
//!     │  submit / back ──>  │  <── back_to_list / save_edit ──┘        toggle_edit ⟲
//!                           │
//!           enter_delete_select / leave_delete_select / confirm_delete
//!                           ⟲ (List with a selection set)
//! ```
//!
//! The controller owns the [`ClientState`] and the page-local input buffers. Renderers read it
//! through accessors and call one action per user gesture; every action that talks to the
//! service takes `&mut self`, so a second call cannot start while one is in flight.

use crate::api::DocumentsApi;
use crate::state::ClientState;
use crate::{ClientError, ClientResult};
use quill_types::{Document, DocumentFields, DocumentId, Field};
use std::collections::BTreeSet;

/// Sub-mode of the view page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewMode {
    ReadOnly,
    Edit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Page {
    /// `selection` is `Some` while the list is in delete-select mode.
    List { selection: Option<BTreeSet<usize>> },
    Create,
    View { index: usize, mode: ViewMode },
}

impl Page {
    pub fn name(&self) -> &'static str {
        match self {
            Page::List { selection: None } => "list",
            Page::List { selection: Some(_) } => "delete-select",
            Page::Create => "create",
            Page::View {
                mode: ViewMode::ReadOnly,
                ..
            } => "view",
            Page::View {
                mode: ViewMode::Edit,
                ..
            } => "edit",
        }
    }

    fn plain_list() -> Self {
        Page::List { selection: None }
    }
}

/// A document rendered for download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Export {
    pub file_name: String,
    pub contents: String,
}

pub struct ViewController<A> {
    api: A,
    state: ClientState,
    page: Page,
    create_inputs: DocumentFields,
    edit_inputs: DocumentFields,
    search: String,
}

impl<A: DocumentsApi> ViewController<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            state: ClientState::new(),
            page: Page::plain_list(),
            create_inputs: DocumentFields::default(),
            edit_inputs: DocumentFields::default(),
            search: String::new(),
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn state(&self) -> &ClientState {
        &self.state
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    pub fn create_inputs(&self) -> &DocumentFields {
        &self.create_inputs
    }

    pub fn edit_inputs(&self) -> &DocumentFields {
        &self.edit_inputs
    }

    pub fn search_term(&self) -> &str {
        &self.search
    }

    /// Checked positions while in delete-select mode.
    pub fn selection(&self) -> Option<&BTreeSet<usize>> {
        match &self.page {
            Page::List { selection } => selection.as_ref(),
            _ => None,
        }
    }

    /// The document shown on the view page.
    pub fn current_document(&self) -> Option<&Document> {
        match self.page {
            Page::View { index, .. } => self.state.documents().get(index),
            _ => None,
        }
    }

    /// Documents matching the search term, with their positions.
    pub fn visible_documents(&self) -> Vec<(usize, &Document)> {
        self.state.search(&self.search)
    }

    pub fn set_search(&mut self, term: impl Into<String>) {
        self.search = term.into();
    }

    fn invalid(&self, action: &'static str) -> ClientError {
        ClientError::InvalidAction {
            action,
            page: self.page.name(),
        }
    }

    fn show_list(&mut self) {
        self.page = Page::plain_list();
    }

    /// Initial load: show the list and fetch documents.
    ///
    /// # Errors
    /// Returns the refresh error; the (empty) list is still shown.
    pub async fn start(&mut self) -> ClientResult<()> {
        self.show_list();
        self.refresh().await
    }

    /// Re-fetch documents. Allowed on any page; the current page is kept.
    ///
    /// The viewed document and the checked documents are followed by id to their new
    /// positions. A viewed document that is gone sends the page back to the list; checked
    /// documents that are gone are unchecked. In read-only view the edit inputs are reloaded
    /// from the fetched document; in edit mode the typed edits are kept.
    ///
    /// # Errors
    /// Returns the network or service error; documents and page stay as they were.
    pub async fn refresh(&mut self) -> ClientResult<()> {
        let viewed = self.current_document().map(|doc| doc.id.clone());
        let checked: Option<Vec<DocumentId>> = self.selection().map(|selection| {
            selection
                .iter()
                .filter_map(|&index| self.state.documents().get(index))
                .map(|doc| doc.id.clone())
                .collect()
        });

        self.state.refresh(&self.api).await?;

        if let Page::View { mode, .. } = self.page {
            match viewed.and_then(|id| self.state.position_of(&id)) {
                Some(index) => {
                    if mode == ViewMode::ReadOnly {
                        self.edit_inputs = self.state.document(index)?.fields();
                    }
                    self.page = Page::View { index, mode };
                }
                None => {
                    self.state.set_edit_index(None);
                    self.show_list();
                }
            }
        }
        if let Some(ids) = checked {
            let selection = ids
                .iter()
                .filter_map(|id| self.state.position_of(id))
                .collect();
            self.page = Page::List {
                selection: Some(selection),
            };
        }
        Ok(())
    }

    /// `List → Create`, pre-filling inputs from the pending draft.
    pub fn open_create(&mut self) -> ClientResult<()> {
        if !matches!(self.page, Page::List { .. }) {
            return Err(self.invalid("open create"));
        }
        self.create_inputs = self.state.draft().cloned().unwrap_or_default();
        self.page = Page::Create;
        Ok(())
    }

    pub fn set_create_input(&mut self, field: Field, value: impl Into<String>) -> ClientResult<()> {
        if self.page != Page::Create {
            return Err(self.invalid("edit create input"));
        }
        self.create_inputs.set(field, value);
        Ok(())
    }

    /// True if leaving the create page now would lose typed text.
    pub fn has_unsaved_input(&self) -> bool {
        self.page == Page::Create && self.create_inputs.has_input()
    }

    /// Leave the create page.
    ///
    /// With typed input, `save_draft` keeps it as the draft for the next visit; otherwise the
    /// draft is discarded. With no input the draft is left alone.
    pub fn back_from_create(&mut self, save_draft: bool) -> ClientResult<()> {
        if self.page != Page::Create {
            return Err(self.invalid("back"));
        }
        if self.create_inputs.has_input() {
            let inputs = std::mem::take(&mut self.create_inputs);
            if save_draft {
                self.state.set_draft(inputs);
            } else {
                self.state.clear_draft();
            }
        }
        self.create_inputs = DocumentFields::default();
        self.show_list();
        Ok(())
    }

    /// Create a document from the inputs; on success clear them and return to the list.
    ///
    /// # Errors
    /// Validation, network and service errors keep the page and the inputs.
    pub async fn submit(&mut self) -> ClientResult<Document> {
        if self.page != Page::Create {
            return Err(self.invalid("submit"));
        }
        let created = self
            .state
            .submit(&self.api, self.create_inputs.clone())
            .await?;
        self.create_inputs = DocumentFields::default();
        self.show_list();
        Ok(created)
    }

    /// Show document `index` read-only, snapshotting it into the edit inputs.
    pub fn view(&mut self, index: usize) -> ClientResult<()> {
        if !matches!(self.page, Page::List { .. } | Page::View { .. }) {
            return Err(self.invalid("view"));
        }
        self.edit_inputs = self.state.document(index)?.fields();
        self.state.set_edit_index(Some(index));
        self.page = Page::View {
            index,
            mode: ViewMode::ReadOnly,
        };
        Ok(())
    }

    /// Show document `index` directly in edit mode.
    pub fn edit(&mut self, index: usize) -> ClientResult<()> {
        self.view(index)?;
        self.toggle_edit()
    }

    /// Switch between read-only and edit mode. Leaving edit mode discards unsaved edits.
    pub fn toggle_edit(&mut self) -> ClientResult<()> {
        let Page::View { index, mode } = self.page else {
            return Err(self.invalid("toggle edit"));
        };
        let mode = match mode {
            ViewMode::ReadOnly => ViewMode::Edit,
            ViewMode::Edit => {
                self.edit_inputs = self.state.document(index)?.fields();
                ViewMode::ReadOnly
            }
        };
        self.page = Page::View { index, mode };
        Ok(())
    }

    pub fn set_edit_input(&mut self, field: Field, value: impl Into<String>) -> ClientResult<()> {
        if !matches!(
            self.page,
            Page::View {
                mode: ViewMode::Edit,
                ..
            }
        ) {
            return Err(self.invalid("edit field"));
        }
        self.edit_inputs.set(field, value);
        Ok(())
    }

    /// Save the edit inputs and return to the list.
    ///
    /// # Errors
    /// Validation, network and service errors keep the page and the inputs.
    pub async fn save_edit(&mut self) -> ClientResult<Document> {
        let Page::View {
            index,
            mode: ViewMode::Edit,
        } = self.page
        else {
            return Err(self.invalid("save"));
        };
        let saved = self
            .state
            .save_edit(&self.api, index, self.edit_inputs.clone())
            .await?
            .clone();
        self.state.set_edit_index(None);
        self.show_list();
        Ok(saved)
    }

    /// Leave the view page without saving.
    pub fn back_to_list(&mut self) -> ClientResult<()> {
        match self.page {
            Page::View { .. } => {
                self.state.set_edit_index(None);
                self.show_list();
                Ok(())
            }
            Page::List { .. } => {
                self.show_list();
                Ok(())
            }
            Page::Create => Err(self.invalid("back to list")),
        }
    }

    pub fn enter_delete_select(&mut self) -> ClientResult<()> {
        if let Page::List { selection } = &mut self.page {
            selection.get_or_insert_with(BTreeSet::new);
            return Ok(());
        }
        Err(self.invalid("select for delete"))
    }

    /// Check or uncheck document `index`; returns whether it is now checked.
    pub fn toggle_selection(&mut self, index: usize) -> ClientResult<bool> {
        if let Page::List {
            selection: Some(selection),
        } = &mut self.page
        {
            self.state.document(index)?;
            if selection.remove(&index) {
                return Ok(false);
            }
            selection.insert(index);
            return Ok(true);
        }
        Err(self.invalid("toggle selection"))
    }

    /// Leave delete-select mode, clearing the selection.
    pub fn leave_delete_select(&mut self) -> ClientResult<()> {
        match self.page {
            Page::List { .. } => {
                self.show_list();
                Ok(())
            }
            _ => Err(self.invalid("cancel delete")),
        }
    }

    /// Delete the checked documents, then return to the plain list whatever the outcome.
    ///
    /// # Errors
    /// `ClientError::NothingSelected` keeps delete-select mode; any other error comes from
    /// [`ClientState::delete_selected`] after the page has been reset.
    pub async fn confirm_delete(&mut self) -> ClientResult<usize> {
        let selection = match &self.page {
            Page::List {
                selection: Some(selection),
            } => selection.clone(),
            _ => return Err(self.invalid("delete")),
        };
        if selection.is_empty() {
            return Err(ClientError::NothingSelected);
        }
        let result = self.state.delete_selected(&self.api, &selection).await;
        self.show_list();
        result
    }

    /// Plain-text rendering of the viewed document for download.
    pub fn export_current(&self) -> ClientResult<Export> {
        let doc = self
            .current_document()
            .ok_or_else(|| self.invalid("download"))?;
        Ok(Export {
            file_name: doc.export_file_name(),
            contents: doc.to_plain_text(),
        })
    }
}
