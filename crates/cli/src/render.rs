//! Plain-text rendering of controller pages.

use quill_client::{Document, DocumentFields, Page, ViewController, ViewMode};
use std::collections::BTreeSet;
use std::fmt::Write;

/// Positions are shown 1-based.
pub fn position_label(index: usize) -> String {
    format!("#{}", index + 1)
}

pub fn render_list(
    documents: &[(usize, &Document)],
    selection: Option<&BTreeSet<usize>>,
    search: &str,
) -> String {
    let mut out = String::new();
    if !search.is_empty() {
        let _ = writeln!(out, "Search: {search}");
    }
    if documents.is_empty() {
        out.push_str("No documents found.\n");
    }
    for (index, doc) in documents {
        let checkbox = match selection {
            Some(selected) if selected.contains(index) => "[x] ",
            Some(_) => "[ ] ",
            None => "",
        };
        let _ = writeln!(
            out,
            "{checkbox}{:>4}  {}  (by {})",
            position_label(*index),
            doc.topic,
            doc.writer
        );
    }
    if selection.is_some() {
        out.push_str("Delete mode: `check N` to select, `delete` to confirm, `cancel` to leave.\n");
    }
    out
}

pub fn render_create(inputs: &DocumentFields) -> String {
    format!(
        "New document\n  topic:   {}\n  writer:  {}\n  content: {}\n",
        inputs.topic, inputs.writer, inputs.content
    )
}

pub fn render_document(doc: &Document, mode: ViewMode, edit_inputs: &DocumentFields) -> String {
    match mode {
        ViewMode::ReadOnly => format!(
            "{}\nBy {}\n\n{}\n",
            doc.topic, doc.writer, doc.content
        ),
        ViewMode::Edit => format!(
            "Editing {}\n  topic:   {}\n  writer:  {}\n  content: {}\n",
            doc.id, edit_inputs.topic, edit_inputs.writer, edit_inputs.content
        ),
    }
}

/// Render whatever page the controller is on.
pub fn render<A: quill_client::DocumentsApi>(controller: &ViewController<A>) -> String {
    match controller.page() {
        Page::List { selection } => render_list(
            &controller.visible_documents(),
            selection.as_ref(),
            controller.search_term(),
        ),
        Page::Create => render_create(controller.create_inputs()),
        Page::View { mode, .. } => match controller.current_document() {
            Some(doc) => render_document(doc, *mode, controller.edit_inputs()),
            None => "Document no longer available.\n".to_string(),
        },
    }
}
