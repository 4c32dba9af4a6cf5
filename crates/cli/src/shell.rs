//! Interactive session driving a [`ViewController`] from stdin.

use crate::render::render;
use quill_client::{DocumentsApi, Field, Page, ViewController};
use std::io::{self, BufRead, Write};
use std::path::{Component, Path, PathBuf};

const HELP: &str = "\
Commands:
  list                      show the document list
  search [TEXT]             filter the list (no text clears the filter)
  refresh                   reload documents from the server
  new                       open the create page (restores a saved draft)
  set <field> <text...>     set topic, writer or content on the create or edit page
  submit                    create the document from the create page
  back [save|discard]       leave the current page
  view N                    open document N read-only
  edit [N]                  open document N for editing, or toggle edit on the open document
  save                      save the edited document
  select                    enter delete mode
  check N                   toggle document N for deletion
  delete                    delete the checked documents
  cancel                    leave delete mode
  download [DIR]            write the open document to DIR as plain text
  help                      show this help
  quit                      exit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    List,
    Search(String),
    Refresh,
    New,
    Set(Field, String),
    Submit,
    Back(Option<bool>),
    View(usize),
    Edit(Option<usize>),
    Save,
    Select,
    Check(usize),
    Delete,
    Cancel,
    Download(Option<PathBuf>),
    Help,
    Quit,
}

/// Parse a user-facing 1-based position into a list index.
pub fn parse_position(raw: &str) -> Result<usize, String> {
    raw.parse::<usize>()
        .ok()
        .and_then(|n| n.checked_sub(1))
        .ok_or_else(|| format!("'{raw}' is not a document number"))
}

pub fn parse_command(line: &str) -> Result<ShellCommand, String> {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let command = match word {
        "list" | "ls" => ShellCommand::List,
        "search" => ShellCommand::Search(rest.to_string()),
        "refresh" => ShellCommand::Refresh,
        "new" => ShellCommand::New,
        "set" => {
            let (field, value) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
            let field = field.parse::<Field>().map_err(|e| e.to_string())?;
            ShellCommand::Set(field, value.trim_start().to_string())
        }
        "submit" => ShellCommand::Submit,
        "back" => match rest {
            "" => ShellCommand::Back(None),
            "save" => ShellCommand::Back(Some(true)),
            "discard" => ShellCommand::Back(Some(false)),
            other => return Err(format!("back takes 'save' or 'discard', not '{other}'")),
        },
        "view" => ShellCommand::View(parse_position(rest)?),
        "edit" if rest.is_empty() => ShellCommand::Edit(None),
        "edit" => ShellCommand::Edit(Some(parse_position(rest)?)),
        "save" => ShellCommand::Save,
        "select" => ShellCommand::Select,
        "check" => ShellCommand::Check(parse_position(rest)?),
        "delete" => ShellCommand::Delete,
        "cancel" => ShellCommand::Cancel,
        "download" if rest.is_empty() => ShellCommand::Download(None),
        "download" => ShellCommand::Download(Some(PathBuf::from(rest))),
        "help" | "?" => ShellCommand::Help,
        "quit" | "exit" => ShellCommand::Quit,
        "" => return Err("type `help` for a list of commands".into()),
        other => return Err(format!("unknown command '{other}'")),
    };
    Ok(command)
}

/// Write an exported document directly inside `dir`, returning the file path.
///
/// # Errors
/// Returns `InvalidInput` if `file_name` is not a single plain file name, or the write error.
pub fn write_export(dir: &Path, file_name: &str, contents: &str) -> io::Result<PathBuf> {
    let mut components = Path::new(file_name).components();
    let single = matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    );
    let path = dir.join(file_name);
    if !single || path.parent() != Some(dir) {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("refusing to write {file_name:?} outside {}", dir.display()),
        ));
    }
    std::fs::write(&path, contents)?;
    Ok(path)
}

/// End of input counts as "no".
fn ask_yes_no<R: BufRead, W: Write>(input: &mut R, out: &mut W, question: &str) -> io::Result<bool> {
    write!(out, "{question} [y/N] ")?;
    out.flush()?;
    let mut answer = String::new();
    input.read_line(&mut answer)?;
    Ok(matches!(answer.trim(), "y" | "Y" | "yes"))
}

/// Apply one command. The outer error is a terminal failure; the inner one is a notice for
/// the user.
async fn apply<A, R, W>(
    controller: &mut ViewController<A>,
    command: ShellCommand,
    input: &mut R,
    out: &mut W,
) -> io::Result<Result<(), String>>
where
    A: DocumentsApi,
    R: BufRead,
    W: Write,
{
    let err = |e: quill_client::ClientError| e.to_string();
    let outcome = match command {
        ShellCommand::List => match controller.page() {
            Page::List { .. } => Ok(()),
            Page::View { .. } => controller.back_to_list().map_err(err),
            Page::Create => Err("use `back` to leave the create page".into()),
        },
        ShellCommand::Search(term) => {
            controller.set_search(term);
            Ok(())
        }
        ShellCommand::Refresh => controller.refresh().await.map_err(err),
        ShellCommand::New => controller.open_create().map_err(err),
        ShellCommand::Set(field, value) => match controller.page() {
            Page::Create => controller.set_create_input(field, value).map_err(err),
            _ => controller.set_edit_input(field, value).map_err(err),
        },
        ShellCommand::Submit => controller.submit().await.map(|_| ()).map_err(err),
        ShellCommand::Back(save) => match controller.page() {
            Page::Create => {
                let save = match save {
                    Some(save) => save,
                    None if controller.has_unsaved_input() => {
                        ask_yes_no(input, out, "Save the unsaved input as a draft?")?
                    }
                    None => false,
                };
                controller.back_from_create(save).map_err(err)
            }
            Page::List { selection: Some(_) } => controller.leave_delete_select().map_err(err),
            _ => controller.back_to_list().map_err(err),
        },
        ShellCommand::View(index) => controller.view(index).map_err(err),
        ShellCommand::Edit(Some(index)) => controller.edit(index).map_err(err),
        ShellCommand::Edit(None) => controller.toggle_edit().map_err(err),
        ShellCommand::Save => controller.save_edit().await.map(|_| ()).map_err(err),
        ShellCommand::Select => controller.enter_delete_select().map_err(err),
        ShellCommand::Check(index) => controller.toggle_selection(index).map(|_| ()).map_err(err),
        ShellCommand::Delete => match controller.confirm_delete().await {
            Ok(deleted) => {
                writeln!(out, "Deleted {deleted} document(s).")?;
                Ok(())
            }
            Err(e) => Err(err(e)),
        },
        ShellCommand::Cancel => controller.leave_delete_select().map_err(err),
        ShellCommand::Download(dir) => match controller.export_current() {
            Ok(export) => {
                let dir = dir.unwrap_or_else(|| PathBuf::from("."));
                match write_export(&dir, &export.file_name, &export.contents) {
                    Ok(path) => {
                        writeln!(out, "Saved {}", path.display())?;
                        Ok(())
                    }
                    Err(e) => Err(format!("failed to write into {}: {e}", dir.display())),
                }
            }
            Err(e) => Err(err(e)),
        },
        ShellCommand::Help => {
            writeln!(out, "{HELP}")?;
            Ok(())
        }
        ShellCommand::Quit => Ok(()),
    };
    Ok(outcome)
}

/// Run the read-eval-render loop until `quit` or end of input.
pub async fn run<A, R, W>(
    controller: &mut ViewController<A>,
    mut input: R,
    mut out: W,
) -> std::io::Result<()>
where
    A: DocumentsApi,
    R: BufRead,
    W: Write,
{
    if let Err(e) = controller.start().await {
        writeln!(out, "Error: {e}")?;
    }
    write!(out, "{}", render(controller))?;

    loop {
        write!(out, "{}> ", controller.page().name())?;
        out.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            writeln!(out)?;
            return Ok(());
        }

        let command = match parse_command(&line) {
            Ok(command) => command,
            Err(message) => {
                writeln!(out, "{message}")?;
                continue;
            }
        };
        if command == ShellCommand::Quit {
            return Ok(());
        }
        let show_page = command != ShellCommand::Help;

        if let Err(message) = apply(controller, command, &mut input, &mut out).await? {
            tracing::debug!("shell command failed: {message}");
            writeln!(out, "Error: {message}")?;
        }
        if show_page {
            write!(out, "{}", render(controller))?;
        }
    }
}
