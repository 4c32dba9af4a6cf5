//! `quill`: command-line front end for the Quill document API.

mod render;
mod shell;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use quill_client::{ClientConfig, Field, HttpDocumentsApi, ViewController};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "quill")]
#[command(about = "Quill document client")]
struct Cli {
    /// API base URL (overrides QUILL_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List documents
    List {
        /// Only show documents whose topic, writer or content contains this text
        #[arg(long)]
        search: Option<String>,
    },
    /// Show one document
    Show {
        /// Document number as shown by `list`
        position: String,
    },
    /// Create a document
    Create {
        topic: String,
        writer: String,
        content: String,
    },
    /// Edit a document; fields that are not given keep their value
    Edit {
        /// Document number as shown by `list`
        position: String,
        #[arg(long)]
        topic: Option<String>,
        #[arg(long)]
        writer: Option<String>,
        #[arg(long)]
        content: Option<String>,
    },
    /// Delete one or more documents
    Delete {
        /// Document numbers as shown by `list`
        #[arg(required = true)]
        positions: Vec<String>,
    },
    /// Save a document as a plain-text file
    Export {
        /// Document number as shown by `list`
        position: String,
        /// Directory to write into
        #[arg(long, default_value = ".")]
        out: PathBuf,
    },
    /// Interactive session (the default)
    Shell,
}

fn position(raw: &str) -> anyhow::Result<usize> {
    shell::parse_position(raw).map_err(anyhow::Error::msg)
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("quill_client=warn".parse()?),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let cfg = ClientConfig::from_env_values(
        cli.api_url.or_else(|| std::env::var("QUILL_API_URL").ok()),
        std::env::var("QUILL_API_TIMEOUT_SECS").ok(),
    )?;
    tracing::debug!("Using API at {}", cfg.base_url());
    let mut controller = ViewController::new(HttpDocumentsApi::new(&cfg)?);

    match cli.command.unwrap_or(Commands::Shell) {
        Commands::List { search } => {
            controller.start().await?;
            if let Some(term) = search {
                controller.set_search(term);
            }
            print!("{}", render::render(&controller));
        }
        Commands::Show { position: raw } => {
            controller.start().await?;
            controller.view(position(&raw)?)?;
            print!("{}", render::render(&controller));
        }
        Commands::Create {
            topic,
            writer,
            content,
        } => {
            controller.start().await?;
            controller.open_create()?;
            controller.set_create_input(Field::Topic, topic)?;
            controller.set_create_input(Field::Writer, writer)?;
            controller.set_create_input(Field::Content, content)?;
            let doc = controller.submit().await?;
            println!("Created document {}", doc.id);
        }
        Commands::Edit {
            position: raw,
            topic,
            writer,
            content,
        } => {
            if topic.is_none() && writer.is_none() && content.is_none() {
                bail!("nothing to change: pass --topic, --writer or --content");
            }
            controller.start().await?;
            controller.edit(position(&raw)?)?;
            for (field, value) in [
                (Field::Topic, topic),
                (Field::Writer, writer),
                (Field::Content, content),
            ] {
                if let Some(value) = value {
                    controller.set_edit_input(field, value)?;
                }
            }
            let doc = controller.save_edit().await?;
            println!("Updated document {}", doc.id);
        }
        Commands::Delete { positions } => {
            controller.start().await?;
            controller.enter_delete_select()?;
            for raw in &positions {
                let index = position(raw)?;
                if !controller.selection().is_some_and(|s| s.contains(&index)) {
                    controller.toggle_selection(index)?;
                }
            }
            let deleted = controller.confirm_delete().await?;
            println!("Deleted {deleted} document(s)");
        }
        Commands::Export { position: raw, out } => {
            controller.start().await?;
            controller.view(position(&raw)?)?;
            let export = controller.export_current()?;
            let path = shell::write_export(&out, &export.file_name, &export.contents)
                .with_context(|| format!("failed to write into {}", out.display()))?;
            println!("Saved {}", path.display());
        }
        Commands::Shell => {
            let stdin = std::io::stdin();
            shell::run(&mut controller, stdin.lock(), std::io::stdout()).await?;
        }
    }

    Ok(())
}
