//! Store management CLI commands.

use std::path::Path;

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use storefront_core::error::AppError;
use storefront_session::resources::UploadKind;
use storefront_session::{Faq, StorefrontClient};

use crate::output::{self, OutputFormat};

/// Arguments for store commands
#[derive(Debug, Args)]
pub struct StoreArgs {
    /// Store subcommand
    #[command(subcommand)]
    pub command: StoreCommand,
}

/// Store subcommands
#[derive(Debug, Subcommand)]
pub enum StoreCommand {
    /// Show the signed-in seller's store
    Show,
    /// Change store profile fields
    Update {
        #[arg(long)]
        store_name: Option<String>,
        #[arg(long)]
        location: Option<String>,
        #[arg(long)]
        niche: Option<String>,
    },
    /// Show the storefront configuration
    Configuration,
    /// Replace the store logo
    Logo {
        /// Image file
        file: String,
    },
    /// Replace the store cover image
    Cover {
        /// Image file
        file: String,
    },
    /// Storefront FAQs
    Faq {
        #[command(subcommand)]
        command: FaqCommand,
    },
}

/// FAQ subcommands
#[derive(Debug, Subcommand)]
pub enum FaqCommand {
    /// List FAQs
    List,
    /// Add a FAQ
    Add {
        #[arg(long)]
        question: String,
        #[arg(long)]
        answer: String,
    },
    /// Edit a FAQ
    Edit {
        /// FAQ ID
        id: i64,
        #[arg(long)]
        question: String,
        #[arg(long)]
        answer: String,
    },
    /// Remove a FAQ
    Remove {
        /// FAQ ID
        id: i64,
        /// Skip confirmation
        #[arg(long)]
        force: bool,
    },
}

/// FAQ display row
#[derive(Debug, Serialize, Tabled)]
struct FaqRow {
    /// FAQ ID
    id: String,
    /// Question
    question: String,
    /// Answer
    answer: String,
}

impl From<&Faq> for FaqRow {
    fn from(faq: &Faq) -> Self {
        Self {
            id: faq.id.map(|id| id.to_string()).unwrap_or_else(|| "-".to_string()),
            question: faq.question.clone(),
            answer: faq.answer.clone(),
        }
    }
}

/// Execute store commands
pub async fn execute(
    args: &StoreArgs,
    config_path: &str,
    format: OutputFormat,
) -> Result<(), AppError> {
    let client = super::build_client(config_path)?;
    if !client.session.is_authenticated() {
        return Err(AppError::authentication(
            "Not signed in, run `storefront session login` first",
        ));
    }

    let result = run(&client, &args.command, format).await;
    client.shutdown();
    result
}

async fn run(
    client: &StorefrontClient,
    command: &StoreCommand,
    format: OutputFormat,
) -> Result<(), AppError> {
    let api = &client.store;

    match command {
        StoreCommand::Show => {
            let store = api.get_store().await?;
            match format {
                OutputFormat::Json => output::print_item(&store, format),
                OutputFormat::Table => {
                    println!("Store:");
                    output::print_kv("Name", &store.store_name);
                    output::print_kv("Subdomain", store.subdomain.as_deref().unwrap_or("-"));
                    output::print_kv("Location", store.location.as_deref().unwrap_or("-"));
                    output::print_kv("Niche", store.niche.as_deref().unwrap_or("-"));
                    output::print_kv("Logo", store.logo.as_deref().unwrap_or("-"));
                    output::print_kv("Cover", store.cover.as_deref().unwrap_or("-"));
                }
            }
        }
        StoreCommand::Update {
            store_name,
            location,
            niche,
        } => {
            let mut changes = serde_json::Map::new();
            for (key, value) in [
                ("store_name", store_name),
                ("location", location),
                ("niche", niche),
            ] {
                if let Some(value) = value {
                    changes.insert(key.to_string(), value.trim().into());
                }
            }
            if changes.is_empty() {
                output::print_warning("Nothing to update");
                return Ok(());
            }

            let store = api.update_store(changes.into()).await?;
            output::print_success(&format!("Store '{}' updated", store.store_name));
        }
        StoreCommand::Configuration => {
            let configuration = api.get_configuration().await?;
            output::print_item(&configuration, OutputFormat::Json);
        }
        StoreCommand::Logo { file } => upload(client, UploadKind::Logo, file).await?,
        StoreCommand::Cover { file } => upload(client, UploadKind::Cover, file).await?,
        StoreCommand::Faq { command } => faq(client, command, format).await?,
    }

    Ok(())
}

async fn upload(client: &StorefrontClient, kind: UploadKind, file: &str) -> Result<(), AppError> {
    let path = Path::new(file);
    let data = tokio::fs::read(path)
        .await
        .map_err(|e| AppError::validation(format!("Cannot read '{file}': {e}")))?;
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("upload")
        .to_string();

    client
        .store
        .upload(kind, &file_name, data.into(), image_content_type(path))
        .await?;
    output::print_success(&format!("Store {kind} replaced with '{file_name}'"));
    Ok(())
}

async fn faq(
    client: &StorefrontClient,
    command: &FaqCommand,
    format: OutputFormat,
) -> Result<(), AppError> {
    let api = &client.store;

    match command {
        FaqCommand::List => {
            let faqs = api.list_faqs().await?;
            let rows: Vec<FaqRow> = faqs.iter().map(FaqRow::from).collect();
            output::print_list(&rows, format);
        }
        FaqCommand::Add { question, answer } => {
            let faq = api.create_faq(question, answer).await?;
            output::print_success(&format!(
                "FAQ {} added",
                faq.id.map(|id| id.to_string()).unwrap_or_default()
            ));
        }
        FaqCommand::Edit {
            id,
            question,
            answer,
        } => {
            api.update_faq(*id, question, answer).await?;
            output::print_success(&format!("FAQ {id} updated"));
        }
        FaqCommand::Remove { id, force } => {
            if !force {
                let confirm = dialoguer::Confirm::new()
                    .with_prompt(format!("Remove FAQ {id}?"))
                    .default(false)
                    .interact()
                    .map_err(|e| AppError::internal(format!("Input error: {e}")))?;

                if !confirm {
                    println!("Cancelled.");
                    return Ok(());
                }
            }

            api.delete_faq(*id).await?;
            output::print_success(&format!("FAQ {id} removed"));
        }
    }

    Ok(())
}

/// Content type for an image file, by extension.
fn image_content_type(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match extension.as_deref() {
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("svg") => "image/svg+xml",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_content_type() {
        assert_eq!(image_content_type(Path::new("logo.PNG")), "image/png");
        assert_eq!(image_content_type(Path::new("cover.jpeg")), "image/jpeg");
        assert_eq!(image_content_type(Path::new("notes")), "application/octet-stream");
    }
}
