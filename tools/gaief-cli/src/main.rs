//! GAIEF command-line client
//!
//! Runs one UI action against the tutoring backend and prints the
//! resulting panel. Exits with status 1 when the panel is an error.

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use gaief_client::ApiClient;
use gaief_core::{init_logging, load_env, ClientConfig, DocumentUpload, Role};
use gaief_ui::{
    ActionOutcome, ChatForm, FreeChatForm, HistoryForm, LookupForm, Orchestrator, Panel,
    SummarizeForm, UploadForm, ViewModel,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Backend base URL (overrides GAIEF_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// OCR summary endpoint (overrides GAIEF_OCR_SUMMARY_URL)
    #[arg(long, global = true)]
    ocr_url: Option<String>,

    /// Output format
    #[arg(long, value_enum, default_value = "text", global = true)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Plain text for the terminal
    Text,
    /// HTML fragment
    Html,
}

#[derive(Subcommand)]
enum Command {
    /// Show a user record
    Lookup {
        /// students, teachers or parents
        #[arg(short, long, default_value = "students")]
        role: Role,
        /// User id
        user_id: String,
    },
    /// Ask about a topic using a stored user record as context
    Chat {
        /// students, teachers or parents
        #[arg(short, long, default_value = "students")]
        role: Role,
        /// User id whose record provides the context
        user_id: String,
        /// Topic or question
        topic: String,
    },
    /// Ask about a topic with typed context
    Ask {
        /// students, teachers or parents
        #[arg(short, long, default_value = "students")]
        role: Role,
        /// Topic or question
        topic: String,
        /// Free-text context
        context: String,
    },
    /// Upload a document for feedback
    Upload {
        /// students, teachers or parents
        #[arg(short, long, default_value = "students")]
        role: Role,
        /// Document to send
        file: PathBuf,
        /// What the document is about
        topic: String,
    },
    /// Show backend health
    Health,
    /// Show past exchanges for a user
    History {
        /// students, teachers or parents
        #[arg(short, long, default_value = "students")]
        role: Role,
        /// User id
        user_id: String,
    },
    /// Show the raw debug record for a student
    Debug {
        /// Student id
        user_id: String,
    },
    /// Summarize a document with the OCR function
    Summarize {
        /// Document to send
        file: PathBuf,
    },
    /// Check whether the OCR function is configured
    OcrStatus,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    load_env().context("failed to load .env")?;
    let mut config = ClientConfig::from_env().context("invalid GAIEF_* configuration")?;
    init_logging(&config.log_level);

    if let Some(url) = cli.api_url.clone() {
        config = config.with_api_base_url(url);
    }
    if let Some(url) = cli.ocr_url.clone() {
        config = config.with_ocr_summary_url(url);
    }

    let client = Arc::new(ApiClient::new(&config).context("failed to build API client")?);
    tracing::debug!(base_url = %client.base_url(), "Client ready");
    let ui = Orchestrator::new(client.clone())?;

    let outcome = run(cli.command, &ui, &client).await;
    if let Some(panel) = outcome.panel() {
        print_panel(panel, cli.format);
        if panel.is_error() {
            std::process::exit(1);
        }
    }
    Ok(())
}

async fn run(command: Command, ui: &Orchestrator, client: &ApiClient) -> ActionOutcome {
    match command {
        Command::Lookup { role, user_id } => ui.lookup_user(&LookupForm::new(role, user_id)).await,
        Command::Chat {
            role,
            user_id,
            topic,
        } => ui.send_message(&ChatForm::new(role, user_id, topic)).await,
        Command::Ask {
            role,
            topic,
            context,
        } => ui.send_free_chat(&FreeChatForm::new(role, topic, context)).await,
        Command::Upload { role, file, topic } => match read_document(ui, &file).await {
            Ok(document) => {
                ui.upload_document(UploadForm::new(role, topic, Some(document)))
                    .await
            }
            Err(panel) => ActionOutcome::Applied(panel),
        },
        Command::Health => ui.check_health().await,
        Command::History { role, user_id } => {
            ui.load_chat_history(&HistoryForm::new(role, user_id)).await
        }
        Command::Debug { user_id } => ui.load_debug_record(&user_id).await,
        Command::Summarize { file } => match read_document(ui, &file).await {
            Ok(document) => ui.summarize_document(SummarizeForm::new(Some(document))).await,
            Err(panel) => ActionOutcome::Applied(panel),
        },
        Command::OcrStatus => {
            let renderer = ui.renderer();
            let panel = match client.check_ocr_service().await {
                Ok(value) => renderer
                    .render(&ViewModel::Json {
                        value: &value,
                        is_error: false,
                    })
                    .unwrap_or_else(|e| renderer.render_error(&e)),
                Err(e) => renderer.render_error(&e),
            };
            ActionOutcome::Applied(panel)
        }
    }
}

async fn read_document(ui: &Orchestrator, path: &Path) -> Result<DocumentUpload, Panel> {
    DocumentUpload::from_path(path).await.map_err(|e| {
        tracing::warn!(path = %path.display(), "Could not read document: {}", e);
        ui.renderer()
            .render_message(&format!("Could not read {}: {}", path.display(), e))
    })
}

fn print_panel(panel: &Panel, format: OutputFormat) {
    match format {
        OutputFormat::Text => println!("{}", panel.text),
        OutputFormat::Html => println!("{}", panel.html),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_chat() {
        let cli = Cli::try_parse_from([
            "gaief",
            "--api-url",
            "http://localhost:9000",
            "chat",
            "--role",
            "teacher",
            "T7",
            "grading rubrics",
        ])
        .unwrap();
        assert_eq!(cli.api_url.as_deref(), Some("http://localhost:9000"));
        match cli.command {
            Command::Chat {
                role,
                user_id,
                topic,
            } => {
                assert_eq!(role, Role::Teachers);
                assert_eq!(user_id, "T7");
                assert_eq!(topic, "grading rubrics");
            }
            _ => panic!("expected chat"),
        }
    }

    #[test]
    fn test_rejects_unknown_role() {
        assert!(Cli::try_parse_from(["gaief", "lookup", "--role", "janitors", "X1"]).is_err());
    }

    #[test]
    fn test_format_after_subcommand() {
        let cli = Cli::try_parse_from(["gaief", "health", "--format", "html"]).unwrap();
        assert!(matches!(cli.format, OutputFormat::Html));
    }
}
