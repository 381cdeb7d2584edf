//! Grocer CLI: parse a receipt photo and review it from the terminal.
//!
//! Reads GROCER_API_BASE_URL (or API_BASE_URL), GROCER_API_TOKEN and
//! GROCER_USERNAME, plus the other settings documented on `Config`.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use grocer_api_client::ApiClient;
use grocer_cli::init_tracing;
use grocer_cli::parse::{preview_renderer, print_json, run_parse, OutputFormat, ParseOptions};
use grocer_cli::render::{render_error, render_selection};
use grocer_core::Config;
use grocer_processing::{load_selected_file, ReceiptValidator};
use tokio::io::BufReader;
use tokio_util::sync::CancellationToken;

#[derive(Parser)]
#[command(name = "grocer", about = "Parse and review grocery receipts")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Upload a receipt image, review the result, then save or dismiss it
    Parse {
        /// Path to the receipt image (JPG, PNG or HEIC)
        file: PathBuf,
        /// User to parse the receipt for
        #[arg(long)]
        user: Option<String>,
        /// Directory saved receipts are written to
        #[arg(long)]
        save_dir: Option<PathBuf>,
        /// Save without prompting once the receipt is parsed
        #[arg(long)]
        yes: bool,
        /// How to show the parsed receipt
        #[arg(long, value_enum, default_value = "table")]
        format: OutputFormat,
    },
    /// Validate a file locally without uploading it
    Check {
        /// Path to the file
        file: PathBuf,
    },
    /// Write the display preview of a file (HEIC is converted to JPEG)
    Preview {
        /// Path to the image
        file: PathBuf,
        /// Where to write the preview
        #[arg(long)]
        out: PathBuf,
    },
    /// Check that the parsing API is reachable
    Status,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let mut config = Config::from_env().context("Failed to load configuration")?;

    let cli = Cli::parse();

    match cli.command {
        Commands::Parse {
            file,
            user,
            save_dir,
            yes,
            format,
        } => {
            if let Some(user) = user {
                config.username = user;
            }
            if let Some(save_dir) = save_dir {
                config.save_dir = save_dir;
            }
            config.validate()?;

            let cancel_token = CancellationToken::new();
            let ctrl_c_token = cancel_token.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    ctrl_c_token.cancel();
                }
            });

            run_parse(
                config,
                &file,
                ParseOptions { yes, format },
                BufReader::new(tokio::io::stdin()),
                cancel_token,
            )
            .await?;
        }
        Commands::Check { file } => {
            let selected = load_selected_file(&file)?;
            let validator = ReceiptValidator::from_config(&config);
            match validator.validate(&selected) {
                Ok(warnings) => {
                    print!(
                        "{}",
                        render_selection(&selected, None, &warnings, config.max_file_size_mb())
                    );
                    println!("OK");
                }
                Err(e) => anyhow::bail!(render_error(&e)),
            }
        }
        Commands::Preview { file, out } => {
            let selected = load_selected_file(&file)?;
            let preview = preview_renderer(&config).render(&selected)?;
            preview
                .copy_to(&out)
                .with_context(|| format!("Failed to write preview to {}", out.display()))?;
            print!(
                "{}",
                render_selection(&selected, Some(&preview), &[], config.max_file_size_mb())
            );
            println!("Preview written to {}", out.display());
        }
        Commands::Status => {
            let client = ApiClient::from_config(&config).context("Failed to create API client")?;
            let response = client.status().await?;
            print_json(&response)?;
        }
    }

    Ok(())
}
