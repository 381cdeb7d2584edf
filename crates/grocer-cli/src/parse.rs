//! The interactive `grocer parse` loop.
//!
//! The command succeeds once a receipt is saved, or when the user quits with a
//! parsed result on hand. A parse that never succeeded makes it fail, so
//! scripts running with `--yes` see transport and API errors in the exit code.

use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use clap::ValueEnum;
use grocer_api_client::ApiClient;
use grocer_core::{AppError, Config};
use grocer_processing::{load_selected_file, JpegConverter, PreviewRenderer, ReceiptValidator};
use grocer_workflow::{Completion, ReceiptSession, UploadWorkflow, WorkflowState};
use serde::Serialize;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, Lines};
use tokio_util::sync::CancellationToken;

use crate::prompt::{RETRY_PROMPT, REVIEW_PROMPT, SELECTED_WITH_RESULT_PROMPT};
use crate::render::{render_error, render_receipt, render_selection};
use crate::{JsonFileSink, ReviewAction};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

#[derive(Debug, Clone, Copy)]
pub struct ParseOptions {
    /// Save without prompting once the receipt is parsed; fail on any parse error.
    pub yes: bool,
    pub format: OutputFormat,
}

pub fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    let out = serde_json::to_string_pretty(value).context("Serialize response")?;
    println!("{}", out);
    Ok(())
}

pub fn preview_renderer(config: &Config) -> PreviewRenderer {
    PreviewRenderer::new(Arc::new(JpegConverter::new(config.heic_jpeg_quality)))
}

/// Ask until a known action is entered. EOF or cancellation quits.
async fn prompt<R>(
    lines: &mut Lines<R>,
    message: &str,
    cancel_token: &CancellationToken,
) -> anyhow::Result<ReviewAction>
where
    R: AsyncBufRead + Unpin,
{
    loop {
        print!("{} ", message);
        std::io::stdout().flush().context("Flush stdout")?;
        let line = tokio::select! {
            _ = cancel_token.cancelled() => return Ok(ReviewAction::Quit),
            line = lines.next_line() => line.context("Read from stdin")?,
        };
        let Some(line) = line else {
            return Ok(ReviewAction::Quit);
        };
        match ReviewAction::parse(&line) {
            Some(action) => return Ok(action),
            None => println!("Unknown choice: {}", line.trim()),
        }
    }
}

fn show_result(session: &ReceiptSession, format: OutputFormat) -> anyhow::Result<()> {
    if let Some(receipt) = session.workflow().result() {
        match format {
            OutputFormat::Json => print_json(receipt)?,
            OutputFormat::Table => print!("{}", render_receipt(receipt)),
        }
    }
    Ok(())
}

/// Leaving without any parsed result after a failed attempt is a failure.
fn finish(session: &ReceiptSession, last_failure: Option<AppError>) -> anyhow::Result<()> {
    match last_failure {
        Some(e) if session.workflow().result().is_none() => {
            Err(anyhow::anyhow!(render_error(&e)))
        }
        _ => Ok(()),
    }
}

/// Select `file`, parse it and review the result, reading answers from `input`.
///
/// Cancelling `cancel_token` shuts the session down and abandons any request.
pub async fn run_parse<R>(
    config: Config,
    file: &Path,
    options: ParseOptions,
    input: R,
    cancel_token: CancellationToken,
) -> anyhow::Result<()>
where
    R: AsyncBufRead + Unpin,
{
    let client = ApiClient::from_config(&config).context("Failed to create API client")?;
    let sink = Arc::new(JsonFileSink::new(config.save_dir.clone()));
    let workflow = UploadWorkflow::new(
        ReceiptValidator::from_config(&config),
        preview_renderer(&config),
        config.username.clone(),
    );
    let mut session = ReceiptSession::with_cancel_token(
        workflow,
        Arc::new(client),
        sink.clone(),
        cancel_token.clone(),
    );

    let selected = load_selected_file(file)?;
    if let Err(e) = session.select_file(selected) {
        anyhow::bail!(render_error(&e));
    }
    let workflow = session.workflow();
    if let Some(selected) = workflow.selected_file() {
        print!(
            "{}",
            render_selection(
                selected,
                workflow.preview(),
                workflow.warnings(),
                config.max_file_size_mb()
            )
        );
    }

    let mut lines = input.lines();
    let mut action = ReviewAction::Reparse;
    let mut last_failure = None;

    loop {
        match action {
            ReviewAction::Reparse => {
                println!("Processing...");
                match session.submit().await? {
                    Completion::Reviewing => {
                        last_failure = None;
                        show_result(&session, options.format)?;
                    }
                    Completion::Failed(e) => {
                        eprintln!("{}", render_error(&e));
                        if options.yes || session.is_shut_down() {
                            anyhow::bail!(render_error(&e));
                        }
                        last_failure = Some(e);
                    }
                    Completion::Stale | Completion::Ignored => {}
                }
            }
            ReviewAction::View => {
                if let Err(e) = session.reopen_review() {
                    eprintln!("{}", render_error(&e));
                } else {
                    show_result(&session, options.format)?;
                }
            }
            ReviewAction::Save => match session.save().await {
                Ok(()) => {
                    println!("Receipt saved to {}", sink.dir().display());
                    return Ok(());
                }
                Err(e) if options.yes => anyhow::bail!(render_error(&e)),
                Err(e) => eprintln!("{}", render_error(&e)),
            },
            ReviewAction::Cancel => {
                if let Err(e) = session.cancel_review() {
                    eprintln!("{}", render_error(&e));
                }
            }
            ReviewAction::Quit => return finish(&session, last_failure),
        }

        action = match session.workflow().state() {
            WorkflowState::Reviewing if options.yes => ReviewAction::Save,
            WorkflowState::Reviewing => prompt(&mut lines, REVIEW_PROMPT, &cancel_token).await?,
            WorkflowState::FileSelected if session.workflow().result().is_some() => {
                prompt(&mut lines, SELECTED_WITH_RESULT_PROMPT, &cancel_token).await?
            }
            WorkflowState::FileSelected => {
                prompt(&mut lines, RETRY_PROMPT, &cancel_token).await?
            }
            WorkflowState::Idle | WorkflowState::Submitting | WorkflowState::Saved => {
                return finish(&session, last_failure)
            }
        };
    }
}
