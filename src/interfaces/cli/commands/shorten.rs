//! Shorten command

use colored::Colorize;

use crate::client::{
    CopyOutcome, CredentialStatus, ShortenBackend, ShortenView, ViewState, copy_to_clipboard,
};
use crate::interfaces::cli::CliError;

pub async fn shorten<B: ShortenBackend>(
    view: &mut ShortenView<B>,
    url: &str,
    slug: Option<&str>,
    copy: bool,
) -> Result<(), CliError> {
    if view.mount().await == CredentialStatus::Unknown {
        println!(
            "{} Could not confirm the relay's credential, trying anyway",
            "ℹ".bold().blue()
        );
    }

    let state = view
        .submit(url, slug)
        .await
        .map_err(|blocked| CliError::CommandError(blocked.to_string()))?;

    let outcome = match state {
        ViewState::Success(result) => {
            println!("{}", "Short link created".bold().green());
            println!("  {} {}", "Short:".cyan(), result.short_url.blue().underline());
            println!("  {} {}", "Original:".cyan(), result.original_url);
            if let Some(slug) = &result.custom_slug {
                println!("  {} {}", "Slug:".cyan(), slug);
            }

            if copy && copy_to_clipboard(&result.short_url) == CopyOutcome::Clipboard {
                println!("  {}", "Copied to clipboard".dimmed());
            } else {
                // 无剪贴板时单独一行输出，方便选中复制
                println!();
                println!("{}", result.short_url);
            }
            Ok(())
        }
        ViewState::Error { message, hint } => {
            if let Some(hint) = hint {
                println!("{} {}", "Hint:".yellow().bold(), hint);
            }
            Err(CliError::RelayError(message.clone()))
        }
        ViewState::Idle | ViewState::Submitting => Err(CliError::CommandError(
            "Request did not complete".to_string(),
        )),
    };

    if view.history().is_degraded() {
        println!(
            "{} History could not be saved to disk this time",
            "⚠".bold().yellow()
        );
    }

    view.reset();
    outcome
}
