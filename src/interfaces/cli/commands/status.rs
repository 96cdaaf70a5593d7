//! Status and stats commands - ask the relay about its provider account

use colored::Colorize;

use crate::client::ShortenBackend;
use crate::interfaces::cli::CliError;

/// Run the credential probe through the relay
pub async fn credential_status<B: ShortenBackend>(backend: &B) -> Result<(), CliError> {
    match backend.test_credential().await {
        Ok(account) => {
            println!("{} {}", "●".green(), "Connected".bold().green());
            println!("  {}:    {}", "Account".cyan(), account.id);
            if let Some(email) = &account.email {
                println!("  {}:      {}", "Email".cyan(), email);
            }
            if let Some(name) = &account.full_name {
                println!("  {}:       {}", "Name".cyan(), name);
            }
            if let Some(created) = &account.created_at {
                println!("  {}:    {}", "Created".cyan(), created.dimmed());
            }
            Ok(())
        }
        Err(e) if e.is_transport() => {
            println!("{} {}", "●".yellow(), "Unknown".bold().yellow());
            Err(e.into())
        }
        Err(e) => {
            println!("{} {}", "●".red(), "Error".bold().red());
            Err(e.into())
        }
    }
}

pub async fn account_stats<B: ShortenBackend>(backend: &B) -> Result<(), CliError> {
    let stats = backend.stats().await?;
    println!("{}", "Account usage".bold().green());
    println!("  {}:  {}", "Links created".cyan(), stats.links_created);
    println!("  {}:    {}", "Links limit".cyan(), stats.links_limit);
    println!("  {}: {}", "Clicks tracked".cyan(), stats.clicks_tracked);
    Ok(())
}
