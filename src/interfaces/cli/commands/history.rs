//! History command

use colored::Colorize;

use crate::cli::HistoryCommands;
use crate::history::{HistoryEntry, HistoryStore};
use crate::interfaces::cli::CliError;

fn format_entry(entry: &HistoryEntry) -> String {
    let mut parts = vec![format!(
        "{} -> {}",
        entry.short_url.cyan(),
        entry.original_url.blue().underline()
    )];
    if let Some(slug) = &entry.custom_slug {
        parts.push(format!("(slug: {})", slug).dimmed().to_string());
    }
    parts.push(
        entry
            .created_at
            .format("%Y-%m-%d %H:%M:%S UTC")
            .to_string()
            .dimmed()
            .yellow()
            .to_string(),
    );
    format!("{}  {}", entry.id.dimmed(), parts.join(" "))
}

pub fn history(store: &mut HistoryStore, action: HistoryCommands) -> Result<(), CliError> {
    match action {
        HistoryCommands::List => {
            if store.is_empty() {
                println!("{} No shortened links yet", "ℹ".bold().blue());
                return Ok(());
            }
            println!("{}", "Recent short links:".bold().green());
            println!();
            for entry in store.entries() {
                println!("  {}", format_entry(entry));
            }
            println!();
            println!(
                "{} {} of at most {} entries",
                "ℹ".bold().blue(),
                store.len().to_string().green(),
                crate::history::HISTORY_CAPACITY
            );
            Ok(())
        }
        HistoryCommands::Remove { id } => {
            if store.get(&id).is_none() {
                return Err(CliError::CommandError(format!(
                    "No history entry with id '{}'",
                    id
                )));
            }
            store.remove(&id);
            println!("{} Removed {}", "✓".bold().green(), id);
            Ok(())
        }
        HistoryCommands::Clear => {
            store.clear();
            println!("{} History cleared", "✓".bold().green());
            Ok(())
        }
    }
}
