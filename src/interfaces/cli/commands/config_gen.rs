//! Generate config command

use std::io::{self, BufRead, Write};
use std::path::Path;

use colored::Colorize;

use crate::config::StaticConfig;
use crate::interfaces::cli::CliError;

pub const DEFAULT_SAMPLE_PATH: &str = "config.example.toml";

fn confirm_overwrite(path: &str) -> Result<bool, CliError> {
    print!(
        "{} {} {}",
        "File already exists:".yellow(),
        path.blue(),
        "Overwrite? [y/N] ".yellow()
    );
    io::stdout()
        .flush()
        .map_err(|e| CliError::LocalError(e.to_string()))?;

    let mut input = String::new();
    io::stdin()
        .lock()
        .read_line(&mut input)
        .map_err(|e| CliError::LocalError(e.to_string()))?;
    Ok(input.trim().eq_ignore_ascii_case("y"))
}

/// Generate example configuration file
pub fn config_generate(output_path: Option<String>, force: bool) -> Result<(), CliError> {
    let path = output_path.unwrap_or_else(|| DEFAULT_SAMPLE_PATH.to_string());

    // 非 --force 模式下交互确认
    if !force && Path::new(&path).exists() && !confirm_overwrite(&path)? {
        println!("{}", "Aborted.".red());
        return Ok(());
    }

    StaticConfig::default().save_to_file(&path)?;

    println!(
        "  {} {}",
        "Configuration file generated successfully".green(),
        path.blue()
    );
    println!(
        "  {}",
        "Set provider.api_key (or REBRANDLY_API_KEY) before starting the relay".yellow()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_writes_loadable_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("relay.toml");
        let path_str = path.to_string_lossy().into_owned();

        config_generate(Some(path_str.clone()), true).unwrap();

        let loaded = StaticConfig::load_from(Some(path_str.as_str()), Default::default()).unwrap();
        assert_eq!(loaded.server.port, 3000);
        assert_eq!(loaded.provider.default_domain, "rebrand.ly");
    }
}
