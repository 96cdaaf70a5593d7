//! Panic handler module
//!
//! - Production server: write crash.log, log the panic, exit the process
//! - Development server: print a detailed report; the worker recovers
//! - Client commands: print a short message

use chrono::Utc;
use std::fs::OpenOptions;
use std::io::Write;
use std::panic;

use crate::config::AppEnvironment;

pub const CRASH_LOG_PATH: &str = "crash.log";

/// Running mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    Server,
    Client,
}

/// What the hook does after recording a panic
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanicPolicy {
    /// 记录后立即退出，避免在可能已损坏的状态下继续服务
    Exit,
    Detailed,
    Simple,
}

pub fn panic_policy(mode: RunMode, environment: AppEnvironment) -> PanicPolicy {
    match (mode, environment.is_production()) {
        (RunMode::Server, true) => PanicPolicy::Exit,
        (RunMode::Server, false) => PanicPolicy::Detailed,
        (RunMode::Client, _) => PanicPolicy::Simple,
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}

/// Install custom panic hook
pub fn install_panic_hook(mode: RunMode, environment: AppEnvironment) {
    let policy = panic_policy(mode, environment);

    panic::set_hook(Box::new(move |panic_info| {
        let message = panic_message(panic_info.payload());
        let location = panic_info
            .location()
            .map(|loc| format!("{}:{}:{}", loc.file(), loc.line(), loc.column()))
            .unwrap_or_else(|| "Unknown location".to_string());

        let backtrace = std::backtrace::Backtrace::force_capture();
        let timestamp = Utc::now().format("%Y-%m-%d %H:%M:%S UTC").to_string();

        if let Err(e) = write_crash_log(&timestamp, &message, &location, &backtrace) {
            eprintln!("Failed to write crash log: {}", e);
        }

        match policy {
            PanicPolicy::Exit => {
                tracing::error!(
                    "Fatal panic at {}: {}. Crash report written to {}, exiting.",
                    location,
                    message,
                    CRASH_LOG_PATH
                );
                display_simple_panic(&message);
                std::process::exit(1);
            }
            PanicPolicy::Detailed => {
                tracing::error!("Panic at {}: {}", location, message);
                display_detailed_panic(&message, &location, &backtrace);
            }
            PanicPolicy::Simple => display_simple_panic(&message),
        }
    }));
}

fn display_detailed_panic(message: &str, location: &str, backtrace: &std::backtrace::Backtrace) {
    use colored::Colorize;

    let rule = "═══════════════════════════════════════════════════";
    eprintln!();
    eprintln!("{}", rule.red().bold());
    eprintln!("{}", "PANIC".red().bold());
    eprintln!("{}", rule.red().bold());
    eprintln!();
    eprintln!("{} {}", "Reason:".yellow().bold(), message.white());
    eprintln!("{} {}", "Location:".yellow().bold(), location.white());
    eprintln!();
    eprintln!("{}", "Backtrace:".yellow().bold());
    eprintln!("{}", format!("{:?}", backtrace).dimmed());
    eprintln!();
    eprintln!("{}", format!("Details saved to {}", CRASH_LOG_PATH).cyan());
    eprintln!("{}", rule.red().bold());
    eprintln!();
}

fn display_simple_panic(message: &str) {
    eprintln!();
    eprintln!("Program panicked: {}", message);
    eprintln!("Details saved to {}, please check the log file", CRASH_LOG_PATH);
    eprintln!();
}

fn write_crash_log(
    timestamp: &str,
    message: &str,
    location: &str,
    backtrace: &std::backtrace::Backtrace,
) -> std::io::Result<()> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(CRASH_LOG_PATH)?;

    writeln!(file, "==========================================")?;
    writeln!(file, "Crash Report - {}", timestamp)?;
    writeln!(file, "==========================================")?;
    writeln!(file, "Message: {}", message)?;
    writeln!(file, "Location: {}", location)?;
    writeln!(file, "\nBacktrace:")?;
    writeln!(file, "{:?}", backtrace)?;
    writeln!(file, "==========================================\n")?;

    Ok(())
}
