mod builtins;
mod config;
mod dispatch;
mod error;
mod history;
mod launcher;
mod parser;
mod reaper;
mod repl;
mod util;

use crate::config::ShellConfig;
use crate::error::ShellError;
use anyhow::Context;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

const LOG_ENV: &str = "RASHELL_LOG";

/// Diagnostics go to stderr; stdout belongs to the shell and its children.
fn init_logger() {
    let env_filter = EnvFilter::builder()
        .with_default_directive(tracing::Level::WARN.into())
        .with_env_var(LOG_ENV)
        .from_env_lossy();

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();
}

fn run() -> anyhow::Result<()> {
    let config = ShellConfig::from_env().context("invalid shell configuration")?;
    repl::start_repl(&config)
}

fn main() {
    init_logger();
    if let Err(err) = run() {
        match err.downcast_ref::<ShellError>() {
            // Printed on stdout with the other shell messages.
            Some(fatal) if matches!(fatal, ShellError::Fork(_)) => println!("{fatal}"),
            _ => eprintln!("rashell: {err:#}"),
        }
        let code = err.downcast_ref::<ShellError>().map_or(1, ShellError::exit_code);
        std::process::exit(code);
    }
}
