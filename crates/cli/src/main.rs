// salesrecon CLI - order/invoice reconciliation and sales commissions

mod exit_codes;
mod export;
mod report;
mod util;

use std::process::ExitCode;

use clap::{ArgAction, Parser};

use exit_codes::{EXIT_ERROR, EXIT_INPUT, EXIT_OUTPUT, EXIT_SUCCESS, EXIT_USAGE};

#[derive(Parser)]
#[command(name = "salesrecon")]
#[command(about = "Reconcile orders with invoices and compute sales commissions")]
#[command(long_version = long_version())]
#[command(version)]
struct Cli {
    /// Log more (-v info, -vv debug). RUST_LOG takes precedence.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: report::ReportCommands,
}

fn long_version() -> &'static str {
    concat!(
        env!("CARGO_PKG_VERSION"),
        " (", env!("GIT_COMMIT_HASH"), ")",
        "\nengine:  salesrecon-report ", env!("CARGO_PKG_VERSION"),
        "\ntarget:  ", env!("TARGET"),
    )
}

fn init_logging(verbose: u8) {
    let default_filter = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = report::cmd_report(cli.command);

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn args(msg: impl Into<String>) -> Self {
        Self { code: EXIT_USAGE, message: msg.into(), hint: None }
    }

    pub fn input(msg: impl Into<String>) -> Self {
        Self { code: EXIT_INPUT, message: msg.into(), hint: None }
    }

    pub fn output(msg: impl Into<String>) -> Self {
        Self { code: EXIT_OUTPUT, message: msg.into(), hint: None }
    }

    pub fn general(msg: impl Into<String>) -> Self {
        Self { code: EXIT_ERROR, message: msg.into(), hint: None }
    }

    /// Engine error with its registry code and, where one helps, a hint.
    pub fn report(err: salesrecon_report::ReportError) -> Self {
        use salesrecon_report::ReportError;

        let code = exit_codes::report_exit_code(&err);
        let hint = match &err {
            ReportError::MissingColumn { .. } => {
                Some("map header names under [orders.columns] in the config".to_string())
            }
            ReportError::InvoiceShape(_) => {
                Some("check [invoices] path and [invoices.fields] in the config".to_string())
            }
            ReportError::AmountParse { .. } => {
                Some("amounts must be plain numbers in cents, e.g. \"324222\"".to_string())
            }
            _ => None,
        };
        Self { code, message: err.to_string(), hint }
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}
