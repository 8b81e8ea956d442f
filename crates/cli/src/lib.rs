pub mod commands;

use std::process::ExitCode;

use clap::{Parser, Subcommand};

use bidwatch_core::config::{AppConfig, LoadOptions, LogFormat};

#[derive(Debug, Parser)]
#[command(
    name = "bidwatch",
    about = "Bidding opportunity review CLI",
    long_about = "Review crawled bidding opportunities, forward approvals to external \
                  workflow systems, and chat with an assistant grounded on the same data.",
    after_help = "Examples:\n  bidwatch list --category IT\n  bidwatch show RFQ-001\n  bidwatch approve RFQ-001 --target jira\n  bidwatch chat"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "List pending bidding records, optionally filtered")]
    List(commands::list::ListArgs),
    #[command(about = "Exact count of pending records matching the given filters")]
    Count(commands::count::CountArgs),
    #[command(about = "Show one record by reference number")]
    Show {
        #[arg(help = "Reference number, e.g. RFQ-001")]
        reference: String,
    },
    #[command(about = "Forward an approval to an external workflow system")]
    Approve {
        #[arg(help = "Reference number of the record to approve")]
        reference: String,
        #[arg(long, help = "Approval target: jira or monday")]
        target: String,
    },
    #[command(about = "Chat with the bidding assistant (reads from stdin)")]
    Chat,
    #[command(about = "Inspect effective configuration values with redaction")]
    Config,
    #[command(about = "Validate config and integration readiness")]
    Doctor {
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
}

pub async fn run() -> ExitCode {
    init_tracing();

    let cli = Cli::parse();
    let result = match cli.command {
        Command::List(args) => commands::list::run(args).await,
        Command::Count(args) => commands::count::run(args).await,
        Command::Show { reference } => commands::show::run(&reference).await,
        Command::Approve { reference, target } => {
            commands::approve::run(&reference, &target).await
        }
        Command::Chat => commands::chat::run().await,
        Command::Config => commands::CommandResult::ok(commands::config::run()),
        Command::Doctor { json } => commands::CommandResult::ok(commands::doctor::run(json)),
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}

/// Best effort: commands re-load and report config failures themselves.
fn init_tracing() {
    let Ok(config) = AppConfig::load(LoadOptions::default()) else {
        return;
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(config.logging.level.clone()));
    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr);
    let init_result = match config.logging.format {
        LogFormat::Compact => builder.compact().try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
    let _ = init_result;
}
