use anyhow::Result;
use clap::error::ErrorKind;
use clap::parser::ValueSource;
use clap::{CommandFactory, FromArgMatches, Parser, Subcommand};

use pew::cli::{handle_logout_command, handle_report_command, LogoutArgs, ReportArgs};
use pew::config::{PewPaths, Settings};

#[derive(Parser)]
#[command(
    name = "pew",
    version,
    about = "Month-to-date credit card spending from Personal Capital",
    long_about = "pew logs in to Personal Capital, fetches this month's transactions, \
                  and prints the spending of each of your card accounts. The session \
                  is saved between runs so you are not asked for a verification code \
                  every time."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    report: ReportArgs,

    /// Show debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Print this month's spending per account (the default)
    Report(ReportArgs),

    /// Forget the saved session
    Logout(LogoutArgs),

    /// Write a config file with the default settings
    Init,

    /// Show current configuration and paths
    Config,
}

/// Top-level report options, which only apply when no subcommand is given
const REPORT_ARG_IDS: [&str; 5] = ["email", "password", "session_file", "two_factor", "summary"];

/// Parse the command line, rejecting report options typed before a subcommand
///
/// Options coming from the environment are fine; the subcommand reads them itself.
fn parse_cli() -> Cli {
    let matches = Cli::command().get_matches();
    if matches.subcommand_name().is_some() {
        let misplaced = REPORT_ARG_IDS
            .iter()
            .find(|id| matches.value_source(id) == Some(ValueSource::CommandLine));
        if let Some(id) = misplaced {
            Cli::command()
                .error(
                    ErrorKind::ArgumentConflict,
                    format!(
                        "'--{}' cannot be used before a subcommand; pass it after 'report'",
                        id.replace('_', "-")
                    ),
                )
                .exit();
        }
    }
    Cli::from_arg_matches(&matches).unwrap_or_else(|e| e.exit())
}

fn main() -> Result<()> {
    let cli = parse_cli();
    pew::logging::init(cli.verbose);

    let paths = PewPaths::new()?;
    let settings = Settings::load_or_create(&paths)?;

    match cli.command {
        Some(Commands::Report(args)) => handle_report_command(&settings, args)?,
        None => handle_report_command(&settings, cli.report)?,
        Some(Commands::Logout(args)) => handle_logout_command(args)?,
        Some(Commands::Init) => {
            if paths.is_initialized() {
                println!(
                    "Config already exists at: {}",
                    paths.settings_file().display()
                );
                return Ok(());
            }
            settings.save(&paths)?;
            println!("Wrote default config to: {}", paths.settings_file().display());
            println!();
            println!("Edit the \"buckets\" list to match the names of your accounts.");
        }
        Some(Commands::Config) => {
            println!("pew Configuration");
            println!("=================");
            println!("Config directory: {}", paths.base_dir().display());
            println!(
                "Config file:      {}{}",
                paths.settings_file().display(),
                if paths.is_initialized() { "" } else { " (not created)" }
            );
            println!();
            println!("Settings:");
            println!("  Service URL:     {}", settings.base_url);
            println!("  Rows per page:   {}", settings.rows_per_page);
            println!("  Two-factor mode: {}", settings.two_factor_mode);
            println!("  Timeout:         {}s", settings.request_timeout_secs);
            println!();
            println!("Buckets:");
            for bucket in &settings.buckets {
                println!(
                    "  {} ({:?} \"{}\")",
                    bucket.title, bucket.match_kind, bucket.pattern
                );
            }
        }
    }

    Ok(())
}
