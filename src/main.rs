use std::path::PathBuf;

use clap::{Parser, Subcommand};

use uld_deck_planner::app::{self, FlightOverrides, MessageKind};
use uld_deck_planner::infra::config::load_config;
use uld_deck_planner::util::{logging, version};

#[derive(Parser)]
#[command(name = "uld-deck-planner")]
#[command(about = "Plan ULD placement on a cargo deck and export CPM/LDM messages", long_about = None)]
#[command(version = version_string())]
struct Cli {
    /// Config file (defaults to the platform config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Aircraft profile JSON (defaults to config, then the built-in EC-NOG deck)
    #[arg(long, global = true)]
    profile: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print a load message for a load sheet
    Export {
        /// Load sheet JSON
        sheet: PathBuf,

        /// Message to produce
        #[arg(short, long, value_enum, default_value = "cpm")]
        message: MessageKind,

        /// Flight number
        #[arg(long)]
        flight: Option<String>,

        /// Destination station
        #[arg(long)]
        destination: Option<String>,

        /// Day of month for the header (defaults to today, UTC)
        #[arg(long, value_parser = clap::value_parser!(u8).range(1..=31))]
        day: Option<u8>,
    },
    /// List positions currently blocked by the load sheet
    Blocked {
        /// Load sheet JSON
        sheet: PathBuf,
    },
    /// Report rejected rows and loads missing a ULD ID
    Check {
        /// Load sheet JSON
        sheet: PathBuf,
    },
}

fn version_string() -> &'static str {
    match version::GIT_TAG {
        Some(tag) => tag,
        None => version::APP_VERSION,
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = load_config(cli.config.as_deref())?;
    logging::init(config.log_level.as_deref());
    tracing::debug!(app = version::APP_NAME, version = %version::version_label(), "starting");

    let output = match cli.command {
        Command::Export {
            sheet,
            message,
            flight,
            destination,
            day,
        } => {
            let overrides = FlightOverrides {
                flight_number: flight,
                destination,
                day_of_month: day,
            };
            let opened = app::open_session(&config, cli.profile, &sheet, overrides)?;
            for rejection in &opened.rejections {
                eprintln!("row {}: {}", rejection.row, rejection.error);
            }
            app::export(&opened.session, message)?
        }
        Command::Blocked { sheet } => {
            let opened =
                app::open_session(&config, cli.profile, &sheet, FlightOverrides::default())?;
            app::blocked_report(&opened.session)
        }
        Command::Check { sheet } => {
            let opened =
                app::open_session(&config, cli.profile, &sheet, FlightOverrides::default())?;
            app::check_report(&opened)
        }
    };

    println!("{output}");
    Ok(())
}
