//! formctl CLI - terminal host for the form widget kit
//!
//! This is the main entry point for the formctl command-line tool, which provides:
//! - An interactive form with calendar pickers and a searchable staff select (`form` subcommand)
//! - A filterable register table backed by a spreadsheet web-app feed (`table` subcommand)
//! - A one-shot feed fetch that prints the parsed payload as JSON (`fetch` subcommand)

use std::str::FromStr;

use anyhow::Result;
use clap::{Parser, Subcommand};
use formctl_core::Clock;
use formctl_remote::{fetch_feed, Feed};
use tracing::warn;

mod tracing_setup;
mod tui;

use tui::app::load_table;
use tui::{App, Tab};

#[derive(Parser)]
#[command(name = "formctl")]
#[command(about = "Terminal form widgets: date pickers, searchable selects, and register tables")]
#[command(version)]
struct Cli {
    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    /// Evaluate "today" in this timezone instead of the machine-local one
    #[arg(long, global = true, value_name = "TZ")]
    zone: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the interactive data-entry form
    Form {
        /// Feed URL for the staff select options
        #[arg(long, value_name = "URL")]
        staff_url: Option<String>,
    },
    /// Open the register table view
    Table {
        /// Feed URL for the register rows
        #[arg(long, value_name = "URL")]
        url: Option<String>,
    },
    /// Fetch a feed once and print the parsed payload as JSON
    Fetch {
        /// Feed URL
        url: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_setup::init(&tracing_setup::TracingConfig { debug: cli.debug })?;

    let clock = clock_from_zone(cli.zone.as_deref());

    match cli.command {
        Commands::Form { staff_url } => {
            let mut app = App::new(clock);
            if let Some(url) = staff_url {
                match fetch_feed(&url).await {
                    Ok(feed) => app.staff_loaded(&feed.into_options()),
                    Err(err) => {
                        warn!(error = %err, "staff feed failed");
                        app.set_status("Failed to load staff list.");
                    }
                }
            }
            tui::run(&mut app)
        }
        Commands::Table { url } => {
            let mut app = App::new(clock);
            app.tab = Tab::Table;
            if let Some(url) = url {
                let result = fetch_feed(&url).await.map(Feed::into_rows);
                load_table(&mut app, result);
            }
            tui::run(&mut app)
        }
        Commands::Fetch { url } => {
            let feed = fetch_feed(&url).await?;
            let value = match feed {
                Feed::Options(options) => serde_json::json!(options),
                Feed::Rows(rows) => serde_json::json!(rows),
            };
            println!("{}", serde_json::to_string_pretty(&value)?);
            Ok(())
        }
    }
}

/// Resolve the --zone flag; an unknown zone falls back to the machine
/// clock with a warning rather than refusing to start
fn clock_from_zone(zone: Option<&str>) -> Clock {
    match zone {
        None => Clock::System,
        Some(name) => match chrono_tz::Tz::from_str(name) {
            Ok(tz) => Clock::Zone(tz),
            Err(_) => {
                warn!(zone = name, "unknown timezone, using machine-local date");
                Clock::System
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_from_zone() {
        assert_eq!(clock_from_zone(None), Clock::System);
        assert_eq!(
            clock_from_zone(Some("Indian/Maldives")),
            Clock::Zone(chrono_tz::Indian::Maldives)
        );
        assert_eq!(clock_from_zone(Some("Not/AZone")), Clock::System);
    }
}
