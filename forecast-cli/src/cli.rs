use anyhow::Context;
use chrono::Utc;
use clap::{Parser, Subcommand};
use inquire::{Password, PasswordDisplayMode, Select, Text};

use forecast_core::{Config, OpenWeatherClient, Units, config::parse_offset, forecast_all};

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "forecast", version, about = "5-day forecast summaries")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeather API key, units and reference offset.
    Configure,

    /// Show daily summaries for the given locations.
    Show {
        /// Locations such as "Austin,TX,US"; the configured list when absent.
        locations: Vec<String>,

        /// Print JSON instead of tables.
        #[arg(long)]
        json: bool,

        /// Offset deciding where "today" ends, e.g. -05:00; local time when absent.
        #[arg(long, allow_hyphen_values = true)]
        utc_offset: Option<String>,
    },

    /// List the configured locations.
    Locations,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Show {
                locations,
                json,
                utc_offset,
            } => show(locations, json, utc_offset).await,
            Command::Locations => {
                let config = Config::load()?;
                for location in &config.locations {
                    println!("{location}");
                }
                Ok(())
            }
        }
    }
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let api_key = Password::new("OpenWeather API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()?;

    let units = Select::new("Units:", Units::all().to_vec()).prompt()?;

    let offset = Text::new("UTC offset for \"today\" (blank for local time):")
        .with_default(config.utc_offset.as_deref().unwrap_or(""))
        .prompt()?;
    let offset = offset.trim();
    if !offset.is_empty() {
        parse_offset(offset)?;
    }

    config.set_api_key(api_key.trim().to_string());
    config.units = units;
    config.utc_offset = (!offset.is_empty()).then(|| offset.to_string());
    config.save()?;

    println!("Saved configuration to {}", Config::config_file_path()?.display());
    Ok(())
}

async fn show(
    locations: Vec<String>,
    json: bool,
    utc_offset: Option<String>,
) -> anyhow::Result<()> {
    let config = Config::load()?;

    let offset = match utc_offset {
        Some(raw) => parse_offset(&raw)?,
        None => config.reference_offset()?,
    };

    let locations = if locations.is_empty() {
        config.locations.clone()
    } else {
        locations
    };

    let client = OpenWeatherClient::new(config.client_settings()?)
        .context("Failed to build HTTP client")?;

    let now = Utc::now().with_timezone(&offset);
    let outcomes = forecast_all(&client, &locations, now).await;

    if json {
        let value = render::outcomes_json(&outcomes)?;
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else {
        print!("{}", render::report(&outcomes, client.settings().units, now));
    }

    Ok(())
}
