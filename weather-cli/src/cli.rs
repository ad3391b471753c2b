use std::process::ExitCode;

use clap::{Parser, Subcommand};
use inquire::{InquireError, Password, PasswordDisplayMode, Select, Text};
use weather_lookup_core::{
    Config, LookupError, WeatherLookup, WeatherReport, geolocator_from_config, places,
    provider_from_config,
};

use crate::{prompt::ProvinceCompleter, render};

const LANGUAGES: [&str; 2] = ["th", "en"];

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather", version, about = "Current weather and short-term forecast")]
pub struct Cli {
    /// Print the lookup state as JSON instead of text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Language for descriptions and dates, e.g. "th" or "en".
    #[arg(long, global = true)]
    pub lang: Option<String>,

    /// Defaults to `here`.
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeather API key and preferred language.
    Configure,

    /// Show weather for the current position.
    Here,

    /// Show weather for a place name.
    Show {
        /// City or province name.
        place: String,
    },

    /// Show weather for a coordinate pair.
    Coords {
        #[arg(allow_negative_numbers = true)]
        lat: f64,
        #[arg(allow_negative_numbers = true)]
        lon: f64,
    },

    /// Pick provinces interactively, with autocompletion.
    Search,
}

/// Where and how lookup outcomes are printed.
#[derive(Debug)]
struct Output {
    json: bool,
    lang: String,
}

impl Output {
    fn show(
        &self,
        lookup: &WeatherLookup,
        result: &Result<WeatherReport, LookupError>,
    ) -> anyhow::Result<ExitCode> {
        let view = lookup.snapshot();

        if self.json {
            println!("{}", render::render_json(&view)?);
        } else if result.is_err() {
            eprint!("{}", render::render_text(&view, &self.lang));
        } else {
            print!("{}", render::render_text(&view, &self.lang));
        }

        Ok(if result.is_ok() {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        })
    }
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<ExitCode> {
        let mut config = Config::load()?;
        if let Some(lang) = &self.lang {
            config.set_lang(lang);
        }
        tracing::debug!(lang = %config.lang, base_url = %config.base_url, "configuration loaded");

        let out = Output {
            json: self.json,
            lang: config.lang.clone(),
        };

        match self.command.unwrap_or(Command::Here) {
            Command::Configure => configure(config),
            Command::Here => {
                let lookup = WeatherLookup::from_boxed(provider_from_config(&config)?);
                let geolocator = geolocator_from_config(&config)?;
                let result = lookup.lookup_here(geolocator.as_ref()).await;
                out.show(&lookup, &result)
            }
            Command::Show { place } => {
                let lookup = WeatherLookup::from_boxed(provider_from_config(&config)?);
                let result = lookup.lookup_by_name(&place).await;
                out.show(&lookup, &result)
            }
            Command::Coords { lat, lon } => {
                let lookup = WeatherLookup::from_boxed(provider_from_config(&config)?);
                let result = lookup.lookup_by_coordinates(lat, lon).await;
                out.show(&lookup, &result)
            }
            Command::Search => {
                let lookup = WeatherLookup::from_boxed(provider_from_config(&config)?);
                search(&lookup, &out).await
            }
        }
    }
}

/// Prompt loop; each accepted province triggers a lookup. Esc ends it.
async fn search(lookup: &WeatherLookup, out: &Output) -> anyhow::Result<ExitCode> {
    println!("Type a province name (Tab completes, Esc quits).");

    loop {
        let initial = lookup.query_text();
        let answer = Text::new("Province:")
            .with_initial_value(&initial)
            .with_placeholder("Bangkok")
            .with_autocomplete(ProvinceCompleter)
            .prompt();

        let input = match answer {
            Ok(input) => input,
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => {
                return Ok(ExitCode::SUCCESS);
            }
            Err(e) => return Err(e.into()),
        };

        let place = places::canonical_name(&input).map_or(input, str::to_string);
        lookup.set_query_text(place.clone());

        let result = lookup.lookup_by_name(&place).await;
        out.show(lookup, &result)?;
        println!();
    }
}

fn configure(mut config: Config) -> anyhow::Result<ExitCode> {
    let api_key = Password::new("OpenWeather API key:")
        .without_confirmation()
        .with_display_mode(PasswordDisplayMode::Masked)
        .with_validator(inquire::required!("An API key is required"))
        .prompt()?;

    let current = LANGUAGES
        .iter()
        .position(|l| *l == config.lang)
        .unwrap_or(0);
    let lang = Select::new("Language for descriptions and dates:", LANGUAGES.to_vec())
        .with_starting_cursor(current)
        .prompt()?;

    config.set_api_key(api_key);
    config.set_lang(lang);
    config.save()?;

    println!(
        "Saved configuration to {}",
        Config::config_file_path()?.display()
    );
    Ok(ExitCode::SUCCESS)
}
