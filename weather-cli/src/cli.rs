use anyhow::{Context, anyhow};
use clap::{Args, Parser, Subcommand};
use inquire::{Password, PasswordDisplayMode};
use ph_weather_core::{
    Config, GeoDirectory, PsgcClient, WeatherCard, WeatherProvider, collate::sort_by_name,
    provider::provider_from_config,
};

use crate::browse;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "ph-weather", version, about = "Current weather for Philippine provinces and cities")]
pub struct Cli {
    #[command(flatten)]
    pub overrides: Overrides,

    /// Defaults to `browse`.
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Settings that take precedence over the config file.
#[derive(Debug, Args)]
pub struct Overrides {
    /// OpenWeather API key.
    #[arg(long, global = true, env = "PH_WEATHER_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Base URL of the PSGC reference API.
    #[arg(long, global = true, env = "PH_WEATHER_GEO_URL")]
    pub geo_url: Option<String>,

    /// Base URL of the OpenWeather API.
    #[arg(long, global = true, env = "PH_WEATHER_WEATHER_URL")]
    pub weather_url: Option<String>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Pick a province and city interactively and check the weather.
    Browse,

    /// List all provinces, sorted by name.
    Provinces,

    /// List the cities/municipalities of a province, sorted by name.
    Cities {
        /// Province code as printed by `provinces`.
        province_code: String,
    },

    /// Show current weather for a city or municipality name.
    Show {
        /// City or municipality name, e.g. "Bangued".
        city: String,
    },

    /// Store the OpenWeather API key in the config file.
    Configure,
}

impl Overrides {
    fn apply(&self, config: &mut Config) {
        if let Some(url) = &self.geo_url {
            config.geo_base_url = url.clone();
        }
        if let Some(url) = &self.weather_url {
            config.weather_base_url = url.clone();
        }
    }
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let mut config = Config::load()?;
        self.overrides.apply(&mut config);
        let api_key = self.overrides.api_key.as_deref();

        match self.command.unwrap_or(Command::Browse) {
            Command::Browse => browse::run(&config, api_key).await,
            Command::Provinces => list_provinces(&config).await,
            Command::Cities { province_code } => list_cities(&config, &province_code).await,
            Command::Show { city } => show(&config, api_key, &city).await,
            Command::Configure => configure(config),
        }
    }
}

async fn list_provinces(config: &Config) -> anyhow::Result<()> {
    let geo = PsgcClient::with_base_url(&config.geo_base_url)?;
    let mut provinces = geo.provinces().await.context("Failed to load provinces")?;
    sort_by_name(&mut provinces);

    for p in &provinces {
        println!("{:<12} {}", p.code, p.name);
    }
    Ok(())
}

async fn list_cities(config: &Config, province_code: &str) -> anyhow::Result<()> {
    let geo = PsgcClient::with_base_url(&config.geo_base_url)?;
    let mut cities = geo
        .cities_municipalities(province_code)
        .await
        .with_context(|| format!("Failed to load cities/municipalities for province {province_code}"))?;
    sort_by_name(&mut cities);

    for c in &cities {
        println!("{:<12} {}", c.code, c.name);
    }
    Ok(())
}

async fn show(config: &Config, api_key: Option<&str>, city: &str) -> anyhow::Result<()> {
    let provider = provider_from_config(config, api_key)?;
    let report = provider
        .current_weather(city)
        .await
        .map_err(|e| anyhow!("City not found: {e}"))?;

    println!("{}", WeatherCard::new(&report, &config.icon_base_url));
    Ok(())
}

fn configure(mut config: Config) -> anyhow::Result<()> {
    let api_key = Password::new("OpenWeather API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()?;

    let api_key = api_key.trim();
    if api_key.is_empty() {
        return Err(anyhow!("API key must not be empty"));
    }

    config.set_api_key(api_key.to_string());
    config.save()?;

    println!("Saved API key to {}", Config::config_file_path()?.display());
    Ok(())
}
