use crate::{Config, WeatherReport, error::Result, provider::openweather::OpenWeatherProvider};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod openweather;

/// Source of current conditions for a free-text location query.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn current_weather(&self, city: &str) -> Result<WeatherReport>;
}

/// Construct the weather provider from config.
///
/// `api_key` wins over the key stored in the config file.
pub fn provider_from_config(
    config: &Config,
    api_key: Option<&str>,
) -> Result<Box<dyn WeatherProvider>> {
    let api_key = config.resolve_api_key(api_key)?;
    let provider = OpenWeatherProvider::with_base_url(api_key.to_owned(), &config.weather_base_url)?;
    Ok(Box::new(provider))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn provider_from_config_errors_when_missing_api_key() {
        let cfg = Config::default();
        let err = provider_from_config(&cfg, None).unwrap_err();
        assert!(matches!(err, Error::MissingApiKey));
        assert!(err.to_string().contains("No OpenWeather API key configured"));
    }

    #[test]
    fn provider_from_config_works_with_stored_key() {
        let mut cfg = Config::default();
        cfg.set_api_key("KEY".to_string());

        assert!(provider_from_config(&cfg, None).is_ok());
    }

    #[test]
    fn provider_from_config_accepts_override_without_stored_key() {
        let cfg = Config::default();
        assert!(provider_from_config(&cfg, Some("FROM_ENV")).is_ok());
    }
}
