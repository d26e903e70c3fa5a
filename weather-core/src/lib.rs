//! Core library for the `ph-weather` CLI.
//!
//! This crate defines:
//! - The province → city/municipality → weather selection session
//! - Clients for the PSGC reference API and OpenWeather
//! - Locale-aware ordering of place names
//! - Configuration & credentials handling
//!
//! It is used by `ph-weather-cli`, but any front end can drive a [`Session`].

pub mod collate;
pub mod config;
pub mod error;
pub mod geo;
mod http;
pub mod model;
pub mod provider;
pub mod session;
pub mod view;

pub use config::Config;
pub use error::{Error, SelectionError};
pub use geo::{GeoDirectory, PsgcClient};
pub use model::{CityOrMunicipality, Named, Province, WeatherReport};
pub use provider::{WeatherProvider, openweather::OpenWeatherProvider};
pub use session::{Session, Stage, WeatherPanel};
pub use view::{Choice, Panel, View, WeatherCard};
