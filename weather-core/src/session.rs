//! Selection state for the province → city → weather flow.
//!
//! The session is three independent pieces of state with ordering constraints:
//!
//! - the selected province code,
//! - the selected city/municipality name,
//! - the weather panel (empty, a report, or an error; never both).
//!
//! Changing an upstream selection always resets everything downstream of it.
//! Network results are applied through tickets: a ticket records the
//! selection that triggered the request, and a result whose ticket no longer
//! matches the current selection is dropped.

use crate::{
    collate::sort_by_name,
    config::DEFAULT_ICON_BASE_URL,
    error::{Error, Result, SelectionError},
    geo::GeoDirectory,
    model::{CityOrMunicipality, Province, WeatherReport},
    provider::WeatherProvider,
    view::{Choice, Panel, View, WeatherCard},
};

/// Attempts made by [`Session::load_provinces`] before giving up.
const PROVINCE_ATTEMPTS: u32 = 2;

/// Where the user is in the flow, derived from the session fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    NoProvince,
    ProvinceSelected,
    CitySelected,
    WeatherDisplayed,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum WeatherPanel {
    #[default]
    Empty,
    Report(WeatherReport),
    Error(String),
}

/// Pending city/municipality load for one province selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CityRequest {
    province_code: String,
    generation: u64,
}

impl CityRequest {
    pub fn province_code(&self) -> &str {
        &self.province_code
    }
}

/// Pending weather lookup for one city selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeatherTicket {
    city: String,
    generation: u64,
}

impl WeatherTicket {
    pub fn city(&self) -> &str {
        &self.city
    }
}

#[derive(Debug, Clone)]
pub struct Session {
    provinces: Vec<Province>,
    province_error: Option<String>,
    cities: Vec<CityOrMunicipality>,
    selected_province: Option<String>,
    selected_city: Option<String>,
    weather: WeatherPanel,
    city_generation: u64,
    weather_generation: u64,
    icon_base_url: String,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(DEFAULT_ICON_BASE_URL)
    }
}

impl Session {
    pub fn new(icon_base_url: &str) -> Self {
        Self {
            provinces: Vec::new(),
            province_error: None,
            cities: Vec::new(),
            selected_province: None,
            selected_city: None,
            weather: WeatherPanel::Empty,
            city_generation: 0,
            weather_generation: 0,
            icon_base_url: icon_base_url.to_string(),
        }
    }

    pub fn provinces(&self) -> &[Province] {
        &self.provinces
    }

    pub fn cities(&self) -> &[CityOrMunicipality] {
        &self.cities
    }

    pub fn selected_province(&self) -> Option<&Province> {
        let code = self.selected_province.as_deref()?;
        self.provinces.iter().find(|p| p.code == code)
    }

    pub fn selected_province_code(&self) -> Option<&str> {
        self.selected_province.as_deref()
    }

    pub fn selected_city(&self) -> Option<&str> {
        self.selected_city.as_deref()
    }

    pub fn weather(&self) -> &WeatherPanel {
        &self.weather
    }

    pub fn province_error(&self) -> Option<&str> {
        self.province_error.as_deref()
    }

    pub fn stage(&self) -> Stage {
        match (&self.selected_province, &self.selected_city, &self.weather) {
            (None, _, _) => Stage::NoProvince,
            (Some(_), None, _) => Stage::ProvinceSelected,
            (Some(_), Some(_), WeatherPanel::Report(_)) => Stage::WeatherDisplayed,
            (Some(_), Some(_), _) => Stage::CitySelected,
        }
    }

    /// Fetch and sort the province list, retrying once on failure.
    ///
    /// On final failure the error is kept for display and returned; calling
    /// again is the manual retry.
    pub async fn load_provinces(&mut self, geo: &dyn GeoDirectory) -> Result<()> {
        let mut attempt = 1;
        let err = loop {
            match geo.provinces().await {
                Ok(mut provinces) => {
                    sort_by_name(&mut provinces);
                    self.provinces = provinces;
                    self.province_error = None;
                    return Ok(());
                }
                Err(e) if attempt < PROVINCE_ATTEMPTS => {
                    tracing::warn!(attempt, error = %e, "province list fetch failed, retrying");
                    attempt += 1;
                }
                Err(e) => break e,
            }
        };

        tracing::error!(attempts = attempt, error = %err, "giving up on province list");
        self.province_error = Some(format!("Could not load provinces: {err}"));
        Err(err)
    }

    /// Select a province by code.
    ///
    /// Clears the city selection, the city options, and the weather panel
    /// unconditionally, even when `code` is already selected.
    pub fn select_province(&mut self, code: &str) -> Result<CityRequest, SelectionError> {
        if !self.provinces.iter().any(|p| p.code == code) {
            return Err(SelectionError::UnknownProvince(code.to_string()));
        }

        self.selected_province = Some(code.to_string());
        self.selected_city = None;
        self.cities.clear();
        self.weather = WeatherPanel::Empty;
        self.city_generation += 1;
        self.weather_generation += 1;

        tracing::debug!(province_code = code, generation = self.city_generation, "province selected");
        Ok(CityRequest { province_code: code.to_string(), generation: self.city_generation })
    }

    /// Back to no selection; the province list is kept.
    pub fn clear_selection(&mut self) {
        self.selected_province = None;
        self.selected_city = None;
        self.cities.clear();
        self.weather = WeatherPanel::Empty;
        self.city_generation += 1;
        self.weather_generation += 1;
    }

    /// Ticket for (re)loading the cities of the current province.
    pub fn city_request(&self) -> Option<CityRequest> {
        self.selected_province.as_ref().map(|code| CityRequest {
            province_code: code.clone(),
            generation: self.city_generation,
        })
    }

    /// Apply a city/municipality list fetched for `request`.
    ///
    /// Returns `true` if the options were replaced. Failures are logged and
    /// leave the options untouched; responses for a superseded selection are
    /// dropped.
    pub fn apply_cities(
        &mut self,
        request: CityRequest,
        result: Result<Vec<CityOrMunicipality>>,
    ) -> bool {
        if request.generation != self.city_generation
            || self.selected_province.as_deref() != Some(request.province_code.as_str())
        {
            tracing::debug!(
                province_code = %request.province_code,
                generation = request.generation,
                current = self.city_generation,
                "dropping stale city list"
            );
            return false;
        }

        match result {
            Ok(mut cities) => {
                sort_by_name(&mut cities);
                self.cities = cities;
                true
            }
            Err(e) => {
                tracing::warn!(province_code = %request.province_code, error = %e, "error fetching cities");
                false
            }
        }
    }

    /// Fetch and apply the cities of the current province, if any.
    pub async fn load_cities(&mut self, geo: &dyn GeoDirectory) -> bool {
        let Some(request) = self.city_request() else {
            return false;
        };
        let result = geo.cities_municipalities(request.province_code()).await;
        self.apply_cities(request, result)
    }

    /// Select a city/municipality by display name. Resets the weather panel.
    pub fn select_city(&mut self, name: &str) -> Result<(), SelectionError> {
        if self.selected_province.is_none() {
            return Err(SelectionError::NoProvince);
        }
        if !self.cities.iter().any(|c| c.name == name) {
            return Err(SelectionError::UnknownCity(name.to_string()));
        }

        self.selected_city = Some(name.to_string());
        self.weather = WeatherPanel::Empty;
        self.weather_generation += 1;
        tracing::debug!(city = name, "city selected");
        Ok(())
    }

    /// Ticket for a weather lookup; `None` unless a city is selected.
    pub fn weather_request(&self) -> Option<WeatherTicket> {
        self.selected_city.as_ref().map(|city| WeatherTicket {
            city: city.clone(),
            generation: self.weather_generation,
        })
    }

    pub fn can_fetch_weather(&self) -> bool {
        self.selected_city.is_some()
    }

    /// Apply a weather lookup result. Returns `true` if the panel changed.
    ///
    /// Success replaces the panel with the report; failure replaces it with
    /// an error line. Results for a city that is no longer selected are dropped.
    pub fn apply_weather(&mut self, ticket: WeatherTicket, result: Result<WeatherReport>) -> bool {
        if ticket.generation != self.weather_generation
            || self.selected_city.as_deref() != Some(ticket.city.as_str())
        {
            tracing::debug!(city = %ticket.city, "dropping stale weather result");
            return false;
        }

        self.weather = match result {
            Ok(report) => WeatherPanel::Report(report),
            Err(e) => {
                tracing::warn!(city = %ticket.city, error = %e, "error fetching weather");
                WeatherPanel::Error(weather_error_message(&e))
            }
        };
        true
    }

    /// Fetch and apply weather for the selected city, if any.
    pub async fn fetch_weather(&mut self, provider: &dyn WeatherProvider) -> bool {
        let Some(ticket) = self.weather_request() else {
            return false;
        };
        let result = provider.current_weather(ticket.city()).await;
        self.apply_weather(ticket, result)
    }

    /// Presentation of the current state.
    pub fn view(&self) -> View {
        let provinces = self.provinces.iter().map(Choice::from).collect();

        let cities = self
            .selected_province
            .as_ref()
            .map(|_| self.cities.iter().map(Choice::from).collect());

        let panel = match (&self.selected_city, &self.weather) {
            (Some(_), WeatherPanel::Report(report)) => {
                Panel::Weather(WeatherCard::new(report, &self.icon_base_url))
            }
            (Some(_), WeatherPanel::Error(msg)) => Panel::Error(msg.clone()),
            _ => Panel::None,
        };

        View {
            provinces,
            province_error: self.province_error.clone(),
            selected_province: self.selected_province().map(|p| p.name.clone()),
            cities,
            selected_city: self.selected_city.clone(),
            can_fetch_weather: self.can_fetch_weather(),
            panel,
        }
    }
}

fn weather_error_message(err: &Error) -> String {
    format!("City not found: {err}")
}
