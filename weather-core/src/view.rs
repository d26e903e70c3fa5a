//! What to show for a given session state.

use std::fmt;

use crate::model::{Named, WeatherReport};

// U+0421 is a Cyrillic capital Es; the displayed unit has always used it, keep it.
const DEGREES_CELSIUS: &str = "\u{b0}\u{421}";

/// One entry of a selection prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choice {
    pub code: String,
    pub label: String,
}

impl<T: Named> From<&T> for Choice {
    fn from(item: &T) -> Self {
        Self { code: item.code().to_string(), label: item.name().to_string() }
    }
}

impl fmt::Display for Choice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct View {
    pub provinces: Vec<Choice>,
    pub province_error: Option<String>,
    /// Display name of the selected province.
    pub selected_province: Option<String>,
    /// Present only once a province is selected.
    pub cities: Option<Vec<Choice>>,
    pub selected_city: Option<String>,
    pub can_fetch_weather: bool,
    pub panel: Panel,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Panel {
    None,
    Weather(WeatherCard),
    Error(String),
}

/// Display-ready weather summary.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherCard {
    pub location_name: String,
    pub condition: String,
    pub icon_url: String,
    pub temperature: String,
    pub humidity: String,
    pub wind_speed: String,
    pub observed_at: Option<String>,
}

impl WeatherCard {
    pub fn new(report: &WeatherReport, icon_base_url: &str) -> Self {
        Self {
            location_name: report.location_name.clone(),
            condition: report.condition.clone(),
            icon_url: format!("{}/{}@4x.png", icon_base_url.trim_end_matches('/'), report.icon_id),
            temperature: format!("{}{DEGREES_CELSIUS}", report.temperature_c),
            humidity: format!("{}%", report.humidity_pct),
            wind_speed: format!("{} m/s", report.wind_speed_mps),
            observed_at: report
                .observation_time
                .map(|t| t.format("%Y-%m-%d %H:%M UTC").to_string()),
        }
    }
}

impl fmt::Display for WeatherCard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} ({})", self.location_name, self.condition)?;
        writeln!(f, "  Temperature: {}", self.temperature)?;
        writeln!(f, "  Wind Speed:  {}", self.wind_speed)?;
        writeln!(f, "  Humidity:    {}", self.humidity)?;
        write!(f, "  Icon:        {}", self.icon_url)?;
        if let Some(at) = &self.observed_at {
            write!(f, "\n  Observed:    {at}")?;
        }
        Ok(())
    }
}

impl fmt::Display for Panel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Panel::None => Ok(()),
            Panel::Weather(card) => card.fmt(f),
            Panel::Error(msg) => f.write_str(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Province;
    use chrono::{TimeZone, Utc};

    fn report() -> WeatherReport {
        WeatherReport {
            location_name: "Bangued".into(),
            condition: "Clouds".into(),
            icon_id: "03d".into(),
            temperature_c: 28.4,
            humidity_pct: 70,
            wind_speed_mps: 2.1,
            observation_time: None,
        }
    }

    #[test]
    fn card_formats_metric_values() {
        let card = WeatherCard::new(&report(), "https://openweathermap.org/img/wn/");

        assert_eq!(card.temperature, "28.4\u{b0}\u{421}");
        assert_eq!(card.humidity, "70%");
        assert_eq!(card.wind_speed, "2.1 m/s");
        assert_eq!(card.icon_url, "https://openweathermap.org/img/wn/03d@4x.png");
    }

    #[test]
    fn whole_degrees_have_no_fraction() {
        let mut r = report();
        r.temperature_c = 30.0;
        let card = WeatherCard::new(&r, "http://icons");
        assert_eq!(card.temperature, "30\u{b0}\u{421}");
    }

    #[test]
    fn card_display_lists_all_fields() {
        let mut r = report();
        r.observation_time = Utc.with_ymd_and_hms(2024, 5, 1, 6, 30, 0).single();
        let text = WeatherCard::new(&r, "http://icons").to_string();

        assert!(text.starts_with("Bangued (Clouds)"));
        assert!(text.contains("Wind Speed:  2.1 m/s"));
        assert!(text.contains("Humidity:    70%"));
        assert!(text.contains("Observed:    2024-05-01 06:30 UTC"));
    }

    #[test]
    fn empty_panel_renders_nothing() {
        assert_eq!(Panel::None.to_string(), "");
        assert_eq!(Panel::Error("City not found: x".into()).to_string(), "City not found: x");
    }

    #[test]
    fn choice_displays_label_only() {
        let choice = Choice::from(&Province::new("01", "Abra"));
        assert_eq!(choice.code, "01");
        assert_eq!(choice.to_string(), "Abra");
    }
}
