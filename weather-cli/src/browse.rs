//! Interactive province → city → weather loop.

use std::fmt;

use inquire::{InquireError, Select};
use ph_weather_core::{
    Config, OpenWeatherProvider, Panel, PsgcClient, Session, Stage, WeatherProvider,
    provider::provider_from_config,
};

const PAGE_SIZE: usize = 15;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    CheckWeather,
    ChangeCity,
    ChangeProvince,
    RetryCities,
    RetryProvinces,
    Quit,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Action::CheckWeather => "Check weather",
            Action::ChangeCity => "Change city/municipality",
            Action::ChangeProvince => "Change province",
            Action::RetryCities => "Retry loading cities/municipalities",
            Action::RetryProvinces => "Retry loading provinces",
            Action::Quit => "Quit",
        })
    }
}

/// Menu entries offered in the current state.
fn actions(session: &Session) -> Vec<Action> {
    let view = session.view();
    let mut actions = Vec::new();

    if view.province_error.is_some() && view.provinces.is_empty() {
        actions.push(Action::RetryProvinces);
        actions.push(Action::Quit);
        return actions;
    }

    if view.can_fetch_weather {
        actions.push(Action::CheckWeather);
    }
    match &view.cities {
        Some(cities) if cities.is_empty() => actions.push(Action::RetryCities),
        Some(_) => actions.push(Action::ChangeCity),
        None => {}
    }
    actions.push(Action::ChangeProvince);
    actions.push(Action::Quit);
    actions
}

/// Esc and Ctrl-C both back out of a prompt.
fn skippable<T>(answer: Result<Option<T>, InquireError>) -> anyhow::Result<Option<T>> {
    match answer {
        Ok(value) => Ok(value),
        Err(InquireError::OperationInterrupted | InquireError::OperationCanceled) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub async fn run(config: &Config, api_key: Option<&str>) -> anyhow::Result<()> {
    let geo = PsgcClient::with_base_url(&config.geo_base_url)?;
    let provider: Box<dyn WeatherProvider> = match provider_from_config(config, api_key) {
        Ok(provider) => provider,
        Err(e) => {
            // Lookups will fail service-side and show up in the error line.
            tracing::warn!(error = %e, "continuing without an API key");
            eprintln!("{e}");
            Box::new(OpenWeatherProvider::with_base_url(String::new(), &config.weather_base_url)?)
        }
    };

    let mut session = Session::new(&config.icon_base_url);
    if let Err(e) = session.load_provinces(&geo).await {
        tracing::debug!(error = %e, "initial province load failed");
    }

    loop {
        let view = session.view();
        if let Some(err) = &view.province_error {
            println!("\n{err}");
        }

        match session.stage() {
            Stage::NoProvince if !view.provinces.is_empty() => {
                if !choose_province(&mut session, &geo).await? {
                    return Ok(());
                }
                continue;
            }
            Stage::ProvinceSelected if view.cities.as_ref().is_some_and(|c| !c.is_empty()) => {
                if !choose_city(&mut session)? {
                    session.clear_selection();
                }
                continue;
            }
            _ => {}
        }

        if view.panel != Panel::None {
            println!("\n{}\n", view.panel);
        }

        let Some(action) = skippable(
            Select::new("What next?", actions(&session)).prompt_skippable(),
        )?
        else {
            return Ok(());
        };

        match action {
            Action::CheckWeather => {
                session.fetch_weather(provider.as_ref()).await;
            }
            Action::ChangeCity => {
                choose_city(&mut session)?;
            }
            Action::ChangeProvince => {
                choose_province(&mut session, &geo).await?;
            }
            Action::RetryCities => {
                if !session.load_cities(&geo).await {
                    println!("Still no cities/municipalities for this province.");
                }
            }
            Action::RetryProvinces => {
                if let Err(e) = session.load_provinces(&geo).await {
                    tracing::debug!(error = %e, "province reload failed");
                }
            }
            Action::Quit => return Ok(()),
        }
    }
}

/// Returns `false` if the user backed out.
async fn choose_province(session: &mut Session, geo: &PsgcClient) -> anyhow::Result<bool> {
    let provinces = session.view().provinces;
    if provinces.is_empty() {
        println!("No provinces available.");
        return Ok(false);
    }

    let Some(choice) = skippable(
        Select::new("Province:", provinces).with_page_size(PAGE_SIZE).prompt_skippable(),
    )?
    else {
        return Ok(false);
    };

    session.select_province(&choice.code)?;
    if !session.load_cities(geo).await || session.cities().is_empty() {
        println!("No cities/municipalities loaded for {}.", choice.label);
    }
    Ok(true)
}

/// Returns `false` if the user backed out.
fn choose_city(session: &mut Session) -> anyhow::Result<bool> {
    let Some(cities) = session.view().cities.filter(|c| !c.is_empty()) else {
        return Ok(false);
    };

    let Some(choice) = skippable(
        Select::new("City/Municipality:", cities).with_page_size(PAGE_SIZE).prompt_skippable(),
    )?
    else {
        return Ok(false);
    };

    session.select_city(&choice.label)?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn mount_provinces(server: &MockServer) {
        Mock::given(method("GET"))
            .and(path("/provinces/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {"code": "01", "name": "Abra"}
            ])))
            .mount(server)
            .await;
    }

    #[test]
    fn fresh_session_offers_province_change() {
        let session = Session::default();
        assert_eq!(actions(&session), [Action::ChangeProvince, Action::Quit]);
    }

    #[tokio::test]
    async fn failed_province_load_offers_retry() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/provinces/"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&mock_server)
            .await;

        let geo = PsgcClient::with_base_url(&mock_server.uri()).unwrap();
        let mut session = Session::default();
        assert!(session.load_provinces(&geo).await.is_err());

        assert_eq!(actions(&session), [Action::RetryProvinces, Action::Quit]);
    }

    #[tokio::test]
    async fn empty_city_list_offers_retry_cities() {
        let mock_server = MockServer::start().await;
        mount_provinces(&mock_server).await;
        Mock::given(method("GET"))
            .and(path("/provinces/01/cities-municipalities/"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&mock_server)
            .await;

        let geo = PsgcClient::with_base_url(&mock_server.uri()).unwrap();
        let mut session = Session::default();
        session.load_provinces(&geo).await.unwrap();
        session.select_province("01").unwrap();
        assert!(!session.load_cities(&geo).await);

        let offered = actions(&session);
        assert_eq!(offered, [Action::RetryCities, Action::ChangeProvince, Action::Quit]);
        assert!(!offered.contains(&Action::CheckWeather));
    }

    #[tokio::test]
    async fn selected_city_offers_check_weather_first() {
        let mock_server = MockServer::start().await;
        mount_provinces(&mock_server).await;
        Mock::given(method("GET"))
            .and(path("/provinces/01/cities-municipalities/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {"code": "0101", "name": "Bangued"}
            ])))
            .mount(&mock_server)
            .await;

        let geo = PsgcClient::with_base_url(&mock_server.uri()).unwrap();
        let mut session = Session::default();
        session.load_provinces(&geo).await.unwrap();
        session.select_province("01").unwrap();
        assert!(session.load_cities(&geo).await);
        session.select_city("Bangued").unwrap();

        assert_eq!(
            actions(&session),
            [Action::CheckWeather, Action::ChangeCity, Action::ChangeProvince, Action::Quit]
        );
    }

    #[test]
    fn skippable_treats_interrupt_as_back() {
        let answer: Result<Option<u8>, InquireError> = Err(InquireError::OperationInterrupted);
        assert!(skippable(answer).unwrap().is_none());
    }

    #[test]
    fn action_labels() {
        assert_eq!(Action::CheckWeather.to_string(), "Check weather");
        assert_eq!(Action::RetryProvinces.to_string(), "Retry loading provinces");
    }
}
