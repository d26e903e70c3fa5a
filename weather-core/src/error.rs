use reqwest::StatusCode;
use thiserror::Error;

/// Failures talking to the geographic reference or weather service.
#[derive(Debug, Error)]
pub enum Error {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("request failed with status {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("failed to decode {what}: {source}")]
    Decode {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error(
        "No OpenWeather API key configured.\n\
         Hint: set PH_WEATHER_API_KEY, pass --api-key, or run `ph-weather configure`."
    )]
    MissingApiKey,
}

impl Error {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Error::Status { status, .. } => Some(*status),
            Error::Http(e) => e.status(),
            _ => None,
        }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// A selection that does not match any of the currently loaded options.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    #[error("unknown province code '{0}'")]
    UnknownProvince(String),

    #[error("'{0}' is not a city or municipality of the selected province")]
    UnknownCity(String),

    #[error("no province selected")]
    NoProvince,
}

pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX {
        let mut end = MAX;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &body[..end])
    } else {
        body.to_string()
    }
}
