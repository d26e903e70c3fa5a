use std::time::Duration;

use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;

use crate::error::{Error, Result, truncate_body};

const REQUEST_TIMEOUT_SECS: u64 = 10;
const USER_AGENT: &str = concat!("ph-weather/", env!("CARGO_PKG_VERSION"));

pub(crate) fn build_client() -> Result<Client> {
    let client = Client::builder()
        .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
        .user_agent(USER_AGENT)
        .build()?;
    Ok(client)
}

/// Send `request`, fail on non-2xx, and decode the body as JSON.
pub(crate) async fn fetch_json<T: DeserializeOwned>(
    request: RequestBuilder,
    what: &'static str,
) -> Result<T> {
    let res = request.send().await?;

    let status = res.status();
    let body = res.text().await?;

    if !status.is_success() {
        tracing::debug!(%status, what, "request rejected");
        return Err(Error::Status { status, body: truncate_body(&body) });
    }

    serde_json::from_str(&body).map_err(|source| Error::Decode { what, source })
}
