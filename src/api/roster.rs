use crate::api::{RosterPayload, RosterResponse};
use reqwest::Url;
use std::fmt;
use std::time::Duration;
use tracing::debug;

/// Everything needed to ask the API for one guild's roster.
#[derive(Debug, Clone)]
pub struct RosterRequest {
    pub api_host: String,
    pub server: String,
    pub guild: String,
    pub locale: String,
    pub api_key: String,
    pub timeout: Duration,
}

/// Errors returned by [`fetch_roster`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// The connection could not be established or the response did not
    /// arrive within the configured timeout.
    Timeout,
    /// The API answered with a non-success status.
    HttpStatus(u16),
    /// The body was not a roster document.
    ParseError(String),
    /// The request could not be built or failed for another transport reason.
    Request(String),
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchError::Timeout => write!(f, "Roster request timed out"),
            FetchError::HttpStatus(code) => {
                write!(f, "Roster request failed with HTTP status {code}")
            }
            FetchError::ParseError(msg) => write!(f, "Failed to parse roster response: {msg}"),
            FetchError::Request(msg) => write!(f, "Roster request failed: {msg}"),
        }
    }
}

impl std::error::Error for FetchError {}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() || err.is_connect() {
            FetchError::Timeout
        } else {
            FetchError::Request(err.to_string())
        }
    }
}

/// Build a client whose connect timeout matches the per-request timeout.
pub fn build_client(timeout: Duration) -> Result<reqwest::Client, FetchError> {
    reqwest::Client::builder()
        .connect_timeout(timeout)
        .timeout(timeout)
        .build()
        .map_err(|err| FetchError::Request(err.to_string()))
}

/// `<host>/wow/guild/<server>/<guild>?fields=members&locale=..&apikey=..`
pub fn roster_url(request: &RosterRequest) -> Result<Url, FetchError> {
    let mut url = Url::parse(&request.api_host).map_err(|err| {
        FetchError::Request(format!("invalid API host '{}': {err}", request.api_host))
    })?;

    url.path_segments_mut()
        .map_err(|_| {
            FetchError::Request(format!(
                "API host '{}' cannot carry a path",
                request.api_host
            ))
        })?
        .pop_if_empty()
        .extend([
            "wow",
            "guild",
            request.server.as_str(),
            request.guild.as_str(),
        ]);

    url.query_pairs_mut()
        .append_pair("fields", "members")
        .append_pair("locale", &request.locale)
        .append_pair("apikey", &request.api_key);

    Ok(url)
}

/// Render a URL for logs with the API key masked.
pub fn redacted(url: &Url) -> String {
    let mut masked = url.clone();
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(key, value)| {
            if key == "apikey" {
                (key.into_owned(), "REDACTED".to_string())
            } else {
                (key.into_owned(), value.into_owned())
            }
        })
        .collect();
    masked.query_pairs_mut().clear().extend_pairs(pairs);
    masked.to_string()
}

pub async fn fetch_roster(
    client: &reqwest::Client,
    request: &RosterRequest,
) -> Result<RosterResponse, FetchError> {
    let url = roster_url(request)?;
    debug!(url = %redacted(&url), "fetching guild roster");

    let response = client
        .get(url)
        .header("Accept", "application/json")
        .timeout(request.timeout)
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        debug!(status = status.as_u16(), "roster request rejected");
        return Err(FetchError::HttpStatus(status.as_u16()));
    }

    let body = response.text().await?;
    let payload: RosterPayload =
        serde_json::from_str(&body).map_err(|err| FetchError::ParseError(err.to_string()))?;
    let roster = RosterResponse::from(payload);
    debug!(members = roster.members.len(), "roster received");
    Ok(roster)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::test_utils::{json_response, MockUpstream, SAMPLE_ROSTER_JSON};

    fn request_for(api_host: &str, timeout: Duration) -> RosterRequest {
        RosterRequest {
            api_host: api_host.to_string(),
            server: "Thrall".to_string(),
            guild: "Whispering Woods".to_string(),
            locale: "de_DE".to_string(),
            api_key: "secret-key".to_string(),
            timeout,
        }
    }

    #[test]
    fn roster_url_encodes_path_segments() {
        let request = request_for("https://eu.api.battle.net/", Duration::from_secs(1));
        let url = roster_url(&request).expect("url should build");
        assert_eq!(
            url.as_str(),
            "https://eu.api.battle.net/wow/guild/Thrall/Whispering%20Woods?fields=members&locale=de_DE&apikey=secret-key"
        );

        let mut tricky = request.clone();
        tricky.server = "Der Rat von Dalaran".to_string();
        tricky.guild = "Äther/Kult".to_string();
        let url = roster_url(&tricky).expect("url should build");
        assert_eq!(
            url.path(),
            "/wow/guild/Der%20Rat%20von%20Dalaran/%C3%84ther%2FKult"
        );
    }

    #[test]
    fn roster_url_handles_host_without_trailing_slash() {
        let request = request_for("https://us.api.battle.net", Duration::from_secs(1));
        let url = roster_url(&request).expect("url should build");
        assert!(url
            .as_str()
            .starts_with("https://us.api.battle.net/wow/guild/Thrall/"));
    }

    #[test]
    fn roster_url_rejects_invalid_host() {
        let request = request_for("not a url", Duration::from_secs(1));
        match roster_url(&request) {
            Err(FetchError::Request(msg)) => assert!(msg.contains("invalid API host")),
            other => panic!("expected request error, got {other:?}"),
        }
    }

    #[test]
    fn redacted_masks_api_key() {
        let request = request_for("https://eu.api.battle.net/", Duration::from_secs(1));
        let url = roster_url(&request).expect("url should build");
        let shown = redacted(&url);
        assert!(!shown.contains("secret-key"));
        assert!(shown.contains("apikey=REDACTED"));
        assert!(shown.contains("locale=de_DE"));
    }

    #[tokio::test]
    async fn fetch_parses_successful_response() {
        let upstream = MockUpstream::respond_with(json_response(200, SAMPLE_ROSTER_JSON)).await;
        let request = request_for(&upstream.base_url(), Duration::from_secs(5));
        let client = build_client(request.timeout).expect("client");

        let roster = fetch_roster(&client, &request).await.expect("fetch ok");
        assert_eq!(roster.members.len(), 4);

        let request_line = upstream.request_line().await;
        assert!(
            request_line.starts_with("GET /wow/guild/Thrall/Whispering%20Woods?fields=members"),
            "unexpected request line: {request_line}"
        );
        assert!(request_line.contains("apikey=secret-key"));
    }

    #[tokio::test]
    async fn fetch_maps_error_status() {
        let upstream =
            MockUpstream::respond_with(json_response(404, r#"{"status":"nok"}"#)).await;
        let request = request_for(&upstream.base_url(), Duration::from_secs(5));
        let client = build_client(request.timeout).expect("client");

        let err = fetch_roster(&client, &request).await.unwrap_err();
        assert_eq!(err, FetchError::HttpStatus(404));
    }

    #[tokio::test]
    async fn fetch_reports_malformed_json() {
        let upstream = MockUpstream::respond_with(json_response(200, "<html>oops</html>")).await;
        let request = request_for(&upstream.base_url(), Duration::from_secs(5));
        let client = build_client(request.timeout).expect("client");

        let err = fetch_roster(&client, &request).await.unwrap_err();
        assert!(matches!(err, FetchError::ParseError(_)), "got {err:?}");
    }

    #[tokio::test]
    async fn fetch_times_out_on_stalled_upstream() {
        let upstream = MockUpstream::stall(Duration::from_secs(5)).await;
        let request = request_for(&upstream.base_url(), Duration::from_millis(200));
        let client = build_client(request.timeout).expect("client");

        let err = fetch_roster(&client, &request).await.unwrap_err();
        assert_eq!(err, FetchError::Timeout);
    }

    #[tokio::test]
    async fn fetch_treats_refused_connection_as_timeout() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("listener should bind");
        let addr = listener.local_addr().expect("local addr");
        drop(listener);

        let request = request_for(&format!("http://{addr}/"), Duration::from_millis(500));
        let client = build_client(request.timeout).expect("client");

        let err = fetch_roster(&client, &request).await.unwrap_err();
        assert_eq!(err, FetchError::Timeout);
    }
}
