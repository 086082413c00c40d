//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the scraper:
//! - Building the HTTP client with user agent and timeouts
//! - Single-attempt GET requests returning the page body
//! - Classifying failures into retrieval errors

use crate::config::{FetcherConfig, UserAgentConfig};
use crate::InspectError;
use reqwest::Client;
use std::time::Duration;
use url::Url;

/// Formats the user agent header value
pub fn user_agent_string(config: &UserAgentConfig) -> String {
    format!("{}/{}", config.crawler_name, config.crawler_version)
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `fetcher` - Timeout configuration
/// * `user_agent` - The user agent configuration
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
pub fn build_http_client(
    fetcher: &FetcherConfig,
    user_agent: &UserAgentConfig,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent_string(user_agent))
        .timeout(Duration::from_secs(fetcher.timeout_secs))
        .connect_timeout(Duration::from_secs(fetcher.connect_timeout_secs))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a page and returns its body
///
/// | Condition | Result |
/// |-----------|--------|
/// | 2xx | body text |
/// | any other status | `Retrieval` with the status |
/// | timeout | `Retrieval` ("request timed out") |
/// | connection failure | `Retrieval` ("connection failed") |
/// | body read failure | `Retrieval` with the cause |
///
/// One attempt per page, no retries.
pub async fn fetch_page(client: &Client, url: &Url) -> Result<String, InspectError> {
    tracing::debug!("Fetching {}", url);

    let response = client
        .get(url.clone())
        .send()
        .await
        .map_err(|e| retrieval_error(url, &e))?;

    let status = response.status();
    if !status.is_success() {
        return Err(InspectError::Retrieval {
            url: url.to_string(),
            reason: format!("HTTP {}", status.as_u16()),
        });
    }

    response
        .text()
        .await
        .map_err(|e| retrieval_error(url, &e))
}

/// Maps a transport error onto a retrieval error
fn retrieval_error(url: &Url, error: &reqwest::Error) -> InspectError {
    let reason = if error.is_timeout() {
        "request timed out".to_string()
    } else if error.is_connect() {
        "connection failed".to_string()
    } else {
        error.to_string()
    };

    InspectError::Retrieval {
        url: url.to_string(),
        reason,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_client() -> Client {
        build_http_client(&FetcherConfig::default(), &UserAgentConfig::default()).unwrap()
    }

    #[test]
    fn test_user_agent_format() {
        let config = UserAgentConfig {
            crawler_name: "TestScraper".to_string(),
            crawler_version: "1.0".to_string(),
        };
        assert_eq!(user_agent_string(&config), "TestScraper/1.0");
    }

    #[tokio::test]
    async fn test_fetch_success() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/napa/search.cfm"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>ok</html>"))
            .mount(&server)
            .await;

        let url = Url::parse(&format!("{}/napa/search.cfm", server.uri())).unwrap();
        let body = fetch_page(&test_client(), &url).await.unwrap();
        assert_eq!(body, "<html>ok</html>");
    }

    #[tokio::test]
    async fn test_fetch_non_success_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let url = Url::parse(&format!("{}/missing", server.uri())).unwrap();
        let err = fetch_page(&test_client(), &url).await.unwrap_err();
        match err {
            InspectError::Retrieval { reason, .. } => assert_eq!(reason, "HTTP 404"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_fetch_connection_refused() {
        // Nothing listens on port 1
        let url = Url::parse("http://127.0.0.1:1/gone").unwrap();
        let err = fetch_page(&test_client(), &url).await.unwrap_err();
        assert!(matches!(err, InspectError::Retrieval { .. }));
    }
}
