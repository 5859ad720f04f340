//! `TmdbClient` - TMDB API client implementation.

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::instrument;
use url::Url;

use super::api::TmdbApi;
use super::error::RemoteFetchError;
use super::types::{ContentItem, MediaKind, Movie, PagedResponse, TvShow};

/// Default base URL for TMDB API v3.
const DEFAULT_BASE_URL: &str = "https://api.themoviedb.org/3/";

/// Number of entries kept from a top rated response.
pub const TOP_RATED_LIMIT: usize = 10;

/// TMDB error envelope returned with non-success statuses.
#[derive(Debug, serde::Deserialize)]
struct TmdbErrorResponse {
    status_code: u32,
    status_message: String,
}

/// TMDB API client.
///
/// Authenticates every request with the `api_key` query parameter.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct TmdbClient {
    /// HTTP client.
    http_client: Client,
    /// Base URL for API requests (always ends with `/`).
    base_url: Url,
    /// Query credential.
    api_key: String,
    /// Optional `language` parameter.
    language: Option<String>,
}

/// Builder for `TmdbClient`.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct TmdbClientBuilder {
    base_url: Option<Url>,
    api_key: Option<String>,
    user_agent: Option<String>,
    language: Option<String>,
    timeout: Option<Duration>,
}

impl TmdbClientBuilder {
    /// Creates a new builder.
    const fn new() -> Self {
        Self {
            base_url: None,
            api_key: None,
            user_agent: None,
            language: None,
            timeout: None,
        }
    }

    /// Overrides the base URL (for wiremock in tests).
    #[must_use]
    pub fn base_url(mut self, url: Url) -> Self {
        self.base_url = Some(url);
        self
    }

    /// Sets the API key (required).
    #[must_use]
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Sets the User-Agent (required).
    #[must_use]
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    /// Sets the response language (e.g. "en-US"). Omitted from requests when unset.
    #[must_use]
    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    /// Sets a request timeout. Defaults to the transport's own behaviour.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Builds the client.
    ///
    /// # Errors
    ///
    /// - `api_key` is not set.
    /// - `user_agent` is not set.
    /// - `reqwest::Client` build fails.
    pub fn build(self) -> Result<TmdbClient> {
        let api_key = self.api_key.context("api_key is required")?;
        let user_agent = self.user_agent.context("user_agent is required")?;

        let mut base_url = if let Some(url) = self.base_url {
            url
        } else {
            Url::parse(DEFAULT_BASE_URL).context("invalid default base URL")?
        };
        // `Url::join` drops the last segment unless the path ends with a slash.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let mut http_client = Client::builder().user_agent(&user_agent).gzip(true);
        if let Some(timeout) = self.timeout {
            http_client = http_client.timeout(timeout);
        }
        let http_client = http_client
            .build()
            .context("failed to build HTTP client")?;

        Ok(TmdbClient {
            http_client,
            base_url,
            api_key,
            language: self.language,
        })
    }
}

impl TmdbClient {
    /// Creates a new builder.
    #[must_use]
    pub const fn builder() -> TmdbClientBuilder {
        TmdbClientBuilder::new()
    }

    /// Base URL requests are resolved against.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Sends a GET request with the credential and optional language attached.
    ///
    /// The request URL carries the API key, so it is never logged and is
    /// stripped from transport errors.
    #[instrument(skip_all, fields(path = path))]
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, RemoteFetchError> {
        let url = self
            .base_url
            .join(path)
            .map_err(|source| RemoteFetchError::InvalidUrl {
                path: String::from(path),
                source,
            })?;

        let mut request = self
            .http_client
            .get(url)
            .query(&[("api_key", self.api_key.as_str())]);
        if let Some(language) = &self.language {
            request = request.query(&[("language", language.as_str())]);
        }
        if !query.is_empty() {
            request = request.query(query);
        }

        tracing::debug!("TMDB API request");

        let response = request
            .send()
            .await
            .map_err(|source| RemoteFetchError::Request {
                path: String::from(path),
                source: source.without_url(),
            })?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|source| RemoteFetchError::Request {
                path: String::from(path),
                source: source.without_url(),
            })?;

        if !status.is_success() {
            let message = match serde_json::from_str::<TmdbErrorResponse>(&body) {
                Ok(envelope) => format!(
                    "code={}, message={}",
                    envelope.status_code, envelope.status_message
                ),
                Err(_) => body,
            };
            return Err(RemoteFetchError::Api {
                status: status.as_u16(),
                message,
            });
        }

        serde_json::from_str(&body).map_err(|source| RemoteFetchError::Decode {
            path: String::from(path),
            source,
        })
    }

    /// Fetches a list endpoint and tags every entry with `kind`.
    async fn get_list(
        &self,
        kind: MediaKind,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<Vec<ContentItem>, RemoteFetchError> {
        let items = match kind {
            MediaKind::Movie => {
                let page: PagedResponse<Movie> = self.get_json(path, query).await?;
                tracing::debug!(total_results = page.total_results, "movie list received");
                page.results.into_iter().map(ContentItem::Movie).collect()
            }
            MediaKind::Tv => {
                let page: PagedResponse<TvShow> = self.get_json(path, query).await?;
                tracing::debug!(total_results = page.total_results, "tv list received");
                page.results.into_iter().map(ContentItem::TvShow).collect()
            }
        };
        Ok(items)
    }
}

impl TmdbApi for TmdbClient {
    #[instrument(skip_all, fields(kind = %kind))]
    async fn top_rated(&self, kind: MediaKind) -> Result<Vec<ContentItem>, RemoteFetchError> {
        let path = format!("{kind}/top_rated");
        let mut items = self
            .get_list(kind, &path, &[])
            .await
            .inspect_err(|e| tracing::warn!(error = %e, "failed to fetch top rated content"))?;
        items.truncate(TOP_RATED_LIMIT);
        Ok(items)
    }

    #[instrument(skip_all, fields(kind = %kind, query = query))]
    async fn search(
        &self,
        kind: MediaKind,
        query: &str,
    ) -> Result<Vec<ContentItem>, RemoteFetchError> {
        let path = format!("search/{kind}");
        self.get_list(kind, &path, &[("query", query)])
            .await
            .inspect_err(|e| tracing::warn!(error = %e, "failed to search content"))
    }

    #[instrument(skip_all, fields(kind = %kind, id = id))]
    async fn details(&self, kind: MediaKind, id: u64) -> Result<ContentItem, RemoteFetchError> {
        let path = format!("{kind}/{id}");
        let item = match kind {
            MediaKind::Movie => self
                .get_json::<Movie>(&path, &[])
                .await
                .map(ContentItem::Movie),
            MediaKind::Tv => self
                .get_json::<TvShow>(&path, &[])
                .await
                .map(ContentItem::TvShow),
        };
        item.inspect_err(|e| tracing::warn!(error = %e, "failed to fetch details"))
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::indexing_slicing)]
    #![allow(clippy::panic)]

    use super::*;

    fn client_for(mock_server: &wiremock::MockServer) -> TmdbClient {
        let base_url = format!("{}/3/", mock_server.uri());
        TmdbClient::builder()
            .base_url(base_url.parse().unwrap())
            .api_key("test-key")
            .user_agent("test/0.0.0")
            .build()
            .unwrap()
    }

    #[test]
    fn test_builder_requires_api_key() {
        // Arrange & Act
        let result = TmdbClient::builder().user_agent("test/0.0.0").build();

        // Assert
        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("api_key is required")
        );
    }

    #[test]
    fn test_builder_requires_user_agent() {
        // Arrange & Act
        let result = TmdbClient::builder().api_key("test-key").build();

        // Assert
        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("user_agent is required")
        );
    }

    #[test]
    fn test_builder_defaults_to_tmdb_v3() {
        // Arrange & Act
        let client = TmdbClient::builder()
            .api_key("test-key")
            .user_agent("test/0.0.0")
            .build()
            .unwrap();

        // Assert
        assert_eq!(client.base_url().as_str(), DEFAULT_BASE_URL);
    }

    #[test]
    fn test_builder_appends_trailing_slash() {
        // Arrange
        let custom_url = Url::parse("http://localhost:8080/3").unwrap();

        // Act
        let client = TmdbClient::builder()
            .base_url(custom_url)
            .api_key("test-key")
            .user_agent("test/0.0.0")
            .build()
            .unwrap();

        // Assert
        assert_eq!(client.base_url().as_str(), "http://localhost:8080/3/");
    }

    #[test]
    fn test_parse_top_rated_fixture() {
        // Arrange
        let json = include_str!("../../../../fixtures/tmdb/movie_top_rated.json");

        // Act
        let page: PagedResponse<Movie> = serde_json::from_str(json).unwrap();

        // Assert
        assert_eq!(page.results.len(), 20);
        assert_eq!(page.results[0].id, 238);
    }

    #[tokio::test]
    async fn test_top_rated_truncates_to_ten_preserving_order() {
        // Arrange
        let mock_server = wiremock::MockServer::start().await;
        let json_body = include_str!("../../../../fixtures/tmdb/movie_top_rated.json");

        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .and(wiremock::matchers::path("/3/movie/top_rated"))
            .and(wiremock::matchers::query_param("api_key", "test-key"))
            .respond_with(wiremock::ResponseTemplate::new(200).set_body_string(json_body))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server);

        // Act
        let items = client.top_rated(MediaKind::Movie).await.unwrap();

        // Assert
        assert_eq!(items.len(), TOP_RATED_LIMIT);
        let ids: Vec<u64> = items.iter().map(ContentItem::id).collect();
        assert_eq!(
            ids,
            vec![238, 278, 240, 424, 389, 129, 155, 19_404, 497, 496_243]
        );
        assert!(items.iter().all(|i| i.kind() == MediaKind::Movie));
    }

    #[tokio::test]
    async fn test_top_rated_tv_items_are_tagged_as_tv() {
        // Arrange
        let mock_server = wiremock::MockServer::start().await;
        let json_body = include_str!("../../../../fixtures/tmdb/tv_top_rated.json");

        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .and(wiremock::matchers::path("/3/tv/top_rated"))
            .respond_with(wiremock::ResponseTemplate::new(200).set_body_string(json_body))
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server);

        // Act
        let items = client.top_rated(MediaKind::Tv).await.unwrap();

        // Assert
        assert_eq!(items.len(), TOP_RATED_LIMIT);
        assert_eq!(items[0].title(), "Breaking Bad");
        assert!(items.iter().all(|i| i.kind() == MediaKind::Tv));
    }

    #[tokio::test]
    async fn test_search_sends_raw_query_and_returns_all_results() {
        // Arrange
        let mock_server = wiremock::MockServer::start().await;
        let json_body = include_str!("../../../../fixtures/tmdb/search_movie_batman.json");

        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .and(wiremock::matchers::path("/3/search/movie"))
            .and(wiremock::matchers::query_param("query", "bat man "))
            .and(wiremock::matchers::query_param("api_key", "test-key"))
            .respond_with(wiremock::ResponseTemplate::new(200).set_body_string(json_body))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server);

        // Act
        let items = client.search(MediaKind::Movie, "bat man ").await.unwrap();

        // Assert
        assert_eq!(items.len(), 3);
        assert_eq!(items[2].title(), "The Batman");
        assert!(items[1].poster_path().is_none());
    }

    #[tokio::test]
    async fn test_search_tv_empty() {
        // Arrange
        let mock_server = wiremock::MockServer::start().await;
        let json_body = include_str!("../../../../fixtures/tmdb/search_tv_empty.json");

        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .and(wiremock::matchers::path("/3/search/tv"))
            .respond_with(wiremock::ResponseTemplate::new(200).set_body_string(json_body))
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server);

        // Act
        let items = client.search(MediaKind::Tv, "zzzzzz").await.unwrap();

        // Assert
        assert!(items.is_empty());
    }

    #[tokio::test]
    async fn test_movie_details_via_http() {
        // Arrange
        let mock_server = wiremock::MockServer::start().await;
        let json_body = include_str!("../../../../fixtures/tmdb/movie_details_550.json");

        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .and(wiremock::matchers::path("/3/movie/550"))
            .respond_with(wiremock::ResponseTemplate::new(200).set_body_string(json_body))
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server);

        // Act
        let item = client.details(MediaKind::Movie, 550).await.unwrap();

        // Assert
        assert_eq!(item.kind(), MediaKind::Movie);
        assert_eq!(item.title(), "Fight Club");
        assert_eq!(item.release_year(), Some(1999));
        assert_eq!(item.vote_count(), 30_000);
    }

    #[tokio::test]
    async fn test_tv_details_via_http() {
        // Arrange
        let mock_server = wiremock::MockServer::start().await;
        let json_body = include_str!("../../../../fixtures/tmdb/tv_details_1396.json");

        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .and(wiremock::matchers::path("/3/tv/1396"))
            .respond_with(wiremock::ResponseTemplate::new(200).set_body_string(json_body))
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server);

        // Act
        let item = client.details(MediaKind::Tv, 1396).await.unwrap();

        // Assert
        assert_eq!(item.kind(), MediaKind::Tv);
        assert_eq!(item.title(), "Breaking Bad");
    }

    #[tokio::test]
    async fn test_language_is_sent_when_configured() {
        // Arrange
        let mock_server = wiremock::MockServer::start().await;
        let json_body = include_str!("../../../../fixtures/tmdb/search_tv_empty.json");

        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .and(wiremock::matchers::query_param("language", "ja-JP"))
            .respond_with(wiremock::ResponseTemplate::new(200).set_body_string(json_body))
            .expect(1)
            .mount(&mock_server)
            .await;

        let base_url = format!("{}/3/", mock_server.uri());
        let client = TmdbClient::builder()
            .base_url(base_url.parse().unwrap())
            .api_key("test-key")
            .user_agent("test/0.0.0")
            .language("ja-JP")
            .build()
            .unwrap();

        // Act & Assert (mock expect(1) verifies the language parameter)
        client.search(MediaKind::Tv, "test").await.unwrap();
    }

    #[tokio::test]
    async fn test_http_error_returns_api_error() {
        // Arrange
        let mock_server = wiremock::MockServer::start().await;
        let error_body = r#"{"status_code":7,"status_message":"Invalid API key: You must be granted a valid key.","success":false}"#;

        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .respond_with(wiremock::ResponseTemplate::new(401).set_body_string(error_body))
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server);

        // Act
        let result = client.top_rated(MediaKind::Movie).await;

        // Assert
        let err = result.unwrap_err();
        assert_eq!(err.status(), Some(401));
        let text = err.to_string();
        assert!(text.contains("TMDB API error"));
        assert!(text.contains("Invalid API key"));
    }

    #[tokio::test]
    async fn test_not_found_details() {
        // Arrange
        let mock_server = wiremock::MockServer::start().await;
        let error_body = r#"{"status_code":34,"status_message":"The resource you requested could not be found.","success":false}"#;

        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .and(wiremock::matchers::path("/3/movie/999999999"))
            .respond_with(wiremock::ResponseTemplate::new(404).set_body_string(error_body))
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server);

        // Act
        let result = client.details(MediaKind::Movie, 999_999_999).await;

        // Assert
        assert!(result.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_server_error_is_not_retried() {
        // Arrange
        let mock_server = wiremock::MockServer::start().await;

        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .respond_with(wiremock::ResponseTemplate::new(429).set_body_string("slow down"))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server);

        // Act
        let result = client.search(MediaKind::Movie, "bat").await;

        // Assert
        match result.unwrap_err() {
            RemoteFetchError::Api { status, message } => {
                assert_eq!(status, 429);
                assert_eq!(message, "slow down");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_malformed_body_returns_decode_error() {
        // Arrange
        let mock_server = wiremock::MockServer::start().await;

        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .respond_with(wiremock::ResponseTemplate::new(200).set_body_string("{\"page\":1}"))
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server);

        // Act
        let result = client.top_rated(MediaKind::Tv).await;

        // Assert
        assert!(matches!(
            result.unwrap_err(),
            RemoteFetchError::Decode { .. }
        ));
    }

    #[tokio::test]
    async fn test_transport_failure_returns_request_error() {
        // Arrange: nothing listens on port 9 (discard) on loopback.
        let client = TmdbClient::builder()
            .base_url(Url::parse("http://127.0.0.1:9/3/").unwrap())
            .api_key("test-key")
            .user_agent("test/0.0.0")
            .timeout(Duration::from_secs(2))
            .build()
            .unwrap();

        // Act
        let result = client.details(MediaKind::Movie, 550).await;

        // Assert
        let err = result.unwrap_err();
        assert!(!err.to_string().contains("test-key"));
        assert!(matches!(err, RemoteFetchError::Request { .. }));
    }
}
