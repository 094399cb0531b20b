//! `Geocoder` backed by a Nominatim-compatible HTTP service.

use std::time::Duration;

use poimap_core::{GeocodeError, GeocodeResult, Geocoder};
use reqwest::Client;
use thiserror::Error;
use tokio::runtime::{Handle, Runtime, RuntimeFlavor};
use url::Url;

use super::nominatim::Place;

/// Error type for [`NominatimGeocoder`] construction failures.
#[derive(Debug, Error)]
pub enum GeocoderBuildError {
    /// The base URL could not be parsed.
    #[error("invalid geocoder base URL {url:?}: {source}")]
    BaseUrl {
        /// Offending value.
        url: String,
        /// Parser error.
        #[source]
        source: url::ParseError,
    },
    /// Failed to build the HTTP client.
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),
    /// Failed to build the Tokio runtime.
    #[error("failed to build Tokio runtime: {0}")]
    Runtime(#[source] std::io::Error),
}

/// Public Nominatim instance.
pub const DEFAULT_BASE_URL: &str = "https://nominatim.openstreetmap.org";

/// Default user agent for geocoding requests. Nominatim's usage policy
/// rejects anonymous clients.
pub const DEFAULT_USER_AGENT: &str = "poimap/0.1";

const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_LIMIT: u8 = 5;

/// Configuration for [`NominatimGeocoder`].
#[derive(Debug, Clone)]
pub struct NominatimConfig {
    /// Service root, e.g. `"https://nominatim.openstreetmap.org"`.
    pub base_url: String,
    /// Request timeout duration.
    pub timeout: Duration,
    /// User agent string for requests.
    pub user_agent: String,
    /// Maximum number of candidates requested per query.
    pub limit: u8,
}

impl Default for NominatimConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_owned(),
            limit: DEFAULT_LIMIT,
        }
    }
}

impl NominatimConfig {
    /// Configuration pointing at `base_url` with default settings.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Cap the number of candidates. Zero is raised to one.
    #[must_use]
    pub fn with_limit(mut self, limit: u8) -> Self {
        self.limit = limit.max(1);
        self
    }
}

/// Nominatim search client implementing the synchronous [`Geocoder`] trait.
///
/// The client owns a `current_thread` Tokio runtime that is reused across
/// calls. When invoked from inside a multi-threaded runtime it borrows that
/// runtime through [`tokio::task::block_in_place`] instead, since blocking
/// on a nested runtime panics.
pub struct NominatimGeocoder {
    client: Client,
    config: NominatimConfig,
    search_url: Url,
    runtime: Runtime,
}

impl std::fmt::Debug for NominatimGeocoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NominatimGeocoder")
            .field("client", &self.client)
            .field("config", &self.config)
            .field("runtime", &"<tokio::runtime::Runtime>")
            .finish()
    }
}

impl NominatimGeocoder {
    /// Geocoder for the service at `base_url` with default settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is malformed or the HTTP client or Tokio
    /// runtime fails to build.
    pub fn new(base_url: impl Into<String>) -> Result<Self, GeocoderBuildError> {
        Self::with_config(NominatimConfig::new(base_url))
    }

    /// Geocoder with explicit configuration.
    ///
    /// # Errors
    ///
    /// See [`NominatimGeocoder::new`].
    pub fn with_config(config: NominatimConfig) -> Result<Self, GeocoderBuildError> {
        let search_url = search_endpoint(&config.base_url)?;
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .connect_timeout(config.timeout)
            .timeout(config.timeout)
            .build()
            .map_err(GeocoderBuildError::HttpClient)?;
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(GeocoderBuildError::Runtime)?;
        Ok(Self {
            client,
            config,
            search_url,
            runtime,
        })
    }

    pub fn config(&self) -> &NominatimConfig {
        &self.config
    }

    /// `{base}/search?q={query}&format=json&limit={limit}`.
    fn build_search_url(&self, query: &str) -> Url {
        let mut url = self.search_url.clone();
        url.query_pairs_mut()
            .append_pair("q", query)
            .append_pair("format", "json")
            .append_pair("limit", &self.config.limit.to_string());
        url
    }

    async fn search_async(&self, query: &str) -> Result<Vec<GeocodeResult>, GeocodeError> {
        let url = self.build_search_url(query);
        log::debug!("geocoding {query:?} via {url}");

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|err| self.convert_reqwest_error(&err, url.as_str()))?
            .error_for_status()
            .map_err(|err| self.convert_reqwest_error(&err, url.as_str()))?;

        let places: Vec<Place> = response
            .json()
            .await
            .map_err(|err| GeocodeError::ParseError {
                message: err.to_string(),
            })?;

        convert_places(places)
    }

    fn convert_reqwest_error(&self, error: &reqwest::Error, url: &str) -> GeocodeError {
        if error.is_timeout() {
            return GeocodeError::Timeout {
                url: url.to_owned(),
                timeout_secs: self.config.timeout.as_secs(),
            };
        }

        if let Some(status) = error.status() {
            return GeocodeError::HttpError {
                url: url.to_owned(),
                status: status.as_u16(),
                message: error.to_string(),
            };
        }

        GeocodeError::NetworkError {
            url: url.to_owned(),
            message: error.to_string(),
        }
    }
}

fn search_endpoint(base_url: &str) -> Result<Url, GeocoderBuildError> {
    let invalid = |source| GeocoderBuildError::BaseUrl {
        url: base_url.to_owned(),
        source,
    };
    let root = Url::parse(&format!("{}/", base_url.trim_end_matches('/'))).map_err(invalid)?;
    root.join("search").map_err(invalid)
}

fn convert_places(places: Vec<Place>) -> Result<Vec<GeocodeResult>, GeocodeError> {
    places.into_iter().map(Place::into_result).collect()
}

impl Geocoder for NominatimGeocoder {
    /// Look up `query` on the configured service.
    ///
    /// # Runtime requirements
    ///
    /// Inside an existing Tokio runtime the runtime must be multi-threaded.
    /// From a `current_thread` runtime the call falls back to the internal
    /// runtime, which blocks the caller's executor for the whole request.
    fn geocode(&self, query: &str) -> Result<Vec<GeocodeResult>, GeocodeError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(GeocodeError::EmptyQuery);
        }

        let future = self.search_async(query);
        match Handle::try_current() {
            Ok(handle) if handle.runtime_flavor() == RuntimeFlavor::MultiThread => {
                tokio::task::block_in_place(|| handle.block_on(future))
            }
            _ => self.runtime.block_on(future),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::thread;

    use super::*;
    use rstest::rstest;

    fn geocoder(base_url: &str) -> NominatimGeocoder {
        NominatimGeocoder::new(base_url).expect("geocoder should build")
    }

    /// Serve one canned HTTP response on an ephemeral port.
    fn serve_once(status: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
        let addr = listener.local_addr().expect("local addr");
        thread::spawn(move || {
            if let Ok((mut stream, _)) = listener.accept() {
                let mut buf = [0_u8; 4096];
                let _ = stream.read(&mut buf);
                let response = format!(
                    "HTTP/1.1 {status}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                    body.len()
                );
                let _ = stream.write_all(response.as_bytes());
            }
        });
        format!("http://{addr}")
    }

    #[rstest]
    #[case("https://nominatim.example.com")]
    #[case("https://nominatim.example.com/")]
    fn search_url_includes_query_parameters(#[case] base: &str) {
        let url = geocoder(base).build_search_url("Rumtek Monastery");
        assert_eq!(
            url.as_str(),
            "https://nominatim.example.com/search?q=Rumtek+Monastery&format=json&limit=5"
        );
    }

    #[rstest]
    fn search_url_keeps_base_path() {
        let url = geocoder("http://localhost:8080/nominatim").build_search_url("Gangtok");
        assert_eq!(url.path(), "/nominatim/search");
    }

    #[rstest]
    fn malformed_base_url_is_rejected() {
        let err = NominatimGeocoder::new("not a url").expect_err("should fail");
        assert!(matches!(err, GeocoderBuildError::BaseUrl { .. }));
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    fn blank_query_is_rejected_without_request(#[case] query: &str) {
        // Port 9 is discard; a request would fail with a network error.
        let err = geocoder("http://127.0.0.1:9")
            .geocode(query)
            .expect_err("should fail");
        assert_eq!(err, GeocodeError::EmptyQuery);
    }

    #[rstest]
    fn config_builder_pattern() {
        let config = NominatimConfig::new("http://example.com")
            .with_timeout(Duration::from_secs(5))
            .with_user_agent("test-agent/1.0")
            .with_limit(0);

        assert_eq!(config.base_url, "http://example.com");
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.user_agent, "test-agent/1.0");
        assert_eq!(config.limit, 1);
    }

    #[rstest]
    fn successful_search_returns_places_in_order() {
        let base = serve_once(
            "200 OK",
            r#"[{"display_name":"Pelling, Sikkim","lat":"27.30","lon":"88.23","boundingbox":["27.28","27.32","88.21","88.25"]},
                {"display_name":"Pelling Helipad","lat":"27.31","lon":"88.24","boundingbox":["27.309","27.311","88.239","88.241"]}]"#,
        );
        let results = geocoder(&base).geocode("Pelling").expect("should succeed");
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].name, "Pelling, Sikkim");
        assert_eq!(results[0].bbox.west(), 88.21);
    }

    #[rstest]
    fn empty_answer_is_not_an_error() {
        let base = serve_once("200 OK", "[]");
        let results = geocoder(&base).geocode("Atlantis").expect("should succeed");
        assert!(results.is_empty());
    }

    #[rstest]
    fn server_error_maps_to_http_error() {
        let base = serve_once("503 Service Unavailable", "{}");
        let err = geocoder(&base).geocode("Gangtok").expect_err("should fail");
        assert!(matches!(err, GeocodeError::HttpError { status: 503, .. }));
    }

    #[rstest]
    fn malformed_body_maps_to_parse_error() {
        let base = serve_once("200 OK", r#"{"unexpected": true}"#);
        let err = geocoder(&base).geocode("Gangtok").expect_err("should fail");
        assert!(matches!(err, GeocodeError::ParseError { .. }));
    }
}
