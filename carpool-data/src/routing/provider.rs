//! HTTP-based `RouteProvider` using OSRM's Route API.

use std::time::Duration;

use carpool_core::{Coordinate, RouteCandidate, RouteMetrics, RouteProvider, RouteProviderError};
use geo::{Coord, LineString};
use log::debug;
use reqwest::Client;
use tokio::runtime::{Handle, Runtime, RuntimeFlavor};

use super::osrm::{OsrmRoute, RouteResponse};

/// Error type for [`HttpRouteProvider`] construction failures.
#[derive(Debug)]
pub enum ProviderBuildError {
    /// Failed to build the HTTP client.
    HttpClient(reqwest::Error),
    /// Failed to build the Tokio runtime.
    Runtime(std::io::Error),
}

impl std::fmt::Display for ProviderBuildError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::HttpClient(err) => write!(f, "failed to build HTTP client: {err}"),
            Self::Runtime(err) => write!(f, "failed to build Tokio runtime: {err}"),
        }
    }
}

impl std::error::Error for ProviderBuildError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::HttpClient(err) => Some(err),
            Self::Runtime(err) => Some(err),
        }
    }
}

/// Default user agent for OSRM requests.
pub const DEFAULT_USER_AGENT: &str = "carpool-routing/0.1";

/// Default OSRM endpoint.
pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";

/// Default OSRM routing profile.
pub const DEFAULT_PROFILE: &str = "driving";

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration for [`HttpRouteProvider`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRouteProviderConfig {
    /// Base URL for the OSRM service (e.g., `"http://localhost:5000"`).
    pub base_url: String,
    /// OSRM profile segment of the request path.
    pub profile: String,
    /// Request timeout duration.
    pub timeout: Duration,
    /// User agent string for requests.
    pub user_agent: String,
    /// Ask the service for alternative routes as well as the best one.
    pub alternatives: bool,
}

impl Default for HttpRouteProviderConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            profile: DEFAULT_PROFILE.to_owned(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_owned(),
            alternatives: false,
        }
    }
}

impl HttpRouteProviderConfig {
    /// Create a new configuration with the given base URL.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Set the request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the user agent string.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set the routing profile, e.g. `"driving"` or `"car"`.
    #[must_use]
    pub fn with_profile(mut self, profile: impl Into<String>) -> Self {
        self.profile = profile.into();
        self
    }

    /// Request alternative routes.
    #[must_use]
    pub const fn with_alternatives(mut self, alternatives: bool) -> Self {
        self.alternatives = alternatives;
        self
    }
}

/// HTTP-based route provider using the OSRM Route API.
///
/// This provider implements the synchronous [`RouteProvider`] trait by
/// internally blocking on asynchronous HTTP requests. It owns a Tokio
/// runtime that is reused across calls.
///
/// # Runtime behaviour
///
/// Outside any Tokio runtime the provider blocks on its own runtime. Inside
/// a multi-threaded runtime (detected via [`Handle::try_current()`] and
/// [`RuntimeFlavor::MultiThread`]) it uses that runtime's handle with
/// [`tokio::task::block_in_place`] to avoid nested runtime panics.
///
/// Inside a `current_thread` runtime the provider falls back to its own
/// runtime. This may deadlock if the caller's runtime drives IO or timers
/// that the request depends on.
///
/// Dropping the provider inside any Tokio runtime shuts its own runtime
/// down in the background rather than blocking the caller.
///
/// # Error mapping
///
/// | Failure                                  | Error                                 |
/// |------------------------------------------|---------------------------------------|
/// | Connection refused, DNS, TLS             | [`RouteProviderError::NetworkError`]  |
/// | Request exceeded the configured timeout  | [`RouteProviderError::Timeout`]       |
/// | Non-2xx status without an OSRM body      | [`RouteProviderError::HttpError`]     |
/// | OSRM `code` other than `"Ok"`            | [`RouteProviderError::ServiceError`]  |
/// | Undecodable body or invalid metrics      | [`RouteProviderError::ParseError`]    |
pub struct HttpRouteProvider {
    client: Client,
    config: HttpRouteProviderConfig,
    // Only `Drop` takes the runtime out.
    runtime: Option<Runtime>,
}

impl std::fmt::Debug for HttpRouteProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpRouteProvider")
            .field("client", &self.client)
            .field("config", &self.config)
            .field("runtime", &"<tokio::runtime::Runtime>")
            .finish()
    }
}

impl HttpRouteProvider {
    /// Create a new provider with default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client or Tokio runtime fails to build.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ProviderBuildError> {
        Self::with_config(HttpRouteProviderConfig::new(base_url))
    }

    /// Create a new provider with explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client or Tokio runtime fails to build.
    pub fn with_config(config: HttpRouteProviderConfig) -> Result<Self, ProviderBuildError> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .connect_timeout(config.timeout)
            .timeout(config.timeout)
            .build()
            .map_err(ProviderBuildError::HttpClient)?;
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(ProviderBuildError::Runtime)?;
        Ok(Self {
            client,
            config,
            runtime: Some(runtime),
        })
    }

    /// The active configuration.
    #[must_use]
    pub const fn config(&self) -> &HttpRouteProviderConfig {
        &self.config
    }

    /// Build the OSRM Route API URL.
    ///
    /// The path lists `start`, each waypoint and `end` as semicolon-separated
    /// `lon,lat` pairs.
    fn build_route_url(&self, start: Coordinate, end: Coordinate, waypoints: &[Coordinate]) -> String {
        let coords = std::iter::once(start)
            .chain(waypoints.iter().copied())
            .chain(std::iter::once(end))
            .map(|point| format!("{},{}", point.longitude, point.latitude))
            .collect::<Vec<_>>()
            .join(";");

        format!(
            "{}/route/v1/{}/{}?overview=full&geometries=geojson&steps=false&alternatives={}",
            self.config.base_url.trim_end_matches('/'),
            self.config.profile,
            coords,
            self.config.alternatives
        )
    }

    async fn fetch_routes_async(
        &self,
        start: Coordinate,
        end: Coordinate,
        waypoints: &[Coordinate],
    ) -> Result<Vec<RouteCandidate>, RouteProviderError> {
        let url = self.build_route_url(start, end, waypoints);
        debug!("requesting route with {} waypoints from {url}", waypoints.len());

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|err| self.convert_reqwest_error(&err, &url))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|err| self.convert_reqwest_error(&err, &url))?;

        if !status.is_success() {
            // OSRM reports domain failures such as `NoRoute` with a 4xx status
            // and a JSON body; anything else is a plain HTTP failure.
            return Err(match serde_json::from_str::<RouteResponse>(&body) {
                Ok(parsed) if !parsed.is_ok() => service_error(parsed),
                _ => RouteProviderError::HttpError {
                    url,
                    status: status.as_u16(),
                    message: status.to_string(),
                },
            });
        }

        let parsed: RouteResponse =
            serde_json::from_str(&body).map_err(|err| RouteProviderError::ParseError {
                message: err.to_string(),
            })?;
        let routes = convert_response(parsed)?;
        debug!("received {} route candidates from {url}", routes.len());
        Ok(routes)
    }

    /// Convert a reqwest error to a `RouteProviderError`.
    fn convert_reqwest_error(&self, error: &reqwest::Error, url: &str) -> RouteProviderError {
        if error.is_timeout() {
            return RouteProviderError::Timeout {
                url: url.to_owned(),
                timeout_secs: self.config.timeout.as_secs(),
            };
        }

        if let Some(status) = error.status() {
            return RouteProviderError::HttpError {
                url: url.to_owned(),
                status: status.as_u16(),
                message: error.to_string(),
            };
        }

        RouteProviderError::NetworkError {
            url: url.to_owned(),
            message: error.to_string(),
        }
    }
}

fn service_error(response: RouteResponse) -> RouteProviderError {
    RouteProviderError::ServiceError {
        code: response.code,
        message: response.message.unwrap_or_default(),
    }
}

/// Convert an OSRM response into route candidates, best first.
fn convert_response(response: RouteResponse) -> Result<Vec<RouteCandidate>, RouteProviderError> {
    if !response.is_ok() {
        return Err(service_error(response));
    }
    response.routes.into_iter().map(convert_route).collect()
}

fn convert_route(route: OsrmRoute) -> Result<RouteCandidate, RouteProviderError> {
    for (name, value) in [("distance", route.distance), ("duration", route.duration)] {
        if !(value.is_finite() && value >= 0.0) {
            return Err(RouteProviderError::ParseError {
                message: format!("OSRM route has invalid {name}: {value}"),
            });
        }
    }
    let geometry = route
        .geometry
        .coordinates
        .into_iter()
        .map(|[x, y]| Coord { x, y })
        .collect::<LineString<f64>>();
    Ok(RouteCandidate::new(
        geometry,
        RouteMetrics::new(route.distance, route.duration),
    ))
}

impl RouteProvider for HttpRouteProvider {
    /// Fetch candidate routes through the ordered stops.
    ///
    /// # Runtime requirements
    ///
    /// When called from within an existing Tokio runtime, the runtime must be
    /// multi-threaded (`flavor = "multi_thread"`). A `current_thread` caller
    /// falls back to the provider's own runtime, which blocks the caller's
    /// executor for the duration of the request.
    fn route_between(
        &self,
        start: Coordinate,
        end: Coordinate,
        waypoints: &[Coordinate],
    ) -> Result<Vec<RouteCandidate>, RouteProviderError> {
        let future = self.fetch_routes_async(start, end, waypoints);
        match Handle::try_current() {
            Ok(handle) if handle.runtime_flavor() == RuntimeFlavor::MultiThread => {
                tokio::task::block_in_place(|| handle.block_on(future))
            }
            _ => match &self.runtime {
                Some(runtime) => runtime.block_on(future),
                None => Err(RouteProviderError::NetworkError {
                    url: self.build_route_url(start, end, waypoints),
                    message: "provider runtime has been shut down".to_owned(),
                }),
            },
        }
    }
}

impl Drop for HttpRouteProvider {
    fn drop(&mut self) {
        // A runtime dropped from async context panics while blocking on its
        // worker threads.
        if let Some(runtime) = self.runtime.take()
            && Handle::try_current().is_ok()
        {
            runtime.shutdown_background();
        }
    }
}
