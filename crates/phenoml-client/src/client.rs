//! Main client implementation.

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use serde::de::DeserializeOwned;
use serde::Serialize;
use url::Url;

use crate::api::{AuthApi, CohortApi};
use crate::error::{Error, ErrorResponse, Result};
use crate::types::{AuthToken, Credentials, FormattedResponse};

/// Production API endpoint.
pub const DEFAULT_BASE_URL: &str = "https://experiment.pheno.ml";

/// Default timeout for requests.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Cohort API client.
///
/// Each extraction call re-authenticates with the configured credentials;
/// the client holds no mutable session state and is safe to share across
/// tasks.
///
/// # Example
///
/// ```no_run
/// use phenoml_client::{CohortClient, Credentials};
///
/// # async fn example() -> phenoml_client::Result<()> {
/// let client = CohortClient::builder()
///     .credentials(Credentials::new("client-id", "client-secret"))
///     .build()?;
///
/// let cohort = client
///     .get_cohort_response("diabetic patients over 60", true, false)
///     .await?;
/// println!("{}", cohort.sql);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct CohortClient {
    /// Inner shared state.
    inner: Arc<ClientInner>,
}

/// Inner client state (shared across clones).
pub(crate) struct ClientInner {
    /// HTTP client.
    pub(crate) http: reqwest::Client,
    /// Base URL for API requests.
    pub(crate) base_url: Url,
    /// Credentials exchanged for a token on every call.
    pub(crate) credentials: Credentials,
    /// Request timeout.
    pub(crate) timeout: Duration,
}

impl CohortClient {
    /// Create a new client builder.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Create a client against the production endpoint.
    pub fn new(credentials: Credentials) -> Result<Self> {
        Self::builder().credentials(credentials).build()
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// Get the configured credentials (for API implementations).
    pub(crate) fn credentials(&self) -> &Credentials {
        &self.inner.credentials
    }

    // ─────────────────────────────────────────────────────────────────────────
    // API accessors
    // ─────────────────────────────────────────────────────────────────────────

    /// Access the authentication API.
    pub fn auth(&self) -> AuthApi {
        AuthApi::new(self.clone())
    }

    /// Access the cohort API.
    pub fn cohort(&self) -> CohortApi {
        CohortApi::new(self.clone())
    }

    /// Extract a cohort from a free-text query (convenience method).
    ///
    /// `verbose` mirrors onto both `include_rationale` and
    /// `include_extract_results`. See [`CohortApi::get_cohort_response`].
    pub async fn get_cohort_response(
        &self,
        text: impl Into<String>,
        exclude_deceased: bool,
        verbose: bool,
    ) -> Result<FormattedResponse> {
        self.cohort()
            .get_cohort_response(text, exclude_deceased, verbose)
            .await
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Internal HTTP methods
    // ─────────────────────────────────────────────────────────────────────────

    /// Build a URL for an API path.
    pub(crate) fn url(&self, path: &str) -> Result<Url> {
        let path = path.trim_start_matches('/');
        self.inner.base_url.join(path).map_err(Error::from)
    }

    /// Make a JSON POST request, optionally with a bearer token.
    pub(crate) async fn post_json<B>(
        &self,
        url: Url,
        body: &B,
        token: Option<&AuthToken>,
    ) -> Result<reqwest::Response>
    where
        B: Serialize + ?Sized,
    {
        let mut request = self
            .inner
            .http
            .post(url)
            .json(body)
            .timeout(self.inner.timeout);

        if let Some(token) = token {
            request = request.bearer_auth(token.as_str());
        }

        Ok(request.send().await?)
    }

    /// Decode a successful response body into a typed value.
    pub(crate) async fn decode<T: DeserializeOwned>(&self, response: reqwest::Response) -> Result<T> {
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| {
            tracing::warn!(error = %e, "failed to decode response body");
            Error::from(e)
        })
    }

    /// Extract a human-readable message from a failed response.
    pub(crate) async fn failure_message(&self, response: reqwest::Response) -> String {
        let status = response.status().as_u16();

        match response.text().await {
            Ok(body) => match serde_json::from_str::<ErrorResponse>(&body) {
                Ok(err) if !err.message.is_empty() => err.message,
                _ if !body.is_empty() => body,
                _ => format!("HTTP {}", status),
            },
            Err(_) => format!("HTTP {}", status),
        }
    }
}

/// Builder for creating a [`CohortClient`].
#[derive(Debug)]
pub struct ClientBuilder {
    base_url: String,
    credentials: Option<Credentials>,
    timeout: Duration,
    user_agent: Option<String>,
}

impl ClientBuilder {
    /// Create a new builder with defaults.
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            credentials: None,
            timeout: DEFAULT_TIMEOUT,
            user_agent: None,
        }
    }

    /// Override the base URL (defaults to the production endpoint).
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the API credentials.
    pub fn credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Set the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set a custom user agent.
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    /// Build the client.
    pub fn build(self) -> Result<CohortClient> {
        let credentials = self
            .credentials
            .ok_or_else(|| Error::Config("credentials are required".to_string()))?;

        // Parse and normalize base URL
        let mut base_url = Url::parse(&self.base_url)?;
        if !base_url.path().ends_with('/') {
            base_url.set_path(&format!("{}/", base_url.path()));
        }

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let user_agent = self
            .user_agent
            .unwrap_or_else(|| format!("phenoml-client/{}", env!("CARGO_PKG_VERSION")));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .user_agent(user_agent)
            .build()?;

        Ok(CohortClient {
            inner: Arc::new(ClientInner {
                http,
                base_url,
                credentials,
                timeout: self.timeout,
            }),
        })
    }
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
