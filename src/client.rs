use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderValue, USER_AGENT};
use reqwest::{Client as HttpClient, Method};
use serde_json::Value;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use crate::config::{ClientConfig, load_config};
use crate::error::{ConnectionError, DataError, Result};
use crate::models::{DisabledParking, FeatureCollection};
use crate::util::{GEOJSON_CONTENT_TYPE, is_geojson, urljoin, user_agent};

/// Layer holding the disabled parking spaces.
const DISABLED_PARKING_URI: &str = "portal_publiek6/MapServer/585/query";

/// Result offsets fetched by [`Client::disabled_parkings`], in output order.
const PAGE_OFFSETS: [u32; 2] = [0, 1000];

/// Default number of records returned by [`Client::disabled_parkings`].
pub const DEFAULT_LIMIT: usize = 10;

#[derive(Debug)]
struct Session {
    http: HttpClient,
    /// Created by this client, and therefore released by [`Client::close`].
    owned: bool,
}

/// Client for the Open Data Platform API of Antwerpen.
///
/// Without an explicit session the client creates its own `reqwest::Client`
/// on first use and releases it in [`Client::close`] (or on drop); a later
/// request opens a new one. A session handed in through
/// [`Client::with_session`] is never closed by the client.
#[derive(Debug)]
pub struct Client {
    config: ClientConfig,
    session: Mutex<Option<Session>>,
}

impl Default for Client {
    fn default() -> Self {
        Self::new(ClientConfig::default())
    }
}

impl Client {
    pub fn new(config: ClientConfig) -> Self {
        Self {
            config,
            session: Mutex::new(None),
        }
    }

    /// Creates a client configured from `ODP_ANTWERPEN_*` environment
    /// variables and/or an `.antwerpenrc` file, falling back to defaults.
    pub fn from_env() -> Result<Self> {
        Ok(Self::new(load_config()?))
    }

    /// Uses a caller-owned HTTP session. The caller stays responsible for it.
    pub fn with_session(self, http: HttpClient) -> Self {
        *lock(&self.session) = Some(Session { http, owned: false });
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.config.request_timeout = timeout;
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.config.base_url = base_url.into();
        self
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Handle a request to the Open Data Platform API of Antwerpen.
    ///
    /// `uri` is relative to the portal base URL, for example
    /// `"portal_publiek6/MapServer/585/query"`. The whole exchange, body
    /// included, is bounded by the configured request timeout.
    ///
    /// Fails with a connection error on timeouts, transport failures and
    /// non-2xx replies, and with a data error when the reply is not
    /// `application/geo+json` or its body is not JSON.
    pub async fn request(
        &self,
        uri: &str,
        method: Method,
        params: &[(&str, String)],
    ) -> Result<Value> {
        let url = urljoin(&self.config.base_url, uri);
        let http = self.http()?;

        tracing::debug!(%method, %url, ?params, "requesting Open Data Platform API");

        let response = http
            .request(method, &url)
            .query(params)
            .header(ACCEPT, HeaderValue::from_static(GEOJSON_CONTENT_TYPE))
            .header(USER_AGENT, user_agent())
            .timeout(self.config.request_timeout)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(ConnectionError::from_reqwest)?;

        // Non-ASCII bytes are kept (lossily) so the error still shows them.
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned())
            .unwrap_or_default();

        let text = response.text().await.map_err(ConnectionError::from_reqwest)?;

        if !is_geojson(&content_type) {
            tracing::warn!(%url, %content_type, "unexpected content type");
            return Err(DataError::UnexpectedContentType {
                content_type,
                body: text,
            }
            .into());
        }

        Ok(serde_json::from_str(&text).map_err(DataError::InvalidJson)?)
    }

    /// Shorthand for a `GET` [`Client::request`].
    pub async fn get(&self, uri: &str, params: &[(&str, String)]) -> Result<Value> {
        self.request(uri, Method::GET, params).await
    }

    /// Get all disabled parking spaces, truncated to the first `limit` entries.
    ///
    /// Both result pages are always fetched, one after the other, and the
    /// records keep the order in which the API returned them.
    pub async fn disabled_parkings(&self, limit: usize) -> Result<Vec<DisabledParking>> {
        let mut results = Vec::new();
        for offset in PAGE_OFFSETS {
            let params = [
                ("where", "1=1".to_string()),
                ("resultOffset", offset.to_string()),
                ("outFields", "*".to_string()),
                ("f", "geojson".to_string()),
            ];
            let page = self.get(DISABLED_PARKING_URI, &params).await?;
            let page: FeatureCollection =
                serde_json::from_value(page).map_err(DataError::InvalidFeatureCollection)?;

            tracing::debug!(offset, features = page.features.len(), "received page");
            results.extend(page.features.iter().map(DisabledParking::from_feature));
        }
        results.truncate(limit);
        Ok(results)
    }

    /// Close the client session if it was created by this client.
    ///
    /// Calling this again, or on a client using a caller-supplied session,
    /// does nothing. A request made after closing opens a fresh owned
    /// session, which needs its own `close()`.
    pub fn close(&self) {
        let mut session = lock(&self.session);
        if session.as_ref().is_some_and(|s| s.owned) {
            *session = None;
            tracing::debug!("closed internal HTTP session");
        }
    }

    /// Returns the session to use, creating an owned one on first use.
    fn http(&self) -> Result<HttpClient> {
        let mut session = lock(&self.session);
        if let Some(s) = session.as_ref() {
            return Ok(s.http.clone());
        }

        let http = HttpClient::builder()
            .danger_accept_invalid_certs(!self.config.verify)
            .build()
            .map_err(ConnectionError::Transport)?;
        tracing::debug!("created internal HTTP session");

        *session = Some(Session {
            http: http.clone(),
            owned: true,
        });
        Ok(http)
    }
}

// The guarded value is a plain handle, so a poisoned lock is still usable.
fn lock(session: &Mutex<Option<Session>>) -> MutexGuard<'_, Option<Session>> {
    session.lock().unwrap_or_else(PoisonError::into_inner)
}
