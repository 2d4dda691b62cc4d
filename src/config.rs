use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::ConfigError;
use crate::util::is_https;

/// Base URL of the public ArcGIS portal of Antwerpen.
pub const DEFAULT_BASE_URL: &str = "https://geodata.antwerpen.be/arcgissql/rest/services/P_Portal/";

/// Default request timeout, covering connect, headers and body.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Scheme, host and base path that request URIs are joined onto.
    pub base_url: String,
    /// Time allowed for one request, from connecting until the body is read.
    pub request_timeout: Duration,
    /// Whether internally created sessions verify TLS certificates.
    pub verify: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout: DEFAULT_TIMEOUT,
            verify: true,
        }
    }
}

#[derive(Debug, Default, PartialEq)]
struct RcConfig {
    url: Option<String>,
    timeout: Option<String>,
    verify: Option<bool>,
}

/// Resolves the client configuration from environment variables
/// (`ODP_ANTWERPEN_URL`, `ODP_ANTWERPEN_TIMEOUT`, `ODP_ANTWERPEN_VERIFY`),
/// then the first `.antwerpenrc` found, then built-in defaults.
pub(crate) fn load_config() -> Result<ClientConfig, ConfigError> {
    load_config_with(|name| std::env::var(name).ok())
}

fn load_config_with<F>(lookup: F) -> Result<ClientConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let env = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
    resolve(
        env("ODP_ANTWERPEN_URL"),
        env("ODP_ANTWERPEN_TIMEOUT"),
        env("ODP_ANTWERPEN_VERIFY").map(|v| parse_bool(&v)),
        &rc_candidates(env("ODP_ANTWERPEN_RC")),
    )
}

fn resolve(
    url: Option<String>,
    timeout: Option<String>,
    verify: Option<bool>,
    rc_candidates: &[PathBuf],
) -> Result<ClientConfig, ConfigError> {
    let mut rc = RcConfig::default();
    if url.is_none() || timeout.is_none() || verify.is_none() {
        if let Some(rc_path) = rc_candidates.iter().find(|p| p.exists()) {
            rc = read_rc(rc_path)?;
            tracing::debug!(path = %rc_path.display(), "loaded configuration file");
        }
    }

    let defaults = ClientConfig::default();
    let request_timeout = match timeout.or(rc.timeout) {
        Some(value) => parse_timeout(&value)?,
        None => defaults.request_timeout,
    };

    let base_url = match url.or(rc.url) {
        Some(url) => {
            if !is_https(&url) {
                tracing::warn!(
                    %url,
                    "configured base URL does not use https, requests will not be encrypted"
                );
            }
            url
        }
        None => defaults.base_url,
    };

    Ok(ClientConfig {
        base_url,
        request_timeout,
        verify: verify.or(rc.verify).unwrap_or(defaults.verify),
    })
}

fn read_rc(path: &Path) -> Result<RcConfig, ConfigError> {
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadRc {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(parse_rc(&text))
}

fn parse_rc(text: &str) -> RcConfig {
    let mut cfg = RcConfig::default();

    // A key with an empty value takes its value from the next line.
    let mut pending_key: Option<&str> = None;

    for raw in text.lines() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if let Some(pk) = pending_key.take() {
            if !line.contains(':') {
                set_rc_value(&mut cfg, pk, strip_quotes(line));
                continue;
            }
        }

        // Split on the first ':' only, URLs carry their own colons.
        if let Some((k, v)) = line.split_once(':') {
            let k = k.trim();
            let v = strip_quotes(v.trim());
            if v.is_empty() {
                pending_key = Some(k);
            } else {
                set_rc_value(&mut cfg, k, v);
            }
        }
    }

    cfg
}

fn set_rc_value(cfg: &mut RcConfig, key: &str, value: &str) {
    match key {
        "url" => cfg.url = Some(value.to_string()),
        "timeout" => cfg.timeout = Some(value.to_string()),
        "verify" => cfg.verify = Some(parse_bool(value)),
        _ => {}
    }
}

fn parse_bool(value: &str) -> bool {
    !matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "0" | "false" | "no" | "off"
    )
}

fn parse_timeout(value: &str) -> Result<Duration, ConfigError> {
    let invalid = || ConfigError::InvalidTimeout {
        value: value.to_string(),
    };
    let secs: f64 = value.trim().parse().map_err(|_| invalid())?;
    if !secs.is_finite() || secs <= 0.0 {
        return Err(invalid());
    }
    Duration::try_from_secs_f64(secs).map_err(|_| invalid())
}

fn strip_quotes(s: &str) -> &str {
    let s = s.trim();
    if (s.starts_with('"') && s.ends_with('"') && s.len() >= 2)
        || (s.starts_with('\'') && s.ends_with('\'') && s.len() >= 2)
    {
        &s[1..s.len() - 1]
    } else {
        s
    }
}

fn rc_candidates(explicit: Option<String>) -> Vec<PathBuf> {
    // 1) ODP_ANTWERPEN_RC (explicit)
    // 2) ./.antwerpenrc
    // 3) ~/.antwerpenrc
    if let Some(p) = explicit {
        return vec![PathBuf::from(p)];
    }

    let mut v = Vec::new();
    if let Ok(cwd) = std::env::current_dir() {
        v.push(cwd.join(".antwerpenrc"));
    }
    if let Some(home) = dirs::home_dir() {
        v.push(home.join(".antwerpenrc"));
    }
    v
}
