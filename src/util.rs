/// Media type the portal uses for GeoJSON responses.
pub(crate) const GEOJSON_CONTENT_TYPE: &str = "application/geo+json";

pub(crate) fn user_agent() -> String {
    format!("RustODPAntwerpen/{}", env!("CARGO_PKG_VERSION"))
}

/// Joins a relative `uri` onto `base`, keeping the base path.
pub(crate) fn urljoin(base: &str, uri: &str) -> String {
    let base = base.trim_end_matches('/');
    let uri = uri.trim_start_matches('/');
    if uri.is_empty() {
        format!("{}/", base)
    } else {
        format!("{}/{}", base, uri)
    }
}

pub(crate) fn is_https(url: &str) -> bool {
    url.get(..8).is_some_and(|scheme| scheme.eq_ignore_ascii_case("https://"))
}

pub(crate) fn is_geojson(content_type: &str) -> bool {
    content_type.contains(GEOJSON_CONTENT_TYPE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_BASE_URL;

    #[test]
    fn urljoin_keeps_base_path() {
        assert_eq!(
            urljoin(DEFAULT_BASE_URL, "portal_publiek6/MapServer/585/query"),
            "https://geodata.antwerpen.be/arcgissql/rest/services/P_Portal/portal_publiek6/MapServer/585/query"
        );
        assert_eq!(urljoin("http://localhost:1234/base", "/test"), "http://localhost:1234/base/test");
        assert_eq!(urljoin("http://localhost:1234/base/", ""), "http://localhost:1234/base/");
    }

    #[test]
    fn geojson_content_type_allows_parameters() {
        assert!(is_geojson("application/geo+json"));
        assert!(is_geojson("application/geo+json; charset=utf-8"));
        assert!(!is_geojson("application/json"));
        assert!(!is_geojson("text/plain"));
        assert!(!is_geojson(""));
    }

    #[test]
    fn https_detection() {
        assert!(is_https(DEFAULT_BASE_URL));
        assert!(is_https("HTTPS://geodata.antwerpen.be/"));
        assert!(!is_https("http://geodata.antwerpen.be/"));
        assert!(!is_https("geodata.antwerpen.be"));
        assert!(!is_https(""));
    }

    #[test]
    fn user_agent_carries_crate_version() {
        assert!(user_agent().ends_with(env!("CARGO_PKG_VERSION")));
        assert!(user_agent().starts_with("RustODPAntwerpen/"));
    }
}
