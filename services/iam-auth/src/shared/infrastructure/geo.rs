//! IP geolocation
//!
//! Lookups are best-effort: private addresses never leave the process, and any
//! error or timeout degrades to an empty label.

use std::net::IpAddr;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, warn};
use warden_errors::{AppError, AppResult};

pub const INTRANET_LOCATION: &str = "Intranet IP";

#[async_trait]
pub trait GeoIpResolver: Send + Sync {
    /// Human readable location such as `"Guangdong Shenzhen"`.
    async fn resolve(&self, ip: &str) -> AppResult<String>;
}

/// Loopback, private, link-local and unique-local addresses.
pub fn is_internal_ip(ip: &str) -> bool {
    match ip.trim().parse::<IpAddr>() {
        Ok(IpAddr::V4(v4)) => {
            v4.is_loopback() || v4.is_private() || v4.is_link_local() || v4.is_unspecified()
        }
        Ok(IpAddr::V6(v6)) => {
            v6.is_loopback()
                || v6.is_unspecified()
                || (v6.segments()[0] & 0xfe00) == 0xfc00
                || (v6.segments()[0] & 0xffc0) == 0xfe80
        }
        Err(_) => false,
    }
}

/// Resolve with a deadline; never fails.
pub async fn resolve_location(resolver: &dyn GeoIpResolver, ip: &str, timeout: Duration) -> String {
    if ip.is_empty() {
        return String::new();
    }
    if is_internal_ip(ip) {
        return INTRANET_LOCATION.to_string();
    }

    match tokio::time::timeout(timeout, resolver.resolve(ip)).await {
        Ok(Ok(location)) => location,
        Ok(Err(e)) => {
            warn!(ip, error = %e, "Geo-IP lookup failed");
            String::new()
        }
        Err(_) => {
            warn!(ip, timeout_ms = timeout.as_millis() as u64, "Geo-IP lookup timed out");
            String::new()
        }
    }
}

/// Used when geolocation is disabled.
#[derive(Debug, Default, Clone)]
pub struct NoopGeoIpResolver;

#[async_trait]
impl GeoIpResolver for NoopGeoIpResolver {
    async fn resolve(&self, _ip: &str) -> AppResult<String> {
        Ok(String::new())
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IpApiResponse {
    status: String,
    #[serde(default)]
    region_name: String,
    #[serde(default)]
    city: String,
}

/// HTTP lookup against an ip-api compatible endpoint (`{endpoint}/{ip}`).
#[derive(Debug, Clone)]
pub struct HttpGeoIpResolver {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpGeoIpResolver {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::internal(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self {
            client,
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl GeoIpResolver for HttpGeoIpResolver {
    async fn resolve(&self, ip: &str) -> AppResult<String> {
        let url = format!("{}/{}", self.endpoint, ip);
        let response: IpApiResponse = self
            .client
            .get(&url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| AppError::external_service(format!("Geo-IP request failed: {}", e)))?
            .json()
            .await
            .map_err(|e| AppError::external_service(format!("Geo-IP response invalid: {}", e)))?;

        if response.status != "success" {
            debug!(ip, status = %response.status, "Geo-IP lookup returned no data");
            return Ok(String::new());
        }
        Ok(format!("{} {}", response.region_name, response.city)
            .trim()
            .to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct SlowResolver;

    #[async_trait]
    impl GeoIpResolver for SlowResolver {
        async fn resolve(&self, _ip: &str) -> AppResult<String> {
            tokio::time::sleep(Duration::from_secs(30)).await;
            Ok("Far Away".into())
        }
    }

    struct FailingResolver;

    #[async_trait]
    impl GeoIpResolver for FailingResolver {
        async fn resolve(&self, _ip: &str) -> AppResult<String> {
            Err(AppError::external_service("lookup down"))
        }
    }

    #[test]
    fn test_internal_ip_detection() {
        assert!(is_internal_ip("127.0.0.1"));
        assert!(is_internal_ip("10.1.2.3"));
        assert!(is_internal_ip("192.168.0.8"));
        assert!(is_internal_ip("::1"));
        assert!(is_internal_ip("fd00::1"));
        assert!(!is_internal_ip("8.8.8.8"));
        assert!(!is_internal_ip("not-an-ip"));
    }

    #[tokio::test]
    async fn test_intranet_skips_lookup() {
        let location = resolve_location(&FailingResolver, "192.168.1.10", Duration::from_secs(1)).await;
        assert_eq!(location, INTRANET_LOCATION);
    }

    #[tokio::test]
    async fn test_failure_yields_empty_label() {
        let location = resolve_location(&FailingResolver, "8.8.8.8", Duration::from_secs(1)).await;
        assert_eq!(location, "");
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_yields_empty_label() {
        let location = resolve_location(&SlowResolver, "8.8.8.8", Duration::from_millis(200)).await;
        assert_eq!(location, "");
    }
}
