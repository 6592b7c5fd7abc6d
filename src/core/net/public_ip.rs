use reqwest::Client;
use serde::Deserialize;
use tracing::warn;

use crate::core::error::ServerResult;

pub const PUBLIC_IP_URL: &str = "https://api.ipify.org?format=json";

/// Shown instead of an address when the lookup fails for any reason.
pub const PUBLIC_IP_UNAVAILABLE: &str = "Unable to determine public IP";

#[derive(Debug, Deserialize)]
struct IpResponse {
    ip: String,
}

/// Looks up the address players use to reach this machine.
#[derive(Debug, Clone)]
pub struct PublicIpLookup {
    client: Client,
    url: String,
}

impl PublicIpLookup {
    pub fn new(client: Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }

    /// The public IPv4 address, or [`PUBLIC_IP_UNAVAILABLE`].
    pub async fn public_ip(&self) -> String {
        match self.fetch().await {
            Ok(ip) => ip,
            Err(e) => {
                warn!("Public IP lookup failed: {}", e);
                PUBLIC_IP_UNAVAILABLE.to_string()
            }
        }
    }

    async fn fetch(&self) -> ServerResult<String> {
        let response: IpResponse = self
            .client
            .get(&self.url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(response.ip)
    }
}
