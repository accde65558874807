use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// Which traffic a forward proxy applies to.
#[derive(PartialEq, Eq, Hash, Debug, Clone, Copy, Serialize, Deserialize, Ord, PartialOrd)]
pub enum ProxyKind {
    #[serde(rename = "http")]
    Http,
    #[serde(rename = "https")]
    Https,
}

impl Display for ProxyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            ProxyKind::Http => f.write_str("http"),
            ProxyKind::Https => f.write_str("https"),
        }
    }
}

/// A forward proxy configured for one [`ProxyKind`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProxyPolicy {
    pub id: u64,
    pub kind: ProxyKind,
    #[serde(default)]
    pub enabled: bool,
    pub host: String,
    /// Zero means "use the client's default port".
    #[serde(default)]
    pub port: u16,
    /// Hosts that bypass the proxy.
    #[serde(default)]
    pub excluded: Vec<String>,
    /// Identity holding the proxy credentials, if the proxy requires any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identity: Option<u64>,
}
