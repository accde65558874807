use log::debug;
use url::Url;

use crate::{
    model::{
        descriptor::Identity,
        proxy::{ProxyKind, ProxyPolicy},
    },
    store::{Activity, IdentityStore, ProxyStore},
};

use super::FetchError;

/// Proxy kind serving the URL's scheme. Schemes other than `http` and
/// `https` never go through a proxy.
pub fn proxy_kind(url: &Url) -> Option<ProxyKind> {
    match url.scheme() {
        "http" => Some(ProxyKind::Http),
        "https" => Some(ProxyKind::Https),
        _ => None,
    }
}

/// Whether the URL's host, with or without its port, is on the policy's
/// exclusion list.
pub fn is_excluded(policy: &ProxyPolicy, url: &Url) -> bool {
    let Some(host) = url.host_str() else {
        return false;
    };
    let host_port = url.port().map(|port| format!("{host}:{port}"));
    policy.excluded.iter().any(|excluded| {
        excluded.eq_ignore_ascii_case(host)
            || host_port
                .as_deref()
                .is_some_and(|host_port| excluded.eq_ignore_ascii_case(host_port))
    })
}

/// The `[global]` section of the client's `servers` file for `policy`.
pub fn render_servers_block(policy: &ProxyPolicy, credentials: Option<&Identity>) -> String {
    let mut block = String::from("[global]\n");
    block.push_str(&format!("http-proxy-host = {}\n", policy.host));
    if policy.port > 0 {
        block.push_str(&format!("http-proxy-port = {}\n", policy.port));
    }
    if let Some(identity) = credentials {
        block.push_str(&format!("http-proxy-username = {}\n", identity.user));
        block.push_str(&format!("http-proxy-password = {}\n", identity.password));
    }
    block.push_str(&format!(
        "http-proxy-exceptions = {}\n",
        policy.excluded.join(", ")
    ));
    block
}

pub struct ProxyResolver<'a> {
    pub proxies: &'a dyn ProxyStore,
    pub identities: &'a dyn IdentityStore,
    pub activity: &'a dyn Activity,
}

impl ProxyResolver<'_> {
    /// Proxy configuration for `url`, or an empty string when no proxy
    /// applies.
    pub fn resolve(&self, url: &Url) -> Result<String, FetchError> {
        let Some(kind) = proxy_kind(url) else {
            debug!("No proxy kind for scheme {}", url.scheme());
            return Ok(String::new());
        };
        let policy = match self.proxies.find_proxy(kind)? {
            Some(policy) if policy.enabled => policy,
            Some(_) => {
                debug!("The {kind} proxy is disabled");
                return Ok(String::new());
            }
            None => {
                debug!("No {kind} proxy configured");
                return Ok(String::new());
            }
        };
        if is_excluded(&policy, url) {
            debug!(
                "{} is excluded from the {kind} proxy",
                url.host_str().unwrap_or_default()
            );
            return Ok(String::new());
        }

        self.activity
            .note(&format!("[SVN] Using proxy ({}) {}.", policy.id, policy.kind));

        let credentials = match policy.identity {
            Some(id) => Some(self.identities.get_identity(id)?),
            None => None,
        };
        Ok(render_servers_block(&policy, credentials.as_ref()))
    }
}
