use std::{fmt::Debug, path::Path};

use anyhow::anyhow;
use log::{debug, error};
use serde::{Deserialize, Serialize};

use crate::{
    model::{
        proxy::{ProxyKind, ProxyPolicy},
        ParseError,
    },
    store::{IdentityStore, ProxyStore},
};

/// Where the sources live.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryRef {
    pub url: String,
    /// Branch, tag or any other path below the repository root.
    /// Empty means `trunk`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
}

/// The entity a checkout is performed for. Owns the repository reference
/// and the identities it may use.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Application {
    pub id: u64,
    pub name: String,
    pub repository: RepositoryRef,
    #[serde(default)]
    pub identities: Vec<u64>,
}

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: u64,
    pub name: String,
    /// Purpose of the identity, e.g. `source` or `proxy`.
    pub kind: String,
    #[serde(default)]
    pub user: String,
    #[serde(default)]
    pub password: String,
}

impl Identity {
    /// Both a user and a password are present.
    pub fn has_credentials(&self) -> bool {
        !self.user.is_empty() && !self.password.is_empty()
    }
}

impl Debug for Identity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Identity")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Contents of an `svnfetch.toml` file: the application to check out plus
/// the identities and proxies available to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Descriptor {
    pub application: Application,
    #[serde(rename = "identity", default)]
    pub identities: Vec<Identity>,
    #[serde(rename = "proxy", default)]
    pub proxies: Vec<ProxyPolicy>,
}

impl Descriptor {
    pub fn from_file(path: &Path) -> Result<Descriptor, ParseError> {
        debug!("Attempting to read descriptor from {}", path.display());
        let contents = std::fs::read_to_string(path)?;

        let descriptor = Descriptor::from_toml_str(&contents);
        if let Err(err) = &descriptor {
            error!(
                "Could not build a valid descriptor from {} due to err {err}",
                path.display()
            )
        }
        descriptor
    }

    pub fn from_toml_str(data: &str) -> Result<Descriptor, ParseError> {
        let descriptor = toml::from_str::<Descriptor>(data)?;

        for id in &descriptor.application.identities {
            if !descriptor.identities.iter().any(|identity| identity.id == *id) {
                return Err(ParseError::DanglingIdentity {
                    application: descriptor.application.name.clone(),
                    identity: *id,
                });
            }
        }

        Ok(descriptor)
    }
}

impl IdentityStore for Descriptor {
    fn find_identity(&self, owner: u64, kind: &str) -> anyhow::Result<Option<Identity>> {
        if owner != self.application.id {
            debug!("Application {owner} is not described, no identities available");
            return Ok(None);
        }
        let found = self
            .application
            .identities
            .iter()
            .filter_map(|id| self.identities.iter().find(|identity| identity.id == *id))
            .find(|identity| identity.kind == kind)
            .cloned();
        Ok(found)
    }

    fn get_identity(&self, id: u64) -> anyhow::Result<Identity> {
        self.identities
            .iter()
            .find(|identity| identity.id == id)
            .cloned()
            .ok_or_else(|| anyhow!("Identity {id} not found"))
    }
}

impl ProxyStore for Descriptor {
    fn find_proxy(&self, kind: ProxyKind) -> anyhow::Result<Option<ProxyPolicy>> {
        Ok(self.proxies.iter().find(|proxy| proxy.kind == kind).cloned())
    }
}
