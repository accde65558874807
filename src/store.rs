//! Collaborators a fetch reads from or reports to.
//!
//! The fetch never reaches for process-wide state: settings, identities,
//! proxies and the activity log are handed to it through these traits so it
//! can be driven by the descriptor file, by a hub client or by test fakes.

use log::info;

use crate::model::{
    descriptor::Identity,
    proxy::{ProxyKind, ProxyPolicy},
};

/// Allows plain `http` repository URLs and makes checkouts trust the server
/// certificate.
pub const INSECURE_ENABLED: &str = "svn.insecure.enabled";

pub trait Settings {
    fn bool(&self, key: &str) -> anyhow::Result<bool>;
}

pub trait IdentityStore {
    /// Identity of the given kind owned by `owner`, if there is one.
    fn find_identity(&self, owner: u64, kind: &str) -> anyhow::Result<Option<Identity>>;

    fn get_identity(&self, id: u64) -> anyhow::Result<Identity>;
}

pub trait ProxyStore {
    fn find_proxy(&self, kind: ProxyKind) -> anyhow::Result<Option<ProxyPolicy>>;
}

/// Human readable progress notes. Best effort, never fails.
pub trait Activity {
    fn note(&self, message: &str);
}

/// Reports activity through the log facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogActivity;

impl Activity for LogActivity {
    fn note(&self, message: &str) {
        info!("{message}");
    }
}
