use std::path::PathBuf;

use log::{debug, info};
use thiserror::Error;
use url::Url;

use crate::{
    model::descriptor::{Application, Identity},
    store::{Activity, IdentityStore, ProxyStore, Settings, INSECURE_ENABLED},
    workspace,
};

use super::{
    auth::CredentialInjector,
    command::{CommandError, CommandRunner, Mode, SvnCommand},
    effective_url::{effective_url, parse_repository_url},
    proxy::ProxyResolver,
    servers::write_servers_file,
};

/// Identity kind used for repository credentials.
pub const SOURCE_IDENTITY_KIND: &str = "source";

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Invalid repository URL {url}: {source}")]
    InvalidUrl {
        url: String,
        source: url::ParseError,
    },
    #[error("http URL {url} used with svn.insecure.enabled = false")]
    InsecureTransport { url: String },
    #[error("Subversion servers file {path} already exists")]
    ServersFileExists { path: PathBuf },
    #[error("No credential cache file in {dir} after authenticating")]
    MissingAuthCache { dir: PathBuf },
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error(transparent)]
    Command(#[from] CommandError),
    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

impl FetchError {
    /// Policy errors are reported to the user as is; retrying without a
    /// change to the settings or the workspace cannot succeed.
    pub fn is_policy(&self) -> bool {
        matches!(
            self,
            FetchError::InvalidUrl { .. }
                | FetchError::InsecureTransport { .. }
                | FetchError::ServersFileExists { .. }
        )
    }
}

/// Everything a fetch reads from or reports to.
#[derive(Clone, Copy)]
pub struct Collaborators<'a> {
    pub settings: &'a dyn Settings,
    pub identities: &'a dyn IdentityStore,
    pub proxies: &'a dyn ProxyStore,
    pub activity: &'a dyn Activity,
    pub runner: &'a dyn CommandRunner,
}

/// Filesystem locations of a fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    /// Home directory of the client; `.subversion` is created below it.
    pub home: PathBuf,
    /// Checkout destination. Removed before every fetch.
    pub source_dir: PathBuf,
    /// Path of the `svn` binary.
    pub client: PathBuf,
}

/// Checkout of one application's Subversion repository.
///
/// Steps run in order and stop at the first failure. Nothing written by an
/// earlier step is rolled back; the `.subversion` directory below the home
/// directory survives failed runs and must be cleared by the caller for a
/// clean retry.
pub struct Subversion<'a> {
    application: &'a Application,
    layout: &'a Layout,
    ctx: Collaborators<'a>,
}

impl<'a> Subversion<'a> {
    pub fn new(application: &'a Application, layout: &'a Layout, ctx: Collaborators<'a>) -> Self {
        Subversion {
            application,
            layout,
            ctx,
        }
    }

    pub fn url(&self) -> Result<Url, FetchError> {
        effective_url(&self.application.repository)
    }

    fn insecure(&self) -> Result<bool, FetchError> {
        Ok(self.ctx.settings.bool(INSECURE_ENABLED)?)
    }

    /// Rejects URLs that do not parse, and plain `http` unless insecure
    /// transport is enabled.
    pub fn validate(&self) -> Result<(), FetchError> {
        let repository = &self.application.repository;
        let url = parse_repository_url(repository)?;
        if url.scheme() == "http" && !self.insecure()? {
            return Err(FetchError::InsecureTransport {
                url: repository.url.clone(),
            });
        }
        debug!("Repository URL {} is valid", repository.url);
        Ok(())
    }

    pub fn fetch(&self) -> Result<(), FetchError> {
        self.validate()?;

        let url = self.url()?;
        workspace::remove_dir(&self.layout.source_dir);
        self.ctx.activity.note(&format!("[SVN] Cloning: {url}"));

        let identity = self
            .ctx
            .identities
            .find_identity(self.application.id, SOURCE_IDENTITY_KIND)?;
        match &identity {
            Some(identity) => self.ctx.activity.note(&format!(
                "[SVN] Using credentials ({}) {}.",
                identity.id, identity.name
            )),
            None => debug!("No source identity, checking out anonymously"),
        }

        self.write_config()?;
        if let Some(identity) = &identity {
            self.write_password(identity)?;
        }

        let checkout = SvnCommand::checkout(
            &self.layout.client,
            &self.layout.home,
            &self.url()?,
            &self.layout.source_dir,
            self.insecure()?,
        );
        info!("Running {checkout}");
        self.ctx.runner.run(&checkout, Mode::Normal)?;
        Ok(())
    }

    fn write_config(&self) -> Result<PathBuf, FetchError> {
        let resolver = ProxyResolver {
            proxies: self.ctx.proxies,
            identities: self.ctx.identities,
            activity: self.ctx.activity,
        };
        write_servers_file(&self.layout.home, || resolver.resolve(&self.url()?))
    }

    fn write_password(&self, identity: &Identity) -> Result<bool, FetchError> {
        let injector = CredentialInjector {
            client: &self.layout.client,
            home: &self.layout.home,
            runner: self.ctx.runner,
        };
        injector.inject(&self.url()?, identity)
    }
}
