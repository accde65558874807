use std::cell::RefCell;

use anyhow::anyhow;

use crate::{
    model::{
        descriptor::Identity,
        proxy::{ProxyKind, ProxyPolicy},
    },
    store::{Activity, IdentityStore, ProxyStore, Settings, INSECURE_ENABLED},
};

use super::{
    auth::auth_cache_dir,
    command::{CommandError, CommandRunner, Mode, SvnCommand},
};

pub struct FakeSettings {
    pub insecure: bool,
}

impl Settings for FakeSettings {
    fn bool(&self, key: &str) -> anyhow::Result<bool> {
        match key {
            INSECURE_ENABLED => Ok(self.insecure),
            _ => Err(anyhow!("unknown setting {key}")),
        }
    }
}

#[derive(Default)]
pub struct FakeIdentities {
    source: Option<Identity>,
    others: Vec<Identity>,
}

impl FakeIdentities {
    pub fn with(source: Option<Identity>, others: Vec<Identity>) -> Self {
        FakeIdentities { source, others }
    }
}

impl IdentityStore for FakeIdentities {
    fn find_identity(&self, _owner: u64, kind: &str) -> anyhow::Result<Option<Identity>> {
        Ok(self.source.clone().filter(|identity| identity.kind == kind))
    }

    fn get_identity(&self, id: u64) -> anyhow::Result<Identity> {
        self.others
            .iter()
            .find(|identity| identity.id == id)
            .cloned()
            .ok_or_else(|| anyhow!("identity {id} not found"))
    }
}

pub struct FakeProxies(pub Vec<ProxyPolicy>);

impl ProxyStore for FakeProxies {
    fn find_proxy(&self, kind: ProxyKind) -> anyhow::Result<Option<ProxyPolicy>> {
        Ok(self.0.iter().find(|policy| policy.kind == kind).cloned())
    }
}

#[derive(Default)]
pub struct RecordingActivity(RefCell<Vec<String>>);

impl RecordingActivity {
    pub fn notes(&self) -> Vec<String> {
        self.0.borrow().clone()
    }
}

impl Activity for RecordingActivity {
    fn note(&self, message: &str) {
        self.0.borrow_mut().push(message.to_string());
    }
}

/// Records every command. An `info` probe creates a cache file the way the
/// real client does after authenticating.
#[derive(Default)]
pub struct FakeRunner {
    calls: RefCell<Vec<(SvnCommand, Mode)>>,
    cache_file: Option<(String, Vec<u8>)>,
    fail_on: Option<String>,
}

impl FakeRunner {
    pub fn creating_cache(name: &str, content: Vec<u8>) -> Self {
        FakeRunner {
            cache_file: Some((name.to_string(), content)),
            ..Default::default()
        }
    }

    pub fn failing_on(subcommand: &str) -> Self {
        FakeRunner {
            fail_on: Some(subcommand.to_string()),
            ..Default::default()
        }
    }

    pub fn calls(&self) -> Vec<(SvnCommand, Mode)> {
        self.calls.borrow().clone()
    }
}

impl CommandRunner for FakeRunner {
    fn run(&self, command: &SvnCommand, mode: Mode) -> Result<(), CommandError> {
        self.calls.borrow_mut().push((command.clone(), mode));
        let args = command.arg_strings();

        if let Some(subcommand) = &self.fail_on {
            if args.contains(subcommand) {
                return Err(CommandError::Failed {
                    command: command.to_string(),
                    status: "exit status: 1".to_string(),
                    stderr: "svn: E170013: Unable to connect to a repository".to_string(),
                });
            }
        }

        if let (Some((name, content)), Some(home)) = (&self.cache_file, command.home_dir()) {
            if args.iter().any(|arg| arg == "info") {
                let dir = auth_cache_dir(home);
                std::fs::create_dir_all(&dir).expect("create auth cache dir");
                std::fs::write(dir.join(name), content).expect("write auth cache file");
            }
        }
        Ok(())
    }
}
