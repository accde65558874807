use std::{env, error::Error, path::PathBuf};

use home::home_dir;

use crate::{
    config::SvnfetchConfig,
    model::descriptor::Descriptor,
    svn::{command::DEFAULT_CLIENT, Layout},
    Svnfetch,
};

#[derive(Default)]
pub struct SvnfetchBuilder {
    // All other paths are relative to `root`
    root: Option<PathBuf>,
    descriptor_file_name: Option<PathBuf>,
    home: Option<PathBuf>,
    source_directory_name: Option<PathBuf>,
    client: Option<PathBuf>,
    settings_file_name: Option<PathBuf>,
}

impl SvnfetchBuilder {
    /// Project root directory.
    ///
    /// Defaults to the current directory.
    pub fn root(mut self, path: impl Into<PathBuf>) -> Self {
        self.root = Some(path.into());
        self
    }

    /// Name of the descriptor toml file.
    ///
    /// Defaults to `svnfetch.toml`.
    pub fn descriptor_file_name(mut self, path: impl Into<PathBuf>) -> Self {
        self.descriptor_file_name = Some(path.into());
        self
    }

    /// Home directory the client keeps its `.subversion` directory in.
    ///
    /// Defaults to `$HOME`.
    pub fn home(mut self, path: impl Into<PathBuf>) -> Self {
        self.home = Some(path.into());
        self
    }

    /// Checkout destination.
    ///
    /// Defaults to `source`.
    pub fn source_directory_name(mut self, path: impl Into<PathBuf>) -> Self {
        self.source_directory_name = Some(path.into());
        self
    }

    /// Path of the svn binary. Overrides `client.path` from the settings.
    ///
    /// Defaults to `/usr/bin/svn`.
    pub fn client(mut self, path: impl Into<PathBuf>) -> Self {
        self.client = Some(path.into());
        self
    }

    /// Optional TOML settings file.
    pub fn settings_file_name(mut self, path: impl Into<PathBuf>) -> Self {
        self.settings_file_name = Some(path.into());
        self
    }

    pub fn try_build(self) -> Result<Svnfetch, Box<dyn Error>> {
        let Self {
            root,
            descriptor_file_name,
            home,
            source_directory_name,
            client,
            settings_file_name,
        } = self;
        let root = match root {
            Some(root) => root,
            None => env::current_dir()?,
        };

        let descriptor_file_name =
            descriptor_file_name.unwrap_or_else(|| PathBuf::from("svnfetch.toml"));
        let descriptor = Descriptor::from_file(&root.join(descriptor_file_name))?;

        let settings_file = settings_file_name.map(|name| root.join(name));
        let config = SvnfetchConfig::load(settings_file.as_deref())?;

        let home = match home {
            Some(home) => root.join(home),
            None => home_dir().ok_or("Could not find home dir. Please define $HOME env variable.")?,
        };

        let source_dir = root.join(source_directory_name.unwrap_or_else(|| PathBuf::from("source")));

        let client = client
            .or_else(|| config.client_path.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CLIENT));

        Ok(Svnfetch {
            descriptor,
            config,
            layout: Layout {
                home,
                source_dir,
                client,
            },
        })
    }
}
