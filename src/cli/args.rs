use clap::{Parser, Subcommand};

/// Non-interactive Subversion checkouts for build pipelines.
#[derive(Debug, Parser)]
#[clap(version)]
pub struct CliArgs {
    #[clap(subcommand)]
    pub cmd: Command,
    /// Descriptor with the application, its identities and proxies
    #[clap(short, long, default_value = "svnfetch.toml")]
    pub descriptor: String,
    /// Home directory of the svn client. Defaults to $HOME
    #[clap(long, env = "SVNFETCH_HOME")]
    pub home: Option<String>,
    /// Checkout destination
    #[clap(short, long, default_value = "source")]
    pub source_directory: String,
    /// Path of the svn binary
    #[clap(long, env = "SVNFETCH_CLIENT_PATH")]
    pub client: Option<String>,
    /// TOML settings file, overridden by SVNFETCH_* environment variables
    #[clap(long, env = "SVNFETCH_SETTINGS")]
    pub settings: Option<String>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Prepares credentials and proxy configuration, then checks out the repository
    Fetch,
    /// Checks the repository URL against the insecure transport setting
    Validate,
    /// Prints the URL that would be checked out
    Url,
    /// Removes the checkout
    Clean,
}
