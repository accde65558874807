pub mod auth;
pub mod command;
pub mod effective_url;
pub mod fetch;
pub mod proxy;
pub mod servers;

#[cfg(test)]
pub(crate) mod testing;

pub use command::{CommandError, CommandRunner, Mode, SvnCommand, SystemRunner};
pub use fetch::{Collaborators, FetchError, Layout, Subversion};
