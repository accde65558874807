pub mod cli;
pub mod config;
pub mod model;
pub mod store;
pub mod svn;
pub mod workspace;

mod api;
mod flock;

pub use api::{Svnfetch, SvnfetchBuilder};
