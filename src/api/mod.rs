use std::error::Error;

use crate::{
    cli::command_handlers::{do_clean, do_fetch, do_url, do_validate},
    config::SvnfetchConfig,
    model::descriptor::Descriptor,
    svn::Layout,
};

mod builder;

pub use builder::SvnfetchBuilder;

pub struct Svnfetch {
    descriptor: Descriptor,
    config: SvnfetchConfig,
    layout: Layout,
}

impl Svnfetch {
    pub fn builder() -> SvnfetchBuilder {
        SvnfetchBuilder::default()
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Checks the repository URL against the insecure transport setting
    pub fn validate(&self) -> Result<(), Box<dyn Error>> {
        do_validate(&self.descriptor, &self.config, &self.layout)
    }

    /// Provisions credentials and proxy configuration, then checks out the repository
    pub fn fetch(&self) -> Result<(), Box<dyn Error>> {
        do_fetch(&self.descriptor, &self.config, &self.layout)
    }

    /// URL the checkout is performed from
    pub fn url(&self) -> Result<String, Box<dyn Error>> {
        do_url(&self.descriptor, &self.config, &self.layout)
    }

    /// Deletes the checkout
    pub fn clean(&self) -> Result<(), Box<dyn Error>> {
        do_clean(&self.layout)
    }
}
