use std::error::Error;

use log::info;

use crate::{
    config::SvnfetchConfig,
    flock::FileLock,
    model::descriptor::Descriptor,
    store::LogActivity,
    svn::{Collaborators, Layout, Subversion, SystemRunner},
    workspace,
};

const LOCK_FILE_NAME: &str = ".svnfetch.lock";

fn collaborators<'a>(descriptor: &'a Descriptor, config: &'a SvnfetchConfig) -> Collaborators<'a> {
    Collaborators {
        settings: config,
        identities: descriptor,
        proxies: descriptor,
        activity: &LogActivity,
        runner: &SystemRunner,
    }
}

/// Handler to validate command
pub fn do_validate(
    descriptor: &Descriptor,
    config: &SvnfetchConfig,
    layout: &Layout,
) -> Result<(), Box<dyn Error>> {
    Subversion::new(
        &descriptor.application,
        layout,
        collaborators(descriptor, config),
    )
    .validate()?;
    info!(
        "Repository settings of {} are valid",
        descriptor.application.name
    );
    Ok(())
}

/// Handler to fetch command
/// Fetches sharing a home directory are serialized through a lock file in it.
pub fn do_fetch(
    descriptor: &Descriptor,
    config: &SvnfetchConfig,
    layout: &Layout,
) -> Result<(), Box<dyn Error>> {
    workspace::ensure_dir(&layout.home)?;
    let _lock = FileLock::new(&layout.home.join(LOCK_FILE_NAME))?;

    Subversion::new(
        &descriptor.application,
        layout,
        collaborators(descriptor, config),
    )
    .fetch()?;

    info!(
        "Checked out {} into {}",
        descriptor.application.name,
        layout.source_dir.display()
    );
    Ok(())
}

/// Handler to url command
pub fn do_url(
    descriptor: &Descriptor,
    config: &SvnfetchConfig,
    layout: &Layout,
) -> Result<String, Box<dyn Error>> {
    let url = Subversion::new(
        &descriptor.application,
        layout,
        collaborators(descriptor, config),
    )
    .url()?;
    Ok(url.to_string())
}

/// Handler to clean command
/// Removes the checkout. The client's `.subversion` directory is left alone.
pub fn do_clean(layout: &Layout) -> Result<(), Box<dyn Error>> {
    info!("Cleaning checkout {}.", layout.source_dir.display());
    workspace::remove_dir(&layout.source_dir);
    Ok(())
}
