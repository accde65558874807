use thiserror::Error;

pub mod descriptor;
pub mod proxy;

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("IO error reading descriptor toml: {0}")]
    IO(#[from] std::io::Error),
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Identity {identity} referenced by application {application} is not defined")]
    DanglingIdentity { application: String, identity: u64 },
}
