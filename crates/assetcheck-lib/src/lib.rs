pub mod archive;
pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod fetch;
pub mod manifest;
pub mod steps;
pub mod verification;

pub use config::Config;
pub use error::AssetCheckError;
