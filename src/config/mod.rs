//! Configuration loading, CLI/file precedence, and the validated run
//! configuration.
mod apply;
mod loader;
mod parse;
mod run;
pub mod types;


pub use apply::apply_config;
pub use loader::load_config;
pub use run::{ApiCredentials, RunConfig};

#[cfg(test)]
pub(crate) use loader::load_config_file;
