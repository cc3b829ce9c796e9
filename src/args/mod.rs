//! CLI argument types and parsing helpers.
mod cli;
mod defaults;
pub(crate) mod parsers;

#[cfg(test)]
pub(crate) mod test_support;

pub use cli::RunArgs;

pub(crate) use defaults::DEFAULT_CONFIG_FILES;
pub(crate) use parsers::parse_duration_allow_zero;
