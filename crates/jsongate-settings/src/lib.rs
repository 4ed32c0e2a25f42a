//! Config parsing and resolution.
//!
//! This crate is IO-free: it parses and resolves configuration provided as strings.

#![forbid(unsafe_code)]

mod model;
mod resolve;

pub use model::{JsongateConfigV1, SCHEMA_CONFIG_V1};
pub use resolve::{Overrides, ResolvedConfig};

/// Parse `jsongate.toml` into a typed model.
pub fn parse_config_toml(input: &str) -> anyhow::Result<JsongateConfigV1> {
    let cfg: JsongateConfigV1 = toml::from_str(input)?;
    Ok(cfg)
}

/// Resolve the effective engine options (config + command-line overrides).
pub fn resolve_config(
    cfg: JsongateConfigV1,
    overrides: Overrides,
) -> anyhow::Result<ResolvedConfig> {
    resolve::resolve_config(cfg, overrides)
}
