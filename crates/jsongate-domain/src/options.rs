/// How object and array identifier values are turned into labels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum IdentifierStyle {
    /// Compact JSON, keys in declared order.
    #[default]
    Json,
    /// Hex SHA-256 of the compact JSON.
    Sha256,
}

/// When a scan is considered failing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FailOn {
    /// Violations and errors both fail.
    #[default]
    Fail,
    /// Only evaluation errors fail.
    Error,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EngineOptions {
    /// Upper bound on concurrently evaluated rules. `0` uses the global pool sized to the CPU
    /// count; `1` evaluates inline on the calling thread.
    pub max_parallelism: usize,

    /// Identifier reported for rules without an identifier selector.
    pub identifier_default: String,

    pub identifier_style: IdentifierStyle,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            max_parallelism: 0,
            identifier_default: String::new(),
            identifier_style: IdentifierStyle::Json,
        }
    }
}
