use jsongate_domain::SelectorError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("invalid YAML")]
    Syntax(#[source] serde_yaml::Error),

    #[error("document {index}: not a policy document")]
    Shape {
        index: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("document {index}: missing required field `{field}`")]
    MissingField { index: usize, field: &'static str },

    #[error("policy `{policy}`: unsupported kind `{kind}` (expected `{expected}`)")]
    UnsupportedKind {
        policy: String,
        kind: String,
        expected: &'static str,
    },

    #[error("policy `{policy}`, rule #{index}: missing required field `{field}`")]
    MissingRuleField {
        policy: String,
        index: usize,
        field: &'static str,
    },

    #[error("duplicate policy name `{name}`")]
    DuplicatePolicy { name: String },

    #[error("policy `{policy}`: duplicate rule name `{rule}`")]
    DuplicateRule { policy: String, rule: String },

    #[error("policy `{policy}`, rule `{rule}`: invalid identifier")]
    Identifier {
        policy: String,
        rule: String,
        #[source]
        source: SelectorError,
    },

    #[error("policy `{policy}`, rule `{rule}`: invalid `{block}` tree")]
    Tree {
        policy: String,
        rule: String,
        block: &'static str,
        #[source]
        source: TreeError,
    },

    #[error("payload is neither JSON nor YAML")]
    Payload(#[source] serde_yaml::Error),
}

/// A condition tree that cannot be decoded.
#[derive(Debug, Error)]
pub enum TreeError {
    #[error(transparent)]
    Selector(#[from] SelectorError),

    #[error("`{key}` must hold a mapping or a list of nodes, found {found}")]
    BlockChildren { key: String, found: &'static str },

    #[error("expected a mapping or a list, found {found}")]
    NodeShape { found: &'static str },

    #[error("cannot mix `{combinator}` with check `{key}` in one mapping")]
    MixedKeys { combinator: String, key: String },

    #[error("`check` must hold a mapping, found {found}")]
    CheckShape { found: &'static str },

    #[error("`message` must be a string")]
    MessageShape,

    #[error("unexpected key `{key}` next to `check`")]
    CheckKey { key: String },
}
