//! Stable identifiers for outcomes and error codes.
//!
//! Codes are short snake_case discriminators; they appear in serialized reports.

// Outcomes
pub const OUTCOME_PASS: &str = "pass";
pub const OUTCOME_FAIL: &str = "fail";
pub const OUTCOME_ERROR: &str = "error";

// Codes: evaluation errors
pub const CODE_PATH_TYPE_ERROR: &str = "path_type_error";
pub const CODE_CANCELLED: &str = "cancelled";

// Condition blocks
pub const BLOCK_ALL: &str = "all";
pub const BLOCK_ANY: &str = "any";
pub const BLOCK_NONE: &str = "none";

// Policy document
pub const KIND_VALIDATING_POLICY: &str = "ValidatingPolicy";
