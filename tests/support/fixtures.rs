//! Test fixtures and constants.

use envgroup::core::domain::Proposal;
use envgroup::core::types::Variables;

pub use envgroup::core::constants::SECRET_SENTINEL;

/// Build a variable map from pairs.
pub fn vars(pairs: &[(&str, &str)]) -> Variables {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

/// Soft-update proposal from variable and secret pairs.
pub fn proposal(variables: &[(&str, &str)], secrets: &[(&str, &str)]) -> Proposal {
    Proposal::new(vars(variables), vars(secrets))
}

/// The credentials group used by the end-to-end scenarios.
pub const DB_CREDS: &str = "db-creds";

/// First version of `db-creds`.
pub fn db_creds_v1() -> Proposal {
    proposal(&[("HOST", "db.internal"), ("PORT", "5432")], &[("PASSWORD", "s3cr3t")])
}
