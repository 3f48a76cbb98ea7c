//! Hand-curated intentional regressions, keyed by release and test identity.
//!
//! Loaded once from TOML into an immutable lookup and shared by reference.

mod registry;

pub use registry::{AllowanceKey, RegressionAllowances};

use serde::{Deserialize, Serialize};

use crate::types::VariantSet;

/// A regression a team has chosen to accept rather than fix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntentionalRegression {
    pub jira_component: String,
    pub test_id: String,
    pub test_name: String,
    pub variants: VariantSet,
    pub previous_pass_percentage: u32,
    pub previous_sample_size: u32,
    pub regressed_pass_percentage: u32,
    pub regressed_sample_size: u32,
    pub reason_to_allow_instead_of_fix: String,
}

/// On-disk shape: one `[[release]]` table per release.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AllowancesFile {
    pub release: Vec<ReleaseAllowances>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ReleaseAllowances {
    pub name: String,
    pub regression: Vec<IntentionalRegression>,
}
