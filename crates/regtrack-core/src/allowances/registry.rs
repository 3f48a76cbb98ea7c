//! `RegressionAllowances`: validated, immutable allowance lookup.

use std::collections::HashMap;
use std::path::Path;

use tracing::{debug, info};

use super::{AllowancesFile, IntentionalRegression};
use crate::errors::ConfigError;
use crate::types::variant::{
    IDENTITY_DIMENSIONS, VARIANT_ARCH, VARIANT_NETWORK, VARIANT_PLATFORM, VARIANT_UPGRADE,
};
use crate::types::VariantSet;

/// Composite lookup key. Variants are restricted to the identity dimensions.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AllowanceKey {
    pub release: String,
    pub test_id: String,
    pub variants: VariantSet,
}

impl AllowanceKey {
    pub fn new(release: &str, test_id: &str, variants: &VariantSet) -> Self {
        Self {
            release: release.to_string(),
            test_id: test_id.to_string(),
            variants: variants.project(&IDENTITY_DIMENSIONS),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct RegressionAllowances {
    by_key: HashMap<AllowanceKey, IntentionalRegression>,
}

impl RegressionAllowances {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let file: AllowancesFile = toml::from_str(toml_str)?;
        Self::from_file(file)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let allowances = Self::from_toml(&contents)?;
        info!(
            path = %path.display(),
            count = allowances.len(),
            "loaded intentional regressions"
        );
        Ok(allowances)
    }

    pub fn from_file(file: AllowancesFile) -> Result<Self, ConfigError> {
        let mut by_key = HashMap::new();
        for release in file.release {
            if release.name.is_empty() {
                return Err(ConfigError::Invalid(
                    "allowance release name must be specified".to_string(),
                ));
            }
            for regression in release.regression {
                validate(&release.name, &regression)?;
                let key = AllowanceKey::new(&release.name, &regression.test_id, &regression.variants);
                if by_key.contains_key(&key) {
                    return Err(ConfigError::DuplicateAllowance {
                        release: release.name.clone(),
                        test_id: regression.test_id.clone(),
                    });
                }
                by_key.insert(key, regression);
            }
        }
        Ok(Self { by_key })
    }

    /// The approved regression for this identity, if any.
    pub fn intentional_regression_for(
        &self,
        release: &str,
        variants: &VariantSet,
        test_id: &str,
    ) -> Option<&IntentionalRegression> {
        let found = self.by_key.get(&AllowanceKey::new(release, test_id, variants));
        if let Some(t) = found {
            debug!(release, test_id, test_name = %t.test_name, "found approved regression");
        }
        found
    }

    pub fn len(&self) -> usize {
        self.by_key.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_key.is_empty()
    }
}

fn validate(release: &str, r: &IntentionalRegression) -> Result<(), ConfigError> {
    let invalid = |reason: &str| ConfigError::InvalidAllowance {
        release: release.to_string(),
        test_id: r.test_id.clone(),
        reason: reason.to_string(),
    };

    if r.jira_component.is_empty() {
        return Err(invalid("jira_component must be specified"));
    }
    if r.test_id.is_empty() {
        return Err(invalid("test_id must be specified"));
    }
    if r.test_name.is_empty() {
        return Err(invalid("test_name must be specified"));
    }
    if r.previous_pass_percentage == 0 {
        return Err(invalid("previous_pass_percentage must be specified"));
    }
    if r.regressed_pass_percentage == 0 {
        return Err(invalid("regressed_pass_percentage must be specified"));
    }
    if r.previous_sample_size == 0 {
        return Err(invalid("previous_sample_size must be specified"));
    }
    if r.regressed_sample_size == 0 {
        return Err(invalid("regressed_sample_size must be specified"));
    }
    if r.reason_to_allow_instead_of_fix.is_empty() {
        return Err(invalid("reason_to_allow_instead_of_fix must be specified"));
    }
    for dimension in [VARIANT_NETWORK, VARIANT_ARCH, VARIANT_PLATFORM, VARIANT_UPGRADE] {
        if r.variants.value_or_empty(dimension).is_empty() {
            return Err(invalid(&format!("{} variant must be specified", dimension)));
        }
    }
    Ok(())
}
