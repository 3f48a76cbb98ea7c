//! Intentional regression allowance loading and lookup.

use std::io::Write;
use std::sync::Arc;

use regtrack_core::errors::ConfigError;
use regtrack_core::types::VariantSet;
use regtrack_core::{InMemoryRegressionStore, RegressionAllowances, RegressionTracker, TrackerConfig};

const VALID: &str = r#"
[[release]]
name = "4.15"

[[release.regression]]
jira_component = "Networking / ovn-kubernetes"
test_id = "openshift-tests:1f2e"
test_name = "[sig-network] pods should reach services"
previous_pass_percentage = 98
previous_sample_size = 120
regressed_pass_percentage = 91
regressed_sample_size = 80
reason_to_allow_instead_of_fix = "known kernel regression, fixed in next z-stream"

[release.regression.variants]
Network = "ovn"
Upgrade = "micro"
Arch = "amd64"
Platform = "aws"

[[release]]
name = "4.16"
"#;

fn identity() -> VariantSet {
    VariantSet::new()
        .with("Network", "ovn")
        .with("Upgrade", "micro")
        .with("Arch", "amd64")
        .with("Platform", "aws")
}

#[test]
fn lookup_by_release_test_and_variants() {
    let allowances = RegressionAllowances::from_toml(VALID).unwrap();
    assert_eq!(allowances.len(), 1);

    let found = allowances
        .intentional_regression_for("4.15", &identity(), "openshift-tests:1f2e")
        .unwrap();
    assert_eq!(found.regressed_pass_percentage, 91);

    assert!(allowances
        .intentional_regression_for("4.16", &identity(), "openshift-tests:1f2e")
        .is_none());
    assert!(allowances
        .intentional_regression_for("4.15", &identity().with("Platform", "gcp"), "openshift-tests:1f2e")
        .is_none());
}

#[test]
fn extra_dimensions_do_not_affect_lookup() {
    let allowances = RegressionAllowances::from_toml(VALID).unwrap();
    let with_extra = identity().with("Variant", "serial").with("Installer", "upi");
    assert!(allowances
        .intentional_regression_for("4.15", &with_extra, "openshift-tests:1f2e")
        .is_some());
}

#[test]
fn rejects_missing_reason() {
    let toml = VALID.replace(
        "reason_to_allow_instead_of_fix = \"known kernel regression, fixed in next z-stream\"",
        "reason_to_allow_instead_of_fix = \"\"",
    );
    let err = RegressionAllowances::from_toml(&toml).unwrap_err();
    match err {
        ConfigError::InvalidAllowance { reason, .. } => {
            assert!(reason.contains("reason_to_allow_instead_of_fix"))
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn rejects_missing_identity_dimension() {
    let toml = VALID.replace("Arch = \"amd64\"\n", "");
    let err = RegressionAllowances::from_toml(&toml).unwrap_err();
    match err {
        ConfigError::InvalidAllowance { reason, .. } => assert!(reason.contains("Arch")),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn rejects_zero_sample_size() {
    let toml = VALID.replace("regressed_sample_size = 80", "regressed_sample_size = 0");
    assert!(matches!(
        RegressionAllowances::from_toml(&toml),
        Err(ConfigError::InvalidAllowance { .. })
    ));
}

#[test]
fn rejects_duplicate_identity() {
    let entry_start = VALID.find("[[release.regression]]").unwrap();
    let entry_end = VALID.find("[[release]]\nname = \"4.16\"").unwrap();
    let entry = &VALID[entry_start..entry_end];
    let toml = format!("{}{}", &VALID[..entry_end], entry);

    let err = RegressionAllowances::from_toml(&toml).unwrap_err();
    assert!(matches!(err, ConfigError::DuplicateAllowance { .. }));
}

#[test]
fn rejects_unnamed_release() {
    let err = RegressionAllowances::from_toml("[[release]]\n").unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(_)));
}

#[test]
fn config_loads_allowances_file() {
    let mut allowances_file = tempfile::NamedTempFile::new().unwrap();
    allowances_file.write_all(VALID.as_bytes()).unwrap();

    let config_toml = format!(
        "[allowances]\npath = {:?}\n",
        allowances_file.path().display().to_string()
    );
    let config = TrackerConfig::from_toml(&config_toml).unwrap();
    let allowances = config.load_allowances().unwrap();
    assert_eq!(allowances.len(), 1);
}

#[test]
fn missing_allowances_file_is_io_error() {
    let config = TrackerConfig::from_toml("[allowances]\npath = \"/nonexistent/allowances.toml\"\n")
        .unwrap();
    assert!(matches!(config.load_allowances(), Err(ConfigError::Io { .. })));
}

#[test]
fn tracker_from_config_attaches_allowances() {
    let mut allowances_file = tempfile::NamedTempFile::new().unwrap();
    allowances_file.write_all(VALID.as_bytes()).unwrap();
    let config_toml = format!(
        "[allowances]\npath = {:?}\n",
        allowances_file.path().display().to_string()
    );
    let config = TrackerConfig::from_toml(&config_toml).unwrap();

    let tracker =
        RegressionTracker::from_config(Arc::new(InMemoryRegressionStore::new()), &config).unwrap();
    assert!(tracker.has_allowances());
    assert!(!tracker.is_dry_run());
    assert_eq!(tracker.pass_timeout(), None);
}
