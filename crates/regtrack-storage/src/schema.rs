//! Schema SQL for the regression ledger.

/// Ledger table name.
pub const TEST_REGRESSIONS_TABLE: &str = "test_regressions";

/// Variant key/value rows, one per dimension per regression.
pub const TEST_REGRESSION_VARIANTS_TABLE: &str = "test_regression_variants";

/// V1 schema: ledger + variant rows + indexes.
///
/// Timestamps are Unix milliseconds. `closed IS NULL` means open.
/// Statistics columns are nullable: they are captured at open time only.
pub const REGRESSION_TABLES_V1: &str = "
    CREATE TABLE IF NOT EXISTS test_regressions (
        regression_id TEXT PRIMARY KEY NOT NULL,
        release TEXT NOT NULL,
        test_id TEXT NOT NULL,
        test_name TEXT NOT NULL,
        opened INTEGER NOT NULL,
        closed INTEGER,
        sample_success_count INTEGER,
        sample_failure_count INTEGER,
        sample_flake_count INTEGER,
        sample_pass_rate REAL,
        basis_success_count INTEGER,
        basis_failure_count INTEGER,
        basis_flake_count INTEGER,
        basis_pass_rate REAL
    ) STRICT;

    CREATE TABLE IF NOT EXISTS test_regression_variants (
        regression_id TEXT NOT NULL REFERENCES test_regressions(regression_id),
        variant_key TEXT NOT NULL,
        variant_value TEXT NOT NULL,
        PRIMARY KEY (regression_id, variant_key)
    ) STRICT;

    CREATE INDEX IF NOT EXISTS idx_test_regressions_release_closed ON test_regressions(release, closed);
    CREATE INDEX IF NOT EXISTS idx_test_regressions_identity ON test_regressions(release, test_id);
";

pub const LEDGER_TABLE_NAMES: [&str; 2] = [TEST_REGRESSIONS_TABLE, TEST_REGRESSION_VARIANTS_TABLE];
