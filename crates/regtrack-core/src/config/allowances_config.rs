use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AllowancesConfig {
    /// TOML file of intentional regressions.
    pub path: Option<String>,
}
