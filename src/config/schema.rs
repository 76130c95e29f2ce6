use serde::{Deserialize, Serialize};

use crate::estimation::EstimationConfig;

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Reference table overrides; built-in tables when absent
    #[serde(default)]
    pub estimation: Option<EstimationConfig>,
}
