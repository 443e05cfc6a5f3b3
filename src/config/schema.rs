use serde::{Deserialize, Serialize};

use crate::render::RenderConfig;
use crate::scoring::ScoringConfig;

/// Top-level config file. Both sections are optional.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub scoring: ScoringConfig,
    pub render: RenderConfig,
}
