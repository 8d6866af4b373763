//! Configuration file schema.

use serde::{Deserialize, Serialize};
use vt_controls::{AssistConfig, SurfaceConfig, TransitionParams};
use vt_sim::{Scenario, SimOptions, VehicleParams};

/// One vehicle configuration: controller tuning plus the simulated airframe.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConfigFile {
    pub version: u32,
    pub name: String,
    #[serde(default)]
    pub params: TransitionParams,
    #[serde(default)]
    pub surfaces: SurfaceConfig,
    #[serde(default)]
    pub assist: AssistConfig,
    #[serde(default)]
    pub vehicle: VehicleParams,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scenario: Option<Scenario>,
    #[serde(default)]
    pub sim: SimOptions,
}

impl ConfigFile {
    /// Current-version file with every section at its defaults.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            version: crate::migrate::LATEST_VERSION,
            name: name.into(),
            params: TransitionParams::default(),
            surfaces: SurfaceConfig::default(),
            assist: AssistConfig::default(),
            vehicle: VehicleParams::default(),
            scenario: Some(Scenario::default()),
            sim: SimOptions::default(),
        }
    }

    /// The configured scenario, or the default one.
    pub fn scenario_or_default(&self) -> Scenario {
        self.scenario.clone().unwrap_or_default()
    }
}
