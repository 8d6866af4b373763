//! Configuration validation logic.

use crate::schema::ConfigFile;
use vt_controls::{ControlError, StandardCollaborators, SurfaceSetpoints};

#[derive(thiserror::Error, Debug)]
pub enum ValidationError {
    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Invalid controller parameter: {0}")]
    Control(#[from] ControlError),

    #[error("Invalid simulation setup: {0}")]
    Simulation(String),

    #[error("Unsupported version: {version}")]
    UnsupportedVersion { version: u32 },
}

pub fn validate_config(config: &ConfigFile) -> Result<(), ValidationError> {
    if config.version > crate::migrate::LATEST_VERSION {
        return Err(ValidationError::UnsupportedVersion {
            version: config.version,
        });
    }

    if config.name.trim().is_empty() {
        return Err(ValidationError::InvalidValue {
            field: "name".to_string(),
            value: format!("{:?}", config.name),
            reason: "must not be empty".to_string(),
        });
    }

    config.params.validate()?;
    SurfaceSetpoints::from_config(&config.surfaces)?;
    validate_assist(config)?;

    config
        .vehicle
        .validate()
        .map_err(|e| ValidationError::Simulation(e.to_string()))?;
    config
        .sim
        .validate()
        .map_err(|e| ValidationError::Simulation(e.to_string()))?;
    if let Some(scenario) = &config.scenario {
        scenario
            .validate()
            .map_err(|e| ValidationError::Simulation(e.to_string()))?;
    }

    Ok(())
}

fn validate_assist(config: &ConfigFile) -> Result<(), ValidationError> {
    let assist = &config.assist;
    let ranged = [
        ("assist.forward_thrust_gain", assist.forward_thrust_gain, f64::INFINITY),
        ("assist.forward_thrust_max", assist.forward_thrust_max, 1.0),
        ("assist.back_trans_decel_mss", assist.back_trans_decel_mss, f64::INFINITY),
    ];
    for (field, value, max) in ranged {
        if !value.is_finite() || value < 0.0 || value > max {
            return Err(ValidationError::InvalidValue {
                field: field.to_string(),
                value: value.to_string(),
                reason: format!("must be within [0, {max}]"),
            });
        }
    }
    if !(assist.back_trans_pitch_max_deg > 0.0 && assist.back_trans_pitch_max_deg < 90.0) {
        return Err(ValidationError::InvalidValue {
            field: "assist.back_trans_pitch_max_deg".to_string(),
            value: assist.back_trans_pitch_max_deg.to_string(),
            reason: "must be within (0, 90)".to_string(),
        });
    }
    StandardCollaborators::new(*assist)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use vt_controls::TransitionParams;

    #[test]
    fn defaults_validate() {
        validate_config(&ConfigFile::new("default")).unwrap();
    }

    #[test]
    fn future_version_rejected() {
        let mut config = ConfigFile::new("future");
        config.version = 99;
        assert!(matches!(
            validate_config(&config),
            Err(ValidationError::UnsupportedVersion { version: 99 })
        ));
    }

    #[test]
    fn bad_transition_param_rejected() {
        let mut config = ConfigFile::new("bad");
        config.params = TransitionParams {
            pusher_ramp_s: -1.0,
            ..Default::default()
        };
        assert!(matches!(
            validate_config(&config),
            Err(ValidationError::Control(_))
        ));
    }

    #[test]
    fn zero_surface_rate_rejected() {
        let mut config = ConfigFile::new("bad");
        config.surfaces.flaps_rate_per_s = 0.0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn assist_limits() {
        let mut config = ConfigFile::new("bad");
        config.assist.forward_thrust_max = 1.5;
        assert!(matches!(
            validate_config(&config),
            Err(ValidationError::InvalidValue { .. })
        ));
    }

    #[test]
    fn empty_name_rejected() {
        let config = ConfigFile::new("  ");
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn bad_sim_options_rejected() {
        let mut config = ConfigFile::new("bad");
        config.sim.dt = 0.0;
        assert!(matches!(
            validate_config(&config),
            Err(ValidationError::Simulation(_))
        ));
    }
}
