use vt_config::*;
use vt_controls::TransitionParams;
use vt_sim::{IntegratorType, RequestStep, Scenario};

fn tuned_config() -> ConfigFile {
    let mut config = ConfigFile::new("Tuned VTOL");
    config.params = TransitionParams {
        pusher_ramp_s: 2.0,
        front_trans_throttle: 0.85,
        transition_airspeed_mps: 14.0,
        blend_airspeed_mps: 11.0,
        pitch_offset_deg: 3.0,
        ..Default::default()
    };
    config.assist.forward_thrust_gain = 1.2;
    config.vehicle.mass_kg = 12.5;
    config.sim.integrator = IntegratorType::ForwardEuler;
    config.scenario = Some(Scenario {
        requests: vec![RequestStep {
            at_s: 1.0,
            fixed_wing: true,
        }],
        failsafe_at_s: Some(30.0),
        ..Default::default()
    });
    config
}

#[test]
fn roundtrip_yaml_defaults() {
    let config = ConfigFile::new("Defaults");
    validate_config(&config).unwrap();

    let path = std::env::temp_dir().join("vt_config_roundtrip_defaults.yaml");
    save_yaml(&path, &config).unwrap();
    let loaded = load_yaml(&path).unwrap();

    assert_eq!(config, loaded);
}

#[test]
fn roundtrip_yaml_tuned() {
    let config = tuned_config();
    let path = std::env::temp_dir().join("vt_config_roundtrip_tuned.yaml");
    save_yaml(&path, &config).unwrap();
    assert_eq!(load(&path).unwrap(), config);
}

#[test]
fn roundtrip_json_tuned() {
    let config = tuned_config();
    let path = std::env::temp_dir().join("vt_config_roundtrip_tuned.json");
    save_json(&path, &config).unwrap();
    assert_eq!(load(&path).unwrap(), config);
}

#[test]
fn minimal_yaml_fills_defaults() {
    let yaml = "version: 2\nname: Minimal\nparams:\n  transition_airspeed_mps: 12.0\n";
    let path = std::env::temp_dir().join("vt_config_minimal.yaml");
    std::fs::write(&path, yaml).unwrap();

    let loaded = load_yaml(&path).unwrap();
    assert_eq!(loaded.params.transition_airspeed_mps, 12.0);
    assert_eq!(loaded.params.blend_airspeed_mps, 8.0);
    assert!(loaded.scenario.is_none());
    assert_eq!(loaded.scenario_or_default(), Scenario::default());
}

#[test]
fn legacy_file_is_migrated_on_load() {
    let yaml = "version: 1\nname: Legacy\nparams:\n  pusher_ramp_s: 1.0\n";
    let path = std::env::temp_dir().join("vt_config_legacy.yaml");
    std::fs::write(&path, yaml).unwrap();

    let loaded = load_yaml(&path).unwrap();
    assert_eq!(loaded.version, LATEST_VERSION);
    assert_eq!(loaded.params.reverse_ramp_s, 1.0);
}

#[test]
fn invalid_file_rejected_on_load() {
    let yaml = "version: 2\nname: Broken\nparams:\n  front_trans_throttle: 2.0\n";
    let path = std::env::temp_dir().join("vt_config_broken.yaml");
    std::fs::write(&path, yaml).unwrap();

    assert!(matches!(
        load_yaml(&path),
        Err(ConfigError::Validation(ValidationError::Control(_)))
    ));
}
