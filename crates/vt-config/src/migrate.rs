//! Schema migration framework.

use crate::ConfigError;
use crate::schema::ConfigFile;

pub const LATEST_VERSION: u32 = 2;

pub fn migrate_to_latest(mut config: ConfigFile) -> Result<ConfigFile, ConfigError> {
    while config.version < LATEST_VERSION {
        config = migrate_one_version(config)?;
    }
    Ok(config)
}

fn migrate_one_version(config: ConfigFile) -> Result<ConfigFile, ConfigError> {
    match config.version {
        1 => migrate_v1_to_v2(config),
        v => Err(ConfigError::Migration {
            what: format!("No migration path from version {}", v),
        }),
    }
}

/// Version 1 had no separate reverse-thrust ramp; the back transition reused
/// the pusher ramp.
fn migrate_v1_to_v2(mut config: ConfigFile) -> Result<ConfigFile, ConfigError> {
    config.params.reverse_ramp_s = config.params.pusher_ramp_s;
    config.version = 2;
    Ok(config)
}
