//! Turn a validated configuration into runnable objects.

use vt_controls::{StandardCollaborators, StandardVtol};
use vt_sim::PointMassVtol;

use crate::ConfigError;
use crate::schema::ConfigFile;
use crate::validate::ValidationError;

pub fn build_controller(
    config: &ConfigFile,
) -> Result<StandardVtol<StandardCollaborators>, ConfigError> {
    let collaborators =
        StandardCollaborators::new(config.assist).map_err(ValidationError::from)?;
    let vtol = StandardVtol::new(config.params, &config.surfaces, collaborators)
        .map_err(ValidationError::from)?;
    Ok(vtol)
}

pub fn build_vehicle(config: &ConfigFile) -> Result<PointMassVtol, ConfigError> {
    PointMassVtol::new(config.vehicle)
        .map_err(|e| ValidationError::Simulation(e.to_string()).into())
}
