use std::f64::consts::PI;

use anyhow::ensure;

use crate::types::Result;

/// Bohr radius in Angstrom (CODATA 2018)
pub const AU_TO_ANGSTROM: f64 = 0.529177210903;

/// Rydberg constant times hc in eV (CODATA 2018)
pub const RYD_TO_EV: f64 = 13.605693122994;

/// Boltzmann constant in eV/K (CODATA 2018)
pub const BOLTZMANN_EV: f64 = 8.617333262E-5;

/// EDEPS in VASP's `constant.inc`
pub const EDEPS: f64 = 4.0 * PI * 2.0 * RYD_TO_EV * AU_TO_ANGSTROM;


/// Prefactor turning the accumulated transition strength into the dielectric
/// function, `volume` is the cell volume in Å³.
pub fn eps_constant(volume: f64) -> Result<f64> {
    ensure!(volume.is_finite() && volume > 0.0,
            "[UNITS]: Cell volume must be positive and finite, got {}", volume);
    Ok(EDEPS * PI / volume)
}
