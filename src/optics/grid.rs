//! Discretization of the smearing functions onto a uniform energy grid, in the
//! same way VASP's `SLOT` routine does.

use anyhow::ensure;
use ndarray::Array1;

use crate::{
    types::{
        Result,
        Vector,
    },
    optics::smearing::{
        Smearing,
        SmearingScheme,
    },
};


/// Uniform energy grid `[0, dx, 2dx, ..., (nx-1)dx]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnergyGrid {
    nx: usize,
    dx: f64,
}


impl EnergyGrid {
    pub fn new(nx: usize, dx: f64) -> Result<Self> {
        ensure!(nx >= 1, "[GRID]: Number of grid points must be at least 1, got {}", nx);
        ensure!(dx.is_finite() && dx > 0.0,
                "[GRID]: Grid spacing must be positive and finite, got {}", dx);
        Ok(Self { nx, dx })
    }

    pub fn len(&self) -> usize {
        self.nx
    }

    pub fn is_empty(&self) -> bool {
        self.nx == 0
    }

    pub fn spacing(&self) -> f64 {
        self.dx
    }

    pub fn points(&self) -> Vector<f64> {
        Array1::from_shape_fn(self.nx, |i| i as f64 * self.dx)
    }

    /// Smeared step function centred at `x0`.
    ///
    /// The step is sampled half a grid spacing above each grid point.
    pub fn step_at(&self, x0: f64, smearing: &Smearing) -> Vector<f64> {
        let sigma = smearing.sigma();
        let dx = self.dx;
        let x_scaled = Array1::from_shape_fn(self.nx, |i| {
            (i as f64 * dx - x0 + dx / 2.0) / sigma
        });
        smearing.scheme().step_array(&x_scaled)
    }

    /// Smeared delta function centred at `x0`, the forward difference of `step_at`.
    ///
    /// The first element is always zero, hence `sum(delta) * dx == step[nx-1] - step[0]`.
    pub fn delta_at(&self, x0: f64, smearing: &Smearing) -> Vector<f64> {
        let sfun = self.step_at(x0, smearing);
        let mut dfun = Array1::zeros(self.nx);
        for i in 1 .. self.nx {
            dfun[i] = (sfun[i] - sfun[i - 1]) / self.dx;
        }
        dfun
    }
}


/// Step function of width `sigma` centred at `x0` on `nx` points spaced by `dx`.
pub fn grid_step(x0: f64, sigma: f64, nx: usize, dx: f64, scheme: SmearingScheme) -> Result<Vector<f64>> {
    let grid = EnergyGrid::new(nx, dx)?;
    let smearing = Smearing::new(scheme, sigma)?;
    Ok(grid.step_at(x0, &smearing))
}


/// Delta function of width `sigma` centred at `x0` on `nx` points spaced by `dx`.
pub fn grid_delta(x0: f64, sigma: f64, nx: usize, dx: f64, scheme: SmearingScheme) -> Result<Vector<f64>> {
    let grid = EnergyGrid::new(nx, dx)?;
    let smearing = Smearing::new(scheme, sigma)?;
    Ok(grid.delta_at(x0, &smearing))
}
