//! Occupation smearing functions, following VASP's `ISMEAR` convention.
//!
//! Every scheme provides a step function S(x), the broadened occupation, and
//! its derivative-like delta function D(x). Both take the energy already
//! scaled by the smearing width, x = (E - E0) / sigma.

use std::f64::consts::PI;

use anyhow::ensure;
use ndarray::{
    Array,
    ArrayBase,
    Data,
    Dimension,
};
use serde::{
    Serialize,
    Deserialize,
};

use crate::{
    types::Result,
    optics::units::BOLTZMANN_EV,
};


#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SmearingScheme {
    /// ISMEAR = -1
    FermiDirac,

    /// ISMEAR < -1
    Gaussian,

    /// ISMEAR = N >= 0, N is the order of the expansion
    MethfesselPaxton(u32),
}


impl SmearingScheme {
    /// Interpret an `ISMEAR` tag.
    pub fn from_ismear(ismear: i32) -> Self {
        match ismear {
            -1          => Self::FermiDirac,
            i if i < 0  => Self::Gaussian,
            n           => Self::MethfesselPaxton(n as u32),
        }
    }

    pub fn methfessel_paxton(order: i32) -> Result<Self> {
        ensure!(order >= 0, "[SMEAR]: Methfessel-Paxton order must be non-negative, got {}", order);
        Ok(Self::MethfesselPaxton(order as u32))
    }

    pub fn step(&self, x: f64) -> f64 {
        match *self {
            Self::FermiDirac            => step_fermi_dirac(x),
            Self::Gaussian              => step_gaussian(x),
            Self::MethfesselPaxton(n)   => step_methfessel_paxton(x, &mp_coefficients(n)),
        }
    }

    pub fn delta(&self, x: f64) -> f64 {
        match *self {
            Self::FermiDirac            => delta_fermi_dirac(x),
            Self::Gaussian              => delta_gaussian(x),
            Self::MethfesselPaxton(n)   => delta_methfessel_paxton(x, &mp_coefficients(n)),
        }
    }

    /// Element-wise step function, the scheme is resolved once for the whole array.
    pub fn step_array<S, D>(&self, x: &ArrayBase<S, D>) -> Array<f64, D>
    where S: Data<Elem = f64>,
          D: Dimension {
        match *self {
            Self::FermiDirac    => x.mapv(step_fermi_dirac),
            Self::Gaussian      => x.mapv(step_gaussian),
            Self::MethfesselPaxton(n) => {
                let coeffs = mp_coefficients(n);
                x.mapv(|v| step_methfessel_paxton(v, &coeffs))
            },
        }
    }

    /// Element-wise delta function, the scheme is resolved once for the whole array.
    pub fn delta_array<S, D>(&self, x: &ArrayBase<S, D>) -> Array<f64, D>
    where S: Data<Elem = f64>,
          D: Dimension {
        match *self {
            Self::FermiDirac    => x.mapv(delta_fermi_dirac),
            Self::Gaussian      => x.mapv(delta_gaussian),
            Self::MethfesselPaxton(n) => {
                let coeffs = mp_coefficients(n);
                x.mapv(|v| delta_methfessel_paxton(v, &coeffs))
            },
        }
    }
}


/// Smearing scheme together with its width (SIGMA), in eV.
///
/// Deserialization goes through [`Smearing::new`], so a non-positive width is
/// rejected there as well.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "SmearingFields")]
pub struct Smearing {
    scheme: SmearingScheme,
    sigma:  f64,
}


#[derive(Deserialize)]
struct SmearingFields {
    scheme: SmearingScheme,
    sigma:  f64,
}


impl TryFrom<SmearingFields> for Smearing {
    type Error = anyhow::Error;

    fn try_from(fields: SmearingFields) -> Result<Self> {
        Self::new(fields.scheme, fields.sigma)
    }
}


impl Smearing {
    pub fn new(scheme: SmearingScheme, sigma: f64) -> Result<Self> {
        ensure!(sigma.is_finite() && sigma > 0.0,
                "[SMEAR]: Smearing width must be positive and finite, got {}", sigma);
        Ok(Self { scheme, sigma })
    }

    pub fn from_ismear(ismear: i32, sigma: f64) -> Result<Self> {
        Self::new(SmearingScheme::from_ismear(ismear), sigma)
    }

    /// Width from an electronic temperature in Kelvin, sigma = kB * T.
    pub fn from_temperature(scheme: SmearingScheme, kelvin: f64) -> Result<Self> {
        ensure!(kelvin.is_finite() && kelvin > 0.0,
                "[SMEAR]: Temperature must be positive and finite, got {} K", kelvin);
        Self::new(scheme, BOLTZMANN_EV * kelvin)
    }

    pub fn scheme(&self) -> SmearingScheme {
        self.scheme
    }

    pub fn sigma(&self) -> f64 {
        self.sigma
    }
}


/// A_i = (-1)^i / (i! 4^i sqrt(pi)) for i = 0 ..= n
fn mp_coefficients(n: u32) -> Vec<f64> {
    let mut coeffs = Vec::with_capacity(n as usize + 1);
    let mut a = 1.0 / PI.sqrt();
    coeffs.push(a);
    for i in 1 ..= n as usize {
        a /= -4.0 * i as f64;
        coeffs.push(a);
    }
    coeffs
}


/// Sums A_i H_{2i}(x), i = 0 ..= n, or A_i H_{2i-1}(x), i = 1 ..= n when `odd` is set.
/// All the polynomials come from a single recurrence sweep up to degree 2n.
fn hermite_series(x: f64, coeffs: &[f64], odd: bool) -> f64 {
    let n = coeffs.len() - 1;
    let mut sum = 0.0;
    let mut h_prev = 0.0;
    let mut h = 1.0;  // H_0

    for k in 0 ..= 2 * n {
        if k > 0 {
            let h_next = 2.0 * x * h - 2.0 * (k - 1) as f64 * h_prev;
            h_prev = h;
            h = h_next;
        }

        match (odd, k % 2) {
            (false, 0)          => sum += coeffs[k / 2] * h,
            (true,  1)          => sum += coeffs[(k + 1) / 2] * h,
            _                   => (),
        }
    }

    sum
}


fn step_fermi_dirac(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

fn delta_fermi_dirac(x: f64) -> f64 {
    let s = step_fermi_dirac(x);
    s * (1.0 - s)
}

fn step_gaussian(x: f64) -> f64 {
    0.5 + 0.5 * libm::erf(x)
}

fn delta_gaussian(x: f64) -> f64 {
    (-(x * x)).exp() / PI.sqrt()
}

fn step_methfessel_paxton(x: f64, coeffs: &[f64]) -> f64 {
    let erf_part = (1.0 + libm::erf(x)) / 2.0;
    if coeffs.len() < 2 {
        return erf_part;
    }
    erf_part - (-(x * x)).exp() * hermite_series(x, coeffs, true)
}

fn delta_methfessel_paxton(x: f64, coeffs: &[f64]) -> f64 {
    (-(x * x)).exp() * hermite_series(x, coeffs, false)
}
