//! Imaginary part of the dielectric tensor from the transition matrix elements,
//! a re-implementation of VASP's `EPSILON_IMAG`.
//!
//! The contribution of the transition `ib -> jb` at k-point `ik` and spin `ispin` is
//!
//! ```text
//! (f_jb - f_ib) * rspin * w_k * cder[ib,jb,ik,ispin,i] * conj(cder[ib,jb,ik,ispin,j]) * D(E - (e_jb - e_ib))
//! ```
//!
//! where `f` are the smeared occupations, `w_k` the normalized k-point weights and
//! `D` the discretized delta function from [`EnergyGrid::delta_at`]. All the band
//! pairs are summed without the conjugate trick of VASP.

use std::iter::FusedIterator;

use anyhow::ensure;
use log::debug;
use ndarray::{
    s,
    Array1,
    Array3,
    ArrayView1,
    ArrayView3,
    ArrayView5,
    Zip,
};
use num::Zero;
use rayon::prelude::*;

use crate::{
    types::{
        c64,
        Cube,
        Result,
        Vector,
    },
    optics::{
        grid::EnergyGrid,
        smearing::Smearing,
    },
};


/// One Cartesian component `(idir, jdir)` of ε₂(E), without the volume prefactor.
#[derive(Debug, Clone, PartialEq)]
pub struct SpectrumComponent {
    pub idir:       usize,
    pub jdir:       usize,
    pub energies:   Vector<f64>,
    pub values:     Vector<c64>,
}


/// Lazily evaluated components of ε₂, in the order (0,0), (0,1), ..., (2,2).
///
/// Each call of `next()` performs the full band summation for exactly one
/// component, nothing is computed in advance.
pub struct ImaginarySpectrum<'a> {
    cder:           ArrayView5<'a, c64>,
    eigs:           ArrayView3<'a, f64>,
    occupations:    Array3<f64>,
    kweights:       Array1<f64>,
    rspin:          f64,
    grid:           EnergyGrid,
    energies:       Vector<f64>,
    smearing:       Smearing,
    ipair:          usize,
}


/// Validate the inputs and set up the lazy evaluation of ε₂.
///
/// - `cder`: transition matrix elements, shape (nbands, nbands, nkpoints, nspin, 3);
/// - `eigs`: band energies in eV, shape (nbands, nkpoints, nspin);
/// - `kweights`: k-point weights, normalized here;
/// - `efermi`: Fermi level in eV, only the occupations are taken relative to it;
/// - `nedos`, `deltae`: size and spacing of the output energy grid.
pub fn imaginary_spectrum<'a>(
    cder:       ArrayView5<'a, c64>,
    eigs:       ArrayView3<'a, f64>,
    kweights:   ArrayView1<'_, f64>,
    efermi:     f64,
    nedos:      usize,
    deltae:     f64,
    smearing:   Smearing,
) -> Result<ImaginarySpectrum<'a>> {
    let grid = EnergyGrid::new(nedos, deltae)?;

    let (nb1, nb2, nkpoints, nspin, ndir) = cder.dim();
    ensure!(ndir == 3, "[EPSILON]: Last axis of cder must hold 3 Cartesian directions, got {}", ndir);
    ensure!(nb1 == nb2, "[EPSILON]: Band axes of cder disagree: {} vs {}", nb1, nb2);
    ensure!(nspin == 1 || nspin == 2, "[EPSILON]: Spin axis of cder must be 1 or 2, got {}", nspin);

    let nbands = nb1;
    let (eb, ek, es) = eigs.dim();
    ensure!(eb == nbands, "[EPSILON]: Number of bands mismatch: eigs has {}, cder has {}", eb, nbands);
    ensure!(ek == nkpoints, "[EPSILON]: Number of k-points mismatch: eigs has {}, cder has {}", ek, nkpoints);
    ensure!(es == nspin, "[EPSILON]: Number of spins mismatch: eigs has {}, cder has {}", es, nspin);
    ensure!(kweights.len() == nkpoints,
            "[EPSILON]: Number of k-point weights mismatch: got {}, cder has {} k-points", kweights.len(), nkpoints);

    ensure!(kweights.iter().all(|w| w.is_finite() && *w >= 0.0),
            "[EPSILON]: K-point weights must be non-negative and finite.");
    let wsum = kweights.sum();
    ensure!(wsum > 0.0, "[EPSILON]: Sum of k-point weights must be positive.");
    let kweights = kweights.mapv(|w| w / wsum);

    let sigma = smearing.sigma();
    ensure!(sigma.is_finite() && sigma > 0.0, "[EPSILON]: Smearing width must be positive and finite, got {}", sigma);
    let occupations = smearing.scheme().step_array(&eigs.mapv(|e| (e - efermi) / sigma));
    let rspin = (3 - nspin) as f64;

    debug!("[EPSILON]: nbands = {}, nkpoints = {}, nspin = {}, nedos = {}, deltae = {}, smearing = {:?}",
           nbands, nkpoints, nspin, nedos, deltae, smearing);

    Ok(ImaginarySpectrum {
        cder,
        eigs,
        occupations,
        kweights,
        rspin,
        grid,
        energies: grid.points(),
        smearing,
        ipair: 0,
    })
}


impl<'a> ImaginarySpectrum<'a> {
    pub fn energies(&self) -> &Vector<f64> {
        &self.energies
    }

    pub fn nedos(&self) -> usize {
        self.grid.len()
    }

    fn accumulate(&self, idir: usize, jdir: usize) -> Vector<c64> {
        let nedos = self.grid.len();
        let (nbands, _, nkpoints, nspin, _) = self.cder.dim();

        (0 .. nbands).into_par_iter()
            .fold(|| Array1::<c64>::zeros(nedos), |mut epsdd, ib| {
                for jb in 0 .. nbands {
                    for ik in 0 .. nkpoints {
                        for ispin in 0 .. nspin {
                            let fi = self.occupations[(ib, ik, ispin)];
                            let fj = self.occupations[(jb, ik, ispin)];
                            let weight = (fj - fi) * self.rspin * self.kweights[ik];

                            let amp = self.cder[(ib, jb, ik, ispin, idir)]
                                    * self.cder[(ib, jb, ik, ispin, jdir)].conj();

                            if weight == 0.0 || amp.is_zero() {
                                continue;
                            }

                            let decel = self.eigs[(jb, ik, ispin)] - self.eigs[(ib, ik, ispin)];
                            let smeared = self.grid.delta_at(decel, &self.smearing);
                            Zip::from(&mut epsdd)
                                .and(&smeared)
                                .for_each(|e, &d| *e += amp * (d * weight));
                        }
                    }
                }
                epsdd
            })
            .reduce(|| Array1::<c64>::zeros(nedos), |mut a, b| {
                a += &b;
                a
            })
    }

    /// Collect the components not yet consumed into a tensor of shape (3, 3, nedos).
    pub fn into_tensor(self) -> Cube<c64> {
        let mut ret = Cube::<c64>::zeros((3, 3, self.nedos()));
        for comp in self {
            ret.slice_mut(s![comp.idir, comp.jdir, ..]).assign(&comp.values);
        }
        ret
    }
}


impl<'a> Iterator for ImaginarySpectrum<'a> {
    type Item = SpectrumComponent;

    fn next(&mut self) -> Option<Self::Item> {
        if self.ipair >= 9 {
            return None;
        }

        let (idir, jdir) = (self.ipair / 3, self.ipair % 3);
        self.ipair += 1;

        debug!("[EPSILON]: Accumulating component ({}, {}) ...", idir, jdir);
        let values = self.accumulate(idir, jdir);

        Some(SpectrumComponent {
            idir,
            jdir,
            energies: self.energies.clone(),
            values,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = 9 - self.ipair;
        (n, Some(n))
    }
}

impl ExactSizeIterator for ImaginarySpectrum<'_> {}

impl FusedIterator for ImaginarySpectrum<'_> {}
