use std::{
    f64::consts::PI,
    path::PathBuf,
};

use anyhow::ensure;
use clap::Args;
use itertools::iproduct;
use log::info;
use ndarray::{
    Array1,
    Array3,
    Array5,
};

use crate::{
    types::{
        c64,
        Axis,
        Result,
        Vector,
    },
    OptProcess,
    optics::{
        eps_constant,
        imaginary_spectrum,
    },
    commands::common::{
        OpticsArgs,
        write_array_to_txt,
        plot_lines,
        save_plot,
    },
};


#[derive(Debug, Args)]
/// Imaginary dielectric function of a two-band model.
///
/// The model has one valence and one conduction band on `nkpoints` evenly weighted
/// k-points. The band edges disperse as cosines so that the direct gap grows from
/// `gap` to `gap + 2 * bandwidth`. The transition matrix elements are constant and
/// real, given per Cartesian direction. No spin polarization.
pub struct Twoband {
    #[command(flatten)]
    optics: OpticsArgs,

    #[arg(long, default_value_t = 1.0)]
    /// Minimum direct gap in eV.
    gap: f64,

    #[arg(long, default_value_t = 0.5)]
    /// Dispersion of each band in eV.
    bandwidth: f64,

    #[arg(long, default_value_t = 32)]
    /// Number of k-points.
    nkpoints: usize,

    #[arg(long, num_args = 3, default_values_t = [1.0, 1.0, 1.0], allow_negative_numbers = true)]
    /// Transition matrix element along x, y and z.
    coupling: Vec<f64>,

    #[arg(long, allow_negative_numbers = true)]
    /// Fermi level in eV, defaults to mid gap.
    efermi: Option<f64>,

    #[arg(long, default_value_t = 100.0)]
    /// Cell volume in Å³, used for the ε₂ prefactor.
    volume: f64,

    #[arg(short = 'o', long, default_value = "eps_imag.txt")]
    /// Write the diagonal components of ε₂ to raw txt file.
    txtout: PathBuf,

    #[arg(long)]
    /// Write the plot to html file.
    htmlout: Option<PathBuf>,

    #[arg(long)]
    /// Open the browser and show the plot immediately, requires `--htmlout`.
    show: bool,
}


/// Model inputs in the layout expected by `imaginary_spectrum`.
pub struct TwobandModel {
    pub cder:       Array5<c64>,
    pub eigs:       Array3<f64>,
    pub kweights:   Array1<f64>,
}


impl TwobandModel {
    pub fn new(gap: f64, bandwidth: f64, nkpoints: usize, coupling: [f64; 3]) -> Result<Self> {
        ensure!(nkpoints >= 1, "Number of k-points must be at least 1.");
        ensure!(gap >= 0.0, "Band gap must be non-negative, got {}", gap);
        ensure!(bandwidth >= 0.0, "Bandwidth must be non-negative, got {}", bandwidth);

        let mut eigs = Array3::<f64>::zeros((2, nkpoints, 1));
        for ik in 0 .. nkpoints {
            let disp = bandwidth * (1.0 - (2.0 * PI * ik as f64 / nkpoints as f64).cos()) / 2.0;
            eigs[(0, ik, 0)] = -disp;
            eigs[(1, ik, 0)] = gap + disp;
        }

        let mut cder = Array5::<c64>::zeros((2, 2, nkpoints, 1, 3));
        for (ik, idir) in iproduct!(0 .. nkpoints, 0 .. 3) {
            cder[(0, 1, ik, 0, idir)] = c64::new(coupling[idir], 0.0);
            cder[(1, 0, ik, 0, idir)] = c64::new(coupling[idir], 0.0);
        }

        Ok(Self {
            cder,
            eigs,
            kweights: Array1::ones(nkpoints),
        })
    }
}


impl OptProcess for Twoband {
    fn process(&self) -> Result<()> {
        let settings = self.optics.settings()?;
        let smearing = settings.smearing()?;
        let nedos = settings.optics.nedos;
        let deltae = settings.optics.deltae;

        ensure!(self.coupling.len() == 3, "Coupling needs 3 components, got {}", self.coupling.len());
        let coupling = [self.coupling[0], self.coupling[1], self.coupling[2]];
        let model = TwobandModel::new(self.gap, self.bandwidth, self.nkpoints, coupling)?;
        let efermi = self.efermi.unwrap_or(self.gap / 2.0);
        let prefactor = eps_constant(self.volume)?;

        info!("Two-band model: gap = {} eV, bandwidth = {} eV, {} k-points, E-fermi = {} eV",
              self.gap, self.bandwidth, self.nkpoints, efermi);

        let spectrum = imaginary_spectrum(model.cder.view(), model.eigs.view(), model.kweights.view(),
                                          efermi, nedos, deltae, smearing)?;
        let energies = spectrum.energies().clone();

        let mut diag: Vec<(String, Vector<f64>)> = Vec::with_capacity(3);
        for comp in spectrum {
            if comp.idir != comp.jdir {
                continue;
            }
            let label = format!("eps_{}{}", Axis::ALL[comp.idir], Axis::ALL[comp.jdir]);
            let eps = comp.values.mapv(|v| v.re * prefactor);
            info!("{}: maximum {:.4} at {:.3} eV", label, eps.fold(f64::MIN, |m, &v| m.max(v)),
                  energies[argmax(&eps)]);
            diag.push((label, eps));
        }

        let header = std::iter::once("E(eV)".to_string())
            .chain(diag.iter().map(|(l, _)| l.clone()))
            .collect::<Vec<String>>()
            .join("  ");
        let columns = std::iter::once(&energies)
            .chain(diag.iter().map(|(_, v)| v))
            .collect::<Vec<&Vector<f64>>>();

        info!("Writing to {:?}", &self.txtout);
        write_array_to_txt(&self.txtout, &columns, &header)?;

        if let Some(htmlout) = self.htmlout.as_ref() {
            let curves = diag.iter()
                .map(|(l, v)| (l.as_str(), v))
                .collect::<Vec<_>>();
            let plot = plot_lines(&energies, &curves, "Imaginary Dielectric Function", "E (eV)", "ε₂");
            save_plot(&plot, htmlout, self.show);
        }

        Ok(())
    }
}


fn argmax(v: &Vector<f64>) -> usize {
    v.iter()
        .enumerate()
        .fold((0, f64::MIN), |(im, vm), (i, &x)| if x > vm { (i, x) } else { (im, vm) })
        .0
}
