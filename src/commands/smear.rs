use std::path::PathBuf;

use clap::Args;
use log::info;

use crate::{
    types::Result,
    OptProcess,
    commands::common::{
        OpticsArgs,
        write_array_to_txt,
        plot_lines,
        save_plot,
    },
};


#[derive(Debug, Args)]
/// Sample the smeared step and delta functions on the energy grid.
///
/// The step function is sampled half a grid spacing above each grid point and the
/// delta function is its forward difference, which is how VASP broadens each
/// transition when building the dielectric function.
pub struct Smear {
    #[command(flatten)]
    optics: OpticsArgs,

    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    /// Centre of the smeared functions, in eV.
    x0: f64,

    #[arg(short = 'o', long, default_value = "smear.txt")]
    /// Write the sampled functions to raw txt file.
    txtout: PathBuf,

    #[arg(long)]
    /// Write the plot to html file.
    htmlout: Option<PathBuf>,

    #[arg(long)]
    /// Open the browser and show the plot immediately, requires `--htmlout`.
    show: bool,
}


impl OptProcess for Smear {
    fn process(&self) -> Result<()> {
        let settings = self.optics.settings()?;
        let smearing = settings.smearing()?;
        let grid = settings.grid()?;

        info!("Sampling {:?} of width {} eV centred at {} eV on {} points spaced by {} eV",
              smearing.scheme(), smearing.sigma(), self.x0, grid.len(), grid.spacing());

        let energies = grid.points();
        let step = grid.step_at(self.x0, &smearing);
        let delta = grid.delta_at(self.x0, &smearing);

        info!("Integrated delta function: {:.6}", delta.sum() * grid.spacing());

        info!("Writing to {:?}", &self.txtout);
        write_array_to_txt(&self.txtout, &[&energies, &step, &delta], "E(eV)  step  delta")?;

        if let Some(htmlout) = self.htmlout.as_ref() {
            let plot = plot_lines(&energies, &[("step", &step), ("delta", &delta)],
                                  &format!("{:?} smearing, sigma = {} eV", smearing.scheme(), smearing.sigma()),
                                  "E (eV)", "");
            save_plot(&plot, htmlout, self.show);
        }

        Ok(())
    }
}
