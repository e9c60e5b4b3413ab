use anyhow::{
    bail,
    ensure,
};
use clap::Args;
use colored::Colorize;

use crate::{
    types::Result,
    OptProcess,
    optics::{
        eps_constant,
        units::EDEPS,
    },
};


#[derive(Debug, Args)]
/// Print the prefactor converting the summed transition strength into ε₂.
///
/// The prefactor is 4π·2·Ry·a₀·π / Ω, Ω being the cell volume in Å³. Either give
/// the volume directly or the three lattice vectors.
pub struct Epsconst {
    #[arg(short, long)]
    /// Cell volume in Å³.
    volume: Option<f64>,

    #[arg(long, num_args = 9, conflicts_with = "volume", allow_negative_numbers = true)]
    /// Lattice vectors in Å, row by row: a1x a1y a1z a2x a2y a2z a3x a3y a3z.
    cell: Option<Vec<f64>>,
}


/// |a1 · (a2 × a3)|
pub fn cell_volume(cell: &[[f64; 3]; 3]) -> f64 {
    let [a, b, c] = cell;
    let bxc = [
        b[1] * c[2] - b[2] * c[1],
        b[2] * c[0] - b[0] * c[2],
        b[0] * c[1] - b[1] * c[0],
    ];
    (a[0] * bxc[0] + a[1] * bxc[1] + a[2] * bxc[2]).abs()
}


impl Epsconst {
    fn volume(&self) -> Result<f64> {
        match (self.volume, self.cell.as_ref()) {
            (Some(v), _)    => Ok(v),
            (None, Some(c)) => {
                ensure!(c.len() == 9, "Lattice needs exactly 9 numbers, got {}", c.len());
                let cell = [
                    [c[0], c[1], c[2]],
                    [c[3], c[4], c[5]],
                    [c[6], c[7], c[8]],
                ];
                Ok(cell_volume(&cell))
            },
            (None, None)    => bail!("Either `--volume` or `--cell` is required."),
        }
    }
}


impl OptProcess for Epsconst {
    fn process(&self) -> Result<()> {
        let volume = self.volume()?;
        let prefactor = eps_constant(volume)?;

        let mut output = String::with_capacity(200);
        output.push_str("----------------------------------------\n");
        output.push_str(&format!(" Cell volume  {:>16} Å³\n", format!("{:.6}", volume).bright_cyan()));
        output.push_str(&format!(" EDEPS        {:>16}\n", format!("{:.6}", EDEPS).bright_cyan()));
        output.push_str(&format!(" Prefactor    {:>16}\n", format!("{:.6}", prefactor).bright_yellow()));
        output.push_str("----------------------------------------");
        println!("{}", output);

        Ok(())
    }
}
