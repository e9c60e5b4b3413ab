use std::{
    fs,
    io::{
        BufWriter,
        Write,
    },
    path::{
        Path,
        PathBuf,
    },
};

use anyhow::{
    bail,
    Context,
};
use clap::Args;
use log::info;
use plotly::{
    Plot,
    Scatter,
    Layout,
    common::{
        Mode,
        Title,
    },
};

use crate::{
    types::{
        Result,
        Vector,
    },
    settings::Settings,
    optics::{
        Smearing,
        SmearingScheme,
    },
};


/// Options shared by the commands that need smearing and energy grid parameters.
///
/// Anything not given here falls back to the configuration file and then to the
/// built-in defaults.
#[derive(Debug, Args, Clone)]
pub struct OpticsArgs {
    #[arg(long)]
    /// Configuration file, `~/.rsoptics.config.toml` is used if not specified.
    pub config: Option<PathBuf>,

    #[arg(long, allow_negative_numbers = true)]
    /// Smearing scheme in VASP convention: -1 for Fermi-Dirac, other negative
    /// values for Gaussian, N >= 0 for Methfessel-Paxton of order N.
    pub ismear: Option<i32>,

    #[arg(long)]
    /// Smearing width in eV.
    pub sigma: Option<f64>,

    #[arg(long, conflicts_with = "sigma")]
    /// Electronic temperature in Kelvin, sets the smearing width to kB * T.
    pub temperature: Option<f64>,

    #[arg(long)]
    /// Number of energy grid points.
    pub nedos: Option<usize>,

    #[arg(long)]
    /// Energy grid spacing in eV.
    pub deltae: Option<f64>,
}


impl OpticsArgs {
    /// Settings from file (or defaults) overridden by command line arguments.
    pub fn settings(&self) -> Result<Settings> {
        let mut settings = match self.config.as_ref() {
            Some(path) => Settings::from_file(path)?,
            None       => Settings::from_default()?,
        };

        if let Some(ismear) = self.ismear { settings.optics.ismear = ismear; }
        if let Some(sigma)  = self.sigma  { settings.optics.sigma  = sigma; }
        if let Some(kelvin) = self.temperature {
            let scheme = SmearingScheme::from_ismear(settings.optics.ismear);
            settings.optics.sigma = Smearing::from_temperature(scheme, kelvin)?.sigma();
            info!("Smearing width from T = {} K: {:.6} eV", kelvin, settings.optics.sigma);
        }
        if let Some(nedos)  = self.nedos  { settings.optics.nedos  = nedos; }
        if let Some(deltae) = self.deltae { settings.optics.deltae = deltae; }

        settings.smearing().context("Invalid smearing arguments.")?;
        settings.grid().context("Invalid energy grid arguments.")?;

        Ok(settings)
    }
}


/// Write columns of data as a plain text table, the first line is `# comment`.
pub fn write_array_to_txt(file_name: &(impl AsRef<Path> + ?Sized), ys: &[&Vector<f64>], comment: &str) -> Result<()> {
    let nrow = ys.first()
        .context("[WRT_ARRAY]: At least one data set is needed.")?
        .len();

    if nrow == 0 || !ys.iter().all(|y| y.len() == nrow) {
        bail!("[WRT_ARRAY]: input data with zero length or they don't have consistent lengths");
    }

    let f = fs::File::create(file_name)
        .with_context(|| format!("Cannot create file {:?}", file_name.as_ref()))?;
    let mut f = BufWriter::new(f);

    writeln!(f, "# {}", comment.trim())?;
    for irow in 0 .. nrow {
        for y in ys {
            write!(f, "  {:15.6}", y[irow])?;
        }
        writeln!(f)?;
    }

    f.flush()?;
    Ok(())
}


/// Line plot of several curves sharing the same x axis.
pub fn plot_lines(x: &Vector<f64>, ys: &[(&str, &Vector<f64>)], title: &str, xlabel: &str, ylabel: &str) -> Plot {
    let mut plot = Plot::new();

    for (name, y) in ys {
        let trace = Scatter::new(x.to_vec(), y.to_vec())
            .mode(Mode::Lines)
            .name(*name);
        plot.add_trace(trace);
    }

    let layout = Layout::new()
        .title(Title::with_text(title))
        .x_axis(plotly::layout::Axis::new()
                .title(Title::with_text(xlabel)))
        .y_axis(plotly::layout::Axis::new()
                .title(Title::with_text(ylabel))
                .zero_line(true));
    plot.set_layout(layout);

    plot
}


/// Save the plot to html, and open it in the browser if `show` is set.
pub fn save_plot(plot: &Plot, htmlout: &Path, show: bool) {
    info!("Writing to {:?}", htmlout);
    plot.write_html(htmlout);

    if show {
        plot.show();
    }
}
