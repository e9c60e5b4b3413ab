//! User settings, layered as: built-in defaults, then `~/.rsoptics.config.toml`
//! (or the file given on command line), then `RSOPTICS_*` environment variables,
//! e.g. `RSOPTICS_OPTICS_SIGMA=0.05`.

use std::path::{
    Path,
    PathBuf,
};

use anyhow::{
    bail,
    Context,
};
use directories::BaseDirs;
use figment::{
    Figment,
    providers::{
        Env,
        Format,
        Serialized,
        Toml,
    },
};
use log::debug;
use serde::{
    Serialize,
    Deserialize,
};

use crate::{
    types::Result,
    optics::{
        EnergyGrid,
        Smearing,
    },
};


pub const CONFIG_NAME: &str = ".rsoptics.config.toml";


#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OpticsSettings {
    /// Smearing scheme, same convention as ISMEAR of VASP.
    pub ismear: i32,

    /// Smearing width in eV.
    pub sigma:  f64,

    /// Number of points of the energy grid.
    pub nedos:  usize,

    /// Energy grid spacing in eV.
    pub deltae: f64,
}


impl Default for OpticsSettings {
    fn default() -> Self {
        Self {
            ismear: 0,
            sigma:  0.1,
            nedos:  2000,
            deltae: 0.01,
        }
    }
}


#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub optics: OpticsSettings,
}


impl Settings {
    /// Path of the user configuration file, `None` if the home directory is unknown.
    pub fn default_path() -> Option<PathBuf> {
        BaseDirs::new().map(|d| d.home_dir().join(CONFIG_NAME))
    }

    /// Load the settings from the default configuration file, missing file is fine.
    pub fn from_default() -> Result<Self> {
        let mut figment = Figment::from(Serialized::defaults(Settings::default()));
        if let Some(path) = Self::default_path() {
            debug!("Loading settings from {:?} if present", &path);
            figment = figment.merge(Toml::file(path));
        }
        Self::from_figment(figment)
    }

    /// Load the settings from an explicitly given configuration file, which must exist.
    pub fn from_file(path: &(impl AsRef<Path> + ?Sized)) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            bail!("[SETTINGS]: Configuration file {:?} not found.", path);
        }
        debug!("Loading settings from {:?}", path);
        let figment = Figment::from(Serialized::defaults(Settings::default()))
            .merge(Toml::file(path));
        Self::from_figment(figment)
            .with_context(|| format!("[SETTINGS]: Failed to load configuration from {:?}", path))
    }

    fn from_figment(figment: Figment) -> Result<Self> {
        let settings: Settings = figment
            .merge(Env::prefixed("RSOPTICS_").split("_"))
            .extract()?;
        settings.check()?;
        Ok(settings)
    }

    fn check(&self) -> Result<()> {
        self.smearing().context("[SETTINGS]: Invalid smearing settings.")?;
        self.grid().context("[SETTINGS]: Invalid energy grid settings.")?;
        Ok(())
    }

    pub fn smearing(&self) -> Result<Smearing> {
        Smearing::from_ismear(self.optics.ismear, self.optics.sigma)
    }

    pub fn grid(&self) -> Result<EnergyGrid> {
        EnergyGrid::new(self.optics.nedos, self.optics.deltae)
    }

    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}
