use std::path::PathBuf;

use clap::Args;
use log::info;

use crate::{
    types::Result,
    OptProcess,
    settings::Settings,
};


#[derive(Debug, Args)]
/// Print the effective settings as TOML.
///
/// The output can be saved as `~/.rsoptics.config.toml` and edited to change the
/// default smearing and energy grid of all the commands.
pub struct Config {
    #[arg(long)]
    /// Configuration file to be inspected, the default one is used if not specified.
    config: Option<PathBuf>,
}


impl OptProcess for Config {
    fn process(&self) -> Result<()> {
        let settings = match self.config.as_ref() {
            Some(path) => Settings::from_file(path)?,
            None       => {
                if let Some(path) = Settings::default_path() {
                    info!("Default configuration file: {:?}", path);
                }
                Settings::from_default()?
            },
        };

        print!("{}", settings.to_toml()?);
        Ok(())
    }
}
