pub mod types;
pub mod optics;
pub mod settings;
pub mod commands;
pub mod cli;

pub use types::Result;
pub use cli::OptProcess;

pub use optics::{
    Smearing,
    SmearingScheme,
    EnergyGrid,
    ImaginarySpectrum,
    SpectrumComponent,
    imaginary_spectrum,
    grid_step,
    grid_delta,
    eps_constant,
};

pub use settings::{
    Settings,
    OpticsSettings,
};
