pub mod smearing;
pub mod grid;
pub mod epsilon;
pub mod units;

pub use smearing::{
    Smearing,
    SmearingScheme,
};

pub use grid::{
    EnergyGrid,
    grid_step,
    grid_delta,
};

pub use epsilon::{
    imaginary_spectrum,
    ImaginarySpectrum,
    SpectrumComponent,
};

pub use units::eps_constant;
