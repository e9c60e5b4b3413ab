pub mod common;
pub mod smear;
pub mod epsconst;
pub mod twoband;
pub mod config;
