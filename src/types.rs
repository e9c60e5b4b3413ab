use std::fmt;

use ndarray::{
    Array1,
    Array3,
};

pub type Result<T> = anyhow::Result<T>;

#[allow(non_camel_case_types)]
pub type c64 = num::complex::Complex<f64>;

pub type Vector<T> = Array1<T>;  // Define this type to use broadcast operations.
pub type Cube<T>   = Array3<T>;


/// Cartesian direction, the last axis of the transition tensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}


impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];
}


impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let s = match self {
            Axis::X => "x",
            Axis::Y => "y",
            Axis::Z => "z",
        };
        write!(f, "{}", s)
    }
}


#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_axis_display() {
        let labels = Axis::ALL.iter().map(|a| a.to_string()).collect::<Vec<_>>();
        assert_eq!(labels, vec!["x", "y", "z"]);
        assert_eq!(format!("{}{}", Axis::X, Axis::Z), "xz");
    }
}
