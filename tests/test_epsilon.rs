use approx::{
    assert_abs_diff_eq,
    assert_relative_eq,
};
use ndarray::{
    arr1,
    s,
    Array1,
    Array3,
    Array5,
};
use num::complex::Complex;
use rand::{
    Rng,
    SeedableRng,
    rngs::StdRng,
};
use rsoptics::{
    Smearing,
    SmearingScheme,
    imaginary_spectrum,
    grid_step,
};

#[allow(non_camel_case_types)]
type c64 = Complex<f64>;


fn random_input(nbands: usize, nkpoints: usize, nspin: usize, seed: u64) -> (Array5<c64>, Array3<f64>, Array1<f64>) {
    let mut rng = StdRng::seed_from_u64(seed);
    let cder = Array5::from_shape_fn((nbands, nbands, nkpoints, nspin, 3), |_| {
        c64::new(rng.gen_range(-1.0 .. 1.0), rng.gen_range(-1.0 .. 1.0))
    });
    let eigs = Array3::from_shape_fn((nbands, nkpoints, nspin), |(ib, _, _)| {
        ib as f64 * 0.8 - 1.5 + rng.gen_range(-0.2 .. 0.2)
    });
    let kweights = Array1::from_shape_fn(nkpoints, |_| rng.gen_range(0.5 .. 2.0));
    (cder, eigs, kweights)
}


#[test]
fn test_zero_coupling() {
    let cder = Array5::<c64>::zeros((3, 3, 2, 1, 3));
    let eigs = Array3::from_shape_fn((3, 2, 1), |(ib, ik, _)| ib as f64 + 0.1 * ik as f64);
    let kw = arr1(&[1.0, 3.0]);
    let smearing = Smearing::new(SmearingScheme::Gaussian, 0.1).unwrap();

    let spec = imaginary_spectrum(cder.view(), eigs.view(), kw.view(), 0.5, 50, 0.1, smearing).unwrap();
    let comps = spec.collect::<Vec<_>>();
    assert_eq!(comps.len(), 9);
    for c in comps.iter() {
        assert_eq!(c.values.len(), 50);
        assert!(c.values.iter().all(|v| *v == c64::new(0.0, 0.0)));
    }
}

#[test]
fn test_single_transition_weight() {
    let sigma = 0.1;
    let (nedos, deltae) = (400, 0.01);
    for scheme in [SmearingScheme::FermiDirac, SmearingScheme::Gaussian, SmearingScheme::MethfesselPaxton(2)] {
        let smearing = Smearing::new(scheme, sigma).unwrap();

        let mut cder = Array5::<c64>::zeros((2, 2, 1, 1, 3));
        cder[(0, 1, 0, 0, 0)] = c64::new(1.0, 0.0);
        let eigs = Array3::from_shape_vec((2, 1, 1), vec![0.0, 1.0]).unwrap();
        let kw = arr1(&[1.0]);

        let spec = imaginary_spectrum(cder.view(), eigs.view(), kw.view(), 0.5, nedos, deltae, smearing).unwrap();
        let comps = spec.collect::<Vec<_>>();

        let rspin = 2.0;
        let weight = rspin * (scheme.step(0.5 / sigma) - scheme.step(-0.5 / sigma));
        let kernel = grid_step(1.0, sigma, nedos, deltae, scheme).unwrap();
        let expected = weight * (kernel[nedos - 1] - kernel[0]);

        let xx = &comps[0];
        assert_eq!((xx.idir, xx.jdir), (0, 0));
        let total = xx.values.sum() * deltae;
        assert_relative_eq!(total.re, expected, max_relative = 1E-10);
        assert_abs_diff_eq!(total.im, 0.0);
        assert_abs_diff_eq!(total.re, weight, epsilon = 1E-3);

        for c in comps.iter().skip(1) {
            assert!(c.values.iter().all(|v| *v == c64::new(0.0, 0.0)),
                    "component ({}, {}) should vanish", c.idir, c.jdir);
        }
    }
}

#[test]
fn test_energy_grid() {
    let (cder, eigs, kw) = random_input(3, 2, 1, 7);
    let smearing = Smearing::from_ismear(-1, 0.05).unwrap();
    let spec = imaginary_spectrum(cder.view(), eigs.view(), kw.view(), 0.0, 123, 0.025, smearing).unwrap();

    let grid = spec.energies().clone();
    assert_eq!(grid.len(), 123);
    for c in spec {
        assert_eq!(c.energies, grid);
        assert_eq!(c.energies[0], 0.0);
        assert_abs_diff_eq!(c.energies[122], 122.0 * 0.025);
    }
}

#[test]
fn test_conjugate_symmetry() {
    let (cder, eigs, kw) = random_input(4, 3, 2, 42);
    let smearing = Smearing::from_ismear(1, 0.1).unwrap();
    let tensor = imaginary_spectrum(cder.view(), eigs.view(), kw.view(), 0.1, 200, 0.02, smearing)
        .unwrap()
        .into_tensor();

    for i in 0 .. 3 {
        for j in 0 .. 3 {
            let ij = tensor.slice(s![i, j, ..]);
            let ji = tensor.slice(s![j, i, ..]);
            for (a, b) in ij.iter().zip(ji.iter()) {
                assert_abs_diff_eq!(a.re,  b.re, epsilon = 1E-10);
                assert_abs_diff_eq!(a.im, -b.im, epsilon = 1E-10);
            }
        }
        assert!(tensor.slice(s![i, i, ..]).iter().all(|v| v.im.abs() < 1E-10));
    }
}

#[test]
fn test_tensor_matches_iterator() {
    let (cder, eigs, kw) = random_input(3, 2, 1, 3);
    let smearing = Smearing::from_ismear(-5, 0.08).unwrap();

    let tensor = imaginary_spectrum(cder.view(), eigs.view(), kw.view(), -0.2, 80, 0.05, smearing)
        .unwrap()
        .into_tensor();
    let spec = imaginary_spectrum(cder.view(), eigs.view(), kw.view(), -0.2, 80, 0.05, smearing).unwrap();
    for c in spec {
        for (a, b) in tensor.slice(s![c.idir, c.jdir, ..]).iter().zip(c.values.iter()) {
            assert_abs_diff_eq!(a.re, b.re, epsilon = 1E-12);
            assert_abs_diff_eq!(a.im, b.im, epsilon = 1E-12);
        }
    }

    // partially consumed iterator leaves the consumed components as zero
    let mut spec = imaginary_spectrum(cder.view(), eigs.view(), kw.view(), -0.2, 80, 0.05, smearing).unwrap();
    spec.next();
    let rest = spec.into_tensor();
    assert!(rest.slice(s![0, 0, ..]).iter().all(|v| *v == c64::new(0.0, 0.0)));
    assert_abs_diff_eq!(rest[(2, 2, 40)].re, tensor[(2, 2, 40)].re, epsilon = 1E-12);
}

#[test]
fn test_kweights_normalized() {
    let (cder, eigs, kw) = random_input(3, 2, 1, 11);
    let smearing = Smearing::from_ismear(0, 0.1).unwrap();
    let scaled = kw.mapv(|w| w * 17.0);

    let a = imaginary_spectrum(cder.view(), eigs.view(), kw.view(), 0.0, 60, 0.05, smearing).unwrap().into_tensor();
    let b = imaginary_spectrum(cder.view(), eigs.view(), scaled.view(), 0.0, 60, 0.05, smearing).unwrap().into_tensor();
    for (x, y) in a.iter().zip(b.iter()) {
        assert_abs_diff_eq!(x.re, y.re, epsilon = 1E-10);
        assert_abs_diff_eq!(x.im, y.im, epsilon = 1E-10);
    }
}

#[test]
fn test_spin_degeneracy() {
    // the same single channel, once spin-unpolarized and once duplicated in two spin channels
    let (cder1, eigs1, kw) = random_input(3, 2, 1, 5);
    let mut cder2 = Array5::<c64>::zeros((3, 3, 2, 2, 3));
    let mut eigs2 = Array3::<f64>::zeros((3, 2, 2));
    for ispin in 0 .. 2 {
        cder2.slice_mut(s![.., .., .., ispin, ..]).assign(&cder1.slice(s![.., .., .., 0, ..]));
        eigs2.slice_mut(s![.., .., ispin]).assign(&eigs1.slice(s![.., .., 0]));
    }

    let smearing = Smearing::from_ismear(-1, 0.1).unwrap();
    let a = imaginary_spectrum(cder1.view(), eigs1.view(), kw.view(), 0.0, 100, 0.04, smearing).unwrap().into_tensor();
    let b = imaginary_spectrum(cder2.view(), eigs2.view(), kw.view(), 0.0, 100, 0.04, smearing).unwrap().into_tensor();
    for (x, y) in a.iter().zip(b.iter()) {
        assert_abs_diff_eq!(x.re, y.re, epsilon = 1E-10);
        assert_abs_diff_eq!(x.im, y.im, epsilon = 1E-10);
    }
}

#[test]
fn test_invalid_inputs() {
    let (cder, eigs, kw) = random_input(2, 1, 1, 1);
    let smearing = Smearing::from_ismear(0, 0.1).unwrap();
    assert!(imaginary_spectrum(cder.view(), eigs.view(), kw.view(), 0.0, 0, 0.05, smearing).is_err());
    assert!(imaginary_spectrum(cder.view(), eigs.view(), kw.view(), 0.0, 10, -0.05, smearing).is_err());

    let cder3 = Array5::<c64>::zeros((2, 2, 1, 3, 3));
    let eigs3 = Array3::<f64>::zeros((2, 1, 3));
    assert!(imaginary_spectrum(cder3.view(), eigs3.view(), kw.view(), 0.0, 10, 0.05, smearing).is_err());

    assert!(Smearing::from_ismear(0, 0.0).is_err());
    assert!(toml::from_str::<Smearing>("scheme = \"Gaussian\"\nsigma = -0.1").is_err());
    assert!(SmearingScheme::methfessel_paxton(-2).is_err());
}
