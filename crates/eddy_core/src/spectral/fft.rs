use nalgebra::DMatrix;
use num_complex::Complex;
use rustfft::{Fft, FftPlanner};
use std::fmt;
use std::sync::Arc;

/// Complex 2-D transforms of grid-shaped matrices, with plans built once.
#[derive(Clone)]
pub struct Fft2d {
    shape: (usize, usize),
    forward_x: Arc<dyn Fft<f64>>,
    forward_y: Arc<dyn Fft<f64>>,
    inverse_x: Arc<dyn Fft<f64>>,
    inverse_y: Arc<dyn Fft<f64>>,
}

impl Fft2d {
    pub fn new(shape: (usize, usize)) -> Self {
        let mut planner = FftPlanner::<f64>::new();
        Self {
            shape,
            forward_x: planner.plan_fft_forward(shape.0),
            forward_y: planner.plan_fft_forward(shape.1),
            inverse_x: planner.plan_fft_inverse(shape.0),
            inverse_y: planner.plan_fft_inverse(shape.1),
        }
    }

    pub fn shape(&self) -> (usize, usize) {
        self.shape
    }

    pub fn forward(&self, field: &DMatrix<f64>) -> DMatrix<Complex<f64>> {
        let mut spectrum = field.map(|x| Complex::new(x, 0.0));
        self.transform(&mut spectrum, &self.forward_x, &self.forward_y);
        spectrum
    }

    /// Normalised inverse transform; the imaginary part is discarded.
    pub fn inverse(&self, spectrum: &DMatrix<Complex<f64>>) -> DMatrix<f64> {
        let mut field = spectrum.clone();
        self.transform(&mut field, &self.inverse_x, &self.inverse_y);
        let norm = 1.0 / (self.shape.0 * self.shape.1) as f64;
        field.map(|z| z.re * norm)
    }

    fn transform(
        &self,
        data: &mut DMatrix<Complex<f64>>,
        along_x: &Arc<dyn Fft<f64>>,
        along_y: &Arc<dyn Fft<f64>>,
    ) {
        assert_eq!(
            data.shape(),
            self.shape,
            "FFT planned for {:?} applied to a {:?} matrix",
            self.shape,
            data.shape()
        );
        // Storage is column-major, so each column is one contiguous x-transform.
        along_x.process(data.as_mut_slice());
        let mut transposed = data.transpose();
        along_y.process(transposed.as_mut_slice());
        *data = transposed.transpose();
    }
}

impl fmt::Debug for Fft2d {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Fft2d").field("shape", &self.shape).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::Fft2d;
    use nalgebra::DMatrix;
    use std::f64::consts::PI;

    #[test]
    fn inverse_undoes_forward() {
        let field = DMatrix::from_fn(6, 4, |i, j| (i as f64 * 0.7).sin() + (j * j) as f64);
        let fft = Fft2d::new((6, 4));
        let back = fft.inverse(&fft.forward(&field));
        for (a, b) in back.iter().zip(field.iter()) {
            assert!((a - b).abs() < 1e-12);
        }
    }

    #[test]
    fn single_mode_lands_on_its_wavenumber() {
        let (nx, ny) = (8, 8);
        let field = DMatrix::from_fn(nx, ny, |_, j| (2.0 * PI * 3.0 * j as f64 / ny as f64).cos());
        let spectrum = Fft2d::new((nx, ny)).forward(&field);
        let total = (nx * ny) as f64;
        assert!((spectrum[(0, 3)].re - total / 2.0).abs() < 1e-9);
        assert!((spectrum[(0, 5)].re - total / 2.0).abs() < 1e-9);
        let rest: f64 = spectrum
            .iter()
            .enumerate()
            .filter(|(index, _)| *index != 3 * nx && *index != 5 * nx)
            .map(|(_, z)| z.norm())
            .sum();
        assert!(rest < 1e-9);
    }

    #[test]
    #[should_panic(expected = "FFT planned for")]
    fn mismatched_shape_panics() {
        Fft2d::new((4, 4)).forward(&DMatrix::zeros(4, 3));
    }
}
