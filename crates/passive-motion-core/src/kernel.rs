//! Auxiliary convolution filtering over score grids.
//!
//! A normalized 2D convolution with replicate borders, used to produce
//! smoothed or sharpened diagnostic views of a scored grid. The filter never
//! feeds back into detection; the round loop publishes unfiltered tiles.

use ndarray::{array, Array2};

use crate::error::{CoreError, CoreResult};
use crate::tiles::{ScoredTile, TileGrid};

/// Applies convolution kernels to score grids.
#[derive(Debug, Clone, Copy)]
pub struct KernelFilter;

impl KernelFilter {
    /// Convolves `input` with `kernel`, writing scores into `output` and
    /// returning copies of the output tiles left with a positive score.
    ///
    /// Out-of-bounds taps replicate the nearest edge tile. When the kernel
    /// weights sum to a non-negligible value the result is divided by that
    /// sum, and negative results are clamped to zero. The grids must share a
    /// shape or the call fails with [`CoreError::GridShapeMismatch`].
    pub fn apply(
        kernel: &Array2<f32>,
        input: &TileGrid,
        output: &mut TileGrid,
    ) -> CoreResult<Vec<ScoredTile>> {
        let (width, height) = (input.width(), input.height());
        if output.width() != width || output.height() != height {
            return Err(CoreError::GridShapeMismatch {
                expected: (width, height),
                actual: (output.width(), output.height()),
            });
        }

        let weight_sum: f32 = kernel.iter().sum();
        // Kernel axis 0 runs along x, axis 1 along y
        let (k_x, k_y) = kernel.dim();
        let mid_x = (k_x / 2) as isize;
        let mid_y = (k_y / 2) as isize;

        let mut solution = Vec::new();
        for x in 0..width {
            for y in 0..height {
                let mut acc = 0.0f32;
                for i in 0..k_x {
                    for j in 0..k_y {
                        let tap_x =
                            (x as isize + i as isize - mid_x).clamp(0, width as isize - 1);
                        let tap_y =
                            (y as isize + j as isize - mid_y).clamp(0, height as isize - 1);
                        acc += input.get(tap_x as usize, tap_y as usize).score * kernel[[i, j]];
                    }
                }
                if weight_sum.abs() > 0.001 {
                    acc /= weight_sum;
                }
                if acc < 0.0 {
                    acc = 0.0;
                }
                output.get_mut(x, y).score = acc;
                if acc > 0.0 {
                    solution.push(output.get(x, y).clone());
                }
            }
        }

        Ok(solution)
    }
}

/// 3x3 edge-sharpening kernel. Weights sum to zero, so no normalization.
#[must_use]
pub fn sharpen_3x3() -> Array2<f32> {
    array![
        [-0.25, -0.25, -0.25],
        [-0.25, 2.0, -0.25],
        [-0.25, -0.25, -0.25],
    ]
}

/// 3x3 smoothing kernel.
#[must_use]
pub fn blur_3x3() -> Array2<f32> {
    array![
        [0.05, 0.05, 0.05],
        [0.05, 0.25, 0.05],
        [0.05, 0.05, 0.05],
    ]
}

/// 3x3 sharpening kernel with lighter cardinal weights.
#[must_use]
pub fn cross_3x3() -> Array2<f32> {
    array![
        [-0.25, -0.15, -0.25],
        [-0.15, 2.0, -0.15],
        [-0.25, -0.15, -0.25],
    ]
}

/// 5x5 wide-area contrast kernel.
#[must_use]
pub fn wide_5x5() -> Array2<f32> {
    array![
        [-1.0, -1.0, -1.0, -1.0, -1.0],
        [-1.0, 2.0, 2.0, 2.0, -1.0],
        [-1.0, 2.0, 2.0, 2.0, -1.0],
        [-1.0, 2.0, 2.0, 2.0, -1.0],
        [-1.0, -1.0, -1.0, -1.0, -1.0],
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shape_mismatch_rejected() {
        let input = TileGrid::new(100.0, 100.0, 9, 9);
        let mut output = TileGrid::new(100.0, 100.0, 9, 7);
        let result = KernelFilter::apply(&blur_3x3(), &input, &mut output);
        assert!(matches!(
            result,
            Err(CoreError::GridShapeMismatch { .. })
        ));
    }

    #[test]
    fn test_blur_preserves_uniform_field() {
        let mut input = TileGrid::new(100.0, 100.0, 5, 5);
        for x in 0..5 {
            for y in 0..5 {
                input.get_mut(x, y).score = 2.0;
            }
        }
        let mut output = TileGrid::new(100.0, 100.0, 5, 5);
        let solution = KernelFilter::apply(&blur_3x3(), &input, &mut output).unwrap();

        // Replicate borders plus normalization keep a flat field flat
        assert!(output.iter().all(|(_, _, t)| (t.score - 2.0).abs() < 1e-5));
        assert_eq!(solution.len(), 25);
    }

    #[test]
    fn test_blur_spreads_peak() {
        let mut input = TileGrid::new(100.0, 100.0, 5, 5);
        input.get_mut(2, 2).score = 6.5;
        let mut output = TileGrid::new(100.0, 100.0, 5, 5);
        KernelFilter::apply(&blur_3x3(), &input, &mut output).unwrap();

        // Center keeps 0.25/0.65 of the mass, each neighbor gets 0.05/0.65
        assert!((output.get(2, 2).score - 2.5).abs() < 1e-4);
        assert!((output.get(1, 2).score - 0.5).abs() < 1e-4);
        assert_eq!(output.get(0, 0).score, 0.0);
    }

    #[test]
    fn test_sharpen_clamps_negative_ring() {
        let mut input = TileGrid::new(100.0, 100.0, 5, 5);
        input.get_mut(2, 2).score = 10.0;
        let mut output = TileGrid::new(100.0, 100.0, 5, 5);
        let solution = KernelFilter::apply(&sharpen_3x3(), &input, &mut output).unwrap();

        // Kernel sum is zero so no normalization; the lone peak doubles and
        // its neighbors go negative and are clamped
        assert!((output.get(2, 2).score - 20.0).abs() < 1e-4);
        assert_eq!(output.get(1, 2).score, 0.0);
        assert_eq!(solution.len(), 1);
    }

    #[test]
    fn test_sharpen_zeroes_flat_field() {
        let mut input = TileGrid::new(100.0, 100.0, 5, 5);
        for x in 0..5 {
            for y in 0..5 {
                input.get_mut(x, y).score = 3.0;
            }
        }
        let mut output = TileGrid::new(100.0, 100.0, 5, 5);
        let solution = KernelFilter::apply(&sharpen_3x3(), &input, &mut output).unwrap();
        assert!(solution.is_empty());
    }

    #[test]
    fn test_stock_kernel_shapes() {
        assert_eq!(sharpen_3x3().dim(), (3, 3));
        assert_eq!(blur_3x3().dim(), (3, 3));
        assert_eq!(cross_3x3().dim(), (3, 3));
        assert_eq!(wide_5x5().dim(), (5, 5));
    }
}
