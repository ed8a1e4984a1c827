//! Per-cue blob grid synthesis.

use super::color::TriadicColours;
use crate::params::SketchParams;

/// Tolerance so float grid steps never lose the boundary point
const GRID_EPSILON: f64 = 1e-6;

/// One blob placement of a cue
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlobDescriptor {
    pub x: f32,
    pub y: f32,
    pub growth: u32,
    pub edges: u32,
    pub colours: TriadicColours,
    pub divisor: u32,
}

/// Grid step for a canvas width and divisor (pixels)
pub fn grid_step(width: u32, divisor: u32) -> f64 {
    width as f64 / divisor as f64
}

/// Number of boundary-inclusive grid points covering `0..=limit`
pub fn points_along(limit: f64, step: f64) -> usize {
    if step <= 0.0 {
        return 1;
    }
    (limit / step + GRID_EPSILON).floor() as usize + 1
}

/// Grid dimensions `(columns, rows)`: x spans the width, y the height plus one step
pub fn grid_dimensions(width: u32, height: u32, divisor: u32) -> (usize, usize) {
    let step = grid_step(width, divisor);
    (
        points_along(width as f64, step),
        points_along(height as f64 + step, step),
    )
}

/// Generate descriptors for every grid point, column by column
pub fn generate_grid(
    width: u32,
    height: u32,
    divisor: u32,
    params: &SketchParams,
    rng: &mut fastrand::Rng,
) -> Vec<BlobDescriptor> {
    let step = grid_step(width, divisor);
    let (columns, rows) = grid_dimensions(width, height, divisor);
    let mut blobs = Vec::with_capacity(columns * rows);

    for col in 0..columns {
        for row in 0..rows {
            let hue = rng.f32() * 360.0;
            blobs.push(BlobDescriptor {
                x: (col as f64 * step) as f32,
                y: (row as f64 * step) as f32,
                growth: rng.u32(params.growth_range.clone()),
                edges: rng.u32(params.edges_range.clone()),
                colours: TriadicColours::from_hue(hue),
                divisor,
            });
        }
    }

    blobs
}

/// Pick a divisor uniformly from the candidates
pub fn pick_divisor(divisors: &[u32], rng: &mut fastrand::Rng) -> Option<u32> {
    rng.choice(divisors.iter().copied())
}

/// Full descriptor set for one cue: random divisor, grid, then shuffled
pub fn generate_cue_blobs(
    width: u32,
    height: u32,
    params: &SketchParams,
    rng: &mut fastrand::Rng,
) -> Vec<BlobDescriptor> {
    let Some(divisor) = pick_divisor(&params.divisors, rng) else {
        return Vec::new();
    };
    let mut blobs = generate_grid(width, height, divisor, params, rng);
    rng.shuffle(&mut blobs);
    blobs
}

/// Milliseconds between consecutive blob draws of one cue
pub fn blob_delay_ms(duration_ms: f64, count: usize) -> f64 {
    if count == 0 {
        return 0.0;
    }
    duration_ms / count as f64
}

/// Draw offsets from the cue instant: `delay * i`
pub fn draw_offsets_ms(duration_ms: f64, count: usize) -> Vec<f64> {
    let delay = blob_delay_ms(duration_ms, count);
    (0..count).map(|i| delay * i as f64).collect()
}

/// Outline sizes of the three concentric blobs (pixels)
pub fn outline_sizes(width: u32, divisor: u32, ratios: &[f32; 3]) -> [f32; 3] {
    ratios.map(|ratio| width as f32 / (divisor as f32 * ratio))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rng() -> fastrand::Rng {
        fastrand::Rng::with_seed(42)
    }

    #[test]
    fn test_grid_800x600_divisor_8() {
        assert_eq!(grid_step(800, 8), 100.0);
        assert_eq!(grid_dimensions(800, 600, 8), (9, 8));

        let blobs = generate_grid(800, 600, 8, &SketchParams::default(), &mut rng());
        assert_eq!(blobs.len(), 72);

        let max_x = blobs.iter().map(|b| b.x).fold(0.0, f32::max);
        let max_y = blobs.iter().map(|b| b.y).fold(0.0, f32::max);
        assert_eq!(max_x, 800.0);
        assert_eq!(max_y, 700.0);
    }

    #[test]
    fn test_grid_count_is_pure_function_of_size() {
        for &divisor in &crate::params::GRID_DIVISORS {
            let (cols, rows) = grid_dimensions(1280, 720, divisor);
            let a = generate_grid(1280, 720, divisor, &SketchParams::default(), &mut rng());
            let b = generate_grid(
                1280,
                720,
                divisor,
                &SketchParams::default(),
                &mut fastrand::Rng::with_seed(7),
            );
            assert_eq!(a.len(), cols * rows);
            assert_eq!(a.len(), b.len());
        }
    }

    #[test]
    fn test_boundary_survives_inexact_step() {
        // 1000 / 12 is not representable; the right edge must still be included
        let (cols, _) = grid_dimensions(1000, 600, 12);
        assert_eq!(cols, 13);
    }

    #[test]
    fn test_height_not_a_multiple_of_step() {
        // y runs 0..=750 in steps of 100 -> 0..=700
        assert_eq!(grid_dimensions(800, 650, 8), (9, 8));
    }

    #[test]
    fn test_descriptor_ranges() {
        let params = SketchParams::default();
        for blob in generate_grid(640, 480, 16, &params, &mut rng()) {
            assert!((3..9).contains(&blob.growth));
            assert!((4..16).contains(&blob.edges));
            assert!((0.0..360.0).contains(&blob.colours.0[0].hue));
            assert_eq!(blob.divisor, 16);
        }
    }

    #[test]
    fn test_shuffle_is_a_permutation() {
        let params = SketchParams {
            divisors: vec![8],
            ..SketchParams::default()
        };
        let mut a = fastrand::Rng::with_seed(3);
        let mut b = fastrand::Rng::with_seed(3);

        let shuffled = generate_cue_blobs(800, 600, &params, &mut a);
        // Same draws up to the shuffle
        pick_divisor(&params.divisors, &mut b);
        let ordered = generate_grid(800, 600, 8, &params, &mut b);

        assert_eq!(shuffled.len(), ordered.len());
        assert_ne!(shuffled, ordered);
        for blob in &ordered {
            assert!(shuffled.contains(blob));
        }
    }

    #[test]
    fn test_pick_divisor_from_candidates() {
        let mut rng = rng();
        for _ in 0..50 {
            let d = pick_divisor(&crate::params::GRID_DIVISORS, &mut rng).unwrap();
            assert!(crate::params::GRID_DIVISORS.contains(&d));
        }
        assert_eq!(pick_divisor(&[], &mut rng), None);
    }

    #[test]
    fn test_delays_2000ms_over_4_blobs() {
        assert_eq!(draw_offsets_ms(2000.0, 4), vec![0.0, 500.0, 1000.0, 1500.0]);
    }

    #[test]
    fn test_delays_strictly_increase() {
        let offsets = draw_offsets_ms(730.0, 57);
        assert!(offsets.windows(2).all(|w| w[0] < w[1]));
        assert!(*offsets.last().unwrap() < 730.0);
    }

    #[test]
    fn test_no_blobs_no_delay() {
        assert_eq!(blob_delay_ms(1000.0, 0), 0.0);
        assert!(draw_offsets_ms(1000.0, 0).is_empty());
    }

    #[test]
    fn test_outline_sizes_shrink() {
        let [a, b, c] = outline_sizes(1200, 10, &[0.9, 1.2, 1.5]);
        assert!((b - 100.0).abs() < 1e-3);
        assert!(a > b && b > c);
    }
}
