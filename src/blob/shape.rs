//! Procedural blob silhouettes.
//!
//! A blob is a closed curve through `edges` points spread at equal angles
//! around the centre of a `size × size` box. Each point's radius is drawn
//! from a seeded generator between an inner radius set by `growth` and the
//! outer radius `size / 2`. Consecutive points are joined by quadratic
//! segments whose end points are the midpoints between neighbours, which
//! keeps the outline smooth.

use glam::Vec2;

use super::path::{to_svg_path, PathCommand};

/// Shape inputs; the same spec always yields the same outline
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlobSpec {
    /// Bounding box side (pixels)
    pub size: f32,
    /// Inner radius in tenths of the outer radius
    pub growth: u32,
    /// Number of control points
    pub edges: u32,
    pub seed: u32,
}

/// Multiply-with-carry generator producing doubles in [0, 1)
#[derive(Debug, Clone)]
struct SeededRandom {
    m_w: u32,
    m_z: u32,
}

impl SeededRandom {
    fn new(seed: u32) -> Self {
        Self {
            m_w: 123_456_789_u32.wrapping_add(seed),
            m_z: 987_654_321_u32.wrapping_sub(seed),
        }
    }

    fn next_f64(&mut self) -> f64 {
        self.m_z = 36969_u32
            .wrapping_mul(self.m_z & 0xffff)
            .wrapping_add(self.m_z >> 16);
        self.m_w = 18000_u32
            .wrapping_mul(self.m_w & 0xffff)
            .wrapping_add(self.m_w >> 16);
        let result = (self.m_z << 16).wrapping_add(self.m_w & 0xffff);
        result as f64 / 4_294_967_296.0
    }
}

/// Map a unit random value into [min, max], folding overshoots back in range
fn magic_radius(value: f64, min: f64, max: f64) -> f64 {
    let radius = min + value * (max - min);
    if radius > max {
        radius - min
    } else if radius < min {
        radius + min
    } else {
        radius
    }
}

/// Outline points, rounded to whole pixels, in angular order
pub fn blob_points(spec: &BlobSpec) -> Vec<Vec2> {
    let outer = spec.size as f64 / 2.0;
    let inner = spec.growth as f64 * (outer / 10.0);
    let center = spec.size as f64 / 2.0;
    let slice_deg = 360.0 / spec.edges.max(1) as f64;
    let mut random = SeededRandom::new(spec.seed);

    (0..spec.edges)
        .map(|i| {
            let degree = i as f64 * slice_deg;
            let radius = magic_radius(random.next_f64(), inner, outer);
            let (sin, cos) = degree.to_radians().sin_cos();
            Vec2::new(
                (center + radius * cos).round() as f32,
                (center + radius * sin).round() as f32,
            )
        })
        .collect()
}

/// Closed outline: one move-to, one quadratic segment per point, close
pub fn blob_path(spec: &BlobSpec) -> Vec<PathCommand> {
    let points = blob_points(spec);
    if points.len() < 2 {
        return Vec::new();
    }

    let n = points.len();
    let mut commands = Vec::with_capacity(n + 2);
    commands.push(PathCommand::MoveTo((points[0] + points[1]) / 2.0));
    for i in 0..n {
        let ctrl = points[(i + 1) % n];
        let next = points[(i + 2) % n];
        commands.push(PathCommand::QuadTo {
            ctrl,
            to: (ctrl + next) / 2.0,
        });
    }
    commands.push(PathCommand::Close);
    commands
}

/// Outline as SVG path data
pub fn blob_svg_path(spec: &BlobSpec) -> String {
    to_svg_path(&blob_path(spec))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(edges: u32, growth: u32) -> BlobSpec {
        BlobSpec {
            size: 100.0,
            growth,
            edges,
            seed: 1,
        }
    }

    #[test]
    fn test_seeded_random_is_deterministic_and_unit() {
        let mut a = SeededRandom::new(1);
        let mut b = SeededRandom::new(1);
        for _ in 0..100 {
            let x = a.next_f64();
            assert_eq!(x, b.next_f64());
            assert!((0.0..1.0).contains(&x));
        }
        assert_ne!(SeededRandom::new(1).next_f64(), SeededRandom::new(2).next_f64());
    }

    #[test]
    fn test_path_structure() {
        let commands = blob_path(&spec(6, 4));
        assert_eq!(commands.len(), 8);
        assert!(matches!(commands[0], PathCommand::MoveTo(_)));
        assert!(commands[1..7]
            .iter()
            .all(|c| matches!(c, PathCommand::QuadTo { .. })));
        assert_eq!(commands[7], PathCommand::Close);
    }

    #[test]
    fn test_path_is_closed_onto_its_start() {
        let commands = blob_path(&spec(9, 5));
        let PathCommand::MoveTo(start) = commands[0] else {
            panic!("path must start with a move");
        };
        let PathCommand::QuadTo { to, .. } = commands[commands.len() - 2] else {
            panic!("last segment must be quadratic");
        };
        assert_eq!(start, to);
    }

    #[test]
    fn test_seed_one_seven_edges_path() {
        assert_eq!(
            blob_svg_path(&spec(7, 6)),
            "M80.5,67.5Q78,85,60.5,83.5Q43,82,31,73.5Q19,65,17,49Q15,33,27.5,18.5\
             Q40,4,59.5,9Q79,14,81,32Q83,50,80.5,67.5Z"
        );
    }

    #[test]
    fn test_shape_is_deterministic() {
        assert_eq!(blob_svg_path(&spec(7, 6)), blob_svg_path(&spec(7, 6)));
        assert_ne!(blob_svg_path(&spec(7, 6)), blob_svg_path(&spec(8, 6)));
    }

    #[test]
    fn test_points_stay_inside_the_box() {
        for growth in 3..9 {
            for edges in 4..16 {
                for p in blob_points(&spec(edges, growth)) {
                    assert!((0.0..=100.0).contains(&p.x), "{p:?}");
                    assert!((0.0..=100.0).contains(&p.y), "{p:?}");
                }
            }
        }
    }

    #[test]
    fn test_radius_between_inner_and_outer() {
        // growth 8: inner radius 40 for a 100px box
        for p in blob_points(&spec(12, 8)) {
            let r = (p - Vec2::splat(50.0)).length();
            assert!((39.0..=51.0).contains(&r), "radius {r}");
        }
    }

    #[test]
    fn test_magic_radius_folds_into_range() {
        assert_eq!(magic_radius(0.5, 10.0, 20.0), 15.0);
        assert_eq!(magic_radius(1.5, 10.0, 20.0), 15.0);
        assert_eq!(magic_radius(-0.5, 10.0, 20.0), 15.0);
    }

    #[test]
    fn test_degenerate_edges_yield_empty_path() {
        assert!(blob_path(&spec(1, 4)).is_empty());
    }
}
