//! Voronoi-style fault lines: scattered segment chains, a per-cell
//! distance-to-nearest-fault field, min-max normalization, and a domain
//! warp so the lines do not read as ruler-straight on the final map.

use rand::rngs::StdRng;
use rand::Rng;

use crate::map::OverworldMap;
use crate::noise::distort::distort_field;
use crate::noise::normalize;
use crate::settings::GenerationSettings;

/// Segments per fault chain.
const CHAIN_SEGMENTS: usize = 4;
/// Warp amplitude as a fraction of map width.
const WARP_FRACTION: f32 = 0.02;

/// One fault: a chain of line segments anchored at a map edge.
pub struct FaultLine {
    /// `segments[i] = [start, end]` in cell coordinates.
    pub segments: Vec<[(f32, f32); 2]>,
}

/// Scatter `num_faults` fault chains. Each is anchored at a random point on
/// a random map edge and extended inward by jittered steps scaled to the
/// map width.
pub fn generate_fault_lines(
    settings: &GenerationSettings,
    rng: &mut StdRng,
) -> Vec<FaultLine> {
    let w = settings.width as f32;
    let h = settings.height as f32;

    let mut lines = Vec::with_capacity(settings.num_faults);
    for _ in 0..settings.num_faults {
        // Anchor on one of the four edges; aim roughly inward.
        let (start, mut angle): ((f32, f32), f32) = match rng.gen_range(0..4u8) {
            0 => ((rng.gen_range(0.0..w), 0.0), std::f32::consts::FRAC_PI_2),
            1 => ((rng.gen_range(0.0..w), h - 1.0), -std::f32::consts::FRAC_PI_2),
            2 => ((0.0, rng.gen_range(0.0..h)), 0.0),
            _ => ((w - 1.0, rng.gen_range(0.0..h)), std::f32::consts::PI),
        };

        let mut segments = Vec::with_capacity(CHAIN_SEGMENTS);
        let mut p = start;
        for _ in 0..CHAIN_SEGMENTS {
            // Step length and heading jitter both scale with map width.
            let len = w * rng.gen_range(0.08..0.25);
            angle += rng.gen_range(-0.6..0.6);
            let q = (p.0 + len * angle.cos(), p.1 + len * angle.sin());
            segments.push([p, q]);
            p = q;
        }
        lines.push(FaultLine { segments });
    }
    lines
}

/// Minimum distance from point `p` to the segment `[a, b]`.
pub fn point_segment_distance(p: (f32, f32), a: (f32, f32), b: (f32, f32)) -> f32 {
    let (abx, aby) = (b.0 - a.0, b.1 - a.1);
    let (apx, apy) = (p.0 - a.0, p.1 - a.1);
    let len_sq = abx * abx + aby * aby;
    // Degenerate segment: distance to the point itself.
    let t = if len_sq < 1e-12 {
        0.0
    } else {
        ((apx * abx + apy * aby) / len_sq).clamp(0.0, 1.0)
    };
    let (dx, dy) = (p.0 - (a.0 + t * abx), p.1 - (a.1 + t * aby));
    (dx * dx + dy * dy).sqrt()
}

/// Build the normalized fault field and write it into `map.faults`.
///
/// Policy: after normalization, a mean below 0.5 means most of the map sits
/// close to a fault, which reads as valley-dominated terrain; when
/// `invert_faults_below_mean` is set the field is flipped so faults read as
/// ridges instead.
pub fn apply_faults(map: &mut OverworldMap, settings: &GenerationSettings, rng: &mut StdRng) {
    let lines = generate_fault_lines(settings, rng);
    if lines.iter().all(|l| l.segments.is_empty()) {
        // No faults requested: leave the neutral all-1.0 field in place.
        return;
    }

    let w = map.width;
    let h = map.height_cells;
    let mut field = vec![0.0f32; w * h];
    for y in 0..h {
        for x in 0..w {
            let p = (x as f32, y as f32);
            let mut min_d = f32::INFINITY;
            for line in &lines {
                for seg in &line.segments {
                    min_d = min_d.min(point_segment_distance(p, seg[0], seg[1]));
                }
            }
            field[y * w + x] = min_d;
        }
    }

    normalize(&mut field);

    if settings.invert_faults_below_mean {
        let mean = field.iter().sum::<f32>() / field.len() as f32;
        if mean < 0.5 {
            for v in field.iter_mut() {
                *v = 1.0 - *v;
            }
        }
    }

    // Warp so the min-distance contours lose their straight-line look.
    let warp_seed = rng.gen::<u32>();
    distort_field(&mut field, w, h, w as f32 * WARP_FRACTION, 4.0, warp_seed);

    map.faults = field;
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn small_settings() -> GenerationSettings {
        GenerationSettings {
            width: 48,
            height: 48,
            num_faults: 3,
            ..Default::default()
        }
    }

    #[test]
    fn point_segment_distance_basics() {
        // Perpendicular foot inside the segment.
        let d = point_segment_distance((0.0, 1.0), (-1.0, 0.0), (1.0, 0.0));
        assert!((d - 1.0).abs() < 1e-6);
        // Beyond the endpoint: distance to the endpoint.
        let d = point_segment_distance((3.0, 0.0), (-1.0, 0.0), (1.0, 0.0));
        assert!((d - 2.0).abs() < 1e-6);
        // Degenerate zero-length segment.
        let d = point_segment_distance((3.0, 4.0), (0.0, 0.0), (0.0, 0.0));
        assert!((d - 5.0).abs() < 1e-6);
    }

    #[test]
    fn fault_chains_have_expected_shape() {
        let s = small_settings();
        let mut rng = StdRng::seed_from_u64(42);
        let lines = generate_fault_lines(&s, &mut rng);
        assert_eq!(lines.len(), 3);
        for line in &lines {
            assert_eq!(line.segments.len(), CHAIN_SEGMENTS);
            // Chain continuity: each segment starts where the previous ended.
            for pair in line.segments.windows(2) {
                assert_eq!(pair[0][1], pair[1][0]);
            }
        }
    }

    #[test]
    fn fault_field_is_normalized() {
        let s = small_settings();
        let mut map = OverworldMap::new(s.width, s.height);
        let mut rng = StdRng::seed_from_u64(42);
        apply_faults(&mut map, &s, &mut rng);
        for &f in &map.faults {
            assert!((0.0..=1.0).contains(&f), "fault value {f} left [0, 1]");
        }
        let range = map.faults.iter().cloned().fold(f32::NEG_INFINITY, f32::max)
            - map.faults.iter().cloned().fold(f32::INFINITY, f32::min);
        assert!(range > 0.1, "fault field should have structure, range={range}");
    }

    #[test]
    fn zero_faults_leaves_neutral_field() {
        let s = GenerationSettings { num_faults: 0, ..small_settings() };
        let mut map = OverworldMap::new(s.width, s.height);
        let mut rng = StdRng::seed_from_u64(42);
        apply_faults(&mut map, &s, &mut rng);
        assert!(map.faults.iter().all(|&f| f == 1.0));
    }

    #[test]
    fn fault_field_is_deterministic() {
        let s = small_settings();
        let mut a = OverworldMap::new(s.width, s.height);
        let mut b = OverworldMap::new(s.width, s.height);
        let mut rng_a = StdRng::seed_from_u64(9);
        let mut rng_b = StdRng::seed_from_u64(9);
        apply_faults(&mut a, &s, &mut rng_a);
        apply_faults(&mut b, &s, &mut rng_b);
        assert_eq!(a.faults, b.faults);
    }
}
