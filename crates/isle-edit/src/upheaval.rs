//! Area edits: earthquakes and volcanoes, followed by an outward repair sweep.

use hashbrown::HashSet;
use isle_geom::{GridPoint, GridRect};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::report::{EditKind, EditReport};
use crate::terrain::Terrain;

/// Points at Chebyshev distance exactly `d` from `center`, counter-clockwise
/// from the bottom-left corner. Out-of-bounds points are included.
pub fn ring_points(center: GridPoint, d: i32) -> Vec<GridPoint> {
    if d <= 0 {
        return vec![center];
    }
    let mut out = Vec::with_capacity(8 * d as usize);
    for dx in -d..=d {
        out.push(center.offset(dx, -d));
    }
    for dz in (-d + 1)..=d {
        out.push(center.offset(d, dz));
    }
    for dx in (-d..d).rev() {
        out.push(center.offset(dx, d));
    }
    for dz in ((-d + 1)..d).rev() {
        out.push(center.offset(-d, dz));
    }
    out
}

impl Terrain {
    /// Chebyshev distance from `center` to the farthest terrain corner. Every
    /// ring beyond it lies completely off the map.
    pub fn reach_from(&self, center: GridPoint) -> i32 {
        let dims = self.dims();
        center
            .x
            .max(dims.tiles_x() - center.x)
            .max(center.z)
            .max(dims.tiles_z() - center.z)
    }

    /// Scrambles the square of radius `radius` around `center` to the water
    /// level or one step above it, drawn from a generator seeded with `seed`.
    pub fn earthquake(&mut self, center: GridPoint, radius: i32, seed: u64) -> EditReport {
        let mut report = EditReport::new(EditKind::Earthquake);
        if radius < 0 || !self.point_in_bounds(center) {
            log::warn!(target: "terrain", "earthquake rejected at ({}, {}) r={}", center.x, center.z, radius);
            return report;
        }
        let radius = radius.min(self.reach_from(center));
        self.begin_edit();
        let dims = *self.dims();
        let water = self.water_level();
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        for p in GridRect::around(center, radius, &dims).points() {
            let target = (water + rng.gen_range(0..=1)).min(dims.max_level);
            if self.write_level(p, target) {
                report.record(p, &dims);
            }
        }
        self.repair_outward(center, radius, &mut report);
        if let Some(area) = report.area {
            self.refresh_centers(area);
        }
        log::debug!(
            target: "terrain",
            "earthquake at ({}, {}) r={} seed={} changed {} points",
            center.x,
            center.z,
            radius,
            seed,
            report.changed
        );
        report
    }

    /// Builds a cone on `center`: the ring at `radius` rises one step above its
    /// highest point, and each inner ring one step more.
    pub fn volcano(&mut self, center: GridPoint, radius: i32) -> EditReport {
        let mut report = EditReport::new(EditKind::Volcano);
        let Some(center_level) = self.point_level(center) else {
            log::warn!(target: "terrain", "volcano outside terrain at ({}, {})", center.x, center.z);
            return report;
        };
        if radius < 0 {
            return report;
        }
        let reach = self.reach_from(center);
        self.begin_edit();
        let dims = *self.dims();
        let base = if radius > reach {
            center_level
        } else {
            ring_points(center, radius)
                .into_iter()
                .filter_map(|p| self.point_level(p))
                .max()
                .unwrap_or(center_level)
        };
        for d in 0..=radius.min(reach) {
            let target = (base + 1).saturating_add(radius - d).min(dims.max_level);
            for p in ring_points(center, d) {
                if p.in_bounds(&dims) && self.write_level(p, target) {
                    report.record(p, &dims);
                }
            }
        }
        self.repair_outward(center, radius.min(reach), &mut report);
        if let Some(area) = report.area {
            self.refresh_centers(area);
        }
        log::debug!(
            target: "terrain",
            "volcano at ({}, {}) r={} changed {} points",
            center.x,
            center.z,
            radius,
            report.changed
        );
        report
    }

    /// Restores the one-step rule outside the core square, ring by ring.
    ///
    /// Each point is clamped into the window allowed by its already-settled
    /// neighbors: the inner rings and the points walked before it on its own
    /// ring. Stops after the first ring that needed no correction.
    fn repair_outward(&mut self, center: GridPoint, radius: i32, report: &mut EditReport) {
        let dims = *self.dims();
        let reach = self.reach_from(center);
        let mut settled: HashSet<GridPoint> = HashSet::new();
        let mut rings = 0;
        for d in (radius + 1)..=reach {
            settled.clear();
            let mut corrections = 0;
            for p in ring_points(center, d) {
                if !p.in_bounds(&dims) {
                    continue;
                }
                let (mut lo, mut hi) = (0, dims.max_level);
                for n in p.neighbors(&dims) {
                    let nd = n.chebyshev(center);
                    if nd < d || settled.contains(&n) {
                        let h = self.level_at(n);
                        lo = lo.max(h - 1);
                        hi = hi.min(h + 1);
                    }
                }
                debug_assert!(lo <= hi, "empty repair window at ({}, {})", p.x, p.z);
                if lo > hi {
                    log::error!(target: "terrain", "empty repair window at ({}, {})", p.x, p.z);
                    hi = lo;
                }
                let h = self.level_at(p);
                let fixed = h.clamp(lo, hi);
                if fixed != h && self.write_level(p, fixed) {
                    report.record(p, &dims);
                    corrections += 1;
                }
                settled.insert(p);
            }
            rings += 1;
            if corrections == 0 {
                break;
            }
        }
        log::trace!(target: "terrain", "repair swept {} rings", rings);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ring_has_8d_points_and_starts_bottom_left() {
        let c = GridPoint::new(10, 10);
        for d in 1..5 {
            let ring = ring_points(c, d);
            assert_eq!(ring.len(), 8 * d as usize);
            assert_eq!(ring[0], c.offset(-d, -d));
            assert!(ring.iter().all(|p| p.chebyshev(c) == d));
            let unique: HashSet<_> = ring.iter().copied().collect();
            assert_eq!(unique.len(), ring.len());
        }
        assert_eq!(ring_points(c, 0), vec![c]);
    }

    #[test]
    fn ring_walk_is_counter_clockwise() {
        let ring = ring_points(GridPoint::new(0, 0), 1);
        let expected = [(-1, -1), (0, -1), (1, -1), (1, 0), (1, 1), (0, 1), (-1, 1), (-1, 0)];
        let got: Vec<(i32, i32)> = ring.iter().map(|p| (p.x, p.z)).collect();
        assert_eq!(got, expected);
    }
}
