use std::collections::VecDeque;

use hashbrown::HashSet;
use isle_geom::GridPoint;

use crate::report::{Direction, EditKind, EditReport};
use crate::terrain::Terrain;

impl Terrain {
    /// Raises or lowers one point by a step and drags its surroundings along
    /// until no two adjacent points differ by more than one level.
    ///
    /// Points are processed breadth-first and each changes at most once, so the
    /// edit touches the minimal set of points. At the bounds (`0`/`max_level`)
    /// the edit is a no-op.
    pub fn modify_point(&mut self, p: GridPoint, dir: Direction) -> EditReport {
        let mut report = EditReport::new(EditKind::Mold(dir));
        let Some(level) = self.point_level(p) else {
            log::warn!(target: "terrain", "modify_point outside terrain at ({}, {})", p.x, p.z);
            return report;
        };
        self.begin_edit();
        let dims = *self.dims();
        if !self.write_level(p, level + dir.delta()) {
            return report;
        }
        report.record(p, &dims);

        let mut visited: HashSet<GridPoint> = HashSet::new();
        visited.insert(p);
        let mut queue = VecDeque::from([p]);
        while let Some(cur) = queue.pop_front() {
            let h = self.level_at(cur);
            for n in cur.neighbors(&dims) {
                if visited.contains(&n) {
                    continue;
                }
                let nh = self.level_at(n);
                let target = match dir {
                    Direction::Raise if h - nh > 1 => h - 1,
                    Direction::Lower if nh - h > 1 => h + 1,
                    _ => continue,
                };
                visited.insert(n);
                if self.write_level(n, target) {
                    report.record(n, &dims);
                    queue.push_back(n);
                }
            }
        }
        debug_assert!(visited.len() <= dims.point_count());

        if let Some(area) = report.area {
            self.refresh_centers(area);
        }
        log::debug!(
            target: "terrain",
            "mold {:?} at ({}, {}) changed {} points",
            dir,
            p.x,
            p.z,
            report.changed
        );
        report
    }
}
