use serde::{Deserialize, Serialize};

use crate::{GridDims, GridPoint};

/// Inclusive rectangle of grid points (`min` bottom-left, `max` top-right).
///
/// Used as the dirty region of an edit: every follow-up (walls, minimap,
/// structure reactions) limits its work to this rectangle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridRect {
    pub min: GridPoint,
    pub max: GridPoint,
}

impl GridRect {
    /// Builds a rectangle from two arbitrary opposite corners.
    #[inline]
    pub fn new(a: GridPoint, b: GridPoint) -> Self {
        Self {
            min: GridPoint::new(a.x.min(b.x), a.z.min(b.z)),
            max: GridPoint::new(a.x.max(b.x), a.z.max(b.z)),
        }
    }

    #[inline]
    pub fn point(p: GridPoint) -> Self {
        Self { min: p, max: p }
    }

    /// Every point of the terrain.
    #[inline]
    pub fn full(dims: &GridDims) -> Self {
        Self {
            min: GridPoint::new(0, 0),
            max: GridPoint::new(dims.tiles_x(), dims.tiles_z()),
        }
    }

    /// Square of Chebyshev radius `r` around `center`, clipped to the terrain.
    pub fn around(center: GridPoint, r: i32, dims: &GridDims) -> Self {
        Self {
            min: GridPoint::new(center.x.saturating_sub(r), center.z.saturating_sub(r)),
            max: GridPoint::new(center.x.saturating_add(r), center.z.saturating_add(r)),
        }
        .clamped(dims)
    }

    #[inline]
    pub fn width(&self) -> i32 {
        self.max.x - self.min.x + 1
    }

    #[inline]
    pub fn height(&self) -> i32 {
        self.max.z - self.min.z + 1
    }

    #[inline]
    pub fn contains(&self, p: GridPoint) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.z >= self.min.z && p.z <= self.max.z
    }

    #[inline]
    pub fn intersects(&self, other: &GridRect) -> bool {
        self.min.x <= other.max.x
            && other.min.x <= self.max.x
            && self.min.z <= other.max.z
            && other.min.z <= self.max.z
    }

    #[inline]
    pub fn include(&mut self, p: GridPoint) {
        self.min.x = self.min.x.min(p.x);
        self.min.z = self.min.z.min(p.z);
        self.max.x = self.max.x.max(p.x);
        self.max.z = self.max.z.max(p.z);
    }

    /// Grows the rectangle by `n` points on every side, then clips it to the terrain.
    #[inline]
    pub fn expanded(self, n: i32, dims: &GridDims) -> GridRect {
        GridRect {
            min: self.min.offset(-n, -n),
            max: self.max.offset(n, n),
        }
        .clamped(dims)
    }

    #[inline]
    pub fn clamped(self, dims: &GridDims) -> GridRect {
        GridRect {
            min: GridPoint::new(self.min.x.max(0), self.min.z.max(0)),
            max: GridPoint::new(self.max.x.min(dims.tiles_x()), self.max.z.min(dims.tiles_z())),
        }
    }

    /// Points in row-major order (z outer, x inner).
    pub fn points(&self) -> impl Iterator<Item = GridPoint> + use<> {
        let GridRect { min, max } = *self;
        (min.z..=max.z).flat_map(move |z| (min.x..=max.x).map(move |x| GridPoint::new(x, z)))
    }
}

/// Grows an optional dirty rectangle to include `p`.
#[inline]
pub fn include_opt(area: &mut Option<GridRect>, p: GridPoint) {
    match area {
        Some(rect) => rect.include(p),
        None => *area = Some(GridRect::point(p)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn include_opt_builds_tight_bounds() {
        let mut area = None;
        include_opt(&mut area, GridPoint::new(4, 6));
        assert_eq!(area, Some(GridRect::point(GridPoint::new(4, 6))));
        include_opt(&mut area, GridPoint::new(2, 7));
        let r = area.unwrap();
        assert_eq!(r.min, GridPoint::new(2, 6));
        assert_eq!(r.max, GridPoint::new(4, 7));
        assert_eq!(r.points().count(), 6);
    }

    #[test]
    fn around_is_clipped_to_terrain() {
        let dims = GridDims::default();
        let r = GridRect::around(GridPoint::new(1, 1), 3, &dims);
        assert_eq!(r.min, GridPoint::new(0, 0));
        assert_eq!(r.max, GridPoint::new(4, 4));
    }
}
