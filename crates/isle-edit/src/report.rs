use isle_geom::{GridDims, GridPoint, GridRect, include_opt};

/// Raise or lower, for point molding.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    Raise,
    Lower,
}

impl Direction {
    #[inline]
    pub fn from_lower(lower: bool) -> Self {
        if lower { Direction::Lower } else { Direction::Raise }
    }

    #[inline]
    pub fn delta(self) -> i32 {
        match self {
            Direction::Raise => 1,
            Direction::Lower => -1,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EditKind {
    Mold(Direction),
    Earthquake,
    Volcano,
}

/// Outcome of one terrain edit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EditReport {
    pub kind: EditKind,
    /// Tight bounds of every point whose level changed; `None` for a no-op.
    pub area: Option<GridRect>,
    pub changed: usize,
    /// Changed points on the terrain border, for wall follow-ups.
    pub perimeter: Vec<GridPoint>,
}

impl EditReport {
    pub fn new(kind: EditKind) -> Self {
        Self {
            kind,
            area: None,
            changed: 0,
            perimeter: Vec::new(),
        }
    }

    #[inline]
    pub fn is_noop(&self) -> bool {
        self.area.is_none()
    }

    pub(crate) fn record(&mut self, p: GridPoint, dims: &GridDims) {
        include_opt(&mut self.area, p);
        self.changed += 1;
        if p.is_edge(dims) {
            self.perimeter.push(p);
        }
    }
}
