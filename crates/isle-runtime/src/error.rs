use isle_chunk::Occupant;
use isle_geom::{GridError, GridTile};

#[derive(Debug, Clone, PartialEq)]
pub enum EditError {
    Grid(GridError),
    InvalidRadius(i32),
    WaterLevelAtMaximum,
    Blocked { tile: GridTile, occupant: Occupant },
    OutOfOrder { expected: u64, got: u64 },
    PeerFailed,
}

impl std::fmt::Display for EditError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EditError::Grid(e) => write!(f, "{}", e),
            EditError::InvalidRadius(r) => write!(f, "invalid radius {}", r),
            EditError::WaterLevelAtMaximum => write!(f, "water level already at maximum"),
            EditError::Blocked { tile, occupant } => write!(
                f,
                "tile ({}, {}) is held by {:?} #{}",
                tile.x, tile.z, occupant.kind, occupant.id
            ),
            EditError::OutOfOrder { expected, got } => {
                write!(f, "edit out of order: expected seq {}, got {}", expected, got)
            }
            EditError::PeerFailed => write!(f, "peer thread failed"),
        }
    }
}

impl std::error::Error for EditError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EditError::Grid(e) => Some(e),
            _ => None,
        }
    }
}

impl From<GridError> for EditError {
    fn from(e: GridError) -> Self {
        EditError::Grid(e)
    }
}
