use isle_geom::GridPoint;
use serde::{Deserialize, Serialize};

/// An edit as submitted to the host, before it is authorized and sequenced.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EditRequest {
    Mold { point: GridPoint, lower: bool },
    Earthquake { center: GridPoint, radius: i32 },
    Volcano { center: GridPoint, radius: i32 },
    Flood,
}

/// A fully specified edit: replaying it on any participant gives the same terrain.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EditCommand {
    MoldTerrain { point: GridPoint, lower: bool },
    CauseEarthquake { center: GridPoint, radius: i32, seed: u64 },
    CauseVolcano { center: GridPoint, radius: i32 },
    RaiseWaterLevel,
}

impl EditCommand {
    pub fn name(&self) -> &'static str {
        match self {
            EditCommand::MoldTerrain { .. } => "mold",
            EditCommand::CauseEarthquake { .. } => "earthquake",
            EditCommand::CauseVolcano { .. } => "volcano",
            EditCommand::RaiseWaterLevel => "flood",
        }
    }
}

/// What the host broadcasts: a command stamped with its position in the edit order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditEnvelope {
    pub seq: u64,
    pub cmd: EditCommand,
}
