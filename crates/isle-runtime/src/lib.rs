//! Session orchestration: edit commands, host/peer authority and replay.
#![forbid(unsafe_code)]

mod authority;
mod command;
mod error;
pub mod hash;
mod script;
mod session;

pub use authority::{Host, Peer};
pub use command::{EditCommand, EditEnvelope, EditRequest};
pub use error::EditError;
pub use hash::terrain_hash;
pub use script::{EditScript, ReplayOutcome, load_script_from_path, load_script_from_str, replay};
pub use session::{ChunkSurface, Session, build_mesh_pool};
