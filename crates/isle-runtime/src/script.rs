use std::error::Error;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread;

use isle_world::World;
use rayon::ThreadPool;
use serde::Deserialize;

use crate::authority::{Host, Peer};
use crate::command::EditRequest;
use crate::error::EditError;
use crate::session::Session;

/// A scripted edit sequence, replayed through a host and its peers.
#[derive(Clone, Debug, Deserialize)]
pub struct EditScript {
    #[serde(default)]
    pub seed: u64,
    #[serde(default = "default_peers")]
    pub peers: usize,
    /// World generation config; defaults are used when omitted.
    #[serde(default)]
    pub world: Option<PathBuf>,
    #[serde(default)]
    pub edits: Vec<EditRequest>,
}
fn default_peers() -> usize {
    2
}

pub fn load_script_from_str(s: &str) -> Result<EditScript, Box<dyn Error>> {
    let script: EditScript = toml::from_str(s)?;
    Ok(script)
}

pub fn load_script_from_path(path: &Path) -> Result<EditScript, Box<dyn Error>> {
    let s = std::fs::read_to_string(path)?;
    load_script_from_str(&s)
}

#[derive(Debug)]
pub struct ReplayOutcome {
    pub applied: usize,
    /// Index into the script and the reason for every rejected request.
    pub rejected: Vec<(usize, EditError)>,
    pub host_hash: u64,
    pub peer_hashes: Vec<u64>,
}

impl ReplayOutcome {
    pub fn in_sync(&self) -> bool {
        self.peer_hashes.iter().all(|&h| h == self.host_hash)
    }
}

/// Runs `edits` on a host with `peers` replicas, each on its own thread, and
/// reports the final state hashes.
pub fn replay(
    world: &World,
    edits: &[EditRequest],
    peers: usize,
    pool: Arc<ThreadPool>,
) -> Result<ReplayOutcome, EditError> {
    let mut host = Host::new(Session::new(world, Arc::clone(&pool)));
    let mut handles = Vec::with_capacity(peers);
    for i in 0..peers {
        let rx = host.connect();
        let world = world.clone();
        let pool = Arc::clone(&pool);
        handles.push(
            thread::Builder::new()
                .name(format!("isle-peer-{i}"))
                .spawn(move || -> Result<u64, EditError> {
                    let mut peer = Peer::new(Session::new(&world, pool), rx);
                    let applied = peer.run()?;
                    log::debug!(target: "session", "peer {} applied {} edits", i, applied);
                    Ok(peer.session().state_hash())
                })
                .map_err(|_| EditError::PeerFailed)?,
        );
    }

    let mut applied = 0;
    let mut rejected = Vec::new();
    for (i, req) in edits.iter().enumerate() {
        match host.submit(req) {
            Ok(_) => applied += 1,
            Err(e) => rejected.push((i, e)),
        }
    }
    host.disconnect_all();

    let mut peer_hashes = Vec::with_capacity(peers);
    for h in handles {
        peer_hashes.push(h.join().map_err(|_| EditError::PeerFailed)??);
    }
    let host_hash = host.session().state_hash();
    log::info!(
        target: "session",
        "replay done: applied={} rejected={} host={:016x}",
        applied,
        rejected.len(),
        host_hash
    );
    Ok(ReplayOutcome {
        applied,
        rejected,
        host_hash,
        peer_hashes,
    })
}
