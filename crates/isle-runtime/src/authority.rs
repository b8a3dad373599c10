//! Host/peer edit authority: the host validates and sequences edits, peers
//! replay the broadcast commands in order.

use std::collections::BTreeMap;

use crossbeam_channel::{Receiver, Sender, unbounded};
use isle_edit::StructureHook;
use isle_geom::GridRect;
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::command::{EditCommand, EditEnvelope, EditRequest};
use crate::error::EditError;
use crate::session::Session;

/// Stream separating quake seeds from the terrain generation seed.
const QUAKE_SEED_SALT: u64 = 0x51ED_0F_EA27_0000;

/// The single writer. Every accepted request is applied locally first, then
/// its fully specified command is sent to every connected peer.
pub struct Host {
    session: Session,
    rng: ChaCha8Rng,
    peers: Vec<Sender<EditEnvelope>>,
}

impl Host {
    pub fn new(session: Session) -> Self {
        let seed = session.terrain().world().seed ^ QUAKE_SEED_SALT;
        Self {
            session,
            rng: ChaCha8Rng::seed_from_u64(seed),
            peers: Vec::new(),
        }
    }

    #[inline]
    pub fn session(&self) -> &Session {
        &self.session
    }

    #[inline]
    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    pub fn add_hook(&mut self, hook: Box<dyn StructureHook>) {
        self.session.add_hook(hook);
    }

    /// Opens a channel to a new peer. The peer must start from the same world.
    pub fn connect(&mut self) -> Receiver<EditEnvelope> {
        let (tx, rx) = unbounded();
        self.peers.push(tx);
        rx
    }

    /// Closes all peer channels; peers drain what is left and stop.
    pub fn disconnect_all(&mut self) {
        self.peers.clear();
    }

    /// Turns a request into a command. Quake seeds are drawn only once the
    /// command has passed validation.
    fn authorize(&mut self, req: &EditRequest) -> Result<EditCommand, EditError> {
        let mut cmd = match *req {
            EditRequest::Mold { point, lower } => EditCommand::MoldTerrain { point, lower },
            EditRequest::Earthquake { center, radius } => EditCommand::CauseEarthquake {
                center,
                radius,
                seed: 0,
            },
            EditRequest::Volcano { center, radius } => EditCommand::CauseVolcano { center, radius },
            EditRequest::Flood => EditCommand::RaiseWaterLevel,
        };
        if let Err(e) = self.session.validate(&cmd) {
            log::warn!(target: "session", "rejected {}: {}", cmd.name(), e);
            return Err(e);
        }
        if let EditCommand::CauseEarthquake { seed, .. } = &mut cmd {
            *seed = self.rng.next_u64();
        }
        Ok(cmd)
    }

    /// Validates, sequences, applies and broadcasts one request.
    pub fn submit(&mut self, req: &EditRequest) -> Result<(EditEnvelope, Option<GridRect>), EditError> {
        let cmd = self.authorize(req)?;
        let env = EditEnvelope {
            seq: self.session.next_seq(),
            cmd,
        };
        let area = self.session.apply(&env)?;
        self.peers.retain(|tx| tx.send(env.clone()).is_ok());
        Ok((env, area))
    }
}

/// A replica. Envelopes are applied strictly by sequence number; early
/// arrivals wait until the gap is filled.
pub struct Peer {
    session: Session,
    rx: Receiver<EditEnvelope>,
    pending: BTreeMap<u64, EditEnvelope>,
}

impl Peer {
    pub fn new(session: Session, rx: Receiver<EditEnvelope>) -> Self {
        Self {
            session,
            rx,
            pending: BTreeMap::new(),
        }
    }

    #[inline]
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Queues an envelope and applies everything now contiguous.
    /// Returns how many edits were applied.
    pub fn receive(&mut self, env: EditEnvelope) -> Result<usize, EditError> {
        let next = self.session.next_seq();
        if env.seq < next {
            return Err(EditError::OutOfOrder {
                expected: next,
                got: env.seq,
            });
        }
        self.pending.insert(env.seq, env);
        let mut applied = 0;
        while let Some(env) = self.pending.remove(&self.session.next_seq()) {
            self.session.apply(&env)?;
            applied += 1;
        }
        Ok(applied)
    }

    /// Blocks until the host disconnects, applying every edit.
    pub fn run(&mut self) -> Result<usize, EditError> {
        let mut applied = 0;
        while let Ok(env) = self.rx.recv() {
            applied += self.receive(env)?;
        }
        if !self.pending.is_empty() {
            let expected = self.session.next_seq();
            let got = self.pending.keys().next().copied().unwrap_or(expected);
            return Err(EditError::OutOfOrder { expected, got });
        }
        Ok(applied)
    }
}
