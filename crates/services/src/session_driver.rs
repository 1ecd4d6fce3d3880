use deck_core::model::{Card, CardId};
use deck_core::session::{MarkOutcome, ReviewSession, SessionState};

/// Generation counter for one review session. Bumped on every reset so that
/// timer events raised against an older session can be recognized and dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct SessionEpoch(u64);

impl SessionEpoch {
    fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

/// Capability to tick one specific session generation.
///
/// Handed out by the driver; a token minted before a reset no longer matches
/// and its ticks are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickToken {
    epoch: SessionEpoch,
}

/// Read-side view of the driver after a mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub state: SessionState,
    pub time_remaining: u32,
    pub is_active: bool,
    pub queue_len: usize,
    pub current_card: Option<Card>,
    pub tick_token: TickToken,
}

/// Owns a `ReviewSession` plus its epoch, guarding ticks across resets.
///
/// A tick raised for session N must not apply once session N+1 has started;
/// the epoch comparison makes the reset atomic with respect to in-flight
/// ticks no matter how late they are delivered.
#[derive(Debug)]
pub struct SessionDriver {
    session: ReviewSession,
    epoch: SessionEpoch,
}

impl SessionDriver {
    #[must_use]
    pub fn start(cards: Vec<Card>) -> Self {
        Self {
            session: ReviewSession::start(cards),
            epoch: SessionEpoch(0),
        }
    }

    /// Restarts the session over the given cards and invalidates all
    /// previously minted tick tokens.
    pub fn reset(&mut self, cards: Vec<Card>) {
        self.epoch = self.epoch.next();
        self.session.reset(cards);
    }

    /// Token for the current session generation.
    #[must_use]
    pub fn tick_token(&self) -> TickToken {
        TickToken { epoch: self.epoch }
    }

    /// Applies one countdown tick if the token is still current.
    ///
    /// Returns whether the tick was applied.
    pub fn handle_tick(&mut self, token: TickToken) -> bool {
        if token.epoch != self.epoch {
            log::debug!("dropping stale tick for epoch {:?}", token.epoch);
            return false;
        }
        self.session.tick();
        true
    }

    pub fn mark_right(&mut self, id: CardId) -> MarkOutcome {
        self.session.mark_right(id)
    }

    pub fn mark_wrong(&mut self, id: CardId) -> MarkOutcome {
        self.session.mark_wrong(id)
    }

    pub fn pause(&mut self) {
        self.session.pause();
    }

    pub fn resume(&mut self) {
        self.session.resume();
    }

    #[must_use]
    pub fn session(&self) -> &ReviewSession {
        &self.session
    }

    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            state: self.session.state(),
            time_remaining: self.session.time_remaining(),
            is_active: self.session.is_active(),
            queue_len: self.session.remaining(),
            current_card: self.session.current_card().cloned(),
            tick_token: self.tick_token(),
        }
    }
}
