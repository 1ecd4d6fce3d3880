use std::collections::VecDeque;

use crate::model::{Card, CardId};

/// Countdown allotted to one review pass, in seconds.
pub const SESSION_SECONDS: u32 = 100;

//
// ─── SESSION STATE ─────────────────────────────────────────────────────────────
//

/// Observable state of a review pass, derived from the queue and the timer.
///
/// Pausing is not a state of its own: `is_active` is an orthogonal gate that
/// freezes the timer while still accepting review decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Queue non-empty, time left on the clock.
    Loaded,
    /// Timer hit zero with cards still queued; decisions are rejected.
    Expired,
    /// Queue drained; terminal until the session is restarted.
    Empty,
}

/// What happened to a `mark_right`/`mark_wrong` call.
///
/// Rejections are reported here rather than as errors: a stale reference
/// (e.g. a double-tap racing the removal animation) is tolerated, not fatal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkOutcome {
    /// The card was removed from the queue.
    Applied,
    /// The card was re-queued at the front under a new identity.
    Requeued,
    /// No queue entry matched the given identity; nothing changed.
    NotInQueue,
    /// The countdown already expired; nothing changed.
    Expired,
}

//
// ─── REVIEW SESSION ────────────────────────────────────────────────────────────
//

/// The ephemeral working queue and countdown for one review pass.
///
/// Holds a copy of the deck: review decisions never touch durable storage.
/// The front of the queue is the card currently shown.
#[derive(Debug, Clone)]
pub struct ReviewSession {
    queue: VecDeque<Card>,
    time_remaining: u32,
    is_active: bool,
}

impl ReviewSession {
    /// Starts a session over a copy of the given cards with a full clock.
    #[must_use]
    pub fn start(cards: Vec<Card>) -> Self {
        Self {
            queue: cards.into(),
            time_remaining: SESSION_SECONDS,
            is_active: true,
        }
    }

    /// Re-seeds this session in place, as if `start` had been called again.
    pub fn reset(&mut self, cards: Vec<Card>) {
        *self = Self::start(cards);
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        if self.queue.is_empty() {
            SessionState::Empty
        } else if self.time_remaining == 0 {
            SessionState::Expired
        } else {
            SessionState::Loaded
        }
    }

    /// The card currently shown, if any.
    #[must_use]
    pub fn current_card(&self) -> Option<&Card> {
        self.queue.front()
    }

    #[must_use]
    pub fn remaining(&self) -> usize {
        self.queue.len()
    }

    #[must_use]
    pub fn time_remaining(&self) -> u32 {
        self.time_remaining
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.is_active
    }

    /// Iterates the queue from the current card backwards.
    pub fn queue(&self) -> impl Iterator<Item = &Card> {
        self.queue.iter()
    }

    /// Advances the countdown by one second.
    ///
    /// No-op while paused or once the queue is drained; never goes below zero.
    pub fn tick(&mut self) {
        if !self.is_active || self.queue.is_empty() {
            return;
        }
        self.time_remaining = self.time_remaining.saturating_sub(1);
    }

    /// Freezes the countdown without touching the queue or remaining time.
    pub fn pause(&mut self) {
        self.is_active = false;
    }

    /// Resumes the countdown after a `pause`.
    pub fn resume(&mut self) {
        self.is_active = true;
    }

    /// Marks the queued card with the given identity as answered correctly,
    /// removing it from the queue.
    pub fn mark_right(&mut self, id: CardId) -> MarkOutcome {
        if self.state() == SessionState::Expired {
            return MarkOutcome::Expired;
        }
        match self.position_of(id) {
            Some(index) => {
                self.queue.remove(index);
                MarkOutcome::Applied
            }
            None => MarkOutcome::NotInQueue,
        }
    }

    /// Marks the queued card as answered wrongly: it is re-queued at the front
    /// under a fresh identity, so it is the next card shown. Queue length is
    /// unchanged.
    pub fn mark_wrong(&mut self, id: CardId) -> MarkOutcome {
        if self.state() == SessionState::Expired {
            return MarkOutcome::Expired;
        }
        match self.position_of(id) {
            Some(index) => {
                // remove() only returns None past the end; index came from a scan.
                if let Some(card) = self.queue.remove(index) {
                    self.queue.push_front(card.with_fresh_id());
                }
                MarkOutcome::Requeued
            }
            None => MarkOutcome::NotInQueue,
        }
    }

    fn position_of(&self, id: CardId) -> Option<usize> {
        self.queue.iter().position(|card| card.id() == id)
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
