use std::collections::BTreeSet;

use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;

use deck_core::model::{Card, CardId, CardValidationError};

use crate::deck_service::DeckService;
use crate::error::ServiceError;
use crate::session_driver::{SessionDriver, SessionSnapshot, TickToken};

const EVENT_BUFFER: usize = 32;

/// Discrete external events driving the session and the deck.
///
/// Everything that mutates state arrives here and is applied serially by one
/// task, so no locking is needed anywhere in the core.
#[derive(Debug)]
pub enum SessionEvent {
    /// Periodic timer tick, stamped with the session generation it was
    /// minted for. Stale ticks are dropped.
    Tick(TickToken),
    /// The current card was answered correctly.
    MarkRight(CardId),
    /// The current card was answered wrongly.
    MarkWrong(CardId),
    /// App moved to the background; freeze the countdown.
    Pause,
    /// App returned to the foreground.
    Resume,
    /// Restart the review pass from the freshly reloaded deck.
    Restart,
    /// The deck editor was dismissed; reseed the session from the deck.
    DeckEdited,
    /// Add a card to the durable deck. Does not touch the running session.
    AddCard {
        prompt: String,
        answer: String,
        reply: oneshot::Sender<Result<Card, CardValidationError>>,
    },
    /// Delete deck cards by position. Does not touch the running session.
    DeleteCards {
        offsets: BTreeSet<usize>,
        reply: oneshot::Sender<()>,
    },
    /// Read the current deck contents.
    ListDeck { reply: oneshot::Sender<Vec<Card>> },
    /// Read the session state as of all previously delivered events.
    QuerySession {
        reply: oneshot::Sender<SessionSnapshot>,
    },
    /// Stop the loop.
    Shutdown,
}

/// Single-task event loop owning the deck service and the session driver.
pub struct SessionLoop {
    deck: DeckService,
    driver: SessionDriver,
    events: mpsc::Receiver<SessionEvent>,
    snapshots: watch::Sender<SessionSnapshot>,
}

impl SessionLoop {
    /// Seeds a session from the deck's current contents and spawns the loop.
    #[must_use]
    pub fn spawn(deck: DeckService) -> (SessionHandle, JoinHandle<()>) {
        let driver = SessionDriver::start(deck.cards().to_vec());
        let (event_tx, event_rx) = mpsc::channel(EVENT_BUFFER);
        let (snapshot_tx, snapshot_rx) = watch::channel(driver.snapshot());

        let session_loop = Self {
            deck,
            driver,
            events: event_rx,
            snapshots: snapshot_tx,
        };
        let join = tokio::spawn(session_loop.run());

        (
            SessionHandle {
                events: event_tx,
                snapshots: snapshot_rx,
            },
            join,
        )
    }

    async fn run(mut self) {
        while let Some(event) = self.events.recv().await {
            if !self.apply(event).await {
                break;
            }
            // Publish after every event; the contract is simply that the new
            // state is available to read once the mutation is done.
            let _ = self.snapshots.send(self.driver.snapshot());
        }
    }

    async fn apply(&mut self, event: SessionEvent) -> bool {
        match event {
            SessionEvent::Tick(token) => {
                self.driver.handle_tick(token);
            }
            SessionEvent::MarkRight(id) => {
                self.driver.mark_right(id);
            }
            SessionEvent::MarkWrong(id) => {
                self.driver.mark_wrong(id);
            }
            SessionEvent::Pause => self.driver.pause(),
            SessionEvent::Resume => self.driver.resume(),
            SessionEvent::Restart => {
                self.deck.reload().await;
                self.driver.reset(self.deck.cards().to_vec());
            }
            SessionEvent::DeckEdited => {
                self.driver.reset(self.deck.cards().to_vec());
            }
            SessionEvent::AddCard {
                prompt,
                answer,
                reply,
            } => {
                let result = self.deck.add(prompt, answer).await;
                let _ = reply.send(result);
            }
            SessionEvent::DeleteCards { offsets, reply } => {
                self.deck.delete(&offsets).await;
                let _ = reply.send(());
            }
            SessionEvent::ListDeck { reply } => {
                let _ = reply.send(self.deck.cards().to_vec());
            }
            SessionEvent::QuerySession { reply } => {
                let _ = reply.send(self.driver.snapshot());
            }
            SessionEvent::Shutdown => return false,
        }
        true
    }
}

/// Cloneable handle to a running `SessionLoop`: the event sender plus a
/// `watch` receiver carrying the latest session snapshot.
#[derive(Clone)]
pub struct SessionHandle {
    events: mpsc::Sender<SessionEvent>,
    snapshots: watch::Receiver<SessionSnapshot>,
}

impl SessionHandle {
    /// Latest published session snapshot.
    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        self.snapshots.borrow().clone()
    }

    /// Subscription for read-side consumers that want change notifications.
    #[must_use]
    pub fn watch(&self) -> watch::Receiver<SessionSnapshot> {
        self.snapshots.clone()
    }

    /// Raw event sender, used by the ticker task.
    #[must_use]
    pub(crate) fn sender(&self) -> mpsc::Sender<SessionEvent> {
        self.events.clone()
    }

    async fn send(&self, event: SessionEvent) -> Result<(), ServiceError> {
        self.events
            .send(event)
            .await
            .map_err(|_| ServiceError::SessionClosed)
    }

    /// Delivers one timer tick for the given session generation.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::SessionClosed` if the loop has shut down.
    pub async fn tick(&self, token: TickToken) -> Result<(), ServiceError> {
        self.send(SessionEvent::Tick(token)).await
    }

    /// # Errors
    ///
    /// Returns `ServiceError::SessionClosed` if the loop has shut down.
    pub async fn mark_right(&self, id: CardId) -> Result<(), ServiceError> {
        self.send(SessionEvent::MarkRight(id)).await
    }

    /// # Errors
    ///
    /// Returns `ServiceError::SessionClosed` if the loop has shut down.
    pub async fn mark_wrong(&self, id: CardId) -> Result<(), ServiceError> {
        self.send(SessionEvent::MarkWrong(id)).await
    }

    /// # Errors
    ///
    /// Returns `ServiceError::SessionClosed` if the loop has shut down.
    pub async fn pause(&self) -> Result<(), ServiceError> {
        self.send(SessionEvent::Pause).await
    }

    /// # Errors
    ///
    /// Returns `ServiceError::SessionClosed` if the loop has shut down.
    pub async fn resume(&self) -> Result<(), ServiceError> {
        self.send(SessionEvent::Resume).await
    }

    /// # Errors
    ///
    /// Returns `ServiceError::SessionClosed` if the loop has shut down.
    pub async fn restart(&self) -> Result<(), ServiceError> {
        self.send(SessionEvent::Restart).await
    }

    /// Signals that a deck-editing pass finished, reseeding the session.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::SessionClosed` if the loop has shut down.
    pub async fn deck_edited(&self) -> Result<(), ServiceError> {
        self.send(SessionEvent::DeckEdited).await
    }

    /// Adds a card to the durable deck.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Validation` if either trimmed field is empty,
    /// or `ServiceError::SessionClosed` if the loop has shut down.
    pub async fn add_card(
        &self,
        prompt: impl Into<String>,
        answer: impl Into<String>,
    ) -> Result<Card, ServiceError> {
        let (reply, response) = oneshot::channel();
        self.send(SessionEvent::AddCard {
            prompt: prompt.into(),
            answer: answer.into(),
            reply,
        })
        .await?;
        let added = response.await.map_err(|_| ServiceError::SessionClosed)?;
        Ok(added?)
    }

    /// Deletes deck cards by position; out-of-range positions are skipped.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::SessionClosed` if the loop has shut down.
    pub async fn delete_cards(&self, offsets: BTreeSet<usize>) -> Result<(), ServiceError> {
        let (reply, response) = oneshot::channel();
        self.send(SessionEvent::DeleteCards { offsets, reply })
            .await?;
        response.await.map_err(|_| ServiceError::SessionClosed)
    }

    /// Session state after every event delivered so far. Unlike `snapshot`,
    /// this round-trips through the loop, so it observes prior sends.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::SessionClosed` if the loop has shut down.
    pub async fn query_session(&self) -> Result<SessionSnapshot, ServiceError> {
        let (reply, response) = oneshot::channel();
        self.send(SessionEvent::QuerySession { reply }).await?;
        response.await.map_err(|_| ServiceError::SessionClosed)
    }

    /// Reads the durable deck's current contents.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::SessionClosed` if the loop has shut down.
    pub async fn list_deck(&self) -> Result<Vec<Card>, ServiceError> {
        let (reply, response) = oneshot::channel();
        self.send(SessionEvent::ListDeck { reply }).await?;
        response.await.map_err(|_| ServiceError::SessionClosed)
    }

    /// Asks the loop to stop. Pending events ahead of this one still apply.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::SessionClosed` if the loop already shut down.
    pub async fn shutdown(&self) -> Result<(), ServiceError> {
        self.send(SessionEvent::Shutdown).await
    }
}
