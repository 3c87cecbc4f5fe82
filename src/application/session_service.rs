// Session service - Process-wide current session with change notifications
use crate::domain::session::Session;
use crate::error::SessionError;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;

const EVENT_CAPACITY: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    SignedIn(Session),
    SignedOut,
}

/// The single "current session" for the process.
///
/// Cloning shares the same holder. State transitions and their notifications
/// happen under one lock, so every subscriber sees events in transition order.
#[derive(Clone)]
pub struct SessionHolder {
    inner: Arc<Inner>,
}

struct Inner {
    current: Mutex<Option<Session>>,
    events: broadcast::Sender<SessionEvent>,
}

impl SessionHolder {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            inner: Arc::new(Inner {
                current: Mutex::new(None),
                events,
            }),
        }
    }

    /// Start a session, replacing any existing one.
    pub fn init(&self, session: Session) {
        let mut current = self.lock();
        tracing::info!("Signed in to {}", session.shop);
        *current = Some(session.clone());
        // No subscribers is fine.
        let _ = self.inner.events.send(SessionEvent::SignedIn(session));
    }

    /// End the current session. Returns the session that was active, if any.
    pub fn teardown(&self) -> Option<Session> {
        let mut current = self.lock();
        let previous = current.take();
        if let Some(session) = &previous {
            tracing::info!("Signed out of {}", session.shop);
            let _ = self.inner.events.send(SessionEvent::SignedOut);
        }
        previous
    }

    pub fn current(&self) -> Option<Session> {
        self.lock().clone()
    }

    pub fn require(&self) -> Result<Session, SessionError> {
        self.current().ok_or(SessionError::NotSignedIn)
    }

    pub fn is_signed_in(&self) -> bool {
        self.lock().is_some()
    }

    /// Receive every transition from now on. Dropping the subscription unsubscribes.
    pub fn subscribe(&self) -> SessionSubscription {
        SessionSubscription {
            rx: self.inner.events.subscribe(),
        }
    }

    #[cfg(test)]
    pub fn subscriber_count(&self) -> usize {
        self.inner.events.receiver_count()
    }

    fn lock(&self) -> MutexGuard<'_, Option<Session>> {
        self.inner
            .current
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for SessionHolder {
    fn default() -> Self {
        Self::new()
    }
}

pub struct SessionSubscription {
    rx: broadcast::Receiver<SessionEvent>,
}

impl SessionSubscription {
    /// Next transition, or `None` once the holder is gone.
    pub async fn next(&mut self) -> Option<SessionEvent> {
        loop {
            match self.rx.recv().await {
                Ok(event) => return Some(event),
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!("Session subscriber lagged, skipped {} events", skipped);
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }
}
