use thiserror::Error;
use tokio::sync::{broadcast, Mutex};

use crate::types::token::TokenPair;

use super::RequestError;

/// Failure of a token refresh. Cloneable so one failed wire call can be
/// delivered to every request coalesced behind it.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct RefreshError {
    /// HTTP status of the refresh call, when one was made.
    pub status: Option<u16>,
    pub code: Option<String>,
    pub message: String,
}

impl RefreshError {
    pub(crate) fn new(message: impl ToString) -> Self {
        Self {
            status: None,
            code: None,
            message: message.to_string(),
        }
    }

    /// A 401 arrived but there is no refresh token to attempt a refresh with.
    pub(crate) fn unavailable() -> Self {
        Self::new("no refresh token available")
    }

    pub(crate) fn from_request(err: RequestError) -> Self {
        match err {
            RequestError::Api(api) => Self {
                status: Some(api.status),
                code: api.code,
                message: api.message,
            },
            RequestError::Refresh(err) => err,
            other => Self::new(other),
        }
    }
}

pub(crate) type RefreshOutcome = Result<TokenPair, RefreshError>;

/// Coalesces concurrent token refreshes: the first request that hits a 401
/// becomes the leader and performs the single wire call, every later one
/// subscribes to the in-flight broadcast and suspends until it settles.
/// Owned by the client instance, so separate clients never share state.
pub(crate) struct RefreshGate {
    inflight: Mutex<Option<broadcast::Sender<RefreshOutcome>>>,
}

pub(crate) enum RefreshTicket {
    Lead(broadcast::Sender<RefreshOutcome>),
    Wait(broadcast::Receiver<RefreshOutcome>),
}

impl RefreshGate {
    pub fn new() -> Self {
        Self {
            inflight: Mutex::new(None),
        }
    }

    pub async fn join(&self) -> RefreshTicket {
        let mut inflight = self.inflight.lock().await;
        match inflight.as_ref() {
            Some(tx) => RefreshTicket::Wait(tx.subscribe()),
            None => {
                let (tx, _) = broadcast::channel(1);
                *inflight = Some(tx.clone());
                RefreshTicket::Lead(tx)
            }
        }
    }

    /// Clear the in-flight slot, then wake every waiter with the outcome.
    /// The slot must be cleared first so a request arriving after the settle
    /// starts a fresh refresh instead of joining a finished one.
    pub async fn settle(&self, tx: broadcast::Sender<RefreshOutcome>, outcome: RefreshOutcome) {
        let mut inflight = self.inflight.lock().await;
        *inflight = None;
        drop(inflight);

        // No receivers is fine: nobody queued behind the leader.
        let _ = tx.send(outcome);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair() -> TokenPair {
        TokenPair {
            access_token: String::from("A2"),
            refresh_token: String::from("R2"),
            token_type: String::from("Bearer"),
        }
    }

    #[tokio::test]
    async fn single_leader_many_waiters() {
        let gate = RefreshGate::new();

        let lead = match gate.join().await {
            RefreshTicket::Lead(tx) => tx,
            RefreshTicket::Wait(_) => panic!("first join should lead"),
        };

        let mut waiters = Vec::new();
        for _ in 0..5 {
            match gate.join().await {
                RefreshTicket::Lead(_) => panic!("only one leader per refresh"),
                RefreshTicket::Wait(rx) => waiters.push(rx),
            }
        }

        gate.settle(lead, Ok(pair())).await;

        for mut rx in waiters {
            let outcome = rx.recv().await.unwrap();
            assert_eq!(outcome.unwrap().access_token, "A2");
        }
    }

    #[tokio::test]
    async fn next_join_after_settle_leads_again() {
        let gate = RefreshGate::new();

        let lead = match gate.join().await {
            RefreshTicket::Lead(tx) => tx,
            RefreshTicket::Wait(_) => panic!("first join should lead"),
        };
        gate.settle(lead, Err(RefreshError::unavailable())).await;

        match gate.join().await {
            RefreshTicket::Lead(_) => {}
            RefreshTicket::Wait(_) => panic!("settled gate must accept a new leader"),
        }
    }
}
