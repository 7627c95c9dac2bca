//! Short-lived status messages.
//!
//! Every posted message owns exactly one pending expiry. Posting again
//! under the same key cancels that expiry and schedules a new one, so a
//! message is only ever removed by its most recent timer or by an explicit
//! [`TransientMessageBus::expire`].

use std::collections::{BTreeMap, HashMap};
use std::time::{Duration, Instant};

use tracing::debug;

/// Key shared by the per-step save confirmations.
pub const SAVE_KEY: &str = "save";

pub const DEFAULT_TTL: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransientMessage {
    pub key: String,
    pub text: String,
    pub expires_at: Instant,
}

/// Handle of a scheduled removal. Only the newest ticket for a key may fire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpiryTicket(u64);

#[derive(Debug, Clone, Copy)]
struct PendingExpiry {
    ticket: ExpiryTicket,
    due: Instant,
}

#[derive(Debug, Clone)]
pub struct TransientMessageBus {
    ttl: Duration,
    messages: HashMap<String, TransientMessage>,
    pending: HashMap<String, PendingExpiry>,
    next_ticket: u64,
}

impl Default for TransientMessageBus {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}

impl TransientMessageBus {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            messages: HashMap::new(),
            pending: HashMap::new(),
            next_ticket: 0,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Shows `text` under `key` until `now + ttl`, replacing any message and
    /// cancelling any pending expiry already held by the key.
    pub fn post(&mut self, key: &str, text: impl Into<String>, now: Instant) -> ExpiryTicket {
        let ticket = ExpiryTicket(self.next_ticket);
        self.next_ticket += 1;
        let due = now + self.ttl;

        if let Some(previous) = self.pending.insert(key.to_string(), PendingExpiry { ticket, due }) {
            debug!(key, cancelled = previous.ticket.0, "replacing pending message");
        }
        self.messages.insert(
            key.to_string(),
            TransientMessage {
                key: key.to_string(),
                text: text.into(),
                expires_at: due,
            },
        );
        ticket
    }

    /// Removes the message and cancels its pending expiry.
    pub fn expire(&mut self, key: &str) -> bool {
        self.pending.remove(key);
        self.messages.remove(key).is_some()
    }

    /// Runs a scheduled removal. Stale tickets (the key was replaced or
    /// already removed) do nothing.
    pub fn fire(&mut self, key: &str, ticket: ExpiryTicket) -> bool {
        match self.pending.get(key) {
            Some(pending) if pending.ticket == ticket => self.expire(key),
            _ => false,
        }
    }

    /// Fires every expiry due at or before `now`. Returns how many
    /// messages were removed.
    pub fn tick(&mut self, now: Instant) -> usize {
        let due: Vec<(String, ExpiryTicket)> = self
            .pending
            .iter()
            .filter(|(_, p)| p.due <= now)
            .map(|(k, p)| (k.clone(), p.ticket))
            .collect();

        due.into_iter()
            .filter(|(key, ticket)| self.fire(key, *ticket))
            .count()
    }

    /// Earliest instant at which a pending expiry becomes due.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending.values().map(|p| p.due).min()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.messages.get(key).map(|m| m.text.as_str())
    }

    pub fn message(&self, key: &str) -> Option<&TransientMessage> {
        self.messages.get(key)
    }

    /// Live messages keyed by message key.
    pub fn snapshot(&self) -> BTreeMap<String, String> {
        self.messages
            .iter()
            .map(|(k, m)| (k.clone(), m.text.clone()))
            .collect()
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}
