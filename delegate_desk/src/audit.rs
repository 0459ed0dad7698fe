//! The mutation log kept alongside the desk state.
//!
//! Entries are only ever added, newest first. Nothing is persisted.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::config::UserId;

#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub enum AuditAction {
    DelegateUpdate,
}

impl AuditAction {
    pub fn tag(&self) -> &'static str {
        match self {
            AuditAction::DelegateUpdate => "DELEGATE_UPDATE",
        }
    }
}

#[derive(PartialEq, Debug, Clone)]
pub struct AuditEntry {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub user_id: UserId,
    pub action: AuditAction,
    pub details: String,
}

impl AuditEntry {
    pub fn new(
        user_id: &str,
        action: AuditAction,
        details: String,
        timestamp: DateTime<Utc>,
    ) -> AuditEntry {
        AuditEntry {
            id: Uuid::new_v4().simple().to_string(),
            timestamp,
            user_id: user_id.to_string(),
            action,
            details,
        }
    }
}

#[derive(PartialEq, Debug, Clone, Default)]
pub struct AuditTrail {
    entries: VecDeque<AuditEntry>,
}

impl AuditTrail {
    pub fn new() -> AuditTrail {
        AuditTrail::default()
    }

    pub fn record(&mut self, entry: AuditEntry) {
        self.entries.push_front(entry);
    }

    /// Newest first.
    pub fn iter(&self) -> impl Iterator<Item = &AuditEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
