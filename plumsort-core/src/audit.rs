//! Access audit - bounded in-memory log of denied navigations
//!
//! Users only ever see the redirect. The reason behind it lands here and in
//! the debug log, for operators.

use crate::config::RbacConfig;
use crate::guard::{DenialReason, Redirect};
use crate::rbac::User;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::VecDeque;
use std::sync::Mutex;

/// One denied navigation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DenialRecord {
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attempted_path: Option<String>,
    pub requirement: String,
    pub reason: DenialReason,
    /// Where the user was sent
    pub target: String,
}

/// Ring buffer of the most recent denials
pub struct AccessAudit {
    capacity: usize,
    records: Mutex<VecDeque<DenialRecord>>,
}

impl AccessAudit {
    /// Keep at most `capacity` records; the oldest are dropped first
    pub fn new(capacity: usize) -> Self {
        Self { capacity, records: Mutex::new(VecDeque::with_capacity(capacity.min(1024))) }
    }

    /// `None` when auditing is disabled
    pub fn from_config(config: &RbacConfig) -> Option<Self> {
        config.audit_enabled.then(|| Self::new(config.audit_capacity))
    }

    pub fn record_denial(
        &self,
        user: Option<&User>,
        attempted_path: Option<&str>,
        requirement: String,
        redirect: &Redirect,
    ) {
        if self.capacity == 0 {
            return;
        }

        let record = DenialRecord {
            timestamp: Utc::now(),
            user_id: user.map(|u| u.id.clone()),
            role: user.map(|u| u.role.clone()),
            attempted_path: attempted_path.map(str::to_string),
            requirement,
            reason: redirect.reason,
            target: redirect.target.clone(),
        };

        let mut records = self.records.lock().unwrap_or_else(|e| e.into_inner());
        while records.len() >= self.capacity {
            records.pop_front();
        }
        records.push_back(record);
    }

    /// Records oldest first
    pub fn records(&self) -> Vec<DenialRecord> {
        self.records.lock().unwrap_or_else(|e| e.into_inner()).iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.records.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Denials recorded for one user id
    pub fn for_user(&self, user_id: &str) -> Vec<DenialRecord> {
        self.records
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .filter(|r| r.user_id.as_deref() == Some(user_id))
            .cloned()
            .collect()
    }

    /// Drain every record, oldest first
    pub fn drain(&self) -> Vec<DenialRecord> {
        self.records.lock().unwrap_or_else(|e| e.into_inner()).drain(..).collect()
    }

    /// One JSON object per line
    pub fn to_json_lines(&self) -> serde_json::Result<String> {
        let mut out = String::new();
        for record in self.records() {
            out.push_str(&serde_json::to_string(&record)?);
            out.push('\n');
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn farmer() -> User {
        User::new("u1", "grower@example.com", "Grower", "farmer")
    }

    #[test]
    fn keeps_only_the_most_recent() {
        let audit = AccessAudit::new(2);
        let redirect = Redirect::forbidden("/farmer-dashboard");
        for path in ["/users", "/system-logs", "/admin-dashboard"] {
            audit.record_denial(Some(&farmer()), Some(path), "role admin".into(), &redirect);
        }

        let paths: Vec<_> =
            audit.records().into_iter().filter_map(|r| r.attempted_path).collect();
        assert_eq!(paths, vec!["/system-logs", "/admin-dashboard"]);
    }

    #[test]
    fn anonymous_denials_have_no_user_fields() {
        let audit = AccessAudit::new(8);
        audit.record_denial(None, Some("/farms"), "signed in".into(), &Redirect::to_login(None));

        let record = &audit.records()[0];
        assert_eq!(record.user_id, None);
        assert_eq!(record.reason, DenialReason::Unauthenticated);
        assert_eq!(record.target, "/login");

        let line = audit.to_json_lines().unwrap();
        assert!(line.contains("\"reason\":\"unauthenticated\""));
        assert!(!line.contains("user_id"));
    }

    #[test]
    fn disabled_in_config_yields_none() {
        let config = RbacConfig { audit_enabled: false, ..RbacConfig::default() };
        assert!(AccessAudit::from_config(&config).is_none());
        assert_eq!(AccessAudit::from_config(&RbacConfig::default()).unwrap().capacity(), 256);
    }

    #[test]
    fn drain_empties_the_log() {
        let audit = AccessAudit::new(4);
        audit.record_denial(Some(&farmer()), None, "role admin".into(), &Redirect::forbidden("/x"));
        assert_eq!(audit.for_user("u1").len(), 1);
        assert_eq!(audit.drain().len(), 1);
        assert!(audit.is_empty());
    }
}
