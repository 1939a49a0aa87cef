use super::storage::CredentialStore;
use crate::models::Credential;
use chrono::{DateTime, Duration, Local};
use std::collections::HashMap;
use std::sync::RwLock;
use tracing::debug;

struct StoredCredential {
    credential: Credential,
    last_updated: DateTime<Local>,
}

/// Process-local session table. Sessions die with the process.
pub struct InMemoryCredentialStore {
    sessions: RwLock<HashMap<String, StoredCredential>>,
    ttl: Duration,
}

impl InMemoryCredentialStore {
    pub fn new(ttl_minutes: i64) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            ttl: Duration::minutes(ttl_minutes),
        }
    }

    pub fn len(&self) -> usize {
        self.sessions.read().map(|s| s.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn is_expired(&self, entry: &StoredCredential, now: DateTime<Local>) -> bool {
        now.signed_duration_since(entry.last_updated) >= self.ttl
    }

    /// Insert with an explicit timestamp.
    pub fn save_credential_at(
        &self,
        session_id: &str,
        credential: Credential,
        last_updated: DateTime<Local>,
    ) {
        if let Ok(mut sessions) = self.sessions.write() {
            sessions.insert(
                session_id.to_string(),
                StoredCredential {
                    credential,
                    last_updated,
                },
            );
        }
    }
}

impl CredentialStore for InMemoryCredentialStore {
    fn find_credential(&self, session_id: &str) -> Option<Credential> {
        let now = Local::now();
        {
            let sessions = self.sessions.read().ok()?;
            let entry = sessions.get(session_id)?;
            if !self.is_expired(entry, now) {
                return Some(entry.credential.clone());
            }
        }

        // Clean up expired session
        debug!("session expired, removing");
        self.remove_session(session_id);
        None
    }

    fn save_credential(&self, session_id: &str, credential: Credential) {
        self.save_credential_at(session_id, credential, Local::now());
    }

    fn remove_session(&self, session_id: &str) {
        if let Ok(mut sessions) = self.sessions.write() {
            sessions.remove(session_id);
        }
    }

    fn purge_expired(&self) -> usize {
        let now = Local::now();
        let Ok(mut sessions) = self.sessions.write() else {
            return 0;
        };
        let before = sessions.len();
        sessions.retain(|_, entry| now.signed_duration_since(entry.last_updated) < self.ttl);
        before - sessions.len()
    }
}
