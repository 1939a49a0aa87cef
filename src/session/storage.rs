use crate::models::Credential;

/// Trait for server-side session backends holding OAuth credentials.
pub trait CredentialStore: Send + Sync {
    /// Credential for a live session, `None` if unknown or expired.
    fn find_credential(&self, session_id: &str) -> Option<Credential>;

    /// Store (or replace) the credential of a session.
    fn save_credential(&self, session_id: &str, credential: Credential);

    /// Forget one session.
    fn remove_session(&self, session_id: &str);

    /// Drop every expired session and return how many were removed.
    fn purge_expired(&self) -> usize;
}
