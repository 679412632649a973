use std::sync::Mutex;

use serde::{Deserialize, Serialize};

use crate::ProviderSettings;

/// State stashed at submission time for the authorization callback handler.
/// Created on submit, consumed (and cleared) on callback; a fresh submission
/// overwrites whatever an earlier one left behind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthScratch {
    pub operation: String,
    pub scopes: Vec<String>,
    pub login_hint: String,
    pub client_name: String,
    pub configuration: ProviderSettings,
}

/// Session collaborator injected into the submission handler. Implementations
/// back this with whatever the hosting stack uses for per-user sessions; the
/// handler only sees these three operations.
pub trait SessionContext: Send + Sync {
    /// Records the pre-authentication page so the user can be routed back
    /// once the flow completes.
    fn save_destination(&self, destination: &str);

    fn put_scratch(&self, scratch: AuthScratch);

    /// Consume-and-clear, for the downstream callback handler.
    fn take_scratch(&self) -> Option<AuthScratch>;
}

/// In-memory session, one per logical user session. Suitable for wiring and
/// tests; durable session storage is out of scope here.
#[derive(Debug, Default)]
pub struct MemorySession {
    inner: Mutex<MemorySessionInner>,
}

#[derive(Debug, Default)]
struct MemorySessionInner {
    destination: Option<String>,
    scratch: Option<AuthScratch>,
}

impl MemorySession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn destination(&self) -> Option<String> {
        self.inner.lock().expect("session lock").destination.clone()
    }
}

impl SessionContext for MemorySession {
    fn save_destination(&self, destination: &str) {
        let mut inner = self.inner.lock().expect("session lock");
        inner.destination = Some(destination.to_string());
    }

    fn put_scratch(&self, scratch: AuthScratch) {
        let mut inner = self.inner.lock().expect("session lock");
        inner.scratch = Some(scratch);
    }

    fn take_scratch(&self) -> Option<AuthScratch> {
        self.inner.lock().expect("session lock").scratch.take()
    }
}

#[cfg(test)]
mod tests {
    use super::{AuthScratch, MemorySession, SessionContext};
    use crate::ProviderSettings;

    fn scratch(client_name: &str) -> AuthScratch {
        AuthScratch {
            operation: "login".to_string(),
            scopes: vec!["openid".to_string()],
            login_hint: "CC,123".to_string(),
            client_name: client_name.to_string(),
            configuration: ProviderSettings::new(),
        }
    }

    #[test]
    fn take_scratch_clears_the_session() {
        let session = MemorySession::new();
        session.put_scratch(scratch("google"));

        assert_eq!(session.take_scratch(), Some(scratch("google")));
        assert_eq!(session.take_scratch(), None);
    }

    #[test]
    fn later_submission_overwrites_scratch() {
        let session = MemorySession::new();
        session.put_scratch(scratch("google"));
        session.put_scratch(scratch("keycloak"));

        assert_eq!(session.take_scratch().unwrap().client_name, "keycloak");
    }

    #[test]
    fn destination_is_recorded() {
        let session = MemorySession::new();
        session.save_destination("/account");
        assert_eq!(session.destination().as_deref(), Some("/account"));
    }
}
