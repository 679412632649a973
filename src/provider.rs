use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{ActionKind, LoginFormError};

/// Free-form per-provider configuration, read-only at request time.
pub type ProviderSettings = BTreeMap<String, serde_json::Value>;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderDefinition {
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub settings: ProviderSettings,
}

impl ProviderDefinition {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            enabled: false,
            settings: ProviderSettings::new(),
        }
    }

    pub fn enabled(mut self) -> Self {
        self.enabled = true;
        self
    }

    pub fn with_setting(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.settings.insert(key.into(), value);
        self
    }
}

/// Where the user agent is sent to authenticate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizeRedirect {
    pub url: String,
}

impl AuthorizeRedirect {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

/// The authorize capability this crate delegates to. Implementations own the
/// protocol work; the form only hands over scopes, the action kind, and the
/// login hint.
pub trait ProviderClient: Send + Sync {
    fn authorize(
        &self,
        scopes: &[String],
        kind: ActionKind,
        login_hint: &str,
    ) -> Result<AuthorizeRedirect, LoginFormError>;
}
