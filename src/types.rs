use serde::{Deserialize, Serialize};

use crate::LoginFormError;

/// How the user identifies themselves on the login form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IdentificationType {
    CitizenId,
    Email,
}

impl IdentificationType {
    pub const ALL: [IdentificationType; 2] =
        [IdentificationType::CitizenId, IdentificationType::Email];

    pub fn code(&self) -> &'static str {
        match self {
            IdentificationType::CitizenId => "CC",
            IdentificationType::Email => "EM",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            IdentificationType::CitizenId => "Citizen ID",
            IdentificationType::Email => "Email address",
        }
    }

    pub fn parse(code: &str) -> Result<Self, LoginFormError> {
        match code {
            "CC" => Ok(IdentificationType::CitizenId),
            "EM" => Ok(IdentificationType::Email),
            other => Err(LoginFormError::UnknownIdentificationType(
                other.to_string(),
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionKind {
    Login,
    Register,
}

impl ActionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionKind::Login => "login",
            ActionKind::Register => "register",
        }
    }
}

/// Which submit control triggered the form, as a tagged value rather than a
/// side-channel attribute on the control itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmittedAction {
    pub provider_id: String,
    pub kind: ActionKind,
}

impl SubmittedAction {
    pub fn new(provider_id: impl Into<String>, kind: ActionKind) -> Self {
        Self {
            provider_id: provider_id.into(),
            kind,
        }
    }

    /// Wire value carried by the submit control, `"{kind}:{provider_id}"`.
    pub fn wire_value(&self) -> String {
        format!("{}:{}", self.kind.as_str(), self.provider_id)
    }

    pub fn parse(value: &str) -> Result<Self, LoginFormError> {
        let (kind, provider_id) = value
            .split_once(':')
            .ok_or_else(|| LoginFormError::MalformedAction(value.to_string()))?;
        let kind = match kind {
            "login" => ActionKind::Login,
            "register" => ActionKind::Register,
            _ => return Err(LoginFormError::MalformedAction(value.to_string())),
        };
        if provider_id.is_empty() {
            return Err(LoginFormError::MalformedAction(value.to_string()));
        }
        Ok(Self::new(provider_id, kind))
    }
}

/// One complete form submission.
#[derive(Debug, Clone)]
pub struct LoginSubmission {
    pub identification_type: IdentificationType,
    pub identification_value: String,
    pub action: SubmittedAction,
}

impl LoginSubmission {
    pub fn new(
        identification_type: IdentificationType,
        identification_value: impl Into<String>,
        action: SubmittedAction,
    ) -> Self {
        Self {
            identification_type,
            identification_value: identification_value.into(),
            action,
        }
    }

    /// Login hint handed to the identity provider and stashed in scratch
    /// state. The downstream callback handler splits this back on the first
    /// comma, so the format is a wire contract: `"{type_code},{value}"`.
    pub fn login_hint(&self) -> String {
        format!(
            "{},{}",
            self.identification_type.code(),
            self.identification_value
        )
    }
}
