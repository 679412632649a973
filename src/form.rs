use std::sync::Arc;

use crate::{
    AuthScratch, AuthorizeRedirect, IdentificationType, LoginFormError, LoginSubmission,
    OpenIdClaims, ProviderDefinition, ProviderRegistry, SessionContext, SubmittedAction,
};

/// The operation recorded in scratch state. The callback handler treats both
/// form actions as a login; registration is signalled to the provider only.
const OPERATION: &str = "login";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectField {
    pub name: String,
    pub label: String,
    pub options: Vec<(String, String)>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextField {
    pub name: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitControl {
    pub name: String,
    pub value: String,
    pub label: String,
}

/// One provider's slice of the form: its own identification fields plus the
/// two submit controls. Fields are scoped per provider so no section clobbers
/// another's labels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderSection {
    pub provider_id: String,
    pub label: String,
    pub identification_type: SelectField,
    pub identification_value: TextField,
    pub login: SubmitControl,
    pub register: SubmitControl,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LoginForm {
    pub sections: Vec<ProviderSection>,
}

impl LoginForm {
    /// Pure render: one section per enabled definition, in registry order.
    /// Disabled providers contribute nothing; zero enabled providers yield an
    /// empty form with no actionable controls.
    pub fn from_definitions<'a>(
        definitions: impl IntoIterator<Item = &'a ProviderDefinition>,
    ) -> Self {
        let sections = definitions
            .into_iter()
            .filter(|definition| definition.enabled)
            .map(ProviderSection::from_definition)
            .collect();
        Self { sections }
    }

    pub fn submit_controls(&self) -> impl Iterator<Item = &SubmitControl> {
        self.sections
            .iter()
            .flat_map(|section| [&section.login, &section.register])
    }
}

impl ProviderSection {
    fn from_definition(definition: &ProviderDefinition) -> Self {
        use crate::ActionKind::{Login, Register};

        let id = &definition.id;
        Self {
            provider_id: id.clone(),
            label: definition.label.clone(),
            identification_type: SelectField {
                name: format!("{id}.identification_type"),
                label: "Identification type".to_string(),
                options: IdentificationType::ALL
                    .iter()
                    .map(|id_type| (id_type.code().to_string(), id_type.label().to_string()))
                    .collect(),
            },
            identification_value: TextField {
                name: format!("{id}.identification_value"),
                label: "Identification".to_string(),
            },
            login: SubmitControl {
                name: "action".to_string(),
                value: SubmittedAction::new(id.clone(), Login).wire_value(),
                label: format!("Sign in with {}", definition.label),
            },
            register: SubmitControl {
                name: "action".to_string(),
                value: SubmittedAction::new(id.clone(), Register).wire_value(),
                label: format!("Register with {}", definition.label),
            },
        }
    }
}

/// The submission side of the form. Collaborators are passed in explicitly;
/// there is no container lookup behind this type.
pub struct LoginFormHandler {
    session: Arc<dyn SessionContext>,
    registry: Arc<ProviderRegistry>,
    claims: OpenIdClaims,
}

impl LoginFormHandler {
    pub fn new(
        session: Arc<dyn SessionContext>,
        registry: Arc<ProviderRegistry>,
        claims: OpenIdClaims,
    ) -> Self {
        Self {
            session,
            registry,
            claims,
        }
    }

    pub fn form(&self) -> LoginForm {
        LoginForm::from_definitions(self.registry.definitions())
    }

    /// Starts an authorization flow for the submitted provider and action.
    ///
    /// Records the return destination, stashes the scratch state the callback
    /// handler will consume, and returns whatever the provider client's
    /// `authorize` returns. Errors propagate to the caller; there is no retry
    /// and the identification value is passed through unvalidated.
    pub fn submit(
        &self,
        destination: &str,
        submission: &LoginSubmission,
    ) -> Result<AuthorizeRedirect, LoginFormError> {
        self.session.save_destination(destination);

        let provider_id = &submission.action.provider_id;
        let definition = self.registry.definition(provider_id)?;
        if !definition.enabled {
            return Err(LoginFormError::ProviderDisabled(provider_id.clone()));
        }
        let configuration = definition.settings.clone();

        let client = self.registry.client(provider_id)?;
        let scopes = self.claims.scopes();
        let login_hint = submission.login_hint();

        self.session.put_scratch(AuthScratch {
            operation: OPERATION.to_string(),
            scopes: scopes.clone(),
            login_hint: login_hint.clone(),
            client_name: provider_id.clone(),
            configuration,
        });

        tracing::info!(
            provider = %provider_id,
            kind = submission.action.kind.as_str(),
            "starting authorization flow"
        );
        client.authorize(&scopes, submission.action.kind, &login_hint)
    }
}
