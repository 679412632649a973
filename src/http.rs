use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    Router,
    extract::{Form, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    routing::get,
};
use tokio::net::TcpListener;

use crate::{
    IdentificationType, LoginForm, LoginFormError, LoginFormHandler, LoginSubmission,
    OpenIdClaims, ProviderRegistry, SessionContext, SubmittedAction,
};

const DEFAULT_DESTINATION: &str = "/";

#[derive(Clone)]
pub struct ServerState {
    pub session: Arc<dyn SessionContext>,
    pub registry: Arc<ProviderRegistry>,
    pub claims: OpenIdClaims,
}

impl ServerState {
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

    fn handler(&self) -> LoginFormHandler {
        LoginFormHandler::new(self.session.clone(), self.registry.clone(), self.claims.clone())
    }
}

pub fn router(state: ServerState) -> Router {
    Router::new()
        .route("/login", get(login_page).post(login_submit))
        .fallback(fallback_handler)
        .with_state(state)
}

pub async fn serve(listener: TcpListener, state: ServerState) -> Result<(), LoginFormError> {
    axum::serve(listener, router(state)).await?;
    Ok(())
}

async fn login_page(State(state): State<ServerState>) -> Html<String> {
    Html(render_html(&state.handler().form()))
}

async fn login_submit(
    State(state): State<ServerState>,
    Form(fields): Form<HashMap<String, String>>,
) -> Response {
    let submission = match parse_submission(&fields) {
        Ok(submission) => submission,
        Err(err) => return error_response(&err),
    };
    let destination = fields
        .get("destination")
        .map(String::as_str)
        .unwrap_or(DEFAULT_DESTINATION);

    match state.handler().submit(destination, &submission) {
        Ok(redirect) => Redirect::to(&redirect.url).into_response(),
        Err(err) => error_response(&err),
    }
}

async fn fallback_handler() -> Response {
    (StatusCode::NOT_FOUND, Html("<p>Not found.</p>".to_string())).into_response()
}

/// Pulls the tagged action out of the `action` field, then reads that
/// provider's scoped identification fields.
pub fn parse_submission(
    fields: &HashMap<String, String>,
) -> Result<LoginSubmission, LoginFormError> {
    let action = fields
        .get("action")
        .ok_or_else(|| LoginFormError::MalformedAction("missing action".to_string()))?;
    let action = SubmittedAction::parse(action)?;

    let type_field = format!("{}.identification_type", action.provider_id);
    let value_field = format!("{}.identification_value", action.provider_id);
    let identification_type = fields
        .get(&type_field)
        .map(String::as_str)
        .map(IdentificationType::parse)
        .transpose()?
        .unwrap_or(IdentificationType::CitizenId);
    let identification_value = fields.get(&value_field).cloned().unwrap_or_default();

    Ok(LoginSubmission::new(
        identification_type,
        identification_value,
        action,
    ))
}

fn error_response(err: &LoginFormError) -> Response {
    let status = match err {
        LoginFormError::UnknownProvider(_) => StatusCode::NOT_FOUND,
        LoginFormError::ProviderDisabled(_)
        | LoginFormError::UnknownIdentificationType(_)
        | LoginFormError::MalformedAction(_) => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    if status.is_server_error() {
        tracing::warn!(error = %err, "login submission failed");
    }
    (status, Html(format!("<p>{}</p>", escape(&err.to_string())))).into_response()
}

pub fn render_html(form: &LoginForm) -> String {
    let mut html = String::from(
        "<!doctype html>\n<html>\n  <head><meta charset=\"utf-8\" /><title>Sign in</title></head>\n  <body>\n",
    );

    if form.sections.is_empty() {
        html.push_str("    <p>No identity providers are available.</p>\n");
    }

    for section in &form.sections {
        html.push_str("    <form method=\"post\" action=\"/login\">\n");
        html.push_str(&format!("      <h2>{}</h2>\n", escape(&section.label)));

        html.push_str(&format!(
            "      <label>{}</label>\n      <select name=\"{}\">\n",
            escape(&section.identification_type.label),
            escape(&section.identification_type.name),
        ));
        for (code, label) in &section.identification_type.options {
            html.push_str(&format!(
                "        <option value=\"{}\">{}</option>\n",
                escape(code),
                escape(label)
            ));
        }
        html.push_str("      </select>\n");

        html.push_str(&format!(
            "      <label>{}</label>\n      <input type=\"text\" name=\"{}\" />\n",
            escape(&section.identification_value.label),
            escape(&section.identification_value.name),
        ));

        for control in [&section.login, &section.register] {
            html.push_str(&format!(
                "      <button type=\"submit\" name=\"{}\" value=\"{}\">{}</button>\n",
                escape(&control.name),
                escape(&control.value),
                escape(&control.label)
            ));
        }
        html.push_str("    </form>\n");
    }

    html.push_str("  </body>\n</html>\n");
    html
}

fn escape(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::{parse_submission, render_html};
    use crate::{ActionKind, IdentificationType, LoginForm, LoginFormError, ProviderDefinition};

    fn fields(entries: &[(&str, &str)]) -> HashMap<String, String> {
        entries
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect()
    }

    #[test]
    fn parses_a_full_submission() {
        let submission = parse_submission(&fields(&[
            ("action", "register:google"),
            ("google.identification_type", "EM"),
            ("google.identification_value", "user@example.com"),
        ]))
        .unwrap();

        assert_eq!(submission.action.provider_id, "google");
        assert_eq!(submission.action.kind, ActionKind::Register);
        assert_eq!(submission.identification_type, IdentificationType::Email);
        assert_eq!(submission.login_hint(), "EM,user@example.com");
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let submission = parse_submission(&fields(&[("action", "login:google")])).unwrap();
        assert_eq!(
            submission.identification_type,
            IdentificationType::CitizenId
        );
        assert_eq!(submission.login_hint(), "CC,");
    }

    #[test]
    fn missing_action_is_rejected() {
        assert!(matches!(
            parse_submission(&fields(&[("google.identification_value", "123")])),
            Err(LoginFormError::MalformedAction(_))
        ));
    }

    #[test]
    fn rendered_html_contains_provider_controls() {
        let form = LoginForm::from_definitions(&[
            ProviderDefinition::new("google", "Google").enabled(),
        ]);
        let html = render_html(&form);

        assert!(html.contains("value=\"login:google\""));
        assert!(html.contains("value=\"register:google\""));
        assert!(html.contains("name=\"google.identification_type\""));
        assert!(html.contains("Sign in with Google"));
    }

    #[test]
    fn rendered_html_for_empty_form_has_no_controls() {
        let html = render_html(&LoginForm::default());
        assert!(!html.contains("<button"));
        assert!(html.contains("No identity providers are available."));
    }

    #[test]
    fn labels_are_escaped() {
        let form = LoginForm::from_definitions(&[
            ProviderDefinition::new("corp", "<Corp> & Co").enabled(),
        ]);
        let html = render_html(&form);
        assert!(html.contains("&lt;Corp&gt; &amp; Co"));
        assert!(!html.contains("<Corp>"));
    }
}
