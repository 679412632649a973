use serde_json::Value;
use url::Url;

use crate::{
    ActionKind, AuthorizeRedirect, FlowState, LoginFormError, ProviderClient, ProviderSettings,
};

/// Connection details for one OIDC provider, read out of its settings map.
#[derive(Debug, Clone)]
pub struct OidcClientConfig {
    pub client_id: String,
    pub redirect_uri: String,
    pub authorization_endpoint: String,
    pub authorize_params: Vec<(String, String)>,
}

impl OidcClientConfig {
    pub fn new(
        client_id: impl Into<String>,
        redirect_uri: impl Into<String>,
        authorization_endpoint: impl Into<String>,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            redirect_uri: redirect_uri.into(),
            authorization_endpoint: authorization_endpoint.into(),
            authorize_params: Vec::new(),
        }
    }

    pub fn with_authorize_param(
        mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.authorize_params.push((key.into(), value.into()));
        self
    }

    pub fn from_settings(
        provider_id: &str,
        settings: &ProviderSettings,
    ) -> Result<Self, LoginFormError> {
        let mut config = Self::new(
            required_str(provider_id, settings, "client_id")?,
            required_str(provider_id, settings, "redirect_uri")?,
            required_str(provider_id, settings, "authorization_endpoint")?,
        );

        if let Some(extra) = settings.get("authorize_params") {
            let map = extra
                .as_object()
                .ok_or_else(|| LoginFormError::InvalidSetting {
                    provider: provider_id.to_string(),
                    setting: "authorize_params".to_string(),
                })?;
            for (key, value) in map {
                let value = value.as_str().ok_or_else(|| LoginFormError::InvalidSetting {
                    provider: provider_id.to_string(),
                    setting: format!("authorize_params.{key}"),
                })?;
                config = config.with_authorize_param(key, value);
            }
        }

        Ok(config)
    }
}

fn required_str(
    provider_id: &str,
    settings: &ProviderSettings,
    key: &str,
) -> Result<String, LoginFormError> {
    match settings.get(key) {
        Some(Value::String(value)) if !value.is_empty() => Ok(value.clone()),
        _ => Err(LoginFormError::InvalidSetting {
            provider: provider_id.to_string(),
            setting: key.to_string(),
        }),
    }
}

/// Default authorization-code client: turns a submission into the redirect
/// that sends the user agent to the provider. Token exchange and discovery
/// live elsewhere.
pub struct OidcClient {
    provider_id: String,
    config: OidcClientConfig,
}

impl OidcClient {
    pub fn new(provider_id: impl Into<String>, config: OidcClientConfig) -> Self {
        Self {
            provider_id: provider_id.into(),
            config,
        }
    }

    pub fn from_settings(
        provider_id: &str,
        settings: &ProviderSettings,
    ) -> Result<Self, LoginFormError> {
        let config = OidcClientConfig::from_settings(provider_id, settings)?;
        Ok(Self::new(provider_id, config))
    }

    fn authorize_with_flow(
        &self,
        flow: &FlowState,
        scopes: &[String],
        kind: ActionKind,
        login_hint: &str,
    ) -> Result<AuthorizeRedirect, LoginFormError> {
        let mut url = Url::parse(&self.config.authorization_endpoint)?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("response_type", "code");
            pairs.append_pair("client_id", &self.config.client_id);
            pairs.append_pair("redirect_uri", &self.config.redirect_uri);
            pairs.append_pair("scope", &scopes.join(" "));
            pairs.append_pair("state", &flow.state);
            pairs.append_pair("nonce", &flow.nonce);
            pairs.append_pair("code_challenge", &flow.pkce_challenge);
            pairs.append_pair("code_challenge_method", "S256");
            pairs.append_pair("login_hint", login_hint);
            if kind == ActionKind::Register {
                pairs.append_pair("prompt", "create");
            }
            for (key, value) in &self.config.authorize_params {
                pairs.append_pair(key, value);
            }
        }

        tracing::info!(
            provider = %self.provider_id,
            kind = kind.as_str(),
            "issuing authorization redirect"
        );
        Ok(AuthorizeRedirect::new(url.to_string()))
    }
}

impl ProviderClient for OidcClient {
    fn authorize(
        &self,
        scopes: &[String],
        kind: ActionKind,
        login_hint: &str,
    ) -> Result<AuthorizeRedirect, LoginFormError> {
        let flow = FlowState::generate()?;
        self.authorize_with_flow(&flow, scopes, kind, login_hint)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use serde_json::json;
    use url::Url;

    use super::{OidcClient, OidcClientConfig};
    use crate::{ActionKind, FlowState, LoginFormError, ProviderSettings};

    fn settings() -> ProviderSettings {
        let mut settings = ProviderSettings::new();
        settings.insert("client_id".to_string(), json!("client-id"));
        settings.insert(
            "redirect_uri".to_string(),
            json!("https://rp.example/callback"),
        );
        settings.insert(
            "authorization_endpoint".to_string(),
            json!("https://idp.example/authorize"),
        );
        settings
    }

    fn query_pairs(url: &str) -> HashMap<String, String> {
        Url::parse(url)
            .unwrap()
            .query_pairs()
            .into_owned()
            .collect()
    }

    #[test]
    fn authorize_url_includes_required_params() {
        let client = OidcClient::from_settings("google", &settings()).unwrap();
        let flow = FlowState::from_parts("state-1", "nonce-1", "verifier");
        let redirect = client
            .authorize_with_flow(&flow, &["openid".to_string()], ActionKind::Login, "CC,123")
            .unwrap();

        let pairs = query_pairs(&redirect.url);
        assert_eq!(pairs.get("response_type"), Some(&"code".to_string()));
        assert_eq!(pairs.get("client_id"), Some(&"client-id".to_string()));
        assert_eq!(
            pairs.get("redirect_uri"),
            Some(&"https://rp.example/callback".to_string())
        );
        assert_eq!(pairs.get("scope"), Some(&"openid".to_string()));
        assert_eq!(pairs.get("state"), Some(&"state-1".to_string()));
        assert_eq!(pairs.get("nonce"), Some(&"nonce-1".to_string()));
        assert_eq!(pairs.get("login_hint"), Some(&"CC,123".to_string()));
        assert_eq!(
            pairs.get("code_challenge_method"),
            Some(&"S256".to_string())
        );
        assert!(pairs.contains_key("code_challenge"));
        assert!(!pairs.contains_key("prompt"));
    }

    #[test]
    fn register_adds_prompt_create() {
        let client = OidcClient::from_settings("google", &settings()).unwrap();
        let flow = FlowState::from_parts("s", "n", "v");
        let redirect = client
            .authorize_with_flow(&flow, &["openid".to_string()], ActionKind::Register, "EM,")
            .unwrap();

        let pairs = query_pairs(&redirect.url);
        assert_eq!(pairs.get("prompt"), Some(&"create".to_string()));
        assert_eq!(pairs.get("login_hint"), Some(&"EM,".to_string()));
    }

    #[test]
    fn extra_authorize_params_are_appended() {
        let config = OidcClientConfig::new(
            "client-id",
            "https://rp.example/callback",
            "https://idp.example/authorize",
        )
        .with_authorize_param("kc_idp_hint", "corp-saml");
        let client = OidcClient::new("keycloak", config);
        let flow = FlowState::from_parts("s", "n", "v");
        let redirect = client
            .authorize_with_flow(&flow, &["openid".to_string()], ActionKind::Login, "CC,1")
            .unwrap();

        let pairs = query_pairs(&redirect.url);
        assert_eq!(pairs.get("kc_idp_hint"), Some(&"corp-saml".to_string()));
    }

    #[test]
    fn missing_setting_is_an_error() {
        let mut settings = settings();
        settings.remove("client_id");

        let result = OidcClient::from_settings("google", &settings);
        assert!(matches!(
            result,
            Err(LoginFormError::InvalidSetting { ref setting, .. }) if setting == "client_id"
        ));
    }
}
