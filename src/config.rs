use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::{LoginFormError, OidcClient, OpenIdClaims, ProviderDefinition, ProviderRegistry};

fn default_claims() -> Vec<String> {
    vec!["email".to_string(), "name".to_string()]
}

/// Deployment configuration: the providers to offer and the claims to ask
/// for. Loaded once at startup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub providers: Vec<ProviderDefinition>,
    #[serde(default = "default_claims")]
    pub claims: Vec<String>,
}

impl AppConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LoginFormError> {
        let raw = std::fs::read_to_string(path)?;
        serde_json::from_str(&raw).map_err(|err| LoginFormError::Config(err.to_string()))
    }

    pub fn claims(&self) -> OpenIdClaims {
        OpenIdClaims::new(self.claims.iter().cloned())
    }

    /// Builds the registry with the default OIDC client behind every
    /// configured provider.
    pub fn build_registry(&self) -> Arc<ProviderRegistry> {
        let mut registry = ProviderRegistry::new();
        for definition in &self.providers {
            let provider_id = definition.id.clone();
            registry.register(definition.clone(), move |settings| {
                let client = OidcClient::from_settings(&provider_id, settings)?;
                Ok(Box::new(client))
            });
        }
        Arc::new(registry)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::AppConfig;

    #[test]
    fn config_parses_providers_and_claims() {
        let config: AppConfig = serde_json::from_value(json!({
            "providers": [{
                "id": "google",
                "label": "Google",
                "enabled": true,
                "settings": {
                    "client_id": "client-id",
                    "redirect_uri": "https://rp.example/callback",
                    "authorization_endpoint": "https://idp.example/authorize"
                }
            }],
            "claims": ["email"]
        }))
        .unwrap();

        assert_eq!(config.providers.len(), 1);
        assert!(config.providers[0].enabled);
        assert_eq!(config.claims().scopes(), ["openid", "email"]);

        let registry = config.build_registry();
        assert!(registry.client("google").is_ok());
    }

    #[test]
    fn claims_default_to_email_and_name() {
        let config: AppConfig = serde_json::from_value(json!({ "providers": [] })).unwrap();
        assert_eq!(config.claims().scopes(), ["openid", "profile", "email"]);
    }
}
