/// Standard OIDC claims and the scope each one travels under.
const STANDARD_CLAIMS: &[(&str, &str)] = &[
    ("name", "profile"),
    ("given_name", "profile"),
    ("family_name", "profile"),
    ("preferred_username", "profile"),
    ("picture", "profile"),
    ("locale", "profile"),
    ("email", "email"),
    ("email_verified", "email"),
    ("address", "address"),
    ("phone_number", "phone"),
];

/// Computes the scopes to request from the claims a deployment wants back.
/// `openid` is always first; the rest follow the standard claims table,
/// deduplicated in table order.
#[derive(Debug, Clone)]
pub struct OpenIdClaims {
    requested: Vec<String>,
}

impl Default for OpenIdClaims {
    fn default() -> Self {
        Self {
            requested: vec!["email".to_string(), "name".to_string()],
        }
    }
}

impl OpenIdClaims {
    pub fn new(requested: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            requested: requested.into_iter().map(Into::into).collect(),
        }
    }

    pub fn scopes(&self) -> Vec<String> {
        let mut scopes = vec!["openid".to_string()];
        for (claim, scope) in STANDARD_CLAIMS {
            if self.requested.iter().any(|requested| requested == claim)
                && !scopes.iter().any(|existing| existing == scope)
            {
                scopes.push((*scope).to_string());
            }
        }
        scopes
    }
}
