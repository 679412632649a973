//! OpenID Connect login/registration form adapter.
//!
//! Renders a provider-selection form from enabled provider definitions and,
//! on submission, stashes the scratch state a callback handler needs before
//! delegating to the provider client's `authorize` capability. Token
//! exchange, discovery, and token validation live in other components.

mod claims;
mod client;
mod config;
mod error;
mod flow;
mod form;
#[cfg(feature = "server")]
mod http;
mod provider;
mod registry;
mod session;
mod types;

pub use claims::OpenIdClaims;
pub use client::{OidcClient, OidcClientConfig};
pub use config::AppConfig;
pub use error::LoginFormError;
pub use flow::FlowState;
pub use form::{
    LoginForm, LoginFormHandler, ProviderSection, SelectField, SubmitControl, TextField,
};
#[cfg(feature = "server")]
pub use http::{ServerState, parse_submission, render_html, router, serve};
pub use provider::{AuthorizeRedirect, ProviderClient, ProviderDefinition, ProviderSettings};
pub use registry::ProviderRegistry;
pub use session::{AuthScratch, MemorySession, SessionContext};
pub use types::{ActionKind, IdentificationType, LoginSubmission, SubmittedAction};
