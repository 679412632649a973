use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use rand::{TryRngCore, rngs::OsRng};
use sha2::{Digest, Sha256};

use crate::LoginFormError;

const STATE_BYTES: usize = 16;
const NONCE_BYTES: usize = 16;
const VERIFIER_BYTES: usize = 32;

/// Per-flow random material for one authorization round trip.
#[derive(Debug, Clone)]
pub struct FlowState {
    pub state: String,
    pub nonce: String,
    pub pkce_verifier: String,
    pub pkce_challenge: String,
}

impl FlowState {
    pub fn generate() -> Result<Self, LoginFormError> {
        let state = random_token(STATE_BYTES)?;
        let nonce = random_token(NONCE_BYTES)?;
        let pkce_verifier = random_token(VERIFIER_BYTES)?;
        Ok(Self::from_parts(state, nonce, pkce_verifier))
    }

    pub fn from_parts(
        state: impl Into<String>,
        nonce: impl Into<String>,
        pkce_verifier: impl Into<String>,
    ) -> Self {
        let pkce_verifier = pkce_verifier.into();
        let mut hasher = Sha256::new();
        hasher.update(pkce_verifier.as_bytes());
        let pkce_challenge = URL_SAFE_NO_PAD.encode(hasher.finalize());
        Self {
            state: state.into(),
            nonce: nonce.into(),
            pkce_verifier,
            pkce_challenge,
        }
    }
}

fn random_token(bytes: usize) -> Result<String, LoginFormError> {
    let mut buffer = vec![0u8; bytes];
    OsRng
        .try_fill_bytes(&mut buffer)
        .map_err(|err| LoginFormError::OsRng {
            message: err.to_string(),
        })?;
    Ok(URL_SAFE_NO_PAD.encode(buffer))
}

#[cfg(test)]
mod tests {
    use super::FlowState;

    #[test]
    fn generated_tokens_are_url_safe() {
        let flow = FlowState::generate().unwrap();
        for value in [
            &flow.state,
            &flow.nonce,
            &flow.pkce_verifier,
            &flow.pkce_challenge,
        ] {
            assert!(!value.is_empty());
            assert!(!value.contains('='), "tokens should be unpadded");
            assert!(!value.contains('+'), "tokens should be url safe");
            assert!(!value.contains('/'), "tokens should be url safe");
        }
    }

    #[test]
    fn challenge_is_derived_from_verifier() {
        let a = FlowState::from_parts("s", "n", "verifier");
        let b = FlowState::from_parts("s", "n", "verifier");
        assert_eq!(a.pkce_challenge, b.pkce_challenge);

        let c = FlowState::from_parts("s", "n", "other");
        assert_ne!(a.pkce_challenge, c.pkce_challenge);
    }

    #[test]
    fn state_and_nonce_differ_per_flow() {
        let flow = FlowState::generate().unwrap();
        assert_ne!(flow.state, flow.nonce);
    }
}
