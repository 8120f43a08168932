use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

const ACTIVATION_PURPOSE: &str = "activation";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SignatureError {
    #[error("bad signature")]
    BadSignature,
    #[error("signature expired")]
    Expired,
}

#[derive(Debug, Serialize, Deserialize)]
struct ActivationClaims {
    sub: String,
    purpose: String,
    exp: usize,
}

/// Signs usernames into activation tokens and back.
#[derive(Clone)]
pub struct ActivationSigner {
    secret: String,
    ttl_secs: i64,
}

impl ActivationSigner {
    pub fn new(secret: impl Into<String>, ttl_secs: i64) -> Self {
        Self {
            secret: secret.into(),
            ttl_secs,
        }
    }

    pub fn sign(&self, username: &str) -> anyhow::Result<String> {
        let now = chrono::Utc::now().timestamp();
        let claims = ActivationClaims {
            sub: username.to_string(),
            purpose: ACTIVATION_PURPOSE.to_string(),
            exp: (now + self.ttl_secs.max(0)) as usize,
        };
        let token = jsonwebtoken::encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )?;
        Ok(token)
    }

    pub fn unsign(&self, token: &str) -> Result<String, SignatureError> {
        let mut validation = Validation::default();
        validation.leeway = 0;
        let data = jsonwebtoken::decode::<ActivationClaims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        )
        .map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => SignatureError::Expired,
            _ => SignatureError::BadSignature,
        })?;
        if data.claims.purpose != ACTIVATION_PURPOSE {
            return Err(SignatureError::BadSignature);
        }
        Ok(data.claims.sub)
    }
}
