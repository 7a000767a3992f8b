//! # Session
//!
//! The signed-in user, decoded from the login token.
//!
//! ```text
//!   login response { token }
//!          │
//!          ▼
//!   Session::from_token ──► role (lowercased, "user" if absent)
//!          │                username (unique_name)
//!          │                sector   (Setor)
//!          ▼
//!   Session::access ──────► Staff    "admin" | "func"
//!                           Customer "cliente"
//!                           None     anything else
//! ```
//!
//! The signature is NOT verified here. The server that issued the token is
//! the one that checks it on every request; the device only reads the
//! payload to pick a navigation shell.

use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{CoreError, CoreResult};

/// Role assumed when the token carries none.
pub const DEFAULT_ROLE: &str = "user";

#[derive(Debug, Deserialize)]
struct Claims {
    #[serde(default)]
    role: Option<String>,
    #[serde(default)]
    unique_name: Option<String>,
    /// Issued as a number by some servers and a string by others.
    #[serde(rename = "Setor")]
    #[serde(default)]
    sector: Option<Value>,
}

/// Which part of the app a session may use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// Order management and catalog editing.
    Staff,
    /// Menu and sacola.
    Customer,
    /// Back to the login screen.
    None,
}

/// The signed-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub role: String,
    pub username: Option<String>,
    #[serde(rename = "setor")]
    pub sector: Option<String>,
}

impl Session {
    /// Decodes the token payload into a session.
    pub fn from_token(token: &str) -> CoreResult<Self> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.insecure_disable_signature_validation();
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.required_spec_claims.clear();

        let data = decode::<Claims>(token, &DecodingKey::from_secret(&[]), &validation)
            .map_err(|e| CoreError::InvalidToken(e.to_string()))?;
        let claims = data.claims;

        let role = claims
            .role
            .map(|r| r.to_lowercase())
            .filter(|r| !r.is_empty())
            .unwrap_or_else(|| DEFAULT_ROLE.to_string());

        let sector = match claims.sector {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) => Some(s),
            Some(other) => Some(other.to_string()),
        };

        Ok(Session {
            token: token.to_string(),
            role,
            username: claims.unique_name,
            sector,
        })
    }

    /// Maps the role to an access level.
    pub fn access(&self) -> Access {
        match self.role.as_str() {
            "admin" | "func" => Access::Staff,
            "cliente" => Access::Customer,
            _ => Access::None,
        }
    }

    /// True for `admin` and `func`.
    pub fn is_staff(&self) -> bool {
        self.access() == Access::Staff
    }
}
