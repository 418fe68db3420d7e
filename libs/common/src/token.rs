//! JWT claims and token verification
//!
//! The auth service signs RS256 tokens with its private key; every service
//! verifies them with the matching public key through [`TokenVerifier`].

use anyhow::{Result, bail};
use jsonwebtoken::{DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Role of a site user
///
/// The role only gates the admin area.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    #[default]
    User,
    Admin,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::User => "user",
            UserRole::Admin => "admin",
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, UserRole::Admin)
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "user" => Ok(UserRole::User),
            "admin" => Ok(UserRole::Admin),
            other => bail!("Unknown user role: {}", other),
        }
    }
}

/// Token type enum
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum TokenType {
    /// Access token
    Access,
    /// Refresh token
    Refresh,
}

/// JWT claims structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User ID
    pub sub: Uuid,
    /// User email
    pub email: String,
    /// User role
    pub role: UserRole,
    /// Issued at time
    pub iat: u64,
    /// Expiration time
    pub exp: u64,
    /// Token type (access or refresh)
    pub token_type: TokenType,
    /// Unique token id, so two tokens issued in the same second differ
    pub jti: Uuid,
}

/// Read a PEM key from an environment variable
///
/// The variable holds either the PEM text itself or a path to a PEM file.
pub fn load_pem(var: &str) -> Result<String> {
    let value = std::env::var(var)
        .map_err(|_| anyhow::anyhow!("{} environment variable not set", var))?;

    if value.starts_with("-----BEGIN") {
        return Ok(value);
    }

    let pem = std::fs::read_to_string(&value)
        .map_err(|e| anyhow::anyhow!("Failed to read key file {}: {}", value, e))?;
    Ok(pem.trim().to_string())
}

/// RS256 token verifier
#[derive(Clone)]
pub struct TokenVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenVerifier {
    /// Build a verifier from the PEM in `JWT_PUBLIC_KEY`
    pub fn from_env() -> Result<Self> {
        Self::from_public_pem(&load_pem("JWT_PUBLIC_KEY")?)
    }

    /// Build a verifier from a PEM-encoded RSA public key
    pub fn from_public_pem(pem: &str) -> Result<Self> {
        let decoding_key = DecodingKey::from_rsa_pem(pem.as_bytes())?;
        let mut validation = Validation::new(jsonwebtoken::Algorithm::RS256);
        validation.validate_exp = true;

        Ok(Self {
            decoding_key,
            validation,
        })
    }

    /// Validate a token and return its claims
    pub fn verify(&self, token: &str) -> Result<Claims> {
        let token_data = decode::<Claims>(token, &self.decoding_key, &self.validation)?;
        Ok(token_data.claims)
    }

    /// Validate a token that must be an access token
    pub fn verify_access(&self, token: &str) -> Result<Claims> {
        let claims = self.verify(token)?;
        if claims.token_type != TokenType::Access {
            bail!("Token is not an access token");
        }
        Ok(claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{EncodingKey, Header, encode};
    use serial_test::serial;

    const PRIVATE_PEM: &str = include_str!("../../../fixtures/jwt_private.pem");
    const PUBLIC_PEM: &str = include_str!("../../../fixtures/jwt_public.pem");

    fn now() -> u64 {
        chrono::Utc::now().timestamp() as u64
    }

    fn sign(claims: &Claims) -> String {
        let key = EncodingKey::from_rsa_pem(PRIVATE_PEM.as_bytes()).unwrap();
        encode(&Header::new(jsonwebtoken::Algorithm::RS256), claims, &key).unwrap()
    }

    fn claims(token_type: TokenType, exp: u64) -> Claims {
        Claims {
            sub: Uuid::new_v4(),
            email: "anna@example.com".to_string(),
            role: UserRole::Admin,
            iat: now(),
            exp,
            token_type,
            jti: Uuid::new_v4(),
        }
    }

    #[test]
    fn test_verify_round_trip() {
        let verifier = TokenVerifier::from_public_pem(PUBLIC_PEM).unwrap();
        let original = claims(TokenType::Access, now() + 600);

        let verified = verifier.verify_access(&sign(&original)).unwrap();
        assert_eq!(verified.sub, original.sub);
        assert_eq!(verified.email, "anna@example.com");
        assert!(verified.role.is_admin());
    }

    #[test]
    fn test_refresh_token_is_not_an_access_token() {
        let verifier = TokenVerifier::from_public_pem(PUBLIC_PEM).unwrap();
        let token = sign(&claims(TokenType::Refresh, now() + 600));

        assert!(verifier.verify(&token).is_ok());
        assert!(verifier.verify_access(&token).is_err());
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let verifier = TokenVerifier::from_public_pem(PUBLIC_PEM).unwrap();
        let token = sign(&claims(TokenType::Access, now() - 3600));

        assert!(verifier.verify(&token).is_err());
    }

    #[test]
    fn test_garbage_token_is_rejected() {
        let verifier = TokenVerifier::from_public_pem(PUBLIC_PEM).unwrap();
        assert!(verifier.verify("not.a.token").is_err());
    }

    #[test]
    fn test_role_parsing() {
        assert_eq!("admin".parse::<UserRole>().unwrap(), UserRole::Admin);
        assert_eq!("user".parse::<UserRole>().unwrap(), UserRole::User);
        assert!("coach".parse::<UserRole>().is_err());
        assert_eq!(UserRole::Admin.to_string(), "admin");
    }

    #[test]
    #[serial]
    fn test_load_pem_inline_and_from_file() {
        unsafe {
            std::env::set_var("FITNESS_TEST_PEM", PUBLIC_PEM);
        }
        assert_eq!(load_pem("FITNESS_TEST_PEM").unwrap(), PUBLIC_PEM);

        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/../../fixtures/jwt_public.pem");
        unsafe {
            std::env::set_var("FITNESS_TEST_PEM", path);
        }
        assert_eq!(load_pem("FITNESS_TEST_PEM").unwrap(), PUBLIC_PEM.trim());

        unsafe {
            std::env::remove_var("FITNESS_TEST_PEM");
        }
        assert!(load_pem("FITNESS_TEST_PEM").is_err());
    }
}
