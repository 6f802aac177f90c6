//! Token exchange between the two subsystems.
//!
//! SkyPortal authenticates to Kowalski with a JWT minted from Kowalski's own
//! admin credentials; Kowalski authenticates to SkyPortal with the admin API
//! token SkyPortal writes into its container during seeding.

use crate::error::{KernelError, KernelErrorExt};
use crate::unified::UnifiedConfig;
use chrono::{DateTime, TimeDelta, Utc};
use fritz_domain::config::SkyPortalSettings;
use fritz_domain::constants::{KOWALSKI, TOKEN_LENGTH};
use fritz_process::Docker;
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::{debug, info};

/// The `kowalski.server` keys that feed token generation.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct KowalskiAuth {
    pub admin_username: String,
    pub jwt_secret_key: String,
    #[serde(default = "default_algorithm")]
    pub jwt_algorithm: String,
    /// Expiry in seconds; absent, null or zero means the token never expires.
    #[serde(default)]
    pub jwt_exp_delta_seconds: Option<i64>,
}

fn default_algorithm() -> String {
    "HS256".to_owned()
}

impl KowalskiAuth {
    /// Reads `kowalski.server` out of the unified config.
    ///
    /// # Errors
    /// Fails if the section is missing or lacks the admin username or secret.
    pub fn from_config(config: &UnifiedConfig) -> Result<Self, KernelError> {
        let server = config
            .get(&[KOWALSKI, "server"])
            .cloned()
            .ok_or_else(|| KernelError::config("`kowalski.server` section is missing"))?;
        serde_yaml::from_value(server).context("reading `kowalski.server`")
    }

    /// Only the HMAC family is accepted; the secret is a shared string.
    fn algorithm(&self) -> Result<Algorithm, KernelError> {
        let algorithm = Algorithm::from_str(&self.jwt_algorithm)
            .context(format!("unknown JWT algorithm `{}`", self.jwt_algorithm))?;
        match algorithm {
            Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512 => Ok(algorithm),
            other => Err(KernelError::token(format!(
                "JWT algorithm {other:?} is not supported, use HS256, HS384 or HS512"
            ))),
        }
    }
}

/// Claims understood by Kowalski.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KowalskiClaims {
    pub user_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
}

impl KowalskiClaims {
    /// # Errors
    /// Fails if `jwt_exp_delta_seconds` pushes the expiry past the representable range.
    pub fn new(auth: &KowalskiAuth, now: DateTime<Utc>) -> Result<Self, KernelError> {
        let exp = match auth.jwt_exp_delta_seconds.filter(|&delta| delta > 0) {
            Some(delta) => Some(
                TimeDelta::try_seconds(delta)
                    .and_then(|delta| now.checked_add_signed(delta))
                    .ok_or_else(|| KernelError::token("jwt_exp_delta_seconds out of range"))?
                    .timestamp(),
            ),
            None => None,
        };
        Ok(Self { user_id: auth.admin_username.clone(), exp })
    }
}

/// Mints the JWT SkyPortal uses to call Kowalski.
///
/// # Errors
/// Fails on an unsupported algorithm, an out-of-range expiry or an encoding failure.
pub fn generate_kowalski_token(auth: &KowalskiAuth, now: DateTime<Utc>) -> Result<String, KernelError> {
    let algorithm = auth.algorithm()?;
    let claims = KowalskiClaims::new(auth, now)?;
    let token = jsonwebtoken::encode(
        &Header::new(algorithm),
        &claims,
        &EncodingKey::from_secret(auth.jwt_secret_key.as_bytes()),
    )
    .context("encoding Kowalski token")?;

    debug!(user = %claims.user_id, expires = ?claims.exp, "Generated Kowalski token");
    Ok(token)
}

/// Picks the token out of the contents of SkyPortal's token file.
///
/// The token is the last whitespace-separated word on the first line that
/// contains `marker`, and must be exactly 36 characters long.
///
/// # Errors
/// Fails if no line carries the marker or the token has the wrong length.
pub fn extract_skyportal_token(contents: &str, marker: &str) -> Result<String, KernelError> {
    let token = contents
        .lines()
        .find(|line| line.contains(marker))
        .and_then(|line| line.split_whitespace().last())
        .ok_or_else(|| KernelError::token(format!("no `{marker}` entry in the token file")))?;

    let length = token.chars().count();
    if length != TOKEN_LENGTH {
        return Err(KernelError::token(format!(
            "expected a {TOKEN_LENGTH}-character token, found {length} characters"
        )));
    }
    Ok(token.to_owned())
}

/// Reads SkyPortal's admin token from inside the running web container.
///
/// # Errors
/// Fails if the file cannot be read or does not contain a valid token.
pub fn retrieve_skyportal_token(
    docker: &Docker<'_>,
    settings: &SkyPortalSettings,
) -> Result<String, KernelError> {
    let contents = docker
        .exec_output(&settings.web_container, &["cat", &settings.token_file])
        .context("reading the SkyPortal token file")?;
    let token = extract_skyportal_token(&contents, &settings.token_marker)?;
    info!(container = %settings.web_container, "Retrieved SkyPortal admin token");
    Ok(token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{DecodingKey, Validation, decode};

    const UUID: &str = "1b1c4d9e-7f3a-4c6b-9d2e-5a8f0c1e2b3d";

    fn auth(algorithm: &str, delta: Option<i64>) -> KowalskiAuth {
        KowalskiAuth {
            admin_username: "admin".to_owned(),
            jwt_secret_key: "abc0000000000000000000000000000000".to_owned(),
            jwt_algorithm: algorithm.to_owned(),
            jwt_exp_delta_seconds: delta,
        }
    }

    fn decode_claims(token: &str, auth: &KowalskiAuth, algorithm: Algorithm) -> KowalskiClaims {
        let mut validation = Validation::new(algorithm);
        validation.required_spec_claims.clear();
        validation.validate_exp = false;
        decode::<KowalskiClaims>(
            token,
            &DecodingKey::from_secret(auth.jwt_secret_key.as_bytes()),
            &validation,
        )
        .unwrap()
        .claims
    }

    #[test]
    fn token_without_expiry_carries_only_the_user() {
        let auth = auth("HS256", None);
        let token = generate_kowalski_token(&auth, Utc::now()).unwrap();
        let claims = decode_claims(&token, &auth, Algorithm::HS256);
        assert_eq!(claims, KowalskiClaims { user_id: "admin".to_owned(), exp: None });
    }

    #[test]
    fn zero_delta_means_no_expiry() {
        let claims = KowalskiClaims::new(&auth("HS256", Some(0)), Utc::now()).unwrap();
        assert_eq!(claims.exp, None);
    }

    #[test]
    fn positive_delta_sets_expiry() {
        let now = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        let auth = auth("HS512", Some(3600));
        let token = generate_kowalski_token(&auth, now).unwrap();
        let claims = decode_claims(&token, &auth, Algorithm::HS512);
        assert_eq!(claims.exp, Some(1_700_003_600));
    }

    #[test]
    fn huge_delta_is_a_token_error() {
        for delta in [10_000_000_000_000, i64::MAX] {
            let err = generate_kowalski_token(&auth("HS256", Some(delta)), Utc::now()).unwrap_err();
            assert!(matches!(err, KernelError::Token { .. }), "got: {err}");
        }
    }

    #[test]
    fn asymmetric_and_unknown_algorithms_are_rejected() {
        assert!(matches!(
            generate_kowalski_token(&auth("RS256", None), Utc::now()),
            Err(KernelError::Token { .. })
        ));
        assert!(generate_kowalski_token(&auth("HS999", None), Utc::now()).is_err());
    }

    #[test]
    fn auth_is_read_from_the_unified_config() {
        let cfg = UnifiedConfig::from_yaml_str(
            "kowalski:\n  server:\n    admin_username: admin\n    jwt_secret_key: s3cret\n    jwt_exp_delta_seconds: null\n",
        )
        .unwrap();
        let auth = KowalskiAuth::from_config(&cfg).unwrap();
        assert_eq!(auth.jwt_algorithm, "HS256");
        assert_eq!(auth.jwt_exp_delta_seconds, None);

        let missing = UnifiedConfig::from_yaml_str("kowalski: {}\n").unwrap();
        assert!(KowalskiAuth::from_config(&missing).is_err());
    }

    #[test]
    fn token_is_the_last_word_on_the_marker_line() {
        let contents = format!("other: value\nINITIAL_ADMIN: {UUID}\n");
        assert_eq!(extract_skyportal_token(&contents, "INITIAL_ADMIN").unwrap(), UUID);
    }

    #[test]
    fn token_length_must_be_exact() {
        for bad in [&UUID[..35], &format!("{UUID}0")[..]] {
            let contents = format!("INITIAL_ADMIN: {bad}\n");
            let err = extract_skyportal_token(&contents, "INITIAL_ADMIN").unwrap_err();
            assert!(matches!(err, KernelError::Token { .. }), "got: {err}");
        }
    }

    #[test]
    fn missing_marker_is_a_token_error() {
        assert!(extract_skyportal_token("nothing here\n", "INITIAL_ADMIN").is_err());
    }
}
