//! Backend contract: typed request and response bodies for the auth and
//! team-creation endpoints, with the client-side checks the app runs
//! before sending anything.
//!
//! No I/O happens here. Callers own the HTTP client; this module only
//! builds bodies and decodes `(status, body)` pairs.

use std::sync::LazyLock;

use regex::Regex;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use squad_engine::domain::PlayerId;
use squad_engine::transfer::ManagedTeam;

use crate::error::ContractError;

pub const INITIATE_PATH: &str = "/api/auth/initiate";
pub const VERIFY_PATH: &str = "/api/auth/verify";
pub const CREATE_TEAM_PATH: &str = "/api/teams/create";

pub const MIN_PASSWORD_LEN: usize = 6;
pub const OTP_LEN: usize = 6;

static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    // Something, an @, something, a dot, something. No whitespace, one @.
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles")
});

static EMAIL_MASK_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.{2})(.*)(@.*)$").expect("mask pattern compiles"));

// ---- Validation ----

pub fn validate_email(email: &str) -> Result<(), ContractError> {
    if EMAIL_REGEX.is_match(email) {
        Ok(())
    } else {
        Err(ContractError::InvalidEmail)
    }
}

pub fn validate_password(password: &str) -> Result<(), ContractError> {
    if password.chars().count() >= MIN_PASSWORD_LEN {
        Ok(())
    } else {
        Err(ContractError::PasswordTooShort { min: MIN_PASSWORD_LEN })
    }
}

pub fn validate_otp(otp: &str) -> Result<(), ContractError> {
    if otp.len() == OTP_LEN && otp.bytes().all(|b| b.is_ascii_digit()) {
        Ok(())
    } else {
        Err(ContractError::InvalidOtp { len: OTP_LEN })
    }
}

pub fn validate_team_name(name: &str) -> Result<(), ContractError> {
    if name.trim().is_empty() {
        Err(ContractError::EmptyTeamName)
    } else {
        Ok(())
    }
}

/// `jo***@example.com`. Used when echoing an address back or logging it.
pub fn mask_email(email: &str) -> String {
    EMAIL_MASK_REGEX.replace(email, "$1***$3").into_owned()
}

// ---- Auth ----

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InitiateRequest {
    pub email: String,
    pub password: String,
}

impl InitiateRequest {
    pub fn new(email: &str, password: &str) -> Result<Self, ContractError> {
        let email = email.trim();
        validate_email(email)?;
        validate_password(password)?;
        Ok(Self {
            email: email.to_string(),
            password: password.to_string(),
        })
    }
}

/// What the backend decided about an initiate call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthStatus {
    /// New account: a code was mailed and must be verified next.
    NewUserOtpSent,
    /// Returning user: `token` is set.
    LoginSuccess,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InitiateResponse {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

impl InitiateResponse {
    /// The backend pads `message` now and then, so it is trimmed first.
    pub fn status(&self) -> Result<AuthStatus, ContractError> {
        match self.message.trim() {
            "NEW_USER_OTP_SENT" => Ok(AuthStatus::NewUserOtpSent),
            "LOGIN_SUCCESS" => Ok(AuthStatus::LoginSuccess),
            other => Err(ContractError::Malformed(format!("unknown auth message {:?}", other))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifyRequest {
    pub email: String,
    pub otp: String,
}

impl VerifyRequest {
    pub fn new(email: &str, otp: &str) -> Result<Self, ContractError> {
        validate_email(email.trim())?;
        validate_otp(otp)?;
        Ok(Self {
            email: email.trim().to_string(),
            otp: otp.to_string(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifyResponse {
    pub token: String,
}

// ---- Teams ----

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTeamRequest {
    pub user_id: String,
    pub team_name: String,
    pub player_ids: Vec<PlayerId>,
}

impl CreateTeamRequest {
    /// Body for a freshly confirmed squad. Player ids go in slot order,
    /// Starting 11 first.
    pub fn from_team(user_id: &str, team_name: &str, team: &ManagedTeam) -> Result<Self, ContractError> {
        if user_id.trim().is_empty() {
            return Err(ContractError::EmptyUserId);
        }
        validate_team_name(team_name)?;
        Ok(Self {
            user_id: user_id.to_string(),
            team_name: team_name.trim().to_string(),
            player_ids: team.squad.player_ids(),
        })
    }
}

/// Whatever the backend echoes back for a created team. Only the id is
/// read; the rest is kept as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedTeam {
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

// ---- Decoding ----

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<String>,
    message: Option<String>,
}

/// Decode a backend reply. 2xx bodies parse as `T`; anything else parses
/// as `{error}` or `{message}` and becomes `ContractError::Rejected`.
pub fn decode_response<T: DeserializeOwned>(status: u16, body: &str) -> Result<T, ContractError> {
    if (200..300).contains(&status) {
        return serde_json::from_str(body).map_err(|e| ContractError::Malformed(e.to_string()));
    }
    let message = serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.error.or(b.message))
        .unwrap_or_else(|| "request failed".to_string());
    tracing::warn!(status, %message, "backend rejected request");
    Err(ContractError::Rejected { status, message })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_shape() {
        assert!(validate_email("jo@example.com").is_ok());
        assert!(validate_email("a@b.c").is_ok());
        assert_eq!(validate_email("jo@example"), Err(ContractError::InvalidEmail));
        assert_eq!(validate_email("jo example@x.com"), Err(ContractError::InvalidEmail));
        assert_eq!(validate_email("jo@@x.com"), Err(ContractError::InvalidEmail));
        assert_eq!(validate_email(""), Err(ContractError::InvalidEmail));
    }

    #[test]
    fn test_password_and_otp() {
        assert!(validate_password("secret").is_ok());
        assert_eq!(
            validate_password("12345"),
            Err(ContractError::PasswordTooShort { min: 6 })
        );
        assert!(validate_otp("123456").is_ok());
        assert!(validate_otp("12345").is_err());
        assert!(validate_otp("12a456").is_err());
    }

    #[test]
    fn test_mask_email() {
        assert_eq!(mask_email("johnny@example.com"), "jo***@example.com");
        assert_eq!(mask_email("not an email"), "not an email");
    }

    #[test]
    fn test_initiate_round() {
        let req = InitiateRequest::new("  jo@example.com ", "hunter22").unwrap();
        let body = serde_json::to_value(&req).unwrap();
        assert_eq!(body["email"], "jo@example.com");

        let resp: InitiateResponse =
            decode_response(200, r#"{"message": "NEW_USER_OTP_SENT  "}"#).unwrap();
        assert_eq!(resp.status().unwrap(), AuthStatus::NewUserOtpSent);

        let resp: InitiateResponse =
            decode_response(200, r#"{"message": "LOGIN_SUCCESS", "token": "jwt"}"#).unwrap();
        assert_eq!(resp.status().unwrap(), AuthStatus::LoginSuccess);
        assert_eq!(resp.token.as_deref(), Some("jwt"));
    }

    #[test]
    fn test_rejections_are_decoded() {
        let err = decode_response::<VerifyResponse>(401, r#"{"error": "Invalid code"}"#).unwrap_err();
        assert_eq!(
            err,
            ContractError::Rejected { status: 401, message: "Invalid code".to_string() }
        );
        let err = decode_response::<CreatedTeam>(409, r#"{"message": "Team name taken"}"#).unwrap_err();
        assert_eq!(
            err,
            ContractError::Rejected { status: 409, message: "Team name taken".to_string() }
        );
        let err = decode_response::<CreatedTeam>(500, "<html>").unwrap_err();
        assert!(matches!(err, ContractError::Rejected { status: 500, .. }));
    }

    #[test]
    fn test_created_team_keeps_extra_fields() {
        let team: CreatedTeam =
            decode_response(201, r#"{"id": 42, "teamName": "Eagles", "budget": 0.5}"#).unwrap();
        assert_eq!(team.id, Some(Value::from(42)));
        assert_eq!(team.extra["teamName"], "Eagles");
    }
}
