use serde::Deserialize;

use super::{require, require_length};
use crate::error::AuthError;

/// Fields common to every grant type.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginBody {
    #[serde(default)]
    pub client_id: String,
    #[serde(default)]
    pub grant_type: String,
    pub tenant_id: Option<String>,
}

impl LoginBody {
    pub fn validate(&self) -> Result<(), AuthError> {
        require(&self.client_id, "clientId")?;
        require(&self.grant_type, "grantType")
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordLoginBody {
    pub tenant_id: Option<String>,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    /// Captcha answer
    pub code: Option<String>,
    /// Captcha id
    pub uuid: Option<String>,
}

impl PasswordLoginBody {
    pub fn validate(&self) -> Result<(), AuthError> {
        require_length(&self.username, "username", 2, 30)?;
        require_length(&self.password, "password", 5, 30)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SmsLoginBody {
    pub tenant_id: Option<String>,
    #[serde(default)]
    pub phonenumber: String,
    #[serde(default)]
    pub sms_code: String,
}

impl SmsLoginBody {
    pub fn validate(&self) -> Result<(), AuthError> {
        require(&self.phonenumber, "phonenumber")?;
        require(&self.sms_code, "smsCode")
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailLoginBody {
    pub tenant_id: Option<String>,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub email_code: String,
}

impl EmailLoginBody {
    pub fn validate(&self) -> Result<(), AuthError> {
        require(&self.email, "email")?;
        if !self.email.contains('@') {
            return Err(AuthError::InvalidRequest("email is not a valid address".into()));
        }
        require(&self.email_code, "emailCode")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::application::commands::parse_body;

    #[test]
    fn test_envelope_parses_camel_case() {
        let body: LoginBody =
            parse_body(r#"{"clientId":"c1","grantType":"password","tenantId":"t1","username":"alice"}"#)
                .unwrap();
        assert_eq!(body.client_id, "c1");
        assert_eq!(body.grant_type, "password");
        assert_eq!(body.tenant_id.as_deref(), Some("t1"));
        assert!(body.validate().is_ok());
    }

    #[test]
    fn test_missing_grant_type_rejected() {
        let body: LoginBody = parse_body(r#"{"clientId":"c1"}"#).unwrap();
        assert!(matches!(body.validate(), Err(AuthError::InvalidRequest(_))));
    }

    #[test]
    fn test_malformed_json_rejected() {
        assert!(matches!(
            parse_body::<LoginBody>("{not json"),
            Err(AuthError::InvalidRequest(_))
        ));
    }

    #[test]
    fn test_password_length_bounds() {
        let body: PasswordLoginBody =
            parse_body(r#"{"username":"alice","password":"abc"}"#).unwrap();
        assert!(body.validate().is_err());

        let body: PasswordLoginBody =
            parse_body(r#"{"username":"alice","password":"admin123"}"#).unwrap();
        assert!(body.validate().is_ok());
    }
}
