//! Form decoding and the per-endpoint form structs.

use axum::{
    body::Bytes,
    extract::{FromRequest, Request},
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;

use snippetbox_core::validator::{
    matches, max_chars, min_chars, not_blank, permitted_value, EMAIL_RX,
};
use snippetbox_core::Validator;
use snippetbox_shared::constants::{
    DEFAULT_EXPIRY_DAYS, MAX_TITLE_CHARS, MIN_PASSWORD_CHARS, PERMITTED_EXPIRY_DAYS,
};

use crate::error::WebError;

pub const BLANK: &str = "This field cannot be blank";
pub const INVALID_EMAIL: &str = "This field must be a valid email address";
pub const DUPLICATE_EMAIL: &str = "Email address is already in use";
pub const BAD_CREDENTIALS: &str = "Email or password is incorrect";
pub const BAD_CURRENT_PASSWORD: &str = "Current password is incorrect";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum FormError {
    /// The client sent something that does not fit the form.
    #[error("Form decode error: {0}")]
    Decode(String),

    /// The destination type cannot be decoded into at all.
    #[error("Invalid form destination: {0}")]
    Programmer(String),
}

fn classify(err: serde_urlencoded::de::Error) -> FormError {
    let message = err.to_string();
    // serde_urlencoded always drives a map visitor; only a non-map destination rejects it.
    if message.starts_with("invalid type: map") {
        FormError::Programmer(message)
    } else {
        FormError::Decode(message)
    }
}

/// Decode an urlencoded body into `T`.
///
/// # Panics
///
/// Panics when `T` is not a struct or map. That is a bug in the calling handler.
pub fn decode_post_form<T: DeserializeOwned>(body: &[u8]) -> Result<T, FormError> {
    match serde_urlencoded::from_bytes::<T>(body).map_err(classify) {
        Err(FormError::Programmer(message)) => panic!("{}", message),
        other => other,
    }
}

/// Extractor for a decoded POST form. Decode failures become 400.
#[derive(Debug)]
pub struct PostForm<T>(pub T);

impl<S, T> FromRequest<S> for PostForm<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = WebError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let body = Bytes::from_request(req, state)
            .await
            .map_err(|e| WebError::BadRequest(e.to_string()))?;

        decode_post_form(&body)
            .map(PostForm)
            .map_err(|e| WebError::BadRequest(e.to_string()))
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct SnippetCreateForm {
    pub title: String,
    pub content: String,
    pub expires: i32,
    #[serde(skip_deserializing)]
    pub validator: Validator,
}

impl SnippetCreateForm {
    /// The form as first shown: empty, expiring in a year.
    pub fn blank() -> Self {
        Self {
            expires: DEFAULT_EXPIRY_DAYS,
            ..Self::default()
        }
    }

    pub fn validate(&mut self) -> bool {
        let v = &mut self.validator;
        v.check_field(not_blank(&self.title), "title", BLANK);
        v.check_field(
            max_chars(&self.title, MAX_TITLE_CHARS),
            "title",
            "This field cannot be more than 100 characters long",
        );
        v.check_field(not_blank(&self.content), "content", BLANK);
        v.check_field(
            permitted_value(self.expires, &PERMITTED_EXPIRY_DAYS),
            "expires",
            "This field must equal 1, 7 or 365",
        );
        v.valid()
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct UserSignupForm {
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password: String,
    #[serde(skip_deserializing)]
    pub validator: Validator,
}

impl UserSignupForm {
    pub fn validate(&mut self) -> bool {
        let v = &mut self.validator;
        v.check_field(not_blank(&self.name), "name", BLANK);
        v.check_field(not_blank(&self.email), "email", BLANK);
        v.check_field(matches(&self.email, &EMAIL_RX), "email", INVALID_EMAIL);
        v.check_field(not_blank(&self.password), "password", BLANK);
        v.check_field(
            min_chars(&self.password, MIN_PASSWORD_CHARS),
            "password",
            "This field must be at least 8 characters long",
        );
        v.valid()
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct UserLoginForm {
    pub email: String,
    #[serde(skip_serializing)]
    pub password: String,
    #[serde(skip_deserializing)]
    pub validator: Validator,
}

impl UserLoginForm {
    pub fn validate(&mut self) -> bool {
        let v = &mut self.validator;
        v.check_field(not_blank(&self.email), "email", BLANK);
        v.check_field(matches(&self.email, &EMAIL_RX), "email", INVALID_EMAIL);
        v.check_field(not_blank(&self.password), "password", BLANK);
        v.valid()
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct AccountPasswordUpdateForm {
    #[serde(skip_serializing)]
    pub current_password: String,
    #[serde(skip_serializing)]
    pub new_password: String,
    #[serde(skip_serializing)]
    pub new_password_confirmation: String,
    #[serde(skip_deserializing)]
    pub validator: Validator,
}

impl AccountPasswordUpdateForm {
    pub fn validate(&mut self) -> bool {
        let v = &mut self.validator;
        v.check_field(not_blank(&self.current_password), "current_password", BLANK);
        v.check_field(not_blank(&self.new_password), "new_password", BLANK);
        v.check_field(
            min_chars(&self.new_password, MIN_PASSWORD_CHARS),
            "new_password",
            "This field must be at least 8 characters long",
        );
        v.check_field(
            not_blank(&self.new_password_confirmation),
            "new_password_confirmation",
            BLANK,
        );
        v.check_field(
            self.new_password == self.new_password_confirmation,
            "new_password_confirmation",
            "Passwords do not match",
        );
        v.valid()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_snippet_form() {
        let form: SnippetCreateForm =
            decode_post_form(b"title=O+snail&content=Climb+Mount+Fuji&expires=7&csrf_token=x")
                .unwrap();
        assert_eq!(form.title, "O snail");
        assert_eq!(form.content, "Climb Mount Fuji");
        assert_eq!(form.expires, 7);
        assert!(form.validator.valid());
    }

    #[test]
    fn test_decode_rejects_non_integer_expires() {
        let err = decode_post_form::<SnippetCreateForm>(b"title=a&content=b&expires=abc")
            .unwrap_err();
        assert!(matches!(err, FormError::Decode(_)));
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let form: UserLoginForm = decode_post_form(b"email=alice%40example.com").unwrap();
        assert_eq!(form.email, "alice@example.com");
        assert_eq!(form.password, "");
    }

    #[test]
    #[should_panic(expected = "invalid type: map")]
    fn test_non_struct_destination_panics() {
        let _ = decode_post_form::<u32>(b"a=1");
    }

    #[test]
    fn test_snippet_validation() {
        let mut form = SnippetCreateForm {
            title: "x".repeat(101),
            content: "   ".to_string(),
            expires: 3,
            ..SnippetCreateForm::default()
        };
        assert!(!form.validate());
        assert_eq!(
            form.validator.field_error("title"),
            Some(&["This field cannot be more than 100 characters long".to_string()][..])
        );
        assert_eq!(form.validator.field_error("content"), Some(&[BLANK.to_string()][..]));
        assert!(form.validator.field_error("expires").is_some());

        let mut ok = SnippetCreateForm {
            title: "ü".repeat(100),
            content: "body".to_string(),
            ..SnippetCreateForm::blank()
        };
        assert!(ok.validate());
    }

    #[test]
    fn test_signup_validation() {
        let tests = [
            ("Bob", "bob@example.com", "validPa$$word", true),
            ("", "bob@example.com", "validPa$$word", false),
            ("Bob", "bob@example.", "validPa$$word", false),
            ("Bob", "bob@example.com", "pa$$", false),
        ];

        for (name, email, password, want) in tests {
            let mut form = UserSignupForm {
                name: name.to_string(),
                email: email.to_string(),
                password: password.to_string(),
                ..UserSignupForm::default()
            };
            assert_eq!(form.validate(), want, "{name} / {email} / {password}");
        }
    }

    #[test]
    fn test_password_update_confirmation() {
        let mut form = AccountPasswordUpdateForm {
            current_password: "pa$$word".to_string(),
            new_password: "newPa$$word".to_string(),
            new_password_confirmation: "otherPa$$word".to_string(),
            ..AccountPasswordUpdateForm::default()
        };
        assert!(!form.validate());
        assert_eq!(
            form.validator.field_error("new_password_confirmation"),
            Some(&["Passwords do not match".to_string()][..])
        );
    }

    #[test]
    fn test_passwords_are_not_serialized() {
        let form = UserSignupForm {
            name: "Bob".to_string(),
            email: "bob@example.com".to_string(),
            password: "secret-password".to_string(),
            ..UserSignupForm::default()
        };
        let json = serde_json::to_string(&form).unwrap();
        assert!(!json.contains("secret-password"));
        assert!(json.contains("bob@example.com"));
    }
}
