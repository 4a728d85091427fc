//! Form payloads and their validation.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Loose RFC 5322-ish email check.
pub static EMAIL_RX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$",
    )
    .expect("email regex is valid")
});

/// Snippet lifetimes offered by the create form, in days.
pub const PERMITTED_EXPIRES: [i64; 3] = [1, 7, 365];

/// Collected validation failures for one form submission.
#[derive(Debug, Default, Clone, Serialize)]
pub struct Validator {
    pub field_errors: BTreeMap<String, String>,
    pub non_field_errors: Vec<String>,
}

impl Validator {
    pub fn valid(&self) -> bool {
        self.field_errors.is_empty() && self.non_field_errors.is_empty()
    }

    /// Record an error for `key`; the first message per field wins.
    pub fn add_field_error(&mut self, key: &str, message: &str) {
        self.field_errors
            .entry(key.to_string())
            .or_insert_with(|| message.to_string());
    }

    pub fn add_non_field_error(&mut self, message: &str) {
        self.non_field_errors.push(message.to_string());
    }

    pub fn check_field(&mut self, ok: bool, key: &str, message: &str) {
        if !ok {
            self.add_field_error(key, message);
        }
    }
}

pub fn not_blank(value: &str) -> bool {
    !value.trim().is_empty()
}

pub fn max_chars(value: &str, n: usize) -> bool {
    value.chars().count() <= n
}

pub fn min_chars(value: &str, n: usize) -> bool {
    value.chars().count() >= n
}

pub fn permitted_value<T: PartialEq>(value: &T, permitted: &[T]) -> bool {
    permitted.contains(value)
}

pub fn matches(value: &str, rx: &Regex) -> bool {
    rx.is_match(value)
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SnippetCreateForm {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default = "default_expires")]
    pub expires: i64,
    #[serde(skip_deserializing)]
    pub validator: Validator,
}

fn default_expires() -> i64 {
    365
}

impl Default for SnippetCreateForm {
    fn default() -> Self {
        Self {
            title: String::new(),
            content: String::new(),
            expires: default_expires(),
            validator: Validator::default(),
        }
    }
}

impl SnippetCreateForm {
    pub fn validate(&mut self) -> bool {
        let v = &mut self.validator;
        v.check_field(not_blank(&self.title), "title", "This field cannot be blank");
        v.check_field(
            max_chars(&self.title, 100),
            "title",
            "This field cannot be more than 100 characters long",
        );
        v.check_field(not_blank(&self.content), "content", "This field cannot be blank");
        v.check_field(
            permitted_value(&self.expires, &PERMITTED_EXPIRES),
            "expires",
            "This field must equal 1, 7 or 365",
        );
        v.valid()
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SignupForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default, skip_serializing)]
    pub password: String,
    #[serde(skip_deserializing)]
    pub validator: Validator,
}

impl SignupForm {
    pub fn validate(&mut self) -> bool {
        let v = &mut self.validator;
        v.check_field(not_blank(&self.name), "name", "This field cannot be blank");
        v.check_field(not_blank(&self.email), "email", "This field cannot be blank");
        v.check_field(
            matches(&self.email, &EMAIL_RX),
            "email",
            "This field must be a valid email address",
        );
        v.check_field(not_blank(&self.password), "password", "This field cannot be blank");
        v.check_field(
            min_chars(&self.password, 8),
            "password",
            "This field must be at least 8 characters long",
        );
        v.valid()
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct LoginForm {
    #[serde(default)]
    pub email: String,
    #[serde(default, skip_serializing)]
    pub password: String,
    #[serde(skip_deserializing)]
    pub validator: Validator,
}

impl LoginForm {
    pub fn validate(&mut self) -> bool {
        let v = &mut self.validator;
        v.check_field(not_blank(&self.email), "email", "This field cannot be blank");
        v.check_field(
            matches(&self.email, &EMAIL_RX),
            "email",
            "This field must be a valid email address",
        );
        v.check_field(not_blank(&self.password), "password", "This field cannot be blank");
        v.valid()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snippet_form_rules() {
        let mut form = SnippetCreateForm {
            title: "x".repeat(101),
            content: "   ".into(),
            expires: 30,
            ..SnippetCreateForm::default()
        };
        assert!(!form.validate());
        let errors = &form.validator.field_errors;
        assert_eq!(errors["title"], "This field cannot be more than 100 characters long");
        assert_eq!(errors["content"], "This field cannot be blank");
        assert_eq!(errors["expires"], "This field must equal 1, 7 or 365");

        let mut ok = SnippetCreateForm {
            title: "O snail".into(),
            content: "Climb Mount Fuji".into(),
            expires: 7,
            ..SnippetCreateForm::default()
        };
        assert!(ok.validate());
    }

    #[test]
    fn test_first_error_per_field_wins() {
        let mut form = SignupForm::default();
        assert!(!form.validate());
        assert_eq!(form.validator.field_errors["email"], "This field cannot be blank");
        assert_eq!(form.validator.field_errors["password"], "This field cannot be blank");
    }

    #[test]
    fn test_email_pattern() {
        assert!(matches("alice@example.com", &EMAIL_RX));
        assert!(!matches("alice@", &EMAIL_RX));
        assert!(!matches("not an email", &EMAIL_RX));
    }

    #[test]
    fn test_password_is_never_serialized() {
        let form = LoginForm {
            email: "a@b.co".into(),
            password: "hunter22".into(),
            ..LoginForm::default()
        };
        let value = tera::to_value(&form).unwrap();
        assert!(value.get("password").is_none());
        assert_eq!(value["email"], "a@b.co");
    }

    #[test]
    fn test_non_field_errors_invalidate() {
        let mut v = Validator::default();
        assert!(v.valid());
        v.add_non_field_error("Email or password is incorrect");
        assert!(!v.valid());
    }
}
