//! User form model and its validation.
//!
//! Submissions are checked twice: first by the form rules, which give short
//! per-field messages, then by the same payload validation the JSON API uses.
//! Violations from either step end up inline next to the offending input.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::{Value, json};

use roster_core::{Email, FieldError, FromPayload, User};

/// Minimum number of digits in a phone number.
const MIN_PHONE_DIGITS: usize = 8;

/// The create / edit form as submitted by the browser.
///
/// Every field is kept as entered so a failed submission can be re-rendered
/// unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct UserForm {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub company: String,
    pub street: String,
    pub city: String,
    pub zipcode: String,
    pub lat: String,
    pub lng: String,
}

impl From<&User> for UserForm {
    fn from(user: &User) -> Self {
        Self {
            name: user.name.clone(),
            email: user.email.as_str().to_string(),
            phone: user.phone.clone(),
            company: user.company.clone(),
            street: user.address.street.clone(),
            city: user.address.city.clone(),
            zipcode: user.address.zipcode.clone(),
            lat: user.address.geo.lat.to_string(),
            lng: user.address.geo.lng.to_string(),
        }
    }
}

/// Inline errors keyed by dotted field path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormErrors {
    fields: BTreeMap<String, String>,
    general: Vec<String>,
}

impl FormErrors {
    /// Message for `path`, if that field has one.
    #[must_use]
    pub fn get(&self, path: &str) -> Option<&str> {
        self.fields.get(path).map(String::as_str)
    }

    /// Violations not tied to a single field.
    #[must_use]
    pub fn general(&self) -> &[String] {
        &self.general
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.general.is_empty()
    }

    /// Record `message` for `path`, keeping the first one seen.
    pub fn insert(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.fields.entry(path.into()).or_insert_with(|| message.into());
    }

    /// Set `message` for `path`, replacing any earlier one.
    fn set(&mut self, path: &str, message: &str) {
        self.fields.insert(path.to_string(), message.to_string());
    }
}

impl From<Vec<FieldError>> for FormErrors {
    fn from(violations: Vec<FieldError>) -> Self {
        let mut errors = Self::default();
        for violation in violations {
            match violation.field {
                Some(field) => errors.insert(field, violation.message),
                None => errors.general.push(violation.message),
            }
        }
        errors
    }
}

impl UserForm {
    /// Form-level checks: required fields, email shape, phone length and
    /// numeric coordinates.
    #[must_use]
    pub fn validate(&self) -> FormErrors {
        let mut errors = FormErrors::default();

        let required = [
            ("name", &self.name, "Name is required"),
            ("email", &self.email, "Email is required"),
            ("phone", &self.phone, "Phone is required"),
            ("company", &self.company, "Company is required"),
            ("address.street", &self.street, "Street is required"),
            ("address.city", &self.city, "City is required"),
            ("address.zipcode", &self.zipcode, "Zipcode is required"),
            ("address.geo.lat", &self.lat, "Latitude is required"),
            ("address.geo.lng", &self.lng, "Longitude is required"),
        ];
        for (path, value, message) in required {
            if value.trim().is_empty() {
                errors.set(path, message);
            }
        }

        if !self.email.trim().is_empty() && Email::parse(&self.email).is_err() {
            errors.set("email", "Email must be valid");
        }

        let digits = self.phone.chars().filter(char::is_ascii_digit).count();
        if !self.phone.is_empty() && digits < MIN_PHONE_DIGITS {
            errors.set("phone", "Phone must have at least 8 digits");
        }

        for (path, value, message) in [
            ("address.geo.lat", &self.lat, "Latitude must be a number"),
            ("address.geo.lng", &self.lng, "Longitude must be a number"),
        ] {
            if !value.trim().is_empty() && !is_finite_number(value) {
                errors.set(path, message);
            }
        }

        errors
    }

    /// The JSON payload this form submits.
    #[must_use]
    pub fn to_payload(&self) -> Value {
        json!({
            "name": self.name,
            "email": self.email,
            "phone": self.phone,
            "company": self.company,
            "address": {
                "street": self.street,
                "city": self.city,
                "zipcode": self.zipcode,
                "geo": { "lat": self.lat, "lng": self.lng },
            },
        })
    }

    /// Run both validation passes and build the request.
    #[must_use]
    pub fn submit<R: FromPayload>(&self) -> Submission<R> {
        let errors = self.validate();
        if !errors.is_empty() {
            return Submission::Invalid(errors);
        }
        match R::from_payload(&self.to_payload()) {
            Ok(request) => Submission::Valid(request),
            Err(violations) => Submission::Rejected(violations.into()),
        }
    }
}

/// Outcome of [`UserForm::submit`].
#[derive(Debug)]
pub enum Submission<R> {
    Valid(R),
    /// The form rules failed.
    Invalid(FormErrors),
    /// The form rules passed but payload validation did not.
    Rejected(FormErrors),
}

fn is_finite_number(value: &str) -> bool {
    value.trim().parse::<f64>().is_ok_and(f64::is_finite)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use roster_core::CreateUserRequest;

    use super::*;

    fn filled() -> UserForm {
        UserForm {
            name: "John Doe".to_string(),
            email: "john.doe@example.com".to_string(),
            phone: "+1 (555) 123-4567".to_string(),
            company: "TechCorp Inc.".to_string(),
            street: "123 Main Street".to_string(),
            city: "San Francisco".to_string(),
            zipcode: "94102".to_string(),
            lat: "37.7749".to_string(),
            lng: "-122.4194".to_string(),
        }
    }

    #[test]
    fn test_empty_form_reports_every_required_field() {
        let errors = UserForm::default().validate();
        assert_eq!(errors.get("name"), Some("Name is required"));
        assert_eq!(errors.get("address.zipcode"), Some("Zipcode is required"));
        assert_eq!(errors.get("address.geo.lng"), Some("Longitude is required"));
        assert!(errors.general().is_empty());
    }

    #[test]
    fn test_shape_rules() {
        let form = UserForm {
            email: "not-an-email".to_string(),
            phone: "555-12".to_string(),
            lat: "north".to_string(),
            lng: "inf".to_string(),
            ..filled()
        };
        let errors = form.validate();
        assert_eq!(errors.get("email"), Some("Email must be valid"));
        assert_eq!(errors.get("phone"), Some("Phone must have at least 8 digits"));
        assert_eq!(errors.get("address.geo.lat"), Some("Latitude must be a number"));
        assert_eq!(errors.get("address.geo.lng"), Some("Longitude must be a number"));
        assert_eq!(errors.get("name"), None);
    }

    #[test]
    fn test_submit_builds_request_with_numeric_geo() {
        let Submission::Valid(request) = filled().submit::<CreateUserRequest>() else {
            panic!("filled form should submit");
        };
        let user = request.into_inner();
        assert_eq!(user.name, "John Doe");
        assert!((user.address.geo.lat - 37.7749).abs() < f64::EPSILON);
    }

    #[test]
    fn test_invalid_form_never_reaches_payload_validation() {
        let outcome = UserForm::default().submit::<CreateUserRequest>();
        assert!(matches!(outcome, Submission::Invalid(errors) if errors.get("name").is_some()));
    }

    #[test]
    fn test_server_violations_map_to_fields() {
        let errors = FormErrors::from(vec![
            FieldError::new("email", "\"email\" must be a valid email"),
            FieldError::new("email", "second message is ignored"),
            FieldError::root("\"value\" must be of type object"),
        ]);
        assert_eq!(errors.get("email"), Some("\"email\" must be a valid email"));
        assert_eq!(errors.general(), ["\"value\" must be of type object"]);
    }

    #[test]
    fn test_round_trips_stored_user() {
        let Submission::Valid(request) = filled().submit::<CreateUserRequest>() else {
            panic!("filled form should submit");
        };
        let new_user = request.into_inner();
        let user = User {
            id: roster_core::UserId::new(1),
            name: new_user.name,
            email: new_user.email,
            phone: new_user.phone,
            company: new_user.company,
            address: new_user.address,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        };
        assert_eq!(UserForm::from(&user), filled());
    }
}
