//! Request payload validation.
//!
//! Payloads are checked against a full schema (create, replace) or a partial
//! schema (patch). Every violation is collected in one pass and reported as a
//! [`FieldError`] with the dotted path of the offending field. Unknown fields
//! are dropped at every level, text is trimmed and numeric strings are
//! accepted for coordinates.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::types::{Address, AddressPatch, Email, Geo, NewUser, UserPatch};

/// Label used for violations on the payload as a whole.
const ROOT_LABEL: &str = "value";

/// A single validation violation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    /// Dotted path of the field (`address.geo.lat`). `None` for violations on
    /// the payload as a whole.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    /// Human-readable description, quoting the field path.
    pub message: String,
}

impl FieldError {
    /// Create a violation tied to a field path.
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: Some(field.into()),
            message: message.into(),
        }
    }

    /// Create a violation not tied to any field.
    pub fn root(message: impl Into<String>) -> Self {
        Self {
            field: None,
            message: message.into(),
        }
    }
}

/// Types that can be built from an untyped JSON payload.
pub trait FromPayload: Sized {
    /// Validate `value` and convert it.
    ///
    /// # Errors
    ///
    /// Returns every violation found, in document order.
    fn from_payload(value: &Value) -> Result<Self, Vec<FieldError>>;
}

/// Validated body of `POST /api/users`.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateUserRequest {
    user: NewUser,
}

impl CreateUserRequest {
    #[must_use]
    pub fn into_inner(self) -> NewUser {
        self.user
    }
}

impl FromPayload for CreateUserRequest {
    fn from_payload(value: &Value) -> Result<Self, Vec<FieldError>> {
        full_user(value).map(|user| Self { user })
    }
}

/// Validated body of `PUT /api/users/{id}`.
#[derive(Debug, Clone, PartialEq)]
pub struct ReplaceUserRequest {
    user: NewUser,
}

impl ReplaceUserRequest {
    #[must_use]
    pub fn into_inner(self) -> NewUser {
        self.user
    }
}

impl FromPayload for ReplaceUserRequest {
    fn from_payload(value: &Value) -> Result<Self, Vec<FieldError>> {
        full_user(value).map(|user| Self { user })
    }
}

/// Validated body of `PATCH /api/users/{id}`.
#[derive(Debug, Clone, PartialEq)]
pub struct PatchUserRequest {
    patch: UserPatch,
}

impl PatchUserRequest {
    #[must_use]
    pub fn into_inner(self) -> UserPatch {
        self.patch
    }
}

impl FromPayload for PatchUserRequest {
    fn from_payload(value: &Value) -> Result<Self, Vec<FieldError>> {
        partial_user(value).map(|patch| Self { patch })
    }
}

fn full_user(value: &Value) -> Result<NewUser, Vec<FieldError>> {
    let mut check = Checker::default();
    let Some(body) = check.object(None, value) else {
        return Err(check.errors);
    };

    let name = check.required(body, None, "name", Checker::text);
    let email = check.required(body, None, "email", Checker::email);
    let phone = check.required(body, None, "phone", Checker::text);
    let company = check.required(body, None, "company", Checker::text);
    let address = check.required(body, None, "address", Checker::full_address);

    match (name, email, phone, company, address) {
        (Some(name), Some(email), Some(phone), Some(company), Some(address))
            if check.errors.is_empty() =>
        {
            Ok(NewUser {
                name,
                email,
                phone,
                company,
                address,
            })
        }
        _ => Err(check.errors),
    }
}

fn partial_user(value: &Value) -> Result<UserPatch, Vec<FieldError>> {
    let mut check = Checker::default();
    let Some(body) = check.object(None, value) else {
        return Err(check.errors);
    };

    let patch = UserPatch {
        name: check.optional(body, None, "name", Checker::text),
        email: check.optional(body, None, "email", Checker::email),
        phone: check.optional(body, None, "phone", Checker::text),
        company: check.optional(body, None, "company", Checker::text),
        address: check.optional(body, None, "address", Checker::partial_address),
    };

    let known = ["name", "email", "phone", "company", "address"];
    if !known.iter().any(|key| body.contains_key(*key)) {
        check.report(None, "must have at least 1 key");
    }

    if check.errors.is_empty() {
        Ok(patch)
    } else {
        Err(check.errors)
    }
}

/// Accumulates violations while walking a payload.
#[derive(Debug, Default)]
struct Checker {
    errors: Vec<FieldError>,
}

type Rule<T> = fn(&mut Checker, &str, &Value) -> Option<T>;

impl Checker {
    fn report(&mut self, path: Option<&str>, rule: &str) {
        let label = path.unwrap_or(ROOT_LABEL);
        let message = format!("\"{label}\" {rule}");
        self.errors.push(match path {
            Some(path) => FieldError::new(path, message),
            None => FieldError::root(message),
        });
    }

    /// Check a key that must be present.
    fn required<T>(
        &mut self,
        object: &Map<String, Value>,
        parent: Option<&str>,
        key: &str,
        rule: Rule<T>,
    ) -> Option<T> {
        let path = join(parent, key);
        match object.get(key) {
            Some(value) => rule(self, &path, value),
            None => {
                self.report(Some(&path), "is required");
                None
            }
        }
    }

    /// Check a key that may be absent. Returns `None` when absent or invalid.
    fn optional<T>(
        &mut self,
        object: &Map<String, Value>,
        parent: Option<&str>,
        key: &str,
        rule: Rule<T>,
    ) -> Option<T> {
        let path = join(parent, key);
        object.get(key).and_then(|value| rule(self, &path, value))
    }

    fn object<'v>(&mut self, path: Option<&str>, value: &'v Value) -> Option<&'v Map<String, Value>> {
        let object = value.as_object();
        if object.is_none() {
            self.report(path, "must be of type object");
        }
        object
    }

    fn text(&mut self, path: &str, value: &Value) -> Option<String> {
        let Some(text) = value.as_str() else {
            self.report(Some(path), "must be a string");
            return None;
        };
        let text = text.trim();
        if text.is_empty() {
            self.report(Some(path), "is not allowed to be empty");
            return None;
        }
        Some(text.to_owned())
    }

    fn email(&mut self, path: &str, value: &Value) -> Option<Email> {
        let text = self.text(path, value)?;
        let email = Email::parse(&text).ok();
        if email.is_none() {
            self.report(Some(path), "must be a valid email");
        }
        email
    }

    fn number(&mut self, path: &str, value: &Value) -> Option<f64> {
        let number = match value {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        }
        .filter(|n| n.is_finite());

        if number.is_none() {
            self.report(Some(path), "must be a number");
        }
        number
    }

    fn full_address(&mut self, path: &str, value: &Value) -> Option<Address> {
        let object = self.object(Some(path), value)?;

        let street = self.required(object, Some(path), "street", Self::text);
        let city = self.required(object, Some(path), "city", Self::text);
        let zipcode = self.required(object, Some(path), "zipcode", Self::text);
        let geo = self.required(object, Some(path), "geo", Self::full_geo);

        Some(Address {
            street: street?,
            city: city?,
            zipcode: zipcode?,
            geo: geo?,
        })
    }

    fn full_geo(&mut self, path: &str, value: &Value) -> Option<Geo> {
        let object = self.object(Some(path), value)?;

        let lat = self.required(object, Some(path), "lat", Self::number);
        let lng = self.required(object, Some(path), "lng", Self::number);

        Some(Geo {
            lat: lat?,
            lng: lng?,
        })
    }

    fn partial_address(&mut self, path: &str, value: &Value) -> Option<AddressPatch> {
        let object = self.object(Some(path), value)?;
        let before = self.errors.len();

        let patch = AddressPatch {
            street: self.optional(object, Some(path), "street", Self::text),
            city: self.optional(object, Some(path), "city", Self::text),
            zipcode: self.optional(object, Some(path), "zipcode", Self::text),
            geo: self.optional(object, Some(path), "geo", Self::partial_geo),
        };

        let known = ["street", "city", "zipcode", "geo"];
        if !known.iter().any(|key| object.contains_key(*key)) {
            self.report(Some(path), "must have at least 1 key");
        }

        (self.errors.len() == before).then_some(patch)
    }

    /// Geo in a patch: both coordinates or neither.
    fn partial_geo(&mut self, path: &str, value: &Value) -> Option<Geo> {
        let object = self.object(Some(path), value)?;

        let lat = self.optional(object, Some(path), "lat", Self::number);
        let lng = self.optional(object, Some(path), "lng", Self::number);

        match (object.contains_key("lat"), object.contains_key("lng")) {
            (true, false) => {
                self.report(Some(path), "contains [lat] without its required peers [lng]");
            }
            (false, true) => {
                self.report(Some(path), "contains [lng] without its required peers [lat]");
            }
            _ => {}
        }

        // An empty geo object is accepted and leaves stored coordinates alone.
        Some(Geo {
            lat: lat?,
            lng: lng?,
        })
    }
}

fn join(parent: Option<&str>, key: &str) -> String {
    parent.map_or_else(|| key.to_owned(), |parent| format!("{parent}.{key}"))
}
