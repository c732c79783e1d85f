use std::collections::BTreeMap;
use std::fmt;

use regex::Regex;

lazy_static! {
    static ref EMAIL: Regex =
        Regex::new(r"^\S+@\S+$").expect("email pattern is valid");
    static ref PHONE: Regex =
        Regex::new(r"^[0-9]{10}$").expect("phone pattern is valid");
}

const USER_ID_MIN: u32 = 1_000_000;
const USER_ID_MAX: u32 = 9_999_999;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    FirstName,
    LastName,
    Email,
    Phone,
    UserId,
}

impl Field {
    pub fn label(&self) -> &'static str {
        match self {
            Field::FirstName => "First Name",
            Field::LastName => "Last Name",
            Field::Email => "Email",
            Field::Phone => "Phone",
            Field::UserId => "Unique ID",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Per-field validation messages, ordered the way the form lays fields out.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<Field, &'static str>);

impl FieldErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, field: Field) -> Option<&'static str> {
        self.0.get(&field).copied()
    }

    pub fn clear(&mut self, field: Field) {
        self.0.remove(&field);
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &'static str)> + '_ {
        self.0.iter().map(|(field, message)| (*field, *message))
    }

    fn insert(&mut self, field: Field, message: &'static str) {
        self.0.insert(field, message);
    }
}

/// Registration form contents before submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityDraft {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    user_id: String,
}

impl IdentityDraft {
    /// Empty draft with a freshly generated identifier.
    pub fn new() -> Self {
        Self::with_user_id(generate_user_id())
    }

    pub fn with_user_id<S: Into<String>>(user_id: S) -> Self {
        Self {
            first_name: String::new(),
            last_name: String::new(),
            email: String::new(),
            phone: String::new(),
            user_id: user_id.into(),
        }
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// Updates one field. The identifier is read-only and left untouched.
    pub fn set<S: Into<String>>(&mut self, field: Field, value: S) {
        match field {
            Field::FirstName => self.first_name = value.into(),
            Field::LastName => self.last_name = value.into(),
            Field::Email => self.email = value.into(),
            Field::Phone => self.phone = value.into(),
            Field::UserId => {
                log::warn!("Ignoring edit of the read-only identifier")
            }
        }
    }

    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::FirstName => &self.first_name,
            Field::LastName => &self.last_name,
            Field::Email => &self.email,
            Field::Phone => &self.phone,
            Field::UserId => &self.user_id,
        }
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::default();
        if self.first_name.is_empty() {
            errors.insert(Field::FirstName, "First name is required");
        }
        if self.last_name.is_empty() {
            errors.insert(Field::LastName, "Last name is required");
        }
        if !is_valid_email(&self.email) {
            errors.insert(Field::Email, "Invalid email");
        }
        if !is_valid_phone(&self.phone) {
            errors.insert(Field::Phone, "Invalid phone number");
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

impl Default for IdentityDraft {
    fn default() -> Self {
        Self::new()
    }
}

/// Loose `local@domain` check; anything without whitespace on both sides
/// of an `@` passes.
pub fn is_valid_email(value: &str) -> bool {
    EMAIL.is_match(value)
}

pub fn is_valid_phone(value: &str) -> bool {
    PHONE.is_match(value)
}

pub fn generate_user_id() -> String {
    generate_user_id_with(&mut fastrand::Rng::new())
}

/// Seven random digits. Collisions are possible; the service has the final
/// word on uniqueness.
pub fn generate_user_id_with(rng: &mut fastrand::Rng) -> String {
    rng.u32(USER_ID_MIN..=USER_ID_MAX).to_string()
}
