use std::fmt;
use std::str::FromStr;

/// Which input form is active. Exactly one is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum InputKind {
    #[default]
    Url,
    Text,
    Contact,
}

impl InputKind {
    pub const ALL: [InputKind; 3] = [InputKind::Url, InputKind::Text, InputKind::Contact];

    pub fn as_str(self) -> &'static str {
        match self {
            InputKind::Url => "url",
            InputKind::Text => "text",
            InputKind::Contact => "contact",
        }
    }

    /// Name of the saved image, `qr-code-<kind>.png`.
    pub fn download_filename(self) -> String {
        format!("qr-code-{}.png", self.as_str())
    }
}

impl fmt::Display for InputKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownInputKind(pub String);

impl fmt::Display for UnknownInputKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown input kind `{}` (expected url, text or contact)", self.0)
    }
}

impl std::error::Error for UnknownInputKind {}

impl FromStr for InputKind {
    type Err = UnknownInputKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        InputKind::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownInputKind(s.to_string()))
    }
}

/// Free-form contact fields. All are optional.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ContactRecord {
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub email: String,
    pub organization: String,
    pub url: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContactField {
    FirstName,
    LastName,
    Phone,
    Email,
    Organization,
    Url,
}

impl ContactRecord {
    pub fn set(&mut self, field: ContactField, value: String) {
        *self.field_mut(field) = value;
    }

    pub fn get(&self, field: ContactField) -> &str {
        match field {
            ContactField::FirstName => &self.first_name,
            ContactField::LastName => &self.last_name,
            ContactField::Phone => &self.phone,
            ContactField::Email => &self.email,
            ContactField::Organization => &self.organization,
            ContactField::Url => &self.url,
        }
    }

    fn field_mut(&mut self, field: ContactField) -> &mut String {
        match field {
            ContactField::FirstName => &mut self.first_name,
            ContactField::LastName => &mut self.last_name,
            ContactField::Phone => &mut self.phone,
            ContactField::Email => &mut self.email,
            ContactField::Organization => &mut self.organization,
            ContactField::Url => &mut self.url,
        }
    }

    /// True when at least one field that identifies a person is filled in.
    /// Organization and url alone do not qualify.
    pub fn identifies_someone(&self) -> bool {
        !(self.first_name.is_empty()
            && self.last_name.is_empty()
            && self.phone.is_empty()
            && self.email.is_empty())
    }
}
