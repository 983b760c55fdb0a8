use serde::{Deserialize, Deserializer, Serialize};
use strum::{AsRefStr, Display, EnumString, VariantArray};
use validator::{Validate, ValidationError};

/// Input identifiers bound by the contact form.
#[derive(
    EnumString, Display, VariantArray, Clone, Copy, Debug, PartialEq, Eq, Hash, AsRefStr,
)]
#[strum(serialize_all = "snake_case")]
pub enum Field {
    Name,
    Email,
    Message,
}

/// One contact-form payload.
///
/// Every field must contain something other than whitespace. Nothing else is
/// checked, the email address included. Missing JSON keys and `null` values
/// decode as empty strings so that they are reported as validation failures.
#[derive(Validate, Serialize, Deserialize, Default, Clone, Debug, PartialEq, Eq)]
pub struct ContactSubmission {
    #[serde(default, deserialize_with = "null_as_empty")]
    #[validate(custom(function = "not_blank"))]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    #[validate(custom(function = "not_blank"))]
    pub email: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    #[validate(custom(function = "not_blank"))]
    pub message: String,
}

impl ContactSubmission {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            message: message.into(),
        }
    }

    pub fn field(&self, field: Field) -> &str {
        match field {
            Field::Name => &self.name,
            Field::Email => &self.email,
            Field::Message => &self.message,
        }
    }

    pub fn field_mut(&mut self, field: Field) -> &mut String {
        match field {
            Field::Name => &mut self.name,
            Field::Email => &mut self.email,
            Field::Message => &mut self.message,
        }
    }

    /// Fields that are empty once surrounding whitespace is ignored.
    pub fn blank_fields(&self) -> Vec<Field> {
        Field::VARIANTS
            .iter()
            .copied()
            .filter(|field| self.field(*field).trim().is_empty())
            .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.validate().is_ok()
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }

    Ok(())
}
