use secrecy::SecretString;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};

use super::schema::{schemas, FormSchema};
use super::validate::{validate, CleanedData, FieldErrors, FormInput, UploadedFile};

#[derive(thiserror::Error, Debug)]
pub enum FormError {
    #[error("submitted form is invalid: {0}")]
    Invalid(FieldErrors),
    #[error("cleaned data did not match the record")]
    Record(#[from] serde_json::Error),
}

impl FormError {
    /// Returns the field errors if this is [`FormError::Invalid`]
    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            FormError::Invalid(errors) => Some(errors),
            FormError::Record(_) => None,
        }
    }
}

/// A typed record built from the cleaned data of its schema
pub trait FormRecord: Sized + DeserializeOwned {
    const SCHEMA: &'static FormSchema;

    /// Field names are those of the schema so the default relies on serde
    fn from_cleaned(cleaned: CleanedData, _input: &FormInput) -> Result<Self, serde_json::Error> {
        serde_json::from_value(Value::Object(cleaned))
    }
}

/// Validates `input` against the record's schema and builds the record
pub fn clean<R: FormRecord>(input: &FormInput) -> Result<R, FormError> {
    let cleaned = validate(R::SCHEMA, input).map_err(FormError::Invalid)?;
    Ok(R::from_cleaned(cleaned, input)?)
}

#[derive(Debug, serde::Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: SecretString,
}

impl FormRecord for LoginForm {
    const SCHEMA: &'static FormSchema = &schemas::LOGIN;
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserForm {
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub category_id: i64,
}

impl FormRecord for UserForm {
    const SCHEMA: &'static FormSchema = &schemas::USER;
}

impl UserForm {
    /// The form calls the role `categoryId` but the key the backend expects is
    /// configurable so it is supplied by the caller
    pub fn to_payload(&self, role_field: &str) -> Value {
        let mut result = json!({
            "username": self.username,
            "email": self.email,
            "firstName": self.first_name,
            "lastName": self.last_name,
        });
        result[role_field] = Value::from(self.category_id);
        result
    }
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryForm {
    pub name: String,
    pub description: String,
    pub stock_quantity: i64,
    pub maintenance_status: String,
    pub is_available: bool,
    pub category_id: i64,
}

impl FormRecord for InventoryForm {
    const SCHEMA: &'static FormSchema = &schemas::INVENTORY;
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CategoryForm {
    pub category: String,
}

impl FormRecord for CategoryForm {
    const SCHEMA: &'static FormSchema = &schemas::CATEGORY;
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceForm {
    pub place_name: String,
    pub description: String,
    pub about: String,
    pub location: String,
    #[serde(skip)]
    pub image: Option<UploadedFile>,
}

impl FormRecord for PlaceForm {
    const SCHEMA: &'static FormSchema = &schemas::PLACE;

    fn from_cleaned(cleaned: CleanedData, input: &FormInput) -> Result<Self, serde_json::Error> {
        let mut result: Self = serde_json::from_value(Value::Object(cleaned))?;
        result.image = input
            .file("image")
            .filter(|file| !file.bytes.is_empty())
            .cloned();
        Ok(result)
    }
}
