use std::collections::BTreeMap;

use serde_json::Value;

use super::image::ImageFormat;
use super::schema::{Coerce, FieldKind, FieldSpec, FormSchema};

pub const IMAGE_EXTENSIONS: &[&str] = &["bmp", "gif", "jpeg", "jpg", "png", "webp"];

const MSG_REQUIRED: &str = "This field is required.";
const MSG_INVALID_EMAIL: &str = "Enter a valid email address.";
const MSG_INVALID_INTEGER: &str = "Enter a whole number.";
const MSG_INVALID_IMAGE: &str =
    "Upload a valid image. The file you uploaded was either not an image or a corrupted image.";

/// The coerced values of a valid submission keyed by field name. Files are not
/// included
pub type CleanedData = serde_json::Map<String, Value>;

#[derive(Clone)]
pub struct UploadedFile {
    pub filename: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl std::fmt::Debug for UploadedFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UploadedFile")
            .field("filename", &self.filename)
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

impl UploadedFile {
    fn has_image_extension(&self) -> bool {
        self.filename
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.as_str()))
    }
}

/// Raw values as submitted by the browser
#[derive(Debug, Default, Clone)]
pub struct FormInput {
    fields: BTreeMap<String, String>,
    files: BTreeMap<String, UploadedFile>,
}

impl FormInput {
    /// When a key is repeated the last value wins
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let fields = pairs
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self {
            fields,
            files: BTreeMap::new(),
        }
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(name.into(), value.into());
    }

    pub fn insert_file(&mut self, name: impl Into<String>, file: UploadedFile) {
        self.files.insert(name.into(), file);
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    pub fn file(&self, name: &str) -> Option<&UploadedFile> {
        self.files.get(name)
    }

    /// Used for flags like `confirm` where only the presence matters
    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name) || self.files.contains_key(name)
    }
}

/// Human readable error message per invalid field
#[derive(Debug, Default, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    pub fn insert(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.insert(field.into(), message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

impl std::fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let joined = self
            .0
            .iter()
            .map(|(field, msg)| format!("{field}: {msg}"))
            .collect::<Vec<_>>()
            .join("; ");
        write!(f, "{joined}")
    }
}

/// Checks `input` against every field of `schema`. All fields are checked so
/// that every problem can be reported at once
#[tracing::instrument(skip(input), fields(form = schema.name))]
pub fn validate(schema: &FormSchema, input: &FormInput) -> Result<CleanedData, FieldErrors> {
    let mut cleaned = CleanedData::new();
    let mut errors = FieldErrors::default();
    for spec in schema.fields {
        match clean_field(spec, input) {
            Ok(Some(value)) => {
                cleaned.insert(spec.name.to_string(), value);
            }
            Ok(None) => {}
            Err(msg) => errors.insert(spec.name, msg),
        }
    }
    if errors.is_empty() {
        Ok(cleaned)
    } else {
        tracing::debug!(invalid_fields = %errors, "form failed validation");
        Err(errors)
    }
}

/// `Ok(None)` means the field is optional, absent and should be left out
fn clean_field(spec: &FieldSpec, input: &FormInput) -> Result<Option<Value>, String> {
    if spec.kind.is_file() {
        return clean_file(spec, input.file(spec.name));
    }

    let raw = input.get(spec.name).map(str::trim).unwrap_or_default();
    if raw.is_empty() {
        return if spec.required {
            Err(MSG_REQUIRED.to_string())
        } else {
            Ok(Some(Value::String(String::new())))
        };
    }

    match spec.kind {
        FieldKind::Text { max_length } | FieldKind::Textarea { max_length } => {
            check_max_length(raw, max_length)?;
            Ok(Some(Value::String(raw.to_string())))
        }
        FieldKind::Password => Ok(Some(Value::String(raw.to_string()))),
        FieldKind::Email => {
            if is_valid_email(raw) {
                Ok(Some(Value::String(raw.to_string())))
            } else {
                Err(MSG_INVALID_EMAIL.to_string())
            }
        }
        FieldKind::Integer => without_zero_fraction(raw)
            .parse::<i64>()
            .map(|n| Some(Value::from(n)))
            .map_err(|_| MSG_INVALID_INTEGER.to_string()),
        FieldKind::Choice { choices, coerce } => {
            let Some(choice) = choices.iter().find(|c| {
                c.value == raw || (coerce == Coerce::Bool && c.value.eq_ignore_ascii_case(raw))
            }) else {
                return Err(format!(
                    "Select a valid choice. {raw} is not one of the available choices."
                ));
            };
            Ok(Some(coerce_choice(choice.value, coerce)))
        }
        // Checked by `clean_file`
        FieldKind::Image => Ok(None),
    }
}

/// `12.0` and `12.` are accepted as whole numbers
fn without_zero_fraction(raw: &str) -> &str {
    match raw.split_once('.') {
        Some((whole, fraction)) if fraction.trim_end().bytes().all(|b| b == b'0') => whole,
        _ => raw,
    }
}

fn clean_file(spec: &FieldSpec, file: Option<&UploadedFile>) -> Result<Option<Value>, String> {
    match file {
        None => {
            if spec.required {
                Err(MSG_REQUIRED.to_string())
            } else {
                Ok(None)
            }
        }
        Some(file) if file.filename.is_empty() && file.bytes.is_empty() && !spec.required => {
            // Browsers send an empty part when no file was selected
            Ok(None)
        }
        Some(file) => {
            if !file.has_image_extension() {
                return Err(MSG_INVALID_IMAGE.to_string());
            }
            match ImageFormat::sniff(&file.bytes) {
                Some(format) => {
                    tracing::debug!(%format, filename = %file.filename, "accepted image upload");
                    Ok(None)
                }
                None => Err(MSG_INVALID_IMAGE.to_string()),
            }
        }
    }
}

fn check_max_length(value: &str, max_length: Option<usize>) -> Result<(), String> {
    let Some(max) = max_length else {
        return Ok(());
    };
    let actual = value.chars().count();
    if actual > max {
        Err(format!(
            "Ensure this value has at most {max} characters (it has {actual})."
        ))
    } else {
        Ok(())
    }
}

/// Choice values are trusted to parse as they come from the schema
fn coerce_choice(value: &str, coerce: Coerce) -> Value {
    match coerce {
        Coerce::Str => Value::String(value.to_string()),
        Coerce::Int => value
            .parse::<i64>()
            .map(Value::from)
            .unwrap_or_else(|_| Value::String(value.to_string())),
        Coerce::Bool => Value::Bool(value.eq_ignore_ascii_case("true")),
    }
}

/// Intentionally permissive check that rejects the obviously malformed
pub fn is_valid_email(value: &str) -> bool {
    let Some((local, domain)) = value.rsplit_once('@') else {
        return false;
    };
    if local.is_empty() || local.len() > 64 || value.chars().any(char::is_whitespace) {
        return false;
    }
    if local.starts_with('.') || local.ends_with('.') || local.contains("..") {
        return false;
    }
    let local_ok = local
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || "!#$%&'*+/=?^_`{|}~-.".contains(c));
    if !local_ok {
        return false;
    }

    let labels: Vec<&str> = domain.split('.').collect();
    if labels.len() < 2 {
        return false;
    }
    let labels_ok = labels.iter().all(|label| {
        !label.is_empty()
            && label.len() <= 63
            && !label.starts_with('-')
            && !label.ends_with('-')
            && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
    });
    let tld_ok = labels
        .last()
        .is_some_and(|tld| tld.len() >= 2 && tld.chars().all(|c| c.is_ascii_alphabetic()));
    labels_ok && tld_ok
}
