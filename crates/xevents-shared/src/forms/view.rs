use serde_json::Value;

use super::schema::{Choice, FieldKind, FieldSpec, FormSchema, Widget};
use super::validate::{FieldErrors, FormInput};

/// Widgets for every field of a form as a template would draw them
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct FormView {
    pub form: &'static str,
    pub multipart: bool,
    pub fields: Vec<FieldView>,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct FieldView {
    pub name: &'static str,
    pub label: &'static str,
    pub widget: Widget,
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
    #[serde(skip_serializing_if = "<[_]>::is_empty")]
    pub choices: &'static [Choice],
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl FieldView {
    fn new(spec: &FieldSpec, value: String, error: Option<String>) -> Self {
        // Neither passwords nor file contents are sent back to the browser
        let value = match spec.kind {
            FieldKind::Password | FieldKind::Image => String::new(),
            _ => value,
        };
        Self {
            name: spec.name,
            label: spec.label,
            widget: spec.kind.widget(),
            required: spec.required,
            max_length: spec.kind.max_length(),
            choices: spec.kind.choices(),
            value,
            error,
        }
    }
}

impl FormView {
    fn build(schema: &FormSchema, mut field: impl FnMut(&FieldSpec) -> FieldView) -> Self {
        Self {
            form: schema.name,
            multipart: schema.is_multipart(),
            fields: schema.fields.iter().map(&mut field).collect(),
        }
    }

    /// An empty form as shown before anything was entered
    pub fn blank(schema: &FormSchema) -> Self {
        Self::build(schema, |spec| FieldView::new(spec, String::new(), None))
    }

    /// Echoes back what was submitted along with any errors found
    pub fn bound(schema: &FormSchema, input: &FormInput, errors: Option<&FieldErrors>) -> Self {
        Self::build(schema, |spec| {
            let value = input.get(spec.name).unwrap_or_default().to_string();
            let error = errors.and_then(|e| e.get(spec.name)).map(str::to_string);
            FieldView::new(spec, value, error)
        })
    }

    /// Pre-fills the form from an item as returned by the backend
    pub fn from_initial(schema: &FormSchema, item: &Value) -> Self {
        Self::build(schema, |spec| {
            let value = match item.get(spec.name) {
                Some(Value::String(s)) => s.clone(),
                Some(Value::Null) | None => String::new(),
                Some(other) => other.to_string(),
            };
            FieldView::new(spec, value, None)
        })
    }

    pub fn field(&self, name: &str) -> Option<&FieldView> {
        self.fields.iter().find(|f| f.name == name)
    }
}
