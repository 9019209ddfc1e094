//! Declarative form definitions for each resource and the single validator
//! that interprets them
//!
//! A [`FormSchema`] lists the fields of a form. [`validate`] checks raw
//! submitted values against it and produces [`CleanedData`] which is then
//! converted into the typed record for the resource (see [`FormRecord`]).
//! [`FormView`] describes the same schema as widgets for templates.

mod image;
mod records;
mod schema;
mod validate;
mod view;

pub use image::ImageFormat;
pub use records::{
    clean, CategoryForm, FormError, FormRecord, InventoryForm, LoginForm, PlaceForm, UserForm,
};
pub use schema::{
    schemas, Choice, Coerce, FieldKind, FieldSpec, FormSchema, Widget, CATEGORY_CHOICES,
    IS_AVAILABLE_CHOICES, MAINTENANCE_CHOICES, ROLE_CHOICES,
};
pub use validate::{
    is_valid_email, validate, CleanedData, FieldErrors, FormInput, UploadedFile,
    IMAGE_EXTENSIONS,
};
pub use view::{FieldView, FormView};
