/// How the submitted value of a choice field is converted before being sent
/// to the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Coerce {
    Str,
    Int,
    Bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct Choice {
    pub value: &'static str,
    pub label: &'static str,
}

impl Choice {
    pub const fn new(value: &'static str, label: &'static str) -> Self {
        Self { value, label }
    }
}

pub const ROLE_CHOICES: &[Choice] = &[Choice::new("2", "User")];

pub const CATEGORY_CHOICES: &[Choice] = &[Choice::new("1", "Utilities")];

pub const IS_AVAILABLE_CHOICES: &[Choice] =
    &[Choice::new("true", "Yes"), Choice::new("false", "No")];

pub const MAINTENANCE_CHOICES: &[Choice] = &[
    Choice::new("good_condition", "Good Condition"),
    Choice::new("out_of_stock", "Out Of Stock"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text { max_length: Option<usize> },
    Password,
    Email,
    Integer,
    Textarea { max_length: Option<usize> },
    Choice {
        choices: &'static [Choice],
        coerce: Coerce,
    },
    Image,
}

/// The input widget a template should use for a field
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Widget {
    Text,
    Password,
    Email,
    Number,
    Textarea,
    Select,
    File,
}

impl FieldKind {
    pub fn widget(&self) -> Widget {
        match self {
            FieldKind::Text { .. } => Widget::Text,
            FieldKind::Password => Widget::Password,
            FieldKind::Email => Widget::Email,
            FieldKind::Integer => Widget::Number,
            FieldKind::Textarea { .. } => Widget::Textarea,
            FieldKind::Choice { .. } => Widget::Select,
            FieldKind::Image => Widget::File,
        }
    }

    pub fn max_length(&self) -> Option<usize> {
        match self {
            FieldKind::Text { max_length } | FieldKind::Textarea { max_length } => *max_length,
            _ => None,
        }
    }

    pub fn choices(&self) -> &'static [Choice] {
        match self {
            FieldKind::Choice { choices, .. } => choices,
            _ => &[],
        }
    }

    pub fn is_file(&self) -> bool {
        matches!(self, FieldKind::Image)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub required: bool,
}

impl FieldSpec {
    pub const fn required(name: &'static str, label: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            label,
            kind,
            required: true,
        }
    }

    pub const fn optional(name: &'static str, label: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            label,
            kind,
            required: false,
        }
    }
}

#[derive(Debug)]
pub struct FormSchema {
    pub name: &'static str,
    pub fields: &'static [FieldSpec],
}

impl FormSchema {
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Forms with file fields need to be submitted as multipart
    pub fn is_multipart(&self) -> bool {
        self.fields.iter().any(|f| f.kind.is_file())
    }
}

const fn text(max_length: usize) -> FieldKind {
    FieldKind::Text {
        max_length: Some(max_length),
    }
}

const fn textarea(max_length: usize) -> FieldKind {
    FieldKind::Textarea {
        max_length: Some(max_length),
    }
}

pub mod schemas {
    use super::*;

    pub static LOGIN: FormSchema = FormSchema {
        name: "login",
        fields: &[
            FieldSpec::required("username", "Username", text(25)),
            FieldSpec::required("password", "Password", FieldKind::Password),
        ],
    };

    pub static USER: FormSchema = FormSchema {
        name: "user",
        fields: &[
            FieldSpec::required("username", "Username", text(25)),
            FieldSpec::required("email", "Email", FieldKind::Email),
            FieldSpec::required("firstName", "First Name", text(25)),
            FieldSpec::required("lastName", "Last Name", text(25)),
            FieldSpec::required(
                "categoryId",
                "Category",
                FieldKind::Choice {
                    choices: ROLE_CHOICES,
                    coerce: Coerce::Int,
                },
            ),
        ],
    };

    pub static INVENTORY: FormSchema = FormSchema {
        name: "inventory",
        fields: &[
            FieldSpec::required("name", "Name", text(25)),
            FieldSpec::optional("description", "Description", textarea(100)),
            FieldSpec::required("stockQuantity", "Stock Quantity", FieldKind::Integer),
            FieldSpec::required(
                "maintenanceStatus",
                "Maintenance Status",
                FieldKind::Choice {
                    choices: MAINTENANCE_CHOICES,
                    coerce: Coerce::Str,
                },
            ),
            FieldSpec::required(
                "isAvailable",
                "Is Available?",
                FieldKind::Choice {
                    choices: IS_AVAILABLE_CHOICES,
                    coerce: Coerce::Bool,
                },
            ),
            FieldSpec::required(
                "categoryId",
                "Category",
                FieldKind::Choice {
                    choices: CATEGORY_CHOICES,
                    coerce: Coerce::Int,
                },
            ),
        ],
    };

    pub static CATEGORY: FormSchema = FormSchema {
        name: "category",
        fields: &[FieldSpec::required("category", "Category Name", text(25))],
    };

    pub static PLACE: FormSchema = FormSchema {
        name: "place",
        fields: &[
            FieldSpec::required("placeName", "Name", text(50)),
            FieldSpec::optional("description", "Description", textarea(100)),
            FieldSpec::optional("about", "About", textarea(100)),
            FieldSpec::required("location", "Location", text(50)),
            FieldSpec::optional("image", "Image", FieldKind::Image),
        ],
    };
}
