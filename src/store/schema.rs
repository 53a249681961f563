//! Shape definitions for the three document collections.
//!
//! A document store validates every new record against its collection's
//! schema before writing it. Timestamps, the record `id` and the `id` of
//! array rows are assigned by the store and are not part of the schema.

use serde_json::Value;

use crate::types::errors::DocumentStoreError;

/// The document collections the store client talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Bookmarks,
    Folders,
    Tags,
}

impl Collection {
    pub fn slug(&self) -> &'static str {
        self.schema().slug
    }

    pub fn schema(&self) -> &'static CollectionSchema {
        match self {
            Collection::Bookmarks => &BOOKMARKS,
            Collection::Folders => &FOLDERS,
            Collection::Tags => &TAGS,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Single-line text.
    Text,
    /// Multi-line text.
    Textarea,
    /// Ordered rows, each an object with the given fields.
    Array(&'static [FieldSpec]),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
    pub required: bool,
}

impl FieldSpec {
    const fn text(name: &'static str, required: bool) -> Self {
        Self { name, kind: FieldKind::Text, required }
    }

    const fn textarea(name: &'static str, required: bool) -> Self {
        Self { name, kind: FieldKind::Textarea, required }
    }

    const fn array(name: &'static str, rows: &'static [FieldSpec], required: bool) -> Self {
        Self { name, kind: FieldKind::Array(rows), required }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub struct CollectionSchema {
    pub slug: &'static str,
    pub fields: &'static [FieldSpec],
}

const TAG_ROW_FIELDS: &[FieldSpec] = &[FieldSpec::text("tag", true)];

pub static BOOKMARKS: CollectionSchema = CollectionSchema {
    slug: "bookmarks",
    fields: &[
        FieldSpec::text("title", true),
        FieldSpec::text("url", true),
        FieldSpec::textarea("description", false),
        FieldSpec::text("folder", false),
        FieldSpec::array("tags", TAG_ROW_FIELDS, false),
        FieldSpec::text("userId", true),
    ],
};

pub static FOLDERS: CollectionSchema = CollectionSchema {
    slug: "folders",
    fields: &[FieldSpec::text("name", true), FieldSpec::text("userId", true)],
};

pub static TAGS: CollectionSchema = CollectionSchema {
    slug: "tags",
    fields: &[FieldSpec::text("name", true), FieldSpec::text("userId", true)],
};

impl CollectionSchema {
    /// Checks a new record's data against this schema.
    ///
    /// Required text must be a non-empty string; optional fields may be
    /// absent or `null`; fields not in the schema are rejected.
    pub fn validate(&self, data: &Value) -> Result<(), DocumentStoreError> {
        validate_object(self.slug, self.fields, data, "", false)
    }
}

fn validate_object(
    collection: &str,
    fields: &[FieldSpec],
    data: &Value,
    path: &str,
    allow_row_id: bool,
) -> Result<(), DocumentStoreError> {
    let invalid = |message: String| DocumentStoreError::Validation {
        collection: collection.to_string(),
        message,
    };

    let map = data
        .as_object()
        .ok_or_else(|| invalid(format!("{}expected an object", path)))?;

    for key in map.keys() {
        let known = fields.iter().any(|f| f.name == key) || (allow_row_id && key == "id");
        if !known {
            return Err(invalid(format!("unknown field '{}{}'", path, key)));
        }
    }

    for spec in fields {
        let field_path = format!("{}{}", path, spec.name);
        let value = match map.get(spec.name) {
            None | Some(Value::Null) => {
                if spec.required {
                    return Err(invalid(format!("field '{}' is required", field_path)));
                }
                continue;
            }
            Some(v) => v,
        };

        match spec.kind {
            FieldKind::Text | FieldKind::Textarea => {
                let text = value
                    .as_str()
                    .ok_or_else(|| invalid(format!("field '{}' must be text", field_path)))?;
                if spec.required && text.is_empty() {
                    return Err(invalid(format!("field '{}' is required", field_path)));
                }
            }
            FieldKind::Array(rows) => {
                let items = value
                    .as_array()
                    .ok_or_else(|| invalid(format!("field '{}' must be an array", field_path)))?;
                for (i, item) in items.iter().enumerate() {
                    let row_path = format!("{}[{}].", field_path, i);
                    validate_object(collection, rows, item, &row_path, true)?;
                }
            }
        }
    }

    Ok(())
}
