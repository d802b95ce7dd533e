//! Typed form state
//!
//! Holds one value per schema field, validates it against the field
//! descriptors and turns it into the ordered multipart parts sent on submit.

use crate::attachment::{Attachment, AttachmentSlot};
use crate::error::{Error, Result};
use crate::fields::{FieldSpec, FormSchema};
use serde::Serialize;

/// A validation failure tied to one field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    fn new(field: &str, message: String) -> Self {
        Self {
            field: field.to_string(),
            message,
        }
    }
}

/// Current value of one field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    Files(AttachmentSlot),
}

/// Value of one multipart part
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PartValue {
    Text(String),
    File(Attachment),
}

/// One named part of the submission payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PayloadPart {
    pub name: String,
    pub value: PartValue,
}

/// Values for every field of a schema, in schema order
#[derive(Debug, Clone)]
pub struct FormState {
    schema: FormSchema,
    values: Vec<FieldValue>,
}

impl FormState {
    /// Create a form with every field empty
    pub fn new(schema: FormSchema) -> Self {
        let values = schema.fields().iter().map(initial_value).collect();
        Self { schema, values }
    }

    pub fn schema(&self) -> &FormSchema {
        &self.schema
    }

    /// Current value of a text or choice field
    pub fn text(&self, name: &str) -> Result<&str> {
        match self.value(name)? {
            FieldValue::Text(value) => Ok(value),
            FieldValue::Files(_) => Err(wrong_kind(name, "text")),
        }
    }

    /// Set a text or choice field
    pub fn set_text(&mut self, name: &str, value: impl Into<String>) -> Result<()> {
        match self.value_mut(name)? {
            FieldValue::Text(current) => {
                *current = value.into();
                Ok(())
            }
            FieldValue::Files(_) => Err(wrong_kind(name, "text")),
        }
    }

    /// Pick an option of a choice field
    ///
    /// Picking the option that is already selected clears the field.
    pub fn choose(&mut self, name: &str, value: &str) -> Result<()> {
        if !matches!(self.spec(name)?, FieldSpec::Choice(_)) {
            return Err(wrong_kind(name, "choice"));
        }

        let current = self.text(name)?;
        let next = if current == value { "" } else { value };
        let next = next.to_string();
        self.set_text(name, next)
    }

    pub fn slot(&self, name: &str) -> Result<&AttachmentSlot> {
        match self.value(name)? {
            FieldValue::Files(slot) => Ok(slot),
            FieldValue::Text(_) => Err(wrong_kind(name, "file")),
        }
    }

    /// Apply a file selection to a slot
    ///
    /// Files whose type the field does not accept are refused and the slot
    /// is left unchanged. A single-file slot only checks the file it keeps.
    pub fn select_files(&mut self, name: &str, files: Vec<Attachment>) -> Result<()> {
        let FieldSpec::File(descriptor) = self.spec(name)? else {
            return Err(wrong_kind(name, "file"));
        };

        let kept = if descriptor.multiple { files.len() } else { 1 };
        if let Some(rejected) = files
            .iter()
            .take(kept)
            .find(|f| !descriptor.accepts(&f.name))
        {
            return Err(Error::UnacceptedFileType {
                field: name.to_string(),
                file: rejected.name.clone(),
                accepted: descriptor.accepted_types.clone(),
            });
        }

        self.slot_mut(name)?.select(files);
        Ok(())
    }

    /// Remove one file from a slot; out-of-range indices are ignored
    pub fn remove_file(&mut self, name: &str, index: usize) -> Result<Option<Attachment>> {
        Ok(self.slot_mut(name)?.remove(index))
    }

    pub fn clear_files(&mut self, name: &str) -> Result<()> {
        self.slot_mut(name)?.clear();
        Ok(())
    }

    /// Check every field, collecting at most one error per field
    pub fn errors(&self) -> Vec<FieldError> {
        self.schema
            .fields()
            .iter()
            .zip(&self.values)
            .filter_map(|(spec, value)| check_field(spec, value))
            .collect()
    }

    pub fn validate(&self) -> Result<()> {
        let errors = self.errors();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(Error::Validation(errors))
        }
    }

    /// Build the multipart parts for the current values
    ///
    /// Required text fields are always sent; optional ones only when filled
    /// in. A populated slot sends its first file; empty slots are left out.
    pub fn payload(&self) -> Vec<PayloadPart> {
        self.schema
            .fields()
            .iter()
            .zip(&self.values)
            .filter_map(|(spec, value)| {
                let part = match value {
                    FieldValue::Text(text) if spec.required() || !text.is_empty() => {
                        PartValue::Text(text.clone())
                    }
                    FieldValue::Text(_) => return None,
                    FieldValue::Files(slot) => PartValue::File(slot.first()?.clone()),
                };
                Some(PayloadPart {
                    name: spec.name().to_string(),
                    value: part,
                })
            })
            .collect()
    }

    /// Return every field to its empty state
    pub fn reset(&mut self) {
        self.values = self.schema.fields().iter().map(initial_value).collect();
    }

    /// Whether every field is empty
    pub fn is_pristine(&self) -> bool {
        self.values.iter().all(|v| match v {
            FieldValue::Text(text) => text.is_empty(),
            FieldValue::Files(slot) => slot.is_empty(),
        })
    }

    fn position(&self, name: &str) -> Result<usize> {
        self.schema
            .fields()
            .iter()
            .position(|f| f.name() == name)
            .ok_or_else(|| Error::UnknownField(name.to_string()))
    }

    fn spec(&self, name: &str) -> Result<&FieldSpec> {
        let idx = self.position(name)?;
        Ok(&self.schema.fields()[idx])
    }

    fn value(&self, name: &str) -> Result<&FieldValue> {
        let idx = self.position(name)?;
        Ok(&self.values[idx])
    }

    fn value_mut(&mut self, name: &str) -> Result<&mut FieldValue> {
        let idx = self.position(name)?;
        Ok(&mut self.values[idx])
    }

    fn slot_mut(&mut self, name: &str) -> Result<&mut AttachmentSlot> {
        match self.value_mut(name)? {
            FieldValue::Files(slot) => Ok(slot),
            FieldValue::Text(_) => Err(wrong_kind(name, "file")),
        }
    }
}

fn initial_value(spec: &FieldSpec) -> FieldValue {
    match spec {
        FieldSpec::Text(_) | FieldSpec::Choice(_) => FieldValue::Text(String::new()),
        FieldSpec::File(f) => FieldValue::Files(AttachmentSlot::empty(f.multiple)),
    }
}

fn wrong_kind(name: &str, expected: &'static str) -> Error {
    Error::WrongFieldKind {
        name: name.to_string(),
        expected,
    }
}

fn check_field(spec: &FieldSpec, value: &FieldValue) -> Option<FieldError> {
    match (spec, value) {
        (FieldSpec::Text(f), FieldValue::Text(text)) => (f.required && text.is_empty())
            .then(|| FieldError::new(&f.name, format!("{} is required", f.label))),

        (FieldSpec::Choice(f), FieldValue::Text(text)) => {
            if text.is_empty() {
                return f
                    .required
                    .then(|| FieldError::new(&f.name, format!("{} is required", f.label)));
            }
            if f.contains(text) {
                return None;
            }
            let allowed: Vec<&str> = f.options.iter().map(|o| o.value.as_str()).collect();
            Some(FieldError::new(
                &f.name,
                format!("{} must be one of: {}", f.label, allowed.join(", ")),
            ))
        }

        (FieldSpec::File(f), FieldValue::Files(slot)) => {
            if f.required && slot.is_empty() {
                return Some(FieldError::new(&f.name, f.required_message()));
            }
            slot.files()
                .iter()
                .any(|file| file.size_bytes > f.max_size_bytes)
                .then(|| FieldError::new(&f.name, f.size_message()))
        }

        // values are built from the schema, so kinds always line up
        _ => None,
    }
}
