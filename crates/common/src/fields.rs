//! Declarative form field descriptors
//!
//! A form is an ordered list of [`FieldSpec`] entries. Rendering, validation
//! and payload assembly all walk the same list, so adding a field to a form
//! is a one-line change to its schema function.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

const MIB: u64 = 1024 * 1024;

/// Default size limit for a single uploaded file (2 MiB)
pub const DEFAULT_MAX_FILE_SIZE: u64 = 2 * MIB;

/// A free-text input
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    /// Label shown next to the input
    pub label: String,

    /// Key into form state and the multipart payload
    pub name: String,

    /// Example value shown while the input is empty
    #[serde(default)]
    pub placeholder: String,

    /// Whether an empty value blocks submission
    #[serde(default = "default_required")]
    pub required: bool,
}

fn default_required() -> bool {
    true
}

fn default_max_size() -> u64 {
    DEFAULT_MAX_FILE_SIZE
}

impl FieldDescriptor {
    /// Create a required text field
    pub fn new(label: &str, name: &str, placeholder: &str) -> Self {
        Self {
            label: label.to_string(),
            name: name.to_string(),
            placeholder: placeholder.to_string(),
            required: true,
        }
    }

    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }
}

/// One selectable value of a [`ChoiceDescriptor`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceOption {
    pub value: String,
    pub label: String,
}

/// A pick-one input over a fixed option list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceDescriptor {
    pub label: String,
    pub name: String,
    pub options: Vec<ChoiceOption>,
    #[serde(default = "default_required")]
    pub required: bool,
}

impl ChoiceDescriptor {
    /// Create a required choice whose option labels equal their values
    pub fn new(label: &str, name: &str, values: &[&str]) -> Self {
        Self {
            label: label.to_string(),
            name: name.to_string(),
            options: values
                .iter()
                .map(|v| ChoiceOption {
                    value: v.to_string(),
                    label: v.to_string(),
                })
                .collect(),
            required: true,
        }
    }

    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    pub fn contains(&self, value: &str) -> bool {
        self.options.iter().any(|o| o.value == value)
    }

    /// Label of the option with the given value
    pub fn option_label(&self, value: &str) -> Option<&str> {
        self.options
            .iter()
            .find(|o| o.value == value)
            .map(|o| o.label.as_str())
    }
}

/// A file upload input
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileFieldDescriptor {
    pub label: String,

    pub name: String,

    /// Comma-separated MIME patterns, e.g. `image/*,application/pdf`
    #[serde(default)]
    pub accepted_types: String,

    #[serde(default = "default_required")]
    pub required: bool,

    /// Largest accepted file, in bytes
    #[serde(default = "default_max_size")]
    pub max_size_bytes: u64,

    /// Slot holds a list of files instead of at most one
    #[serde(default)]
    pub multiple: bool,

    /// Replaces the default "{label} is required" message
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required_message: Option<String>,
}

impl FileFieldDescriptor {
    /// Create a required single-file field with the default size limit
    pub fn new(label: &str, name: &str, accepted_types: &str) -> Self {
        Self {
            label: label.to_string(),
            name: name.to_string(),
            accepted_types: accepted_types.to_string(),
            required: true,
            max_size_bytes: DEFAULT_MAX_FILE_SIZE,
            multiple: false,
            required_message: None,
        }
    }

    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    pub fn multiple(mut self) -> Self {
        self.multiple = true;
        self
    }

    pub fn with_max_size(mut self, max_size_bytes: u64) -> Self {
        self.max_size_bytes = max_size_bytes;
        self
    }

    pub fn with_required_message(mut self, message: &str) -> Self {
        self.required_message = Some(message.to_string());
        self
    }

    pub fn required_message(&self) -> String {
        self.required_message
            .clone()
            .unwrap_or_else(|| format!("{} is required", self.label))
    }

    pub fn size_message(&self) -> String {
        format!("File size must be less than {}MB", self.max_size_mb())
    }

    /// Size limit in MB, as shown to the user
    pub fn max_size_mb(&self) -> f64 {
        self.max_size_bytes as f64 / MIB as f64
    }

    /// Check a file name against the accept patterns
    ///
    /// Supports `*/*`, `type/*`, exact MIME types and `.ext` suffixes.
    /// An empty pattern list accepts everything.
    pub fn accepts(&self, file_name: &str) -> bool {
        let patterns: Vec<&str> = self
            .accepted_types
            .split(',')
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .collect();

        if patterns.is_empty() {
            return true;
        }

        let mime = mime_guess::from_path(file_name).first_or_octet_stream();
        let extension = Path::new(file_name)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());

        patterns.iter().any(|pattern| {
            if *pattern == "*/*" || *pattern == "*" {
                return true;
            }
            if let Some(ext) = pattern.strip_prefix('.') {
                return extension.as_deref() == Some(&ext.to_ascii_lowercase());
            }
            match pattern.split_once('/') {
                Some((top, "*")) => mime.type_().as_str().eq_ignore_ascii_case(top),
                Some(_) => mime.essence_str().eq_ignore_ascii_case(pattern),
                None => false,
            }
        })
    }
}

/// One entry of a form schema
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FieldSpec {
    Text(FieldDescriptor),
    Choice(ChoiceDescriptor),
    File(FileFieldDescriptor),
}

impl FieldSpec {
    pub fn name(&self) -> &str {
        match self {
            FieldSpec::Text(f) => &f.name,
            FieldSpec::Choice(f) => &f.name,
            FieldSpec::File(f) => &f.name,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            FieldSpec::Text(f) => &f.label,
            FieldSpec::Choice(f) => &f.label,
            FieldSpec::File(f) => &f.label,
        }
    }

    pub fn required(&self) -> bool {
        match self {
            FieldSpec::Text(f) => f.required,
            FieldSpec::Choice(f) => f.required,
            FieldSpec::File(f) => f.required,
        }
    }

    /// Short name for this field kind
    pub fn kind(&self) -> &'static str {
        match self {
            FieldSpec::Text(_) => "text",
            FieldSpec::Choice(_) => "choice",
            FieldSpec::File(_) => "file",
        }
    }
}

impl From<FieldDescriptor> for FieldSpec {
    fn from(f: FieldDescriptor) -> Self {
        FieldSpec::Text(f)
    }
}

impl From<ChoiceDescriptor> for FieldSpec {
    fn from(f: ChoiceDescriptor) -> Self {
        FieldSpec::Choice(f)
    }
}

impl From<FileFieldDescriptor> for FieldSpec {
    fn from(f: FileFieldDescriptor) -> Self {
        FieldSpec::File(f)
    }
}

/// An ordered, name-unique list of fields
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormSchema {
    title: String,
    fields: Vec<FieldSpec>,
}

impl FormSchema {
    /// Build a schema, rejecting duplicate field names
    pub fn new(title: &str, fields: Vec<FieldSpec>) -> Result<Self> {
        let mut seen = HashSet::new();
        for field in &fields {
            if !seen.insert(field.name()) {
                return Err(Error::DuplicateField(field.name().to_string()));
            }
        }

        Ok(Self {
            title: title.to_string(),
            fields,
        })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    pub fn get(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name() == name)
    }

    /// Apply one size limit to every file field
    pub fn with_max_file_size(mut self, max_size_bytes: u64) -> Self {
        for field in &mut self.fields {
            if let FieldSpec::File(f) = field {
                f.max_size_bytes = max_size_bytes;
            }
        }
        self
    }
}

/// The rider KYC registration form
///
/// PAN and driving licence details are optional; Aadhar and the rider
/// photo are mandatory.
pub fn registration_schema() -> FormSchema {
    const DOCUMENTS: &str = "image/*,application/pdf";

    FormSchema {
        title: "Driver Registration".to_string(),
        fields: vec![
            FieldDescriptor::new("Driver Name", "name", "John Doe").into(),
            FieldDescriptor::new("Address", "address", "123 Main St").into(),
            FieldDescriptor::new("Aadhar Number", "aadharNumber", "XXXX-XXXX-XXXX").into(),
            FieldDescriptor::new("PAN Number", "panNumber", "AAXXX1234X")
                .optional()
                .into(),
            FieldDescriptor::new("DL Number", "dlNumber", "DL123456789")
                .optional()
                .into(),
            FieldDescriptor::new("Vehicle Registration Number", "vehicle", "AB12345").into(),
            FileFieldDescriptor::new("Upload Aadhar File", "aadharFile", DOCUMENTS).into(),
            FileFieldDescriptor::new("Upload PAN File", "panFile", DOCUMENTS)
                .optional()
                .into(),
            FileFieldDescriptor::new("Upload Driving License", "dlFile", DOCUMENTS)
                .optional()
                .into(),
            FileFieldDescriptor::new("Upload Rider Photo", "riderPhoto", "image/*").into(),
        ],
    }
}

/// Vehicle damage report form
pub fn damage_report_schema() -> FormSchema {
    FormSchema {
        title: "Damage Report".to_string(),
        fields: vec![
            FieldDescriptor::new("VIN Number", "vin_number", "1HGCM82633A004352").into(),
            FieldDescriptor::new("Rider Name", "rider_name", "John Doe").into(),
            FieldDescriptor::new("Rider Number", "rider_number", "9876543210").into(),
            FieldDescriptor::new("Vendor", "vendor", "Vendor name").into(),
            ChoiceDescriptor::new("Type", "type", &["return", "recover"]).into(),
            FieldDescriptor::new("Damaged Parts", "damageParts", "Front bumper, mirror").into(),
            FieldDescriptor::new("Total Damage Cost", "totalDamageCost", "2500").into(),
            ChoiceDescriptor::new("Payment Status", "paymentStatus", &["paid", "unpaid"]).into(),
            FileFieldDescriptor::new("Cluster Photos", "clustorPhotos", "image/*")
                .multiple()
                .with_required_message("Upload at least one photo.")
                .into(),
            FileFieldDescriptor::new("Damage Video", "damageVideo", "video/*").into(),
        ],
    }
}
