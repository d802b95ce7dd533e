//! Submitted driver records as returned by the listing endpoint

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Record fields holding a server-relative file path
pub const FILE_FIELDS: [&str; 4] = ["aadharFile", "panFile", "dlFile", "riderPhoto"];

/// A registered driver, with file paths already made absolute
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriverRecord {
    pub name: String,
    pub address: String,
    pub vehicle: String,
    pub aadhar_number: String,

    /// URL of the Aadhar document
    pub aadhar_file: String,

    /// URL of the rider photo
    pub rider_photo: String,

    #[serde(default)]
    pub pan_number: Option<String>,

    #[serde(default)]
    pub dl_number: Option<String>,

    #[serde(default)]
    pub pan_file: Option<String>,

    #[serde(default)]
    pub dl_file: Option<String>,
}

/// Rewrite the file path fields of one raw record in place
///
/// Non-empty strings get `base_url` prepended. Null, empty and missing
/// values all end up as null.
fn absolutize(record: &mut Value, base_url: &str) {
    let Some(object) = record.as_object_mut() else {
        return;
    };

    for field in FILE_FIELDS {
        let rewritten = match object.get(field) {
            Some(Value::String(path)) if !path.is_empty() => {
                Value::String(format!("{}{}", base_url, path))
            }
            Some(Value::String(_)) | Some(Value::Null) | None => Value::Null,
            // anything else is left for schema validation to reject
            Some(other) => other.clone(),
        };
        object.insert(field.to_string(), rewritten);
    }
}

/// Normalize a raw listing response into driver records
///
/// All-or-nothing: if any record is missing a required field or has a field
/// of the wrong type, the whole listing is rejected.
pub fn normalize_records(raw: Value, base_url: &str) -> Result<Vec<DriverRecord>> {
    let Value::Array(mut records) = raw else {
        return Err(Error::Schema("expected a JSON array of drivers".to_string()));
    };

    for record in &mut records {
        absolutize(record, base_url);
    }

    records
        .into_iter()
        .enumerate()
        .map(|(idx, record)| {
            serde_json::from_value(record)
                .map_err(|e| Error::Schema(format!("driver {}: {}", idx, e)))
        })
        .collect()
}
