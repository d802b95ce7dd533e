//! Text rendering for the terminal front end

use kyc_common::{AttachmentSlot, DriverRecord, FieldError, FieldSpec, FormSchema};
use tabled::settings::Style;
use tabled::{Table, Tabled};

const NONE: &str = "None";

#[derive(Tabled)]
struct DriverRow {
    #[tabled(rename = "ID")]
    id: usize,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Photo")]
    photo: String,
    #[tabled(rename = "Address")]
    address: String,
    #[tabled(rename = "Vehicle Number")]
    vehicle: String,
    #[tabled(rename = "Aadhar Number")]
    aadhar_number: String,
    #[tabled(rename = "Aadhar File")]
    aadhar_file: String,
    #[tabled(rename = "PAN Number")]
    pan_number: String,
    #[tabled(rename = "PAN File")]
    pan_file: String,
    #[tabled(rename = "DL Number")]
    dl_number: String,
    #[tabled(rename = "DL File")]
    dl_file: String,
}

fn or_none(value: &Option<String>) -> String {
    match value.as_deref() {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => NONE.to_string(),
    }
}

impl DriverRow {
    fn new(index: usize, driver: &DriverRecord) -> Self {
        Self {
            id: index + 1,
            name: driver.name.clone(),
            photo: driver.rider_photo.clone(),
            address: driver.address.clone(),
            vehicle: driver.vehicle.clone(),
            aadhar_number: driver.aadhar_number.clone(),
            aadhar_file: driver.aadhar_file.clone(),
            pan_number: or_none(&driver.pan_number),
            pan_file: or_none(&driver.pan_file),
            dl_number: or_none(&driver.dl_number),
            dl_file: or_none(&driver.dl_file),
        }
    }
}

/// Render drivers as a table with 1-based IDs
pub fn driver_table(drivers: &[DriverRecord]) -> String {
    let rows = drivers
        .iter()
        .enumerate()
        .map(|(idx, driver)| DriverRow::new(idx, driver));

    Table::new(rows).with(Style::rounded()).to_string()
}

/// Describe the files currently held by a slot
///
/// A single slot yields one `Selected file: ...` line; a multi slot yields
/// one line per file prefixed with the index used to remove it.
pub fn attachment_summary(slot: &AttachmentSlot) -> Vec<String> {
    match slot {
        AttachmentSlot::Single(Some(file)) => vec![format!(
            "Selected file: {} ({})",
            file.name,
            file.display_size()
        )],
        AttachmentSlot::Single(None) => Vec::new(),
        AttachmentSlot::Multi(files) => files
            .iter()
            .enumerate()
            .map(|(idx, file)| format!("[{}] {} ({})", idx, file.name, file.display_size()))
            .collect(),
    }
}

/// Describe a form's fields, one line each
pub fn form_layout(schema: &FormSchema) -> String {
    let mut lines = vec![schema.title().to_string()];

    for field in schema.fields() {
        let marker = if field.required() { " *" } else { "" };
        let hint = match field {
            FieldSpec::Text(f) if !f.placeholder.is_empty() => format!("e.g. {}", f.placeholder),
            FieldSpec::Text(_) => String::new(),
            FieldSpec::Choice(f) => {
                let values: Vec<&str> = f.options.iter().map(|o| o.value.as_str()).collect();
                format!("one of: {}", values.join(", "))
            }
            FieldSpec::File(f) => {
                let accepts = if f.accepted_types.is_empty() {
                    "any file"
                } else {
                    f.accepted_types.as_str()
                };
                let count = if f.multiple { "files" } else { "file" };
                format!("{} {}, max {}MB", accepts, count, f.max_size_mb())
            }
        };

        lines.push(format!(
            "  {}{} [{}] {}",
            field.label(),
            marker,
            field.name(),
            hint
        ));
    }

    lines
        .iter()
        .map(|l| l.trim_end())
        .collect::<Vec<_>>()
        .join("\n")
}

/// One `field: message` line per validation error
pub fn validation_report(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| format!("{}: {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use kyc_common::{registration_schema, Attachment};

    fn driver(pan: Option<&str>) -> DriverRecord {
        DriverRecord {
            name: "Ravi Kumar".into(),
            address: "12 MG Road".into(),
            vehicle: "KA01AB1234".into(),
            aadhar_number: "1234-5678-9012".into(),
            aadhar_file: "https://host/docs/a.png".into(),
            rider_photo: "https://host/photos/r.jpg".into(),
            pan_number: pan.map(String::from),
            dl_number: None,
            pan_file: pan.map(|_| "https://host/docs/pan.png".to_string()),
            dl_file: None,
        }
    }

    #[test]
    fn test_table_renders_none_for_missing() {
        let table = driver_table(&[driver(None)]);
        assert!(table.contains("PAN Number"));
        assert!(table.contains("https://host/docs/a.png"));
        assert_eq!(table.matches(NONE).count(), 4);
    }

    #[test]
    fn test_table_ids_are_one_based() {
        let table = driver_table(&[driver(Some("ABCDE1234F")), driver(None)]);
        let first = table.lines().find(|l| l.contains("ABCDE1234F")).unwrap();
        assert!(first.contains("│ 1 "));
        assert!(table.lines().any(|l| l.contains("│ 2 ")));
    }

    #[test]
    fn test_single_slot_summary() {
        let mut slot = AttachmentSlot::empty(false);
        assert!(attachment_summary(&slot).is_empty());

        slot.select(vec![Attachment::new("aadhar.pdf", vec![0; 1024 * 1024])]);
        assert_eq!(
            attachment_summary(&slot),
            vec!["Selected file: aadhar.pdf (1.00 MB)"]
        );
    }

    #[test]
    fn test_multi_slot_summary() {
        let mut slot = AttachmentSlot::empty(true);
        slot.select(vec![
            Attachment::new("one.jpg", vec![0; 512 * 1024]),
            Attachment::new("two.jpg", vec![0; 10]),
        ]);

        assert_eq!(
            attachment_summary(&slot),
            vec!["[0] one.jpg (0.50 MB)", "[1] two.jpg (0.00 MB)"]
        );
    }

    #[test]
    fn test_form_layout_marks_required() {
        let layout = form_layout(&registration_schema());
        assert!(layout.starts_with("Driver Registration"));
        assert!(layout.contains("  Driver Name * [name] e.g. John Doe"));
        assert!(layout.contains("  PAN Number [panNumber] e.g. AAXXX1234X"));
        assert!(layout.contains("  Upload Rider Photo * [riderPhoto] image/* file, max 2MB"));
    }

    #[test]
    fn test_validation_report() {
        let errors = vec![
            FieldError {
                field: "name".into(),
                message: "Driver Name is required".into(),
            },
            FieldError {
                field: "dlFile".into(),
                message: "File size must be less than 2MB".into(),
            },
        ];
        assert_eq!(
            validation_report(&errors),
            "name: Driver Name is required\ndlFile: File size must be less than 2MB"
        );
    }
}
