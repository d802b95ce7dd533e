//! Register command

use anyhow::{Context, Result};
use kyc_client::{render, Config, FormSession, KycClient, SubmitOutcome};
use kyc_common::{registration_schema, Attachment, Error, FieldSpec, FormState};
use std::path::PathBuf;
use tracing::info;

pub async fn handle(
    fields: Vec<(String, String)>,
    files: Vec<(String, PathBuf)>,
    config: &Config,
) -> Result<()> {
    let form = build_form(fields, files, config)?;

    for field in form.schema().fields() {
        if let FieldSpec::File(f) = field {
            for line in render::attachment_summary(form.slot(&f.name)?) {
                println!("{}: {}", f.label, line);
            }
        }
    }

    let session = FormSession::new(form, KycClient::from_config(config));
    match session.submit().await {
        Ok(SubmitOutcome::Submitted(reply)) => {
            info!("Registration accepted");
            println!("Registration submitted");
            println!("{}", serde_json::to_string_pretty(&reply)?);
            Ok(())
        }
        Ok(SubmitOutcome::Dropped) => {
            println!("A submission is already in progress");
            Ok(())
        }
        Err(Error::Validation(errors)) => {
            eprintln!("{}", render::validation_report(&errors));
            anyhow::bail!("Form has {} invalid field(s)", errors.len())
        }
        Err(e) => Err(e.into()),
    }
}

/// Fill a registration form from `NAME=VALUE` and `NAME=PATH` pairs
///
/// Files given under the same name form one selection, in argument order.
fn build_form(
    fields: Vec<(String, String)>,
    files: Vec<(String, PathBuf)>,
    config: &Config,
) -> Result<FormState> {
    let schema = registration_schema().with_max_file_size(config.max_file_size_bytes());
    let mut form = FormState::new(schema);

    for (name, value) in fields {
        form.set_text(&name, value)?;
    }

    let mut selections: Vec<(String, Vec<Attachment>)> = Vec::new();
    for (name, path) in files {
        let attachment = Attachment::from_path(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;

        match selections.iter_mut().find(|(n, _)| *n == name) {
            Some((_, group)) => group.push(attachment),
            None => selections.push((name, vec![attachment])),
        }
    }

    for (name, group) in selections {
        form.select_files(&name, group)?;
    }

    Ok(form)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> Config {
        Config::from_lookup(|_| None).unwrap()
    }

    #[test]
    fn test_build_form_from_arguments() {
        let dir = tempfile::tempdir().unwrap();
        let photo = dir.path().join("me.jpg");
        std::fs::write(&photo, [0xFF, 0xD8, 0xFF]).unwrap();

        let form = build_form(
            vec![("name".into(), "Ravi Kumar".into())],
            vec![("riderPhoto".into(), photo)],
            &config(),
        )
        .unwrap();

        assert_eq!(form.text("name").unwrap(), "Ravi Kumar");
        let slot = form.slot("riderPhoto").unwrap();
        assert_eq!(slot.first().map(|f| f.name.as_str()), Some("me.jpg"));
    }

    #[test]
    fn test_unknown_field_is_rejected() {
        let result = build_form(vec![("nickname".into(), "R".into())], Vec::new(), &config());
        assert!(result.unwrap_err().to_string().contains("Unknown field: nickname"));
    }

    #[test]
    fn test_missing_file_is_reported() {
        let result = build_form(
            Vec::new(),
            vec![("aadharFile".into(), PathBuf::from("/definitely/not/here.pdf"))],
            &config(),
        );
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("Failed to read /definitely/not/here.pdf"));
    }
}
