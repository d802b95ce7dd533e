//! Form command

use anyhow::Result;
use kyc_client::{render, Config};
use kyc_common::{damage_report_schema, registration_schema};

pub fn handle(damage_report: bool, config: &Config) -> Result<()> {
    let schema = if damage_report {
        damage_report_schema()
    } else {
        registration_schema()
    };
    let schema = schema.with_max_file_size(config.max_file_size_bytes());

    println!("{}", render::form_layout(&schema));
    println!("\n* required");
    Ok(())
}
