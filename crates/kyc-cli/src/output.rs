//! Output formatting

use clap::ValueEnum;
use kyc_client::render;
use kyc_common::DriverRecord;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

impl OutputFormat {
    pub fn print_drivers(&self, drivers: &[DriverRecord]) -> anyhow::Result<()> {
        match self {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(drivers)?);
            }
            OutputFormat::Table => {
                println!("{}", render::driver_table(drivers));
            }
        }
        Ok(())
    }
}
