//! Admin listing of registered drivers

use crate::client::KycClient;
use crate::session::AdminSession;
use kyc_common::{normalize_records, DriverRecord, Result};
use tokio::sync::RwLock;
use tracing::{error, info};

/// The last successfully loaded list of drivers
///
/// Refreshes are not coordinated: two overlapping refreshes both run, and
/// whichever finishes last decides the list.
pub struct DriverDirectory {
    client: KycClient,
    file_base_url: String,
    drivers: RwLock<Vec<DriverRecord>>,
}

impl DriverDirectory {
    pub fn new(client: KycClient, file_base_url: String) -> Self {
        Self {
            client,
            file_base_url,
            drivers: RwLock::new(Vec::new()),
        }
    }

    /// Fetch, normalize and replace the list
    ///
    /// On failure the error is logged and returned, and the previous list
    /// is kept untouched.
    pub async fn refresh(&self, _session: &AdminSession) -> Result<usize> {
        match self.load().await {
            Ok(records) => {
                let count = records.len();
                *self.drivers.write().await = records;
                info!("Loaded {} driver(s)", count);
                Ok(count)
            }
            Err(e) => {
                error!("Error fetching drivers: {}", e);
                Err(e)
            }
        }
    }

    pub async fn drivers(&self) -> Vec<DriverRecord> {
        self.drivers.read().await.clone()
    }

    async fn load(&self) -> Result<Vec<DriverRecord>> {
        let raw = self.client.fetch_drivers().await?;
        normalize_records(raw, &self.file_base_url)
    }
}
