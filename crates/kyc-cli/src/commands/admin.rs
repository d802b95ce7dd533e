//! Admin commands

use crate::AdminCommands;
use anyhow::{Context, Result};
use kyc_client::{
    AdminCredentials, AdminSession, Config, DriverDirectory, FileSessionStore, KycClient,
    SessionStore,
};

pub async fn handle(action: AdminCommands, config: &Config) -> Result<()> {
    let store = FileSessionStore::new(&config.session_file);

    match action {
        AdminCommands::Login { username, password } => {
            let attempt = AdminCredentials::new(&username, &password);
            AdminSession::login(&config.credentials(), &attempt, &store)?;
            println!("Logged in as {}", username);
        }
        AdminCommands::Logout => {
            logout(&store)?;
            println!("Logged out");
        }
        AdminCommands::Drivers { format } => {
            let session = AdminSession::require(&store)
                .context("Run `rider-kyc admin login` first")?;

            let directory =
                DriverDirectory::new(KycClient::from_config(config), config.file_base_url.clone());
            directory
                .refresh(&session)
                .await
                .context("Failed to fetch drivers")?;

            format.print_drivers(&directory.drivers().await)?;
        }
    }

    Ok(())
}

/// Forget the stored login, whatever state the store is in
fn logout(store: &dyn SessionStore) -> Result<()> {
    match AdminSession::restore(store) {
        Ok(Some(session)) => session.logout(store)?,
        Ok(None) | Err(_) => store.clear()?,
    }
    Ok(())
}
