use anyhow::Result;
use tracing::{info, warn};
use crate::config::Config;
use crate::db::Database;
use crate::models::NewAdmin;

/// Creates the admin named by `ADMIN_EMAIL` / `ADMIN_PASSWORD` unless it
/// already exists. Does nothing when either variable is unset.
pub async fn seed_admin_user(db: &Database, config: &Config) -> Result<()> {
    let (Some(email), Some(password)) = (config.admin_email.as_deref(), config.admin_password.as_deref()) else {
        info!("ADMIN_EMAIL/ADMIN_PASSWORD not set, skipping admin seed");
        return Ok(());
    };

    let email = email.trim().to_lowercase();

    match db.get_admin_by_email(&email).await {
        Ok(Some(admin)) => {
            info!("Admin {} already exists (id {})", admin.email, admin.id);
            return Ok(());
        }
        Ok(None) => {}
        Err(e) => {
            warn!("Error checking for admin user: {}", e);
        }
    }

    let new_admin = NewAdmin {
        firstname: "System".to_string(),
        lastname: "Administrator".to_string(),
        middlename: None,
        email: email.clone(),
        password: password.to_string(),
    };

    match db.create_admin(new_admin).await {
        Ok(admin) => info!("Seeded admin {} (id {})", admin.email, admin.id),
        Err(e) => warn!("Failed to seed admin {}: {}", email, e),
    }

    Ok(())
}
