use anyhow::Result;

use crate::models::{Admin, NewAdmin};
use super::Database;

const ADMIN_COLUMNS: &str = "id, firstname, lastname, middlename, email, passwords, created_at";

impl Database {
    pub async fn create_admin(&self, admin: NewAdmin) -> Result<Admin> {
        let password_hash = bcrypt::hash(&admin.password, bcrypt::DEFAULT_COST)?;

        let result = sqlx::query(
            r#"
            INSERT INTO admin_info (firstname, lastname, middlename, email, passwords)
            VALUES (?, ?, ?, ?, ?)
            "#
        )
        .bind(&admin.firstname)
        .bind(&admin.lastname)
        .bind(&admin.middlename)
        .bind(&admin.email)
        .bind(&password_hash)
        .execute(&self.pool)
        .await?;

        let id = result.last_insert_id() as i64;
        self.get_admin_by_id(id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Admin {} vanished after insert", id))
    }

    pub async fn get_admin_by_email(&self, email: &str) -> Result<Option<Admin>> {
        let admin = sqlx::query_as::<_, Admin>(&format!(
            "SELECT {} FROM admin_info WHERE email = ?",
            ADMIN_COLUMNS
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(admin)
    }

    pub async fn get_admin_by_id(&self, id: i64) -> Result<Option<Admin>> {
        let admin = sqlx::query_as::<_, Admin>(&format!(
            "SELECT {} FROM admin_info WHERE id = ?",
            ADMIN_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(admin)
    }
}
