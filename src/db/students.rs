use anyhow::Result;
use tracing::info;

use crate::models::{AccountActivation, NewStudentRecord, Student, StudentVerification};
use super::Database;

const STUDENT_COLUMNS: &str = "id_number, firstname, lastname, middlename, birthdate, Department, \
     year_graduated, currently_working, field_of_work, experience, other_work, company_name, \
     user_email, user_password, user_account, created_at";

impl Database {
    pub async fn get_student_by_id(&self, id_number: i64) -> Result<Option<Student>> {
        let student = sqlx::query_as::<_, Student>(&format!(
            "SELECT {} FROM students WHERE id_number = ?",
            STUDENT_COLUMNS
        ))
        .bind(id_number)
        .fetch_optional(&self.pool)
        .await?;

        Ok(student)
    }

    pub async fn get_student_by_email(&self, email: &str) -> Result<Option<Student>> {
        let student = sqlx::query_as::<_, Student>(&format!(
            "SELECT {} FROM students WHERE user_email = ?",
            STUDENT_COLUMNS
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(student)
    }

    /// Finds the imported record a signing-up student claims to be.
    /// `<=>` makes a missing middle name match a NULL column.
    pub async fn find_student_for_verification(
        &self,
        verification: &StudentVerification,
    ) -> Result<Option<Student>> {
        let student = sqlx::query_as::<_, Student>(&format!(
            r#"
            SELECT {} FROM students
            WHERE firstname = ? AND middlename <=> ? AND lastname = ?
              AND birthdate = ? AND year_graduated = ? AND Department = ?
            ORDER BY id_number ASC
            LIMIT 1
            "#,
            STUDENT_COLUMNS
        ))
        .bind(&verification.firstname)
        .bind(&verification.middlename)
        .bind(&verification.lastname)
        .bind(verification.birthdate)
        .bind(&verification.year_graduated)
        .bind(&verification.department)
        .fetch_optional(&self.pool)
        .await?;

        Ok(student)
    }

    /// Binds credentials and employment details to an imported record.
    /// Returns false when the record already had an account.
    pub async fn activate_student_account(
        &self,
        id_number: i64,
        activation: AccountActivation,
    ) -> Result<bool> {
        let password_hash = bcrypt::hash(&activation.password, bcrypt::DEFAULT_COST)?;

        let result = sqlx::query(
            r#"
            UPDATE students
            SET user_email = ?, user_password = ?, user_account = TRUE,
                currently_working = ?, field_of_work = ?, other_work = ?,
                experience = ?, company_name = ?
            WHERE id_number = ? AND user_account = FALSE
            "#
        )
        .bind(&activation.email)
        .bind(&password_hash)
        .bind(&activation.currently_working)
        .bind(&activation.field_of_work)
        .bind(&activation.other_work)
        .bind(activation.experience)
        .bind(&activation.company_name)
        .bind(id_number)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    /// Inserts imported alumni rows in one transaction
    pub async fn insert_students_batch(&self, records: &[NewStudentRecord]) -> Result<u64> {
        let mut tx = self.pool.begin().await?;
        let mut inserted = 0;

        for record in records {
            let result = sqlx::query(
                r#"
                INSERT INTO students
                    (firstname, lastname, middlename, birthdate, Department, year_graduated,
                     currently_working, field_of_work, experience, other_work, company_name)
                VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
                "#
            )
            .bind(&record.firstname)
            .bind(&record.lastname)
            .bind(&record.middlename)
            .bind(record.birthdate)
            .bind(&record.department)
            .bind(&record.year_graduated)
            .bind(&record.currently_working)
            .bind(&record.field_of_work)
            .bind(record.experience)
            .bind(&record.other_work)
            .bind(&record.company_name)
            .execute(&mut *tx)
            .await?;

            inserted += result.rows_affected();
        }

        tx.commit().await?;

        info!("Batch inserted {} student records", inserted);
        Ok(inserted)
    }
}
