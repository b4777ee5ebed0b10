use anyhow::Result;

use crate::models::{DepartmentCount, TRACKED_DEPARTMENTS};
use super::Database;

impl Database {
    /// Alumni with a recorded field of work, per tracked department
    pub async fn count_working_alumni_by_department(&self) -> Result<Vec<DepartmentCount>> {
        self.count_by_department(
            "AND field_of_work IS NOT NULL AND field_of_work != ''",
        )
        .await
    }

    /// All alumni records, per tracked department
    pub async fn count_alumni_by_department(&self) -> Result<Vec<DepartmentCount>> {
        self.count_by_department("").await
    }

    async fn count_by_department(&self, extra_filter: &str) -> Result<Vec<DepartmentCount>> {
        let mut query = sqlx::QueryBuilder::new(
            "SELECT Department, COUNT(*) AS count FROM students WHERE Department IN (",
        );
        let mut separated = query.separated(", ");
        for department in TRACKED_DEPARTMENTS {
            separated.push_bind(department);
        }
        separated.push_unseparated(") ");
        query.push(extra_filter);
        query.push(" GROUP BY Department ORDER BY Department ASC");

        let counts = query
            .build_query_as::<DepartmentCount>()
            .fetch_all(&self.pool)
            .await?;

        Ok(counts)
    }
}
