use anyhow::Result;
use std::collections::HashSet;
use tracing::info;

use crate::models::{ActiveSurveyQuestion, SurveyQuestion};
use super::Database;

impl Database {
    /// Adds questions to the bank in one transaction
    pub async fn insert_survey_questions(
        &self,
        questions: &[String],
        category: Option<&str>,
    ) -> Result<u64> {
        let mut tx = self.pool.begin().await?;
        let mut inserted = 0;

        for question in questions {
            let result = sqlx::query("INSERT INTO surveys_creation (question, category) VALUES (?, ?)")
                .bind(question)
                .bind(category)
                .execute(&mut *tx)
                .await?;
            inserted += result.rows_affected();
        }

        tx.commit().await?;
        Ok(inserted)
    }

    pub async fn get_survey_questions(&self) -> Result<Vec<SurveyQuestion>> {
        let questions = sqlx::query_as::<_, SurveyQuestion>(
            "SELECT id, question, category, created_at FROM surveys_creation ORDER BY created_at ASC, id ASC"
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(questions)
    }

    /// Returns the ids from `ids` that have no row in the question bank,
    /// in the order they were given.
    pub async fn find_missing_question_ids(&self, ids: &[i64]) -> Result<Vec<i64>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut query = sqlx::QueryBuilder::new("SELECT id FROM surveys_creation WHERE id IN (");
        let mut separated = query.separated(", ");
        for id in ids {
            separated.push_bind(*id);
        }
        separated.push_unseparated(")");

        let found: HashSet<i64> = query
            .build_query_scalar::<i64>()
            .fetch_all(&self.pool)
            .await?
            .into_iter()
            .collect();

        Ok(ids.iter().copied().filter(|id| !found.contains(id)).collect())
    }

    /// Replaces the deployed survey with `question_ids`, keeping their order
    pub async fn deploy_survey(&self, question_ids: &[i64]) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM active_survey_questions")
            .execute(&mut *tx)
            .await?;

        for question_id in question_ids {
            sqlx::query("INSERT INTO active_survey_questions (question_id) VALUES (?)")
                .bind(question_id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        info!("Deployed survey with {} questions", question_ids.len());
        Ok(())
    }

    pub async fn get_active_survey(&self) -> Result<Vec<ActiveSurveyQuestion>> {
        let questions = sqlx::query_as::<_, ActiveSurveyQuestion>(
            r#"
            SELECT sc.id, sc.question
            FROM active_survey_questions asq
            JOIN surveys_creation sc ON asq.question_id = sc.id
            ORDER BY asq.id ASC
            "#
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(questions)
    }
}
