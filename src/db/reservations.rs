use anyhow::Result;
use tracing::info;

use crate::models::{
    NewReservation, Reservation, ReservationRequest, ReservationStatus, SURVEY_ANSWER_SLOTS,
};
use super::Database;

impl Database {
    /// Stores a reservation together with the survey answers submitted with
    /// it. Both rows are written or neither is.
    pub async fn create_reservation_with_survey(
        &self,
        reservation: &NewReservation,
        student_name: &str,
        answers: &[String; SURVEY_ANSWER_SLOTS],
    ) -> Result<i64> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r#"
            INSERT INTO reservations (student_id, document_type, reserved_date, reserved_time, status)
            VALUES (?, ?, ?, ?, ?)
            "#
        )
        .bind(reservation.student_id)
        .bind(&reservation.document_type)
        .bind(reservation.reserved_date)
        .bind(reservation.reserved_time)
        .bind(ReservationStatus::Pending.to_string())
        .execute(&mut *tx)
        .await?;

        let reservation_id = result.last_insert_id() as i64;

        let mut survey_insert = sqlx::query(
            r#"
            INSERT INTO surveys
                (reservation_id, student_name, q1, q2, q3, q4, q5, q6, q7, q8, q9, q10)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#
        )
        .bind(reservation_id)
        .bind(student_name);
        for answer in answers {
            survey_insert = survey_insert.bind(answer);
        }
        survey_insert.execute(&mut *tx).await?;

        tx.commit().await?;

        info!(
            "Created reservation {} ({}) for student {}",
            reservation_id, reservation.document_type, reservation.student_id
        );
        Ok(reservation_id)
    }

    pub async fn get_reservations_for_student(&self, student_id: i64) -> Result<Vec<Reservation>> {
        let reservations = sqlx::query_as::<_, Reservation>(
            r#"
            SELECT id, student_id, document_type, reserved_date, reserved_time,
                   status, decline_reason, created_at
            FROM reservations
            WHERE student_id = ?
            ORDER BY created_at DESC, id DESC
            "#
        )
        .bind(student_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(reservations)
    }

    pub async fn get_reservations_by_status(
        &self,
        status: ReservationStatus,
    ) -> Result<Vec<ReservationRequest>> {
        let requests = sqlx::query_as::<_, ReservationRequest>(
            r#"
            SELECT r.id, r.document_type, r.reserved_date, r.reserved_time,
                   CONCAT(s.firstname, ' ', s.lastname) AS student_name,
                   r.decline_reason
            FROM reservations r
            JOIN students s ON r.student_id = s.id_number
            WHERE r.status = ?
            ORDER BY r.reserved_date DESC, r.reserved_time DESC, r.id DESC
            "#
        )
        .bind(status.to_string())
        .fetch_all(&self.pool)
        .await?;

        Ok(requests)
    }

    /// Moves a reservation to `status`. Approving clears any decline reason.
    /// Returns false when no reservation has this id.
    pub async fn set_reservation_status(
        &self,
        id: i64,
        status: ReservationStatus,
        decline_reason: Option<String>,
    ) -> Result<bool> {
        let exists: Option<i64> = sqlx::query_scalar("SELECT id FROM reservations WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        if exists.is_none() {
            return Ok(false);
        }

        let reason = match status {
            ReservationStatus::Declined => decline_reason,
            _ => None,
        };

        sqlx::query("UPDATE reservations SET status = ?, decline_reason = ? WHERE id = ?")
            .bind(status.to_string())
            .bind(reason)
            .bind(id)
            .execute(&self.pool)
            .await?;

        info!("Reservation {} marked {}", id, status);
        Ok(true)
    }
}
