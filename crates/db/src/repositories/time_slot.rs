use crate::models::DbTimeSlot;
use chrono::{NaiveTime, Utc};
use eyre::Result;
use sqlx::{Executor, Postgres};
use uuid::Uuid;

pub async fn create_time_slot<'e, E>(
    executor: E,
    consultation_date_id: Uuid,
    start_time: NaiveTime,
    end_time: NaiveTime,
) -> Result<DbTimeSlot>
where
    E: Executor<'e, Database = Postgres>,
{
    let id = Uuid::new_v4();
    let now = Utc::now();

    let time_slot = sqlx::query_as::<_, DbTimeSlot>(
        r#"
        INSERT INTO time_slots (id, consultation_date_id, start_time, end_time, is_available, created_at, updated_at)
        VALUES ($1, $2, $3, $4, TRUE, $5, $5)
        RETURNING id, consultation_date_id, start_time, end_time, is_available, created_at, updated_at
        "#,
    )
    .bind(id)
    .bind(consultation_date_id)
    .bind(start_time)
    .bind(end_time)
    .bind(now)
    .fetch_one(executor)
    .await?;

    Ok(time_slot)
}

/// Available slots belonging to any of `consultation_date_ids`, earliest first.
pub async fn get_available_time_slots<'e, E>(
    executor: E,
    consultation_date_ids: &[Uuid],
) -> Result<Vec<DbTimeSlot>>
where
    E: Executor<'e, Database = Postgres>,
{
    let time_slots = sqlx::query_as::<_, DbTimeSlot>(
        r#"
        SELECT id, consultation_date_id, start_time, end_time, is_available, created_at, updated_at
        FROM time_slots
        WHERE consultation_date_id = ANY($1) AND is_available = TRUE
        ORDER BY start_time ASC, id ASC
        "#,
    )
    .bind(consultation_date_ids)
    .fetch_all(executor)
    .await?;

    Ok(time_slots)
}
