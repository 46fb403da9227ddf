use crate::models::DbConsultationDate;
use chrono::{NaiveDate, Utc};
use eyre::Result;
use sqlx::{Executor, Postgres};
use uuid::Uuid;

pub async fn create_consultation_date<'e, E>(executor: E, date: NaiveDate) -> Result<DbConsultationDate>
where
    E: Executor<'e, Database = Postgres>,
{
    let id = Uuid::new_v4();
    let now = Utc::now();

    tracing::debug!("Creating consultation date: id={}, date={}", id, date);

    let consultation_date = sqlx::query_as::<_, DbConsultationDate>(
        r#"
        INSERT INTO consultation_dates (id, date, is_active, created_at, updated_at)
        VALUES ($1, $2, TRUE, $3, $3)
        RETURNING id, date, is_active, created_at, updated_at
        "#,
    )
    .bind(id)
    .bind(date)
    .bind(now)
    .fetch_one(executor)
    .await?;

    Ok(consultation_date)
}

pub async fn get_consultation_date_by_date<'e, E>(
    executor: E,
    date: NaiveDate,
) -> Result<Option<DbConsultationDate>>
where
    E: Executor<'e, Database = Postgres>,
{
    let consultation_date = sqlx::query_as::<_, DbConsultationDate>(
        r#"
        SELECT id, date, is_active, created_at, updated_at
        FROM consultation_dates
        WHERE date = $1
        "#,
    )
    .bind(date)
    .fetch_optional(executor)
    .await?;

    Ok(consultation_date)
}

pub async fn get_active_consultation_dates_from<'e, E>(
    executor: E,
    from: NaiveDate,
) -> Result<Vec<DbConsultationDate>>
where
    E: Executor<'e, Database = Postgres>,
{
    let consultation_dates = sqlx::query_as::<_, DbConsultationDate>(
        r#"
        SELECT id, date, is_active, created_at, updated_at
        FROM consultation_dates
        WHERE is_active = TRUE AND date >= $1
        ORDER BY date ASC
        "#,
    )
    .bind(from)
    .fetch_all(executor)
    .await?;

    Ok(consultation_dates)
}
