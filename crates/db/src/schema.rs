use eyre::Result;
use sqlx::{Executor, Pool, Postgres};
use tracing::info;

pub async fn initialize_database(pool: &Pool<Postgres>) -> Result<()> {
    info!("Initializing database schema...");

    // One consultation date per calendar day
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS consultation_dates (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            date DATE NOT NULL,
            is_active BOOLEAN NOT NULL DEFAULT TRUE,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            CONSTRAINT consultation_dates_date_key UNIQUE (date)
        );
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS time_slots (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            consultation_date_id UUID NOT NULL REFERENCES consultation_dates(id) ON DELETE CASCADE,
            start_time TIME NOT NULL,
            end_time TIME NOT NULL,
            is_available BOOLEAN NOT NULL DEFAULT TRUE,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            CONSTRAINT valid_time_range CHECK (end_time > start_time)
        );
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS medical_records (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            student_id VARCHAR(255) NOT NULL,
            category VARCHAR(32) NOT NULL,
            form_type VARCHAR(255) NOT NULL,
            notes TEXT NULL,
            status VARCHAR(64) NOT NULL,
            file_path TEXT NOT NULL,
            department_name VARCHAR(255) NULL,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            CONSTRAINT valid_category CHECK (category IN ('medical', 'immunization', 'lab'))
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Several statements in one batch need the simple query protocol
    pool.execute(
        r#"
        CREATE INDEX IF NOT EXISTS idx_consultation_dates_active_date ON consultation_dates(is_active, date);
        CREATE INDEX IF NOT EXISTS idx_time_slots_consultation_date_id ON time_slots(consultation_date_id);
        CREATE INDEX IF NOT EXISTS idx_time_slots_start_time ON time_slots(start_time);
        CREATE INDEX IF NOT EXISTS idx_medical_records_student_category ON medical_records(student_id, category);
        "#,
    )
    .await?;

    info!("Database schema initialized successfully.");
    Ok(())
}
