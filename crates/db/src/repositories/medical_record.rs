use crate::models::DbMedicalRecord;
use eyre::Result;
use sqlx::{Executor, Postgres};

pub async fn get_medical_records_by_student_id<'e, E>(
    executor: E,
    student_id: &str,
    category: Option<&str>,
) -> Result<Vec<DbMedicalRecord>>
where
    E: Executor<'e, Database = Postgres>,
{
    let records = sqlx::query_as::<_, DbMedicalRecord>(
        r#"
        SELECT id, student_id, category, form_type, notes, status, file_path,
               department_name, created_at, updated_at
        FROM medical_records
        WHERE student_id = $1 AND ($2::VARCHAR IS NULL OR category = $2)
        ORDER BY created_at DESC
        "#,
    )
    .bind(student_id)
    .bind(category)
    .fetch_all(executor)
    .await?;

    Ok(records)
}
