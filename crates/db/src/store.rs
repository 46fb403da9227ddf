//! Store traits injected into the HTTP layer, and their Postgres backing.
//!
//! Repository functions speak `eyre::Result`; the store boundary turns those
//! reports into [`ClinicError`] so callers can tell a duplicate date apart
//! from a connectivity failure.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::NaiveDate;
use clinicdesk_core::{
    errors::{ClinicError, ClinicResult},
    models::{
        consultation::{ConsultationDate, DUPLICATE_DATE_MESSAGE},
        medical_record::{MedicalRecord, RecordCategory},
        time_slot::NewTimeSlot,
    },
};
use uuid::Uuid;

use crate::{
    DbPool,
    models::DbTimeSlot,
    repositories::{consultation_date, medical_record, time_slot},
};

#[async_trait]
pub trait ConsultationStore: Send + Sync {
    /// Active dates on or after `from`, ascending, each with its available
    /// slots ordered by start time.
    async fn list_upcoming(&self, from: NaiveDate) -> ClinicResult<Vec<ConsultationDate>>;

    async fn find_by_date(&self, date: NaiveDate) -> ClinicResult<Option<ConsultationDate>>;

    /// Inserts the date and every slot as one unit. Nothing is persisted
    /// unless every insert succeeds; an existing date yields
    /// [`ClinicError::Conflict`].
    async fn create_with_slots(
        &self,
        date: NaiveDate,
        slots: Vec<NewTimeSlot>,
    ) -> ClinicResult<ConsultationDate>;
}

#[async_trait]
pub trait MedicalRecordStore: Send + Sync {
    /// Records owned by `student_id`, newest first.
    async fn list_for_student(
        &self,
        student_id: &str,
        category: Option<RecordCategory>,
    ) -> ClinicResult<Vec<MedicalRecord>>;
}

/// Maps a repository failure onto the error taxonomy.
pub fn classify(report: eyre::Report) -> ClinicError {
    let unique_violation = report
        .downcast_ref::<sqlx::Error>()
        .and_then(|e| e.as_database_error())
        .is_some_and(|e| e.is_unique_violation());

    if unique_violation {
        ClinicError::Conflict(DUPLICATE_DATE_MESSAGE.to_string())
    } else {
        ClinicError::Database(report)
    }
}

#[derive(Clone)]
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ConsultationStore for PgStore {
    async fn list_upcoming(&self, from: NaiveDate) -> ClinicResult<Vec<ConsultationDate>> {
        let dates = consultation_date::get_active_consultation_dates_from(&self.pool, from)
            .await
            .map_err(classify)?;

        if dates.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<Uuid> = dates.iter().map(|d| d.id).collect();
        let slots = time_slot::get_available_time_slots(&self.pool, &ids)
            .await
            .map_err(classify)?;

        let mut by_date: HashMap<Uuid, Vec<DbTimeSlot>> = HashMap::new();
        for slot in slots {
            by_date.entry(slot.consultation_date_id).or_default().push(slot);
        }

        Ok(dates
            .into_iter()
            .map(|d| {
                let time_slots = by_date.remove(&d.id).unwrap_or_default();
                d.with_slots(time_slots)
            })
            .collect())
    }

    async fn find_by_date(&self, date: NaiveDate) -> ClinicResult<Option<ConsultationDate>> {
        let row = consultation_date::get_consultation_date_by_date(&self.pool, date)
            .await
            .map_err(classify)?;

        Ok(row.map(|d| d.with_slots(Vec::new())))
    }

    async fn create_with_slots(
        &self,
        date: NaiveDate,
        slots: Vec<NewTimeSlot>,
    ) -> ClinicResult<ConsultationDate> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| ClinicError::Database(e.into()))?;

        // Dropping `tx` on an early return rolls the whole unit back
        let created = consultation_date::create_consultation_date(&mut *tx, date)
            .await
            .map_err(classify)?;

        let mut created_slots = Vec::with_capacity(slots.len());
        for slot in &slots {
            let row =
                time_slot::create_time_slot(&mut *tx, created.id, slot.start_time, slot.end_time)
                    .await
                    .map_err(classify)?;
            created_slots.push(row);
        }

        tx.commit()
            .await
            .map_err(|e| classify(e.into()))?;

        tracing::debug!(
            "Consultation date created: id={}, date={}, slots={}",
            created.id,
            created.date,
            created_slots.len()
        );

        Ok(created.with_slots(created_slots))
    }
}

#[async_trait]
impl MedicalRecordStore for PgStore {
    async fn list_for_student(
        &self,
        student_id: &str,
        category: Option<RecordCategory>,
    ) -> ClinicResult<Vec<MedicalRecord>> {
        let rows = medical_record::get_medical_records_by_student_id(
            &self.pool,
            student_id,
            category.as_ref().map(RecordCategory::as_str),
        )
        .await
        .map_err(classify)?;

        rows.into_iter()
            .map(|row| MedicalRecord::try_from(row).map_err(ClinicError::Database))
            .collect()
    }
}
