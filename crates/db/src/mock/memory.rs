//! In-process store with the same observable rules as the Postgres schema:
//! one consultation date per day, slots must end after they start, and a
//! failed create leaves no trace.

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use clinicdesk_core::{
    errors::{ClinicError, ClinicResult},
    models::{
        consultation::{ConsultationDate, DUPLICATE_DATE_MESSAGE},
        medical_record::{MedicalRecord, RecordCategory},
        time_slot::{NewTimeSlot, TimeSlot},
    },
};
use eyre::eyre;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::store::{ConsultationStore, MedicalRecordStore};

#[derive(Default)]
struct Tables {
    consultation_dates: Vec<ConsultationDate>,
    medical_records: Vec<MedicalRecord>,
}

#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a fully-formed date as-is, slots included.
    pub async fn seed_consultation_date(&self, consultation_date: ConsultationDate) {
        self.tables
            .lock()
            .await
            .consultation_dates
            .push(consultation_date);
    }

    pub async fn seed_medical_record(&self, record: MedicalRecord) {
        self.tables.lock().await.medical_records.push(record);
    }

    /// Every stored date regardless of activity or age, slots included.
    pub async fn all_consultation_dates(&self) -> Vec<ConsultationDate> {
        self.tables.lock().await.consultation_dates.clone()
    }

    pub async fn slot_count(&self) -> usize {
        self.tables
            .lock()
            .await
            .consultation_dates
            .iter()
            .map(|d| d.time_slots.len())
            .sum()
    }
}

#[async_trait]
impl ConsultationStore for MemoryStore {
    async fn list_upcoming(&self, from: NaiveDate) -> ClinicResult<Vec<ConsultationDate>> {
        let tables = self.tables.lock().await;

        let mut dates: Vec<ConsultationDate> = tables
            .consultation_dates
            .iter()
            .filter(|d| d.is_active && d.date >= from)
            .cloned()
            .map(|mut d| {
                d.time_slots.retain(|s| s.is_available);
                d.time_slots.sort_by(|a, b| a.start_time.cmp(&b.start_time).then(a.id.cmp(&b.id)));
                d
            })
            .collect();
        dates.sort_by_key(|d| d.date);

        Ok(dates)
    }

    async fn find_by_date(&self, date: NaiveDate) -> ClinicResult<Option<ConsultationDate>> {
        let tables = self.tables.lock().await;
        Ok(tables
            .consultation_dates
            .iter()
            .find(|d| d.date == date)
            .cloned())
    }

    async fn create_with_slots(
        &self,
        date: NaiveDate,
        slots: Vec<NewTimeSlot>,
    ) -> ClinicResult<ConsultationDate> {
        // Holding the lock for the whole unit stands in for the transaction
        let mut tables = self.tables.lock().await;

        if tables.consultation_dates.iter().any(|d| d.date == date) {
            return Err(ClinicError::Conflict(DUPLICATE_DATE_MESSAGE.to_string()));
        }

        let now = Utc::now();
        let id = Uuid::new_v4();

        let mut time_slots = Vec::with_capacity(slots.len());
        for slot in slots {
            if slot.end_time <= slot.start_time {
                return Err(ClinicError::Database(eyre!(
                    "new row for relation \"time_slots\" violates check constraint \"valid_time_range\""
                )));
            }
            time_slots.push(TimeSlot {
                id: Uuid::new_v4(),
                start_time: slot.start_time,
                end_time: slot.end_time,
                is_available: true,
                consultation_date_id: id,
                created_at: now,
                updated_at: now,
            });
        }

        let created = ConsultationDate {
            id,
            date,
            is_active: true,
            created_at: now,
            updated_at: now,
            time_slots,
        };
        tables.consultation_dates.push(created.clone());

        Ok(created)
    }
}

#[async_trait]
impl MedicalRecordStore for MemoryStore {
    async fn list_for_student(
        &self,
        student_id: &str,
        category: Option<RecordCategory>,
    ) -> ClinicResult<Vec<MedicalRecord>> {
        let tables = self.tables.lock().await;

        let mut records: Vec<MedicalRecord> = tables
            .medical_records
            .iter()
            .filter(|r| r.student_id == student_id)
            .filter(|r| category.is_none_or(|c| r.category == c))
            .cloned()
            .collect();
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(records)
    }
}
