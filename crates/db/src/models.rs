use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use clinicdesk_core::models::{
    consultation::ConsultationDate,
    medical_record::{MedicalRecord, RecordCategory},
    time_slot::TimeSlot,
};
use eyre::{eyre, Result};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbConsultationDate {
    pub id: Uuid,
    pub date: NaiveDate,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbTimeSlot {
    pub id: Uuid,
    pub consultation_date_id: Uuid,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub is_available: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbMedicalRecord {
    pub id: Uuid,
    pub student_id: String,
    pub category: String,
    pub form_type: String,
    pub notes: Option<String>,
    pub status: String,
    pub file_path: String,
    pub department_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DbConsultationDate {
    pub fn with_slots(self, slots: Vec<DbTimeSlot>) -> ConsultationDate {
        ConsultationDate {
            id: self.id,
            date: self.date,
            is_active: self.is_active,
            created_at: self.created_at,
            updated_at: self.updated_at,
            time_slots: slots.into_iter().map(TimeSlot::from).collect(),
        }
    }
}

impl From<DbTimeSlot> for TimeSlot {
    fn from(slot: DbTimeSlot) -> Self {
        TimeSlot {
            id: slot.id,
            start_time: slot.start_time,
            end_time: slot.end_time,
            is_available: slot.is_available,
            consultation_date_id: slot.consultation_date_id,
            created_at: slot.created_at,
            updated_at: slot.updated_at,
        }
    }
}

impl TryFrom<DbMedicalRecord> for MedicalRecord {
    type Error = eyre::Report;

    fn try_from(row: DbMedicalRecord) -> Result<Self> {
        let category = row
            .category
            .parse::<RecordCategory>()
            .map_err(|e| eyre!("medical record {} has bad category: {}", row.id, e))?;

        Ok(MedicalRecord {
            id: row.id,
            student_id: row.student_id,
            category,
            form_type: row.form_type,
            notes: row.notes,
            status: row.status,
            file_path: row.file_path,
            department_name: row.department_name,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}
