use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    errors::{ClinicError, ClinicResult},
    models::time_slot::{NewTimeSlot, TimeSlot, TimeSlotInput},
};

pub const DUPLICATE_DATE_MESSAGE: &str = "Consultation date already exists";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsultationDate {
    pub id: Uuid,
    pub date: NaiveDate,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub time_slots: Vec<TimeSlot>,
}

/// Body of `POST /api/consultation/dates`.
///
/// Both fields are optional at the serde level so that a missing field is
/// reported by [`CreateConsultationDateRequest::validate`] rather than by the
/// JSON extractor.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateConsultationDateRequest {
    pub date: Option<String>,
    pub time_slots: Option<Vec<TimeSlotInput>>,
}

/// A validated create request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewConsultationDate {
    pub date: NaiveDate,
    pub time_slots: Vec<NewTimeSlot>,
}

impl CreateConsultationDateRequest {
    pub fn validate(&self) -> ClinicResult<NewConsultationDate> {
        let raw_date = self
            .date
            .as_deref()
            .filter(|d| !d.trim().is_empty())
            .ok_or_else(|| ClinicError::Validation("Invalid request data: missing date".into()))?;

        let date = parse_consultation_date(raw_date).ok_or_else(|| {
            ClinicError::Validation(format!("Invalid request data: bad date '{}'", raw_date))
        })?;

        let slots = match &self.time_slots {
            Some(slots) if !slots.is_empty() => slots,
            _ => {
                return Err(ClinicError::Validation(
                    "Invalid request data: at least one time slot is required".into(),
                ));
            }
        };

        let time_slots = slots
            .iter()
            .map(TimeSlotInput::validate)
            .collect::<ClinicResult<Vec<_>>>()?;

        Ok(NewConsultationDate { date, time_slots })
    }
}

/// Reads the calendar day out of a submitted date string.
///
/// Accepts a plain `YYYY-MM-DD` day or an RFC 3339 timestamp; timestamps are
/// normalised to UTC before the day is taken, so two submissions naming the
/// same instant always land on the same consultation date.
pub fn parse_consultation_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Some(date);
    }
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|dt| dt.with_timezone(&Utc).date_naive())
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsultationDatesResponse {
    pub consultation_dates: Vec<ConsultationDate>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateConsultationDateResponse {
    pub consultation_date: ConsultationDate,
}
