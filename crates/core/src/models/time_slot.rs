use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{ClinicError, ClinicResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSlot {
    pub id: Uuid,
    #[serde(with = "time_of_day")]
    pub start_time: NaiveTime,
    #[serde(with = "time_of_day")]
    pub end_time: NaiveTime,
    pub is_available: bool,
    pub consultation_date_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A slot descriptor as submitted by an administrator.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSlotInput {
    pub start_time: String,
    pub end_time: String,
}

/// A slot descriptor that has passed validation and is ready to insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewTimeSlot {
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

impl TimeSlotInput {
    pub fn validate(&self) -> ClinicResult<NewTimeSlot> {
        let start_time = time_of_day::parse(&self.start_time).ok_or_else(|| {
            ClinicError::Validation(format!("Invalid start time '{}'", self.start_time))
        })?;
        let end_time = time_of_day::parse(&self.end_time).ok_or_else(|| {
            ClinicError::Validation(format!("Invalid end time '{}'", self.end_time))
        })?;

        if end_time <= start_time {
            return Err(ClinicError::Validation(format!(
                "Time slot {} - {} must end after it starts",
                self.start_time, self.end_time
            )));
        }

        Ok(NewTimeSlot {
            start_time,
            end_time,
        })
    }
}

/// Serde adapter for wall-clock times written as `HH:MM` (or `HH:MM:SS`).
pub mod time_of_day {
    use chrono::{NaiveTime, Timelike};
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn parse(value: &str) -> Option<NaiveTime> {
        let value = value.trim();
        NaiveTime::parse_from_str(value, "%H:%M")
            .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M:%S"))
            .ok()
    }

    pub fn format(time: &NaiveTime) -> String {
        if time.second() == 0 {
            time.format("%H:%M").to_string()
        } else {
            time.format("%H:%M:%S").to_string()
        }
    }

    pub fn serialize<S>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&format(time))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).ok_or_else(|| de::Error::custom(format!("invalid time of day '{}'", raw)))
    }
}
