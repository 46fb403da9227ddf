use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::ClinicError;

/// The kind of record a student can browse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordCategory {
    Medical,
    Immunization,
    Lab,
}

impl RecordCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordCategory::Medical => "medical",
            RecordCategory::Immunization => "immunization",
            RecordCategory::Lab => "lab",
        }
    }
}

impl fmt::Display for RecordCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecordCategory {
    type Err = ClinicError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "medical" => Ok(RecordCategory::Medical),
            "immunization" => Ok(RecordCategory::Immunization),
            "lab" => Ok(RecordCategory::Lab),
            other => Err(ClinicError::Validation(format!(
                "Unknown record category '{}'",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MedicalRecord {
    pub id: Uuid,
    pub student_id: String,
    pub category: RecordCategory,
    pub form_type: String,
    pub notes: Option<String>,
    pub status: String,
    pub file_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl MedicalRecord {
    /// Case-insensitive substring match over the fields shown in a record
    /// listing. A blank query matches every record.
    pub fn matches(&self, query: &str) -> bool {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }

        [
            Some(self.form_type.as_str()),
            self.notes.as_deref(),
            Some(self.status.as_str()),
            self.department_name.as_deref(),
        ]
        .into_iter()
        .flatten()
        .any(|field| field.to_lowercase().contains(&needle))
    }
}

/// Keeps the records matching `query`, preserving their order.
pub fn filter_records(records: Vec<MedicalRecord>, query: Option<&str>) -> Vec<MedicalRecord> {
    match query {
        Some(q) => records.into_iter().filter(|r| r.matches(q)).collect(),
        None => records,
    }
}

/// Query string of `GET /api/medical/records`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MedicalRecordsQuery {
    pub category: Option<RecordCategory>,
    pub search: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MedicalRecordsResponse {
    pub records: Vec<MedicalRecord>,
}
