use async_trait::async_trait;
use chrono::NaiveDate;
use clinicdesk_core::{
    errors::ClinicResult,
    models::{
        consultation::ConsultationDate,
        medical_record::{MedicalRecord, RecordCategory},
        time_slot::NewTimeSlot,
    },
};
use mockall::mock;

use crate::store::{ConsultationStore, MedicalRecordStore};

// Mock stores for failure injection in tests
mock! {
    pub ConsultationStore {}

    #[async_trait]
    impl ConsultationStore for ConsultationStore {
        async fn list_upcoming(&self, from: NaiveDate) -> ClinicResult<Vec<ConsultationDate>>;

        async fn find_by_date(&self, date: NaiveDate) -> ClinicResult<Option<ConsultationDate>>;

        async fn create_with_slots(
            &self,
            date: NaiveDate,
            slots: Vec<NewTimeSlot>,
        ) -> ClinicResult<ConsultationDate>;
    }
}

mock! {
    pub MedicalRecordStore {}

    #[async_trait]
    impl MedicalRecordStore for MedicalRecordStore {
        async fn list_for_student(
            &self,
            student_id: &str,
            category: Option<RecordCategory>,
        ) -> ClinicResult<Vec<MedicalRecord>>;
    }
}
