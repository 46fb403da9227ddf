pub mod consultation_date;
pub mod medical_record;
pub mod time_slot;
