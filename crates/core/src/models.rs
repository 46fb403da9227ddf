pub mod consultation;
pub mod medical_record;
pub mod time_slot;
