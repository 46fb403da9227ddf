pub mod consultation;
pub mod medical_record;
