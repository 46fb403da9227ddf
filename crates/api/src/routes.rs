pub mod consultation;
pub mod health;
pub mod medical_record;
