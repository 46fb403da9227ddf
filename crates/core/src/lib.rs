//! # ClinicDesk Core
//!
//! Domain types shared by the store and the HTTP layer: consultation dates
//! and their time slots, student medical records, the caller identity
//! asserted upstream, and the error taxonomy.

pub mod auth;
pub mod errors;
pub mod models;
