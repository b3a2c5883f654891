//! Core types for pasture growth and farm carbon estimation.
//!
//! This crate holds the plain data the models exchange, the error type, and
//! the traits that external collaborators (weather, soil survey, satellite,
//! farm management) implement. The models themselves live in
//! `paddock-components`.

pub mod errors;
pub mod livestock;
pub mod observation;
pub mod season;
pub mod services;
pub mod soil;
pub mod timeseries;
pub mod vegetation;
