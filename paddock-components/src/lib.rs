//! Pasture and farm carbon models
//!
//! This crate provides the numeric models for estimating pasture growth,
//! feed on offer, livestock methane and the farm carbon balance.
//!
//! # Module Organisation
//!
//! Components are organised by domain:
//! - `pasture`: response curves, soil water balance, daily growth, NDVI to
//!   biomass, grazing and moss corrections
//! - `farm`: per-plot aggregation, forecasts and historical comparison
//! - `livestock`: dry-matter intake, grazing pressure and methane
//! - `carbon`: primary production, soil-test carbon and the net balance
//!
//! # Parameters
//!
//! Each component has an associated parameters struct in the `parameters`
//! module with defaults for a temperate maritime sheep farm.

pub mod carbon;
pub mod constants;
pub mod farm;
pub mod livestock;
pub mod parameters;
pub mod pasture;
