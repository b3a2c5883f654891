//! Satellite compositing windows.
//!
//! Cloud cover over the Pacific Northwest varies sharply by season, so the
//! window used to build a cloud-free NDVI composite does too. Short summer
//! windows track growth closely; long winter windows are needed to find any
//! clear pixels at all.

use chrono::{Datelike, NaiveDate};
use paddock_core::timeseries::{DateRange, FloatValue};

/// Composite window length for a composite ending on `date`.
///
/// Jun-Sep: 21 days. Nov-Feb: 45 days. Otherwise 30.
pub fn adaptive_window_days(date: NaiveDate) -> u32 {
    match date.month() {
        6..=9 => 21,
        11 | 12 | 1 | 2 => 45,
        _ => 30,
    }
}

/// The composite window ending on `date`.
pub fn composite_window(date: NaiveDate) -> DateRange {
    DateRange::trailing(date, adaptive_window_days(date))
}

/// Minimum cloud-free pixel percentage accepted for a window.
///
/// Longer windows accept a lower percentage since they merge more scenes.
pub fn minimum_cloud_free_pct(window_days: u32) -> FloatValue {
    if window_days <= 21 {
        30.0
    } else if window_days <= 30 {
        20.0
    } else {
        10.0
    }
}
