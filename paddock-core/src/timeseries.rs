//! Date ranges and daily weather series.
//!
//! Weather arrives from the collaborator as an unordered list of days that may
//! contain gaps. [`WeatherSeries`] indexes it by calendar date so that the
//! growth fold can walk a [`DateRange`] in order and detect missing days.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

pub type FloatValue = f64;

/// An inclusive range of calendar dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// The `days` days ending on (and including) `end`.
    pub fn trailing(end: NaiveDate, days: u32) -> Self {
        let span = i64::from(days.max(1)) - 1;
        Self {
            start: end - chrono::Duration::days(span),
            end,
        }
    }

    /// Iterate over every date in the range in ascending order.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let end = self.end;
        self.start.iter_days().take_while(move |d| *d <= end)
    }

    /// Number of dates in the range. Zero if `end` is before `start`.
    pub fn len(&self) -> usize {
        if self.end < self.start {
            0
        } else {
            (self.end - self.start).num_days() as usize + 1
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// One day of weather for the farm.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeatherDay {
    pub date: NaiveDate,
    /// unit: °C
    pub temp_mean_c: FloatValue,
    /// unit: °C
    pub temp_max_c: FloatValue,
    /// unit: °C
    pub temp_min_c: FloatValue,
    /// unit: mm
    pub precip_mm: FloatValue,
    /// Reference evapotranspiration
    /// unit: mm
    pub et0_mm: FloatValue,
}

/// Daily weather indexed by date.
///
/// Later records for the same date replace earlier ones.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeatherSeries {
    days: BTreeMap<NaiveDate, WeatherDay>,
}

impl WeatherSeries {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, day: WeatherDay) {
        self.days.insert(day.date, day);
    }

    pub fn get(&self, date: &NaiveDate) -> Option<&WeatherDay> {
        self.days.get(date)
    }

    /// All days in date order.
    pub fn iter(&self) -> impl Iterator<Item = &WeatherDay> {
        self.days.values()
    }

    /// Days that fall within `range`, in date order.
    pub fn range(&self, range: &DateRange) -> impl Iterator<Item = &WeatherDay> {
        let range = *range;
        self.days
            .values()
            .skip_while(move |day| day.date < range.start)
            .take_while(move |day| day.date <= range.end)
    }

    /// Dates in `range` with no weather record.
    pub fn missing_dates(&self, range: &DateRange) -> Vec<NaiveDate> {
        range
            .days()
            .filter(|date| !self.days.contains_key(date))
            .collect()
    }

    /// Calendar years with at least one record.
    pub fn years(&self) -> BTreeSet<i32> {
        self.days.keys().map(|d| d.year()).collect()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.days.keys().next().copied()
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.days.keys().next_back().copied()
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }
}

impl FromIterator<WeatherDay> for WeatherSeries {
    fn from_iter<T: IntoIterator<Item = WeatherDay>>(iter: T) -> Self {
        let mut series = WeatherSeries::new();
        for day in iter {
            series.insert(day);
        }
        series
    }
}
