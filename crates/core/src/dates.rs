use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::entity::Item;
use crate::error::CoreError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRange {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
}

/// How much of a date its id spells out; the shortest form that is still
/// unique within the range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateIdFormat {
    Day,
    MonthDay,
    Full,
}

impl DateIdFormat {
    fn pattern(&self) -> &'static str {
        match self {
            Self::Day => "%d",
            Self::MonthDay => "%m-%d",
            Self::Full => "%Y-%m-%d",
        }
    }
}

impl DateRange {
    pub fn new(start_date: NaiveDate, end_date: NaiveDate) -> Result<Self, CoreError> {
        if end_date < start_date {
            return Err(CoreError::InvalidRange);
        }
        Ok(Self {
            start_date: Some(start_date),
            end_date: Some(end_date),
        })
    }

    /// Parses `YYYY-MM-DD` bounds as typed into the date range form.
    pub fn parse(start: &str, end: &str) -> Result<Self, CoreError> {
        let parse = |s: &str| {
            NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
                .map_err(|_| CoreError::InvalidDate(s.to_string()))
        };
        Self::new(parse(start)?, parse(end)?)
    }

    fn bounds(&self) -> Option<(NaiveDate, NaiveDate)> {
        match (self.start_date, self.end_date) {
            (Some(start), Some(end)) if start <= end => Some((start, end)),
            _ => None,
        }
    }

    pub fn id_format(&self) -> DateIdFormat {
        match self.bounds() {
            Some((start, end)) if start.year() != end.year() => DateIdFormat::Full,
            Some((start, end)) if start.month() != end.month() => DateIdFormat::MonthDay,
            _ => DateIdFormat::Day,
        }
    }

    /// Every day in the range, inclusive. Empty when a bound is missing or reversed.
    pub fn days(&self) -> Vec<NaiveDate> {
        match self.bounds() {
            Some((start, end)) => start.iter_days().take_while(|d| *d <= end).collect(),
            None => Vec::new(),
        }
    }

    pub fn date_id(&self, date: NaiveDate) -> String {
        date.format(self.id_format().pattern()).to_string()
    }

    /// The date items for this range, regenerated on every load, undo and redo.
    pub fn derive_items(&self) -> Vec<Item> {
        let format = self.id_format();
        self.days()
            .into_iter()
            .map(|d| {
                Item::new(
                    d.format(format.pattern()).to_string(),
                    d.format("%a").to_string(),
                )
            })
            .collect()
    }
}
