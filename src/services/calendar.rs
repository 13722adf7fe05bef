use chrono::{Datelike, NaiveDate, Weekday};

use crate::{
    error::{WarehouseError, WarehouseResult},
    models::DateRow,
};

/// Every calendar day from `start` to `end` inclusive, ascending.
pub fn enumerate_dates(start: NaiveDate, end: NaiveDate) -> WarehouseResult<Vec<NaiveDate>> {
    if start > end {
        return Err(WarehouseError::InvalidDateRange { start, end });
    }
    Ok(start.iter_days().take_while(|day| *day <= end).collect())
}

/// `dim_date` key for a day: the ISO `YYYY-MM-DD` string.
pub fn date_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

pub fn date_row(date: NaiveDate) -> DateRow {
    DateRow {
        date_key: date_key(date),
        year: date.year(),
        quarter: (date.month() - 1) / 3 + 1,
        month: date.month(),
        month_name: date.format("%B").to_string(),
        week_of_year: date.iso_week().week(),
        day_of_month: date.day(),
        day_name: date.format("%A").to_string(),
        is_weekend: matches!(date.weekday(), Weekday::Sat | Weekday::Sun),
    }
}
