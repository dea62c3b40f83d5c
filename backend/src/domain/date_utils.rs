use chrono::{Local, NaiveDate};

/// Today's local date as `YYYY-MM-DD`
pub fn today_iso() -> String {
    format_iso(Local::now().date_naive())
}

pub fn format_iso(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}
