//! Date helper functions

use chrono::NaiveDate;

/// Get a coarse relative date (like "3 weeks ago") as seen from `today`
pub fn relative_date(date: NaiveDate, today: NaiveDate) -> String {
    let days = today.signed_duration_since(date).num_days();

    if days < 0 {
        "Upcoming".to_string()
    } else if days == 0 {
        "Today".to_string()
    } else if days == 1 {
        "Yesterday".to_string()
    } else if days < 7 {
        format!("{} days ago", days)
    } else if days < 30 {
        format!("{} weeks ago", days / 7)
    } else if days < 365 {
        format!("{} months ago", days / 30)
    } else {
        format!("{} years ago", days / 365)
    }
}

/// Format date in full format (like "January 15, 2024")
pub fn full_date(date: NaiveDate) -> String {
    date.format("%B %-d, %Y").to_string()
}
