mod date_range;
mod favorite;

pub use date_range::DateRange;
pub use favorite::FavoriteRecord;

use chrono::{DateTime, SubsecRound, Utc};

/// Current time truncated to the millisecond precision records are stored with
pub fn now_millis() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}

/// Convert DateTime<Utc> to Unix timestamp (milliseconds)
pub fn datetime_to_timestamp_millis(datetime: &DateTime<Utc>) -> i64 {
    datetime.timestamp_millis()
}
