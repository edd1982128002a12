use chrono::{DateTime, Datelike, Duration, Timelike, Utc};

/// Calendar-style breakdown of an elapsed duration, measured from the epoch
/// (so "months" are real calendar months of 1970).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LengthParts {
    pub years: i64,
    pub months: i64,
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
}

pub fn length_parts(elapsed: Duration) -> LengthParts {
    let millis = elapsed.num_milliseconds().max(0);
    let Some(dt) = DateTime::<Utc>::from_timestamp_millis(millis) else {
        return LengthParts::default();
    };
    LengthParts {
        years: i64::from(dt.year() - 1970),
        months: i64::from(dt.month0()),
        days: i64::from(dt.day0()),
        hours: i64::from(dt.hour()),
        minutes: i64::from(dt.minute()),
        seconds: i64::from(dt.second()),
    }
}

fn plural(n: i64, unit: &str) -> Option<String> {
    match n {
        0 => None,
        1 => Some(format!("1 {unit}")),
        n => Some(format!("{n} {unit}s")),
    }
}

/// e.g. `1 year 2 months 3 days`
pub fn format_follow_age(elapsed: Duration) -> String {
    let p = length_parts(elapsed);
    let parts: Vec<String> = [
        plural(p.years, "year"),
        plural(p.months, "month"),
        plural(p.days, "day"),
    ]
    .into_iter()
    .flatten()
    .collect();

    if parts.is_empty() {
        "less than a day".to_string()
    } else {
        parts.join(" ")
    }
}

/// e.g. `2 hours 5 minutes 10 seconds`
pub fn format_uptime(elapsed: Duration) -> String {
    let p = length_parts(elapsed);
    // days0 rolls over at month boundaries; uptime never gets near that.
    let parts: Vec<String> = [
        plural(p.days, "day"),
        plural(p.hours, "hour"),
        plural(p.minutes, "minute"),
        plural(p.seconds, "second"),
    ]
    .into_iter()
    .flatten()
    .collect();

    if parts.is_empty() {
        "0 seconds".to_string()
    } else {
        parts.join(" ")
    }
}
