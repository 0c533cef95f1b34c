use chrono::{DateTime, Duration, Utc};

/// A simple clock abstraction for deterministic time in services and tests.
#[derive(Debug, Clone, Copy, Default)]
pub enum Clock {
    #[default]
    Default,
    Fixed(DateTime<Utc>),
}

impl Clock {
    /// Returns a clock fixed at the given timestamp.
    #[must_use]
    pub fn fixed(at: DateTime<Utc>) -> Self {
        Self::Fixed(at)
    }

    /// Returns the current time according to the clock.
    #[must_use]
    pub fn now(&self) -> DateTime<Utc> {
        match self {
            Clock::Default => Utc::now(),
            Clock::Fixed(t) => *t,
        }
    }

    /// If this is a fixed clock, advance it by the given duration.
    ///
    /// Has no effect on `Clock::Default`.
    pub fn advance(&mut self, delta: Duration) {
        if let Clock::Fixed(t) = self {
            *t += delta;
        }
    }
}

/// Humanized distance from `then` to `now`, e.g. `"3 hours ago"`.
///
/// Buckets follow the usual relative-time conventions: under 45 seconds is
/// "a few seconds", under 90 seconds "a minute", under 45 minutes a minute
/// count, and so on up to years. Times in the future read as `"in ..."`.
#[must_use]
pub fn from_now(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let delta = now.signed_duration_since(then);
    let phrase = humanize(delta.num_seconds().unsigned_abs());
    if delta < Duration::zero() {
        format!("in {phrase}")
    } else {
        format!("{phrase} ago")
    }
}

fn humanize(seconds: u64) -> String {
    let minutes = (seconds + 30) / 60;
    let hours = (minutes + 30) / 60;
    let days = (hours + 12) / 24;
    let months = (days * 100 + 1_522) / 3_044;
    let years = (days * 100 + 18_262) / 36_525;

    match seconds {
        0..45 => "a few seconds".to_owned(),
        45..90 => "a minute".to_owned(),
        _ if minutes < 45 => format!("{minutes} minutes"),
        _ if minutes < 90 => "an hour".to_owned(),
        _ if hours < 22 => format!("{hours} hours"),
        _ if hours < 36 => "a day".to_owned(),
        _ if days < 26 => format!("{days} days"),
        _ if days < 46 => "a month".to_owned(),
        _ if days < 320 => format!("{months} months"),
        _ if days < 548 => "a year".to_owned(),
        _ => format!("{years} years"),
    }
}

/// Deterministic timestamp for tests and examples (2023-11-14T22:13:20Z).
pub const FIXED_TEST_TIMESTAMP: i64 = 1_700_000_000;

/// Returns a deterministic `DateTime<Utc>` for tests and doc examples.
///
/// # Panics
///
/// Panics if the fixed timestamp cannot be represented.
#[must_use]
pub fn fixed_now() -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(FIXED_TEST_TIMESTAMP, 0)
        .expect("fixed timestamp should be valid")
}

/// Returns a `Clock` fixed at the deterministic test timestamp.
#[must_use]
pub fn fixed_clock() -> Clock {
    Clock::fixed(fixed_now())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ago(delta: Duration) -> String {
        let now = fixed_now();
        from_now(now - delta, now)
    }

    #[test]
    fn relative_time_buckets() {
        assert_eq!(ago(Duration::seconds(10)), "a few seconds ago");
        assert_eq!(ago(Duration::seconds(60)), "a minute ago");
        assert_eq!(ago(Duration::minutes(5)), "5 minutes ago");
        assert_eq!(ago(Duration::minutes(50)), "an hour ago");
        assert_eq!(ago(Duration::hours(3)), "3 hours ago");
        assert_eq!(ago(Duration::hours(30)), "a day ago");
        assert_eq!(ago(Duration::days(2)), "2 days ago");
        assert_eq!(ago(Duration::days(30)), "a month ago");
        assert_eq!(ago(Duration::days(400)), "a year ago");
        assert_eq!(ago(Duration::days(800)), "2 years ago");
    }

    #[test]
    fn future_times_read_forward() {
        let now = fixed_now();
        assert_eq!(from_now(now + Duration::hours(2), now), "in 2 hours");
    }

    #[test]
    fn fixed_clock_advances() {
        let mut clock = fixed_clock();
        clock.advance(Duration::hours(1));
        assert_eq!(clock.now(), fixed_now() + Duration::hours(1));

        let mut real = Clock::default();
        real.advance(Duration::hours(1));
        assert!(matches!(real, Clock::Default));
    }
}
