//! In-game time of day.

use std::{fmt, time::Duration};

const MINUTES_PER_DAY: u64 = 24 * 60;
const OPENING_MINUTE: u64 = 5 * 60;

/// Time of day on the gym floor. One real second is one game minute and the
/// day starts at 05:00.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct GameClock {
    elapsed: Duration,
}

impl GameClock {
    /// Creates a clock showing 05:00.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            elapsed: Duration::ZERO,
        }
    }

    /// Moves the clock forward by real simulation time.
    pub fn advance(&mut self, dt: Duration) {
        self.elapsed = self.elapsed.saturating_add(dt);
    }

    /// Real simulation time since the clock started.
    #[must_use]
    pub const fn elapsed(&self) -> Duration {
        self.elapsed
    }

    fn minute_of_day(&self) -> u64 {
        (OPENING_MINUTE + self.elapsed.as_secs()) % MINUTES_PER_DAY
    }

    /// Hour of the day, `0..24`.
    #[must_use]
    pub fn hour(&self) -> u32 {
        (self.minute_of_day() / 60) as u32
    }

    /// Minute of the hour, `0..60`.
    #[must_use]
    pub fn minute(&self) -> u32 {
        (self.minute_of_day() % 60) as u32
    }

    /// Reports whether the hour lies in `opening..closing`.
    #[must_use]
    pub fn is_open(&self, opening_hour: u32, closing_hour: u32) -> bool {
        let hour = self.hour();
        if opening_hour <= closing_hour {
            (opening_hour..closing_hour).contains(&hour)
        } else {
            hour >= opening_hour || hour < closing_hour
        }
    }

    /// Twelve-hour label such as `05:00 AM`.
    #[must_use]
    pub fn label(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for GameClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hour = self.hour();
        let suffix = if hour < 12 { "AM" } else { "PM" };
        let display_hour = match hour % 12 {
            0 => 12,
            other => other,
        };
        write!(f, "{display_hour:02}:{:02} {suffix}", self.minute())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(seconds: u64) -> GameClock {
        let mut clock = GameClock::new();
        clock.advance(Duration::from_secs(seconds));
        clock
    }

    #[test]
    fn starts_at_five_in_the_morning() {
        let clock = GameClock::new();
        assert_eq!((clock.hour(), clock.minute()), (5, 0));
        assert_eq!(clock.label(), "05:00 AM");
    }

    #[test]
    fn one_second_is_one_minute() {
        let clock = at(90);
        assert_eq!((clock.hour(), clock.minute()), (6, 30));
        assert_eq!(at(8 * 60 + 15).label(), "01:15 PM");
        assert_eq!(at(7 * 60).label(), "12:00 PM");
        assert_eq!(at(19 * 60 + 1).label(), "12:01 AM");
    }

    #[test]
    fn opening_hours_close_at_eleven() {
        assert!(at(0).is_open(5, 23));
        assert!(at(17 * 60 + 59).is_open(5, 23));
        assert!(!at(18 * 60).is_open(5, 23));
        assert!(at(18 * 60).is_open(22, 2));
    }
}
