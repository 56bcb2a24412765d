//! Daily arrival schedule and its validation.

use std::{fmt, time::Duration};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Hours of the day `start..end`, wrapping past midnight when `start > end`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Window {
    /// First hour inside the window.
    pub start: u32,
    /// First hour after the window.
    pub end: u32,
}

impl Window {
    /// Creates a window covering `start..end`.
    #[must_use]
    pub const fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    /// Reports whether the hour falls inside the window.
    #[must_use]
    pub fn contains(&self, hour: u32) -> bool {
        if self.start <= self.end {
            (self.start..self.end).contains(&hour)
        } else {
            hour >= self.start || hour < self.end
        }
    }
}

impl fmt::Display for Window {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}-{:02}", self.start, self.end)
    }
}

/// Inclusive range of visitors admitted by one wave.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ArrivalRange {
    /// Fewest visitors per wave.
    pub min: u32,
    /// Most visitors per wave.
    pub max: u32,
}

/// Kind of traffic expected at the current hour.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Traffic {
    /// Waves arrive on a fixed interval.
    Peak,
    /// Each interval rolls whether anyone comes in.
    OffPeak,
    /// No arrivals are scheduled.
    Quiet,
}

/// Reasons a [`WaveSchedule`] is rejected.
#[derive(Debug, Error, PartialEq)]
pub enum ScheduleError {
    /// An hour lies outside `0..24`.
    #[error("hour {hour} is not a time of day")]
    HourOutOfRange {
        /// Offending hour.
        hour: u32,
    },
    /// A window starts and ends on the same hour.
    #[error("window {window} covers no hours")]
    EmptyWindow {
        /// Offending window.
        window: Window,
    },
    /// Two windows claim the same hour.
    #[error("windows {first} and {second} overlap")]
    Overlap {
        /// Window declared first.
        first: Window,
        /// Window overlapping it.
        second: Window,
    },
    /// A wave admits nobody or its bounds are inverted.
    #[error("arrival range {min}..={max} is empty")]
    EmptyArrivalRange {
        /// Lower bound.
        min: u32,
        /// Upper bound.
        max: u32,
    },
    /// A wave interval is not a positive number of seconds.
    #[error("wave interval {seconds} s must be positive")]
    NonPositiveInterval {
        /// Offending interval.
        seconds: f32,
    },
}

/// When and how many visitors arrive over the day.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaveSchedule {
    /// Busy hours with regular waves.
    pub peaks: Vec<Window>,
    /// Quieter hours where each check may admit a few visitors.
    pub off_peak: Vec<Window>,
    /// Seconds between two peak waves.
    pub peak_interval_secs: f32,
    /// Visitors per peak wave.
    pub peak_arrivals: ArrivalRange,
    /// Seconds between two off-peak checks.
    pub off_peak_interval_secs: f32,
    /// Visitors per successful off-peak check.
    pub off_peak_arrivals: ArrivalRange,
    /// Largest number of visitors on the floor at once.
    pub population_cap: u32,
    /// Hour the doors open.
    pub opening_hour: u32,
    /// Hour the doors close.
    pub closing_hour: u32,
}

impl Default for WaveSchedule {
    fn default() -> Self {
        Self {
            peaks: vec![Window::new(5, 7), Window::new(13, 18), Window::new(21, 23)],
            off_peak: vec![Window::new(9, 13), Window::new(18, 21), Window::new(23, 5)],
            peak_interval_secs: 20.0,
            peak_arrivals: ArrivalRange { min: 1, max: 2 },
            off_peak_interval_secs: 20.0,
            off_peak_arrivals: ArrivalRange { min: 1, max: 4 },
            population_cap: 20,
            opening_hour: 5,
            closing_hour: 23,
        }
    }
}

impl WaveSchedule {
    /// Checks hours, windows, ranges and intervals for consistency.
    pub fn validate(&self) -> Result<(), ScheduleError> {
        for hour in [self.opening_hour, self.closing_hour] {
            check_hour(hour)?;
        }

        let windows: Vec<Window> = self.peaks.iter().chain(&self.off_peak).copied().collect();
        for window in &windows {
            check_hour(window.start)?;
            check_hour(window.end)?;
            if window.start == window.end {
                return Err(ScheduleError::EmptyWindow { window: *window });
            }
        }
        for (index, first) in windows.iter().enumerate() {
            for second in &windows[index + 1..] {
                if (0..24).any(|hour| first.contains(hour) && second.contains(hour)) {
                    return Err(ScheduleError::Overlap {
                        first: *first,
                        second: *second,
                    });
                }
            }
        }

        for range in [self.peak_arrivals, self.off_peak_arrivals] {
            if range.max == 0 || range.min > range.max {
                return Err(ScheduleError::EmptyArrivalRange {
                    min: range.min,
                    max: range.max,
                });
            }
        }
        for seconds in [self.peak_interval_secs, self.off_peak_interval_secs] {
            if !(seconds > 0.0 && seconds.is_finite()) {
                return Err(ScheduleError::NonPositiveInterval { seconds });
            }
        }
        Ok(())
    }

    /// Traffic expected at the provided hour.
    #[must_use]
    pub fn traffic(&self, hour: u32) -> Traffic {
        if self.peaks.iter().any(|window| window.contains(hour)) {
            Traffic::Peak
        } else if self.off_peak.iter().any(|window| window.contains(hour)) {
            Traffic::OffPeak
        } else {
            Traffic::Quiet
        }
    }

    /// Interval between two waves or checks of the given traffic.
    #[must_use]
    pub fn interval(&self, traffic: Traffic) -> Option<Duration> {
        let seconds = match traffic {
            Traffic::Peak => self.peak_interval_secs,
            Traffic::OffPeak => self.off_peak_interval_secs,
            Traffic::Quiet => return None,
        };
        Duration::try_from_secs_f32(seconds)
            .ok()
            .filter(|interval| !interval.is_zero())
    }

    /// Arrival bounds of the given traffic.
    #[must_use]
    pub fn arrivals(&self, traffic: Traffic) -> Option<ArrivalRange> {
        match traffic {
            Traffic::Peak => Some(self.peak_arrivals),
            Traffic::OffPeak => Some(self.off_peak_arrivals),
            Traffic::Quiet => None,
        }
    }
}

fn check_hour(hour: u32) -> Result<(), ScheduleError> {
    if hour < 24 {
        Ok(())
    } else {
        Err(ScheduleError::HourOutOfRange { hour })
    }
}
