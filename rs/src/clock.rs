//! Wall-clock access for the seasonal and meal-time bonuses

use chrono::{Datelike, Local, NaiveDateTime, Timelike};

use crate::models::{MealTime, Season};

/// Source of the current local date and time.
///
/// The engine reads the clock once per ranking call, so everything else it
/// computes is a pure function of its inputs.
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;

    fn season(&self) -> Season {
        Season::from_month(self.now().month())
    }

    fn meal_time(&self) -> MealTime {
        MealTime::from_hour(self.now().hour())
    }
}

/// Reads the host's local time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// Always reports the same instant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub NaiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}
