//! Game clock: owns the current date and pause.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GameClock {
    pub date:   NaiveDate,
    pub paused: bool,
}

impl GameClock {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            paused: true,
        }
    }

    /// Advance one simulated day. Returns the new date.
    /// Panics if called while paused or past the end of the calendar.
    pub fn advance(&mut self) -> NaiveDate {
        assert!(!self.paused, "advance() called on paused clock");
        self.date = self
            .date
            .checked_add_days(Days::new(1))
            .unwrap_or_else(|| panic!("clock cannot advance past {}", self.date));
        self.date
    }

    /// Jump to any date, earlier or later. The history fills the gap.
    pub fn set_date(&mut self, date: NaiveDate) {
        self.date = date;
    }

    pub fn pause(&mut self)  { self.paused = true;  }
    pub fn resume(&mut self) { self.paused = false; }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advance_rolls_over_month_end() {
        let mut clock = GameClock::new(NaiveDate::from_ymd_opt(2020, 1, 31).unwrap());
        clock.resume();
        assert_eq!(clock.advance(), NaiveDate::from_ymd_opt(2020, 2, 1).unwrap());
    }

    #[test]
    #[should_panic(expected = "paused clock")]
    fn advance_while_paused_panics() {
        let mut clock = GameClock::new(NaiveDate::from_ymd_opt(2020, 1, 1).unwrap());
        clock.advance();
    }
}
