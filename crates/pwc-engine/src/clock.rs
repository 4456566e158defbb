//! Status and solve timer shared by every puzzle kind.
//!
//! The invariant kept here is that `last_start_time` is set if and only if
//! the status is `Solving`. All transitions go through [`SolveClock`], and
//! callers supply `now` so the engine never reads the system clock.

use crate::error::EngineError;
use chrono::{DateTime, Utc};
use pwc_types::{SolveDuration, Status};
use serde::{Deserialize, Serialize};

/// Status plus timer, flattened into each kind's state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolveClock {
    pub status: Status,
    pub last_start_time: Option<DateTime<Utc>>,
    pub total_solve_duration: SolveDuration,
}

impl SolveClock {
    /// A clock for a freshly selected puzzle.
    #[must_use]
    pub fn selected() -> Self {
        Self {
            status: Status::Selected,
            ..Self::default()
        }
    }

    /// Starts, pauses or resumes the solve.
    ///
    /// | From | To |
    /// |------|----|
    /// | `Selected`, `Paused` | `Solving` (timer starts) |
    /// | `Solving` | `Paused` (elapsed time accumulated) |
    ///
    /// # Errors
    ///
    /// [`EngineError::NoPuzzleSelected`] from `Created`,
    /// [`EngineError::AlreadyComplete`] from `Complete`.
    pub fn toggle(&mut self, now: DateTime<Utc>) -> Result<Status, EngineError> {
        match self.status {
            Status::Created => return Err(EngineError::NoPuzzleSelected),
            Status::Complete => return Err(EngineError::AlreadyComplete),
            Status::Selected | Status::Paused => {
                self.status = Status::Solving;
                self.last_start_time = Some(now);
            }
            Status::Solving => {
                self.stop(now);
                self.status = Status::Paused;
            }
        }
        Ok(self.status)
    }

    /// Fails unless answers may be applied right now.
    ///
    /// # Errors
    ///
    /// [`EngineError::NotSolving`] carrying the current status.
    pub fn ensure_solving(&self) -> Result<(), EngineError> {
        if self.status.is_solving() {
            Ok(())
        } else {
            Err(EngineError::NotSolving(self.status))
        }
    }

    /// Marks the solve complete and stops the timer.
    pub fn complete(&mut self, now: DateTime<Utc>) {
        self.stop(now);
        self.status = Status::Complete;
    }

    /// Total solve time including the currently running stretch.
    #[must_use]
    pub fn elapsed(&self, now: DateTime<Utc>) -> SolveDuration {
        let mut total = self.total_solve_duration;
        if let Some(start) = self.last_start_time {
            total += (now - start).to_std().unwrap_or_default();
        }
        total
    }

    fn stop(&mut self, now: DateTime<Utc>) {
        if let Some(start) = self.last_start_time.take() {
            // A clock that went backwards contributes nothing.
            self.total_solve_duration += (now - start).to_std().unwrap_or_default();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn selected_to_solving_starts_timer() {
        let mut clock = SolveClock::selected();
        assert_eq!(clock.toggle(t0()).unwrap(), Status::Solving);
        assert_eq!(clock.last_start_time, Some(t0()));
        assert!(clock.total_solve_duration.is_zero());
    }

    #[test]
    fn pause_accumulates_and_resume_restarts() {
        let mut clock = SolveClock::selected();
        clock.toggle(t0()).unwrap();
        assert_eq!(clock.toggle(t0() + Duration::seconds(90)).unwrap(), Status::Paused);
        assert!(clock.last_start_time.is_none());
        assert_eq!(clock.total_solve_duration.to_string(), "1m30s");

        let resume = t0() + Duration::hours(1);
        assert_eq!(clock.toggle(resume).unwrap(), Status::Solving);
        assert_eq!(clock.last_start_time, Some(resume));
        assert_eq!(
            clock.elapsed(resume + Duration::seconds(30)).to_string(),
            "2m0s"
        );
    }

    #[test]
    fn toggle_errors() {
        let mut created = SolveClock::default();
        assert_eq!(created.toggle(t0()), Err(EngineError::NoPuzzleSelected));

        let mut complete = SolveClock {
            status: Status::Complete,
            ..SolveClock::default()
        };
        assert_eq!(complete.toggle(t0()), Err(EngineError::AlreadyComplete));
    }

    #[test]
    fn complete_stops_timer() {
        let mut clock = SolveClock::selected();
        clock.toggle(t0()).unwrap();
        clock.complete(t0() + Duration::seconds(5));
        assert_eq!(clock.status, Status::Complete);
        assert!(clock.last_start_time.is_none());
        assert_eq!(clock.total_solve_duration, SolveDuration::from_secs(5));
    }

    #[test]
    fn ensure_solving_reports_status() {
        let clock = SolveClock::selected();
        assert_eq!(
            clock.ensure_solving(),
            Err(EngineError::NotSolving(Status::Selected))
        );
    }

    #[test]
    fn backwards_clock_adds_nothing() {
        let mut clock = SolveClock::selected();
        clock.toggle(t0()).unwrap();
        clock.toggle(t0() - Duration::seconds(10)).unwrap();
        assert!(clock.total_solve_duration.is_zero());
    }

    #[test]
    fn missing_fields_deserialize_to_defaults() {
        let clock: SolveClock = serde_json::from_str("{}").unwrap();
        assert_eq!(clock, SolveClock::default());

        let clock: SolveClock =
            serde_json::from_str(r#"{"status":"paused","total_solve_duration":"2h12m9s"}"#)
                .unwrap();
        assert_eq!(clock.status, Status::Paused);
        assert_eq!(clock.total_solve_duration, SolveDuration::from_secs(7929));
    }
}
