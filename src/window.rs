//! Deal Windows

use jiff::{SignedDuration, Timestamp};
use thiserror::Error;

/// Shortest window a campaign may run for.
pub const MIN_WINDOW: SignedDuration = SignedDuration::from_hours(1);

/// Errors raised when a proposed window is malformed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum WindowError {
    /// The window ends at or before it starts.
    #[error("window must end after it starts")]
    Inverted,

    /// The window is shorter than [`MIN_WINDOW`].
    #[error("window of {duration:#} is shorter than the minimum of one hour")]
    TooShort {
        /// Length of the rejected window.
        duration: SignedDuration,
    },

    /// The window opens before the moment it was submitted.
    #[error("window starts at {start}, which is in the past")]
    InPast {
        /// Start of the rejected window.
        start: Timestamp,
    },
}

/// A closed time interval during which a campaign claims its products.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DealWindow {
    start: Timestamp,
    end: Timestamp,
}

impl DealWindow {
    /// Builds a window, enforcing ordering and the minimum length.
    ///
    /// # Errors
    ///
    /// Returns [`WindowError::Inverted`] when `end <= start` and [`WindowError::TooShort`] when
    /// the window is shorter than [`MIN_WINDOW`].
    pub fn new(start: Timestamp, end: Timestamp) -> Result<Self, WindowError> {
        if end <= start {
            return Err(WindowError::Inverted);
        }

        let duration = end.duration_since(start);

        if duration < MIN_WINDOW {
            return Err(WindowError::TooShort { duration });
        }

        Ok(Self { start, end })
    }

    /// Builds a window that has not yet opened at `now`.
    ///
    /// A window starting exactly at `now` is accepted. One that is already running is not: the
    /// clock activates campaigns, so a campaign cannot be created or edited into its own window.
    ///
    /// # Errors
    ///
    /// Returns any error from [`DealWindow::new`], or [`WindowError::InPast`] when the window
    /// starts before `now`.
    pub fn new_upcoming(
        start: Timestamp,
        end: Timestamp,
        now: Timestamp,
    ) -> Result<Self, WindowError> {
        let window = Self::new(start, end)?;

        if start < now {
            return Err(WindowError::InPast { start });
        }

        Ok(window)
    }

    /// Rebuilds a window from storage without re-checking the minimum length.
    ///
    /// Stored windows were validated when they were written.
    #[must_use]
    pub const fn from_stored(start: Timestamp, end: Timestamp) -> Self {
        Self { start, end }
    }

    /// Window start.
    #[must_use]
    pub const fn start(&self) -> Timestamp {
        self.start
    }

    /// Window end.
    #[must_use]
    pub const fn end(&self) -> Timestamp {
        self.end
    }

    /// Length of the window.
    #[must_use]
    pub fn duration(&self) -> SignedDuration {
        self.end.duration_since(self.start)
    }

    /// Whether two windows intersect.
    ///
    /// Both ends are inclusive, so windows that only touch at a boundary overlap.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start <= other.end && self.end >= other.start
    }

    /// Whether the window has opened at `now`.
    #[must_use]
    pub fn has_started(&self, now: Timestamp) -> bool {
        now >= self.start
    }

    /// Whether the window has closed at `now`.
    #[must_use]
    pub fn has_ended(&self, now: Timestamp) -> bool {
        now >= self.end
    }

    /// Whether `now` falls inside the window.
    #[must_use]
    pub fn contains(&self, now: Timestamp) -> bool {
        self.has_started(now) && !self.has_ended(now)
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    fn at(hours: i64) -> Timestamp {
        Timestamp::UNIX_EPOCH + SignedDuration::from_hours(hours)
    }

    fn window(start: i64, end: i64) -> Result<DealWindow, WindowError> {
        DealWindow::new(at(start), at(end))
    }

    #[test]
    fn rejects_inverted_window() {
        assert_eq!(window(5, 2), Err(WindowError::Inverted));
        assert_eq!(window(2, 2), Err(WindowError::Inverted));
    }

    #[test]
    fn rejects_window_shorter_than_an_hour() {
        let start = at(2);
        let end = start + SignedDuration::from_mins(59);

        assert_eq!(
            DealWindow::new(start, end),
            Err(WindowError::TooShort {
                duration: SignedDuration::from_mins(59)
            })
        );
    }

    #[test]
    fn accepts_exactly_one_hour() -> TestResult {
        let window = window(2, 3)?;

        assert_eq!(window.duration(), MIN_WINDOW);

        Ok(())
    }

    #[test]
    fn rejects_window_already_over() {
        let result = DealWindow::new_upcoming(at(1), at(3), at(4));

        assert_eq!(result, Err(WindowError::InPast { start: at(1) }));
    }

    #[test]
    fn rejects_window_already_running() {
        let result = DealWindow::new_upcoming(at(1), at(3), at(2));

        assert_eq!(result, Err(WindowError::InPast { start: at(1) }));
    }

    #[test]
    fn accepts_window_opening_now() -> TestResult {
        let window = DealWindow::new_upcoming(at(2), at(4), at(2))?;

        assert!(window.contains(at(2)));

        Ok(())
    }

    #[test]
    fn intersecting_windows_overlap() -> TestResult {
        let a = window(2, 5)?;
        let b = window(4, 6)?;

        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));

        Ok(())
    }

    #[test]
    fn touching_windows_overlap() -> TestResult {
        let a = window(2, 5)?;
        let b = window(5, 7)?;

        assert!(a.overlaps(&b), "shared boundary should count as overlap");
        assert!(b.overlaps(&a), "shared boundary should count as overlap");

        Ok(())
    }

    #[test]
    fn disjoint_windows_do_not_overlap() -> TestResult {
        let a = window(2, 5)?;
        let b = window(6, 8)?;

        assert!(!a.overlaps(&b));
        assert!(!b.overlaps(&a));

        Ok(())
    }

    #[test]
    fn contained_window_overlaps() -> TestResult {
        let outer = window(0, 10)?;
        let inner = window(3, 4)?;

        assert!(outer.overlaps(&inner));
        assert!(inner.overlaps(&outer));

        Ok(())
    }

    #[test]
    fn start_and_end_are_inclusive_and_exclusive() -> TestResult {
        let window = window(2, 5)?;

        assert!(!window.has_started(at(1)));
        assert!(window.has_started(at(2)));
        assert!(window.contains(at(2)));
        assert!(!window.contains(at(5)));
        assert!(window.has_ended(at(5)));

        Ok(())
    }
}
