//! Leave query window.
//!
//! Coffee teams are drawn for the coming working week, so only leaves taken
//! between the next Monday and the Friday after it count.

use chrono::{Datelike, Days, NaiveDate};

/// Monday-to-Friday range used to query leaves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LeaveWindow {
    /// First day of the window, always a Monday.
    pub monday: NaiveDate,
    /// Last day of the window, four days after `monday`.
    pub friday: NaiveDate,
}

impl LeaveWindow {
    /// Returns the window starting on the first Monday on or after `today`.
    ///
    /// # Example
    ///
    /// ```
    /// use coffee_teams::hr::LeaveWindow;
    /// use chrono::NaiveDate;
    ///
    /// // 2026-10-18 is a Sunday
    /// let window = LeaveWindow::starting_from(NaiveDate::from_ymd_opt(2026, 10, 18).unwrap());
    /// assert_eq!(window.monday, NaiveDate::from_ymd_opt(2026, 10, 19).unwrap());
    /// assert_eq!(window.friday, NaiveDate::from_ymd_opt(2026, 10, 23).unwrap());
    /// ```
    pub fn starting_from(today: NaiveDate) -> Self {
        let days_until_monday = (7 - today.weekday().num_days_from_monday()) % 7;
        let monday = today + Days::new(u64::from(days_until_monday));
        let friday = monday + Days::new(4);
        Self { monday, friday }
    }

    /// The `between,<start>,<end>` date filter understood by the HR service.
    pub fn to_filter(&self) -> String {
        format!(
            "between,{},{}",
            self.monday.format("%Y-%m-%d"),
            self.friday.format("%Y-%m-%d")
        )
    }
}
