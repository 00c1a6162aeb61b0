//! Meeting-time strings such as `Mon1,2Wed3,4,5`.
//!
//! Each `<weekday><period list>` group becomes one [`MeetingSlot`]. Period `p`
//! starts at `p + 8` o'clock local time and lasts 50 minutes; consecutive
//! periods run back to back, so every extra period adds an hour.

use std::sync::LazyLock;

use chrono::{DateTime, Datelike, Duration, NaiveDate, TimeZone, Utc, Weekday};
use chrono_tz::Tz;
use regex::Regex;
use thiserror::Error;

use crate::{Error, MeetingSlot, RecurrenceRule, Result, SemesterWindow};

/// Length of a single period in minutes
pub const PERIOD_MINUTES: u32 = 50;
/// Added to a period number to get its start hour
pub const PERIOD_HOUR_OFFSET: u32 = 8;
/// Last period that still starts before midnight
pub const MAX_PERIOD: u32 = 23 - PERIOD_HOUR_OFFSET;

static TIME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([A-Za-z]{3})([0-9,]+)").unwrap());

/// Why a weekday group was not turned into a slot.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SlotError {
    /// The three letters are not a weekday abbreviation
    #[error("'{0}' is not a weekday")]
    UnknownWeekday(String),

    /// Only commas followed the weekday
    #[error("no period numbers")]
    NoPeriods,

    /// A period number is zero, too large or not a number
    #[error("period '{0}' is outside 1..={max}", max = MAX_PERIOD)]
    InvalidPeriod(String),

    /// Text outside every `<weekday><periods>` group
    #[error("not a weekday followed by periods")]
    Unrecognized,
}

/// One `<weekday><periods>` match, before validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotMatch<'a> {
    /// Whole matched text, e.g. `Mon1,2`
    pub text: &'a str,
    /// Three-letter weekday, e.g. `Mon`
    pub weekday: &'a str,
    /// Comma-separated period list, e.g. `1,2`
    pub periods: &'a str,
}

/// Scan `raw` for weekday groups. Calling it again starts a fresh scan.
pub fn scan(raw: &str) -> impl Iterator<Item = SlotMatch<'_>> {
    TIME_RE.captures_iter(raw).filter_map(|caps| {
        Some(SlotMatch {
            text: caps.get(0)?.as_str(),
            weekday: caps.get(1)?.as_str(),
            periods: caps.get(2)?.as_str(),
        })
    })
}

/// Trimmed pieces of `raw` outside every weekday group that still hold
/// letters or digits, e.g. the `Tue` of `Mon1,2Tue`.
pub fn leftovers(raw: &str) -> Vec<&str> {
    let mut pieces = Vec::new();
    let mut last = 0;
    for m in TIME_RE.find_iter(raw) {
        pieces.push(&raw[last..m.start()]);
        last = m.end();
    }
    pieces.push(&raw[last..]);

    pieces
        .into_iter()
        .map(str::trim)
        .filter(|piece| piece.chars().any(char::is_alphanumeric))
        .collect()
}

/// Parse every weekday group of `raw`, yielding the match text with the outcome.
pub fn parse_slots(
    raw: &str,
) -> impl Iterator<Item = (&str, std::result::Result<MeetingSlot, SlotError>)> {
    scan(raw).map(|m| (m.text, MeetingSlot::from_match(&m)))
}

impl MeetingSlot {
    fn from_match(m: &SlotMatch<'_>) -> std::result::Result<Self, SlotError> {
        let weekday: Weekday = m
            .weekday
            .parse()
            .map_err(|_| SlotError::UnknownWeekday(m.weekday.to_string()))?;

        let periods = m
            .periods
            .split(',')
            .filter(|p| !p.is_empty())
            .map(|p| match p.parse::<u32>() {
                Ok(n) if (1..=MAX_PERIOD).contains(&n) => Ok(n),
                _ => Err(SlotError::InvalidPeriod(p.to_string())),
            })
            .collect::<std::result::Result<Vec<_>, _>>()?;

        if periods.is_empty() {
            return Err(SlotError::NoPeriods);
        }

        Ok(Self { weekday, periods })
    }

    /// Local start hour, taken from the first listed period.
    pub fn start_hour(&self) -> u32 {
        self.periods[0] + PERIOD_HOUR_OFFSET
    }

    /// 50 minutes plus an hour for each further period.
    ///
    /// The list is assumed contiguous; see [`is_contiguous`](Self::is_contiguous).
    pub fn duration_minutes(&self) -> u32 {
        let extra = u32::try_from(self.periods.len().saturating_sub(1)).unwrap_or(u32::MAX);
        PERIOD_MINUTES.saturating_add(extra.saturating_mul(60))
    }

    /// Whether the periods ascend by exactly one.
    pub fn is_contiguous(&self) -> bool {
        self.periods.windows(2).all(|w| w[1] == w[0] + 1)
    }

    /// Earliest date on or after `semester_start` that falls on this slot's weekday.
    pub fn first_date(&self, semester_start: NaiveDate) -> NaiveDate {
        let target = self.weekday.num_days_from_monday();
        let current = semester_start.weekday().num_days_from_monday();
        let days_to_add = (7 + target - current) % 7;

        semester_start + Duration::days(i64::from(days_to_add))
    }

    /// UTC instant of the first class of the semester.
    pub fn first_start(&self, window: &SemesterWindow, tz: Tz) -> Result<DateTime<Utc>> {
        let date = self.first_date(window.start_date);
        let local = date
            .and_hms_opt(self.start_hour(), 0, 0)
            .ok_or_else(|| Error::Timezone(format!("{} {}:00", date, self.start_hour())))?;

        to_utc(tz, local)
    }

    /// Weekly on this weekday until the end of the semester's last day.
    pub fn recurrence(&self, window: &SemesterWindow, tz: Tz) -> Result<RecurrenceRule> {
        let last = window
            .end_date
            .and_hms_opt(23, 59, 59)
            .ok_or_else(|| Error::Timezone(window.end_date.to_string()))?;

        Ok(RecurrenceRule {
            by_day: self.weekday,
            until: to_utc(tz, last)?,
        })
    }
}

fn to_utc(tz: Tz, local: chrono::NaiveDateTime) -> Result<DateTime<Utc>> {
    tz.from_local_datetime(&local)
        .single()
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(|| Error::Timezone(local.to_string()))
}
