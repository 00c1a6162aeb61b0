//! Data types shared across the pipeline.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc, Weekday};
use serde::{Deserialize, Serialize};

/// One parsed line of the schedule export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleRecord {
    /// 1-based line number in the source document
    pub line: usize,
    /// Course group
    pub group: String,
    /// Course code, e.g. `CSI101`
    pub code: String,
    /// Section number
    pub section: String,
    /// Lab number
    pub lab: String,
    /// Course title as exported, possibly with a `*` marker
    pub title: String,
    /// Credit hours, kept verbatim
    pub credit: String,
    /// Instructor name(s)
    pub instructor: String,
    /// Raw meeting-time string, e.g. `Mon1,2Wed1,2`
    pub time: String,
    /// Raw location string, e.g. `ENG412`
    pub location: String,
    /// Withdrawal column, empty when the line was cut short
    pub withdrawal: String,
    /// Reference column, empty when the line was cut short
    pub reference: String,
}

/// Building table entry, keyed by `code`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationEntry {
    /// Building abbreviation used as a location prefix
    pub code: String,
    /// Human-readable building name
    pub name: String,
    /// Campus building number
    pub number: String,
}

/// First and last class dates of a term.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SemesterWindow {
    /// Academic year
    pub year: i32,
    /// 1 = spring, 2 = fall
    pub term: u32,
    /// First day of classes
    pub start_date: NaiveDate,
    /// Last day of classes, inclusive
    pub end_date: NaiveDate,
}

/// One weekday and its period list, taken from a meeting-time string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeetingSlot {
    /// Day the class meets on
    pub weekday: Weekday,
    /// Period numbers in the order listed, never empty
    pub periods: Vec<u32>,
}

/// Weekly recurrence on a single day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecurrenceRule {
    /// BYDAY weekday
    pub by_day: Weekday,
    /// Inclusive UNTIL instant
    pub until: DateTime<Utc>,
}

impl RecurrenceRule {
    /// Two-letter BYDAY code (`MO`, `TU`, ...).
    pub fn by_day_code(&self) -> String {
        weekday_code(self.by_day)
    }
}

impl fmt::Display for RecurrenceRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "FREQ=WEEKLY;UNTIL={};BYDAY={}",
            self.until.format("%Y%m%dT%H%M%SZ"),
            self.by_day_code()
        )
    }
}

/// First two letters of the weekday name, uppercased.
pub fn weekday_code(weekday: Weekday) -> String {
    weekday.to_string()[..2].to_uppercase()
}

/// One calendar event; produced per `MeetingSlot`, not per record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarEvent {
    /// Stable identifier, `code-section-lab-DAY-period@yonsei-ics`
    pub uid: String,
    /// Course title without the `*` marker
    pub title: String,
    /// `code-section-lab - instructor`
    pub description: String,
    /// Rendered location, or the raw text if the building is unknown
    pub location: String,
    /// First class, in UTC; falls on `recurrence.by_day`
    pub start: DateTime<Utc>,
    /// Length of each class
    pub duration_minutes: u32,
    /// Weekly repetition until the semester ends
    pub recurrence: RecurrenceRule,
    /// PRODID of the calendar the event belongs to
    pub product_id: String,
}

/// Non-fatal problems found while converting. Processing continues past all of them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Warning {
    /// No building code prefixes the location; it is kept raw
    UnresolvedLocation {
        /// Source line
        line: usize,
        /// Raw location text
        location: String,
    },
    /// The meeting-time field has no weekday group at all
    NoMeetingTime {
        /// Source line
        line: usize,
        /// Raw meeting-time text
        raw: String,
    },
    /// Part of the meeting-time field was skipped
    InvalidSlot {
        /// Source line
        line: usize,
        /// Skipped text, e.g. `Mon20` or `Tue`
        group: String,
        /// Why it was skipped
        reason: String,
    },
    /// Periods are not consecutive; the duration treats them as if they were
    NonContiguousPeriods {
        /// Source line
        line: usize,
        /// Periods as listed
        periods: Vec<u32>,
    },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnresolvedLocation { line, location } => {
                write!(f, "line {}: unknown building in location '{}'", line, location)
            }
            Self::NoMeetingTime { line, raw } => {
                write!(f, "line {}: no meeting time found in '{}'", line, raw)
            }
            Self::InvalidSlot {
                line,
                group,
                reason,
            } => write!(f, "line {}: skipped slot '{}': {}", line, group, reason),
            Self::NonContiguousPeriods { line, periods } => write!(
                f,
                "line {}: periods {:?} are not contiguous, duration assumes they are",
                line, periods
            ),
        }
    }
}

/// Result of converting a whole document.
#[derive(Debug, Clone, Default)]
pub struct Conversion {
    /// Events in input order
    pub events: Vec<CalendarEvent>,
    /// Warnings in the order they were found
    pub warnings: Vec<Warning>,
}

/// ICS generation options
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IcsOptions {
    /// Written as X-WR-CALNAME
    pub calendar_name: Option<String>,
    /// Written as X-WR-TIMEZONE; events themselves are in UTC
    pub timezone: Option<String>,
    /// Adds a display alarm this many minutes before each class
    pub reminder_minutes: Option<u32>,
    /// DTSTAMP for every event; `None` means the current time
    pub timestamp: Option<DateTime<Utc>>,
}

impl Default for IcsOptions {
    fn default() -> Self {
        Self {
            calendar_name: Some("Yonsei Course Schedule".to_string()),
            timezone: Some("Asia/Seoul".to_string()),
            reminder_minutes: None,
            timestamp: None,
        }
    }
}
