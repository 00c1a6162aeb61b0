//! Semester windows and term detection.

use chrono::{DateTime, Datelike, Local, NaiveDate, Utc};

use crate::{Error, Result, SemesterWindow};

/// Term of the academic year
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SemesterType {
    /// Spring term (term 1): March to June
    Spring = 1,
    /// Fall term (term 2): September to December
    Fall = 2,
}

impl SemesterType {
    /// Term number to type; only 1 and 2 exist
    pub fn from_term(term: u32) -> Result<Self> {
        match term {
            1 => Ok(Self::Spring),
            2 => Ok(Self::Fall),
            _ => Err(Error::Config(format!(
                "Invalid term {}: only 1 (spring) and 2 (fall) are supported",
                term
            ))),
        }
    }
}

/// Picks the term a date belongs to.
pub struct SemesterDetector;

impl SemesterDetector {
    /// Term for today's local date
    ///
    /// Returns `(year, term, type)`, e.g. `(2019, 1, SemesterType::Spring)`.
    pub fn detect_current() -> (i32, u32, SemesterType) {
        let now = Local::now();
        Self::detect_from_date(now.with_timezone(&Utc))
    }

    /// Term for `date`: months 1 to 7 are spring, the rest fall
    pub fn detect_from_date(date: DateTime<Utc>) -> (i32, u32, SemesterType) {
        let year = date.year();

        match date.month() {
            // January and February still export next spring's schedule
            1..=7 => (year, 1, SemesterType::Spring),
            _ => (year, 2, SemesterType::Fall),
        }
    }
}

/// Known semester windows, keyed by `(year, term)`.
#[derive(Debug, Clone)]
pub struct SemesterTable {
    windows: Vec<SemesterWindow>,
}

impl SemesterTable {
    /// Empty table
    pub fn new() -> Self {
        Self {
            windows: Vec::new(),
        }
    }

    /// Load windows from a JSON array of `{year, term, start_date, end_date}` objects
    pub fn from_json(json_data: &str) -> Result<Self> {
        let windows: Vec<SemesterWindow> = serde_json::from_str(json_data)?;
        let mut table = Self::new();
        for window in windows {
            table.insert(window)?;
        }
        Ok(table)
    }

    /// Add or replace a window. Rejects windows that end before they start.
    pub fn insert(&mut self, window: SemesterWindow) -> Result<()> {
        SemesterType::from_term(window.term)?;
        if window.end_date < window.start_date {
            return Err(Error::Config(format!(
                "Semester {}-{} ends ({}) before it starts ({})",
                window.year, window.term, window.end_date, window.start_date
            )));
        }

        match self
            .windows
            .iter_mut()
            .find(|w| w.year == window.year && w.term == window.term)
        {
            Some(existing) => *existing = window,
            None => self.windows.push(window),
        }
        Ok(())
    }

    /// Window for `year`/`term`
    pub fn get(&self, year: i32, term: u32) -> Result<SemesterWindow> {
        self.windows
            .iter()
            .find(|w| w.year == year && w.term == term)
            .copied()
            .ok_or_else(|| Error::SemesterNotFound {
                year,
                term,
                known: self.known_terms(),
            })
    }

    /// `2019-1, 2019-2, ...`, or `none`
    fn known_terms(&self) -> String {
        if self.windows.is_empty() {
            return "none".to_string();
        }
        self.windows
            .iter()
            .map(|w| format!("{}-{}", w.year, w.term))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Windows in insertion order
    pub fn windows(&self) -> &[SemesterWindow] {
        &self.windows
    }
}

/// Built-in windows: 2019 spring through 2020 fall.
impl Default for SemesterTable {
    fn default() -> Self {
        let mut table = Self::new();

        for (year, term, start, end) in [
            (2019, 1, (3, 4), (6, 19)),
            (2019, 2, (9, 2), (12, 20)),
            (2020, 1, (3, 16), (6, 26)),
            (2020, 2, (9, 1), (12, 21)),
        ] {
            if let (Some(start_date), Some(end_date)) = (
                NaiveDate::from_ymd_opt(year, start.0, start.1),
                NaiveDate::from_ymd_opt(year, end.0, end.1),
            ) {
                table.windows.push(SemesterWindow {
                    year,
                    term,
                    start_date,
                    end_date,
                });
            }
        }

        table
    }
}
