//! Tab-separated schedule line parsing.

use crate::{Error, Result, ScheduleRecord};

/// Columns that must be present; withdrawal and reference may be cut off.
pub const REQUIRED_FIELDS: usize = 10;

/// Column order of the export. Index 4 is the syllabus button and is dropped.
const GROUP: usize = 0;
const CODE: usize = 1;
const SECTION: usize = 2;
const LAB: usize = 3;
const TITLE: usize = 5;
const CREDIT: usize = 6;
const INSTRUCTOR: usize = 7;
const TIME: usize = 8;
const LOCATION: usize = 9;
const WITHDRAWAL: usize = 10;
const REFERENCE: usize = 11;

impl ScheduleRecord {
    /// Parse one line of the export. `line` is the 1-based line number used in errors.
    pub fn parse_line(line: usize, text: &str) -> Result<Self> {
        let text = text.strip_suffix('\r').unwrap_or(text);
        let fields: Vec<&str> = text.split('\t').collect();

        if fields.len() < REQUIRED_FIELDS {
            return Err(Error::MalformedRecord {
                line,
                found: fields.len(),
                expected: REQUIRED_FIELDS,
            });
        }

        let field = |i: usize| fields.get(i).copied().unwrap_or_default().to_string();

        Ok(Self {
            line,
            group: field(GROUP),
            code: field(CODE),
            section: field(SECTION),
            lab: field(LAB),
            title: field(TITLE),
            credit: field(CREDIT),
            instructor: field(INSTRUCTOR),
            time: field(TIME),
            location: field(LOCATION),
            withdrawal: field(WITHDRAWAL),
            reference: field(REFERENCE),
        })
    }

    /// Title with the emphasis marker removed.
    pub fn display_title(&self) -> String {
        self.title.replace('*', "").trim().to_string()
    }

    /// `<code>-<section>-<lab> - <instructor>`
    pub fn description(&self) -> String {
        format!(
            "{}-{}-{} - {}",
            self.code, self.section, self.lab, self.instructor
        )
    }
}

/// Parse every non-blank line of a document.
///
/// A single trailing newline is ignored. The first malformed line aborts the parse.
pub fn parse_document(text: &str) -> Result<Vec<ScheduleRecord>> {
    let text = text
        .strip_suffix('\n')
        .map(|t| t.strip_suffix('\r').unwrap_or(t))
        .unwrap_or(text);

    let mut records = Vec::new();
    for (index, line) in text.split('\n').enumerate() {
        if line.trim().is_empty() {
            tracing::debug!("Skipping blank line {}", index + 1);
            continue;
        }
        records.push(ScheduleRecord::parse_line(index + 1, line)?);
    }

    tracing::debug!("Parsed {} schedule records", records.len());
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    const LINE: &str =
        "Major\tCSI101\t01\tA\t[Syllabus]\tIntro*\t3\tJ. Kim\tMon1,2\tENG412\tN\tEnglish";

    #[test]
    fn test_parse_full_line() {
        let record = ScheduleRecord::parse_line(1, LINE).unwrap();
        assert_eq!(record.group, "Major");
        assert_eq!(record.code, "CSI101");
        assert_eq!(record.section, "01");
        assert_eq!(record.lab, "A");
        assert_eq!(record.title, "Intro*");
        assert_eq!(record.credit, "3");
        assert_eq!(record.instructor, "J. Kim");
        assert_eq!(record.time, "Mon1,2");
        assert_eq!(record.location, "ENG412");
        assert_eq!(record.withdrawal, "N");
        assert_eq!(record.reference, "English");
    }

    #[test]
    fn test_syllabus_column_is_dropped() {
        let record = ScheduleRecord::parse_line(1, LINE).unwrap();
        let debug = format!("{:?}", record);
        assert!(!debug.contains("[Syllabus]"));
    }

    #[test]
    fn test_optional_trailing_columns() {
        let line = "Major\tCSI101\t01\tA\t\tIntro\t3\tJ. Kim\tMon1\tENG412";
        let record = ScheduleRecord::parse_line(4, line).unwrap();
        assert_eq!(record.line, 4);
        assert_eq!(record.withdrawal, "");
        assert_eq!(record.reference, "");
    }

    #[test]
    fn test_short_line_is_malformed() {
        let err = ScheduleRecord::parse_line(7, "Major\tCSI101\t01").unwrap_err();
        match err {
            Error::MalformedRecord {
                line,
                found,
                expected,
            } => {
                assert_eq!(line, 7);
                assert_eq!(found, 3);
                assert_eq!(expected, REQUIRED_FIELDS);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_column_count_boundary() {
        let nine = "Major\tCSI101\t01\tA\t\tIntro\t3\tJ. Kim\tMon1";
        assert!(matches!(
            ScheduleRecord::parse_line(2, nine),
            Err(Error::MalformedRecord {
                line: 2,
                found: 9,
                expected: REQUIRED_FIELDS,
            })
        ));

        let ten = format!("{nine}\tENG412");
        let record = ScheduleRecord::parse_line(2, &ten).unwrap();
        assert_eq!(record.time, "Mon1");
        assert_eq!(record.location, "ENG412");
        assert_eq!(record.withdrawal, "");
    }

    #[test]
    fn test_crlf_line() {
        let line = format!("{}\r", LINE);
        let record = ScheduleRecord::parse_line(1, &line).unwrap();
        assert_eq!(record.reference, "English");
    }

    #[test]
    fn test_title_and_description() {
        let record = ScheduleRecord::parse_line(1, LINE).unwrap();
        assert_eq!(record.display_title(), "Intro");
        assert_eq!(record.description(), "CSI101-01-A - J. Kim");
    }

    #[test]
    fn test_parse_document_skips_blank_lines() {
        let doc = format!("{}\n\n{}\n", LINE, LINE);
        let records = parse_document(&doc).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].line, 1);
        assert_eq!(records[1].line, 3);
    }

    #[test]
    fn test_parse_document_reports_line_number() {
        let doc = format!("{}\nbroken line\n", LINE);
        let err = parse_document(&doc).unwrap_err();
        assert!(matches!(err, Error::MalformedRecord { line: 2, .. }));
    }
}
