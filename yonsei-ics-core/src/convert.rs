//! Record-to-event conversion and the file-level run.

use std::{fs, io::Write, path::Path};

use tempfile::NamedTempFile;

use crate::{
    CalendarEvent, Conversion, DEFAULT_PRODUCT_ID, DEFAULT_TIMEZONE, Error, IcsOptions, Result,
    ScheduleRecord, SemesterWindow, Warning,
    ics::{IcsGenerator, separate_events},
    location::LocationManager,
    meeting::{SlotError, leftovers, parse_slots},
    record::parse_document,
    types::weekday_code,
};

/// Turns schedule records into calendar events for one semester.
///
/// The period clock always runs in [`DEFAULT_TIMEZONE`]; every class starts
/// between 09:00 and 23:00 there, which keeps the UTC start on the same
/// weekday as BYDAY.
pub struct Converter {
    locations: LocationManager,
    semester: SemesterWindow,
    product_id: String,
}

impl Converter {
    /// Converter for `semester` using the given building table
    pub fn new(locations: LocationManager, semester: SemesterWindow) -> Self {
        Self {
            locations,
            semester,
            product_id: DEFAULT_PRODUCT_ID.to_string(),
        }
    }

    /// Override the PRODID stamped on every event
    pub fn with_product_id(mut self, product_id: impl Into<String>) -> Self {
        self.product_id = product_id.into();
        self
    }

    /// Events for a single record, one per meeting slot.
    ///
    /// Problems that only affect this record are pushed onto `warnings`.
    pub fn convert_record(
        &self,
        record: &ScheduleRecord,
        warnings: &mut Vec<Warning>,
    ) -> Result<Vec<CalendarEvent>> {
        let location = self.location_text(record, warnings);
        let title = record.display_title();
        let description = record.description();

        let mut events = Vec::new();
        let mut found_group = false;

        for (group, parsed) in parse_slots(&record.time) {
            found_group = true;

            let slot = match parsed {
                Ok(slot) => slot,
                Err(e) => {
                    warn(
                        warnings,
                        Warning::InvalidSlot {
                            line: record.line,
                            group: group.to_string(),
                            reason: e.to_string(),
                        },
                    );
                    continue;
                }
            };

            if !slot.is_contiguous() {
                warn(
                    warnings,
                    Warning::NonContiguousPeriods {
                        line: record.line,
                        periods: slot.periods.clone(),
                    },
                );
            }

            events.push(CalendarEvent {
                uid: format!(
                    "{}-{}-{}-{}-{}@yonsei-ics",
                    record.code,
                    record.section,
                    record.lab,
                    weekday_code(slot.weekday),
                    slot.periods[0]
                ),
                title: title.clone(),
                description: description.clone(),
                location: location.clone(),
                start: slot.first_start(&self.semester, DEFAULT_TIMEZONE)?,
                duration_minutes: slot.duration_minutes(),
                recurrence: slot.recurrence(&self.semester, DEFAULT_TIMEZONE)?,
                product_id: self.product_id.clone(),
            });
        }

        if !found_group {
            warn(
                warnings,
                Warning::NoMeetingTime {
                    line: record.line,
                    raw: record.time.clone(),
                },
            );
            return Ok(events);
        }

        for piece in leftovers(&record.time) {
            warn(
                warnings,
                Warning::InvalidSlot {
                    line: record.line,
                    group: piece.to_string(),
                    reason: SlotError::Unrecognized.to_string(),
                },
            );
        }

        Ok(events)
    }

    fn location_text(&self, record: &ScheduleRecord, warnings: &mut Vec<Warning>) -> String {
        if record.location.trim().is_empty() {
            return String::new();
        }

        self.locations
            .try_resolve(&record.location)
            .unwrap_or_else(|| {
                warn(
                    warnings,
                    Warning::UnresolvedLocation {
                        line: record.line,
                        location: record.location.clone(),
                    },
                );
                record.location.clone()
            })
    }

    /// Convert records in order, collecting every warning.
    pub fn convert_records(&self, records: &[ScheduleRecord]) -> Result<Conversion> {
        let mut conversion = Conversion::default();

        for record in records {
            let events = self.convert_record(record, &mut conversion.warnings)?;
            tracing::debug!(
                "Line {} ({}) produced {} events",
                record.line,
                record.code,
                events.len()
            );
            conversion.events.extend(events);
        }

        Ok(conversion)
    }

    /// Parse and convert a whole tab-separated document
    pub fn convert_str(&self, text: &str) -> Result<Conversion> {
        let records = parse_document(text)?;
        self.convert_records(&records)
    }
}

fn warn(warnings: &mut Vec<Warning>, warning: Warning) {
    tracing::warn!("{}", warning);
    warnings.push(warning);
}

/// Serialize the events and separate each event block with a blank line.
pub fn render(conversion: &Conversion, options: IcsOptions) -> Result<String> {
    let generator = IcsGenerator::new(options);
    let document = generator.generate(&conversion.events)?;
    Ok(separate_events(&document))
}

/// Read `input`, convert it and write the calendar to `output`.
///
/// The output is written to a uniquely named temporary file in the same
/// directory and renamed into place, so a failed run leaves any existing
/// `output` untouched.
pub fn run(
    input: &Path,
    output: &Path,
    converter: &Converter,
    options: IcsOptions,
) -> Result<Conversion> {
    tracing::info!("Reading schedule from {}", input.display());
    let text = fs::read_to_string(input).map_err(|e| Error::io(input, e))?;

    let conversion = converter.convert_str(&text)?;
    let document = render(&conversion, options)?;

    write_atomically(output, &document)?;
    tracing::info!(
        "Wrote {} events to {} ({} warnings)",
        conversion.events.len(),
        output.display(),
        conversion.warnings.len()
    );

    Ok(conversion)
}

fn write_atomically(output: &Path, contents: &str) -> Result<()> {
    let dir = match output.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(dir).map_err(|e| Error::io(dir, e))?;
    tmp.write_all(contents.as_bytes())
        .map_err(|e| Error::io(tmp.path(), e))?;

    // Dropping the temporary file on failure removes it
    tmp.persist(output).map_err(|e| Error::io(output, e.error))?;
    Ok(())
}
