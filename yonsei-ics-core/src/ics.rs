//! ICS (RFC 5545) serialization.

use chrono::Utc;

use crate::{CalendarEvent, DEFAULT_PRODUCT_ID, Error, IcsOptions, Result};

/// Longest content line in octets, excluding the CRLF
const MAX_LINE_OCTETS: usize = 75;

/// ICS calendar generator
pub struct IcsGenerator {
    options: IcsOptions,
}

impl IcsGenerator {
    /// Generator writing calendar-level properties from `options`
    pub fn new(options: IcsOptions) -> Self {
        Self { options }
    }

    /// Serialize `events` into a VCALENDAR document.
    ///
    /// Every event must carry the same product id; it becomes the calendar's PRODID.
    pub fn generate(&self, events: &[CalendarEvent]) -> Result<String> {
        let product_id = self.product_id(events)?;
        let mut ics_content = String::new();

        push_line(&mut ics_content, "BEGIN:VCALENDAR");
        push_line(&mut ics_content, "VERSION:2.0");
        push_line(&mut ics_content, &format!("PRODID:{}", product_id));
        push_line(&mut ics_content, "CALSCALE:GREGORIAN");
        push_line(&mut ics_content, "METHOD:PUBLISH");

        if let Some(ref name) = self.options.calendar_name {
            push_line(
                &mut ics_content,
                &format!("X-WR-CALNAME:{}", escape_text(name)),
            );
        }

        if let Some(ref timezone) = self.options.timezone {
            push_line(&mut ics_content, &format!("X-WR-TIMEZONE:{}", timezone));
        }

        let dtstamp = self
            .options
            .timestamp
            .unwrap_or_else(Utc::now)
            .format("%Y%m%dT%H%M%SZ")
            .to_string();

        for event in events {
            self.add_event(&mut ics_content, event, &dtstamp)?;
        }

        push_line(&mut ics_content, "END:VCALENDAR");

        tracing::debug!("Serialized {} events", events.len());
        Ok(ics_content)
    }

    fn product_id<'a>(&self, events: &'a [CalendarEvent]) -> Result<&'a str> {
        let Some(first) = events.first() else {
            return Ok(DEFAULT_PRODUCT_ID);
        };

        if first.product_id.trim().is_empty() {
            return Err(Error::Serialization("product id is empty".to_string()));
        }

        if let Some(other) = events.iter().find(|e| e.product_id != first.product_id) {
            return Err(Error::Serialization(format!(
                "mixed product ids '{}' and '{}'",
                first.product_id, other.product_id
            )));
        }

        Ok(&first.product_id)
    }

    fn add_event(
        &self,
        ics_content: &mut String,
        event: &CalendarEvent,
        dtstamp: &str,
    ) -> Result<()> {
        validate_event(event)?;

        push_line(ics_content, "BEGIN:VEVENT");
        push_line(ics_content, &format!("UID:{}", event.uid));
        push_line(ics_content, &format!("DTSTAMP:{}", dtstamp));
        push_line(
            ics_content,
            &format!("DTSTART:{}", event.start.format("%Y%m%dT%H%M%SZ")),
        );
        push_line(
            ics_content,
            &format!("DURATION:{}", format_duration(event.duration_minutes)),
        );
        push_line(ics_content, &format!("SUMMARY:{}", escape_text(&event.title)));

        if !event.location.is_empty() {
            push_line(
                ics_content,
                &format!("LOCATION:{}", escape_text(&event.location)),
            );
        }

        if !event.description.is_empty() {
            push_line(
                ics_content,
                &format!("DESCRIPTION:{}", escape_text(&event.description)),
            );
        }

        push_line(ics_content, &format!("RRULE:{}", event.recurrence));

        if let Some(reminder_minutes) = self.options.reminder_minutes {
            push_line(ics_content, "BEGIN:VALARM");
            push_line(ics_content, "ACTION:DISPLAY");
            push_line(
                ics_content,
                &format!("DESCRIPTION:{}", escape_text(&event.title)),
            );
            push_line(ics_content, &format!("TRIGGER:-PT{}M", reminder_minutes));
            push_line(ics_content, "END:VALARM");
        }

        push_line(ics_content, "END:VEVENT");

        Ok(())
    }
}

fn validate_event(event: &CalendarEvent) -> Result<()> {
    if event.title.trim().is_empty() {
        return Err(Error::Serialization(format!(
            "event {} has an empty title",
            event.uid
        )));
    }
    if event.uid.trim().is_empty() {
        return Err(Error::Serialization(format!(
            "event '{}' has an empty UID",
            event.title
        )));
    }
    if event.duration_minutes == 0 {
        return Err(Error::Serialization(format!(
            "event {} has a zero duration",
            event.uid
        )));
    }
    if event.recurrence.until < event.start {
        return Err(Error::Serialization(format!(
            "event {} repeats until {} which is before its start {}",
            event.uid, event.recurrence.until, event.start
        )));
    }
    Ok(())
}

/// Insert a blank line before every event block.
pub fn separate_events(document: &str) -> String {
    document.replace("\r\nBEGIN:VEVENT\r\n", "\r\n\r\nBEGIN:VEVENT\r\n")
}

/// `PT50M`, `PT1H50M`, `PT2H`
pub fn format_duration(minutes: u32) -> String {
    let (hours, minutes) = (minutes / 60, minutes % 60);
    match (hours, minutes) {
        (0, m) => format!("PT{}M", m),
        (h, 0) => format!("PT{}H", h),
        (h, m) => format!("PT{}H{}M", h, m),
    }
}

/// Escape ICS text values
pub fn escape_text(text: &str) -> String {
    text.replace('\\', "\\\\")
        .replace("\r\n", "\\n")
        .replace('\n', "\\n")
        .replace('\r', "\\n")
        .replace(',', "\\,")
        .replace(';', "\\;")
}

/// Append a content line, folding it at 75 octets without splitting a character.
fn push_line(ics_content: &mut String, line: &str) {
    let mut octets = 0;
    for ch in line.chars() {
        let len = ch.len_utf8();
        if octets + len > MAX_LINE_OCTETS {
            ics_content.push_str("\r\n ");
            octets = 1;
        }
        ics_content.push(ch);
        octets += len;
    }
    ics_content.push_str("\r\n");
}

#[cfg(test)]
mod tests;
