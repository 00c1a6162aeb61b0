use super::*;
use crate::RecurrenceRule;
use chrono::{TimeZone, Utc, Weekday};
use ical::parser::ical::{IcalParser, component::IcalEvent};
use std::io::BufReader;

fn sample_event() -> CalendarEvent {
    CalendarEvent {
        uid: "CSI101-01-A-MO-1@yonsei-ics".to_string(),
        title: "Intro".to_string(),
        description: "CSI101-01-A - J. Kim".to_string(),
        location: "(3) ENG412 - Engineering, Room 412".to_string(),
        start: Utc.with_ymd_and_hms(2019, 3, 4, 0, 0, 0).unwrap(),
        duration_minutes: 110,
        recurrence: RecurrenceRule {
            by_day: Weekday::Mon,
            until: Utc.with_ymd_and_hms(2019, 6, 19, 14, 59, 59).unwrap(),
        },
        product_id: DEFAULT_PRODUCT_ID.to_string(),
    }
}

fn fixed_options() -> IcsOptions {
    IcsOptions {
        timestamp: Some(Utc.with_ymd_and_hms(2019, 2, 1, 0, 0, 0).unwrap()),
        ..IcsOptions::default()
    }
}

fn property<'a>(event: &'a IcalEvent, name: &str) -> Option<&'a str> {
    event
        .properties
        .iter()
        .find(|prop| prop.name.eq_ignore_ascii_case(name))
        .and_then(|prop| prop.value.as_deref())
}

fn parse(ics_content: &str) -> Vec<IcalEvent> {
    let mut parser = IcalParser::new(BufReader::new(ics_content.as_bytes()));
    let calendar = parser
        .next()
        .expect("no calendar")
        .expect("failed to parse calendar");
    calendar.events
}

#[test]
fn test_generated_calendar_parses() {
    let generator = IcsGenerator::new(fixed_options());
    let mut second = sample_event();
    second.uid = "CSI101-01-A-WE-1@yonsei-ics".to_string();
    second.start = Utc.with_ymd_and_hms(2019, 3, 6, 0, 0, 0).unwrap();
    second.recurrence.by_day = Weekday::Wed;

    let ics_content = generator.generate(&[sample_event(), second]).unwrap();
    let events = parse(&ics_content);

    assert_eq!(events.len(), 2);
    let first = &events[0];
    assert_eq!(property(first, "SUMMARY"), Some("Intro"));
    assert_eq!(property(first, "DTSTART"), Some("20190304T000000Z"));
    assert_eq!(property(first, "DURATION"), Some("PT1H50M"));
    assert_eq!(property(first, "DTSTAMP"), Some("20190201T000000Z"));
    assert_eq!(
        property(first, "RRULE"),
        Some("FREQ=WEEKLY;UNTIL=20190619T145959Z;BYDAY=MO")
    );
    assert_eq!(
        property(&events[1], "RRULE"),
        Some("FREQ=WEEKLY;UNTIL=20190619T145959Z;BYDAY=WE")
    );
}

#[test]
fn test_calendar_header() {
    let ics_content = IcsGenerator::new(fixed_options())
        .generate(&[sample_event()])
        .unwrap();

    assert!(ics_content.starts_with("BEGIN:VCALENDAR\r\nVERSION:2.0\r\n"));
    assert!(ics_content.contains("PRODID:yonsei-cal/ics\r\n"));
    assert!(ics_content.contains("X-WR-CALNAME:Yonsei Course Schedule\r\n"));
    assert!(ics_content.contains("X-WR-TIMEZONE:Asia/Seoul\r\n"));
    assert!(ics_content.ends_with("END:VCALENDAR\r\n"));
}

#[test]
fn test_text_is_escaped() {
    let ics_content = IcsGenerator::new(fixed_options())
        .generate(&[sample_event()])
        .unwrap();

    assert!(ics_content.contains("LOCATION:(3) ENG412 - Engineering\\, Room 412\r\n"));
    assert_eq!(escape_text("a;b\\c\nd"), "a\\;b\\\\c\\nd");
}

#[test]
fn test_long_lines_are_folded() {
    let mut event = sample_event();
    event.description = "강의".repeat(40);

    let ics_content = IcsGenerator::new(fixed_options())
        .generate(&[event.clone()])
        .unwrap();

    for line in ics_content.split("\r\n") {
        assert!(line.len() <= MAX_LINE_OCTETS, "line too long: {line}");
    }

    let events = parse(&ics_content);
    assert_eq!(property(&events[0], "DESCRIPTION"), Some(event.description.as_str()));
}

#[test]
fn test_reminder() {
    let options = IcsOptions {
        reminder_minutes: Some(10),
        ..fixed_options()
    };
    let ics_content = IcsGenerator::new(options)
        .generate(&[sample_event()])
        .unwrap();

    assert!(ics_content.contains("BEGIN:VALARM\r\nACTION:DISPLAY\r\n"));
    assert!(ics_content.contains("TRIGGER:-PT10M\r\n"));
    assert_eq!(parse(&ics_content)[0].alarms.len(), 1);
}

#[test]
fn test_blank_line_before_each_event() {
    let ics_content = IcsGenerator::new(fixed_options())
        .generate(&[sample_event(), sample_event()])
        .unwrap();
    let separated = separate_events(&ics_content);

    assert_eq!(separated.matches("\r\n\r\nBEGIN:VEVENT\r\n").count(), 2);
    assert_eq!(separated.matches("BEGIN:VEVENT").count(), 2);
    assert!(!separated.contains("\r\n\r\n\r\n"));
}

#[test]
fn test_empty_calendar() {
    let ics_content = IcsGenerator::new(fixed_options()).generate(&[]).unwrap();
    assert!(ics_content.contains("PRODID:yonsei-cal/ics\r\n"));
    assert!(!ics_content.contains("BEGIN:VEVENT"));
}

#[test]
fn test_rejects_invalid_events() {
    let generator = IcsGenerator::new(fixed_options());

    let mut untitled = sample_event();
    untitled.title = " ".to_string();
    assert!(matches!(
        generator.generate(&[untitled]),
        Err(Error::Serialization(_))
    ));

    let mut instant = sample_event();
    instant.duration_minutes = 0;
    assert!(matches!(
        generator.generate(&[instant]),
        Err(Error::Serialization(_))
    ));

    let mut backwards = sample_event();
    backwards.recurrence.until = Utc.with_ymd_and_hms(2019, 1, 1, 0, 0, 0).unwrap();
    assert!(matches!(
        generator.generate(&[backwards]),
        Err(Error::Serialization(_))
    ));

    let mut other = sample_event();
    other.product_id = "other".to_string();
    assert!(matches!(
        generator.generate(&[sample_event(), other]),
        Err(Error::Serialization(_))
    ));
}

#[test]
fn test_format_duration() {
    assert_eq!(format_duration(50), "PT50M");
    assert_eq!(format_duration(110), "PT1H50M");
    assert_eq!(format_duration(120), "PT2H");
}
