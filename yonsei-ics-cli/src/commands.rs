use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use yonsei_ics_core::prelude::*;

/// Parameters of the generate command
pub struct GenerateParams {
    pub input: PathBuf,
    pub output: Option<PathBuf>,
    pub year: Option<i32>,
    pub term: Option<u32>,
    pub locations: Option<PathBuf>,
    pub semesters: Option<PathBuf>,
    pub calendar_name: Option<String>,
    pub reminder_minutes: Option<u32>,
}

/// Convert a schedule export into an ICS file
pub fn generate_command(params: GenerateParams) -> Result<()> {
    let (year, term) = match (params.year, params.term) {
        (Some(year), Some(term)) => {
            tracing::info!("Using requested semester {}-{}", year, term);
            (year, term)
        }
        (year_opt, term_opt) => {
            let (detected_year, detected_term, semester_type) = SemesterDetector::detect_current();
            let year = year_opt.unwrap_or(detected_year);
            let term = term_opt.unwrap_or(detected_term);

            tracing::info!(
                "Detected semester {}-{} ({:?}), using {}-{}",
                detected_year,
                detected_term,
                semester_type,
                year,
                term
            );
            (year, term)
        }
    };

    let semester = load_semesters(params.semesters.as_deref())?
        .get(year, term)
        .context("Pass --semesters with a table that covers this term")?;
    let locations = match params.locations.as_deref() {
        Some(path) => load_locations(Some(path))?,
        None => {
            tracing::warn!("No --locations table given, locations are kept as exported");
            LocationManager::default()
        }
    };

    tracing::info!(
        "Semester {}-{} runs {} to {}",
        year,
        term,
        semester.start_date,
        semester.end_date
    );

    let output = params
        .output
        .unwrap_or_else(|| params.input.with_extension("ics"));

    let options = IcsOptions {
        calendar_name: params
            .calendar_name
            .or_else(|| Some(format!("Yonsei {} term {}", year, term))),
        reminder_minutes: params.reminder_minutes,
        ..IcsOptions::default()
    };

    let converter = Converter::new(locations, semester);
    let conversion = run(&params.input, &output, &converter, options)
        .with_context(|| format!("Failed to convert {}", params.input.display()))?;

    println!(
        "✓ Wrote {} events to {}",
        conversion.events.len(),
        output.display()
    );
    if !conversion.warnings.is_empty() {
        println!("⚠ {} warnings:", conversion.warnings.len());
        for warning in &conversion.warnings {
            println!("  {}", warning);
        }
    }

    Ok(())
}

/// List the building table
pub fn location_list_command(locations: Option<PathBuf>) -> Result<()> {
    let manager = load_locations(locations.as_deref())?;

    if manager.get_all_mappings().is_empty() {
        println!("No buildings loaded; pass --locations with a JSON table");
        return Ok(());
    }

    println!("Buildings:");
    for entry in manager.get_all_mappings() {
        println!("  {:<6} ({}) {}", entry.code, entry.number, entry.name);
    }

    Ok(())
}

/// Show how one raw location renders
pub fn location_resolve_command(locations: Option<PathBuf>, location: String) -> Result<()> {
    let manager = load_locations(locations.as_deref())?;

    println!("Raw location: {}", location);
    match manager.try_resolve(&location) {
        Some(resolved) => println!("Resolved: {}", resolved),
        None => println!("Unknown building, kept as: {}", location),
    }

    Ok(())
}

/// Write the building table to a JSON file
pub fn location_export_command(locations: Option<PathBuf>, file: PathBuf) -> Result<()> {
    let manager = load_locations(locations.as_deref())?;
    let json_content = manager.export_to_json()?;

    fs::write(&file, json_content)
        .with_context(|| format!("Failed to write {}", file.display()))?;
    println!("✓ Building table exported to {}", file.display());

    Ok(())
}

/// List semester windows
pub fn semesters_command(semesters: Option<PathBuf>) -> Result<()> {
    let table = load_semesters(semesters.as_deref())?;

    println!("Semesters:");
    for window in table.windows() {
        println!(
            "  {}-{}  {} .. {}",
            window.year, window.term, window.start_date, window.end_date
        );
    }

    Ok(())
}

fn load_locations(path: Option<&Path>) -> Result<LocationManager> {
    let Some(path) = path else {
        return Ok(LocationManager::default());
    };

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read building table {}", path.display()))?;
    let manager = LocationManager::from_json(&content)
        .with_context(|| format!("Invalid building table {}", path.display()))?;
    tracing::debug!(
        "Loaded {} buildings from {}",
        manager.get_all_mappings().len(),
        path.display()
    );
    Ok(manager)
}

fn load_semesters(path: Option<&Path>) -> Result<SemesterTable> {
    let Some(path) = path else {
        return Ok(SemesterTable::default());
    };

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read semester table {}", path.display()))?;
    let table = SemesterTable::from_json(&content)
        .with_context(|| format!("Invalid semester table {}", path.display()))?;
    tracing::debug!(
        "Loaded {} semesters from {}",
        table.windows().len(),
        path.display()
    );
    Ok(table)
}
