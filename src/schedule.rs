//! Reading schedule rows from the input CSV.
//!
//! The header row is pre-checked for the six required columns before any
//! record is parsed: a malformed table aborts the run up front, while a
//! malformed *row* is only discovered later and skipped by the importer.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};

use classcal_core::{ScheduleError, ScheduleRow};

pub const REQUIRED_COLUMNS: [&str; 6] = [
    "Course Name",
    "Course Code",
    "Day",
    "Start Time",
    "End Time",
    "Location",
];

/// Read and pre-check the schedule CSV at `path`.
pub fn read_rows(path: &Path) -> Result<Vec<ScheduleRow>> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open CSV file at {}", path.display()))?;
    parse_rows(file).with_context(|| format!("Failed to read CSV file at {}", path.display()))
}

/// Parse schedule rows from any reader (the CSV file, or a string in tests).
pub fn parse_rows<R: Read>(reader: R) -> Result<Vec<ScheduleRow>> {
    let mut csv_reader = csv::Reader::from_reader(reader);

    // Spreadsheet exports often carry a UTF-8 BOM on the first header
    let headers: Vec<String> = csv_reader
        .headers()
        .context("Failed to read CSV headers")?
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').trim().to_string())
        .collect();

    let missing: Vec<&str> = REQUIRED_COLUMNS
        .iter()
        .filter(|required| !headers.iter().any(|h| h == *required))
        .copied()
        .collect();

    if !missing.is_empty() {
        return Err(ScheduleError::MissingColumn(missing.join(", ")).into());
    }

    let column_index = |name: &str| headers.iter().position(|h| h == name).unwrap_or(usize::MAX);
    let name_idx = column_index("Course Name");
    let code_idx = column_index("Course Code");
    let day_idx = column_index("Day");
    let start_idx = column_index("Start Time");
    let end_idx = column_index("End Time");
    let location_idx = column_index("Location");

    let field = |record: &csv::StringRecord, idx: usize| {
        record.get(idx).unwrap_or("").trim().to_string()
    };

    let mut rows = Vec::new();
    for record in csv_reader.records() {
        let record = record.context("Failed to read CSV record")?;
        rows.push(ScheduleRow {
            course_name: field(&record, name_idx),
            course_code: field(&record, code_idx),
            day: field(&record, day_idx),
            start_time: field(&record, start_idx),
            end_time: field(&record, end_idx),
            location: field(&record, location_idx),
        });
    }

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    const GOOD_CSV: &str = "\
Course Name,Course Code,Day,Start Time,End Time,Location
Data Structures,CS201,Wednesday,10:00 AM,11:30 AM,Room 204
Physics Lab,PHY150,Friday,2:00 PM,5:00 PM,Lab B
";

    #[test]
    fn parses_trimmed_rows() {
        let rows = parse_rows(GOOD_CSV.as_bytes()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].course_code, "CS201");
        assert_eq!(rows[1].start_time, "2:00 PM");
    }

    #[test]
    fn strips_utf8_bom_from_first_header() {
        let csv = format!("\u{feff}{}", GOOD_CSV);
        let rows = parse_rows(csv.as_bytes()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].course_name, "Data Structures");
    }

    #[test]
    fn missing_column_aborts_before_rows() {
        let csv = "\
Course Name,Course Code,Day,Start Time,End Time
Data Structures,CS201,Wednesday,10:00 AM,11:30 AM
";
        let err = parse_rows(csv.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("Location"));
    }

    #[test]
    fn reordered_columns_are_fine() {
        let csv = "\
Location,Day,Course Code,Course Name,End Time,Start Time
Room 204,Wednesday,CS201,Data Structures,11:30 AM,10:00 AM
";
        let rows = parse_rows(csv.as_bytes()).unwrap();
        assert_eq!(rows[0].location, "Room 204");
        assert_eq!(rows[0].start_time, "10:00 AM");
    }

    #[test]
    fn whitespace_in_fields_is_trimmed() {
        let csv = "\
Course Name,Course Code,Day,Start Time,End Time,Location
  Data Structures ,CS201, Wednesday ,10:00 AM,11:30 AM,Room 204
";
        let rows = parse_rows(csv.as_bytes()).unwrap();
        assert_eq!(rows[0].course_name, "Data Structures");
        assert_eq!(rows[0].day, "Wednesday");
    }
}
