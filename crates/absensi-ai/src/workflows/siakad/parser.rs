use crate::workflows::attendance::domain::AttendanceStatus;
use chrono::{DateTime, NaiveDate};
use serde::Deserialize;
use std::io::Read;

#[derive(Debug)]
pub(crate) struct ImportedRow {
    pub(crate) student_id: String,
    pub(crate) name: String,
    pub(crate) date_key: String,
    pub(crate) status: AttendanceStatus,
}

pub(crate) fn parse_rows<R: Read>(reader: R) -> Result<Vec<ImportedRow>, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut rows = Vec::new();

    for record in csv_reader.deserialize::<SiakadRow>() {
        let row = record?;
        rows.push(ImportedRow {
            student_id: row.student_id,
            name: row.name,
            date_key: normalize_date(&row.date),
            status: normalize_status(&row.status),
        });
    }

    Ok(rows)
}

#[derive(Debug, Deserialize)]
struct SiakadRow {
    #[serde(rename = "NIS")]
    student_id: String,
    #[serde(rename = "Nama")]
    name: String,
    #[serde(rename = "Tanggal")]
    date: String,
    #[serde(rename = "Status")]
    status: String,
}

/// SIAKAD exports spell the tags inconsistently; map them onto the canonical
/// ones case-insensitively and keep anything else verbatim.
fn normalize_status(value: &str) -> AttendanceStatus {
    let trimmed = value.trim();
    match trimmed.to_ascii_lowercase().as_str() {
        "hadir" => AttendanceStatus::Hadir,
        "terlambat" => AttendanceStatus::Terlambat,
        "izin" => AttendanceStatus::Izin,
        "pulang" => AttendanceStatus::Pulang,
        _ => AttendanceStatus::Other(trimmed.to_string()),
    }
}

/// Canonicalize `Tanggal` to the `YYYY-MM-DD` key the summary filters on.
/// Unparseable values are kept verbatim; they will simply never match a
/// report date.
fn normalize_date(value: &str) -> String {
    let trimmed = value.trim();

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return date.format("%Y-%m-%d").to_string();
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return dt.date_naive().format("%Y-%m-%d").to_string();
    }

    trimmed.to_string()
}
