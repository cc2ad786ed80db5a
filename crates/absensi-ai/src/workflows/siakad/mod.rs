mod parser;

use self::parser::parse_rows;
use crate::workflows::attendance::domain::{AttendanceRecord, Student};
use std::collections::HashSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;

#[derive(Debug)]
pub enum AttendanceImportError {
    Io(std::io::Error),
    Csv(csv::Error),
}

impl std::fmt::Display for AttendanceImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AttendanceImportError::Io(err) => {
                write!(f, "failed to read SIAKAD export: {}", err)
            }
            AttendanceImportError::Csv(err) => write!(f, "invalid SIAKAD CSV data: {}", err),
        }
    }
}

impl std::error::Error for AttendanceImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AttendanceImportError::Io(err) => Some(err),
            AttendanceImportError::Csv(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for AttendanceImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for AttendanceImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

/// Attendance data lifted out of a SIAKAD export: the roster (deduplicated by
/// student id, first spelling wins) and the records in export order.
#[derive(Debug, Clone)]
pub struct AttendanceImport {
    pub students: Vec<Student>,
    pub records: Vec<AttendanceRecord>,
}

/// Reads the daily attendance CSV that SIAKAD produces (`NIS`, `Nama`,
/// `Tanggal`, `Status` columns) into the domain model.
pub struct SiakadAttendanceImporter;

impl SiakadAttendanceImporter {
    pub fn from_path(path: &Path) -> Result<AttendanceImport, AttendanceImportError> {
        let file = File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<AttendanceImport, AttendanceImportError> {
        let rows = parse_rows(reader)?;

        let mut seen_ids: HashSet<String> = HashSet::new();
        let mut students = Vec::new();
        let mut records = Vec::with_capacity(rows.len());

        for row in rows {
            if seen_ids.insert(row.student_id.clone()) {
                students.push(Student {
                    id: row.student_id.clone(),
                    name: row.name,
                });
            }
            records.push(AttendanceRecord {
                student_id: row.student_id,
                date_str: row.date_key,
                status: row.status,
            });
        }

        Ok(AttendanceImport { students, records })
    }
}
