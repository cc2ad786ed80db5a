use super::domain::{AttendanceRecord, AttendanceStatus, Student};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::HashSet;

/// Upper bound on the records embedded in the prompt to ground the model.
pub const SAMPLE_RECORD_LIMIT: usize = 15;

/// Statistical summary of one calendar day, recomputed from scratch on every
/// call. Field names are the JSON contract embedded in the report prompt.
#[derive(Debug, Clone, Serialize)]
pub struct DailyAttendanceSummary {
    pub total_students: usize,
    pub attendance_count: usize,
    pub late_count: usize,
    pub permission_count: usize,
    pub checkout_count: usize,
    pub date: String,
    pub sample_records: Vec<AttendanceRecord>,
}

impl DailyAttendanceSummary {
    /// Derive the summary for `date`.
    ///
    /// `attendance_count` counts distinct student ids with a present-type
    /// record that day; the remaining counts are raw record counts.
    /// `sample_records` is the prefix of that day's records in input order.
    pub fn for_date(records: &[AttendanceRecord], students: &[Student], date: NaiveDate) -> Self {
        let date_key = date.format("%Y-%m-%d").to_string();
        let day_records: Vec<&AttendanceRecord> = records
            .iter()
            .filter(|record| record.date_str == date_key)
            .collect();

        let present_ids: HashSet<&str> = day_records
            .iter()
            .filter(|record| record.status.is_present())
            .map(|record| record.student_id.as_str())
            .collect();

        let count_status = |status: AttendanceStatus| {
            day_records
                .iter()
                .filter(|record| record.status == status)
                .count()
        };
        let late_count = count_status(AttendanceStatus::Terlambat);
        let permission_count = count_status(AttendanceStatus::Izin);
        let checkout_count = count_status(AttendanceStatus::Pulang);

        Self {
            total_students: students.len(),
            attendance_count: present_ids.len(),
            late_count,
            permission_count,
            checkout_count,
            date: date_key,
            sample_records: day_records
                .into_iter()
                .take(SAMPLE_RECORD_LIMIT)
                .cloned()
                .collect(),
        }
    }
}
