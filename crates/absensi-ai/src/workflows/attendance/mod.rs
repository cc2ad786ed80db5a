pub mod domain;
pub mod report;
mod summary;

pub use self::report::{AttendanceReportGenerator, ReportOutcome};
pub use self::summary::{DailyAttendanceSummary, SAMPLE_RECORD_LIMIT};
