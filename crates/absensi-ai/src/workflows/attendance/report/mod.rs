pub mod gemini;
mod prompt;

use self::gemini::{GenerationError, TextGenerationGateway};
use super::domain::{AttendanceRecord, Student};
use super::summary::DailyAttendanceSummary;
use chrono::NaiveDate;
use tracing::{debug, error};

pub use self::prompt::build_report_prompt;

/// Shown when the service answered but produced no usable text.
pub const EMPTY_REPORT_FALLBACK: &str = "Gagal menghasilkan laporan.";

/// Shown when the request to the service failed outright.
pub const SERVICE_ERROR_FALLBACK: &str = "Maaf, terjadi kesalahan saat menghubungkan ke layanan \
                                          AI untuk membuat laporan. Pastikan API Key valid.";

/// Typed result of one generation attempt, before it is rendered down to the
/// single user-facing string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportOutcome {
    Generated(String),
    Empty,
}

/// Turns a day of attendance data into a narrative report through an injected
/// text-generation gateway. One request per call, no retries.
#[derive(Debug, Clone)]
pub struct AttendanceReportGenerator<G> {
    gateway: G,
}

impl<G: TextGenerationGateway> AttendanceReportGenerator<G> {
    pub fn new(gateway: G) -> Self {
        Self { gateway }
    }

    /// Derive the summary for `date`, prompt the gateway once, and classify
    /// the reply. Errors stay typed here so callers and tests can tell a
    /// transport failure from a rejected credential.
    pub async fn try_generate(
        &self,
        records: &[AttendanceRecord],
        students: &[Student],
        date: NaiveDate,
    ) -> Result<ReportOutcome, GenerationError> {
        let summary = DailyAttendanceSummary::for_date(records, students, date);
        debug!(
            date = %summary.date,
            total_students = summary.total_students,
            attendance_count = summary.attendance_count,
            late_count = summary.late_count,
            "requesting attendance report"
        );

        let prompt = build_report_prompt(&summary)?;
        let reply = self.gateway.generate_text(&prompt).await?;

        Ok(match reply {
            Some(text) if !text.trim().is_empty() => ReportOutcome::Generated(text),
            _ => ReportOutcome::Empty,
        })
    }

    /// The user-facing operation: always resolves to a string. Generation
    /// failures are logged and rendered as a fixed apology, an empty reply as
    /// its own fixed fallback.
    pub async fn generate(
        &self,
        records: &[AttendanceRecord],
        students: &[Student],
        date: NaiveDate,
    ) -> String {
        match self.try_generate(records, students, date).await {
            Ok(ReportOutcome::Generated(text)) => text,
            Ok(ReportOutcome::Empty) => EMPTY_REPORT_FALLBACK.to_string(),
            Err(err) => {
                error!(error = %err, date = %date, "attendance report generation failed");
                SERVICE_ERROR_FALLBACK.to_string()
            }
        }
    }
}
