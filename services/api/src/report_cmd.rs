use crate::infra::parse_date;
use absensi_ai::config::AppConfig;
use absensi_ai::error::AppError;
use absensi_ai::telemetry;
use absensi_ai::workflows::attendance::report::gemini::GeminiClient;
use absensi_ai::workflows::attendance::{AttendanceReportGenerator, DailyAttendanceSummary};
use absensi_ai::workflows::siakad::SiakadAttendanceImporter;
use chrono::{Local, NaiveDate};
use clap::Args;
use std::path::PathBuf;
use tracing::info;

#[derive(Args, Debug)]
pub(crate) struct AttendanceReportArgs {
    /// SIAKAD attendance CSV export to report on
    #[arg(long)]
    pub(crate) csv: PathBuf,
    /// Report date (YYYY-MM-DD, defaults to today)
    #[arg(long, value_parser = parse_date)]
    pub(crate) date: Option<NaiveDate>,
}

/// Import the export, log the derived counts, and print the generated report
/// (or its fallback text) to stdout.
pub(crate) async fn run_attendance_report(args: AttendanceReportArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let import = SiakadAttendanceImporter::from_path(&args.csv)?;
    let date = args.date.unwrap_or_else(|| Local::now().date_naive());

    let summary = DailyAttendanceSummary::for_date(&import.records, &import.students, date);
    info!(
        date = %summary.date,
        total_students = summary.total_students,
        attendance_count = summary.attendance_count,
        late_count = summary.late_count,
        permission_count = summary.permission_count,
        checkout_count = summary.checkout_count,
        "derived daily attendance summary"
    );

    let client = GeminiClient::new(&config.gemini)?;
    let generator = AttendanceReportGenerator::new(client);
    let report = generator
        .generate(&import.records, &import.students, date)
        .await;

    println!("{report}");
    Ok(())
}
