use crate::infra::{deserialize_optional_date, AppState};
use absensi_ai::error::AppError;
use absensi_ai::workflows::attendance::domain::{AttendanceRecord, Student};
use absensi_ai::workflows::attendance::report::gemini::TextGenerationGateway;
use absensi_ai::workflows::attendance::{AttendanceReportGenerator, DailyAttendanceSummary};
use absensi_ai::workflows::siakad::SiakadAttendanceImporter;
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::{Extension, Json};
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::io::Cursor;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub(crate) struct AttendanceReportRequest {
    #[serde(default)]
    pub(crate) records: Vec<AttendanceRecord>,
    #[serde(default)]
    pub(crate) students: Vec<Student>,
    /// Report date; defaults to the local calendar date at this boundary.
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub(crate) date: Option<NaiveDate>,
    #[serde(default)]
    pub(crate) siakad_csv: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct AttendanceReportResponse {
    pub(crate) date: NaiveDate,
    pub(crate) data_source: AttendanceDataSource,
    pub(crate) summary: DailyAttendanceSummary,
    pub(crate) report: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub(crate) enum AttendanceDataSource {
    Siakad,
    Inline,
}

pub(crate) fn with_report_routes<G>(
    generator: Arc<AttendanceReportGenerator<G>>,
) -> axum::Router
where
    G: TextGenerationGateway + 'static,
{
    axum::Router::new()
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route(
            "/api/v1/attendance/report",
            axum::routing::post(attendance_report_endpoint::<G>),
        )
        .with_state(generator)
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

/// Build the daily report from inline data or a SIAKAD CSV export. Generation
/// failures never fail the request; the fallback text rides in `report`.
pub(crate) async fn attendance_report_endpoint<G>(
    State(generator): State<Arc<AttendanceReportGenerator<G>>>,
    Json(payload): Json<AttendanceReportRequest>,
) -> Result<Json<AttendanceReportResponse>, AppError>
where
    G: TextGenerationGateway + 'static,
{
    let AttendanceReportRequest {
        records,
        students,
        date,
        siakad_csv,
    } = payload;

    let (records, students, data_source) = if let Some(csv) = siakad_csv {
        let reader = Cursor::new(csv.into_bytes());
        let import = SiakadAttendanceImporter::from_reader(reader)?;
        (
            import.records,
            import.students,
            AttendanceDataSource::Siakad,
        )
    } else {
        (records, students, AttendanceDataSource::Inline)
    };

    let date = date.unwrap_or_else(|| Local::now().date_naive());
    let summary = DailyAttendanceSummary::for_date(&records, &students, date);
    let report = generator.generate(&records, &students, date).await;

    Ok(Json(AttendanceReportResponse {
        date,
        data_source,
        summary,
        report,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use absensi_ai::workflows::attendance::report::gemini::GenerationError;
    use absensi_ai::workflows::attendance::report::SERVICE_ERROR_FALLBACK;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    struct StaticGateway(&'static str);

    #[async_trait]
    impl TextGenerationGateway for StaticGateway {
        async fn generate_text(&self, _prompt: &str) -> Result<Option<String>, GenerationError> {
            Ok(Some(self.0.to_string()))
        }
    }

    struct FailingGateway;

    #[async_trait]
    impl TextGenerationGateway for FailingGateway {
        async fn generate_text(&self, _prompt: &str) -> Result<Option<String>, GenerationError> {
            Err(GenerationError::Api {
                status: 503,
                message: "model overloaded".to_string(),
            })
        }
    }

    fn request_date() -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(2026, 8, 6)
    }

    fn inline_request() -> AttendanceReportRequest {
        let record = |student_id: &str, status: &str| AttendanceRecord {
            student_id: student_id.to_string(),
            date_str: "2026-08-06".to_string(),
            status: absensi_ai::workflows::attendance::domain::AttendanceStatus::from_tag(status),
        };

        AttendanceReportRequest {
            records: vec![record("A", "Hadir"), record("B", "Izin")],
            students: vec![
                Student {
                    id: "A".to_string(),
                    name: "Aulia".to_string(),
                },
                Student {
                    id: "B".to_string(),
                    name: "Bima".to_string(),
                },
            ],
            date: request_date(),
            siakad_csv: None,
        }
    }

    #[tokio::test]
    async fn report_endpoint_uses_inline_data() {
        let generator = Arc::new(AttendanceReportGenerator::new(StaticGateway("# Laporan")));

        let Json(body) = attendance_report_endpoint(State(generator), Json(inline_request()))
            .await
            .expect("report builds");

        assert_eq!(body.data_source, AttendanceDataSource::Inline);
        assert_eq!(body.summary.total_students, 2);
        assert_eq!(body.summary.attendance_count, 1);
        assert_eq!(body.summary.permission_count, 1);
        assert_eq!(body.report, "# Laporan");
    }

    #[tokio::test]
    async fn report_endpoint_accepts_a_siakad_export() {
        let generator = Arc::new(AttendanceReportGenerator::new(StaticGateway("ok")));
        let request = AttendanceReportRequest {
            records: Vec::new(),
            students: Vec::new(),
            date: request_date(),
            siakad_csv: Some(
                "NIS,Nama,Tanggal,Status\n2301,Aulia Rahma,2026-08-06,Hadir\n".to_string(),
            ),
        };

        let Json(body) = attendance_report_endpoint(State(generator), Json(request))
            .await
            .expect("report builds");

        assert_eq!(body.data_source, AttendanceDataSource::Siakad);
        assert_eq!(body.summary.total_students, 1);
        assert_eq!(body.summary.attendance_count, 1);
    }

    #[tokio::test]
    async fn malformed_csv_is_a_client_error() {
        let generator = Arc::new(AttendanceReportGenerator::new(StaticGateway("ok")));
        let request = AttendanceReportRequest {
            records: Vec::new(),
            students: Vec::new(),
            date: request_date(),
            siakad_csv: Some("NIS,Nama,Tanggal,Status\n2301,Aulia\n".to_string()),
        };

        let err = attendance_report_endpoint(State(generator), Json(request))
            .await
            .expect_err("short row rejected");
        assert!(matches!(err, AppError::Import(_)));
    }

    #[tokio::test]
    async fn generation_failure_still_answers_with_fallback_text() {
        let generator = Arc::new(AttendanceReportGenerator::new(FailingGateway));

        let Json(body) = attendance_report_endpoint(State(generator), Json(inline_request()))
            .await
            .expect("endpoint does not fail on generation errors");

        assert_eq!(body.report, SERVICE_ERROR_FALLBACK);
        assert_eq!(body.summary.total_students, 2);
    }

    #[tokio::test]
    async fn health_route_responds_ok() {
        let generator = Arc::new(AttendanceReportGenerator::new(StaticGateway("ok")));
        let app = with_report_routes(generator);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .expect("request builds"),
            )
            .await
            .expect("router responds");

        assert_eq!(response.status(), StatusCode::OK);
    }
}
