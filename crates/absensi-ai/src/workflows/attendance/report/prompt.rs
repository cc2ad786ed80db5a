use super::gemini::GenerationError;
use crate::workflows::attendance::DailyAttendanceSummary;

/// Render the fixed Indonesian instruction template with the summary embedded
/// as JSON. The template asks for Markdown prose only; the JSON itself must
/// not appear in the model's answer.
pub fn build_report_prompt(summary: &DailyAttendanceSummary) -> Result<String, GenerationError> {
    let data = serde_json::to_string(summary).map_err(GenerationError::Prompt)?;

    Ok(format!(
        "Bertindaklah sebagai analis data sekolah. Saya akan memberikan data ringkasan absensi \
         hari ini dalam format JSON.\n\
         \n\
         Data: {data}\n\
         \n\
         Tolong buatkan laporan singkat dan profesional dalam format Markdown (Bahasa Indonesia) \
         yang mencakup:\n\
         1. **Ringkasan Eksekutif**: Persentase kehadiran (Siswa yang status Hadir/Terlambat \
         dibanding Total).\n\
         2. **Analisis Keterlambatan**: Seberapa parah tingkat keterlambatan.\n\
         3. **Catatan Izin**: Jumlah siswa yang izin.\n\
         4. **Rekomendasi**: Saran singkat untuk meningkatkan kedisiplinan.\n\
         \n\
         Gunakan format yang rapi dengan bullet points. Jangan sertakan JSON dalam output, hanya \
         teks laporan."
    ))
}
