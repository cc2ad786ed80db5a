use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Attendance status tags as the school information system records them.
///
/// The four canonical tags are matched exactly; any other spelling is kept
/// verbatim in `Other` so unclassified records survive a round trip without
/// being counted as one of the known statuses.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AttendanceStatus {
    Hadir,
    Terlambat,
    Izin,
    Pulang,
    Other(String),
}

impl AttendanceStatus {
    pub fn from_tag(value: &str) -> Self {
        match value {
            "Hadir" => Self::Hadir,
            "Terlambat" => Self::Terlambat,
            "Izin" => Self::Izin,
            "Pulang" => Self::Pulang,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_tag(&self) -> &str {
        match self {
            Self::Hadir => "Hadir",
            Self::Terlambat => "Terlambat",
            Self::Izin => "Izin",
            Self::Pulang => "Pulang",
            Self::Other(tag) => tag,
        }
    }

    /// Present-type statuses: physically at school today, on time or not.
    pub fn is_present(&self) -> bool {
        matches!(self, Self::Hadir | Self::Terlambat)
    }
}

impl fmt::Display for AttendanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_tag())
    }
}

impl Serialize for AttendanceStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_tag())
    }
}

impl<'de> Deserialize<'de> for AttendanceStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::from_tag(&raw))
    }
}

/// A student known to the attendance system. Attributes beyond the identifier
/// and display name are owned by the data layer and not modeled here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    pub id: String,
    pub name: String,
}

/// One attendance event for one student on one calendar day.
///
/// `date_str` stays a raw `YYYY-MM-DD` string: a malformed value must not
/// reject the whole payload, it simply never matches a report date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    pub student_id: String,
    pub date_str: String,
    pub status: AttendanceStatus,
}
