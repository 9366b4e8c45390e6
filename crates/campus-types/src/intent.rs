//! Application intent vocabulary and label normalization.
//!
//! The `Intent` enum is the closed set of query categories the dispatcher can
//! act on. It is distinct from the classifier model's native label vocabulary:
//! model labels are free-form strings maintained with the training data, and
//! are mapped into `Intent` through [`normalize_label`] and
//! [`Intent::from_label`] so the two vocabularies can drift without a crash.

use serde::{Deserialize, Serialize};

/// Query intent recognized by the chat dispatcher.
///
/// Each variant selects one data-fetch + formatting + generation pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    /// Attendance records for the calling student.
    Attendance,
    /// Marks and grades for the calling student.
    Marks,
    /// Fee payment status for the calling student.
    Fees,
    /// Courses the calling student is enrolled in.
    Course,
    /// Recent assignments (system-wide).
    Assignment,
    /// Open-domain questions about the institution, answered via
    /// document retrieval.
    CollegeInfo,
    /// The calling student's own profile.
    UserInfo,
    /// Recent notices (system-wide).
    Notices,
    /// Anything else, answered via web search. Also the safe fallback
    /// when classification fails or confidence is too low.
    #[default]
    General,
}

/// All intents, in label-space order. Used for exhaustiveness checks.
pub const ALL_INTENTS: [Intent; 9] = [
    Intent::Attendance,
    Intent::Marks,
    Intent::Fees,
    Intent::Course,
    Intent::Assignment,
    Intent::CollegeInfo,
    Intent::UserInfo,
    Intent::Notices,
    Intent::General,
];

impl Intent {
    /// Returns the canonical snake_case name for this intent.
    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::Attendance => "attendance",
            Intent::Marks => "marks",
            Intent::Fees => "fees",
            Intent::Course => "course",
            Intent::Assignment => "assignment",
            Intent::CollegeInfo => "college_info",
            Intent::UserInfo => "user_info",
            Intent::Notices => "notices",
            Intent::General => "general",
        }
    }

    /// Map a raw model label to an intent, tolerating formatting drift.
    ///
    /// The label is normalized first (case, spacing, surrounding whitespace);
    /// anything outside the known vocabulary resolves to [`Intent::General`].
    pub fn from_label(label: &str) -> Self {
        match normalize_label(label).as_str() {
            "attendance" => Intent::Attendance,
            "marks" => Intent::Marks,
            "fees" => Intent::Fees,
            "course" => Intent::Course,
            "assignment" => Intent::Assignment,
            "college_info" => Intent::CollegeInfo,
            "user_info" => Intent::UserInfo,
            "notices" => Intent::Notices,
            "general" => Intent::General,
            _ => Intent::General,
        }
    }

    /// Whether this intent is answered from records owned by the caller
    /// (as opposed to system-wide data or an open-domain path).
    pub fn is_caller_scoped(&self) -> bool {
        matches!(
            self,
            Intent::Attendance | Intent::Marks | Intent::Fees | Intent::Course | Intent::UserInfo
        )
    }
}

impl std::fmt::Display for Intent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Canonicalize a free-form label string into the normalized key format.
///
/// Lowercases, trims surrounding whitespace, and collapses interior
/// whitespace runs into a single underscore. Idempotent: normalizing an
/// already-normalized label returns it unchanged.
pub fn normalize_label(label: &str) -> String {
    label
        .trim()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_basic() {
        assert_eq!(normalize_label("College Info"), "college_info");
        assert_eq!(normalize_label("  FEES  "), "fees");
        assert_eq!(normalize_label("user   info"), "user_info");
    }

    #[test]
    fn test_normalize_idempotent() {
        for raw in ["College Info", "user_info", "  Marks ", "general"] {
            let once = normalize_label(raw);
            assert_eq!(normalize_label(&once), once);
        }
    }

    #[test]
    fn test_from_label_known() {
        assert_eq!(Intent::from_label("attendance"), Intent::Attendance);
        assert_eq!(Intent::from_label("College Info"), Intent::CollegeInfo);
        assert_eq!(Intent::from_label(" User Info "), Intent::UserInfo);
        assert_eq!(Intent::from_label("NOTICES"), Intent::Notices);
    }

    #[test]
    fn test_from_label_unknown_falls_back() {
        assert_eq!(Intent::from_label("unknown_7"), Intent::General);
        assert_eq!(Intent::from_label(""), Intent::General);
        assert_eq!(Intent::from_label("timetable"), Intent::General);
    }

    #[test]
    fn test_as_str_round_trip() {
        for intent in ALL_INTENTS {
            assert_eq!(Intent::from_label(intent.as_str()), intent);
        }
    }

    #[test]
    fn test_serde_snake_case() {
        let json = serde_json::to_string(&Intent::CollegeInfo).unwrap();
        assert_eq!(json, "\"college_info\"");
        let back: Intent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Intent::CollegeInfo);
    }

    #[test]
    fn test_default_is_general() {
        assert_eq!(Intent::default(), Intent::General);
    }
}
