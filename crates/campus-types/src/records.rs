//! Structured record types returned by the record store.
//!
//! One struct per record category. These mirror the host record-management
//! system's read API; the chat core only consumes them, it never writes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier of the calling user within the host system.
pub type UserId = u64;

/// Monthly attendance entry for a student.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttendanceRecord {
    /// Calendar month the entry covers (e.g., "Ashoj")
    pub month: String,

    /// Semester label (e.g., "Fall 2024")
    pub semester: String,

    /// Attendance percentage for the month (0-100)
    pub total: u32,

    /// Evaluation of the percentage (e.g., "satisfied", "low")
    pub status: String,
}

/// Fee payment entry for one semester.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeeRecord {
    /// Semester the payment applies to
    pub semester: String,

    /// Amount paid so far, in rupees
    pub total_paid: f64,

    /// Outstanding amount, in rupees
    pub amount_due: f64,

    /// Payment status (e.g., "paid", "partial", "overdue")
    pub payment_status: String,
}

/// Examination result for one subject.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkRecord {
    /// Subject name
    pub subject: String,

    /// Semester the exam belongs to
    pub semester: String,

    /// Marks obtained out of 100
    pub total_marks: u32,

    /// Letter grade
    pub grade: String,

    /// Pass/fail status
    pub status: String,
}

/// Course a student is enrolled in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseRecord {
    /// Course name
    pub name: String,

    /// Course code (e.g., "CS-301")
    pub code: String,

    /// Teacher assigned to the course, if any
    #[serde(default)]
    pub teacher_id: Option<UserId>,
}

/// Assignment posted for a course.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignmentRecord {
    /// Assignment title
    pub title: String,

    /// Course the assignment belongs to
    pub course_id: u64,

    /// Free-text description
    pub description: String,

    /// Submission deadline
    pub due_date: DateTime<Utc>,

    /// Teacher who posted the assignment
    pub teacher_id: UserId,
}

/// Profile of a user account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    /// Full display name
    pub full_name: String,

    /// Login name
    pub username: String,

    /// Contact email
    pub email: String,

    /// Admission batch (e.g., "2022")
    pub batch: String,

    /// Degree program (e.g., "BSc CSIT")
    pub program: String,

    /// Account role (student, teacher, admin)
    pub role: String,

    /// Whether the account is disabled
    #[serde(default)]
    pub disabled: bool,

    /// Account creation time
    pub created_at: DateTime<Utc>,
}

/// Notice published to students.
///
/// Targeting fields are optional; a notice with no targeting applies to
/// everyone.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NoticeRecord {
    /// Notice title
    pub title: String,

    /// Notice body
    pub content: String,

    /// Batch the notice targets, if restricted
    #[serde(default)]
    pub target_batch: Option<String>,

    /// Program the notice targets, if restricted
    #[serde(default)]
    pub target_program: Option<String>,

    /// Course the notice is scoped to, if any
    #[serde(default)]
    pub course_id: Option<u64>,

    /// Author user id, if recorded
    #[serde(default)]
    pub created_by: Option<UserId>,

    /// Publication time
    pub created_at: DateTime<Utc>,
}
