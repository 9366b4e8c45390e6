//! Domain formatters: structured records to natural-language digests.
//!
//! Each formatter is a pure, total function over one record category. An
//! empty input always yields the category's fixed "no records" sentence, so
//! a data-backed intent never hands the generation service an empty context
//! block. One line per record, category-specific template.

use campus_types::{
    AssignmentRecord, AttendanceRecord, CourseRecord, FeeRecord, MarkRecord, NoticeRecord,
    UserProfile,
};

/// Fixed sentence for an empty attendance fetch.
pub const NO_ATTENDANCE_SENTENCE: &str = "No attendance records found.";
/// Fixed sentence for an empty fee fetch.
pub const NO_FEES_SENTENCE: &str = "No fee records found.";
/// Fixed sentence for an empty marks fetch.
pub const NO_MARKS_SENTENCE: &str = "No marks records found.";
/// Fixed sentence for an empty course fetch.
pub const NO_COURSES_SENTENCE: &str = "No course records found.";
/// Fixed sentence for an empty assignment fetch.
pub const NO_ASSIGNMENTS_SENTENCE: &str = "No assignment records found.";
/// Fixed sentence for a missing profile.
pub const NO_PROFILE_SENTENCE: &str = "No user information found.";
/// Fixed sentence for an empty notice fetch.
pub const NO_NOTICES_SENTENCE: &str = "No notices found.";

/// Format attendance records into a digest.
pub fn format_attendance(records: &[AttendanceRecord]) -> String {
    if records.is_empty() {
        return NO_ATTENDANCE_SENTENCE.to_string();
    }

    let mut lines = vec!["Your Attendance Records:".to_string()];
    for record in records {
        lines.push(format!(
            "- {} ({}): {}% - {}",
            record.month, record.semester, record.total, record.status
        ));
    }
    lines.join("\n")
}

/// Format fee records into a digest.
pub fn format_fees(records: &[FeeRecord]) -> String {
    if records.is_empty() {
        return NO_FEES_SENTENCE.to_string();
    }

    let mut lines = vec!["Your Fee Payment Records:".to_string()];
    for record in records {
        lines.push(format!(
            "- Semester {}: Rs. {} paid, Rs. {} due - {}",
            record.semester, record.total_paid, record.amount_due, record.payment_status
        ));
    }
    lines.join("\n")
}

/// Format marks into a digest.
pub fn format_marks(records: &[MarkRecord]) -> String {
    if records.is_empty() {
        return NO_MARKS_SENTENCE.to_string();
    }

    let mut lines = vec!["Your Marks:".to_string()];
    for record in records {
        lines.push(format!(
            "- {} ({}): {}/100 - Grade: {} ({})",
            record.subject, record.semester, record.total_marks, record.grade, record.status
        ));
    }
    lines.join("\n")
}

/// Format enrolled courses into a digest.
pub fn format_courses(records: &[CourseRecord]) -> String {
    if records.is_empty() {
        return NO_COURSES_SENTENCE.to_string();
    }

    let mut lines = vec!["Your Enrolled Courses:".to_string()];
    for record in records {
        lines.push(format!("- {} (Code: {})", record.name, record.code));
        if let Some(teacher_id) = record.teacher_id {
            lines.push(format!("  Teacher ID: {}", teacher_id));
        }
    }
    lines.join("\n")
}

/// Format recent assignments into a digest.
pub fn format_assignments(records: &[AssignmentRecord]) -> String {
    if records.is_empty() {
        return NO_ASSIGNMENTS_SENTENCE.to_string();
    }

    let mut lines = vec!["Recent Assignments:".to_string()];
    for record in records {
        lines.push(format!("- {}", record.title));
        lines.push(format!("  Course ID: {}", record.course_id));
        lines.push(format!("  Description: {}", record.description));
        lines.push(format!(
            "  Due Date: {}",
            record.due_date.format("%Y-%m-%d %H:%M")
        ));
        lines.push(format!("  Assigned by: User ID {}", record.teacher_id));
    }
    lines.join("\n")
}

/// Format a user profile into a digest.
pub fn format_profile(profile: Option<&UserProfile>) -> String {
    let Some(profile) = profile else {
        return NO_PROFILE_SENTENCE.to_string();
    };

    let lines = vec![
        "Your Profile Information:".to_string(),
        format!("- Full Name: {}", profile.full_name),
        format!("- Username: {}", profile.username),
        format!("- Email: {}", profile.email),
        format!("- Batch: {}", profile.batch),
        format!("- Program: {}", profile.program),
        format!("- Role: {}", profile.role),
        format!(
            "- Account Status: {}",
            if profile.disabled { "Disabled" } else { "Active" }
        ),
        format!("- Member Since: {}", profile.created_at.format("%Y-%m-%d")),
    ];
    lines.join("\n")
}

/// Format recent notices into a digest.
pub fn format_notices(records: &[NoticeRecord]) -> String {
    if records.is_empty() {
        return NO_NOTICES_SENTENCE.to_string();
    }

    let mut lines = vec!["Recent Notices:".to_string()];
    for record in records {
        lines.push(format!("- {}", record.title));
        lines.push(format!("  {}", record.content));
        if let Some(batch) = &record.target_batch {
            lines.push(format!("  Target Batch: {}", batch));
        }
        if let Some(program) = &record.target_program {
            lines.push(format!("  Target Program: {}", program));
        }
        if let Some(course_id) = record.course_id {
            lines.push(format!("  Course ID: {}", course_id));
        }
        if let Some(author) = record.created_by {
            lines.push(format!("  Created By: {}", author));
        }
        lines.push(format!(
            "  Posted: {}",
            record.created_at.format("%Y-%m-%d %H:%M")
        ));
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn attendance(month: &str, total: u32) -> AttendanceRecord {
        AttendanceRecord {
            month: month.to_string(),
            semester: "Fall 2024".to_string(),
            total,
            status: "satisfied".to_string(),
        }
    }

    #[test]
    fn test_attendance_empty() {
        assert_eq!(format_attendance(&[]), NO_ATTENDANCE_SENTENCE);
    }

    #[test]
    fn test_attendance_lines() {
        let digest = format_attendance(&[attendance("Ashoj", 27), attendance("Kartik", 81)]);
        assert!(digest.starts_with("Your Attendance Records:"));
        assert!(digest.contains("Ashoj"));
        assert!(digest.contains("27%"));
        assert!(digest.contains("Kartik"));
        assert!(digest.contains("satisfied"));
    }

    #[test]
    fn test_fees_empty_and_populated() {
        assert_eq!(format_fees(&[]), NO_FEES_SENTENCE);

        let digest = format_fees(&[FeeRecord {
            semester: "3".to_string(),
            total_paid: 45000.0,
            amount_due: 5000.0,
            payment_status: "partial".to_string(),
        }]);
        assert!(digest.contains("Semester 3"));
        assert!(digest.contains("Rs. 45000 paid"));
        assert!(digest.contains("Rs. 5000 due"));
        assert!(digest.contains("partial"));
    }

    #[test]
    fn test_marks_contains_every_subject() {
        let records = vec![
            MarkRecord {
                subject: "Data Structures".to_string(),
                semester: "3".to_string(),
                total_marks: 78,
                grade: "B+".to_string(),
                status: "pass".to_string(),
            },
            MarkRecord {
                subject: "Operating Systems".to_string(),
                semester: "3".to_string(),
                total_marks: 91,
                grade: "A".to_string(),
                status: "pass".to_string(),
            },
        ];

        let digest = format_marks(&records);
        for record in &records {
            assert!(digest.contains(&record.subject));
        }
        assert!(digest.contains("78/100"));
        assert!(digest.contains("Grade: A"));
    }

    #[test]
    fn test_courses_optional_teacher() {
        let digest = format_courses(&[
            CourseRecord {
                name: "Databases".to_string(),
                code: "CS-305".to_string(),
                teacher_id: Some(9),
            },
            CourseRecord {
                name: "Networks".to_string(),
                code: "CS-307".to_string(),
                teacher_id: None,
            },
        ]);

        assert!(digest.contains("Databases (Code: CS-305)"));
        assert!(digest.contains("Teacher ID: 9"));
        assert!(digest.contains("Networks (Code: CS-307)"));
        // Only one teacher line
        assert_eq!(digest.matches("Teacher ID:").count(), 1);
    }

    #[test]
    fn test_assignments_fields() {
        assert_eq!(format_assignments(&[]), NO_ASSIGNMENTS_SENTENCE);

        let digest = format_assignments(&[AssignmentRecord {
            title: "Lab 4: B-Trees".to_string(),
            course_id: 12,
            description: "Implement insertion and deletion.".to_string(),
            due_date: Utc.with_ymd_and_hms(2024, 10, 20, 23, 59, 0).unwrap(),
            teacher_id: 7,
        }]);

        assert!(digest.contains("Lab 4: B-Trees"));
        assert!(digest.contains("Course ID: 12"));
        assert!(digest.contains("Due Date: 2024-10-20 23:59"));
        assert!(digest.contains("Assigned by: User ID 7"));
    }

    #[test]
    fn test_profile_absent_and_present() {
        assert_eq!(format_profile(None), NO_PROFILE_SENTENCE);

        let profile = UserProfile {
            full_name: "Asha Shrestha".to_string(),
            username: "asha".to_string(),
            email: "asha@example.edu".to_string(),
            batch: "2022".to_string(),
            program: "BSc CSIT".to_string(),
            role: "student".to_string(),
            disabled: false,
            created_at: Utc.with_ymd_and_hms(2022, 8, 1, 10, 0, 0).unwrap(),
        };

        let digest = format_profile(Some(&profile));
        assert!(digest.contains("Asha Shrestha"));
        assert!(digest.contains("Account Status: Active"));
        assert!(digest.contains("Member Since: 2022-08-01"));

        let disabled = UserProfile {
            disabled: true,
            ..profile
        };
        assert!(format_profile(Some(&disabled)).contains("Account Status: Disabled"));
    }

    #[test]
    fn test_notices_optional_targeting() {
        assert_eq!(format_notices(&[]), NO_NOTICES_SENTENCE);

        let digest = format_notices(&[NoticeRecord {
            title: "Exam routine published".to_string(),
            content: "Check the portal for the full schedule.".to_string(),
            target_batch: Some("2022".to_string()),
            target_program: None,
            course_id: None,
            created_by: Some(3),
            created_at: Utc.with_ymd_and_hms(2024, 10, 1, 9, 0, 0).unwrap(),
        }]);

        assert!(digest.contains("Exam routine published"));
        assert!(digest.contains("Target Batch: 2022"));
        assert!(!digest.contains("Target Program:"));
        assert!(digest.contains("Created By: 3"));
        assert!(digest.contains("Posted: 2024-10-01 09:00"));
    }
}
