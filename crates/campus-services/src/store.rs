//! Record store interface.
//!
//! The host record-management system owns all student data; this core only
//! reads it, one category at a time. Notices and assignments are
//! system-wide and most-recent-first; everything else is scoped to the
//! calling user.

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use campus_types::{
    AssignmentRecord, AttendanceRecord, CourseRecord, FeeRecord, MarkRecord, NoticeRecord,
    StoreSettings, UserId, UserProfile,
};

use crate::error::ServiceError;

/// Read interface over the host system's records, one method per category.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Attendance entries for a student.
    async fn attendance_for(&self, user: UserId) -> Result<Vec<AttendanceRecord>, ServiceError>;

    /// Marks for a student.
    async fn marks_for(&self, user: UserId) -> Result<Vec<MarkRecord>, ServiceError>;

    /// Fee payments for a student.
    async fn fees_for(&self, user: UserId) -> Result<Vec<FeeRecord>, ServiceError>;

    /// Courses a student is enrolled in.
    async fn courses_for(&self, user: UserId) -> Result<Vec<CourseRecord>, ServiceError>;

    /// A user's own profile, if the account exists.
    async fn profile_for(&self, user: UserId) -> Result<Option<UserProfile>, ServiceError>;

    /// Most recent assignment per course, system-wide.
    async fn recent_assignments(&self) -> Result<Vec<AssignmentRecord>, ServiceError>;

    /// Recent notices, system-wide.
    async fn recent_notices(&self) -> Result<Vec<NoticeRecord>, ServiceError>;
}

/// HTTP client against the host record-management API.
pub struct HttpRecordStore {
    client: Client,
    base_url: String,
}

impl HttpRecordStore {
    /// Create a store client from settings.
    pub fn new(settings: &StoreSettings) -> Result<Self, ServiceError> {
        let client = Client::builder()
            .build()
            .map_err(|e| ServiceError::Config(e.to_string()))?;

        Ok(Self {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// GET a JSON payload from a path under the base URL.
    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
    ) -> Result<T, ServiceError> {
        let url = format!("{}/{}", self.base_url, path);
        debug!(url = %url, "Fetching records");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| ServiceError::Store(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(ServiceError::Store(format!("HTTP {} from {}", status, url)));
        }

        response
            .json()
            .await
            .map_err(|e| ServiceError::Parse(e.to_string()))
    }
}

#[async_trait]
impl RecordStore for HttpRecordStore {
    async fn attendance_for(&self, user: UserId) -> Result<Vec<AttendanceRecord>, ServiceError> {
        self.get_json(&format!("attendance/{}", user)).await
    }

    async fn marks_for(&self, user: UserId) -> Result<Vec<MarkRecord>, ServiceError> {
        self.get_json(&format!("marks/{}", user)).await
    }

    async fn fees_for(&self, user: UserId) -> Result<Vec<FeeRecord>, ServiceError> {
        self.get_json(&format!("fees/{}", user)).await
    }

    async fn courses_for(&self, user: UserId) -> Result<Vec<CourseRecord>, ServiceError> {
        self.get_json(&format!("courses/student/{}", user)).await
    }

    async fn profile_for(&self, user: UserId) -> Result<Option<UserProfile>, ServiceError> {
        self.get_json(&format!("users/{}", user)).await
    }

    async fn recent_assignments(&self) -> Result<Vec<AssignmentRecord>, ServiceError> {
        self.get_json("assignments/recent").await
    }

    async fn recent_notices(&self) -> Result<Vec<NoticeRecord>, ServiceError> {
        self.get_json("notices/recent").await
    }
}

/// In-memory record store for testing, seeded with builder methods.
#[derive(Default)]
pub struct MockRecordStore {
    attendance: Vec<AttendanceRecord>,
    marks: Vec<MarkRecord>,
    fees: Vec<FeeRecord>,
    courses: Vec<CourseRecord>,
    profile: Option<UserProfile>,
    assignments: Vec<AssignmentRecord>,
    notices: Vec<NoticeRecord>,
    fail_with: Option<String>,
}

impl MockRecordStore {
    /// Store with no records at all.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Store that fails every fetch.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            fail_with: Some(message.into()),
            ..Self::default()
        }
    }

    pub fn with_attendance(mut self, records: Vec<AttendanceRecord>) -> Self {
        self.attendance = records;
        self
    }

    pub fn with_marks(mut self, records: Vec<MarkRecord>) -> Self {
        self.marks = records;
        self
    }

    pub fn with_fees(mut self, records: Vec<FeeRecord>) -> Self {
        self.fees = records;
        self
    }

    pub fn with_courses(mut self, records: Vec<CourseRecord>) -> Self {
        self.courses = records;
        self
    }

    pub fn with_profile(mut self, profile: UserProfile) -> Self {
        self.profile = Some(profile);
        self
    }

    pub fn with_assignments(mut self, records: Vec<AssignmentRecord>) -> Self {
        self.assignments = records;
        self
    }

    pub fn with_notices(mut self, records: Vec<NoticeRecord>) -> Self {
        self.notices = records;
        self
    }

    fn check_failure(&self) -> Result<(), ServiceError> {
        match &self.fail_with {
            Some(message) => Err(ServiceError::Store(message.clone())),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl RecordStore for MockRecordStore {
    async fn attendance_for(&self, _user: UserId) -> Result<Vec<AttendanceRecord>, ServiceError> {
        self.check_failure()?;
        Ok(self.attendance.clone())
    }

    async fn marks_for(&self, _user: UserId) -> Result<Vec<MarkRecord>, ServiceError> {
        self.check_failure()?;
        Ok(self.marks.clone())
    }

    async fn fees_for(&self, _user: UserId) -> Result<Vec<FeeRecord>, ServiceError> {
        self.check_failure()?;
        Ok(self.fees.clone())
    }

    async fn courses_for(&self, _user: UserId) -> Result<Vec<CourseRecord>, ServiceError> {
        self.check_failure()?;
        Ok(self.courses.clone())
    }

    async fn profile_for(&self, _user: UserId) -> Result<Option<UserProfile>, ServiceError> {
        self.check_failure()?;
        Ok(self.profile.clone())
    }

    async fn recent_assignments(&self) -> Result<Vec<AssignmentRecord>, ServiceError> {
        self.check_failure()?;
        Ok(self.assignments.clone())
    }

    async fn recent_notices(&self) -> Result<Vec<NoticeRecord>, ServiceError> {
        self.check_failure()?;
        Ok(self.notices.clone())
    }
}
