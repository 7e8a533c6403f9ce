//! Attendance models
//!
//! Times are `HH:MM` strings and dates `DD/MM/YYYY`, as formatted by the
//! backend.

use serde::{Deserialize, Serialize};

/// Presence indicator shown next to an employee
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PresenceStatus {
    Present,
    Absent,
    OnLeave,
}

impl std::fmt::Display for PresenceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            PresenceStatus::Present => "present",
            PresenceStatus::Absent => "absent",
            PresenceStatus::OnLeave => "on leave",
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttendanceRecord {
    pub id: String,
    /// Present in the admin day view
    pub employee_name: Option<String>,
    /// Present in the month view
    pub date: Option<String>,
    pub check_in: String,
    pub check_out: String,
    pub work_hours: String,
    pub extra_hours: String,
    pub status: PresenceStatus,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CheckInResponse {
    pub message: String,
    pub since_time: String,
    pub status: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CheckOutResponse {
    pub message: String,
    pub duration: String,
    pub check_in: String,
    pub check_out: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CurrentStatus {
    pub is_checked_in: bool,
    pub since_time: Option<String>,
    pub status_icon: PresenceStatus,
    pub check_in_time: Option<String>,
    pub check_out_time: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AdminDayAttendance {
    pub date: String,
    pub total_present: u32,
    pub total_absent: u32,
    pub total_on_leave: u32,
    pub employees: Vec<AttendanceRecord>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EmployeeMonthAttendance {
    pub month: String,
    pub year: i32,
    pub days_present: u32,
    pub days_on_leave: u32,
    pub total_days: u32,
    pub records: Vec<AttendanceRecord>,
}
