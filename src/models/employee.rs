//! Employee directory models

use serde::{Deserialize, Serialize};

use super::PresenceStatus;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Employee {
    pub id: String,
    pub full_name: String,
    pub email: String,
    pub login_id: String,
    pub job_position: String,
    pub profile_picture: Option<String>,
    pub status_icon: PresenceStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmployeeDetail {
    #[serde(flatten)]
    pub employee: Employee,
    pub phone: String,
    pub department: String,
}

/// One page of the employee directory
#[derive(Debug, Clone, Deserialize)]
pub struct EmployeePage {
    pub count: u64,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<Employee>,
}
