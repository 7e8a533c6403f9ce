//! Time-off models

use serde::{Deserialize, Deserializer, Serialize};

/// Day counts arrive as decimal strings (`"24.0"`) from the backend, but
/// plain numbers are accepted too.
fn days<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Days {
        Number(f64),
        Text(String),
    }

    match Days::deserialize(deserializer)? {
        Days::Number(n) => Ok(n),
        Days::Text(s) => s
            .trim()
            .parse()
            .map_err(|_| serde::de::Error::custom(format!("invalid day count: {:?}", s))),
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeOffBalance {
    pub id: String,
    /// UUID of the time-off type, when the server includes it
    #[serde(default)]
    pub type_id: Option<String>,
    pub type_code: String,
    pub type_name: String,
    pub year: i32,
    #[serde(deserialize_with = "days")]
    pub allocated_days: f64,
    #[serde(deserialize_with = "days")]
    pub used_days: f64,
    #[serde(deserialize_with = "days")]
    pub available_days: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RequestStatus {
    Pending,
    Approved,
    Rejected,
}

impl RequestStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            RequestStatus::Pending => "PENDING",
            RequestStatus::Approved => "APPROVED",
            RequestStatus::Rejected => "REJECTED",
        }
    }
}

impl std::str::FromStr for RequestStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "PENDING" => Ok(Self::Pending),
            "APPROVED" => Ok(Self::Approved),
            "REJECTED" => Ok(Self::Rejected),
            other => Err(format!(
                "Unknown status: {}. Use: pending, approved, rejected",
                other.to_ascii_lowercase()
            )),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeOffRequest {
    pub id: String,
    pub employee_id: Option<String>,
    /// Present in the admin listing
    pub employee_name: Option<String>,
    pub timeoff_type_name: String,
    pub timeoff_type_code: String,
    pub start_date: String,
    pub end_date: String,
    #[serde(deserialize_with = "days")]
    pub allocation_days: f64,
    pub status: RequestStatus,
    #[serde(default)]
    pub approved_by_name: Option<String>,
    pub rejection_reason: Option<String>,
    #[serde(default)]
    pub attachment_url: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MyTimeOff {
    pub balances: Vec<TimeOffBalance>,
    pub requests: Vec<TimeOffRequest>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreatedTimeOff {
    pub request: TimeOffRequest,
    pub balances: Vec<TimeOffBalance>,
    pub message: String,
}

/// Result of approving or rejecting a request
#[derive(Debug, Clone, Deserialize)]
pub struct ReviewedTimeOff {
    pub message: String,
    pub request: TimeOffRequest,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_balance_decimal_strings() {
        let balance: TimeOffBalance = serde_json::from_value(json!({
            "id": "b1",
            "type_code": "PAID",
            "type_name": "Paid Time Off",
            "year": 2025,
            "allocated_days": "24.0",
            "used_days": "3.5",
            "available_days": "20.5"
        }))
        .unwrap();
        assert!(balance.type_id.is_none());
        assert_eq!(balance.allocated_days, 24.0);
        assert_eq!(balance.used_days, 3.5);
        assert_eq!(balance.available_days, 20.5);
    }

    #[test]
    fn test_day_counts_accept_numbers() {
        let balance: TimeOffBalance = serde_json::from_value(json!({
            "id": "b1",
            "type_id": "type-uuid",
            "type_code": "SICK",
            "type_name": "Sick Leave",
            "year": 2025,
            "allocated_days": 7,
            "used_days": 0.0,
            "available_days": 7
        }))
        .unwrap();
        assert_eq!(balance.type_id.as_deref(), Some("type-uuid"));
        assert_eq!(balance.available_days, 7.0);
    }

    #[test]
    fn test_day_count_rejects_garbage() {
        let err = serde_json::from_value::<TimeOffBalance>(json!({
            "id": "b1",
            "type_code": "PAID",
            "type_name": "Paid Time Off",
            "year": 2025,
            "allocated_days": "lots",
            "used_days": "0.0",
            "available_days": "0.0"
        }))
        .unwrap_err();
        assert!(err.to_string().contains("invalid day count"));
    }
}
