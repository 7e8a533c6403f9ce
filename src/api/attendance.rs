//! Attendance endpoints

use super::{ApiClient, ApiError, ApiRequest};
use crate::models::{
    AdminDayAttendance, CheckInResponse, CheckOutResponse, CurrentStatus, EmployeeMonthAttendance,
};

pub async fn check_in(client: &ApiClient) -> Result<CheckInResponse, ApiError> {
    client.fetch(ApiRequest::post("/attendance/check-in/")).await
}

pub async fn check_out(client: &ApiClient) -> Result<CheckOutResponse, ApiError> {
    client.fetch(ApiRequest::post("/attendance/check-out/")).await
}

pub async fn current_status(client: &ApiClient) -> Result<CurrentStatus, ApiError> {
    client.fetch(ApiRequest::get("/attendance/current/")).await
}

/// Everyone's attendance for one day (admin/HR). `date` defaults to today
/// on the server.
pub async fn admin_day(
    client: &ApiClient,
    date: Option<&str>,
) -> Result<AdminDayAttendance, ApiError> {
    client
        .fetch(ApiRequest::get("/attendance/admin/day/").query("date", date))
        .await
}

/// The caller's attendance for a month. Absent values default to the
/// current month/year on the server.
pub async fn my_month(
    client: &ApiClient,
    month: Option<u32>,
    year: Option<i32>,
) -> Result<EmployeeMonthAttendance, ApiError> {
    client
        .fetch(
            ApiRequest::get("/attendance/me/month/")
                .query("month", month)
                .query("year", year),
        )
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use crate::api::client::tests::client_for;
    use crate::auth::MemoryTokenStore;
    use crate::models::PresenceStatus;

    #[tokio::test]
    async fn test_month_query_params() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/attendance/me/month/"))
            .and(query_param("month", "2"))
            .and(query_param("year", "2025"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "month": "February",
                "year": 2025,
                "days_present": 1,
                "days_on_leave": 0,
                "total_days": 20,
                "records": [{
                    "id": "r1",
                    "date": "03/02/2025",
                    "check_in": "09:00",
                    "check_out": "17:30",
                    "work_hours": "08:30",
                    "extra_hours": "00:30",
                    "status": "PRESENT"
                }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let (client, _) = client_for(&server, Arc::new(MemoryTokenStore::with_pair("a", "r")));
        let month = my_month(&client, Some(2), Some(2025)).await.unwrap();
        assert_eq!(month.records.len(), 1);
        assert_eq!(month.records[0].status, PresenceStatus::Present);
    }

    #[tokio::test]
    async fn test_check_in_conflict_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/attendance/check-in/"))
            .respond_with(
                ResponseTemplate::new(400).set_body_json(json!({ "error": "Already checked in today" })),
            )
            .mount(&server)
            .await;

        let (client, _) = client_for(&server, Arc::new(MemoryTokenStore::with_pair("a", "r")));
        let err = check_in(&client).await.unwrap_err();
        assert_eq!(err.to_message(), "Already checked in today");
    }

    #[tokio::test]
    async fn test_current_status_not_checked_in() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/attendance/current/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "is_checked_in": false,
                "since_time": null,
                "status_icon": "ABSENT",
                "check_in_time": null,
                "check_out_time": null
            })))
            .mount(&server)
            .await;

        let (client, _) = client_for(&server, Arc::new(MemoryTokenStore::with_pair("a", "r")));
        let status = current_status(&client).await.unwrap();
        assert!(!status.is_checked_in);
        assert_eq!(status.status_icon, PresenceStatus::Absent);
    }
}
