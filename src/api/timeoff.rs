//! Time-off endpoints

use chrono::NaiveDate;

use super::request::{Attachment, MultipartBody};
use super::{ApiClient, ApiError, ApiRequest};
use crate::models::{CreatedTimeOff, MyTimeOff, RequestStatus, ReviewedTimeOff, TimeOffRequest};

/// A new leave request. Dates are `YYYY-MM-DD`.
#[derive(Debug, Clone)]
pub struct NewTimeOff {
    /// UUID of the time-off type
    pub timeoff_type: String,
    pub start_date: String,
    pub end_date: String,
    pub attachment: Option<Attachment>,
}

impl NewTimeOff {
    /// Reject malformed or inverted ranges before they reach the server.
    pub fn validate(&self) -> Result<(), ApiError> {
        let start = parse_date("start_date", &self.start_date)?;
        let end = parse_date("end_date", &self.end_date)?;
        if end < start {
            return Err(ApiError::InvalidRequest(
                "end_date must not be before start_date".to_string(),
            ));
        }
        Ok(())
    }

    /// Calendar days covered, both ends included.
    pub fn calendar_days(&self) -> Result<i64, ApiError> {
        self.validate()?;
        let start = parse_date("start_date", &self.start_date)?;
        let end = parse_date("end_date", &self.end_date)?;
        Ok((end - start).num_days() + 1)
    }

    fn to_multipart(&self) -> MultipartBody {
        let body = MultipartBody::default()
            .text("timeoff_type", self.timeoff_type.clone())
            .text("start_date", self.start_date.clone())
            .text("end_date", self.end_date.clone());
        match &self.attachment {
            Some(file) => body.file("attachment", file.clone()),
            None => body,
        }
    }
}

fn parse_date(field: &str, value: &str) -> Result<NaiveDate, ApiError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| {
        ApiError::InvalidRequest(format!("{} must be YYYY-MM-DD, got {:?}", field, value))
    })
}

/// Filters for the admin listing
#[derive(Debug, Clone, Default)]
pub struct AdminQuery {
    pub status: Option<RequestStatus>,
    pub search: Option<String>,
    pub page: Option<u32>,
}

/// The caller's balances and requests.
pub async fn mine(client: &ApiClient) -> Result<MyTimeOff, ApiError> {
    client.fetch(ApiRequest::get("/timeoff/me/")).await
}

/// File a leave request as multipart form data.
pub async fn create(client: &ApiClient, new: &NewTimeOff) -> Result<CreatedTimeOff, ApiError> {
    new.validate()?;
    client
        .fetch(ApiRequest::post("/timeoff/me/").multipart(new.to_multipart()))
        .await
}

/// All requests in the company (admin/HR).
pub async fn admin_list(
    client: &ApiClient,
    query: &AdminQuery,
) -> Result<Vec<TimeOffRequest>, ApiError> {
    client
        .fetch(
            ApiRequest::get("/timeoff/admin/")
                .query("status", query.status.map(RequestStatus::as_str))
                .query("search", query.search.as_deref())
                .query("page", query.page),
        )
        .await
}

pub async fn approve(client: &ApiClient, id: &str) -> Result<ReviewedTimeOff, ApiError> {
    client
        .fetch(ApiRequest::post(format!("/timeoff/admin/{}/approve/", id)))
        .await
}

pub async fn reject(
    client: &ApiClient,
    id: &str,
    rejection_reason: &str,
) -> Result<ReviewedTimeOff, ApiError> {
    client
        .fetch(
            ApiRequest::post(format!("/timeoff/admin/{}/reject/", id))
                .json(&serde_json::json!({ "rejection_reason": rejection_reason }))?,
        )
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use serde_json::json;
    use wiremock::matchers::{body_json, header_exists, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use crate::api::client::tests::client_for;
    use crate::auth::MemoryTokenStore;

    fn request_json(status: &str) -> serde_json::Value {
        json!({
            "id": "t1",
            "employee_name": "Ann Lee",
            "timeoff_type_name": "Paid Time Off",
            "timeoff_type_code": "PAID",
            "start_date": "2025-03-03",
            "end_date": "2025-03-05",
            "allocation_days": "3.0",
            "status": status,
            "created_at": "2025-03-01T10:00:00Z",
            "updated_at": "2025-03-01T10:00:00Z"
        })
    }

    fn balance_json() -> serde_json::Value {
        json!({
            "id": "b1",
            "type_code": "PAID",
            "type_name": "Paid Time Off",
            "year": 2025,
            "allocated_days": "24.0",
            "used_days": "3.0",
            "available_days": "21.0"
        })
    }

    fn leave(start: &str, end: &str) -> NewTimeOff {
        NewTimeOff {
            timeoff_type: "type-uuid".to_string(),
            start_date: start.to_string(),
            end_date: end.to_string(),
            attachment: None,
        }
    }

    #[test]
    fn test_date_checks() {
        assert!(leave("2025-03-03", "2025-03-03").validate().is_ok());
        assert!(leave("2025-03-05", "2025-03-03").validate().is_err());
        assert!(leave("03/03/2025", "2025-03-05").validate().is_err());
        assert_eq!(leave("2025-02-27", "2025-03-02").calendar_days().unwrap(), 4);
    }

    #[tokio::test]
    async fn test_inverted_range_never_sent() {
        let server = MockServer::start().await;
        Mock::given(path("/api/timeoff/me/"))
            .respond_with(ResponseTemplate::new(201))
            .expect(0)
            .mount(&server)
            .await;

        let (client, _) = client_for(&server, Arc::new(MemoryTokenStore::with_pair("a", "r")));
        let err = create(&client, &leave("2025-03-05", "2025-03-01"))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::InvalidRequest(_)));
    }

    #[tokio::test]
    async fn test_create_is_multipart() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/timeoff/me/"))
            .and(header_exists("content-type"))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "request": request_json("PENDING"),
                "balances": [balance_json()],
                "message": "Time off request created"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let (client, _) = client_for(&server, Arc::new(MemoryTokenStore::with_pair("a", "r")));
        let mut new = leave("2025-03-03", "2025-03-05");
        new.attachment = Some(Attachment {
            file_name: "note.txt".to_string(),
            mime: "text/plain".to_string(),
            bytes: b"doctor's note".to_vec(),
        });
        let created = create(&client, &new).await.unwrap();
        assert_eq!(created.request.status, RequestStatus::Pending);
        assert_eq!(created.balances[0].available_days, 21.0);

        let received = server.received_requests().await.unwrap();
        let content_type = received[0]
            .headers
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        assert!(content_type.starts_with("multipart/form-data"), "{}", content_type);
        let body = String::from_utf8_lossy(&received[0].body);
        assert!(body.contains("name=\"timeoff_type\""));
        assert!(body.contains("filename=\"note.txt\""));
    }

    #[tokio::test]
    async fn test_mine_decodes_server_balances() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/timeoff/me/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "balances": [balance_json()],
                "requests": [request_json("APPROVED")]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let (client, _) = client_for(&server, Arc::new(MemoryTokenStore::with_pair("a", "r")));
        let summary = mine(&client).await.unwrap();
        let balance = &summary.balances[0];
        assert!(balance.type_id.is_none());
        assert_eq!(balance.allocated_days, 24.0);
        assert_eq!(balance.used_days, 3.0);
        assert_eq!(summary.requests[0].allocation_days, 3.0);
        assert_eq!(summary.requests[0].status, RequestStatus::Approved);
    }

    #[tokio::test]
    async fn test_admin_list_filters_and_reject_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/timeoff/admin/"))
            .and(query_param("status", "PENDING"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([request_json("PENDING")])))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/timeoff/admin/t1/reject/"))
            .and(body_json(json!({ "rejection_reason": "Team offsite" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "message": "Rejected",
                "request": request_json("REJECTED")
            })))
            .expect(1)
            .mount(&server)
            .await;

        let (client, _) = client_for(&server, Arc::new(MemoryTokenStore::with_pair("a", "r")));
        let pending = admin_list(
            &client,
            &AdminQuery {
                status: Some(RequestStatus::Pending),
                ..AdminQuery::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(pending.len(), 1);

        let reviewed = reject(&client, &pending[0].id, "Team offsite").await.unwrap();
        assert_eq!(reviewed.request.status, RequestStatus::Rejected);
    }

    #[tokio::test]
    async fn test_multipart_replayed_after_refresh() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/timeoff/me/"))
            .and(wiremock::matchers::header("authorization", "Bearer fresh"))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "request": request_json("PENDING"),
                "balances": [],
                "message": "ok"
            })))
            .with_priority(1)
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/timeoff/me/"))
            .respond_with(ResponseTemplate::new(401))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/auth/token/refresh/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "access": "fresh" })))
            .expect(1)
            .mount(&server)
            .await;

        let (client, _) = client_for(&server, Arc::new(MemoryTokenStore::with_pair("stale", "r")));
        create(&client, &leave("2025-03-03", "2025-03-05"))
            .await
            .unwrap();
    }
}
