//! Employee directory endpoints

use super::{ApiClient, ApiError, ApiRequest};
use crate::models::{EmployeeDetail, EmployeePage};

pub async fn list(
    client: &ApiClient,
    search: Option<&str>,
    page: Option<u32>,
) -> Result<EmployeePage, ApiError> {
    client
        .fetch(
            ApiRequest::get("/employees/")
                .query("search", search)
                .query("page", page),
        )
        .await
}

pub async fn get(client: &ApiClient, id: &str) -> Result<EmployeeDetail, ApiError> {
    client.fetch(ApiRequest::get(format!("/employees/{}/", id))).await
}
