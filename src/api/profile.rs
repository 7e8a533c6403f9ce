//! Profile endpoints for the signed-in user

use super::{ApiClient, ApiError, ApiRequest};
use crate::models::{
    Certification, CertificationInput, FullProfile, ProfileUpdate, SalaryStructure, Skill,
    SkillInput,
};

pub async fn full_profile(client: &ApiClient) -> Result<FullProfile, ApiError> {
    client.fetch(ApiRequest::get("/profile/me/full/")).await
}

pub async fn update_profile(
    client: &ApiClient,
    update: &ProfileUpdate,
) -> Result<FullProfile, ApiError> {
    client
        .fetch(ApiRequest::patch("/profile/me/full/").json(update)?)
        .await
}

pub async fn skills(client: &ApiClient) -> Result<Vec<Skill>, ApiError> {
    client.fetch(ApiRequest::get("/profile/me/skills/")).await
}

pub async fn add_skill(client: &ApiClient, skill: &SkillInput) -> Result<Skill, ApiError> {
    client
        .fetch(ApiRequest::post("/profile/me/skills/").json(skill)?)
        .await
}

pub async fn update_skill(
    client: &ApiClient,
    id: &str,
    skill: &SkillInput,
) -> Result<Skill, ApiError> {
    client
        .fetch(ApiRequest::put(format!("/profile/me/skills/{}/", id)).json(skill)?)
        .await
}

pub async fn delete_skill(client: &ApiClient, id: &str) -> Result<(), ApiError> {
    client
        .send_ignoring_body(ApiRequest::delete(format!("/profile/me/skills/{}/", id)))
        .await
}

pub async fn certifications(client: &ApiClient) -> Result<Vec<Certification>, ApiError> {
    client.fetch(ApiRequest::get("/profile/me/certifications/")).await
}

pub async fn add_certification(
    client: &ApiClient,
    cert: &CertificationInput,
) -> Result<Certification, ApiError> {
    client
        .fetch(ApiRequest::post("/profile/me/certifications/").json(cert)?)
        .await
}

pub async fn update_certification(
    client: &ApiClient,
    id: &str,
    cert: &CertificationInput,
) -> Result<Certification, ApiError> {
    client
        .fetch(ApiRequest::put(format!("/profile/me/certifications/{}/", id)).json(cert)?)
        .await
}

pub async fn delete_certification(client: &ApiClient, id: &str) -> Result<(), ApiError> {
    client
        .send_ignoring_body(ApiRequest::delete(format!(
            "/profile/me/certifications/{}/",
            id
        )))
        .await
}

/// Salary structure (admin/HR only; others get 403).
pub async fn salary(client: &ApiClient) -> Result<SalaryStructure, ApiError> {
    client.fetch(ApiRequest::get("/profile/me/salary/")).await
}

/// Replace salary fields (admin/HR only). Only the given fields are sent.
pub async fn update_salary(
    client: &ApiClient,
    fields: &serde_json::Map<String, serde_json::Value>,
) -> Result<SalaryStructure, ApiError> {
    client
        .fetch(ApiRequest::put("/profile/me/salary/").json(fields)?)
        .await
}
