//! Account and authentication models

use serde::{Deserialize, Serialize};

/// Account role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    Admin,
    Hr,
    #[default]
    Employee,
}

impl Role {
    pub fn is_staff(self) -> bool {
        matches!(self, Role::Admin | Role::Hr)
    }
}

/// Signed-in user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub login_id: String,
    pub company_name: String,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub role: Role,
}

/// Admin sign-up form
#[derive(Debug, Clone, Serialize)]
pub struct SignUpData {
    pub company_name: String,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub password: String,
    pub confirm_password: String,
}

/// Sign-in form. `login_identifier` is an email or a login ID.
#[derive(Debug, Clone, Serialize)]
pub struct SignInData {
    pub login_identifier: String,
    pub password: String,
}

/// Response of sign-in and sign-up
#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    pub user: User,
    pub access: String,
    pub refresh: String,
}
