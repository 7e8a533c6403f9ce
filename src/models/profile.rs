//! Profile, resume, bank, salary, skills and certifications

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileDetail {
    pub job_position: String,
    pub department: String,
    pub manager_name: String,
    pub location: String,
    pub about: String,
    pub what_i_love: String,
    pub interests_and_hobbies: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResumeDetail {
    pub address: String,
    pub personal_email: String,
    /// MALE, FEMALE, OTHER, PREFER_NOT_TO_SAY or empty
    pub gender: String,
    /// SINGLE, MARRIED, DIVORCED, WIDOWED or empty
    pub marital_status: String,
    pub date_of_joining: Option<String>,
    pub date_of_birth: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BankDetail {
    pub bank_account_number: String,
    pub bank_name: String,
    pub ifsc_code: String,
    pub upi_id: String,
}

/// Monetary amounts arrive as decimal strings and are passed through as-is.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SalaryStructure {
    pub basic_salary: String,
    pub hra_percentage: String,
    pub hra_fixed: String,
    pub hra_calculated: String,
    pub standard_allowance_percentage: String,
    pub standard_allowance_calculated: String,
    pub performance_bonus: String,
    pub leave_travel_allowance: String,
    pub gross_salary: String,
    pub pf_percentage: String,
    pub pf_contribution: String,
    pub professional_tax: String,
    pub income_tax: String,
    pub total_deductions: String,
    pub net_salary: String,
    pub annual_salary: String,
    pub monthly_working_days: u32,
    pub weeks_per_month: u32,
    pub year: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Skill {
    pub id: String,
    pub name: String,
    pub level: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SkillInput {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Certification {
    pub id: String,
    pub title: String,
    pub issuer: String,
    pub issued_date: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CertificationInput {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issuer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issued_date: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FullProfile {
    pub id: String,
    pub full_name: String,
    pub login_id: String,
    pub email: String,
    pub phone: String,
    pub company_name: String,
    pub role: String,
    pub profile: ProfileDetail,
    pub resume: ResumeDetail,
    pub bank: BankDetail,
    #[serde(default)]
    pub salary: Option<SalaryStructure>,
    pub skills: Vec<Skill>,
    pub certifications: Vec<Certification>,
}

/// Partial update of the full profile. Each section is a JSON object of the
/// fields to change; absent sections are left alone.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile: Option<serde_json::Map<String, serde_json::Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resume: Option<serde_json::Map<String, serde_json::Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bank: Option<serde_json::Map<String, serde_json::Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub salary: Option<serde_json::Map<String, serde_json::Value>>,
}
