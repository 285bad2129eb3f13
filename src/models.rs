//! Data models for the salary dashboard.
//!
//! This module contains the records received from the salary API and the
//! summaries derived from them for rendering.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Experience level code of a salary record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExperienceLevel {
    /// Entry-level / junior
    #[serde(rename = "EN")]
    Entry,
    /// Mid-level / intermediate
    #[serde(rename = "MI")]
    Mid,
    /// Senior-level / expert
    #[serde(rename = "SE")]
    Senior,
    /// Executive-level / director
    #[serde(rename = "EX")]
    Executive,
    /// Any code the API sends that we don't know about
    #[serde(other)]
    Unknown,
}

/// Employment type code of a salary record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EmploymentType {
    #[serde(rename = "FT")]
    FullTime,
    #[serde(rename = "PT")]
    PartTime,
    #[serde(rename = "CT")]
    Contract,
    #[serde(rename = "FL")]
    Freelance,
    #[serde(other)]
    Unknown,
}

/// Company size code of a salary record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CompanySize {
    #[serde(rename = "S")]
    Small,
    #[serde(rename = "M")]
    Medium,
    #[serde(rename = "L")]
    Large,
    #[serde(other)]
    Unknown,
}

/// One compensation data point as returned by the salary API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[allow(dead_code)] // Full API record; only some fields feed the aggregations
pub struct SalaryRecord {
    /// Year the salary was paid.
    pub work_year: i32,
    /// Experience level of the employee.
    pub experience_level: ExperienceLevel,
    /// Type of employment.
    pub employment_type: EmploymentType,
    /// Job title, kept exactly as sent (no case or whitespace folding).
    pub job_title: String,
    /// Gross salary in the original currency.
    pub salary: f64,
    /// ISO 4217 code of `salary`.
    pub salary_currency: String,
    /// Gross salary converted to USD.
    pub salary_in_usd: f64,
    /// Country of residence of the employee.
    pub employee_residence: String,
    /// Share of remote work, 0 to 100.
    pub remote_ratio: u8,
    /// Country of the employer's main office.
    pub company_location: String,
    /// Size of the employer.
    pub company_size: CompanySize,
}

/// Per-year aggregate over salary records.
///
/// Only the aggregator builds these, so `job_count` is never zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YearSummary {
    #[serde(rename = "work_year")]
    pub work_year: i32,
    pub job_count: usize,
    /// Sum of `salary_in_usd` over the year.
    pub total_salary: f64,
    /// `total_salary / job_count`, rounded half up.
    pub avg_salary: i64,
}

/// Number of records for one job title within a single year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobTitleCount {
    pub job_title: String,
    pub job_count: usize,
}

/// Headline numbers shown on the dashboard cards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardTotals {
    /// Sum of job counts across all years.
    pub total_jobs: usize,
    /// Average of the yearly averages; `None` when there is no data.
    pub average_salary: Option<i64>,
    /// Number of distinct years.
    pub years_of_data: usize,
}

/// Author of a chat log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Ai,
}

impl fmt::Display for Sender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sender::User => write!(f, "You"),
            Sender::Ai => write!(f, "Assistant"),
        }
    }
}

/// A single entry in the chat log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub text: String,
    pub sender: Sender,
    pub sent_at: DateTime<Utc>,
}

impl ChatMessage {
    /// Creates a user-authored entry stamped with the current time.
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            sender: Sender::User,
            sent_at: Utc::now(),
        }
    }

    /// Creates an assistant-authored entry stamped with the current time.
    pub fn ai(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            sender: Sender::Ai,
            sent_at: Utc::now(),
        }
    }
}
