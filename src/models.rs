// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Data models for contact submissions, projects, and skills.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle status of a stored contact submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContactStatus {
    New,
    Read,
    Replied,
}

impl ContactStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Read => "read",
            Self::Replied => "replied",
        }
    }
}

impl Default for ContactStatus {
    fn default() -> Self {
        Self::New
    }
}

impl std::str::FromStr for ContactStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "new" => Ok(Self::New),
            "read" => Ok(Self::Read),
            "replied" => Ok(Self::Replied),
            other => Err(format!("Invalid status value: {other}")),
        }
    }
}

/// A stored contact-form submission.
///
/// Immutable after creation except for `status`, which an admin may advance
/// through the read/replied lifecycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactSubmission {
    pub id: String,
    pub name: String,
    pub subject: String,
    pub message: String,
    /// Client network address the submission arrived from.
    pub ip_address: String,
    pub user_agent: Option<String>,
    pub status: ContactStatus,
    /// Milliseconds between form render and submission, 0 when unknown.
    pub form_duration_ms: i64,
    pub submitted_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ContactSubmission {
    /// Build a new submission from an accepted request.
    pub fn new(
        name: &str,
        subject: &str,
        message: &str,
        ip_address: String,
        user_agent: Option<String>,
        form_duration_ms: i64,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.trim().to_string(),
            subject: subject.trim().to_string(),
            message: message.trim().to_string(),
            ip_address,
            user_agent,
            status: ContactStatus::New,
            form_duration_ms,
            submitted_at: now,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Incoming contact-form request body.
///
/// Field names match the form payload the frontend posts. Everything is
/// optional at the serde level so the gate can produce its own rejection
/// reasons instead of a deserializer error.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub captcha_answer: Option<String>,
    #[serde(default)]
    pub captcha_expected: Option<i64>,
    /// Epoch milliseconds at which the client rendered the form.
    #[serde(default)]
    pub form_start_time: Option<i64>,
    /// Honeypot field, hidden from humans. Must stay blank.
    #[serde(default)]
    pub website: Option<String>,
}

/// Body for `PUT /api/contact/:id/status`.
///
/// The status arrives as a plain string so an unknown value maps to a 400
/// with a message instead of a deserializer rejection.
#[derive(Debug, Clone, Deserialize)]
pub struct ContactStatusUpdate {
    pub status: String,
}

/// Acknowledgment returned for an accepted submission.
#[derive(Debug, Serialize, Deserialize)]
pub struct ContactAck {
    pub message: String,
    pub id: String,
}

/// Project category taxonomy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectCategory {
    Web,
    Mobile,
    Desktop,
    Ai,
    Other,
}

impl ProjectCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Web => "web",
            Self::Mobile => "mobile",
            Self::Desktop => "desktop",
            Self::Ai => "ai",
            Self::Other => "other",
        }
    }
}

impl Default for ProjectCategory {
    fn default() -> Self {
        Self::Web
    }
}

/// Completion state of a project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProjectStatus {
    #[serde(rename = "completed")]
    Completed,
    #[serde(rename = "in-progress")]
    InProgress,
    #[serde(rename = "planned")]
    Planned,
}

impl Default for ProjectStatus {
    fn default() -> Self {
        Self::Completed
    }
}

/// A portfolio project record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub title: String,
    pub description: String,
    pub short_description: String,
    pub technologies: Vec<String>,
    pub images: Vec<String>,
    pub live_url: Option<String>,
    pub github_url: Option<String>,
    pub featured: bool,
    pub category: ProjectCategory,
    pub status: ProjectStatus,
    pub start_date: DateTime<Utc>,
    pub end_date: Option<DateTime<Utc>>,
    /// Manual ordering key; lower values list first.
    pub display_order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Payload for creating a project.
#[derive(Debug, Clone, Deserialize)]
pub struct NewProject {
    pub title: String,
    pub description: String,
    pub short_description: String,
    #[serde(default)]
    pub technologies: Vec<String>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub live_url: Option<String>,
    #[serde(default)]
    pub github_url: Option<String>,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub category: ProjectCategory,
    #[serde(default)]
    pub status: ProjectStatus,
    #[serde(default)]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub display_order: i32,
}

impl NewProject {
    /// Field-level validation, mirroring the store schema requirements.
    pub fn validate(&self) -> Result<(), String> {
        if self.title.trim().is_empty() {
            return Err("Project title is required".to_string());
        }
        if self.description.trim().is_empty() {
            return Err("Project description is required".to_string());
        }
        if self.short_description.trim().is_empty() {
            return Err("Project short description is required".to_string());
        }
        Ok(())
    }

    pub fn into_project(self) -> Project {
        let now = Utc::now();
        Project {
            id: Uuid::new_v4().to_string(),
            title: self.title.trim().to_string(),
            description: self.description,
            short_description: self.short_description,
            technologies: self.technologies,
            images: self.images,
            live_url: self.live_url,
            github_url: self.github_url,
            featured: self.featured,
            category: self.category,
            status: self.status,
            start_date: self.start_date.unwrap_or(now),
            end_date: self.end_date,
            display_order: self.display_order,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Partial update payload for a project. Absent fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ProjectPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub technologies: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub live_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub featured: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<ProjectCategory>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ProjectStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_order: Option<i32>,
}

impl ProjectPatch {
    pub fn validate(&self) -> Result<(), String> {
        if matches!(&self.title, Some(t) if t.trim().is_empty()) {
            return Err("Project title cannot be empty".to_string());
        }
        if matches!(&self.description, Some(d) if d.trim().is_empty()) {
            return Err("Project description cannot be empty".to_string());
        }
        if matches!(&self.short_description, Some(d) if d.trim().is_empty()) {
            return Err("Project short description cannot be empty".to_string());
        }
        Ok(())
    }
}

/// Skill category taxonomy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SkillCategory {
    Frontend,
    Backend,
    Database,
    Tools,
    Other,
}

impl SkillCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Frontend => "frontend",
            Self::Backend => "backend",
            Self::Database => "database",
            Self::Tools => "tools",
            Self::Other => "other",
        }
    }
}

/// Self-assessed proficiency level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SkillLevel {
    Beginner,
    Intermediate,
    Advanced,
    Expert,
}

impl Default for SkillLevel {
    fn default() -> Self {
        Self::Intermediate
    }
}

/// A skill record shown on the site.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Skill {
    pub id: String,
    pub name: String,
    pub category: SkillCategory,
    pub level: SkillLevel,
    /// Proficiency bar value, 0 to 100.
    pub percentage: i32,
    pub icon: String,
    pub color: String,
    pub years_of_experience: f32,
    pub display_order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn default_percentage() -> i32 {
    50
}

fn default_color() -> String {
    "#6366f1".to_string()
}

/// Payload for creating a skill.
#[derive(Debug, Clone, Deserialize)]
pub struct NewSkill {
    pub name: String,
    pub category: SkillCategory,
    #[serde(default)]
    pub level: SkillLevel,
    #[serde(default = "default_percentage")]
    pub percentage: i32,
    #[serde(default)]
    pub icon: String,
    #[serde(default = "default_color")]
    pub color: String,
    #[serde(default)]
    pub years_of_experience: f32,
    #[serde(default)]
    pub display_order: i32,
}

impl NewSkill {
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("Skill name is required".to_string());
        }
        if !(0..=100).contains(&self.percentage) {
            return Err("Skill percentage must be between 0 and 100".to_string());
        }
        Ok(())
    }

    pub fn into_skill(self) -> Skill {
        let now = Utc::now();
        Skill {
            id: Uuid::new_v4().to_string(),
            name: self.name.trim().to_string(),
            category: self.category,
            level: self.level,
            percentage: self.percentage,
            icon: self.icon,
            color: self.color,
            years_of_experience: self.years_of_experience,
            display_order: self.display_order,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Partial update payload for a skill.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SkillPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<SkillCategory>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<SkillLevel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub percentage: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub years_of_experience: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_order: Option<i32>,
}

impl SkillPatch {
    pub fn validate(&self) -> Result<(), String> {
        if matches!(&self.name, Some(n) if n.trim().is_empty()) {
            return Err("Skill name cannot be empty".to_string());
        }
        if matches!(self.percentage, Some(p) if !(0..=100).contains(&p)) {
            return Err("Skill percentage must be between 0 and 100".to_string());
        }
        Ok(())
    }
}

/// Page metadata attached to list responses.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Pagination {
    pub current_page: u32,
    pub total_pages: u32,
    pub total: u32,
}

impl Pagination {
    /// Compute page metadata for `total` records at `limit` per page.
    pub fn new(current_page: u32, limit: u32, total: u32) -> Self {
        let total_pages = total.div_ceil(limit.max(1));
        Self {
            current_page,
            total_pages,
            total,
        }
    }
}

/// Query parameters for `GET /api/contact`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContactListQuery {
    #[serde(default)]
    pub status: Option<ContactStatus>,
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub limit: Option<u32>,
}

/// Query parameters for `GET /api/projects`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProjectListQuery {
    #[serde(default)]
    pub category: Option<ProjectCategory>,
    #[serde(default)]
    pub featured: Option<bool>,
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub limit: Option<u32>,
}

/// Query parameters for `GET /api/skills`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SkillListQuery {
    #[serde(default)]
    pub category: Option<SkillCategory>,
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub limit: Option<u32>,
}

/// Response body for `GET /api/contact`.
#[derive(Debug, Serialize, Deserialize)]
pub struct ContactListResponse {
    pub contacts: Vec<ContactSubmission>,
    pub pagination: Pagination,
}

/// Response body for `GET /api/projects`.
#[derive(Debug, Serialize, Deserialize)]
pub struct ProjectListResponse {
    pub projects: Vec<Project>,
    pub pagination: Pagination,
}

/// Response body for `GET /api/skills`.
#[derive(Debug, Serialize, Deserialize)]
pub struct SkillListResponse {
    pub skills: Vec<Skill>,
    pub pagination: Pagination,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_rounds_up() {
        let p = Pagination::new(1, 10, 25);
        assert_eq!(p.total_pages, 3);

        let p = Pagination::new(1, 10, 30);
        assert_eq!(p.total_pages, 3);

        let p = Pagination::new(1, 10, 0);
        assert_eq!(p.total_pages, 0);
    }

    #[test]
    fn test_contact_request_accepts_form_field_names() {
        let body = r#"{
            "name": "Ada",
            "subject": "Hello",
            "message": "Just saying hi",
            "captchaAnswer": "7",
            "captchaExpected": 7,
            "formStartTime": 1700000000000,
            "website": ""
        }"#;
        let req: ContactRequest = serde_json::from_str(body).unwrap();
        assert_eq!(req.captcha_answer.as_deref(), Some("7"));
        assert_eq!(req.captcha_expected, Some(7));
        assert_eq!(req.form_start_time, Some(1_700_000_000_000));
    }

    #[test]
    fn test_new_project_defaults() {
        let body = r#"{
            "title": "Site",
            "description": "A site",
            "short_description": "site"
        }"#;
        let new: NewProject = serde_json::from_str(body).unwrap();
        assert!(new.validate().is_ok());
        let project = new.into_project();
        assert_eq!(project.category, ProjectCategory::Web);
        assert_eq!(project.status, ProjectStatus::Completed);
        assert!(!project.featured);
        assert_eq!(project.display_order, 0);
    }

    #[test]
    fn test_skill_percentage_bounds() {
        let skill = NewSkill {
            name: "Rust".to_string(),
            category: SkillCategory::Backend,
            level: SkillLevel::Advanced,
            percentage: 120,
            icon: String::new(),
            color: default_color(),
            years_of_experience: 3.0,
            display_order: 0,
        };
        assert!(skill.validate().is_err());
    }

    #[test]
    fn test_contact_status_parse() {
        assert_eq!("replied".parse::<ContactStatus>(), Ok(ContactStatus::Replied));
        assert!("archived".parse::<ContactStatus>().is_err());
    }

    #[test]
    fn test_project_status_wire_format() {
        let status: ProjectStatus = serde_json::from_str("\"in-progress\"").unwrap();
        assert_eq!(status, ProjectStatus::InProgress);
        assert_eq!(
            serde_json::to_string(&ProjectStatus::InProgress).unwrap(),
            "\"in-progress\""
        );
    }
}
