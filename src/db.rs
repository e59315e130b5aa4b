// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! SurrealDB integration for contact submissions, projects, and skills.

use crate::{
    error::{AppError, Result},
    models::{
        ContactStatus, ContactSubmission, Project, ProjectCategory, Skill, SkillCategory,
    },
};
use chrono::Utc;
use surrealdb::{
    engine::local::{Db, Mem},
    Surreal,
};

/// Database connection wrapper
#[derive(Clone)]
pub struct Database {
    db: Surreal<Db>,
}

impl Database {
    /// Connect to SurrealDB. `"memory"` selects the in-memory engine.
    pub async fn connect(path: &str) -> Result<Self> {
        let db = if path == "memory" {
            Surreal::new::<Mem>(()).await?
        } else {
            Self::open_persistent(path).await?
        };

        // Use namespace and database
        db.use_ns("portfolio").use_db("site").await?;

        // Initialize schema
        Self::init_schema(&db).await?;

        Ok(Self { db })
    }

    #[cfg(feature = "rocksdb")]
    async fn open_persistent(path: &str) -> Result<Surreal<Db>> {
        Ok(Surreal::new::<surrealdb::engine::local::RocksDb>(path).await?)
    }

    #[cfg(not(feature = "rocksdb"))]
    async fn open_persistent(path: &str) -> Result<Surreal<Db>> {
        Err(AppError::Internal(format!(
            "storage path {path} requires the rocksdb feature; use \"memory\""
        )))
    }

    /// Initialize database schema
    async fn init_schema(db: &Surreal<Db>) -> Result<()> {
        // Contact submissions table
        db.query(
            r#"
            DEFINE TABLE IF NOT EXISTS contacts SCHEMAFULL;
            DEFINE FIELD IF NOT EXISTS name ON contacts TYPE string;
            DEFINE FIELD IF NOT EXISTS subject ON contacts TYPE string;
            DEFINE FIELD IF NOT EXISTS message ON contacts TYPE string;
            DEFINE FIELD IF NOT EXISTS ip_address ON contacts TYPE string;
            DEFINE FIELD IF NOT EXISTS user_agent ON contacts TYPE option<string>;
            DEFINE FIELD IF NOT EXISTS status ON contacts TYPE string;
            DEFINE FIELD IF NOT EXISTS form_duration_ms ON contacts TYPE int;
            DEFINE FIELD IF NOT EXISTS submitted_at ON contacts TYPE string;
            DEFINE FIELD IF NOT EXISTS created_at ON contacts TYPE string;
            DEFINE FIELD IF NOT EXISTS updated_at ON contacts TYPE string;

            DEFINE INDEX IF NOT EXISTS contact_status_idx ON contacts COLUMNS status;
        "#,
        )
        .await?;

        // Projects table
        db.query(
            r#"
            DEFINE TABLE IF NOT EXISTS projects SCHEMAFULL;
            DEFINE FIELD IF NOT EXISTS title ON projects TYPE string;
            DEFINE FIELD IF NOT EXISTS description ON projects TYPE string;
            DEFINE FIELD IF NOT EXISTS short_description ON projects TYPE string;
            DEFINE FIELD IF NOT EXISTS technologies ON projects TYPE array;
            DEFINE FIELD IF NOT EXISTS images ON projects TYPE array;
            DEFINE FIELD IF NOT EXISTS live_url ON projects TYPE option<string>;
            DEFINE FIELD IF NOT EXISTS github_url ON projects TYPE option<string>;
            DEFINE FIELD IF NOT EXISTS featured ON projects TYPE bool;
            DEFINE FIELD IF NOT EXISTS category ON projects TYPE string;
            DEFINE FIELD IF NOT EXISTS status ON projects TYPE string;
            DEFINE FIELD IF NOT EXISTS start_date ON projects TYPE string;
            DEFINE FIELD IF NOT EXISTS end_date ON projects TYPE option<string>;
            DEFINE FIELD IF NOT EXISTS display_order ON projects TYPE int;
            DEFINE FIELD IF NOT EXISTS created_at ON projects TYPE string;
            DEFINE FIELD IF NOT EXISTS updated_at ON projects TYPE string;

            DEFINE INDEX IF NOT EXISTS project_category_idx ON projects COLUMNS category;
            DEFINE INDEX IF NOT EXISTS project_featured_idx ON projects COLUMNS featured;
        "#,
        )
        .await?;

        // Skills table
        db.query(
            r#"
            DEFINE TABLE IF NOT EXISTS skills SCHEMAFULL;
            DEFINE FIELD IF NOT EXISTS name ON skills TYPE string;
            DEFINE FIELD IF NOT EXISTS category ON skills TYPE string;
            DEFINE FIELD IF NOT EXISTS level ON skills TYPE string;
            DEFINE FIELD IF NOT EXISTS percentage ON skills TYPE int;
            DEFINE FIELD IF NOT EXISTS icon ON skills TYPE string;
            DEFINE FIELD IF NOT EXISTS color ON skills TYPE string;
            DEFINE FIELD IF NOT EXISTS years_of_experience ON skills TYPE number;
            DEFINE FIELD IF NOT EXISTS display_order ON skills TYPE int;
            DEFINE FIELD IF NOT EXISTS created_at ON skills TYPE string;
            DEFINE FIELD IF NOT EXISTS updated_at ON skills TYPE string;

            DEFINE INDEX IF NOT EXISTS skill_category_idx ON skills COLUMNS category;
        "#,
        )
        .await?;

        Ok(())
    }

    // ------------------------------------------------------------------
    // Contact submissions
    // ------------------------------------------------------------------

    /// Persist an accepted contact submission.
    pub async fn create_contact(&self, contact: &ContactSubmission) -> Result<()> {
        self.db
            .query("CREATE type::thing('contacts', $id) CONTENT $content RETURN NONE")
            .bind(("id", contact.id.clone()))
            .bind(("content", record_content(contact)?))
            .await?
            .check()?;
        Ok(())
    }

    /// Get a contact submission by id.
    pub async fn get_contact(&self, id: &str) -> Result<ContactSubmission> {
        let mut result = self
            .db
            .query("SELECT *, meta::id(id) AS id FROM type::thing('contacts', $id)")
            .bind(("id", id.to_string()))
            .await?;

        let contacts: Vec<ContactSubmission> = result.take(0)?;
        contacts
            .into_iter()
            .next()
            .ok_or_else(|| AppError::NotFound("Contact not found".to_string()))
    }

    /// List contact submissions, newest first, optionally filtered by status.
    ///
    /// Returns the page of records and the total count for the filter.
    pub async fn list_contacts(
        &self,
        status: Option<ContactStatus>,
        page: u32,
        limit: u32,
    ) -> Result<(Vec<ContactSubmission>, u32)> {
        let condition = status.map(|s| format!(" WHERE status = '{}'", s.as_str()));
        let where_clause = condition.as_deref().unwrap_or("");

        let mut query = format!("SELECT *, meta::id(id) AS id FROM contacts{where_clause}");
        query.push_str(" ORDER BY created_at DESC");
        query.push_str(&page_window(page, limit));

        let mut result = self.db.query(&query).await?;
        let contacts: Vec<ContactSubmission> = result.take(0)?;

        let total = self.count("contacts", where_clause).await?;
        Ok((contacts, total))
    }

    /// Update the status of a contact submission.
    pub async fn update_contact_status(
        &self,
        id: &str,
        status: ContactStatus,
    ) -> Result<ContactSubmission> {
        // UPDATE on a missing record would create it, so probe first
        self.get_contact(id).await?;

        self.db
            .query("UPDATE type::thing('contacts', $id) MERGE $patch RETURN NONE")
            .bind(("id", id.to_string()))
            .bind((
                "patch",
                serde_json::json!({
                    "status": status,
                    "updated_at": Utc::now(),
                }),
            ))
            .await?
            .check()?;

        self.get_contact(id).await
    }

    // ------------------------------------------------------------------
    // Projects
    // ------------------------------------------------------------------

    /// Persist a new project.
    pub async fn create_project(&self, project: &Project) -> Result<()> {
        self.db
            .query("CREATE type::thing('projects', $id) CONTENT $content RETURN NONE")
            .bind(("id", project.id.clone()))
            .bind(("content", record_content(project)?))
            .await?
            .check()?;
        Ok(())
    }

    /// Get a project by id.
    pub async fn get_project(&self, id: &str) -> Result<Project> {
        let mut result = self
            .db
            .query("SELECT *, meta::id(id) AS id FROM type::thing('projects', $id)")
            .bind(("id", id.to_string()))
            .await?;

        let projects: Vec<Project> = result.take(0)?;
        projects
            .into_iter()
            .next()
            .ok_or_else(|| AppError::NotFound("Project not found".to_string()))
    }

    /// List projects by manual order then recency, with optional filters.
    pub async fn list_projects(
        &self,
        category: Option<ProjectCategory>,
        featured: Option<bool>,
        page: u32,
        limit: u32,
    ) -> Result<(Vec<Project>, u32)> {
        let mut conditions = Vec::new();
        if let Some(category) = category {
            conditions.push(format!("category = '{}'", category.as_str()));
        }
        if let Some(featured) = featured {
            conditions.push(format!("featured = {featured}"));
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", conditions.join(" AND "))
        };

        let mut query = format!("SELECT *, meta::id(id) AS id FROM projects{where_clause}");
        query.push_str(" ORDER BY display_order ASC, created_at DESC");
        query.push_str(&page_window(page, limit));

        let mut result = self.db.query(&query).await?;
        let projects: Vec<Project> = result.take(0)?;

        let total = self.count("projects", &where_clause).await?;
        Ok((projects, total))
    }

    /// Merge a patch into a project and return the updated record.
    pub async fn update_project(&self, id: &str, patch: serde_json::Value) -> Result<Project> {
        self.get_project(id).await?;

        self.db
            .query("UPDATE type::thing('projects', $id) MERGE $patch RETURN NONE")
            .bind(("id", id.to_string()))
            .bind(("patch", stamp_updated(patch)))
            .await?
            .check()?;

        self.get_project(id).await
    }

    /// Delete a project.
    pub async fn delete_project(&self, id: &str) -> Result<()> {
        self.get_project(id).await?;

        self.db
            .query("DELETE type::thing('projects', $id)")
            .bind(("id", id.to_string()))
            .await?
            .check()?;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Skills
    // ------------------------------------------------------------------

    /// Persist a new skill.
    pub async fn create_skill(&self, skill: &Skill) -> Result<()> {
        self.db
            .query("CREATE type::thing('skills', $id) CONTENT $content RETURN NONE")
            .bind(("id", skill.id.clone()))
            .bind(("content", record_content(skill)?))
            .await?
            .check()?;
        Ok(())
    }

    /// Get a skill by id.
    pub async fn get_skill(&self, id: &str) -> Result<Skill> {
        let mut result = self
            .db
            .query("SELECT *, meta::id(id) AS id FROM type::thing('skills', $id)")
            .bind(("id", id.to_string()))
            .await?;

        let skills: Vec<Skill> = result.take(0)?;
        skills
            .into_iter()
            .next()
            .ok_or_else(|| AppError::NotFound("Skill not found".to_string()))
    }

    /// List skills by manual order then recency, optionally by category.
    pub async fn list_skills(
        &self,
        category: Option<SkillCategory>,
        page: u32,
        limit: u32,
    ) -> Result<(Vec<Skill>, u32)> {
        let condition = category.map(|c| format!(" WHERE category = '{}'", c.as_str()));
        let where_clause = condition.as_deref().unwrap_or("");

        let mut query = format!("SELECT *, meta::id(id) AS id FROM skills{where_clause}");
        query.push_str(" ORDER BY display_order ASC, created_at DESC");
        query.push_str(&page_window(page, limit));

        let mut result = self.db.query(&query).await?;
        let skills: Vec<Skill> = result.take(0)?;

        let total = self.count("skills", where_clause).await?;
        Ok((skills, total))
    }

    /// Merge a patch into a skill and return the updated record.
    pub async fn update_skill(&self, id: &str, patch: serde_json::Value) -> Result<Skill> {
        self.get_skill(id).await?;

        self.db
            .query("UPDATE type::thing('skills', $id) MERGE $patch RETURN NONE")
            .bind(("id", id.to_string()))
            .bind(("patch", stamp_updated(patch)))
            .await?
            .check()?;

        self.get_skill(id).await
    }

    /// Delete a skill.
    pub async fn delete_skill(&self, id: &str) -> Result<()> {
        self.get_skill(id).await?;

        self.db
            .query("DELETE type::thing('skills', $id)")
            .bind(("id", id.to_string()))
            .await?
            .check()?;
        Ok(())
    }

    /// Count records in `table` matching an already-rendered WHERE clause.
    async fn count(&self, table: &str, where_clause: &str) -> Result<u32> {
        let query = format!("SELECT count() FROM {table}{where_clause} GROUP ALL");
        let mut result = self.db.query(&query).await?;
        let total: Option<i64> = result.take("count")?;
        Ok(total.unwrap_or(0).max(0) as u32)
    }
}

/// Serialize a record for storage, dropping the id (it lives in the record
/// key) and null optionals (schema optionals expect absence, not null).
fn record_content<T: serde::Serialize>(record: &T) -> Result<serde_json::Value> {
    let mut value = serde_json::to_value(record)?;
    if let Some(fields) = value.as_object_mut() {
        fields.remove("id");
        fields.retain(|_, v| !v.is_null());
    }
    Ok(value)
}

/// Add the updated_at stamp to a merge patch.
fn stamp_updated(mut patch: serde_json::Value) -> serde_json::Value {
    if let Some(fields) = patch.as_object_mut() {
        fields.insert("updated_at".to_string(), serde_json::json!(Utc::now()));
    }
    patch
}

/// Render the LIMIT/START window for a 1-based page.
fn page_window(page: u32, limit: u32) -> String {
    let start = (page.max(1) - 1) as u64 * limit as u64;
    format!(" LIMIT {limit} START {start}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_window() {
        assert_eq!(page_window(1, 10), " LIMIT 10 START 0");
        assert_eq!(page_window(3, 10), " LIMIT 10 START 20");
        assert_eq!(page_window(0, 10), " LIMIT 10 START 0");
    }

    #[test]
    fn test_record_content_strips_id_and_nulls() {
        let value = record_content(&serde_json::json!({
            "id": "abc",
            "title": "site",
            "live_url": null,
        }))
        .unwrap();

        let fields = value.as_object().unwrap();
        assert!(!fields.contains_key("id"));
        assert!(!fields.contains_key("live_url"));
        assert_eq!(fields["title"], "site");
    }
}
