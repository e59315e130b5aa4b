// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Store-level tests for project, skill, and contact CRUD.

use portfolio_api::{
    db::Database,
    error::AppError,
    models::{
        ContactStatus, ContactSubmission, NewProject, NewSkill, Pagination, ProjectCategory,
        ProjectPatch, ProjectStatus, SkillCategory, SkillLevel,
    },
};
use std::collections::HashSet;

async fn store() -> Database {
    Database::connect("memory").await.expect("in-memory store")
}

fn sample_project(title: &str, display_order: i32) -> NewProject {
    NewProject {
        title: title.to_string(),
        description: "A longer description of the work involved".to_string(),
        short_description: "Short blurb".to_string(),
        technologies: vec!["rust".to_string(), "axum".to_string()],
        images: vec!["/img/cover.png".to_string()],
        live_url: Some("https://demo.example.net".to_string()),
        github_url: None,
        featured: false,
        category: ProjectCategory::Web,
        status: ProjectStatus::Completed,
        start_date: None,
        end_date: None,
        display_order,
    }
}

#[tokio::test]
async fn test_project_round_trip() {
    let db = store().await;

    let project = sample_project("Terrain renderer", 4).into_project();
    db.create_project(&project).await.expect("create");

    let fetched = db.get_project(&project.id).await.expect("fetch");

    assert_eq!(fetched.id, project.id);
    assert_eq!(fetched.title, project.title);
    assert_eq!(fetched.description, project.description);
    assert_eq!(fetched.short_description, project.short_description);
    assert_eq!(fetched.technologies, project.technologies);
    assert_eq!(fetched.images, project.images);
    assert_eq!(fetched.live_url, project.live_url);
    assert_eq!(fetched.github_url, project.github_url);
    assert_eq!(fetched.featured, project.featured);
    assert_eq!(fetched.category, project.category);
    assert_eq!(fetched.status, project.status);
    assert_eq!(fetched.display_order, project.display_order);
}

#[tokio::test]
async fn test_get_missing_project_is_not_found() {
    let db = store().await;

    let result = db.get_project("does-not-exist").await;
    assert!(matches!(result, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn test_project_update_merges_fields() {
    let db = store().await;

    let project = sample_project("Old title", 0).into_project();
    db.create_project(&project).await.expect("create");

    let patch = ProjectPatch {
        title: Some("New title".to_string()),
        featured: Some(true),
        status: Some(ProjectStatus::InProgress),
        ..ProjectPatch::default()
    };
    let patch = serde_json::to_value(&patch).expect("patch serializes");

    let updated = db.update_project(&project.id, patch).await.expect("update");

    assert_eq!(updated.title, "New title");
    assert!(updated.featured);
    assert_eq!(updated.status, ProjectStatus::InProgress);
    // untouched fields survive the merge
    assert_eq!(updated.description, project.description);
    assert_eq!(updated.technologies, project.technologies);
    assert!(updated.updated_at >= project.updated_at);
}

#[tokio::test]
async fn test_project_delete_removes_record() {
    let db = store().await;

    let project = sample_project("Ephemeral", 0).into_project();
    db.create_project(&project).await.expect("create");

    db.delete_project(&project.id).await.expect("delete");

    assert!(matches!(
        db.get_project(&project.id).await,
        Err(AppError::NotFound(_))
    ));
    assert!(matches!(
        db.delete_project(&project.id).await,
        Err(AppError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_project_list_orders_by_display_order_then_recency() {
    let db = store().await;

    let last = sample_project("Listed last", 5).into_project();
    let first = sample_project("Listed first", 1).into_project();
    let middle = sample_project("Listed middle", 3).into_project();

    for project in [&last, &first, &middle] {
        db.create_project(project).await.expect("create");
    }

    let (projects, total) = db.list_projects(None, None, 1, 10).await.expect("list");

    assert_eq!(total, 3);
    let titles: Vec<&str> = projects.iter().map(|p| p.title.as_str()).collect();
    assert_eq!(titles, ["Listed first", "Listed middle", "Listed last"]);
}

#[tokio::test]
async fn test_project_list_filters() {
    let db = store().await;

    let mut web = sample_project("Web thing", 0);
    web.category = ProjectCategory::Web;
    web.featured = true;

    let mut mobile = sample_project("Mobile thing", 1);
    mobile.category = ProjectCategory::Mobile;

    db.create_project(&web.into_project()).await.expect("create");
    db.create_project(&mobile.into_project())
        .await
        .expect("create");

    let (projects, total) = db
        .list_projects(Some(ProjectCategory::Mobile), None, 1, 10)
        .await
        .expect("list");
    assert_eq!(total, 1);
    assert_eq!(projects[0].title, "Mobile thing");

    let (projects, total) = db
        .list_projects(None, Some(true), 1, 10)
        .await
        .expect("list");
    assert_eq!(total, 1);
    assert_eq!(projects[0].title, "Web thing");

    let (_, total) = db
        .list_projects(Some(ProjectCategory::Desktop), None, 1, 10)
        .await
        .expect("list");
    assert_eq!(total, 0);
}

#[tokio::test]
async fn test_pagination_covers_the_set_exactly_once() {
    let db = store().await;
    const TOTAL: u32 = 25;
    const LIMIT: u32 = 10;

    for i in 0..TOTAL {
        let project = sample_project(&format!("Project {i}"), i as i32).into_project();
        db.create_project(&project).await.expect("create");
    }

    let (_, total) = db.list_projects(None, None, 1, LIMIT).await.expect("list");
    assert_eq!(total, TOTAL);

    let pagination = Pagination::new(1, LIMIT, total);
    assert_eq!(pagination.total_pages, 3);

    let mut seen = HashSet::new();
    for page in 1..=pagination.total_pages {
        let (projects, _) = db.list_projects(None, None, page, LIMIT).await.expect("list");
        let expected_len = if page < pagination.total_pages { LIMIT } else { 5 };
        assert_eq!(projects.len() as u32, expected_len, "page {page} size");

        for project in projects {
            assert!(seen.insert(project.id), "duplicate id across pages");
        }
    }

    assert_eq!(seen.len() as u32, TOTAL);
}

#[tokio::test]
async fn test_skill_round_trip_and_filter() {
    let db = store().await;

    let skill = NewSkill {
        name: "PostgreSQL".to_string(),
        category: SkillCategory::Database,
        level: SkillLevel::Advanced,
        percentage: 80,
        icon: "pg".to_string(),
        color: "#336791".to_string(),
        years_of_experience: 5.0,
        display_order: 2,
    }
    .into_skill();

    db.create_skill(&skill).await.expect("create");

    let fetched = db.get_skill(&skill.id).await.expect("fetch");
    assert_eq!(fetched.name, "PostgreSQL");
    assert_eq!(fetched.category, SkillCategory::Database);
    assert_eq!(fetched.level, SkillLevel::Advanced);
    assert_eq!(fetched.percentage, 80);

    let (skills, total) = db
        .list_skills(Some(SkillCategory::Database), 1, 10)
        .await
        .expect("list");
    assert_eq!(total, 1);
    assert_eq!(skills[0].id, skill.id);

    let (_, total) = db
        .list_skills(Some(SkillCategory::Frontend), 1, 10)
        .await
        .expect("list");
    assert_eq!(total, 0);
}

#[tokio::test]
async fn test_skill_delete() {
    let db = store().await;

    let skill = NewSkill {
        name: "Docker".to_string(),
        category: SkillCategory::Tools,
        level: SkillLevel::Intermediate,
        percentage: 60,
        icon: String::new(),
        color: "#6366f1".to_string(),
        years_of_experience: 2.0,
        display_order: 0,
    }
    .into_skill();

    db.create_skill(&skill).await.expect("create");
    db.delete_skill(&skill.id).await.expect("delete");

    assert!(matches!(
        db.get_skill(&skill.id).await,
        Err(AppError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_contact_status_lifecycle() {
    let db = store().await;

    let submission = ContactSubmission::new(
        "Ada",
        "Hello",
        "A perfectly ordinary note",
        "203.0.113.9".to_string(),
        None,
        5_000,
    );
    db.create_contact(&submission).await.expect("create");

    let stored = db.get_contact(&submission.id).await.expect("fetch");
    assert_eq!(stored.status, ContactStatus::New);

    let updated = db
        .update_contact_status(&submission.id, ContactStatus::Read)
        .await
        .expect("update");
    assert_eq!(updated.status, ContactStatus::Read);
    // everything else is immutable after creation
    assert_eq!(updated.message, stored.message);
    assert_eq!(updated.ip_address, stored.ip_address);

    assert!(matches!(
        db.update_contact_status("missing", ContactStatus::Read).await,
        Err(AppError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_contact_list_filters_by_status() {
    let db = store().await;

    let first = ContactSubmission::new(
        "One",
        "First",
        "The first message here",
        "203.0.113.1".to_string(),
        None,
        4_000,
    );
    let second = ContactSubmission::new(
        "Two",
        "Second",
        "The second message here",
        "203.0.113.2".to_string(),
        None,
        4_000,
    );

    db.create_contact(&first).await.expect("create");
    db.create_contact(&second).await.expect("create");
    db.update_contact_status(&second.id, ContactStatus::Replied)
        .await
        .expect("update");

    let (contacts, total) = db
        .list_contacts(Some(ContactStatus::New), 1, 10)
        .await
        .expect("list");
    assert_eq!(total, 1);
    assert_eq!(contacts[0].id, first.id);

    let (_, total) = db.list_contacts(None, 1, 10).await.expect("list");
    assert_eq!(total, 2);
}
