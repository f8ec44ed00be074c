use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use crate::domain::models::child::Child;
use crate::storage::sqlite::connection::DbConnection;
use crate::storage::traits::ChildStorage;

/// Repository for child records
#[derive(Clone)]
pub struct ChildRepository {
    db: DbConnection,
}

impl ChildRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    fn row_to_child(row: &SqliteRow) -> Result<Child> {
        let id: String = row.try_get("id")?;
        let dob: String = row.try_get("dob")?;
        let created_at: String = row.try_get("created_at")?;

        let dob = NaiveDate::parse_from_str(&dob, "%Y-%m-%d")
            .with_context(|| format!("Stored dob for {} is not a valid date: {}", id, dob))?;
        let created_at = DateTime::parse_from_rfc3339(&created_at)
            .with_context(|| format!("Stored created_at for {} is not RFC 3339", id))?
            .with_timezone(&Utc);

        Ok(Child {
            id,
            name: row.try_get("child_name")?,
            parent_id: row.try_get("parent_id")?,
            parent_email: row.try_get("parent_email")?,
            gender: row.try_get("gender")?,
            dob,
            created_at,
        })
    }
}

#[async_trait]
impl ChildStorage for ChildRepository {
    /// Store a child in the database
    async fn store_child(&self, child: &Child) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO children (id, child_name, parent_id, parent_email, gender, dob, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&child.id)
        .bind(&child.name)
        .bind(&child.parent_id)
        .bind(&child.parent_email)
        .bind(&child.gender)
        .bind(child.dob.format("%Y-%m-%d").to_string())
        .bind(child.created_at.to_rfc3339())
        .execute(self.db.pool())
        .await
        .with_context(|| format!("Failed to insert child {}", child.id))?;
        Ok(())
    }

    /// List all children in insertion order
    async fn list_children(&self) -> Result<Vec<Child>> {
        let rows = sqlx::query(
            r#"
            SELECT id, child_name, parent_id, parent_email, gender, dob, created_at
            FROM children
            ORDER BY seq ASC
            "#,
        )
        .fetch_all(self.db.pool())
        .await
        .context("Failed to query children")?;

        rows.iter().map(Self::row_to_child).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    async fn setup_test() -> (DbConnection, ChildRepository) {
        let db = DbConnection::init_in_memory().await.expect("Failed to create test database");
        let repo = ChildRepository::new(db.clone());
        (db, repo)
    }

    fn sample_child(name: &str) -> Child {
        Child {
            id: Child::generate_id(),
            name: name.to_string(),
            parent_id: "P1".to_string(),
            parent_email: "parent@example.com".to_string(),
            gender: "F".to_string(),
            dob: NaiveDate::from_ymd_opt(2023, 1, 15).unwrap(),
            created_at: Utc.with_ymd_and_hms(2026, 10, 1, 12, 0, 0).unwrap(),
        }
    }

    #[tokio::test]
    async fn test_store_and_list_child() {
        let (_db, repo) = setup_test().await;

        let child = sample_child("Ana");
        repo.store_child(&child).await.expect("Failed to store child");

        let children = repo.list_children().await.expect("Failed to list children");
        assert_eq!(children, vec![child]);
    }

    #[tokio::test]
    async fn test_list_empty_store() {
        let (_db, repo) = setup_test().await;

        let children = repo.list_children().await.expect("Failed to list children");
        assert!(children.is_empty());
    }

    #[tokio::test]
    async fn test_list_preserves_insertion_order() {
        let (_db, repo) = setup_test().await;

        // Names are deliberately not in alphabetical order
        for name in ["Zoe", "Ana", "Mia"] {
            repo.store_child(&sample_child(name)).await.expect("Failed to store child");
        }

        let names: Vec<String> = repo
            .list_children()
            .await
            .expect("Failed to list children")
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["Zoe", "Ana", "Mia"]);
    }

    #[tokio::test]
    async fn test_duplicate_id_is_rejected_without_side_effects() {
        let (_db, repo) = setup_test().await;

        let child = sample_child("Ana");
        repo.store_child(&child).await.expect("Failed to store child");

        let mut duplicate = sample_child("Bea");
        duplicate.id = child.id.clone();
        assert!(repo.store_child(&duplicate).await.is_err());

        let children = repo.list_children().await.expect("Failed to list children");
        assert_eq!(children.len(), 1);
        assert_eq!(children[0].name, "Ana");
    }

    #[tokio::test]
    async fn test_corrupt_row_fails_listing() {
        let (db, repo) = setup_test().await;

        repo.store_child(&sample_child("Ana")).await.expect("Failed to store child");
        sqlx::query(
            "INSERT INTO children (id, child_name, parent_id, parent_email, gender, dob, created_at) \
             VALUES ('child::bad', 'Bad', 'P9', 'x@y.com', '', '2023-02-30', '2026-01-01T00:00:00Z')",
        )
        .execute(db.pool())
        .await
        .expect("Failed to insert corrupt row");

        let err = repo.list_children().await.unwrap_err();
        assert!(err.to_string().contains("child::bad"));
    }

    #[tokio::test]
    async fn test_closed_pool_reports_error() {
        let (db, repo) = setup_test().await;
        db.close().await;

        assert!(repo.list_children().await.is_err());
        assert!(repo.store_child(&sample_child("Ana")).await.is_err());
    }
}
