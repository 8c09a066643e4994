use crate::model::{Bookmark, NewBookmark};
use crate::repository::BookmarkRepository;
use anyhow::Result;
use libsql::{Builder, Connection, Database as LibsqlDatabase};
use std::path::Path;

const SYSTEM_MIGRATIONS: &[(&str, &str)] =
    &[("system/000_migrations_table.sql", include_str!("migrations/system/000_migrations_table.sql"))];

const MIGRATIONS: &[(&str, &str)] = &[("001_bookmarks.sql", include_str!("migrations/001_bookmarks.sql"))];

const SELECT_BOOKMARK: &str = "SELECT id, name, url, category FROM bookmarks";

pub struct Database {
    // Keeps the database alive for as long as the connection is in use.
    _db: LibsqlDatabase,
    conn: Connection,
}

impl Database {
    async fn is_migration_applied(conn: &Connection, name: &str) -> Result<bool> {
        let query = "SELECT 1 FROM _migrations WHERE name = ?";
        match conn.query(query, libsql::params![name]).await {
            Ok(mut rows) => Ok(rows.next().await?.is_some()),
            Err(e) => {
                if e.to_string().contains("no such table") {
                    Ok(false)
                } else {
                    Err(e.into())
                }
            }
        }
    }

    async fn record_migration(conn: &Connection, name: &str) -> Result<()> {
        let query = r#"
            INSERT INTO _migrations (name, applied_at)
            VALUES (?, strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
        "#;
        conn.execute(query, libsql::params![name]).await?;
        Ok(())
    }

    async fn run_migration(conn: &Connection, name: &str, sql: &str) -> Result<()> {
        if Self::is_migration_applied(conn, name).await? {
            tracing::debug!("migration {} already applied, skipping", name);
            return Ok(());
        }

        tracing::info!("applying migration: {}", name);
        conn.execute_batch(sql)
            .await
            .map_err(|e| anyhow::anyhow!("failed to execute migration {name}: {e}"))?;

        Self::record_migration(conn, name).await?;
        Ok(())
    }

    /// Opens (or creates) the database at `path` and brings its schema up to
    /// date. `":memory:"` gives a private in-memory database.
    pub async fn new(path: &Path) -> Result<Self> {
        let db = Builder::new_local(path).build().await?;
        let conn = db.connect()?;
        conn.query("SELECT 1", ()).await?;

        for (filename, sql) in SYSTEM_MIGRATIONS.iter().chain(MIGRATIONS) {
            Self::run_migration(&conn, filename, sql).await?;
        }

        tracing::info!(path = ?path, "[db] bookmarks database ready");
        Ok(Database { _db: db, conn })
    }

    pub async fn in_memory() -> Result<Self> {
        Self::new(Path::new(crate::config::IN_MEMORY_DATABASE)).await
    }

    fn row_to_bookmark(row: &libsql::Row) -> Result<Bookmark> {
        Ok(Bookmark {
            id: row.get(0)?,
            name: row.get(1)?,
            url: row.get(2)?,
            category: row.get(3)?,
        })
    }
}

impl BookmarkRepository for Database {
    async fn get(&self, id: i64) -> Result<Option<Bookmark>> {
        let query = format!("{SELECT_BOOKMARK} WHERE id = ?");
        let mut rows = self.conn.query(&query, libsql::params![id]).await?;

        if let Some(row) = rows.next().await? {
            Ok(Some(Self::row_to_bookmark(&row)?))
        } else {
            Ok(None)
        }
    }

    async fn get_all(&self) -> Result<Vec<Bookmark>> {
        let query = format!("{SELECT_BOOKMARK} ORDER BY id");
        let mut rows = self.conn.query(&query, ()).await?;

        let mut bookmarks = Vec::new();
        while let Some(row) = rows.next().await? {
            bookmarks.push(Self::row_to_bookmark(&row)?);
        }
        Ok(bookmarks)
    }

    async fn add(&self, bookmark: NewBookmark) -> Result<Bookmark> {
        let query = r#"
            INSERT INTO bookmarks (name, url, category)
            VALUES (?, ?, ?)
            RETURNING id, name, url, category
        "#;

        let mut rows = self
            .conn
            .query(
                query,
                libsql::params![bookmark.name, bookmark.url, bookmark.category],
            )
            .await?;

        if let Some(row) = rows.next().await? {
            Self::row_to_bookmark(&row)
        } else {
            anyhow::bail!("insert returned no row")
        }
    }

    async fn update(&self, bookmark: Bookmark) -> Result<bool> {
        let changed = self
            .conn
            .execute(
                "UPDATE bookmarks SET name = ?, url = ?, category = ? WHERE id = ?",
                libsql::params![bookmark.name, bookmark.url, bookmark.category, bookmark.id],
            )
            .await?;
        Ok(changed > 0)
    }

    async fn remove(&self, id: i64) -> Result<bool> {
        let changed = self
            .conn
            .execute("DELETE FROM bookmarks WHERE id = ?", libsql::params![id])
            .await?;
        Ok(changed > 0)
    }
}
