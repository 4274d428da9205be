//! SQLite persistence for scraped stories.
//!
//! The database holds a single `stories` table keyed by the site's item id:
//!
//! ```text
//! stories(id, title, link, posted, user, points, description)
//! ├── story_id    UNIQUE (id)
//! ├── story_date  (posted)
//! └── points      (points)
//! ```
//!
//! `description` is reserved for comment text and is always NULL for now.
//! The connection runs in autocommit mode, so each upsert is durable as soon
//! as it returns and an interrupted run keeps everything saved before it.

use crate::error::Result;
use crate::models::StoryRecord;
use crate::utils::ensure_parent_dir;
use rusqlite::{Connection, OptionalExtension, params};
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS stories(
    id TEXT,
    title TEXT,
    link TEXT,
    posted TEXT,
    user TEXT,
    points INTEGER,
    description TEXT
);
CREATE INDEX IF NOT EXISTS story_date ON stories(posted);
CREATE UNIQUE INDEX IF NOT EXISTS story_id ON stories(id);
CREATE INDEX IF NOT EXISTS points ON stories(points);
";

const UPSERT: &str = "REPLACE INTO stories (id, title, link, posted, user, points, description)
     VALUES (?1, ?2, ?3, ?4, ?5, ?6, NULL)";

const SELECT_BY_ID: &str =
    "SELECT id, title, link, posted, user, points FROM stories WHERE id = ?1";

#[derive(Debug)]
pub struct Store {
    conn: Connection,
    path: PathBuf,
}

impl Store {
    /// Open the database at `path`, creating the file and its schema if the
    /// file does not exist yet.
    #[instrument(level = "info", skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let fresh = !path.exists();
        if fresh {
            ensure_parent_dir(path)?;
        }

        let conn = Connection::open(path)?;
        if fresh {
            conn.execute_batch(SCHEMA)?;
            info!("Initialized new stories database");
        }

        Ok(Self {
            conn,
            path: path.to_path_buf(),
        })
    }

    /// Location of the database file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Insert `story`, replacing every column of any existing row with the
    /// same id.
    ///
    /// Returns `false` without touching the database when the story has no
    /// id, since there is nothing to key the row on.
    pub fn upsert(&self, story: &StoryRecord) -> Result<bool> {
        let Some(id) = story.id.as_deref() else {
            debug!(title = %story.title, "Story has no item id; not saving");
            return Ok(false);
        };

        self.conn.execute(
            UPSERT,
            params![
                id,
                story.title,
                story.link,
                story.posted,
                story.user,
                story.points,
            ],
        )?;
        debug!(id, title = %story.title, "Saved story");
        Ok(true)
    }

    /// Load the story stored under `id`, if any.
    ///
    /// # Returns
    ///
    /// `None` when no row has that id. `description` is not part of
    /// [`StoryRecord`] and is not read.
    pub fn get(&self, id: &str) -> Result<Option<StoryRecord>> {
        let story = self
            .conn
            .query_row(SELECT_BY_ID, params![id], |row| {
                Ok(StoryRecord {
                    id: row.get(0)?,
                    title: row.get(1)?,
                    link: row.get(2)?,
                    posted: row.get(3)?,
                    user: row.get(4)?,
                    points: row.get(5)?,
                })
            })
            .optional()?;
        Ok(story)
    }

    /// Number of stored stories.
    pub fn count(&self) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM stories", [], |row| row.get(0))?;
        Ok(usize::try_from(count).unwrap_or_default())
    }
}
