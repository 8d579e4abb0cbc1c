//! Read-only access to an F-Spot photo library database.

#[cfg(test)]
pub(crate) mod schema;

use rusqlite::{Connection, OpenFlags, OptionalExtension, Row};
use std::path::Path;

use crate::error::SourceError;

/// A row of the `photos` table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Photo {
    pub id: i64,
    /// Percent-encoded directory URI, e.g. `file:///home/me/Photos/2012`.
    pub base_uri: String,
    pub filename: String,
}

/// A row of the `tags` table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagRecord {
    pub id: i64,
    /// NULL in some damaged libraries.
    pub name: Option<String>,
    pub is_category: bool,
    /// Parent category, 0 for root-level tags.
    pub category_id: i64,
}

impl TagRecord {
    pub fn has_parent(&self) -> bool {
        self.category_id != 0
    }

    /// The tag's name, failing for tags stored without one.
    pub fn display_name(&self) -> Result<&str, SourceError> {
        self.name.as_deref().ok_or(SourceError::UnnamedTag(self.id))
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            name: row.get(1)?,
            is_category: row.get::<_, Option<bool>>(2)?.unwrap_or(false),
            category_id: row.get::<_, Option<i64>>(3)?.unwrap_or(0),
        })
    }
}

/// Anything that can fetch a tag by id.
pub trait TagLookup {
    fn get_tag(&self, tag_id: i64) -> Result<TagRecord, SourceError>;
}

pub struct FSpotDb {
    conn: Connection,
}

impl FSpotDb {
    /// Open an existing database without write access.
    pub fn open(path: &Path) -> Result<Self, SourceError> {
        if !path.exists() {
            return Err(SourceError::DatabaseMissing(path.to_path_buf()));
        }
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        Ok(Self { conn })
    }

    pub fn list_photos(&self) -> Result<Vec<Photo>, SourceError> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, base_uri, filename FROM photos ORDER BY id")?;
        let photos = stmt
            .query_map([], |row| {
                Ok(Photo {
                    id: row.get(0)?,
                    base_uri: row.get(1)?,
                    filename: row.get(2)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(photos)
    }

    /// All tags attached to a photo, joined with their metadata.
    pub fn list_tags_for_photo(&self, photo_id: i64) -> Result<Vec<TagRecord>, SourceError> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT t.id, t.name, t.is_category, t.category_id
            FROM tags t
            JOIN photo_tags pt ON pt.tag_id = t.id
            WHERE pt.photo_id = ?
            ORDER BY t.id
            "#,
        )?;
        let tags = stmt
            .query_map([photo_id], TagRecord::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(tags)
    }
}

impl TagLookup for FSpotDb {
    fn get_tag(&self, tag_id: i64) -> Result<TagRecord, SourceError> {
        self.conn
            .query_row(
                "SELECT id, name, is_category, category_id FROM tags WHERE id = ?",
                [tag_id],
                TagRecord::from_row,
            )
            .optional()?
            .ok_or(SourceError::TagNotFound(tag_id))
    }
}
