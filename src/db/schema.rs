/// Subset of the F-Spot 0.8 schema read by this tool.
///
/// The tool never creates tables in a real library; this is used to build
/// fixture databases.
pub const FSPOT_SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS photos (
    id INTEGER PRIMARY KEY NOT NULL,
    time INTEGER NOT NULL DEFAULT 0,
    base_uri STRING NOT NULL,
    filename STRING NOT NULL,
    description TEXT NOT NULL DEFAULT '',
    roll_id INTEGER NOT NULL DEFAULT 0,
    default_version_id INTEGER NOT NULL DEFAULT 1,
    rating INTEGER NULL
);

CREATE TABLE IF NOT EXISTS tags (
    id INTEGER PRIMARY KEY NOT NULL,
    name TEXT UNIQUE,
    category_id INTEGER,
    is_category BOOLEAN,
    sort_priority INTEGER,
    icon TEXT
);

CREATE TABLE IF NOT EXISTS photo_tags (
    photo_id INTEGER,
    tag_id INTEGER,
    UNIQUE (photo_id, tag_id)
);

CREATE INDEX IF NOT EXISTS idx_photo_tags_photo ON photo_tags(photo_id);
"#;
