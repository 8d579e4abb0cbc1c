//! Migration run: walks every photo in the library and writes the missing
//! sidecar files.

use anyhow::{Context, Result};
use std::fmt;
use std::path::Path;
use tracing::{debug, info, warn};

use crate::config::RunOptions;
use crate::db::{FSpotDb, Photo};
use crate::error::PhotoError;
use crate::hierarchy::{self, CachedTags};
use crate::paths;
use crate::sidecar;

/// Counters reported at the end of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    pub total: usize,
    /// Photo file not found at its decoded path.
    pub missing: usize,
    /// A sidecar was already present and left untouched.
    pub skipped_existing: usize,
    pub created: usize,
    /// Broken tag data or a failed write.
    pub failed: usize,
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "FINISHED! - Summary:")?;
        writeln!(f, " {:<10} images in total", self.total)?;
        writeln!(f, " {:<10} images do not exist", self.missing)?;
        writeln!(f, " {:<10} images already have xmp files", self.skipped_existing)?;
        writeln!(f, " {:<10} created xmp files", self.created)?;
        write!(f, " {:<10} images failed", self.failed)
    }
}

/// What happened to a single photo.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Missing,
    SidecarExists,
    Created,
}

pub struct Migrator<'a> {
    db: &'a FSpotDb,
    tags: CachedTags<'a, FSpotDb>,
    options: RunOptions,
}

impl<'a> Migrator<'a> {
    pub fn new(db: &'a FSpotDb, options: RunOptions) -> Self {
        Self {
            db,
            tags: CachedTags::new(db),
            options,
        }
    }

    /// Process every photo in the library.
    ///
    /// Only a failure to list the photos aborts the run. Errors for a single
    /// photo are logged and counted as failed.
    pub fn run(&self) -> Result<Summary> {
        let photos = self.db.list_photos().context("Failed to list photos")?;
        let mut summary = Summary::default();

        for photo in &photos {
            summary.total += 1;
            match self.process_photo(photo) {
                Ok(Outcome::Missing) => summary.missing += 1,
                Ok(Outcome::SidecarExists) => summary.skipped_existing += 1,
                Ok(Outcome::Created) => summary.created += 1,
                Err(e) => {
                    warn!(photo_id = photo.id, filename = %photo.filename, "Skipping photo: {}", e);
                    summary.failed += 1;
                }
            }
        }

        info!(
            total = summary.total,
            missing = summary.missing,
            skipped_existing = summary.skipped_existing,
            created = summary.created,
            failed = summary.failed,
            "Migration finished"
        );
        Ok(summary)
    }

    fn process_photo(&self, photo: &Photo) -> Result<Outcome, PhotoError> {
        let path = paths::photo_path(photo);
        if !path.exists() {
            self.skip(photo, &path, "Skipping non existent image");
            return Ok(Outcome::Missing);
        }

        let xmp_path = paths::sidecar_path(&path, &self.options.sidecar_extension);
        if xmp_path.exists() {
            self.skip(photo, &path, "Skipping because of existing XMP file");
            return Ok(Outcome::SidecarExists);
        }

        let attached = self.db.list_tags_for_photo(photo.id)?;
        let resolved = hierarchy::classify(&self.tags, &attached, self.options.max_tag_depth)?;
        sidecar::write_sidecar(&xmp_path, &resolved)?;

        debug!(
            photo_id = photo.id,
            hierarchical = resolved.hierarchical.len(),
            simple = resolved.simple.len(),
            "Created {}",
            xmp_path.display()
        );
        Ok(Outcome::Created)
    }

    fn skip(&self, photo: &Photo, path: &Path, reason: &str) {
        if self.options.verbose {
            info!(photo_id = photo.id, "{} ({})", reason, path.display());
        } else {
            debug!(photo_id = photo.id, "{} ({})", reason, path.display());
        }
    }
}

/// Open the library at `db_path` and run a full migration.
pub fn run(db_path: &Path, options: RunOptions) -> Result<Summary> {
    let db = FSpotDb::open(db_path)?;
    Migrator::new(&db, options).run()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::fixture::FixtureDb;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::{tempdir, TempDir};

    struct Library {
        _dir: TempDir,
        db_path: PathBuf,
        photos: PathBuf,
    }

    impl Library {
        /// Places > Europe > Germany plus a root-level Sunset tag.
        fn new() -> (Self, FixtureDb) {
            let dir = tempdir().unwrap();
            let db_path = dir.path().join("photos.db");
            let photos = dir.path().join("My Photos");
            fs::create_dir(&photos).unwrap();

            let fixture = FixtureDb::create(&db_path);
            fixture.add_tag(2, "Places", true, 0);
            fixture.add_tag(3, "Europe", true, 2);
            fixture.add_tag(5, "Germany", false, 3);
            fixture.add_tag(9, "Sunset", false, 0);
            (
                Self {
                    _dir: dir,
                    db_path,
                    photos,
                },
                fixture,
            )
        }

        fn base_uri(&self) -> String {
            format!(
                "file://{}",
                self.photos.to_string_lossy().replace(' ', "%20")
            )
        }

        fn create_image(&self, name: &str) -> PathBuf {
            let path = self.photos.join(name);
            fs::write(&path, b"jpeg").unwrap();
            path
        }

        fn count_sidecars(&self) -> usize {
            fs::read_dir(&self.photos)
                .unwrap()
                .filter_map(|e| e.ok())
                .filter(|e| e.path().extension().is_some_and(|ext| ext == "xmp"))
                .count()
        }

        fn run(&self) -> Summary {
            run(&self.db_path, RunOptions::default()).unwrap()
        }
    }

    #[test]
    fn test_run_creates_sidecars() {
        let (lib, fixture) = Library::new();
        let image = lib.create_image("germany.jpg");
        fixture.add_photo(1, &lib.base_uri(), "germany.jpg");
        fixture.tag_photo(1, 5);
        fixture.tag_photo(1, 9);
        drop(fixture);

        let summary = lib.run();
        assert_eq!(
            summary,
            Summary {
                total: 1,
                created: 1,
                ..Summary::default()
            }
        );

        let xmp = fs::read_to_string(paths::sidecar_path(&image, "xmp")).unwrap();
        assert!(xmp.contains("<rdf:li>Places|Europe|Germany</rdf:li>"));
        assert!(xmp.contains("<rdf:li>Sunset</rdf:li>"));
        assert!(!xmp.contains("<rdf:li>Germany</rdf:li>"));
    }

    #[test]
    fn test_run_is_idempotent() {
        let (lib, fixture) = Library::new();
        lib.create_image("a.jpg");
        lib.create_image("b.jpg");
        fixture.add_photo(1, &lib.base_uri(), "a.jpg");
        fixture.add_photo(2, &lib.base_uri(), "b.jpg");
        fixture.tag_photo(1, 9);
        drop(fixture);

        let first = lib.run();
        assert_eq!(first.created, 2);
        assert_eq!(lib.count_sidecars(), 2);

        let second = lib.run();
        assert_eq!(second.created, 0);
        assert_eq!(second.skipped_existing, 2);
        assert_eq!(lib.count_sidecars(), 2);
    }

    #[test]
    fn test_missing_image_counted() {
        let (lib, fixture) = Library::new();
        fixture.add_photo(1, &lib.base_uri(), "gone.jpg");
        drop(fixture);

        let summary = lib.run();
        assert_eq!(summary.total, 1);
        assert_eq!(summary.missing, 1);
        assert_eq!(summary.created, 0);
        assert_eq!(lib.count_sidecars(), 0);
    }

    #[test]
    fn test_existing_sidecar_untouched() {
        let (lib, fixture) = Library::new();
        let image = lib.create_image("a.jpg");
        let xmp_path = paths::sidecar_path(&image, "xmp");
        fs::write(&xmp_path, "edited in darktable").unwrap();
        fixture.add_photo(1, &lib.base_uri(), "a.jpg");
        fixture.tag_photo(1, 5);
        drop(fixture);

        let summary = lib.run();
        assert_eq!(summary.skipped_existing, 1);
        assert_eq!(summary.created, 0);
        assert_eq!(fs::read_to_string(&xmp_path).unwrap(), "edited in darktable");
    }

    #[test]
    fn test_broken_tag_fails_only_that_photo() {
        let (lib, fixture) = Library::new();
        lib.create_image("broken.jpg");
        lib.create_image("fine.jpg");
        fixture.add_tag(20, "Orphan", false, 99);
        fixture.add_photo(1, &lib.base_uri(), "broken.jpg");
        fixture.add_photo(2, &lib.base_uri(), "fine.jpg");
        fixture.tag_photo(1, 20);
        fixture.tag_photo(2, 5);
        drop(fixture);

        let summary = lib.run();
        assert_eq!(summary.total, 2);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.created, 1);
        assert!(!paths::sidecar_path(&lib.photos.join("broken.jpg"), "xmp").exists());
    }

    #[test]
    fn test_cyclic_categories_fail_photo() {
        let (lib, fixture) = Library::new();
        lib.create_image("loop.jpg");
        fixture.add_tag(30, "A", true, 31);
        fixture.add_tag(31, "B", true, 30);
        fixture.add_tag(32, "Leaf", false, 30);
        fixture.add_photo(1, &lib.base_uri(), "loop.jpg");
        fixture.tag_photo(1, 32);
        drop(fixture);

        let summary = lib.run();
        assert_eq!(summary.failed, 1);
        assert_eq!(lib.count_sidecars(), 0);
    }

    #[cfg(unix)]
    #[test]
    fn test_write_failure_counted_and_run_continues() {
        let (lib, fixture) = Library::new();
        let blocked = lib.create_image("a.jpg");
        let fine = lib.create_image("b.jpg");
        // A dangling link does not "exist", but writing through it fails.
        std::os::unix::fs::symlink(
            lib.photos.join("no-such-dir").join("a.jpg.xmp"),
            paths::sidecar_path(&blocked, "xmp"),
        )
        .unwrap();
        fixture.add_photo(1, &lib.base_uri(), "a.jpg");
        fixture.add_photo(2, &lib.base_uri(), "b.jpg");
        fixture.tag_photo(1, 9);
        fixture.tag_photo(2, 9);
        drop(fixture);

        let summary = lib.run();
        assert_eq!(
            summary,
            Summary {
                total: 2,
                created: 1,
                failed: 1,
                ..Summary::default()
            }
        );
        assert!(paths::sidecar_path(&fine, "xmp").exists());
        assert!(!lib.photos.join("no-such-dir").exists());
    }

    #[test]
    fn test_unnamed_tag_fails_photo() {
        let (lib, fixture) = Library::new();
        lib.create_image("a.jpg");
        fixture
            .conn
            .execute("INSERT INTO tags (id, category_id) VALUES (40, 0)", [])
            .unwrap();
        fixture.add_photo(1, &lib.base_uri(), "a.jpg");
        fixture.tag_photo(1, 40);
        drop(fixture);

        let summary = lib.run();
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.created, 0);
        assert_eq!(lib.count_sidecars(), 0);
    }

    #[test]
    fn test_missing_database() {
        let dir = tempdir().unwrap();
        assert!(run(&dir.path().join("photos.db"), RunOptions::default()).is_err());
    }

    #[test]
    fn test_summary_report() {
        let summary = Summary {
            total: 4,
            missing: 1,
            skipped_existing: 1,
            created: 2,
            failed: 0,
        };
        let report = summary.to_string();
        assert!(report.starts_with("FINISHED! - Summary:"));
        assert!(report.contains(" 4          images in total"));
        assert!(report.contains(" 2          created xmp files"));
    }
}
