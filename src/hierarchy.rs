//! Tag hierarchy resolution.
//!
//! F-Spot stores tag hierarchies as parent links: every tag may point at a
//! category tag through `category_id`. darktable expects the full path of a
//! nested tag, e.g. `Places|Europe|Germany`, so each tag attached through a
//! category is expanded by walking its chain up to the root.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};

use crate::db::{TagLookup, TagRecord};
use crate::error::{HierarchyError, SourceError};

/// Separator between levels of a hierarchical tag.
pub const PATH_SEPARATOR: &str = "|";

/// Tags of one photo split the way darktable consumes them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedTags {
    /// Pipe-joined paths for tags attached through a category.
    pub hierarchical: Vec<String>,
    /// Names of tags without a category.
    pub simple: Vec<String>,
}

impl ResolvedTags {
    pub fn is_empty(&self) -> bool {
        self.hierarchical.is_empty() && self.simple.is_empty()
    }
}

/// Resolve the names of `category_id` and all its ancestors, root first.
///
/// Fails when a tag in the chain is missing, when the chain revisits a tag,
/// or when it is longer than `max_depth`.
pub fn resolve_ancestor_path<L: TagLookup + ?Sized>(
    lookup: &L,
    category_id: i64,
    max_depth: usize,
) -> Result<Vec<String>, HierarchyError> {
    let mut names = Vec::new();
    let mut visited = HashSet::new();
    let mut current = category_id;

    while current != 0 {
        if !visited.insert(current) {
            return Err(HierarchyError::Cycle {
                tag_id: category_id,
                repeated: current,
            });
        }
        if names.len() == max_depth {
            return Err(HierarchyError::TooDeep {
                tag_id: category_id,
                max_depth,
            });
        }
        let tag = lookup.get_tag(current)?;
        names.push(tag.display_name()?.to_string());
        current = tag.category_id;
    }

    names.reverse();
    Ok(names)
}

/// Full hierarchical string for a tag attached through its category.
pub fn hierarchical_path<L: TagLookup + ?Sized>(
    lookup: &L,
    tag: &TagRecord,
    max_depth: usize,
) -> Result<String, HierarchyError> {
    let mut path = resolve_ancestor_path(lookup, tag.category_id, max_depth)?;
    path.push(tag.display_name()?.to_string());
    Ok(path.join(PATH_SEPARATOR))
}

/// Split a photo's tags into hierarchical and simple tags.
///
/// A tag is hierarchical exactly when its `category_id` is non-zero. Its own
/// `is_category` flag plays no part.
pub fn classify<L: TagLookup + ?Sized>(
    lookup: &L,
    tags: &[TagRecord],
    max_depth: usize,
) -> Result<ResolvedTags, HierarchyError> {
    let mut resolved = ResolvedTags::default();
    for tag in tags {
        if tag.has_parent() {
            resolved
                .hierarchical
                .push(hierarchical_path(lookup, tag, max_depth)?);
        } else {
            resolved.simple.push(tag.display_name()?.to_string());
        }
    }
    Ok(resolved)
}

/// Memoizing wrapper around a [`TagLookup`].
///
/// Tags are immutable for the duration of a run, so entries never go stale.
pub struct CachedTags<'a, L: ?Sized> {
    inner: &'a L,
    cache: RefCell<HashMap<i64, TagRecord>>,
}

impl<'a, L: TagLookup + ?Sized> CachedTags<'a, L> {
    pub fn new(inner: &'a L) -> Self {
        Self {
            inner,
            cache: RefCell::new(HashMap::new()),
        }
    }

    pub fn len(&self) -> usize {
        self.cache.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.borrow().is_empty()
    }
}

impl<L: TagLookup + ?Sized> TagLookup for CachedTags<'_, L> {
    fn get_tag(&self, tag_id: i64) -> Result<TagRecord, SourceError> {
        if let Some(tag) = self.cache.borrow().get(&tag_id) {
            return Ok(tag.clone());
        }
        let tag = self.inner.get_tag(tag_id)?;
        self.cache.borrow_mut().insert(tag_id, tag.clone());
        Ok(tag)
    }
}
