//! Offset/limit pagination over creation-ordered versions.

use arca_types::Tag;

use crate::error::{StoreError, StoreResult};
use crate::record::Entity;

/// Which versions a listing returns.
///
/// A version qualifies if it is `USED` (or `include_deleted` is set) and, when
/// `tag` is given, carries that tag. The first `offset` qualifying versions
/// are skipped and at most `limit` of the rest are returned.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ListQuery {
    pub offset: usize,
    pub limit: usize,
    pub include_deleted: bool,
    pub tag: Option<Tag>,
}

impl ListQuery {
    /// Build a query from signed bounds as they arrive from callers.
    pub fn new(offset: i64, limit: i64) -> StoreResult<Self> {
        let offset = usize::try_from(offset)
            .map_err(|_| StoreError::InvalidArgument(format!("negative offset {offset}")))?;
        let limit = usize::try_from(limit)
            .map_err(|_| StoreError::InvalidArgument(format!("negative limit {limit}")))?;
        Ok(Self::page(offset, limit))
    }

    pub fn page(offset: usize, limit: usize) -> Self {
        Self {
            offset,
            limit,
            include_deleted: false,
            tag: None,
        }
    }

    /// Every live version.
    pub fn all() -> Self {
        Self::page(0, usize::MAX)
    }

    pub fn include_deleted(mut self, include: bool) -> Self {
        self.include_deleted = include;
        self
    }

    pub fn with_tag(mut self, tag: Tag) -> Self {
        self.tag = Some(tag);
        self
    }

    pub fn matches(&self, entity: &Entity) -> bool {
        (self.include_deleted || entity.is_used())
            && self.tag.as_ref().map_or(true, |t| entity.tag() == Some(t))
    }
}

impl Default for ListQuery {
    fn default() -> Self {
        Self::all()
    }
}

/// Apply `query` to `entities`, which must already be in creation order.
pub fn slice<'a, I>(entities: I, query: &ListQuery) -> Vec<&'a Entity>
where
    I: IntoIterator<Item = &'a Entity>,
{
    entities
        .into_iter()
        .filter(|e| query.matches(e))
        .skip(query.offset)
        .take(query.limit)
        .collect()
}
