use arca_types::{VersionNumber, VersionSelector};

use crate::record::Entity;

/// Append-only version history of one key in one namespace.
///
/// Position `i` always holds version number `i`: numbers start at
/// [`VersionNumber::FIRST`], grow by one per append and are never reused.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Chain {
    entries: Vec<Entity>,
}

impl Chain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Versions in creation order.
    pub fn iter(&self) -> std::slice::Iter<'_, Entity> {
        self.entries.iter()
    }

    pub fn as_slice(&self) -> &[Entity] {
        &self.entries
    }

    pub fn get(&self, index: usize) -> Option<&Entity> {
        self.entries.get(index)
    }

    /// The most recently appended version, whatever its status.
    pub fn last(&self) -> Option<&Entity> {
        self.entries.last()
    }

    /// Number the next appended version will get.
    pub fn next_number(&self) -> VersionNumber {
        self.last()
            .map(|e| e.number().next())
            .unwrap_or(VersionNumber::FIRST)
    }

    /// Append a version, returning its index. The caller must have numbered
    /// it with [`next_number`](Self::next_number).
    pub(crate) fn push(&mut self, entity: Entity) -> usize {
        debug_assert_eq!(entity.number(), self.next_number());
        self.entries.push(entity);
        self.entries.len() - 1
    }

    /// Index of the version `selector` names.
    ///
    /// `Latest` is the newest `USED` version. Tag and checksum matches are
    /// the earliest in creation order, deleted or not.
    pub fn position(&self, selector: &VersionSelector) -> Option<usize> {
        match selector {
            VersionSelector::Latest => self.entries.iter().rposition(Entity::is_used),
            VersionSelector::Number(n) => self
                .entries
                .binary_search_by_key(n, Entity::number)
                .ok(),
            other => self.entries.iter().position(|e| e.matches(other)),
        }
    }

    pub fn find(&self, selector: &VersionSelector) -> Option<&Entity> {
        self.position(selector).map(|i| &self.entries[i])
    }

    pub(crate) fn find_mut(&mut self, selector: &VersionSelector) -> Option<&mut Entity> {
        let index = self.position(selector)?;
        self.entries.get_mut(index)
    }
}

impl<'a> IntoIterator for &'a Chain {
    type Item = &'a Entity;
    type IntoIter = std::slice::Iter<'a, Entity>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{Payload, VersionRecord};
    use arca_types::{Status, Tag, Timestamp, VersionUuid};
    use uuid::Uuid;

    fn version(chain: &Chain, tag: Option<&str>) -> Entity {
        let number = chain.next_number();
        let mut bytes = [0u8; 16];
        bytes[15] = number.get() as u8 + 1;
        Entity::new(
            "k".into(),
            VersionRecord {
                uuid: VersionUuid::from_uuid(Uuid::from_bytes(bytes)),
                number,
                tag: tag.map(|t| Tag::new(t).unwrap()),
                status: Status::Used,
                creation_date: Timestamp::epoch(),
                timestamp: Timestamp::epoch(),
                user_metadata: None,
            },
            Payload::Collection(Vec::new()),
        )
    }

    fn chain_of(tags: &[Option<&str>]) -> Chain {
        let mut chain = Chain::new();
        for tag in tags {
            let v = version(&chain, *tag);
            chain.push(v);
        }
        chain
    }

    #[test]
    fn numbers_follow_positions() {
        let chain = chain_of(&[None, None, None]);
        assert_eq!(chain.next_number(), VersionNumber::new(3));
        for (i, e) in chain.iter().enumerate() {
            assert_eq!(e.number().get(), i as u64);
        }
    }

    #[test]
    fn empty_chain_starts_at_first() {
        let chain = Chain::new();
        assert_eq!(chain.next_number(), VersionNumber::FIRST);
        assert!(chain.find(&VersionSelector::Latest).is_none());
    }

    #[test]
    fn latest_skips_deleted() {
        let mut chain = chain_of(&[None, None, None]);
        let at = Timestamp::epoch();
        assert!(chain.find_mut(&VersionNumber::new(2).into()).unwrap().soft_delete(at));
        assert_eq!(chain.position(&VersionSelector::Latest), Some(1));

        chain.find_mut(&VersionNumber::new(0).into()).unwrap().soft_delete(at);
        chain.find_mut(&VersionNumber::new(1).into()).unwrap().soft_delete(at);
        assert_eq!(chain.position(&VersionSelector::Latest), None);
    }

    #[test]
    fn tag_picks_earliest_even_if_deleted() {
        let mut chain = chain_of(&[Some("a"), None, Some("a")]);
        let tag: VersionSelector = Tag::new("a").unwrap().into();
        chain.find_mut(&tag).unwrap().soft_delete(Timestamp::epoch());
        assert_eq!(chain.position(&tag), Some(0));
        assert_eq!(chain.position(&Tag::new("b").unwrap().into()), None);
    }

    #[test]
    fn uuid_and_number_lookups() {
        let chain = chain_of(&[None, None]);
        let uuid = chain.get(1).unwrap().uuid();
        assert_eq!(chain.position(&uuid.into()), Some(1));
        assert_eq!(chain.position(&VersionNumber::new(7).into()), None);
    }
}
