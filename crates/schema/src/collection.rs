use crate::Entity;

/// Ordered list of entities as returned by a collection read.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Collection(Vec<Entity>);

impl Collection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entity: Entity) {
        self.0.push(entity);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn first(&self) -> Option<&Entity> {
        self.0.first()
    }

    pub fn get(&self, index: usize) -> Option<&Entity> {
        self.0.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Entity> {
        self.0.iter()
    }

    /// Find an entity by resource type and id.
    pub fn find(&self, resource_type: &str, id: &str) -> Option<&Entity> {
        self.0
            .iter()
            .find(|entity| entity.resource_type() == resource_type && entity.id().ok() == Some(id))
    }

    /// Ids of the loaded entities, in collection order.
    pub fn ids(&self) -> Vec<&str> {
        self.0.iter().filter_map(|entity| entity.id().ok()).collect()
    }

    pub fn into_vec(self) -> Vec<Entity> {
        self.0
    }
}

impl From<Vec<Entity>> for Collection {
    fn from(entities: Vec<Entity>) -> Self {
        Self(entities)
    }
}

impl FromIterator<Entity> for Collection {
    fn from_iter<I: IntoIterator<Item = Entity>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for Collection {
    type Item = Entity;
    type IntoIter = std::vec::IntoIter<Entity>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Collection {
    type Item = &'a Entity;
    type IntoIter = std::slice::Iter<'a, Entity>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Model, ModelClass};

    struct Note;
    impl Model for Note {
        const RESOURCE_TYPE: &'static str = "node--note";
        fn fields() -> &'static [&'static str] {
            &["title"]
        }
    }

    fn note(id: &str) -> Entity {
        let mut entity = ModelClass::of::<Note>().new_entity();
        entity.set_id(id);
        entity
    }

    #[test]
    fn test_find_by_type_and_id() {
        let collection: Collection = vec![note("a"), note("b")].into();

        assert_eq!(collection.ids(), vec!["a", "b"]);
        assert!(collection.find("node--note", "b").is_some());
        assert!(collection.find("node--page", "b").is_none());
        assert!(collection.find("node--note", "c").is_none());
    }
}
