use drupal_jsonapi_schema::{Model, ModelClass};

/// The model classes an application reads, looked up by resource type.
#[derive(Debug, Clone, Default)]
pub struct ModelRegistry {
    models: Vec<ModelClass>,
}

impl ModelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a class. A class already registered for the same resource
    /// type is replaced.
    pub fn register(&mut self, class: ModelClass) -> &mut Self {
        match self
            .models
            .iter_mut()
            .find(|existing| existing.resource_type() == class.resource_type())
        {
            Some(slot) => *slot = class,
            None => self.models.push(class),
        }
        self
    }

    pub fn register_model<M: Model>(&mut self) -> &mut Self {
        self.register(ModelClass::of::<M>())
    }

    pub fn find_by_resource_type(&self, resource_type: &str) -> Option<ModelClass> {
        self.models
            .iter()
            .find(|class| class.resource_type() == resource_type)
            .copied()
    }

    pub fn contains(&self, resource_type: &str) -> bool {
        self.find_by_resource_type(resource_type).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = ModelClass> + '_ {
        self.models.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}

impl FromIterator<ModelClass> for ModelRegistry {
    fn from_iter<I: IntoIterator<Item = ModelClass>>(iter: I) -> Self {
        let mut registry = Self::new();
        for class in iter {
            registry.register(class);
        }
        registry
    }
}
