use drupal_jsonapi_schema::{
    Cardinality, Entity, ModelClass, RelationDef, RelationTarget, SchemaError, SchemaResult,
};

/// The entity a relation was requested from. Holds the owner's class and id
/// by value; the descriptor never owns or borrows the entity itself.
#[derive(Debug, Clone, PartialEq)]
pub struct RelationOwner {
    class: ModelClass,
    id: Option<String>,
}

impl RelationOwner {
    pub fn new(class: ModelClass, id: Option<String>) -> Self {
        Self { class, id }
    }

    pub fn of(entity: &Entity) -> Self {
        Self::new(entity.class(), entity.id().ok().map(str::to_string))
    }

    pub fn class(&self) -> ModelClass {
        self.class
    }

    pub fn resource_type(&self) -> &'static str {
        self.class.resource_type()
    }

    pub fn id(&self) -> SchemaResult<&str> {
        self.id
            .as_deref()
            .ok_or_else(|| SchemaError::IdNotLoaded(self.resource_type().to_string()))
    }
}

/// A named relationship of one particular entity.
///
/// Created per call by [`crate::RelationAccessor::relation`]. Which concrete
/// model a related resource maps onto is decided only when a response is
/// mapped, through [`Relation::resolve_class`].
#[derive(Debug, Clone, PartialEq)]
pub struct Relation {
    def: RelationDef,
    owner: RelationOwner,
}

impl Relation {
    pub fn new(def: RelationDef, owner: RelationOwner) -> Self {
        Self { def, owner }
    }

    pub fn def(&self) -> &RelationDef {
        &self.def
    }

    pub fn name(&self) -> &str {
        self.def.name()
    }

    pub fn owner(&self) -> &RelationOwner {
        &self.owner
    }

    pub fn owner_id(&self) -> SchemaResult<&str> {
        self.owner.id()
    }

    pub fn cardinality(&self) -> Cardinality {
        self.def.cardinality()
    }

    pub fn is_to_many(&self) -> bool {
        self.def.is_to_many()
    }

    pub fn is_mixed(&self) -> bool {
        self.def.is_mixed()
    }

    pub fn classes(&self) -> &[ModelClass] {
        self.def.classes()
    }

    pub fn target(&self) -> &RelationTarget {
        self.def.target()
    }

    /// Model class a related resource of `resource_type` maps onto. `None`
    /// means the resource should be skipped.
    pub fn resolve_class(&self, resource_type: &str) -> Option<ModelClass> {
        self.def.target().resolve(resource_type)
    }

    pub fn new_entity_for(&self, resource_type: &str) -> Option<Entity> {
        self.resolve_class(resource_type)
            .map(|class| class.new_entity())
    }

    pub fn expect_to_one(&self) -> SchemaResult<()> {
        self.def.expect(Cardinality::ToOne)
    }

    pub fn expect_to_many(&self) -> SchemaResult<()> {
        self.def.expect(Cardinality::ToMany)
    }

    /// Path of the related-resource endpoint below the API base, e.g.
    /// `node/article/1/field_tags`.
    pub fn related_path(&self) -> SchemaResult<String> {
        Ok(format!(
            "{}/{}/{}",
            self.owner.class().resource_path(),
            self.owner_id()?,
            self.name()
        ))
    }
}
