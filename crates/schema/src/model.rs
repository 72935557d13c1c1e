use std::any::TypeId;
use std::fmt;

use crate::{Entity, RelationDef, SchemaError, SchemaResult};

/// Declares a JSON:API resource type and the parts of it the application
/// wants to load.
///
/// # Example
/// ```
/// use drupal_jsonapi_schema::{Model, RelationDef};
///
/// struct Person;
/// impl Model for Person {
///     const RESOURCE_TYPE: &'static str = "user--user";
///     fn fields() -> &'static [&'static str] {
///         &["name"]
///     }
/// }
///
/// struct Article;
/// impl Model for Article {
///     const RESOURCE_TYPE: &'static str = "node--article";
///     fn fields() -> &'static [&'static str] {
///         &["title", "body"]
///     }
///     fn includes() -> &'static [&'static str] {
///         &["author"]
///     }
///     fn relations() -> Vec<RelationDef> {
///         vec![RelationDef::has_one::<Person>("author")]
///     }
/// }
/// ```
pub trait Model: 'static {
    const RESOURCE_TYPE: &'static str;

    /// Attribute names requested for this resource.
    fn fields() -> &'static [&'static str];

    /// Extra fields merged into `fields` once, when an entity is created.
    /// Lets a model built on top of another extend the parent's field list.
    fn extend_fields() -> &'static [&'static str] {
        &[]
    }

    /// Relationship names to request and populate.
    fn includes() -> &'static [&'static str] {
        &[]
    }

    /// The relationship table of this model.
    fn relations() -> Vec<RelationDef> {
        Vec::new()
    }
}

fn resource_type_of<M: Model>() -> &'static str {
    M::RESOURCE_TYPE
}

/// Type-erased handle on a [`Model`] implementation.
///
/// Holds function pointers rather than evaluated tables, so relation tables
/// that reference each other (A has B, B has A) are only walked on demand.
#[derive(Clone, Copy)]
pub struct ModelClass {
    type_id: fn() -> TypeId,
    resource_type: fn() -> &'static str,
    fields: fn() -> &'static [&'static str],
    extend_fields: fn() -> &'static [&'static str],
    includes: fn() -> &'static [&'static str],
    relations: fn() -> Vec<RelationDef>,
}

impl ModelClass {
    pub fn of<M: Model>() -> Self {
        Self {
            type_id: TypeId::of::<M>,
            resource_type: resource_type_of::<M>,
            fields: M::fields,
            extend_fields: M::extend_fields,
            includes: M::includes,
            relations: M::relations,
        }
    }

    pub fn resource_type(&self) -> &'static str {
        (self.resource_type)()
    }

    /// Declared fields with the extend fields merged in, duplicates dropped.
    pub fn fields(&self) -> Vec<&'static str> {
        let mut fields: Vec<&'static str> = Vec::new();
        for field in (self.fields)().iter().chain((self.extend_fields)()) {
            if !fields.contains(field) {
                fields.push(field);
            }
        }
        fields
    }

    pub fn includes(&self) -> &'static [&'static str] {
        (self.includes)()
    }

    pub fn relations(&self) -> Vec<RelationDef> {
        (self.relations)()
    }

    pub fn relation(&self, name: &str) -> Option<RelationDef> {
        self.relations().into_iter().find(|rel| rel.name() == name)
    }

    /// URI path of the resource collection: `node--article` becomes
    /// `node/article`. Only the first `--` separates entity type and bundle.
    pub fn resource_path(&self) -> String {
        self.resource_type().replacen("--", "/", 1)
    }

    /// Checks the declaration is usable. Run when a repository is set up so
    /// misconfiguration fails before any request is made.
    pub fn validate(&self) -> SchemaResult<()> {
        if self.resource_type().is_empty() {
            return Err(SchemaError::EmptyResourceType(format!(
                "{:?}",
                (self.type_id)()
            )));
        }
        for relation in self.relations() {
            relation.validate()?;
        }
        Ok(())
    }

    pub fn new_entity(&self) -> Entity {
        Entity::new(*self)
    }
}

impl PartialEq for ModelClass {
    fn eq(&self, other: &Self) -> bool {
        (self.type_id)() == (other.type_id)()
    }
}

impl Eq for ModelClass {}

impl fmt::Debug for ModelClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ModelClass")
            .field(&self.resource_type())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Page;
    impl Model for Page {
        const RESOURCE_TYPE: &'static str = "node--page";
        fn fields() -> &'static [&'static str] {
            &["title", "body"]
        }
    }

    struct LandingPage;
    impl Model for LandingPage {
        const RESOURCE_TYPE: &'static str = "node--landing_page";
        fn fields() -> &'static [&'static str] {
            &["title", "body"]
        }
        fn extend_fields() -> &'static [&'static str] {
            &["hero", "title"]
        }
    }

    struct Nameless;
    impl Model for Nameless {
        const RESOURCE_TYPE: &'static str = "";
        fn fields() -> &'static [&'static str] {
            &[]
        }
    }

    #[test]
    fn test_extend_fields_are_merged_once() {
        let class = ModelClass::of::<LandingPage>();
        assert_eq!(class.fields(), vec!["title", "body", "hero"]);
    }

    #[test]
    fn test_resource_path_replaces_first_separator() {
        assert_eq!(ModelClass::of::<Page>().resource_path(), "node/page");
        assert_eq!(
            ModelClass::of::<LandingPage>().resource_path(),
            "node/landing_page"
        );
    }

    #[test]
    fn test_equality_is_by_model_type() {
        assert_eq!(ModelClass::of::<Page>(), ModelClass::of::<Page>());
        assert_ne!(ModelClass::of::<Page>(), ModelClass::of::<LandingPage>());
    }

    #[test]
    fn test_empty_resource_type_fails_validation() {
        let err = ModelClass::of::<Nameless>().validate().unwrap_err();
        assert!(matches!(err, SchemaError::EmptyResourceType(_)));
        assert!(ModelClass::of::<Page>().validate().is_ok());
    }
}
