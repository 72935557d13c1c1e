//! Sparse fieldset and include resolution.
//!
//! Walks a model's declared includes to compute the `fields[type]` and
//! `include` parameters for one request. Every resource type gets exactly one
//! fieldset entry, and a type that already has one is not descended into
//! again, which bounds the walk on cyclic relation graphs.

use drupal_jsonapi_schema::ModelClass;

/// The `fields` and `include` parameters computed for a request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceFields {
    /// One entry per resource type, in discovery order.
    pub fields: Vec<(String, Vec<String>)>,
    /// Dotted include paths. A path implied by a longer one is left out.
    pub includes: Vec<String>,
}

impl ResourceFields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_type(&self, resource_type: &str) -> bool {
        self.fields.iter().any(|(ty, _)| ty == resource_type)
    }

    pub fn fields_for(&self, resource_type: &str) -> Option<&[String]> {
        self.fields
            .iter()
            .find(|(ty, _)| ty == resource_type)
            .map(|(_, names)| names.as_slice())
    }

    /// Record an include path unless it is already present or a recorded
    /// path continues it (`author` is implied by `author.picture`).
    pub fn add_include(&mut self, path: String) {
        let nested = format!("{}.", path);
        let implied = self
            .includes
            .iter()
            .any(|existing| *existing == path || existing.starts_with(&nested));
        if !implied {
            self.includes.push(path);
        }
    }

    fn record(&mut self, class: ModelClass) {
        if self.has_type(class.resource_type()) {
            return;
        }
        let mut names: Vec<String> = class.fields().into_iter().map(str::to_string).collect();
        for include in class.includes() {
            if !names.iter().any(|name| name == include) {
                names.push(include.to_string());
            }
        }
        self.fields.push((class.resource_type().to_string(), names));
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FieldResolver {
    without_includes: bool,
}

impl FieldResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolver that only records the top-level fieldsets and never adds
    /// include paths.
    pub fn without_includes() -> Self {
        Self {
            without_includes: true,
        }
    }

    pub fn resolve(&self, class: ModelClass) -> ResourceFields {
        let mut acc = ResourceFields::new();
        self.resolve_into(class, None, &mut acc);
        acc
    }

    /// Resolve several classes into one accumulator, e.g. every target of a
    /// mixed relation.
    pub fn resolve_all(&self, classes: &[ModelClass]) -> ResourceFields {
        let mut acc = ResourceFields::new();
        for class in classes {
            self.resolve_into(*class, None, &mut acc);
        }
        acc
    }

    pub fn resolve_into(&self, class: ModelClass, prefix: Option<&str>, acc: &mut ResourceFields) {
        acc.record(class);
        if self.without_includes {
            return;
        }

        for name in class.includes() {
            // includes without a declared relation are ignored
            let Some(relation) = class.relation(name) else {
                continue;
            };
            let path = match prefix {
                Some(prefix) => format!("{}.{}", prefix, name),
                None => name.to_string(),
            };

            for target in relation.classes() {
                if !acc.has_type(target.resource_type()) {
                    self.resolve_into(*target, Some(&path), acc);
                }
            }
            acc.add_include(path);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Article, Author, Book, Page, Person};
    use pretty_assertions::assert_eq;

    fn strings(names: &[&str]) -> Vec<String> {
        names.iter().map(|name| name.to_string()).collect()
    }

    #[test]
    fn test_article_with_author() {
        let resolved = FieldResolver::new().resolve(ModelClass::of::<Article>());

        assert_eq!(
            resolved.fields,
            vec![
                ("node--article".to_string(), strings(&["title", "body", "author"])),
                ("user--user".to_string(), strings(&["name"])),
            ]
        );
        assert_eq!(resolved.includes, strings(&["author"]));
    }

    #[test]
    fn test_cyclic_graph_terminates() {
        let resolved = FieldResolver::new().resolve(ModelClass::of::<Book>());

        assert_eq!(resolved.fields.len(), 2);
        assert!(resolved.has_type("node--book"));
        assert!(resolved.has_type("node--author"));
        assert_eq!(resolved.includes, strings(&["author.books"]));
    }

    #[test]
    fn test_mixed_targets_and_undeclared_includes() {
        let resolved = FieldResolver::new().resolve(ModelClass::of::<Page>());

        assert_eq!(
            resolved.fields_for("node--page").unwrap(),
            strings(&["title", "created", "changed", "tags", "media", "hero", "field_missing"])
                .as_slice()
        );
        assert!(resolved.has_type("media--image"));
        assert!(resolved.has_type("media--video"));
        assert!(resolved.has_type("taxonomy_term--tags"));
        assert_eq!(resolved.includes, strings(&["tags", "media", "hero"]));
    }

    #[test]
    fn test_without_includes_skips_traversal() {
        let resolved = FieldResolver::without_includes().resolve(ModelClass::of::<Article>());
        assert_eq!(resolved.fields.len(), 1);
        assert!(resolved.includes.is_empty());
    }

    #[test]
    fn test_resolve_all_shares_accumulator() {
        let resolved = FieldResolver::new()
            .resolve_all(&[ModelClass::of::<Person>(), ModelClass::of::<Article>()]);
        let types: Vec<&str> = resolved.fields.iter().map(|(ty, _)| ty.as_str()).collect();
        assert_eq!(types, vec!["user--user", "node--article"]);
        assert_eq!(resolved.includes, strings(&["author"]));
    }

    #[test]
    fn test_add_include_keeps_paths_minimal() {
        let mut fields = ResourceFields::new();
        fields.add_include("author.picture".to_string());
        fields.add_include("author".to_string());
        fields.add_include("author.picture".to_string());
        fields.add_include("authority".to_string());
        assert_eq!(fields.includes, strings(&["author.picture", "authority"]));
    }
}
