//! Composable query modifiers
//!
//! A [`ScopeSet`] holds named [`Scope`]s in insertion order. Applying the set
//! runs every scope against one clone of the builder, so when two scopes write
//! the same parameter the later one wins.

mod builtin;

pub use builtin::{ConsumerScope, LanguageScope, NodeLangcodeScope};

use std::any::type_name;
use std::borrow::Cow;
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use itertools::Itertools;

use crate::QueryBuilder;

/// A side-effect free modifier of a [`QueryBuilder`].
pub trait Scope: Send + Sync {
    fn apply(&self, builder: &mut QueryBuilder);

    /// Contribution of this scope to response cache keys, on top of what
    /// [`ScopeSet::fingerprint`] sees in the request. State that changes the
    /// response without showing up in the request belongs here.
    fn cache_key(&self) -> String {
        String::new()
    }
}

impl<F> Scope for F
where
    F: Fn(&mut QueryBuilder) + Send + Sync,
{
    fn apply(&self, builder: &mut QueryBuilder) {
        self(builder)
    }
}

/// Identifier used for scopes registered by instance.
pub fn scope_id_of<S: ?Sized + 'static>() -> &'static str {
    type_name::<S>()
}

#[derive(Clone, Default)]
pub struct ScopeSet {
    scopes: Vec<(String, Arc<dyn Scope>)>,
    removed: BTreeSet<String>,
}

impl ScopeSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a scope. Re-registering an id replaces the scope in place.
    /// An id that was removed before becomes active again; it stays listed
    /// in [`ScopeSet::removed_scope_ids`].
    pub fn with_scope(&mut self, id: impl Into<String>, scope: impl Scope + 'static) -> &mut Self {
        self.with_shared_scope(id, Arc::new(scope))
    }

    pub fn with_shared_scope(&mut self, id: impl Into<String>, scope: Arc<dyn Scope>) -> &mut Self {
        let id = id.into();
        match self.scopes.iter_mut().find(|(existing, _)| *existing == id) {
            Some(slot) => slot.1 = scope,
            None => self.scopes.push((id, scope)),
        }
        self
    }

    pub fn with_scope_instance<S: Scope + 'static>(&mut self, scope: S) -> &mut Self {
        self.with_scope(scope_id_of::<S>(), scope)
    }

    pub fn without_scope(&mut self, id: &str) -> &mut Self {
        self.scopes.retain(|(existing, _)| existing != id);
        self.removed.insert(id.to_string());
        self
    }

    pub fn without_scope_of<S: Scope + 'static>(&mut self) -> &mut Self {
        self.without_scope(scope_id_of::<S>())
    }

    pub fn without_scopes<I, S>(&mut self, ids: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for id in ids {
            self.without_scope(id.as_ref());
        }
        self
    }

    /// Drop every scope without recording the ids as removed.
    pub fn without_all_scopes(&mut self) -> &mut Self {
        self.scopes.clear();
        self
    }

    pub fn removed_scope_ids(&self) -> &BTreeSet<String> {
        &self.removed
    }

    pub fn contains(&self, id: &str) -> bool {
        self.scopes.iter().any(|(existing, _)| existing == id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.scopes.iter().map(|(id, _)| id.as_str())
    }

    pub fn len(&self) -> usize {
        self.scopes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }

    /// Merge another set into this one, keeping this set's removals: an id
    /// removed here is not brought back by `other`.
    pub fn extend_from(&mut self, other: &ScopeSet) -> &mut Self {
        for (id, scope) in &other.scopes {
            if !self.removed.contains(id) {
                self.with_shared_scope(id.clone(), Arc::clone(scope));
            }
        }
        self
    }

    /// Stable description of the active scopes, used in cache keys.
    pub fn cache_key(&self) -> String {
        self.scopes
            .iter()
            .map(|(id, scope)| format!("{}:{}", id, scope.cache_key()))
            .join("|")
    }

    /// [`ScopeSet::cache_key`] plus the query the scopes produce on
    /// `builder`. Two sets whose scopes write different parameters never
    /// share a fingerprint, even when their ids and keys match.
    pub fn fingerprint(&self, builder: &QueryBuilder) -> String {
        let request = self.apply_to(builder).build();
        let query = request
            .query()
            .iter()
            .map(|(key, value)| format!("{}={}", key, value))
            .join("&");
        format!("{}#{}", self.cache_key(), query)
    }

    /// Run every scope against one clone of `builder`. With no scopes
    /// registered the builder is returned borrowed and unchanged.
    pub fn apply_to<'a>(&self, builder: &'a QueryBuilder) -> Cow<'a, QueryBuilder> {
        if self.scopes.is_empty() {
            return Cow::Borrowed(builder);
        }

        let mut scoped = builder.clone();
        for (_, scope) in &self.scopes {
            scope.apply(&mut scoped);
        }
        Cow::Owned(scoped)
    }
}

impl fmt::Debug for ScopeSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScopeSet")
            .field("scopes", &self.ids().collect::<Vec<_>>())
            .field("removed", &self.removed)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use url::Url;

    fn builder() -> QueryBuilder {
        QueryBuilder::new(Url::parse("https://cms.test/jsonapi/node/article").unwrap())
    }

    #[test]
    fn test_empty_set_borrows_builder() {
        let set = ScopeSet::new();
        let qb = builder();
        assert!(matches!(set.apply_to(&qb), Cow::Borrowed(_)));
    }

    #[test]
    fn test_last_writer_wins() {
        let mut set = ScopeSet::new();
        set.with_scope("a", |b: &mut QueryBuilder| {
            b.set_query_param("lang_code", "en");
        })
        .with_scope("b", |b: &mut QueryBuilder| {
            b.set_query_param("lang_code", "nl");
        });

        let qb = builder();
        let scoped = set.apply_to(&qb);
        assert_eq!(scoped.query_param("lang_code"), Some("nl"));
        assert_eq!(qb.query_param("lang_code"), None);
    }

    #[test]
    fn test_removal_is_recorded_and_readd_reactivates() {
        let mut set = ScopeSet::new();
        set.with_scope("consumer", |_: &mut QueryBuilder| {});
        set.without_scope("consumer");

        assert!(!set.contains("consumer"));
        assert!(set.removed_scope_ids().contains("consumer"));

        set.with_scope("consumer", |_: &mut QueryBuilder| {});
        assert!(set.contains("consumer"));
        assert!(set.removed_scope_ids().contains("consumer"));
    }

    #[test]
    fn test_without_all_scopes_does_not_record() {
        let mut set = ScopeSet::new();
        set.with_scope("a", |_: &mut QueryBuilder| {});
        set.without_all_scopes();
        assert!(set.is_empty());
        assert!(set.removed_scope_ids().is_empty());
    }

    #[test]
    fn test_fingerprint_follows_scope_effect() {
        let mut nl = ScopeSet::new();
        nl.with_scope("lang", |b: &mut QueryBuilder| {
            b.add_simple_filter("langcode", "nl");
        });
        let mut en = ScopeSet::new();
        en.with_scope("lang", |b: &mut QueryBuilder| {
            b.add_simple_filter("langcode", "en");
        });

        assert_eq!(nl.cache_key(), en.cache_key());
        assert_ne!(nl.fingerprint(&builder()), en.fingerprint(&builder()));
        assert_eq!(nl.fingerprint(&builder()), nl.clone().fingerprint(&builder()));
    }

    #[test]
    fn test_extend_respects_removals() {
        let mut global = ScopeSet::new();
        global
            .with_scope("a", |_: &mut QueryBuilder| {})
            .with_scope("b", |_: &mut QueryBuilder| {});

        let mut local = ScopeSet::new();
        local.without_scope("a");
        local.extend_from(&global);

        assert_eq!(local.ids().collect::<Vec<_>>(), vec!["b"]);
    }
}
