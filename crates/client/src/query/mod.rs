//! Request builder for Drupal JSON:API reads
//!
//! [`QueryBuilder`] collects filters, sparse fieldsets, includes, sort and
//! pagination. Nothing is serialized until [`QueryBuilder::build`], which
//! applies the registered scopes to a copy of the builder first.

mod filter;
mod sort;

pub use filter::{Condition, Conjunction, FilterEntry, Operator};
pub use sort::{Page, Sort, SortDirection, SortField};

use std::borrow::Cow;
use std::collections::BTreeSet;
use std::sync::Arc;

use itertools::Itertools;
use serde_json::Value;
use url::Url;

use crate::http::{JsonApiRequest, Method};
use crate::scope::{Scope, ScopeSet};
use crate::Credentials;

pub const FORMAT_PARAM: &str = "_format";
pub const FORMAT_VALUE: &str = "api_json";

#[derive(Debug, Clone)]
pub struct QueryBuilder {
    method: Method,
    url: Url,
    headers: Vec<(String, String)>,
    query: Vec<(String, String)>,
    filters: Vec<(String, FilterEntry)>,
    fields: Vec<(String, Vec<String>)>,
    includes: Vec<String>,
    sort: Option<Sort>,
    page: Option<Page>,
    basic_auth: Option<Credentials>,
    scopes: ScopeSet,
}

impl QueryBuilder {
    /// New GET builder for `url`. Query parameters already on the URL are
    /// kept as regular parameters.
    pub fn new(mut url: Url) -> Self {
        let existing: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        url.set_query(None);

        let mut builder = Self {
            method: Method::GET,
            url,
            headers: Vec::new(),
            query: Vec::new(),
            filters: Vec::new(),
            fields: Vec::new(),
            includes: Vec::new(),
            sort: None,
            page: None,
            basic_auth: None,
            scopes: ScopeSet::new(),
        };

        builder
            .header("Accept-Charset", "utf-8")
            .set_query_param(FORMAT_PARAM, FORMAT_VALUE);
        for (key, value) in existing {
            builder.set_query_param(key, value);
        }
        builder
    }

    pub fn method(&mut self, method: Method) -> &mut Self {
        self.method = method;
        self
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn set_url(&mut self, url: Url) -> &mut Self {
        self.url = url;
        self
    }

    /// Set a header, replacing any earlier value (names compare
    /// case-insensitively).
    pub fn header(&mut self, name: impl Into<String>, value: impl Into<String>) -> &mut Self {
        let name = name.into();
        let value = value.into();
        match self
            .headers
            .iter_mut()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(&name))
        {
            Some(slot) => slot.1 = value,
            None => self.headers.push((name, value)),
        }
        self
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    /// Set a plain query parameter. A later write to the same key wins.
    pub fn set_query_param(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        let key = key.into();
        let value = value.into();
        match self.query.iter_mut().find(|(existing, _)| *existing == key) {
            Some(slot) => slot.1 = value,
            None => self.query.push((key, value)),
        }
        self
    }

    pub fn query_param(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(existing, _)| existing == key)
            .map(|(_, value)| value.as_str())
    }

    /// Add a filter condition.
    ///
    /// Without an explicit `filter_id` the id is derived from the path with
    /// `.` replaced by `-`. When that id is taken, `_1`, `_2`, ... is appended
    /// until it is unique.
    pub fn add_filter(
        &mut self,
        path: impl Into<String>,
        operator: Operator,
        value: Option<Value>,
        group: Option<&str>,
        filter_id: Option<&str>,
    ) -> &mut Self {
        let path = path.into();
        let id = match filter_id {
            Some(id) => id.to_string(),
            None => self.unique_filter_id(&path.replace('.', "-")),
        };

        let condition = Condition {
            path,
            operator,
            value,
            member_of: group.map(str::to_string),
        };
        self.put_filter(id, FilterEntry::Condition(condition));
        self
    }

    /// Shorthand for an ungrouped condition with an auto generated id.
    pub fn filter(
        &mut self,
        path: impl Into<String>,
        operator: Operator,
        value: impl Into<Value>,
    ) -> &mut Self {
        self.add_filter(path, operator, Some(value.into()), None, None)
    }

    pub fn filter_in<I, V>(&mut self, path: impl Into<String>, values: I) -> &mut Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let values: Vec<Value> = values.into_iter().map(Into::into).collect();
        self.add_filter(path, Operator::In, Some(Value::Array(values)), None, None)
    }

    /// Shorthand filter keyed by the path itself; a path can only be filtered
    /// once this way.
    pub fn add_simple_filter(&mut self, path: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.put_filter(path.into(), FilterEntry::Value(value.into()));
        self
    }

    pub fn add_filter_group(
        &mut self,
        name: impl Into<String>,
        conjunction: Conjunction,
        parent: Option<&str>,
    ) -> &mut Self {
        self.put_filter(
            name.into(),
            FilterEntry::Group {
                conjunction,
                member_of: parent.map(str::to_string),
            },
        );
        self
    }

    pub fn filters(&self) -> &[(String, FilterEntry)] {
        &self.filters
    }

    pub fn has_filter(&self, id: &str) -> bool {
        self.filters.iter().any(|(existing, _)| existing == id)
    }

    fn unique_filter_id(&self, base: &str) -> String {
        let mut candidate = base.to_string();
        let mut affix = 0;
        while self.has_filter(&candidate) {
            affix += 1;
            candidate = format!("{}_{}", base, affix);
        }
        candidate
    }

    fn put_filter(&mut self, id: String, entry: FilterEntry) {
        match self.filters.iter_mut().find(|(existing, _)| *existing == id) {
            Some(slot) => slot.1 = entry,
            None => self.filters.push((id, entry)),
        }
    }

    /// Replace the sparse fieldsets, one list of field names per resource type.
    pub fn set_fields<I, T, F, S>(&mut self, fields: I) -> &mut Self
    where
        I: IntoIterator<Item = (T, F)>,
        T: Into<String>,
        F: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields = fields
            .into_iter()
            .map(|(ty, names)| (ty.into(), names.into_iter().map(Into::into).collect()))
            .collect();
        self
    }

    pub fn fields(&self) -> &[(String, Vec<String>)] {
        &self.fields
    }

    pub fn set_includes<I, S>(&mut self, includes: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.includes = includes.into_iter().map(Into::into).collect();
        self
    }

    pub fn includes(&self) -> &[String] {
        &self.includes
    }

    pub fn set_sort(&mut self, sort: impl Into<Sort>) -> &mut Self {
        self.sort = Some(sort.into());
        self
    }

    pub fn sort(&self) -> Option<&Sort> {
        self.sort.as_ref()
    }

    pub fn set_page(&mut self, page: Page) -> &mut Self {
        self.page = Some(page);
        self
    }

    pub fn page(&self) -> Option<Page> {
        self.page
    }

    pub fn set_basic_auth(&mut self, credentials: Credentials) -> &mut Self {
        self.basic_auth = Some(credentials);
        self
    }

    pub fn basic_auth(&self) -> Option<&Credentials> {
        self.basic_auth.as_ref()
    }

    pub fn with_scope(&mut self, id: impl Into<String>, scope: impl Scope + 'static) -> &mut Self {
        self.scopes.with_scope(id, scope);
        self
    }

    pub fn with_shared_scope(&mut self, id: impl Into<String>, scope: Arc<dyn Scope>) -> &mut Self {
        self.scopes.with_shared_scope(id, scope);
        self
    }

    /// Register a scope under its type name.
    pub fn with_scope_instance<S: Scope + 'static>(&mut self, scope: S) -> &mut Self {
        self.scopes.with_scope_instance(scope);
        self
    }

    pub fn without_scope(&mut self, id: &str) -> &mut Self {
        self.scopes.without_scope(id);
        self
    }

    pub fn without_scope_of<S: Scope + 'static>(&mut self) -> &mut Self {
        self.scopes.without_scope_of::<S>();
        self
    }

    pub fn without_scopes<I, S>(&mut self, ids: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.scopes.without_scopes(ids);
        self
    }

    pub fn without_all_scopes(&mut self) -> &mut Self {
        self.scopes.without_all_scopes();
        self
    }

    pub fn removed_scope_ids(&self) -> &BTreeSet<String> {
        self.scopes.removed_scope_ids()
    }

    pub fn scopes(&self) -> &ScopeSet {
        &self.scopes
    }

    pub fn set_scopes(&mut self, scopes: ScopeSet) -> &mut Self {
        self.scopes = scopes;
        self
    }

    /// This builder with its scopes applied. Borrows `self` unchanged when no
    /// scope is registered.
    pub fn apply_scopes(&self) -> Cow<'_, QueryBuilder> {
        self.scopes.apply_to(self)
    }

    /// Apply scopes and serialize everything into a request. Leaves `self`
    /// untouched, so repeated calls produce independent, equal requests.
    pub fn build(&self) -> JsonApiRequest {
        let applied = self.apply_scopes();
        applied.serialize()
    }

    fn serialize(&self) -> JsonApiRequest {
        let mut query = self.query.clone();

        for (resource_type, names) in &self.fields {
            query.push((format!("fields[{}]", resource_type), names.iter().join(",")));
        }
        if !self.includes.is_empty() {
            query.push(("include".to_string(), self.includes.iter().join(",")));
        }
        if let Some(sort) = self.sort.as_ref().filter(|sort| !sort.is_empty()) {
            query.push(("sort".to_string(), sort.to_query_value()));
        }
        if let Some(page) = self.page {
            query.push(("page[offset]".to_string(), page.offset.to_string()));
            query.push(("page[limit]".to_string(), page.limit.to_string()));
        }
        for (id, entry) in &self.filters {
            entry.write_pairs(id, &mut query);
        }

        JsonApiRequest::new(
            self.method.clone(),
            self.url.clone(),
            self.headers.clone(),
            query,
            self.basic_auth.clone(),
        )
    }
}
