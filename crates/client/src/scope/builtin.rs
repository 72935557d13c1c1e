use crate::{ClientConfig, QueryBuilder, Scope};

/// Adds `_consumer_id` so Drupal can pick the matching consumer. Does nothing
/// without a consumer id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConsumerScope {
    consumer_id: Option<String>,
}

impl ConsumerScope {
    pub fn new(consumer_id: Option<String>) -> Self {
        Self {
            consumer_id: consumer_id.filter(|id| !id.is_empty()),
        }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(config.consumer_id.clone())
    }

    pub fn consumer_id(&self) -> Option<&str> {
        self.consumer_id.as_deref()
    }
}

impl Scope for ConsumerScope {
    fn apply(&self, builder: &mut QueryBuilder) {
        if let Some(id) = &self.consumer_id {
            builder.set_query_param("_consumer_id", id.as_str());
        }
    }

    fn cache_key(&self) -> String {
        self.consumer_id.clone().unwrap_or_default()
    }
}

/// Requests translated content through the `lang_code` query parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageScope {
    locale: String,
}

impl LanguageScope {
    pub fn new(locale: impl Into<String>) -> Self {
        Self {
            locale: locale.into(),
        }
    }

    /// `None` when no locale is configured.
    pub fn from_config(config: &ClientConfig) -> Option<Self> {
        config.locale.clone().map(Self::new)
    }
}

impl Scope for LanguageScope {
    fn apply(&self, builder: &mut QueryBuilder) {
        builder.set_query_param("lang_code", self.locale.as_str());
    }

    fn cache_key(&self) -> String {
        self.locale.clone()
    }
}

/// Restricts nodes to one language with a `langcode` shorthand filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeLangcodeScope {
    locale: String,
}

impl NodeLangcodeScope {
    pub fn new(locale: impl Into<String>) -> Self {
        Self {
            locale: locale.into(),
        }
    }

    pub fn from_config(config: &ClientConfig) -> Option<Self> {
        config.locale.clone().map(Self::new)
    }
}

impl Scope for NodeLangcodeScope {
    fn apply(&self, builder: &mut QueryBuilder) {
        builder.add_simple_filter("langcode", self.locale.as_str());
    }

    fn cache_key(&self) -> String {
        self.locale.clone()
    }
}
