use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use itertools::Itertools;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortDirection {
    Asc,
    Desc,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SortField {
    pub field: String,
    pub direction: SortDirection,
}

/// Sort specification. A leading `-` on a field name means descending.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Sort(Vec<SortField>);

impl Sort {
    /// Parse a comma separated spec such as `-created,title`.
    pub fn parse(spec: &str) -> Self {
        let fields = spec
            .split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty() && *part != "-")
            .map(|part| match part.strip_prefix('-') {
                Some(field) => SortField {
                    field: field.to_string(),
                    direction: SortDirection::Desc,
                },
                None => SortField {
                    field: part.to_string(),
                    direction: SortDirection::Asc,
                },
            })
            .collect();
        Self(fields)
    }

    pub fn asc(field: impl Into<String>) -> Self {
        Self::default().then_asc(field)
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self::default().then_desc(field)
    }

    pub fn then_asc(mut self, field: impl Into<String>) -> Self {
        self.0.push(SortField {
            field: field.into(),
            direction: SortDirection::Asc,
        });
        self
    }

    pub fn then_desc(mut self, field: impl Into<String>) -> Self {
        self.0.push(SortField {
            field: field.into(),
            direction: SortDirection::Desc,
        });
        self
    }

    pub fn fields(&self) -> &[SortField] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Value of the `sort` query parameter.
    pub fn to_query_value(&self) -> String {
        self.0
            .iter()
            .map(|sort| match sort.direction {
                SortDirection::Asc => sort.field.clone(),
                SortDirection::Desc => format!("-{}", sort.field),
            })
            .join(",")
    }
}

impl fmt::Display for Sort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_query_value())
    }
}

impl FromStr for Sort {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl From<&str> for Sort {
    fn from(spec: &str) -> Self {
        Self::parse(spec)
    }
}

/// Offset based pagination, `page[offset]` and `page[limit]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Page {
    pub offset: u64,
    pub limit: u64,
}

impl Page {
    pub fn new(offset: u64, limit: u64) -> Self {
        Self { offset, limit }
    }

    pub fn first(limit: u64) -> Self {
        Self::new(0, limit)
    }

    /// The page following this one.
    pub fn next(&self) -> Self {
        Self::new(self.offset + self.limit, self.limit)
    }
}
