use std::fmt;
use std::str::FromStr;

use serde_json::Value;

use crate::ClientError;

/// Comparison operators understood by Drupal's JSON:API filter syntax.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Operator {
    #[default]
    Eq,
    NotEq,
    Gt,
    Gte,
    Lt,
    Lte,
    StartsWith,
    Contains,
    EndsWith,
    In,
    NotIn,
    Between,
    NotBetween,
    IsNull,
    IsNotNull,
}

impl Operator {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::Eq => "=",
            Operator::NotEq => "<>",
            Operator::Gt => ">",
            Operator::Gte => ">=",
            Operator::Lt => "<",
            Operator::Lte => "<=",
            Operator::StartsWith => "STARTS_WITH",
            Operator::Contains => "CONTAINS",
            Operator::EndsWith => "ENDS_WITH",
            Operator::In => "IN",
            Operator::NotIn => "NOT IN",
            Operator::Between => "BETWEEN",
            Operator::NotBetween => "NOT BETWEEN",
            Operator::IsNull => "IS NULL",
            Operator::IsNotNull => "IS NOT NULL",
        }
    }

    pub fn is_null_check(&self) -> bool {
        matches!(self, Operator::IsNull | Operator::IsNotNull)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operator {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let op = match s.trim().to_ascii_uppercase().as_str() {
            "=" | "==" => Operator::Eq,
            "<>" | "!=" => Operator::NotEq,
            ">" => Operator::Gt,
            ">=" => Operator::Gte,
            "<" => Operator::Lt,
            "<=" => Operator::Lte,
            "STARTS_WITH" => Operator::StartsWith,
            "CONTAINS" => Operator::Contains,
            "ENDS_WITH" => Operator::EndsWith,
            "IN" => Operator::In,
            "NOT IN" => Operator::NotIn,
            "BETWEEN" => Operator::Between,
            "NOT BETWEEN" => Operator::NotBetween,
            "IS NULL" => Operator::IsNull,
            "IS NOT NULL" => Operator::IsNotNull,
            _ => return Err(ClientError::UnknownOperator(s.to_string())),
        };
        Ok(op)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Conjunction {
    #[default]
    And,
    Or,
}

impl Conjunction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Conjunction::And => "AND",
            Conjunction::Or => "OR",
        }
    }
}

/// A single filter condition. The builder does not check that operator and
/// value fit together.
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub path: String,
    pub operator: Operator,
    pub value: Option<Value>,
    pub member_of: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FilterEntry {
    Condition(Condition),
    /// Shorthand `filter[path][value]=...` filter.
    Value(Value),
    Group {
        conjunction: Conjunction,
        member_of: Option<String>,
    },
}

impl FilterEntry {
    /// Append the wire representation of this entry under `filter[{id}]`.
    pub(crate) fn write_pairs(&self, id: &str, out: &mut Vec<(String, String)>) {
        let root = format!("filter[{}]", id);
        match self {
            FilterEntry::Condition(condition) => {
                let prefix = format!("{}[condition]", root);
                out.push((format!("{}[path]", prefix), condition.path.clone()));
                out.push((
                    format!("{}[operator]", prefix),
                    condition.operator.as_str().to_string(),
                ));
                if let Some(value) = &condition.value {
                    flatten_value(&format!("{}[value]", prefix), value, out);
                }
                if let Some(group) = &condition.member_of {
                    out.push((format!("{}[memberOf]", prefix), group.clone()));
                }
            }
            FilterEntry::Value(value) => {
                flatten_value(&format!("{}[value]", root), value, out);
            }
            FilterEntry::Group {
                conjunction,
                member_of,
            } => {
                let prefix = format!("{}[group]", root);
                out.push((
                    format!("{}[conjunction]", prefix),
                    conjunction.as_str().to_string(),
                ));
                if let Some(parent) = member_of {
                    out.push((format!("{}[memberOf]", prefix), parent.clone()));
                }
            }
        }
    }
}

/// Expand a JSON value into bracketed query pairs: arrays become `[0]`,
/// `[1]`, objects `[key]`. Null leaves are dropped.
pub(crate) fn flatten_value(prefix: &str, value: &Value, out: &mut Vec<(String, String)>) {
    match value {
        Value::Null => {}
        Value::Bool(flag) => out.push((prefix.to_string(), if *flag { "1" } else { "0" }.to_string())),
        Value::Number(number) => out.push((prefix.to_string(), number.to_string())),
        Value::String(text) => out.push((prefix.to_string(), text.clone())),
        Value::Array(items) => {
            for (index, item) in items.iter().enumerate() {
                flatten_value(&format!("{}[{}]", prefix, index), item, out);
            }
        }
        Value::Object(map) => {
            for (key, item) in map {
                flatten_value(&format!("{}[{}]", prefix, key), item, out);
            }
        }
    }
}
