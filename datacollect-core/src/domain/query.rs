//! Filter and field DSL of the element search endpoints.
//!
//! A search body looks like:
//!
//! ```json
//! {
//!   "filters": [
//!     { "type": "simple", "attribute": "Код", "operator": "equal", "value": "77" },
//!     { "type": "named", "name": "ActiveOnly", "parameters": {} }
//!   ],
//!   "fields": [
//!     { "type": "simple", "attribute": "Код" },
//!     { "type": "named", "name": "FullPath", "alias": "Путь" }
//!   ],
//!   "take": 100
//! }
//! ```

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::attribute::AttributeValue;
use crate::error::{CoreError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FilterOperator {
    Equal,
    NotEqual,
    Greater,
    GreaterOrEqual,
    Less,
    LessOrEqual,
    Contains,
    StartsWith,
    In,
    IsNull,
    IsNotNull,
}

impl FilterOperator {
    fn takes_value(self) -> bool {
        !matches!(self, Self::IsNull | Self::IsNotNull)
    }
}

impl fmt::Display for FilterOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Equal => "equal",
            Self::NotEqual => "notEqual",
            Self::Greater => "greater",
            Self::GreaterOrEqual => "greaterOrEqual",
            Self::Less => "less",
            Self::LessOrEqual => "lessOrEqual",
            Self::Contains => "contains",
            Self::StartsWith => "startsWith",
            Self::In => "in",
            Self::IsNull => "isNull",
            Self::IsNotNull => "isNotNull",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    List(Vec<AttributeValue>),
    Single(AttributeValue),
}

/// Condition on a single attribute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimpleFilter {
    pub attribute: String,
    pub operator: FilterOperator,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<FilterValue>,
}

impl SimpleFilter {
    pub fn new(
        attribute: impl Into<String>,
        operator: FilterOperator,
        value: Option<FilterValue>,
    ) -> Self {
        Self {
            attribute: attribute.into(),
            operator,
            value,
        }
    }

    fn compare(attribute: impl Into<String>, operator: FilterOperator, value: impl Into<AttributeValue>) -> Self {
        Self::new(attribute, operator, Some(FilterValue::Single(value.into())))
    }

    pub fn equal(attribute: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        Self::compare(attribute, FilterOperator::Equal, value)
    }

    pub fn not_equal(attribute: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        Self::compare(attribute, FilterOperator::NotEqual, value)
    }

    pub fn greater(attribute: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        Self::compare(attribute, FilterOperator::Greater, value)
    }

    pub fn greater_or_equal(attribute: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        Self::compare(attribute, FilterOperator::GreaterOrEqual, value)
    }

    pub fn less(attribute: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        Self::compare(attribute, FilterOperator::Less, value)
    }

    pub fn less_or_equal(attribute: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        Self::compare(attribute, FilterOperator::LessOrEqual, value)
    }

    pub fn contains(attribute: impl Into<String>, value: impl Into<String>) -> Self {
        Self::compare(attribute, FilterOperator::Contains, value.into())
    }

    pub fn starts_with(attribute: impl Into<String>, value: impl Into<String>) -> Self {
        Self::compare(attribute, FilterOperator::StartsWith, value.into())
    }

    pub fn one_of<I, V>(attribute: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<AttributeValue>,
    {
        let values = values.into_iter().map(Into::into).collect();
        Self::new(attribute, FilterOperator::In, Some(FilterValue::List(values)))
    }

    pub fn is_null(attribute: impl Into<String>) -> Self {
        Self::new(attribute, FilterOperator::IsNull, None)
    }

    pub fn is_not_null(attribute: impl Into<String>) -> Self {
        Self::new(attribute, FilterOperator::IsNotNull, None)
    }

    /// Check that the value shape fits the operator.
    pub fn validate(&self) -> Result<()> {
        match (self.operator, &self.value) {
            (FilterOperator::In, Some(FilterValue::List(_))) => Ok(()),
            (FilterOperator::In, _) => Err(CoreError::InvalidFilter(format!(
                "operator 'in' on '{}' requires a list value",
                self.attribute
            ))),
            (op, None) if !op.takes_value() => Ok(()),
            (op, Some(_)) if !op.takes_value() => Err(CoreError::InvalidFilter(format!(
                "operator '{}' on '{}' takes no value",
                op, self.attribute
            ))),
            (_, Some(FilterValue::Single(_))) => Ok(()),
            (op, _) => Err(CoreError::InvalidFilter(format!(
                "operator '{}' on '{}' requires a single value",
                op, self.attribute
            ))),
        }
    }
}

/// Predefined server-side filter invoked by name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedFilter {
    pub name: String,
    #[serde(default)]
    pub parameters: BTreeMap<String, AttributeValue>,
}

impl NamedFilter {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parameters: BTreeMap::new(),
        }
    }

    pub fn with_parameter(mut self, name: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        self.parameters.insert(name.into(), value.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Filter {
    Simple(SimpleFilter),
    Named(NamedFilter),
}

impl From<SimpleFilter> for Filter {
    fn from(filter: SimpleFilter) -> Self {
        Filter::Simple(filter)
    }
}

impl From<NamedFilter> for Filter {
    fn from(filter: NamedFilter) -> Self {
        Filter::Named(filter)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimpleField {
    pub attribute: String,
}

impl SimpleField {
    pub fn new(attribute: impl Into<String>) -> Self {
        Self {
            attribute: attribute.into(),
        }
    }
}

/// Computed field provided by the service, optionally renamed in the result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedField {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
}

impl NamedField {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            alias: None,
        }
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Field {
    Simple(SimpleField),
    Named(NamedField),
}

impl From<SimpleField> for Field {
    fn from(field: SimpleField) -> Self {
        Field::Simple(field)
    }
}

impl From<NamedField> for Field {
    fn from(field: NamedField) -> Self {
        Field::Named(field)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderBy {
    pub attribute: String,
    #[serde(default)]
    pub descending: bool,
}

/// Body of an element search request.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub filters: Vec<Filter>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<Field>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skip: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub take: Option<u32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub order_by: Vec<OrderBy>,
}

impl SearchRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filter(mut self, filter: impl Into<Filter>) -> Self {
        self.filters.push(filter.into());
        self
    }

    pub fn field(mut self, field: impl Into<Field>) -> Self {
        self.fields.push(field.into());
        self
    }

    pub fn skip(mut self, skip: u32) -> Self {
        self.skip = Some(skip);
        self
    }

    pub fn take(mut self, take: u32) -> Self {
        self.take = Some(take);
        self
    }

    pub fn order_by(mut self, attribute: impl Into<String>) -> Self {
        self.order_by.push(OrderBy {
            attribute: attribute.into(),
            descending: false,
        });
        self
    }

    pub fn order_by_desc(mut self, attribute: impl Into<String>) -> Self {
        self.order_by.push(OrderBy {
            attribute: attribute.into(),
            descending: true,
        });
        self
    }

    pub fn validate(&self) -> Result<()> {
        for filter in &self.filters {
            if let Filter::Simple(simple) = filter {
                simple.validate()?;
            }
        }
        Ok(())
    }
}
