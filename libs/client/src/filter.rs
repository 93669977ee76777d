//! Typed filter tree for queries and batch deletes
//!
//! Filters are built through `Filter::by_property` / `Filter::by_id` leaves
//! combined with `Filter::all_of` / `Filter::any_of`, then lowered to the
//! gRPC wire representation when the operation is dispatched.

use crate::error::{VexdbError, VexdbResult};
use vexdb_rpc::v1::{filters, Filters, TextArray};

/// Path component the server uses for identifier comparisons
const ID_PROPERTY: &str = "_id";

#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    Text(String),
    Int(i64),
    Number(f64),
    Bool(bool),
    TextArray(Vec<String>),
}

impl From<&str> for FilterValue {
    fn from(value: &str) -> Self {
        FilterValue::Text(value.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(value: String) -> Self {
        FilterValue::Text(value)
    }
}

impl From<i64> for FilterValue {
    fn from(value: i64) -> Self {
        FilterValue::Int(value)
    }
}

impl From<f64> for FilterValue {
    fn from(value: f64) -> Self {
        FilterValue::Number(value)
    }
}

impl From<bool> for FilterValue {
    fn from(value: bool) -> Self {
        FilterValue::Bool(value)
    }
}

impl From<Vec<String>> for FilterValue {
    fn from(values: Vec<String>) -> Self {
        FilterValue::TextArray(values)
    }
}

impl From<uuid::Uuid> for FilterValue {
    fn from(value: uuid::Uuid) -> Self {
        FilterValue::Text(value.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CompareOperator {
    Equal,
    NotEqual,
    GreaterThan,
    GreaterThanEqual,
    LessThan,
    LessThanEqual,
    Like,
    ContainsAny,
}

impl CompareOperator {
    fn to_proto(self) -> filters::Operator {
        match self {
            CompareOperator::Equal => filters::Operator::Equal,
            CompareOperator::NotEqual => filters::Operator::NotEqual,
            CompareOperator::GreaterThan => filters::Operator::GreaterThan,
            CompareOperator::GreaterThanEqual => filters::Operator::GreaterThanEqual,
            CompareOperator::LessThan => filters::Operator::LessThan,
            CompareOperator::LessThanEqual => filters::Operator::LessThanEqual,
            CompareOperator::Like => filters::Operator::Like,
            CompareOperator::ContainsAny => filters::Operator::ContainsAny,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum FilterNode {
    Compare {
        operator: CompareOperator,
        path: Vec<String>,
        value: FilterValue,
    },
    Group {
        all: bool,
        children: Vec<FilterNode>,
    },
}

/// A property path awaiting a comparison operator
#[derive(Debug, Clone)]
pub struct PropertyFilter {
    path: Vec<String>,
}

impl PropertyFilter {
    fn compare(self, operator: CompareOperator, value: impl Into<FilterValue>) -> Filter {
        Filter {
            node: FilterNode::Compare {
                operator,
                path: self.path,
                value: value.into(),
            },
        }
    }

    pub fn eq(self, value: impl Into<FilterValue>) -> Filter {
        self.compare(CompareOperator::Equal, value)
    }

    pub fn neq(self, value: impl Into<FilterValue>) -> Filter {
        self.compare(CompareOperator::NotEqual, value)
    }

    pub fn gt(self, value: impl Into<FilterValue>) -> Filter {
        self.compare(CompareOperator::GreaterThan, value)
    }

    pub fn gte(self, value: impl Into<FilterValue>) -> Filter {
        self.compare(CompareOperator::GreaterThanEqual, value)
    }

    pub fn lt(self, value: impl Into<FilterValue>) -> Filter {
        self.compare(CompareOperator::LessThan, value)
    }

    pub fn lte(self, value: impl Into<FilterValue>) -> Filter {
        self.compare(CompareOperator::LessThanEqual, value)
    }

    /// Wildcard match; `*` matches any sequence, `?` a single character
    pub fn like(self, pattern: impl Into<String>) -> Filter {
        self.compare(CompareOperator::Like, FilterValue::Text(pattern.into()))
    }

    pub fn contains_any(self, values: Vec<String>) -> Filter {
        self.compare(CompareOperator::ContainsAny, FilterValue::TextArray(values))
    }
}

/// A complete filter clause, ready to attach to a query
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    node: FilterNode,
}

impl Filter {
    pub fn by_property(name: impl Into<String>) -> PropertyFilter {
        PropertyFilter {
            path: vec![name.into()],
        }
    }

    /// Nested path for object-typed properties, e.g. `["address", "city"]`
    pub fn by_property_path(path: Vec<String>) -> PropertyFilter {
        PropertyFilter { path }
    }

    pub fn by_id() -> PropertyFilter {
        PropertyFilter {
            path: vec![ID_PROPERTY.to_string()],
        }
    }

    /// All clauses must match
    pub fn all_of(filters: Vec<Filter>) -> Filter {
        Filter {
            node: FilterNode::Group {
                all: true,
                children: filters.into_iter().map(|f| f.node).collect(),
            },
        }
    }

    /// At least one clause must match
    pub fn any_of(filters: Vec<Filter>) -> Filter {
        Filter {
            node: FilterNode::Group {
                all: false,
                children: filters.into_iter().map(|f| f.node).collect(),
            },
        }
    }

    pub(crate) fn to_proto(&self) -> VexdbResult<Filters> {
        lower(&self.node)
    }
}

fn lower(node: &FilterNode) -> VexdbResult<Filters> {
    match node {
        FilterNode::Compare {
            operator,
            path,
            value,
        } => {
            if path.is_empty() || path.iter().any(|p| p.trim().is_empty()) {
                return Err(VexdbError::Validation(
                    "filter property path must not be empty".to_string(),
                ));
            }
            let test_value = match value {
                FilterValue::Text(v) => filters::TestValue::Text(v.clone()),
                FilterValue::Int(v) => filters::TestValue::Int(*v),
                FilterValue::Number(v) => filters::TestValue::Number(*v),
                FilterValue::Bool(v) => filters::TestValue::Boolean(*v),
                FilterValue::TextArray(v) => {
                    filters::TestValue::TextArray(TextArray { values: v.clone() })
                }
            };
            Ok(Filters {
                operator: operator.to_proto() as i32,
                on: path.clone(),
                filters: Vec::new(),
                test_value: Some(test_value),
            })
        }
        FilterNode::Group { all, children } => {
            if children.is_empty() {
                return Err(VexdbError::Validation(
                    "filter group must have at least one clause".to_string(),
                ));
            }
            let operator = if *all {
                filters::Operator::And
            } else {
                filters::Operator::Or
            };
            let lowered = children.iter().map(lower).collect::<VexdbResult<_>>()?;
            Ok(Filters {
                operator: operator as i32,
                on: Vec::new(),
                filters: lowered,
                test_value: None,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leaf_comparison_lowers_to_proto() {
        let filter = Filter::by_property("pages").gte(100i64);
        let proto = filter.to_proto().unwrap();
        assert_eq!(proto.operator, filters::Operator::GreaterThanEqual as i32);
        assert_eq!(proto.on, vec!["pages".to_string()]);
        assert_eq!(proto.test_value, Some(filters::TestValue::Int(100)));
        assert!(proto.filters.is_empty());
    }

    #[test]
    fn test_nested_group_lowers_recursively() {
        let filter = Filter::all_of(vec![
            Filter::by_property("title").like("rust*"),
            Filter::any_of(vec![
                Filter::by_property("published").eq(true),
                Filter::by_property("score").gt(4.5),
            ]),
        ]);
        let proto = filter.to_proto().unwrap();
        assert_eq!(proto.operator, filters::Operator::And as i32);
        assert_eq!(proto.filters.len(), 2);
        assert_eq!(proto.filters[1].operator, filters::Operator::Or as i32);
        assert_eq!(proto.filters[1].filters.len(), 2);
    }

    #[test]
    fn test_id_filter_uses_reserved_path() {
        let id = uuid::Uuid::new_v4();
        let proto = Filter::by_id().eq(id).to_proto().unwrap();
        assert_eq!(proto.on, vec!["_id".to_string()]);
        assert_eq!(
            proto.test_value,
            Some(filters::TestValue::Text(id.to_string()))
        );
    }

    #[test]
    fn test_empty_group_rejected() {
        let err = Filter::all_of(vec![]).to_proto().unwrap_err();
        assert!(matches!(err, VexdbError::Validation(_)));
    }

    #[test]
    fn test_empty_path_rejected() {
        let err = Filter::by_property_path(vec![])
            .eq("x")
            .to_proto()
            .unwrap_err();
        assert!(matches!(err, VexdbError::Validation(_)));
    }
}
