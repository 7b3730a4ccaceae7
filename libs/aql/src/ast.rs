//! Parsed AQL query
//!
//! The grammar and parser live outside this crate; the executor consumes the syntax tree
//! they produce. The tree is serde-encoded so a query can be handed over as JSON:
//!
//! ```text
//! SELECT e/ehr_id/value AS ID FROM EHR e
//!
//! {
//!   "select": { "exprs": [ { "value": { "type": "identified_path",
//!                                       "identifier": "e",
//!                                       "path": { "segments": [ { "identifier": "ehr_id" },
//!                                                               { "identifier": "value" } ] } },
//!                            "alias": "ID" } ] },
//!   "from": { "operand": { "type": "class", "class_name": "EHR", "alias": "e" } }
//! }
//! ```

use crate::value::Value;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A complete query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Query {
    pub select: SelectClause,

    pub from: FromClause,

    #[serde(default, rename = "where", skip_serializing_if = "Option::is_none")]
    pub where_clause: Option<WhereClause>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub order_by: Vec<OrderByExpr>,
}

// ============================================
// SELECT
// ============================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectClause {
    #[serde(default)]
    pub distinct: bool,

    pub exprs: Vec<SelectExpr>,
}

/// One column of the SELECT list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectExpr {
    pub value: SelectValue,

    /// `AS name`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
}

impl SelectExpr {
    /// Column name: the declared alias, else the expression text.
    pub fn column_name(&self) -> String {
        self.alias
            .clone()
            .unwrap_or_else(|| self.value.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SelectValue {
    /// `alias/path...`
    IdentifiedPath(IdentifiedPath),

    /// Literal or `$parameter`
    Primitive { value: Primitive },

    /// `COUNT(...)`, `MAX(...)`, ...
    AggregateFunctionCall(FunctionCall),

    /// Any other function call
    FunctionCall(FunctionCall),

    /// A shape produced by a newer parser
    #[serde(other)]
    Unrecognized,
}

/// `identifier[predicate]/object/path`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdentifiedPath {
    pub identifier: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub predicate: Option<PathPredicate>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<ObjectPath>,
}

impl IdentifiedPath {
    pub fn new(identifier: impl Into<String>, path: Option<ObjectPath>) -> Self {
        Self {
            identifier: identifier.into(),
            predicate: None,
            path,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionCall {
    pub name: String,

    #[serde(default)]
    pub args: Vec<SelectValue>,
}

/// Literal value in a query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Primitive {
    Null,
    Boolean(bool),
    Integer(i64),
    Real(f64),
    String(String),
    /// `$name`, bound at execution time
    Parameter(String),
}

// ============================================
// Paths
// ============================================

/// Sequence of `/`-separated segments
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ObjectPath {
    pub segments: Vec<PathSegment>,
}

impl ObjectPath {
    pub fn new(segments: Vec<PathSegment>) -> Self {
        Self { segments }
    }

    /// Build a path from plain attribute names.
    pub fn from_identifiers<I, S>(identifiers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            segments: identifiers.into_iter().map(PathSegment::new).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathSegment {
    pub identifier: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub predicate: Option<PathPredicate>,
}

impl PathSegment {
    pub fn new(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            predicate: None,
        }
    }

    /// `identifier[code]`
    pub fn with_code(identifier: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            predicate: Some(PathPredicate::Node(NodePredicate { code: code.into() })),
        }
    }

    /// The archetype code of a node predicate, if the segment carries one.
    pub fn archetype_code(&self) -> Option<&str> {
        match &self.predicate {
            Some(PathPredicate::Node(node)) => Some(node.code.as_str()),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PathPredicate {
    /// `[at0001]` or `[openEHR-EHR-OBSERVATION.x.v1]`
    Node(NodePredicate),

    /// `[path operator operand]`
    Standard(StandardPredicate),
}

/// Match the child whose archetype node id equals `code`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodePredicate {
    pub code: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardPredicate {
    pub path: ObjectPath,

    pub operator: ComparisonOperator,

    pub operand: Primitive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ComparisonOperator {
    #[serde(rename = "=")]
    Equal,
    #[serde(rename = "!=")]
    NotEqual,
    #[serde(rename = "<")]
    Less,
    #[serde(rename = "<=")]
    LessOrEqual,
    #[serde(rename = ">")]
    Greater,
    #[serde(rename = ">=")]
    GreaterOrEqual,
    #[serde(rename = "matches")]
    Matches,
}

// ============================================
// FROM
// ============================================

/// `FROM operand [CONTAINS ...] [AND|OR ...]`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FromClause {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operand: Option<FromOperand>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub contains: Vec<FromClause>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operator: Option<BooleanOperator>,
}

impl FromClause {
    /// `FROM class_name [alias]`
    pub fn class(class_name: impl Into<String>, alias: Option<&str>) -> Self {
        Self {
            operand: Some(FromOperand::Class(ClassExpression {
                class_name: class_name.into(),
                alias: alias.map(str::to_string),
                predicate: None,
            })),
            contains: Vec::new(),
            operator: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FromOperand {
    Class(ClassExpression),
    VersionClass(VersionClassExpression),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassExpression {
    pub class_name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub predicate: Option<PathPredicate>,
}

/// `VERSION v[LATEST_VERSION]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VersionClassExpression {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub predicate: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum BooleanOperator {
    And,
    Or,
}

// ============================================
// WHERE / ORDER BY
// ============================================

/// Condition of a WHERE clause, kept as the parser emitted it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WhereClause(pub serde_json::Value);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderByExpr {
    pub path: IdentifiedPath,

    #[serde(default)]
    pub direction: OrderDirection,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderDirection {
    #[default]
    Asc,
    Desc,
}

// ============================================
// Display (AQL surface syntax)
// ============================================

impl fmt::Display for PathPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathPredicate::Node(node) => write!(f, "[{}]", node.code),
            PathPredicate::Standard(standard) => write!(
                f,
                "[{} {} {}]",
                standard.path, standard.operator, standard.operand
            ),
        }
    }
}

impl fmt::Display for ComparisonOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let op = match self {
            ComparisonOperator::Equal => "=",
            ComparisonOperator::NotEqual => "!=",
            ComparisonOperator::Less => "<",
            ComparisonOperator::LessOrEqual => "<=",
            ComparisonOperator::Greater => ">",
            ComparisonOperator::GreaterOrEqual => ">=",
            ComparisonOperator::Matches => "matches",
        };
        f.write_str(op)
    }
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.identifier)?;
        if let Some(predicate) = &self.predicate {
            write!(f, "{predicate}")?;
        }
        Ok(())
    }
}

impl fmt::Display for ObjectPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                f.write_str("/")?;
            }
            write!(f, "{segment}")?;
        }
        Ok(())
    }
}

impl fmt::Display for IdentifiedPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.identifier)?;
        if let Some(predicate) = &self.predicate {
            write!(f, "{predicate}")?;
        }
        if let Some(path) = &self.path {
            write!(f, "/{path}")?;
        }
        Ok(())
    }
}

impl fmt::Display for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Primitive::Null => f.write_str("NULL"),
            Primitive::Boolean(b) => write!(f, "{b}"),
            Primitive::Integer(i) => write!(f, "{i}"),
            Primitive::Real(r) => write!(f, "{r}"),
            Primitive::String(s) => write!(f, "'{s}'"),
            Primitive::Parameter(name) => write!(f, "${name}"),
        }
    }
}

impl fmt::Display for FunctionCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.name)?;
        for (i, arg) in self.args.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{arg}")?;
        }
        f.write_str(")")
    }
}

impl fmt::Display for SelectValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectValue::IdentifiedPath(path) => write!(f, "{path}"),
            SelectValue::Primitive { value } => write!(f, "{value}"),
            SelectValue::AggregateFunctionCall(call) | SelectValue::FunctionCall(call) => {
                write!(f, "{call}")
            }
            SelectValue::Unrecognized => f.write_str("<unrecognized>"),
        }
    }
}

impl Primitive {
    /// Literal value, without parameter binding.
    pub fn literal(&self) -> Option<Value> {
        match self {
            Primitive::Null => Some(Value::Null),
            Primitive::Boolean(b) => Some(Value::Boolean(*b)),
            Primitive::Integer(i) => Some(Value::Integer(*i)),
            Primitive::Real(r) => Some(Value::Real(*r)),
            Primitive::String(s) => Some(Value::String(s.clone())),
            Primitive::Parameter(_) => None,
        }
    }
}
