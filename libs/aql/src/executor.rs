//! Query executor
//!
//! Interprets a parsed query: FROM binds data sources obtained from a
//! [`DataSourceResolver`], SELECT projects each expression into result rows.
//!
//! Constructs outside the supported subset fail with [`Error::Unsupported`] instead of
//! producing a partial result.

use crate::ast::{
    ClassExpression, FromClause, FromOperand, IdentifiedPath, PathPredicate, Primitive, Query,
    SelectClause, SelectValue,
};
use crate::context::Context;
use crate::error::{Error, Result};
use crate::path;
use crate::resolver::{Container, DataSourceResolver};
use crate::result::{Column, ResultTable, Row};
use crate::value::Value;
use indexmap::IndexMap;

#[derive(Clone, Debug, Default)]
pub struct ExecuteOptions {
    /// Maximum number of rows returned, after `offset`
    pub fetch: Option<usize>,
    /// Number of leading rows skipped
    pub offset: usize,
}

/// A FROM source bound for the duration of one execution
#[derive(Debug, Clone)]
pub struct DataSource {
    /// Class name, e.g. `EHR`
    pub name: String,
    pub alias: Option<String>,
    pub data: Container,
}

impl DataSource {
    /// Identifier SELECT paths use to reach this source: the alias, else the class name.
    pub fn binding(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.name)
    }
}

/// Bound sources by binding identifier, in FROM order
pub type DataSources = IndexMap<String, DataSource>;

/// Query executor over a data source resolver
pub struct Executor<R> {
    resolver: R,
    options: ExecuteOptions,
}

impl<R: DataSourceResolver> Executor<R> {
    pub fn new(resolver: R) -> Self {
        Self {
            resolver,
            options: ExecuteOptions::default(),
        }
    }

    pub fn with_options(mut self, options: ExecuteOptions) -> Self {
        self.options = options;
        self
    }

    pub fn resolver(&self) -> &R {
        &self.resolver
    }

    /// Execute a query.
    ///
    /// Rows follow source order, then match order within each SELECT expression. Literal
    /// SELECT values are collected into a single row appended after all path rows.
    #[tracing::instrument(
        name = "aql.execute",
        skip_all,
        fields(exprs = query.select.exprs.len())
    )]
    pub fn execute(&self, query: &Query, ctx: &Context) -> Result<ResultTable> {
        check_clauses(query)?;

        let sources = self.bind_sources(&query.from, ctx)?;
        let table = project(&query.select, &sources, ctx)?;

        ctx.check("returning result")?;
        tracing::debug!(
            columns = table.columns.len(),
            rows = table.rows.len(),
            "query executed"
        );
        Ok(table.paginate(self.options.offset, self.options.fetch))
    }

    /// Resolve the FROM clause into bound data sources.
    pub fn bind_sources(&self, from: &FromClause, ctx: &Context) -> Result<DataSources> {
        if !from.contains.is_empty() || from.operator.is_some() {
            return Err(Error::Unsupported(
                "CONTAINS and boolean operators in FROM".into(),
            ));
        }

        let mut sources = DataSources::new();
        match &from.operand {
            None => {}
            Some(FromOperand::VersionClass(_)) => {
                return Err(Error::Unsupported("VERSION class expression in FROM".into()));
            }
            Some(FromOperand::Class(class)) => {
                let source = self.resolve_class(class, ctx)?;
                bind(&mut sources, source)?;
            }
        }
        Ok(sources)
    }

    fn resolve_class(&self, class: &ClassExpression, ctx: &Context) -> Result<DataSource> {
        if let Some(predicate) = &class.predicate {
            return Err(Error::Unsupported(format!(
                "path predicate {predicate} on {} in FROM",
                class.class_name
            )));
        }

        let stage = format!("resolving data source {}", class.class_name);
        ctx.check(&stage)?;
        let data = self
            .resolver
            .resolve(&class.class_name)
            .map_err(|source| Error::SourceResolution {
                class_name: class.class_name.clone(),
                source,
            })?;
        ctx.check(&stage)?;

        tracing::debug!(
            class_name = %class.class_name,
            alias = class.alias.as_deref(),
            nodes = data.len(),
            "bound data source"
        );
        Ok(DataSource {
            name: class.class_name.clone(),
            alias: class.alias.clone(),
            data,
        })
    }
}

fn check_clauses(query: &Query) -> Result<()> {
    if query.select.distinct {
        return Err(Error::Unsupported("DISTINCT".into()));
    }
    if !query.order_by.is_empty() {
        return Err(Error::Unsupported("ORDER BY".into()));
    }
    if query.where_clause.is_some() {
        return Err(Error::Unsupported("WHERE".into()));
    }
    Ok(())
}

fn bind(sources: &mut DataSources, source: DataSource) -> Result<()> {
    let binding = source.binding().to_string();
    if sources.contains_key(&binding) {
        return Err(Error::DuplicateBinding(binding));
    }
    sources.insert(binding, source);
    Ok(())
}

fn project(select: &SelectClause, sources: &DataSources, ctx: &Context) -> Result<ResultTable> {
    let mut rows = Vec::new();
    let mut literals = Vec::new();

    for (index, expr) in select.exprs.iter().enumerate() {
        tracing::debug!(index, expr = %expr.value, "evaluating SELECT expression");
        match &expr.value {
            SelectValue::IdentifiedPath(path) => {
                let source =
                    sources
                        .get(&path.identifier)
                        .ok_or_else(|| Error::UnknownIdentifier {
                            identifier: path.identifier.clone(),
                            index,
                        })?;
                rows.extend(evaluate_path(path, source, index)?);
            }
            SelectValue::Primitive { value } => literals.push(resolve_primitive(value, ctx)?),
            SelectValue::AggregateFunctionCall(call) => {
                return Err(Error::Unsupported(format!(
                    "aggregate function {} in SELECT expression #{index}",
                    call.name
                )));
            }
            SelectValue::FunctionCall(call) => {
                return Err(Error::Unsupported(format!(
                    "function {} in SELECT expression #{index}",
                    call.name
                )));
            }
            SelectValue::Unrecognized => return Err(Error::UnexpectedExpression { index }),
        }
    }

    // Literals share one trailing row rather than repeating on every path row.
    if !literals.is_empty() {
        rows.push(Row::new(literals));
    }

    let columns = select
        .exprs
        .iter()
        .map(|expr| Column {
            name: expr.column_name(),
            path: match &expr.value {
                SelectValue::IdentifiedPath(path) => Some(path.to_string()),
                _ => None,
            },
        })
        .collect();

    Ok(ResultTable { columns, rows })
}

fn evaluate_path(path: &IdentifiedPath, source: &DataSource, index: usize) -> Result<Vec<Row>> {
    if let Some(predicate) = &path.predicate {
        return Err(Error::Unsupported(format!(
            "predicate {predicate} on {} in SELECT expression #{index}",
            path.identifier
        )));
    }

    let Some(object_path) = &path.path else {
        // A bare identifier selects whole documents.
        return source
            .data
            .nodes()
            .map(|node| {
                serde_json::to_value(node.as_ref())
                    .map(|json| Row::new(vec![Value::Json(json)]))
                    .map_err(|e| Error::Serialization(e.to_string()))
            })
            .collect();
    };

    if let Some(segment) = object_path
        .segments
        .iter()
        .find(|segment| matches!(segment.predicate, Some(PathPredicate::Standard(_))))
    {
        return Err(Error::Unsupported(format!(
            "comparison predicate in path segment {segment} of SELECT expression #{index}"
        )));
    }

    Ok(path::evaluate_all(object_path, source.data.nodes())
        .into_iter()
        .map(|value| Row::new(vec![value]))
        .collect())
}

fn resolve_primitive(primitive: &Primitive, ctx: &Context) -> Result<Value> {
    match primitive {
        Primitive::Parameter(name) => ctx
            .get_parameter(name)
            .cloned()
            .ok_or_else(|| Error::UnknownParameter(name.trim_start_matches('$').to_string())),
        other => Ok(other.literal().unwrap_or(Value::Null)),
    }
}
