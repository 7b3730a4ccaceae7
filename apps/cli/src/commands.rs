//! Subcommand implementations

use crate::config::Config;
use crate::loader;
use crate::request::QueryRequest;
use anyhow::Context as _;
use ipehr_aql::{ExecuteOptions, Executor, Node, ResultSet, ToNode};
use ipehr_models::Document;
use std::path::Path;
use std::time::Duration;

/// Command-line overrides for a query run
#[derive(Debug, Clone, Default)]
pub struct QueryOverrides {
    pub fetch: Option<usize>,
    pub offset: Option<usize>,
    pub timeout_ms: Option<u64>,
}

/// Execute `request` over the documents under `documents`.
///
/// Flags override the request, which overrides the configuration.
pub fn run_query(
    config: &Config,
    documents: &Path,
    request: &QueryRequest,
    overrides: &QueryOverrides,
) -> anyhow::Result<ResultSet> {
    let index = loader::load_index(documents)?;

    let options = ExecuteOptions {
        fetch: overrides
            .fetch
            .or(request.fetch)
            .or(config.query.fetch),
        offset: overrides.offset.or(request.offset).unwrap_or(0),
    };
    let timeout = overrides
        .timeout_ms
        .or(config.query.timeout_ms)
        .map(Duration::from_millis);
    let ctx = request.context(timeout);

    let table = Executor::new(index)
        .with_options(options)
        .execute(&request.query, &ctx)
        .context("Query execution failed")?;

    tracing::info!(
        columns = table.columns.len(),
        rows = table.rows.len(),
        "Query finished"
    );
    Ok(table.into_result_set(request.q.clone()))
}

/// Generic tree of a single document file.
pub fn document_tree(path: &Path) -> anyhow::Result<Node> {
    let node = match loader::read_document(path)? {
        Document::Ehr(ehr) => ehr.to_node(),
        Document::EhrStatus(status) => status.to_node(),
        Document::Composition(composition) => composition.to_node(),
    };
    Ok(node)
}
