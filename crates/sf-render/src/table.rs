//! Bound-table data binding.
//!
//! A `table` component pulls rows from an external data source by table
//! name. The binding is an explicit state machine the host drives:
//!
//! ```text
//! Unbound → Loading → Loaded(rows, headers)
//!                   ↘ Error(message, last-known rows)
//! ```
//!
//! Loading re-enters whenever the bound source name changes, an explicit
//! refresh notification for that exact source arrives, or the sort
//! configuration changes. Header auto-detection happens only on the
//! transition into Loaded when no headers were configured; once set,
//! headers persist even if the row shape drifts — cell lookup falls back
//! to a case-insensitive key match, then blank.

use async_trait::async_trait;
use serde_json::{Map, Value};
use sf_core::model::{ComponentNode, DataOperation};
use tokio::sync::broadcast;

/// One record from a bound table.
pub type Row = Map<String, Value>;

/// Query shaping options passed to the data source.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct QueryOptions {
    pub order_by: Option<String>,
    pub ascending: bool,
}

/// External data source for bound components, addressed by table name.
/// Implementations wrap either the global default connection or a
/// per-project override connection.
#[async_trait]
pub trait DataSource: Send + Sync {
    async fn query(&self, table: &str, options: &QueryOptions) -> Result<Vec<Row>, String>;

    async fn mutate(&self, table: &str, operation: DataOperation, record: Value)
    -> Result<(), String>;
}

// ─── Change notifications ────────────────────────────────────────────────

/// Broadcast payload: rows of `table` changed somewhere.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataChanged {
    pub table: String,
}

/// Typed broadcast hub for "data changed" notifications. Every
/// collaborator that writes to a bound table must notify here so bound
/// components re-fetch.
#[derive(Debug, Clone)]
pub struct DataEvents {
    sender: broadcast::Sender<DataChanged>,
}

impl DataEvents {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(32);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<DataChanged> {
        self.sender.subscribe()
    }

    pub fn notify(&self, table: &str) {
        // Send fails only when nobody is subscribed, which is fine.
        let _ = self.sender.send(DataChanged {
            table: table.to_string(),
        });
    }
}

impl Default for DataEvents {
    fn default() -> Self {
        Self::new()
    }
}

/// Perform a remote-data mutation and emit the change notification.
pub async fn mutate_and_notify(
    source: &dyn DataSource,
    events: &DataEvents,
    table: &str,
    operation: DataOperation,
    record: Value,
) -> Result<(), String> {
    source.mutate(table, operation, record).await?;
    events.notify(table);
    Ok(())
}

// ─── Binding state machine ───────────────────────────────────────────────

/// Sort configuration for a bound table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortConfig {
    pub column: String,
    pub ascending: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TableState {
    Unbound,
    Loading,
    Loaded {
        rows: Vec<Row>,
    },
    Error {
        message: String,
        /// Last-known rows, kept so a transient failure doesn't blank
        /// the component.
        rows: Vec<Row>,
    },
}

/// Binding state for one `table` component.
#[derive(Debug, Clone)]
pub struct TableBinding {
    source: Option<String>,
    sort: Option<SortConfig>,
    headers: Vec<String>,
    /// True when headers came from explicit configuration rather than
    /// auto-detection.
    headers_configured: bool,
    state: TableState,
}

impl TableBinding {
    pub fn new() -> Self {
        Self {
            source: None,
            sort: None,
            headers: Vec::new(),
            headers_configured: false,
            state: TableState::Unbound,
        }
    }

    /// Build a binding from a table component's props:
    /// `table` (source name), `headers` (optional column list),
    /// `orderBy` / `ascending` (optional sort).
    pub fn from_node(node: &ComponentNode) -> Self {
        let mut binding = Self::new();

        if let Some(Value::Array(headers)) = node.props.get("headers") {
            binding.headers = headers
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect();
            binding.headers_configured = !binding.headers.is_empty();
        }

        if let Some(order_by) = node.prop_str("orderBy") {
            binding.sort = Some(SortConfig {
                column: order_by.to_string(),
                ascending: node
                    .props
                    .get("ascending")
                    .and_then(Value::as_bool)
                    .unwrap_or(true),
            });
        }

        binding.bind(node.prop_str("table").map(str::to_string));
        binding
    }

    pub fn state(&self) -> &TableState {
        &self.state
    }

    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Row] {
        match &self.state {
            TableState::Loaded { rows } | TableState::Error { rows, .. } => rows,
            _ => &[],
        }
    }

    /// Change the bound source. A real change re-enters Loading; binding
    /// to `None` resets to Unbound.
    pub fn bind(&mut self, source: Option<String>) {
        if self.source == source {
            return;
        }
        self.source = source;
        self.state = match self.source {
            Some(_) => TableState::Loading,
            None => TableState::Unbound,
        };
    }

    /// Change the sort configuration; re-enters Loading when bound.
    pub fn set_sort(&mut self, sort: Option<SortConfig>) {
        if self.sort == sort {
            return;
        }
        self.sort = sort;
        if self.source.is_some() {
            self.state = TableState::Loading;
        }
    }

    /// A "data changed" notification arrived. Only an exact source-name
    /// match triggers a re-fetch.
    pub fn notify_data_changed(&mut self, table: &str) {
        if self.source.as_deref() == Some(table) {
            self.state = TableState::Loading;
        }
    }

    /// What to fetch, when in Loading.
    pub fn pending_fetch(&self) -> Option<(&str, QueryOptions)> {
        if !matches!(self.state, TableState::Loading) {
            return None;
        }
        let source = self.source.as_deref()?;
        let options = match &self.sort {
            Some(sort) => QueryOptions {
                order_by: Some(sort.column.clone()),
                ascending: sort.ascending,
            },
            None => QueryOptions::default(),
        };
        Some((source, options))
    }

    /// Fetch succeeded. Auto-detect headers from the first row only if
    /// none were ever configured or detected before.
    pub fn resolve_rows(&mut self, rows: Vec<Row>) {
        if self.headers.is_empty()
            && !self.headers_configured
            && let Some(first) = rows.first()
        {
            self.headers = first.keys().cloned().collect();
        }
        self.state = TableState::Loaded { rows };
    }

    /// Fetch failed. Keep whatever rows were last known.
    pub fn resolve_error(&mut self, message: String) {
        let rows = self.rows().to_vec();
        log::warn!(
            "table fetch failed for {:?}: {message}",
            self.source.as_deref().unwrap_or("<unbound>")
        );
        self.state = TableState::Error { message, rows };
    }

    /// Cell lookup: exact key, then case-insensitive key, then blank.
    pub fn cell(&self, row: &Row, header: &str) -> String {
        let value = row.get(header).or_else(|| {
            row.iter()
                .find(|(k, _)| k.eq_ignore_ascii_case(header))
                .map(|(_, v)| v)
        });
        match value {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
        }
    }

    /// Run the pending fetch against a data source and apply the result.
    pub async fn refresh(&mut self, source: &dyn DataSource) {
        let Some((table, options)) = self.pending_fetch() else {
            return;
        };
        let table = table.to_string();
        match source.query(&table, &options).await {
            Ok(rows) => self.resolve_rows(rows),
            Err(message) => self.resolve_error(message),
        }
    }
}

impl Default for TableBinding {
    fn default() -> Self {
        Self::new()
    }
}
