//! In-memory source and destination fakes shared by the integration
//! tests. They implement the same traits the real drivers do, so the
//! engine cannot tell them apart.

#![allow(dead_code)]

use larder::{
    async_trait,
    doc::{Document, DocumentStream, Value},
    driver::{Connection, Driver, Operation, Response, Source},
    Error, Result,
};

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

/// Builds a document from field/value pairs.
pub fn doc<V: Into<Value> + Clone>(fields: &[(&str, V)]) -> Document {
    fields
        .iter()
        .map(|(name, value)| (name.to_string(), value.clone().into()))
        .collect()
}

/// A document source backed by plain vectors.
#[derive(Debug, Default)]
pub struct MemorySource {
    collections: HashMap<String, Vec<Document>>,
    connected: bool,
    fail_connect: bool,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_collection(mut self, name: &str, documents: Vec<Document>) -> Self {
        self.collections.insert(name.to_string(), documents);
        self
    }

    pub fn failing_to_connect() -> Self {
        Self {
            fail_connect: true,
            ..Self::default()
        }
    }

    pub fn set_collection(&mut self, name: &str, documents: Vec<Document>) {
        self.collections.insert(name.to_string(), documents);
    }
}

#[async_trait]
impl Source for MemorySource {
    async fn connect(&mut self) -> Result<()> {
        if self.fail_connect {
            return Err(Error::connection("memory source refused connection"));
        }
        self.connected = true;
        Ok(())
    }

    async fn fetch(&self, collection: &str) -> Result<DocumentStream> {
        if !self.connected {
            return Err(Error::connection("memory source is not connected"));
        }
        let documents = self.collections.get(collection).cloned().unwrap_or_default();
        Ok(DocumentStream::from_vec(documents))
    }
}

/// One destination relation held in memory.
#[derive(Debug, Default)]
pub struct MemoryTable {
    pub columns: Vec<String>,
    pub unique: Option<String>,
    /// (referencing column, referenced table, referenced column)
    pub foreign_keys: Vec<(String, String, String)>,
    pub rows: Vec<HashMap<String, Value>>,
}

/// Shared state of the in-memory destination.
#[derive(Debug, Default)]
pub struct MemoryState {
    pub tables: HashMap<String, MemoryTable>,
    /// Relation names in creation order.
    pub created: Vec<String>,
    /// Raw statements executed by migration bodies.
    pub sql: Vec<String>,
}

impl MemoryState {
    pub fn rows(&self, table: &str) -> Vec<HashMap<String, Value>> {
        self.tables
            .get(table)
            .map(|table| table.rows.clone())
            .unwrap_or_default()
    }
}

/// An in-memory destination. Every connection shares the same state.
#[derive(Debug, Default)]
pub struct MemoryDriver {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryDriver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> Arc<Mutex<MemoryState>> {
        self.state.clone()
    }
}

#[async_trait]
impl Driver for MemoryDriver {
    async fn connect(&self) -> Result<Box<dyn Connection>> {
        Ok(Box::new(MemoryConnection {
            state: self.state.clone(),
        }))
    }
}

#[derive(Debug)]
struct MemoryConnection {
    state: Arc<Mutex<MemoryState>>,
}

#[async_trait]
impl Connection for MemoryConnection {
    async fn exec(&mut self, op: Operation) -> Result<Response> {
        let mut state = self.state.lock().unwrap();

        match op {
            Operation::CreateTable(op) => {
                let name = op.table.name.clone();
                if !state.tables.contains_key(&name) {
                    let table = MemoryTable {
                        columns: op.table.column_names().map(str::to_string).collect(),
                        unique: op.table.unique_column().map(|column| column.name.clone()),
                        foreign_keys: op
                            .table
                            .columns
                            .iter()
                            .filter_map(|column| {
                                column.foreign_key.as_ref().map(|fk| {
                                    (column.name.clone(), fk.table.clone(), fk.column.clone())
                                })
                            })
                            .collect(),
                        rows: Vec::new(),
                    };
                    state.tables.insert(name.clone(), table);
                    state.created.push(name);
                }
                Ok(Response::count(0))
            }
            Operation::Insert(op) => {
                let mut affected = 0;
                for values in &op.rows {
                    let row: HashMap<String, Value> = op
                        .columns
                        .iter()
                        .cloned()
                        .zip(values.iter().cloned())
                        .collect();

                    check_foreign_keys(&state, &op.table.name, &row)?;

                    let table = state
                        .tables
                        .get_mut(&op.table.name)
                        .ok_or_else(|| Error::connection("relation does not exist"))?;

                    match upsert_target(table, op.conflict.as_deref(), &row) {
                        Some(index) => {
                            // overwrite the other columns, keep the key
                            table.rows[index].extend(row);
                        }
                        None => table.rows.push(row),
                    }
                    affected += 1;
                }
                Ok(Response::count(affected))
            }
            Operation::Select(op) => {
                let table = state
                    .tables
                    .get(&op.table.name)
                    .ok_or_else(|| Error::connection("relation does not exist"))?;
                let rows = table
                    .rows
                    .iter()
                    .map(|row| {
                        op.columns
                            .iter()
                            .map(|column| row.get(column).cloned().unwrap_or(Value::Null))
                            .collect()
                    })
                    .collect();
                Ok(Response::rows(rows))
            }
            Operation::Sql(op) => {
                state.sql.push(op.sql);
                Ok(Response::count(0))
            }
        }
    }
}

fn upsert_target(
    table: &MemoryTable,
    conflict: Option<&str>,
    row: &HashMap<String, Value>,
) -> Option<usize> {
    let key = conflict?;
    let value = row.get(key)?;
    if value.is_null() {
        // null keys never conflict
        return None;
    }
    table
        .rows
        .iter()
        .position(|existing| existing.get(key) == Some(value))
}

fn check_foreign_keys(
    state: &MemoryState,
    table: &str,
    row: &HashMap<String, Value>,
) -> Result<()> {
    let Some(mem_table) = state.tables.get(table) else {
        return Ok(());
    };

    for (column, target_table, target_column) in &mem_table.foreign_keys {
        let Some(value) = row.get(column) else {
            continue;
        };
        if value.is_null() {
            continue;
        }
        let satisfied = state
            .tables
            .get(target_table)
            .map(|target| {
                target
                    .rows
                    .iter()
                    .any(|existing| existing.get(target_column) == Some(value))
            })
            .unwrap_or(false);
        if !satisfied {
            return Err(Error::constraint(format!(
                "insert into `{table}` violates foreign key on `{column}`: \
                 no `{target_table}.{target_column}` = {value:?}"
            )));
        }
    }

    Ok(())
}
