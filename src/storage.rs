use crate::app::ports::{Filters, RemoteSinkPort};
use crate::error::{Result, ScraperError};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tracing::debug;

/// In-memory table store with the same contract as the REST backend.
///
/// Used for `--dry-run` and tests. Only `eq.` filters are understood,
/// which is all the pipelines send.
#[derive(Clone, Default)]
pub struct InMemorySink {
    tables: Arc<Mutex<HashMap<String, Vec<Value>>>>,
}

impl InMemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a table with existing rows.
    pub fn with_rows(self, table: &str, rows: Vec<Value>) -> Self {
        if let Ok(mut tables) = self.tables.lock() {
            tables.entry(table.to_string()).or_default().extend(rows);
        }
        self
    }

    /// Snapshot of a table's rows in insertion order.
    pub fn rows(&self, table: &str) -> Vec<Value> {
        self.tables
            .lock()
            .map(|tables| tables.get(table).cloned().unwrap_or_default())
            .unwrap_or_default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, Vec<Value>>>> {
        self.tables.lock().map_err(|_| ScraperError::Api {
            message: "in-memory sink lock poisoned".to_string(),
        })
    }
}

fn cell_matches(cell: Option<&Value>, expected: &str) -> bool {
    match cell {
        Some(Value::String(s)) => s == expected,
        Some(Value::Null) | None => false,
        Some(other) => other.to_string() == expected,
    }
}

fn row_matches(row: &Value, filters: &Filters) -> bool {
    filters.iter().all(|(column, condition)| match condition.strip_prefix("eq.") {
        Some(expected) => cell_matches(row.get(column), expected),
        None => false,
    })
}

fn project(row: &Value, columns: &str) -> Value {
    if columns.trim() == "*" {
        return row.clone();
    }
    let mut out = serde_json::Map::new();
    for column in columns.split(',').map(str::trim) {
        if let Some(v) = row.get(column) {
            out.insert(column.to_string(), v.clone());
        }
    }
    Value::Object(out)
}

#[async_trait]
impl RemoteSinkPort for InMemorySink {
    async fn select(&self, table: &str, filters: &Filters, columns: &str) -> Result<Vec<Value>> {
        let tables = self.lock()?;
        let rows = tables
            .get(table)
            .map(|rows| {
                rows.iter()
                    .filter(|row| row_matches(row, filters))
                    .map(|row| project(row, columns))
                    .collect()
            })
            .unwrap_or_default();
        Ok(rows)
    }

    async fn insert(&self, table: &str, payload: &Value) -> Result<()> {
        let mut tables = self.lock()?;
        let rows = tables.entry(table.to_string()).or_default();
        let mut row = payload.clone();
        if let Value::Object(map) = &mut row {
            map.entry("id").or_insert_with(|| Value::from(rows.len() as u64 + 1));
        }
        debug!("in-memory insert into {}: {}", table, row);
        rows.push(row);
        Ok(())
    }

    async fn update(&self, table: &str, filters: &Filters, payload: &Value) -> Result<()> {
        let mut tables = self.lock()?;
        let Some(rows) = tables.get_mut(table) else {
            return Ok(());
        };
        for row in rows.iter_mut().filter(|row| row_matches(row, filters)) {
            if let (Value::Object(target), Value::Object(changes)) = (&mut *row, payload) {
                for (k, v) in changes {
                    target.insert(k.clone(), v.clone());
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn eq(column: &str, value: &str) -> (String, String) {
        (column.to_string(), format!("eq.{value}"))
    }

    #[tokio::test]
    async fn test_select_filters_by_equality() {
        let sink = InMemorySink::new().with_rows(
            "jobs",
            vec![
                json!({"id": 1, "title": "Motorista", "company": "Sonangol"}),
                json!({"id": 2, "title": "Motorista", "company": "Unitel"}),
            ],
        );

        let rows = sink
            .select("jobs", &vec![eq("title", "Motorista"), eq("company", "Unitel")], "id")
            .await
            .unwrap();
        assert_eq!(rows, vec![json!({"id": 2})]);
    }

    #[tokio::test]
    async fn test_insert_assigns_ids_and_update_patches() {
        let sink = InMemorySink::new();
        sink.insert("exchange_rates", &json!({"currency": "USD", "formal_buy": 1.0}))
            .await
            .unwrap();
        sink.update(
            "exchange_rates",
            &vec![eq("id", "1")],
            &json!({"formal_buy": 912.5}),
        )
        .await
        .unwrap();

        let rows = sink.rows("exchange_rates");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["formal_buy"], json!(912.5));
        assert_eq!(rows[0]["currency"], json!("USD"));
    }
}
