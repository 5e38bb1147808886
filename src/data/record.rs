use std::collections::HashMap;

/// One typed cell of the dataset. Cells that parse as a finite float become
/// numbers, everything else stays text. Empty cells are absent entirely.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Number(f64),
    Text(String),
}

impl Value {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(value) => Some(*value),
            Self::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Number(_) => None,
            Self::Text(text) => Some(text),
        }
    }

    pub fn display(&self) -> String {
        match self {
            Self::Number(value) => {
                if value.fract() == 0.0 && value.abs() < 1e15 {
                    format!("{}", *value as i64)
                } else {
                    format!("{value}")
                }
            }
            Self::Text(text) => text.clone(),
        }
    }
}

/// One row of the dataset. `index` is the zero-based data-row position
/// injected at load time; it is the identity used for selection matching,
/// grouping, and keyed rendering. Immutable after load.
#[derive(Clone, Debug)]
pub struct Record {
    pub index: usize,
    fields: HashMap<String, Value>,
}

impl Record {
    pub fn new(index: usize, fields: HashMap<String, Value>) -> Self {
        Self { index, fields }
    }

    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    pub fn numeric(&self, name: &str) -> Option<f64> {
        self.fields.get(name).and_then(Value::as_number)
    }

    pub fn text(&self, name: &str) -> Option<&str> {
        self.fields.get(name).and_then(Value::as_text)
    }
}

/// The immutable record collection. Created on successful load, replaced
/// wholesale on reload, empty before a load completes. All other components
/// get read access only.
#[derive(Clone, Debug, Default)]
pub struct Dataset {
    columns: Vec<String>,
    records: Vec<Record>,
}

impl Dataset {
    pub fn new(columns: Vec<String>, records: Vec<Record>) -> Self {
        Self { columns, records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn record(&self, index: usize) -> Option<&Record> {
        self.records.get(index)
    }

    /// Columns for which at least one record holds a numeric value.
    pub fn numeric_columns(&self) -> Vec<String> {
        self.columns_matching(|record, name| record.numeric(name).is_some())
    }

    /// Columns for which at least one record holds a text value.
    pub fn text_columns(&self) -> Vec<String> {
        self.columns_matching(|record, name| record.text(name).is_some())
    }

    fn columns_matching(&self, keep: impl Fn(&Record, &str) -> bool) -> Vec<String> {
        self.columns
            .iter()
            .filter(|name| self.records.iter().any(|record| keep(record, name)))
            .cloned()
            .collect()
    }
}
