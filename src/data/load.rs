use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};

use super::record::{Dataset, Record, Value};

pub fn load_dataset(path: &Path) -> Result<Dataset> {
    let file =
        File::open(path).with_context(|| format!("failed to open dataset {}", path.display()))?;
    let dataset = read_dataset(file)
        .with_context(|| format!("failed to parse dataset {}", path.display()))?;
    log::debug!(
        "loaded dataset {}: {} records, {} columns",
        path.display(),
        dataset.len(),
        dataset.columns().len()
    );
    Ok(dataset)
}

pub(super) fn read_dataset<R: Read>(reader: R) -> Result<Dataset> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let columns = csv_reader
        .headers()
        .context("missing header row")?
        .iter()
        .map(str::to_owned)
        .collect::<Vec<_>>();

    let mut records = Vec::new();
    for (index, row) in csv_reader.records().enumerate() {
        let row = row.with_context(|| format!("malformed row {}", index + 2))?;

        let mut fields = HashMap::new();
        for (name, cell) in columns.iter().zip(row.iter()) {
            if cell.is_empty() {
                continue;
            }
            fields.insert(name.clone(), infer_value(cell));
        }

        records.push(Record::new(index, fields));
    }

    Ok(Dataset::new(columns, records))
}

fn infer_value(cell: &str) -> Value {
    match cell.parse::<f64>() {
        Ok(number) if number.is_finite() => Value::Number(number),
        _ => Value::Text(cell.to_owned()),
    }
}
