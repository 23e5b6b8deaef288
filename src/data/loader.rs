use std::path::Path;

use arrow::array::{Array, ArrayRef, AsArray};
use arrow::datatypes::{DataType, Float32Type, Float64Type, Int32Type, Int64Type};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::{CellValue, Dataset, Metric, Series, LABEL_COLUMN};
use crate::error::{DataVisError, Result};

/// A raw column as read from any source format, before validation.
type RawColumn = (String, Vec<CellValue>);

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – one header row: `Month,Sales,Expenses,Profit,Customers[,...]`
/// * `.json`    – `[{ "Month": "Jan", "Sales": 100, ... }, ...]`
/// * `.parquet` – one scalar column per field
///
/// Every format goes through the same validation: the `Month` label column
/// and all [`Metric`] columns must exist, and every metric cell must be numeric.
pub fn load_file(path: &Path) -> Result<Dataset> {
    if !path.exists() {
        return Err(DataVisError::FileNotFound(path.to_path_buf()));
    }

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let columns = match ext.as_str() {
        "csv" => read_csv(path)?,
        "json" => read_json(path)?,
        "parquet" | "pq" => read_parquet(path)?,
        other => return Err(DataVisError::UnsupportedFormat(other.to_string())),
    };

    let dataset = build_dataset(path, columns)?;
    log::info!(
        "Loaded {} rows with columns {:?} from {}",
        dataset.len(),
        dataset.column_names,
        path.display()
    );
    Ok(dataset)
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn build_dataset(path: &Path, columns: Vec<RawColumn>) -> Result<Dataset> {
    let required = std::iter::once(LABEL_COLUMN).chain(Metric::ALL.iter().map(|m| m.column()));
    for name in required {
        if !columns.iter().any(|(col, _)| col == name) {
            return Err(DataVisError::MissingColumn {
                column: name.to_string(),
            });
        }
    }

    let column_names: Vec<String> = columns.iter().map(|(name, _)| name.clone()).collect();
    let mut labels = Vec::new();
    let mut numeric = Vec::new();

    for (name, cells) in columns {
        if name == LABEL_COLUMN {
            labels = cells
                .iter()
                .map(|c| match c {
                    CellValue::Null => String::new(),
                    other => other.to_string(),
                })
                .collect();
            continue;
        }

        if Metric::from_column(&name).is_some() {
            let values = cells
                .iter()
                .enumerate()
                .map(|(row, cell)| {
                    cell.as_f64().ok_or_else(|| DataVisError::Parse {
                        row: row + 1,
                        column: name.clone(),
                        value: match cell {
                            CellValue::Null => String::new(),
                            other => other.to_string(),
                        },
                    })
                })
                .collect::<Result<Vec<f64>>>()?;
            numeric.push(Series::new(name, values));
        } else if let Some(values) = cells.iter().map(CellValue::as_f64).collect::<Option<Vec<f64>>>() {
            numeric.push(Series::new(name, values));
        } else {
            log::debug!("Ignoring non-numeric column '{name}'");
        }
    }

    Ok(Dataset {
        source: path.to_path_buf(),
        column_names,
        labels,
        numeric,
    })
}

// ---------------------------------------------------------------------------
// CSV reader
// ---------------------------------------------------------------------------

fn read_csv(path: &Path) -> Result<Vec<RawColumn>> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut columns: Vec<RawColumn> = reader
        .headers()?
        .iter()
        .map(|h| (h.trim().to_string(), Vec::new()))
        .collect();

    for result in reader.records() {
        let record = result?;
        for (col_idx, (_, cells)) in columns.iter_mut().enumerate() {
            cells.push(CellValue::infer(record.get(col_idx).unwrap_or("")));
        }
    }

    Ok(columns)
}

// ---------------------------------------------------------------------------
// JSON reader
// ---------------------------------------------------------------------------

/// Records-oriented JSON, the default `df.to_json(orient='records')`.
/// Required columns come first in their canonical order, extra keys follow
/// in the order they are first seen.
fn read_json(path: &Path) -> Result<Vec<RawColumn>> {
    let text = std::fs::read_to_string(path)?;
    let root: JsonValue = serde_json::from_str(&text)?;

    let records = root
        .as_array()
        .ok_or_else(|| DataVisError::Malformed("expected a top-level JSON array".into()))?;

    let mut names: Vec<String> = std::iter::once(LABEL_COLUMN)
        .chain(Metric::ALL.iter().map(|m| m.column()))
        .map(str::to_string)
        .collect();
    for rec in records {
        if let Some(obj) = rec.as_object() {
            for key in obj.keys() {
                if !names.contains(key) {
                    names.push(key.clone());
                }
            }
        }
    }

    // Only keep required names that actually occur so validation reports them.
    names.retain(|name| records.iter().any(|r| r.get(name).is_some()));

    let mut columns: Vec<RawColumn> = names.into_iter().map(|n| (n, Vec::new())).collect();
    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .ok_or_else(|| DataVisError::Malformed(format!("record {} is not a JSON object", i + 1)))?;
        for (name, cells) in &mut columns {
            cells.push(obj.get(name).map(json_to_cell).unwrap_or(CellValue::Null));
        }
    }

    Ok(columns)
}

fn json_to_cell(val: &JsonValue) -> CellValue {
    match val {
        JsonValue::String(s) => CellValue::Text(s.clone()),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                CellValue::Integer(i)
            } else if let Some(f) = n.as_f64() {
                CellValue::Float(f)
            } else {
                CellValue::Text(n.to_string())
            }
        }
        JsonValue::Null => CellValue::Null,
        other => CellValue::Text(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet reader
// ---------------------------------------------------------------------------

/// Works with files written by both Pandas (`df.to_parquet()`) and Polars.
fn read_parquet(path: &Path) -> Result<Vec<RawColumn>> {
    let file = std::fs::File::open(path)?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)?;
    let mut columns: Vec<RawColumn> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| (f.name().clone(), Vec::new()))
        .collect();
    let reader = builder.build()?;

    for batch_result in reader {
        let batch = batch_result?;
        for (col_idx, (_, cells)) in columns.iter_mut().enumerate() {
            let array = batch.column(col_idx);
            cells.extend((0..batch.num_rows()).map(|row| arrow_cell(array, row)));
        }
    }

    Ok(columns)
}

/// Extract a single cell from an Arrow column at a given row.
fn arrow_cell(col: &ArrayRef, row: usize) -> CellValue {
    if col.is_null(row) {
        return CellValue::Null;
    }
    let cell = match col.data_type() {
        DataType::Utf8 => col
            .as_string_opt::<i32>()
            .map(|a| CellValue::Text(a.value(row).to_string())),
        DataType::LargeUtf8 => col
            .as_string_opt::<i64>()
            .map(|a| CellValue::Text(a.value(row).to_string())),
        DataType::Int32 => col
            .as_primitive_opt::<Int32Type>()
            .map(|a| CellValue::Integer(a.value(row) as i64)),
        DataType::Int64 => col
            .as_primitive_opt::<Int64Type>()
            .map(|a| CellValue::Integer(a.value(row))),
        DataType::Float32 => col
            .as_primitive_opt::<Float32Type>()
            .map(|a| CellValue::Float(a.value(row) as f64)),
        DataType::Float64 => col
            .as_primitive_opt::<Float64Type>()
            .map(|a| CellValue::Float(a.value(row))),
        DataType::Boolean => col
            .as_boolean_opt()
            .map(|a| CellValue::Text(a.value(row).to_string())),
        other => Some(CellValue::Text(format!("{other:?}"))),
    };
    cell.unwrap_or(CellValue::Null)
}
