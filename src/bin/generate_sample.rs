use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use serde::Serialize;

const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];
const EXPENSES: [i64; 12] = [70, 74, 80, 83, 90, 94, 99, 105, 108, 115, 120, 124];
const CUSTOMERS: [i64; 12] = [50, 54, 57, 63, 66, 70, 75, 78, 84, 88, 91, 97];

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct Record {
    month: &'static str,
    sales: i64,
    expenses: i64,
    profit: i64,
    customers: i64,
}

/// Twelve months of steadily growing sales starting at 100.
fn records() -> Vec<Record> {
    MONTHS
        .iter()
        .enumerate()
        .map(|(i, &month)| {
            let sales = 100 + 10 * i as i64;
            Record {
                month,
                sales,
                expenses: EXPENSES[i],
                profit: sales - EXPENSES[i],
                customers: CUSTOMERS[i],
            }
        })
        .collect()
}

fn write_csv(path: &Path, records: &[Record]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).context("creating CSV file")?;
    for record in records {
        writer.serialize(record).context("writing CSV row")?;
    }
    writer.flush().context("flushing CSV file")?;
    Ok(())
}

fn write_parquet(path: &Path, records: &[Record]) -> Result<()> {
    let int_column = |f: fn(&Record) -> i64| -> ArrayRef {
        Arc::new(Int64Array::from_iter_values(records.iter().map(f)))
    };
    let months: ArrayRef = Arc::new(StringArray::from_iter_values(records.iter().map(|r| r.month)));

    let schema = Arc::new(Schema::new(vec![
        Field::new("Month", DataType::Utf8, false),
        Field::new("Sales", DataType::Int64, false),
        Field::new("Expenses", DataType::Int64, false),
        Field::new("Profit", DataType::Int64, false),
        Field::new("Customers", DataType::Int64, false),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            months,
            int_column(|r| r.sales),
            int_column(|r| r.expenses),
            int_column(|r| r.profit),
            int_column(|r| r.customers),
        ],
    )
    .context("building record batch")?;

    let file = std::fs::File::create(path).context("creating parquet file")?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing parquet batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();

    let records = records();
    let csv_path = Path::new("sample_data.csv");
    write_csv(csv_path, &records)?;
    println!("Wrote {} rows to {}", records.len(), csv_path.display());

    if std::env::args().skip(1).any(|a| a == "--parquet") {
        let pq_path = Path::new("sample_data.parquet");
        write_parquet(pq_path, &records)?;
        println!("Wrote {} rows to {}", records.len(), pq_path.display());
    }
    Ok(())
}
