use std::fmt;
use std::path::PathBuf;

// ---------------------------------------------------------------------------
// CellValue – a single cell as read from the source file
// ---------------------------------------------------------------------------

/// A dynamically-typed cell value, inferred per cell while loading.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Integer(i64),
    Float(f64),
    Null,
}

impl CellValue {
    /// Infer the most specific type for a raw text cell.
    pub fn infer(s: &str) -> Self {
        let s = s.trim();
        if s.is_empty() {
            return CellValue::Null;
        }
        if let Ok(i) = s.parse::<i64>() {
            return CellValue::Integer(i);
        }
        match s.parse::<f64>() {
            Ok(f) if f.is_finite() => return CellValue::Float(f),
            _ => {}
        }
        CellValue::Text(s.to_string())
    }

    /// Try to interpret the value as a finite `f64`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Float(v) if v.is_finite() => Some(*v),
            CellValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Text(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v}"),
            CellValue::Null => write!(f, "<null>"),
        }
    }
}

// ---------------------------------------------------------------------------
// Metric – the numeric columns every dataset must carry
// ---------------------------------------------------------------------------

/// Column holding the time label of each row.
pub const LABEL_COLUMN: &str = "Month";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Metric {
    Sales,
    Expenses,
    Profit,
    Customers,
}

impl Metric {
    pub const ALL: [Metric; 4] = [
        Metric::Sales,
        Metric::Expenses,
        Metric::Profit,
        Metric::Customers,
    ];

    pub fn column(self) -> &'static str {
        match self {
            Metric::Sales => "Sales",
            Metric::Expenses => "Expenses",
            Metric::Profit => "Profit",
            Metric::Customers => "Customers",
        }
    }

    /// Axis label including the unit.
    pub fn axis_label(self) -> &'static str {
        match self {
            Metric::Sales => "Sales ($)",
            Metric::Expenses => "Expenses ($)",
            Metric::Profit => "Profit ($)",
            Metric::Customers => "Number of Customers",
        }
    }

    pub fn is_currency(self) -> bool {
        !matches!(self, Metric::Customers)
    }

    pub fn from_column(name: &str) -> Option<Self> {
        Metric::ALL.into_iter().find(|m| m.column() == name)
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

// ---------------------------------------------------------------------------
// Series – one numeric column
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub name: String,
    pub values: Vec<f64>,
    /// Every source cell was an integer.
    pub integral: bool,
}

impl Series {
    pub fn new(name: impl Into<String>, values: Vec<f64>) -> Self {
        let integral = values.iter().all(|v| v.fract() == 0.0);
        Series {
            name: name.into(),
            values,
            integral,
        }
    }

    /// `dtype`-style name used by the data preview.
    pub fn type_name(&self) -> &'static str {
        if self.integral {
            "int64"
        } else {
            "float64"
        }
    }
}

// ---------------------------------------------------------------------------
// Dataset – the complete loaded table
// ---------------------------------------------------------------------------

/// The loaded table: time labels plus every fully numeric column.
#[derive(Debug, Clone)]
pub struct Dataset {
    /// File the dataset was read from.
    pub source: PathBuf,
    /// All column names in header order, numeric or not.
    pub column_names: Vec<String>,
    /// The `Month` column, one label per row.
    pub labels: Vec<String>,
    /// Numeric columns in header order.
    pub numeric: Vec<Series>,
}

impl Dataset {
    /// Number of rows.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn series(&self, name: &str) -> Option<&Series> {
        self.numeric.iter().find(|s| s.name == name)
    }

    /// Values of a required metric. Always present on a validated dataset.
    pub fn metric(&self, metric: Metric) -> &[f64] {
        self.series(metric.column())
            .map(|s| s.values.as_slice())
            .unwrap_or(&[])
    }

    /// First and last time label.
    pub fn period(&self) -> Option<(&str, &str)> {
        Some((self.labels.first()?.as_str(), self.labels.last()?.as_str()))
    }

    /// Label of the row holding the largest value of `metric`.
    /// Ties resolve to the earliest row.
    pub fn peak(&self, metric: Metric) -> Option<(&str, f64)> {
        let values = self.metric(metric);
        let (idx, &max) = values
            .iter()
            .enumerate()
            .fold(None::<(usize, &f64)>, |best, (i, v)| match best {
                Some((_, b)) if *v <= *b => best,
                _ => Some((i, v)),
            })?;
        Some((self.labels.get(idx)?.as_str(), max))
    }
}
