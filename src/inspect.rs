//! Read-only queries over a document: value search, a column summary and
//! per-column descriptive statistics.

use std::collections::HashMap;
use std::fmt;

use crate::document::Document;
use crate::value::{CellValue, ColumnType};

impl Document {
    /// Find the first cell whose displayed text contains `needle`,
    /// ignoring case. Cells are scanned row by row.
    pub fn find(&self, needle: &str) -> Option<(usize, usize)> {
        if needle.is_empty() {
            return None;
        }
        let needle = needle.to_lowercase();
        self.rows().iter().enumerate().find_map(|(row, values)| {
            values
                .iter()
                .position(|value| !value.is_missing() && value.to_string().to_lowercase().contains(&needle))
                .map(|col| (row, col))
        })
    }

    pub fn info(&self) -> DocumentInfo {
        let columns = self
            .columns()
            .iter()
            .enumerate()
            .map(|(col, column)| {
                let values: Vec<&CellValue> = self
                    .rows()
                    .iter()
                    .map(|row| &row[col])
                    .filter(|value| !value.is_missing())
                    .collect();
                ColumnInfo {
                    name: column.name.clone(),
                    column_type: column.column_type,
                    non_missing: values.len(),
                    stats: ColumnStats::compute(column.column_type, &values),
                }
            })
            .collect();
        DocumentInfo {
            rows: self.row_count(),
            columns,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ColumnInfo {
    pub name: String,
    pub column_type: ColumnType,
    pub non_missing: usize,
    /// `None` when every value in the column is missing
    pub stats: Option<ColumnStats>,
}

/// Descriptive statistics of the non-missing values in one column
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnStats {
    /// Integer and float columns
    Numeric(NumericSummary),
    /// Text and opaque columns, compared by displayed text
    Categorical(CategoricalSummary),
}

#[derive(Debug, Clone, PartialEq)]
pub struct NumericSummary {
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation; `None` with fewer than two values
    pub std: Option<f64>,
    pub min: f64,
    pub q25: f64,
    pub median: f64,
    pub q75: f64,
    pub max: f64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoricalSummary {
    pub count: usize,
    pub unique: usize,
    /// Most frequent value; ties go to the value seen first
    pub top: String,
    pub freq: usize,
}

impl ColumnStats {
    fn compute(column_type: ColumnType, values: &[&CellValue]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        match column_type {
            ColumnType::Integer | ColumnType::Float => {
                let numbers: Vec<f64> = values.iter().filter_map(|value| value.as_f64()).collect();
                NumericSummary::compute(numbers).map(ColumnStats::Numeric)
            }
            ColumnType::Text | ColumnType::Opaque => {
                Some(ColumnStats::Categorical(CategoricalSummary::compute(values)))
            }
        }
    }
}

impl NumericSummary {
    fn compute(mut numbers: Vec<f64>) -> Option<Self> {
        if numbers.is_empty() {
            return None;
        }
        numbers.sort_by(f64::total_cmp);
        let count = numbers.len();
        let n = count as f64;
        let mean = numbers.iter().sum::<f64>() / n;
        let std = (count > 1).then(|| {
            let squares: f64 = numbers.iter().map(|x| (x - mean).powi(2)).sum();
            (squares / (n - 1.0)).sqrt()
        });
        Some(Self {
            count,
            mean,
            std,
            min: numbers[0],
            q25: quantile(&numbers, 0.25),
            median: quantile(&numbers, 0.5),
            q75: quantile(&numbers, 0.75),
            max: numbers[count - 1],
        })
    }
}

// Linear interpolation between the closest ranks of a sorted, non-empty slice.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
}

impl CategoricalSummary {
    fn compute(values: &[&CellValue]) -> Self {
        let mut counts: HashMap<String, (usize, usize)> = HashMap::new();
        for (order, value) in values.iter().enumerate() {
            counts.entry(value.to_string()).or_insert((0, order)).0 += 1;
        }
        let unique = counts.len();
        let (top, (freq, _)) = counts
            .into_iter()
            .max_by(|(_, (a, first_a)), (_, (b, first_b))| a.cmp(b).then(first_b.cmp(first_a)))
            .unwrap_or_default();
        Self {
            count: values.len(),
            unique,
            top,
            freq,
        }
    }
}

/// Shape and per-column fill of a document
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentInfo {
    pub rows: usize,
    pub columns: Vec<ColumnInfo>,
}

impl fmt::Display for DocumentInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "RangeIndex: {} entries", self.rows)?;
        writeln!(f, "Data columns (total {} columns):", self.columns.len())?;
        writeln!(f, " #  {:<20} {:<14} Dtype", "Column", "Non-Null Count")?;
        for (i, column) in self.columns.iter().enumerate() {
            writeln!(
                f,
                " {:<2} {:<20} {:<14} {}",
                i,
                column.name,
                format!("{} non-null", column.non_missing),
                column.column_type
            )?;
        }

        writeln!(f)?;
        writeln!(f, "--- Description ---")?;
        for column in &self.columns {
            writeln!(f, "{}:", column.name)?;
            match &column.stats {
                Some(ColumnStats::Numeric(s)) => {
                    let std = s.std.map_or_else(|| "NaN".to_string(), |std| format!("{:.6}", std));
                    writeln!(f, "  {:<6} {}", "count", s.count)?;
                    writeln!(f, "  {:<6} {:.6}", "mean", s.mean)?;
                    writeln!(f, "  {:<6} {}", "std", std)?;
                    writeln!(f, "  {:<6} {:.6}", "min", s.min)?;
                    writeln!(f, "  {:<6} {:.6}", "25%", s.q25)?;
                    writeln!(f, "  {:<6} {:.6}", "50%", s.median)?;
                    writeln!(f, "  {:<6} {:.6}", "75%", s.q75)?;
                    writeln!(f, "  {:<6} {:.6}", "max", s.max)?;
                }
                Some(ColumnStats::Categorical(s)) => {
                    writeln!(f, "  {:<6} {}", "count", s.count)?;
                    writeln!(f, "  {:<6} {}", "unique", s.unique)?;
                    writeln!(f, "  {:<6} {}", "top", s.top)?;
                    writeln!(f, "  {:<6} {}", "freq", s.freq)?;
                }
                None => writeln!(f, "  {:<6} 0", "count")?,
            }
        }
        Ok(())
    }
}
