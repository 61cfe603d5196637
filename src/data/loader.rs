//! Dataset Loader Module
//! Reads the cleaned happiness CSV with Polars and validates it into a typed [`Table`].

use std::path::{Path, PathBuf};

use polars::prelude::*;
use thiserror::Error;

use super::model::{Row, Schema, Table, COUNTRY_COLUMN, RANK_COLUMN, SCORE_COLUMN};

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Dataset not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("Invalid dataset schema: {0}")]
    Schema(String),
    #[error("Malformed row {row} in column `{column}`: {reason}")]
    Parse {
        row: usize,
        column: String,
        reason: String,
    },
    #[error("Failed to load CSV: {0}")]
    Csv(#[from] PolarsError),
}

/// Cells of one column after type detection.
enum Cells {
    Numeric(Vec<Option<f64>>),
    Text(Vec<Option<String>>),
}

/// Loads the happiness dataset once at startup.
pub struct DataLoader;

impl DataLoader {
    /// Load and validate a CSV file, preserving file row order.
    pub fn load(path: impl AsRef<Path>) -> Result<Table, LoaderError> {
        let path = path.as_ref();
        let df = Self::load_dataframe(path)?;
        let table = Self::table_from_dataframe(&df)?;

        log::info!(
            "Loaded {} rows from {} ({} factor columns)",
            table.len(),
            path.display(),
            table.schema().factor_columns().len()
        );
        Ok(table)
    }

    /// Read the raw CSV into a DataFrame.
    pub fn load_dataframe(path: &Path) -> Result<DataFrame, LoaderError> {
        if !path.is_file() {
            return Err(LoaderError::NotFound(path.to_path_buf()));
        }

        // Scan every row for schema inference so a late malformed cell is
        // attributed to its column instead of failing the whole read.
        let df = LazyCsvReader::new(path)
            .with_has_header(true)
            .with_infer_schema_length(None)
            .finish()?
            .collect()?;

        Ok(df)
    }

    /// Validate a DataFrame and convert it into a [`Table`].
    pub fn table_from_dataframe(df: &DataFrame) -> Result<Table, LoaderError> {
        let columns: Vec<String> = df
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect();

        for required in [RANK_COLUMN, COUNTRY_COLUMN, SCORE_COLUMN] {
            if !columns.iter().any(|c| c == required) {
                return Err(LoaderError::Schema(format!(
                    "missing required column `{required}`"
                )));
            }
        }

        let ranks = Self::required_numbers(
            RANK_COLUMN,
            Self::read_cells(RANK_COLUMN, df.column(RANK_COLUMN)?)?,
        )?;
        let ranks = ranks
            .into_iter()
            .enumerate()
            .map(|(row, v)| {
                if v.fract() == 0.0 {
                    Ok(v as i64)
                } else {
                    Err(LoaderError::Parse {
                        row,
                        column: RANK_COLUMN.to_string(),
                        reason: format!("`{v}` is not an integer rank"),
                    })
                }
            })
            .collect::<Result<Vec<i64>, LoaderError>>()?;

        let countries = Self::required_texts(COUNTRY_COLUMN, df.column(COUNTRY_COLUMN)?)?;
        let scores = Self::required_numbers(
            SCORE_COLUMN,
            Self::read_cells(SCORE_COLUMN, df.column(SCORE_COLUMN)?)?,
        )?;

        let mut factor_columns = Vec::new();
        let mut factor_values: Vec<Vec<f64>> = Vec::new();
        let mut text_columns = Vec::new();
        let mut text_values: Vec<Vec<Option<String>>> = Vec::new();

        for name in &columns {
            if [RANK_COLUMN, COUNTRY_COLUMN, SCORE_COLUMN].contains(&name.as_str()) {
                continue;
            }
            match Self::read_cells(name, df.column(name)?)? {
                Cells::Numeric(values) => {
                    factor_values.push(Self::required_numbers(name, Cells::Numeric(values))?);
                    factor_columns.push(name.clone());
                }
                Cells::Text(values) => {
                    log::warn!("Column `{name}` is not numeric; excluded from factor columns");
                    text_values.push(values);
                    text_columns.push(name.clone());
                }
            }
        }

        let schema = Schema::new(columns, factor_columns, text_columns)?;

        let rows: Vec<Row> = (0..df.height())
            .map(|i| Row {
                overall_rank: ranks[i],
                country_or_region: countries[i].clone(),
                score: scores[i],
                factors: factor_values.iter().map(|col| col[i]).collect(),
                texts: text_values.iter().map(|col| col[i].clone()).collect(),
            })
            .collect();

        Self::check_rank_order(&rows);
        Table::new(schema, rows)
    }

    /// Detect whether a column is numeric or text.
    ///
    /// A string column is text only when none of its cells parse as numbers.
    /// Once any cell parses, the first cell that does not is a malformed row.
    fn read_cells(name: &str, column: &Column) -> Result<Cells, LoaderError> {
        if matches!(
            column.dtype(),
            DataType::Float32
                | DataType::Float64
                | DataType::Int8
                | DataType::Int16
                | DataType::Int32
                | DataType::Int64
                | DataType::UInt8
                | DataType::UInt16
                | DataType::UInt32
                | DataType::UInt64
        ) {
            let value_f64 = column.cast(&DataType::Float64)?;
            let values = value_f64.f64()?.into_iter().collect();
            return Ok(Cells::Numeric(values));
        }

        let texts = Self::texts(column)?;
        let parsed: Vec<Option<Option<f64>>> = texts
            .iter()
            .map(|cell| cell.as_deref().map(|raw| raw.trim().parse::<f64>().ok()))
            .collect();

        let any_text = parsed.iter().any(|cell| matches!(cell, Some(None)));
        let any_number = parsed.iter().any(|cell| matches!(cell, Some(Some(_))));
        if any_text && !any_number {
            return Ok(Cells::Text(texts));
        }

        let values = parsed
            .into_iter()
            .enumerate()
            .map(|(row, cell)| match cell {
                None => Ok(None),
                Some(Some(v)) => Ok(Some(v)),
                Some(None) => Err(LoaderError::Parse {
                    row,
                    column: name.to_string(),
                    reason: format!(
                        "`{}` is not a number",
                        texts[row].as_deref().unwrap_or_default()
                    ),
                }),
            })
            .collect::<Result<Vec<Option<f64>>, LoaderError>>()?;
        Ok(Cells::Numeric(values))
    }

    fn texts(column: &Column) -> Result<Vec<Option<String>>, LoaderError> {
        let as_text = column.cast(&DataType::String)?;
        let texts = as_text
            .as_materialized_series()
            .str()?
            .into_iter()
            .map(|v| v.map(str::to_string))
            .collect();
        Ok(texts)
    }

    fn required_numbers(name: &str, cells: Cells) -> Result<Vec<f64>, LoaderError> {
        match cells {
            Cells::Numeric(values) => values
                .into_iter()
                .enumerate()
                .map(|(row, v)| match v {
                    Some(v) if v.is_finite() => Ok(v),
                    Some(_) => Err(LoaderError::Parse {
                        row,
                        column: name.to_string(),
                        reason: "not a finite number".to_string(),
                    }),
                    None => Err(LoaderError::Parse {
                        row,
                        column: name.to_string(),
                        reason: "missing value".to_string(),
                    }),
                })
                .collect(),
            Cells::Text(texts) => texts
                .iter()
                .enumerate()
                .map(|(row, cell)| {
                    let raw = cell.as_deref().ok_or_else(|| LoaderError::Parse {
                        row,
                        column: name.to_string(),
                        reason: "missing value".to_string(),
                    })?;
                    raw.trim().parse::<f64>().map_err(|_| LoaderError::Parse {
                        row,
                        column: name.to_string(),
                        reason: format!("`{raw}` is not a number"),
                    })
                })
                .collect(),
        }
    }

    fn required_texts(name: &str, column: &Column) -> Result<Vec<String>, LoaderError> {
        Self::texts(column)?
            .into_iter()
            .enumerate()
            .map(|(row, cell)| match cell {
                Some(s) if !s.trim().is_empty() => Ok(s),
                _ => Err(LoaderError::Parse {
                    row,
                    column: name.to_string(),
                    reason: "missing value".to_string(),
                }),
            })
            .collect()
    }

    /// Ranks should increase as scores decrease. A violation is reported but
    /// not rejected; the ranking table sorts by score itself.
    fn check_rank_order(rows: &[Row]) {
        for (i, pair) in rows.windows(2).enumerate() {
            if pair[1].overall_rank <= pair[0].overall_rank || pair[1].score > pair[0].score {
                log::warn!(
                    "Rank order mismatch between rows {} and {} ({} / {})",
                    i,
                    i + 1,
                    pair[0].country_or_region,
                    pair[1].country_or_region
                );
                return;
            }
        }
    }
}
