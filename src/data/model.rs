//! Dataset Model
//! Typed rows and the immutable table they live in.

use std::collections::HashSet;
use std::sync::Arc;

use super::loader::LoaderError;

/// Name of the unique key column.
pub const COUNTRY_COLUMN: &str = "country_or_region";
/// Name of the integer rank column.
pub const RANK_COLUMN: &str = "overall_rank";
/// Name of the happiness score column.
pub const SCORE_COLUMN: &str = "score";

/// Where a named column lives inside a [`Row`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnRef {
    Rank,
    Country,
    Score,
    Factor(usize),
    Text(usize),
}

impl ColumnRef {
    pub fn is_numeric(self) -> bool {
        !matches!(self, ColumnRef::Country | ColumnRef::Text(_))
    }
}

/// Column layout shared by a table and every view derived from it.
#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    /// Header names in file order.
    columns: Vec<String>,
    /// Numeric columns beyond rank/country/score, in file order.
    factor_columns: Vec<String>,
    /// Non-numeric trailing columns, kept for display only.
    text_columns: Vec<String>,
}

impl Schema {
    /// Build a schema. `columns` is the display order and must name every
    /// required, factor and text column exactly once.
    pub fn new(
        columns: Vec<String>,
        factor_columns: Vec<String>,
        text_columns: Vec<String>,
    ) -> Result<Self, LoaderError> {
        for required in [RANK_COLUMN, COUNTRY_COLUMN, SCORE_COLUMN] {
            if !columns.iter().any(|c| c == required) {
                return Err(LoaderError::Schema(format!(
                    "missing required column `{required}`"
                )));
            }
        }

        let mut seen = HashSet::new();
        for name in &columns {
            if !seen.insert(name.as_str()) {
                return Err(LoaderError::Schema(format!("duplicate column `{name}`")));
            }
        }

        for name in factor_columns.iter().chain(text_columns.iter()) {
            if [RANK_COLUMN, COUNTRY_COLUMN, SCORE_COLUMN].contains(&name.as_str()) {
                return Err(LoaderError::Schema(format!(
                    "required column `{name}` cannot be a factor or text column"
                )));
            }
            if !seen.contains(name.as_str()) {
                return Err(LoaderError::Schema(format!(
                    "column `{name}` is not part of the header"
                )));
            }
        }

        if factor_columns.len() + text_columns.len() + 3 != columns.len() {
            return Err(LoaderError::Schema(
                "every non-required column must be either a factor or a text column".to_string(),
            ));
        }

        if factor_columns.len() < 2 {
            return Err(LoaderError::Schema(format!(
                "expected at least 2 numeric factor columns, found {}",
                factor_columns.len()
            )));
        }

        Ok(Self {
            columns,
            factor_columns,
            text_columns,
        })
    }

    /// All column names in file order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Numeric factor columns eligible for axis selection and correlation.
    pub fn factor_columns(&self) -> &[String] {
        &self.factor_columns
    }

    pub fn text_columns(&self) -> &[String] {
        &self.text_columns
    }

    /// Resolve a column name.
    pub fn resolve(&self, name: &str) -> Option<ColumnRef> {
        match name {
            RANK_COLUMN => Some(ColumnRef::Rank),
            COUNTRY_COLUMN => Some(ColumnRef::Country),
            SCORE_COLUMN => Some(ColumnRef::Score),
            _ => self
                .factor_columns
                .iter()
                .position(|c| c == name)
                .map(ColumnRef::Factor)
                .or_else(|| {
                    self.text_columns
                        .iter()
                        .position(|c| c == name)
                        .map(ColumnRef::Text)
                }),
        }
    }

    /// Resolve a column name and require it to be numeric.
    pub fn resolve_numeric(&self, name: &str) -> Option<ColumnRef> {
        self.resolve(name).filter(|c| c.is_numeric())
    }

    /// Whether `name` is a numeric factor column.
    pub fn is_factor(&self, name: &str) -> bool {
        self.factor_columns.iter().any(|c| c == name)
    }
}

/// One country's record.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub overall_rank: i64,
    pub country_or_region: String,
    pub score: f64,
    /// Values aligned with [`Schema::factor_columns`].
    pub factors: Vec<f64>,
    /// Values aligned with [`Schema::text_columns`].
    pub texts: Vec<Option<String>>,
}

impl Row {
    /// Numeric value of a resolved column, `None` for text columns.
    pub fn numeric(&self, column: ColumnRef) -> Option<f64> {
        match column {
            ColumnRef::Rank => Some(self.overall_rank as f64),
            ColumnRef::Score => Some(self.score),
            ColumnRef::Factor(i) => self.factors.get(i).copied(),
            ColumnRef::Country | ColumnRef::Text(_) => None,
        }
    }

    /// Display text of a resolved column.
    pub fn display(&self, column: ColumnRef) -> String {
        match column {
            ColumnRef::Rank => self.overall_rank.to_string(),
            ColumnRef::Country => self.country_or_region.clone(),
            ColumnRef::Score => format!("{:.3}", self.score),
            ColumnRef::Factor(i) => self
                .factors
                .get(i)
                .map(|v| format!("{v:.3}"))
                .unwrap_or_default(),
            ColumnRef::Text(i) => self
                .texts
                .get(i)
                .cloned()
                .flatten()
                .unwrap_or_default(),
        }
    }
}

/// Ordered, immutable sequence of rows with a fixed column set.
///
/// Every derived view (filtered subset, top-N ranking) is itself a `Table`
/// sharing the parent's schema.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    schema: Arc<Schema>,
    rows: Vec<Row>,
}

/// A table restricted to the rows of a filter selection.
pub type DerivedView = Table;

impl Table {
    /// Build a table, checking that every row matches the schema and that
    /// country keys are unique.
    pub fn new(schema: Schema, rows: Vec<Row>) -> Result<Self, LoaderError> {
        let mut keys = HashSet::with_capacity(rows.len());
        for (i, row) in rows.iter().enumerate() {
            if row.factors.len() != schema.factor_columns.len() {
                return Err(LoaderError::Parse {
                    row: i,
                    column: String::new(),
                    reason: format!(
                        "expected {} factor values, found {}",
                        schema.factor_columns.len(),
                        row.factors.len()
                    ),
                });
            }
            if row.texts.len() != schema.text_columns.len() {
                return Err(LoaderError::Parse {
                    row: i,
                    column: String::new(),
                    reason: format!(
                        "expected {} text values, found {}",
                        schema.text_columns.len(),
                        row.texts.len()
                    ),
                });
            }
            if !keys.insert(row.country_or_region.as_str()) {
                return Err(LoaderError::Parse {
                    row: i,
                    column: COUNTRY_COLUMN.to_string(),
                    reason: format!("duplicate key `{}`", row.country_or_region),
                });
            }
        }

        Ok(Self {
            schema: Arc::new(schema),
            rows,
        })
    }

    /// Derived table over the same schema. Rows come from `self`, so the
    /// uniqueness and shape checks already hold.
    pub(crate) fn derive(&self, rows: Vec<Row>) -> Self {
        Self {
            schema: Arc::clone(&self.schema),
            rows,
        }
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Country keys in table order.
    pub fn countries(&self) -> Vec<&str> {
        self.rows
            .iter()
            .map(|r| r.country_or_region.as_str())
            .collect()
    }

    /// Values of a numeric column in table order, `None` if the column is
    /// absent or non-numeric.
    pub fn numeric_values(&self, name: &str) -> Option<Vec<f64>> {
        let column = self.schema.resolve_numeric(name)?;
        Some(
            self.rows
                .iter()
                .filter_map(|r| r.numeric(column))
                .collect(),
        )
    }
}
