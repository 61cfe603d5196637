//! Statistics Calculator Module
//! Global aggregates and the Pearson correlation matrix.

use statrs::statistics::Statistics;
use thiserror::Error;

use crate::data::Table;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum StatsError {
    #[error("Column `{0}` is missing or not numeric")]
    Column(String),
    #[error("Cannot aggregate `{0}` over an empty table")]
    EmptyInput(String),
    #[error("Correlation needs at least 2 numeric columns, got {0}")]
    InsufficientColumns(usize),
}

/// Pairwise Pearson coefficients, labelled by column on both axes.
///
/// Undefined coefficients (a zero-variance column, or fewer than two rows)
/// are stored as `NaN`.
#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationMatrix {
    columns: Vec<String>,
    values: Vec<f64>,
}

impl CorrelationMatrix {
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn size(&self) -> usize {
        self.columns.len()
    }

    /// Coefficient at `(i, j)`; panics when out of range, like slice indexing.
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.values[i * self.columns.len() + j]
    }

    /// Coefficient between two named columns.
    pub fn get_by_name(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.columns.iter().position(|c| c == a)?;
        let j = self.columns.iter().position(|c| c == b)?;
        Some(self.get(i, j))
    }

    /// Whether the coefficient at `(i, j)` is defined.
    pub fn is_defined(&self, i: usize, j: usize) -> bool {
        !self.get(i, j).is_nan()
    }
}

/// Handles statistical calculations over the base table.
pub struct StatsCalculator;

impl StatsCalculator {
    /// Arithmetic mean of a numeric column over every row.
    pub fn mean(table: &Table, column: &str) -> Result<f64, StatsError> {
        let values = table
            .numeric_values(column)
            .ok_or_else(|| StatsError::Column(column.to_string()))?;
        if values.is_empty() {
            return Err(StatsError::EmptyInput(column.to_string()));
        }
        Ok(values.iter().mean())
    }

    /// Pearson correlation matrix over `columns`, in the order given.
    pub fn correlate<S: AsRef<str>>(
        table: &Table,
        columns: &[S],
    ) -> Result<CorrelationMatrix, StatsError> {
        if columns.len() < 2 {
            return Err(StatsError::InsufficientColumns(columns.len()));
        }

        let series = columns
            .iter()
            .map(|c| {
                table
                    .numeric_values(c.as_ref())
                    .ok_or_else(|| StatsError::Column(c.as_ref().to_string()))
            })
            .collect::<Result<Vec<Vec<f64>>, StatsError>>()?;

        let n = series.len();
        let mut values = vec![f64::NAN; n * n];
        for i in 0..n {
            values[i * n + i] = 1.0;
            for j in (i + 1)..n {
                let r = Self::pearson(&series[i], &series[j]);
                values[i * n + j] = r;
                values[j * n + i] = r;
            }
        }

        Ok(CorrelationMatrix {
            columns: columns.iter().map(|c| c.as_ref().to_string()).collect(),
            values,
        })
    }

    /// Pearson coefficient of two equally long samples, `NaN` when undefined.
    pub fn pearson(x: &[f64], y: &[f64]) -> f64 {
        if x.len() != y.len() || x.len() < 2 {
            return f64::NAN;
        }

        let sx = x.iter().std_dev();
        let sy = y.iter().std_dev();
        if sx == 0.0 || sy == 0.0 || sx.is_nan() || sy.is_nan() {
            return f64::NAN;
        }

        let cov = x.iter().covariance(y.iter());
        (cov / (sx * sy)).clamp(-1.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::tests::nordic_table;
    use crate::data::{DataProcessor, Row, Table};

    #[test]
    fn mean_of_scores() {
        let table = nordic_table();
        let mean = StatsCalculator::mean(&table, "score").unwrap();
        assert!((mean - 7.6333).abs() < 0.01);
    }

    #[test]
    fn mean_of_identical_values_is_that_value() {
        let table = nordic_table();
        let rows: Vec<Row> = table
            .rows()
            .iter()
            .cloned()
            .map(|mut r| {
                r.score = 6.25;
                r
            })
            .collect();
        let flat = Table::new(table.schema().clone(), rows).unwrap();
        assert_eq!(StatsCalculator::mean(&flat, "score").unwrap(), 6.25);
    }

    #[test]
    fn mean_ignores_row_order() {
        let table = nordic_table();
        let mut rows = table.rows().to_vec();
        rows.reverse();
        let reversed = Table::new(table.schema().clone(), rows).unwrap();

        let a = StatsCalculator::mean(&table, "gdp_per_capita").unwrap();
        let b = StatsCalculator::mean(&reversed, "gdp_per_capita").unwrap();
        assert!((a - b).abs() < 1e-12);
    }

    #[test]
    fn mean_over_empty_table_is_error() {
        let table = nordic_table();
        let empty = DataProcessor::filter_countries::<&str>(&table, &[]);
        assert_eq!(
            StatsCalculator::mean(&empty, "score"),
            Err(StatsError::EmptyInput("score".to_string()))
        );
    }

    #[test]
    fn mean_of_text_column_is_column_error() {
        let table = nordic_table();
        assert_eq!(
            StatsCalculator::mean(&table, "country_or_region"),
            Err(StatsError::Column("country_or_region".to_string()))
        );
    }

    #[test]
    fn correlation_is_symmetric_bounded_with_unit_diagonal() {
        let table = nordic_table();
        let cols = ["score", "gdp_per_capita", "generosity"];
        let corr = StatsCalculator::correlate(&table, &cols).unwrap();

        assert_eq!(corr.size(), 3);
        for i in 0..3 {
            assert_eq!(corr.get(i, i), 1.0);
            for j in 0..3 {
                assert_eq!(corr.get(i, j), corr.get(j, i));
                assert!((-1.0..=1.0).contains(&corr.get(i, j)));
            }
        }
        // score falls while gdp rises
        assert!(corr.get_by_name("score", "gdp_per_capita").unwrap() < -0.9);
    }

    #[test]
    fn zero_variance_column_is_undefined() {
        let table = nordic_table();
        let rows: Vec<Row> = table
            .rows()
            .iter()
            .cloned()
            .map(|mut r| {
                r.factors[1] = 0.2;
                r
            })
            .collect();
        let flat = Table::new(table.schema().clone(), rows).unwrap();

        let corr = StatsCalculator::correlate(&flat, &["gdp_per_capita", "generosity"]).unwrap();
        assert!(!corr.is_defined(0, 1));
        assert!(corr.get(1, 0).is_nan());
        assert_eq!(corr.get(1, 1), 1.0);
    }

    #[test]
    fn correlation_needs_two_numeric_columns() {
        let table = nordic_table();
        assert_eq!(
            StatsCalculator::correlate(&table, &["score"]),
            Err(StatsError::InsufficientColumns(1))
        );
        assert_eq!(
            StatsCalculator::correlate(&table, &["score", "country_or_region"]),
            Err(StatsError::Column("country_or_region".to_string()))
        );
    }

    #[test]
    fn pearson_of_linear_series() {
        let x = [1.0, 2.0, 3.0, 4.0];
        let y = [8.0, 6.0, 4.0, 2.0];
        assert!((StatsCalculator::pearson(&x, &y) + 1.0).abs() < 1e-12);
        assert!((StatsCalculator::pearson(&x, &x) - 1.0).abs() < 1e-12);
        assert!(StatsCalculator::pearson(&x[..1], &y[..1]).is_nan());
    }
}
