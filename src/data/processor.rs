//! Data Processor Module
//! Pure row-level transformations: country filtering and top-N ranking.

use std::collections::HashSet;

use thiserror::Error;

use super::model::{DerivedView, Table};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProcessorError {
    #[error("Column `{0}` is missing or not numeric")]
    Column(String),
}

/// Stateless transformations over an immutable [`Table`].
pub struct DataProcessor;

impl DataProcessor {
    /// Rows whose country is in `keys`, in table order.
    ///
    /// An empty selection yields an empty view. Unknown keys are ignored and
    /// repeated keys never repeat a row.
    pub fn filter_countries<S: AsRef<str>>(table: &Table, keys: &[S]) -> DerivedView {
        let selected: HashSet<&str> = keys.iter().map(|k| k.as_ref()).collect();
        let rows = table
            .rows()
            .iter()
            .filter(|row| selected.contains(row.country_or_region.as_str()))
            .cloned()
            .collect();
        table.derive(rows)
    }

    /// The `n` rows with the highest `by_column`, ties kept in table order.
    ///
    /// Returns every row when `n` exceeds the table size.
    pub fn top_n(table: &Table, by_column: &str, n: usize) -> Result<Table, ProcessorError> {
        let column = table
            .schema()
            .resolve_numeric(by_column)
            .ok_or_else(|| ProcessorError::Column(by_column.to_string()))?;

        let mut keyed: Vec<(f64, usize)> = table
            .rows()
            .iter()
            .enumerate()
            .filter_map(|(i, row)| row.numeric(column).map(|v| (v, i)))
            .collect();

        // sort_by is stable, so equal keys keep their original order
        keyed.sort_by(|a, b| b.0.total_cmp(&a.0));

        let rows = keyed
            .into_iter()
            .take(n)
            .map(|(_, i)| table.rows()[i].clone())
            .collect();
        Ok(table.derive(rows))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::tests::nordic_table;
    use crate::data::model::{Row, Schema};
    use pretty_assertions::assert_eq;

    #[test]
    fn filter_keeps_table_order() {
        let table = nordic_table();
        let view = DataProcessor::filter_countries(&table, &["Norway", "Finland"]);
        assert_eq!(view.countries(), vec!["Finland", "Norway"]);
    }

    #[test]
    fn filter_with_empty_selection_is_empty() {
        let table = nordic_table();
        let view = DataProcessor::filter_countries::<&str>(&table, &[]);
        assert!(view.is_empty());
        assert_eq!(view.schema(), table.schema());
    }

    #[test]
    fn filter_ignores_unknown_and_repeated_keys() {
        let table = nordic_table();
        let view =
            DataProcessor::filter_countries(&table, &["Denmark", "Atlantis", "Denmark"]);
        assert_eq!(view.countries(), vec!["Denmark"]);
    }

    #[test]
    fn filter_is_idempotent() {
        let table = nordic_table();
        let keys = ["Finland", "Norway"];
        let once = DataProcessor::filter_countries(&table, &keys);
        let twice = DataProcessor::filter_countries(&once, &keys);
        assert_eq!(once, twice);
        assert_eq!(once, DataProcessor::filter_countries(&table, &keys));
    }

    #[test]
    fn single_key_result_is_subset_of_selection() {
        let table = nordic_table();
        let keys = ["Finland", "Denmark", "Norway"];
        let all = DataProcessor::filter_countries(&table, &keys);
        for key in keys {
            let one = DataProcessor::filter_countries(&table, &[key]);
            assert!(one.rows().iter().all(|r| all.rows().contains(r)));
        }
    }

    #[test]
    fn top_n_sorts_descending_by_score() {
        let table = nordic_table();
        let top = DataProcessor::top_n(&table, "score", 2).unwrap();
        assert_eq!(top.countries(), vec!["Finland", "Denmark"]);
    }

    #[test]
    fn top_n_larger_than_table_returns_every_row() {
        let table = nordic_table();
        let top = DataProcessor::top_n(&table, "score", 20).unwrap();
        assert_eq!(top.len(), 3);
    }

    #[test]
    fn top_n_by_factor_keeps_original_rank_field() {
        let table = nordic_table();
        let top = DataProcessor::top_n(&table, "gdp_per_capita", 3).unwrap();
        assert_eq!(top.countries(), vec!["Norway", "Denmark", "Finland"]);
        let ranks: Vec<i64> = top.rows().iter().map(|r| r.overall_rank).collect();
        assert_eq!(ranks, vec![3, 2, 1]);
    }

    #[test]
    fn top_n_ties_keep_table_order() {
        let table = nordic_table();
        let schema: Schema = table.schema().clone();
        let row = |rank: i64, country: &str, score: f64| Row {
            overall_rank: rank,
            country_or_region: country.to_string(),
            score,
            factors: vec![1.0, 0.1],
            texts: Vec::new(),
        };
        let tied = Table::new(
            schema,
            vec![
                row(1, "Iceland", 7.0),
                row(2, "Sweden", 7.2),
                row(3, "Austria", 7.0),
                row(4, "Canada", 7.0),
            ],
        )
        .unwrap();

        let top = DataProcessor::top_n(&tied, "score", 3).unwrap();
        assert_eq!(top.countries(), vec!["Sweden", "Iceland", "Austria"]);
    }

    #[test]
    fn top_n_rejects_text_and_unknown_columns() {
        let table = nordic_table();
        assert_eq!(
            DataProcessor::top_n(&table, "country_or_region", 2),
            Err(ProcessorError::Column("country_or_region".to_string()))
        );
        assert!(DataProcessor::top_n(&table, "happiness", 2).is_err());
    }

    #[test]
    fn top_n_zero_is_empty() {
        let table = nordic_table();
        assert!(DataProcessor::top_n(&table, "score", 0).unwrap().is_empty());
    }
}
