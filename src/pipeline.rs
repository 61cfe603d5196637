//! Dashboard Pipeline
//! Session context, user selection, and the pure event handlers that turn
//! `(Table, Selection)` into the artifacts handed to the renderer.

use std::collections::{HashMap, HashSet};

use thiserror::Error;

use crate::config::DashboardConfig;
use crate::data::{
    DataLoader, DataProcessor, DerivedView, LoaderError, ProcessorError, Table, SCORE_COLUMN,
};
use crate::stats::{CorrelationMatrix, StatsCalculator, StatsError};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SelectionError {
    #[error("Column `{0}` is not a numeric factor column")]
    Column(String),
}

/// A user interaction with one of the dashboard controls.
#[derive(Debug, Clone, PartialEq)]
pub enum DashboardEvent {
    SetCountries(Vec<String>),
    ToggleCountry(String),
    SetXAxis(String),
    SetYAxis(String),
    SetTopN(usize),
}

/// Current state of every control.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub countries: Vec<String>,
    pub x_axis: String,
    pub y_axis: String,
    pub top_n: usize,
}

impl Selection {
    /// Configured defaults, restricted to what the table actually holds.
    pub fn initial(table: &Table, config: &DashboardConfig) -> Self {
        let available = table.countries();
        let countries = config
            .default_countries
            .iter()
            .filter(|c| available.contains(&c.as_str()))
            .cloned()
            .collect();

        let factors = table.schema().factor_columns();
        Self {
            countries,
            x_axis: factors[0].clone(),
            y_axis: factors[1].clone(),
            top_n: config.top_n.clamp(config.top_n.default),
        }
    }

    /// Apply one event. Rejected events leave the selection unchanged.
    pub fn apply(
        &mut self,
        table: &Table,
        config: &DashboardConfig,
        event: DashboardEvent,
    ) -> Result<(), SelectionError> {
        match event {
            DashboardEvent::SetCountries(countries) => {
                let mut seen = HashSet::new();
                self.countries = countries
                    .into_iter()
                    .filter(|c| seen.insert(c.clone()))
                    .collect();
            }
            DashboardEvent::ToggleCountry(country) => {
                if let Some(pos) = self.countries.iter().position(|c| *c == country) {
                    self.countries.remove(pos);
                } else {
                    self.countries.push(country);
                }
            }
            DashboardEvent::SetXAxis(column) => self.x_axis = Self::factor(table, column)?,
            DashboardEvent::SetYAxis(column) => self.y_axis = Self::factor(table, column)?,
            DashboardEvent::SetTopN(n) => self.top_n = config.top_n.clamp(n),
        }
        Ok(())
    }

    fn factor(table: &Table, column: String) -> Result<String, SelectionError> {
        if table.schema().is_factor(&column) {
            Ok(column)
        } else {
            Err(SelectionError::Column(column))
        }
    }
}

/// One point of the scatter plot.
#[derive(Debug, Clone, PartialEq)]
pub struct ScatterPoint {
    pub country: String,
    /// Position of the country in the base table, so its colour survives
    /// changes to the selection.
    pub key_index: usize,
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScatterSeries {
    pub x_axis: String,
    pub y_axis: String,
    pub title: String,
    pub points: Vec<ScatterPoint>,
}

impl ScatterSeries {
    pub fn from_view(
        table: &Table,
        view: &DerivedView,
        x_axis: &str,
        y_axis: &str,
    ) -> Result<Self, ProcessorError> {
        let schema = view.schema();
        let x = schema
            .resolve_numeric(x_axis)
            .ok_or_else(|| ProcessorError::Column(x_axis.to_string()))?;
        let y = schema
            .resolve_numeric(y_axis)
            .ok_or_else(|| ProcessorError::Column(y_axis.to_string()))?;

        let key_index: HashMap<&str, usize> = table
            .countries()
            .into_iter()
            .enumerate()
            .map(|(i, c)| (c, i))
            .collect();

        let points = view
            .rows()
            .iter()
            .filter_map(|row| {
                Some(ScatterPoint {
                    country: row.country_or_region.clone(),
                    key_index: *key_index.get(row.country_or_region.as_str())?,
                    x: row.numeric(x)?,
                    y: row.numeric(y)?,
                })
            })
            .collect();

        Ok(Self {
            x_axis: x_axis.to_string(),
            y_axis: y_axis.to_string(),
            title: format!("{} vs {}", axis_title(y_axis), axis_title(x_axis)),
            points,
        })
    }
}

/// `gdp_per_capita` -> `Gdp Per Capita`.
pub fn axis_title(column: &str) -> String {
    column
        .split('_')
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

/// Artifacts computed once over the full table.
#[derive(Debug, Clone)]
pub struct Overview {
    /// `(column, mean)` for each configured summary column.
    pub averages: Vec<(String, Result<f64, StatsError>)>,
    pub correlation: Result<CorrelationMatrix, StatsError>,
}

impl Overview {
    pub fn compute(table: &Table, config: &DashboardConfig) -> Self {
        let averages = config
            .summary_columns
            .iter()
            .map(|column| (column.clone(), StatsCalculator::mean(table, column)))
            .collect();
        let correlation = StatsCalculator::correlate(table, table.schema().factor_columns());

        if let Err(e) = &correlation {
            log::warn!("Correlation heatmap unavailable: {e}");
        }
        Self {
            averages,
            correlation,
        }
    }
}

/// Artifacts rebuilt on every interaction.
#[derive(Debug, Clone)]
pub struct DerivedArtifacts {
    pub view: DerivedView,
    pub scatter: Result<ScatterSeries, ProcessorError>,
    pub top: Result<Table, ProcessorError>,
}

/// Pure handler: everything the renderer needs for the current selection.
pub fn derive(table: &Table, selection: &Selection) -> DerivedArtifacts {
    let view = DataProcessor::filter_countries(table, &selection.countries);
    let scatter = ScatterSeries::from_view(table, &view, &selection.x_axis, &selection.y_axis);
    let top = DataProcessor::top_n(table, SCORE_COLUMN, selection.top_n);

    if let Err(e) = &scatter {
        log::warn!("Scatter plot unavailable: {e}");
    }
    if let Err(e) = &top {
        log::warn!("Ranking table unavailable: {e}");
    }

    DerivedArtifacts { view, scatter, top }
}

/// Owns the base table for the lifetime of the dashboard.
pub struct Session {
    config: DashboardConfig,
    table: Table,
    overview: Overview,
    selection: Selection,
    artifacts: DerivedArtifacts,
}

impl Session {
    /// Load the configured dataset and build the initial artifacts.
    pub fn start(config: &DashboardConfig) -> Result<Self, LoaderError> {
        let table = DataLoader::load(&config.dataset_path)?;
        Ok(Self::from_table(table, config))
    }

    pub fn from_table(table: Table, config: &DashboardConfig) -> Self {
        if let Err(e) = config.validate() {
            log::warn!("{e}; slider values fall back to the lower bound");
        }
        let overview = Overview::compute(&table, config);
        let selection = Selection::initial(&table, config);
        let artifacts = derive(&table, &selection);
        Self {
            config: config.clone(),
            table,
            overview,
            selection,
            artifacts,
        }
    }

    /// Handle one control change and recompute the derived artifacts.
    pub fn dispatch(&mut self, event: DashboardEvent) -> Result<(), SelectionError> {
        log::debug!("Dispatching {event:?}");
        self.selection.apply(&self.table, &self.config, event)?;
        self.artifacts = derive(&self.table, &self.selection);
        Ok(())
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    pub fn overview(&self) -> &Overview {
        &self.overview
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn artifacts(&self) -> &DerivedArtifacts {
        &self.artifacts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TopNConfig;
    use crate::data::model::tests::nordic_table;

    #[test]
    fn axis_title_replaces_underscores() {
        assert_eq!(axis_title("gdp_per_capita"), "Gdp Per Capita");
        assert_eq!(axis_title("score"), "Score");
    }

    #[test]
    fn session_starts_with_configured_defaults() {
        let session = Session::from_table(nordic_table(), &DashboardConfig::default());
        let selection = session.selection();

        assert_eq!(selection.countries, ["Finland", "Denmark", "Norway"]);
        assert_eq!(selection.x_axis, "gdp_per_capita");
        assert_eq!(selection.y_axis, "generosity");
        assert_eq!(selection.top_n, 10);
        assert_eq!(session.artifacts().view.len(), 3);
    }

    #[test]
    fn default_countries_absent_from_table_are_dropped() {
        let config = DashboardConfig {
            default_countries: vec!["Finland".to_string(), "Bhutan".to_string()],
            ..DashboardConfig::default()
        };
        let selection = Selection::initial(&nordic_table(), &config);
        assert_eq!(selection.countries, ["Finland"]);
    }

    #[test]
    fn empty_selection_renders_zero_rows() {
        let mut session = Session::from_table(nordic_table(), &DashboardConfig::default());
        session.dispatch(DashboardEvent::SetCountries(Vec::new())).unwrap();

        let artifacts = session.artifacts();
        assert!(artifacts.view.is_empty());
        assert!(artifacts.scatter.as_ref().unwrap().points.is_empty());
        assert_eq!(artifacts.top.as_ref().unwrap().len(), 3);
    }

    #[test]
    fn toggling_country_rebuilds_view() {
        let mut session = Session::from_table(nordic_table(), &DashboardConfig::default());
        session
            .dispatch(DashboardEvent::ToggleCountry("Denmark".to_string()))
            .unwrap();
        assert_eq!(session.artifacts().view.countries(), vec!["Finland", "Norway"]);

        session
            .dispatch(DashboardEvent::ToggleCountry("Denmark".to_string()))
            .unwrap();
        assert_eq!(
            session.artifacts().view.countries(),
            vec!["Finland", "Denmark", "Norway"]
        );
    }

    #[test]
    fn invalid_axis_is_rejected_and_selection_kept() {
        let mut session = Session::from_table(nordic_table(), &DashboardConfig::default());
        let before = session.selection().clone();

        let err = session
            .dispatch(DashboardEvent::SetXAxis("country_or_region".to_string()))
            .unwrap_err();
        assert_eq!(err, SelectionError::Column("country_or_region".to_string()));
        assert_eq!(session.selection(), &before);

        // score is numeric but not a factor column
        assert!(session
            .dispatch(DashboardEvent::SetYAxis("score".to_string()))
            .is_err());
    }

    #[test]
    fn scatter_follows_axis_change() {
        let mut session = Session::from_table(nordic_table(), &DashboardConfig::default());
        session
            .dispatch(DashboardEvent::SetXAxis("generosity".to_string()))
            .unwrap();
        session
            .dispatch(DashboardEvent::SetYAxis("gdp_per_capita".to_string()))
            .unwrap();

        let scatter = session.artifacts().scatter.as_ref().unwrap();
        assert_eq!(scatter.title, "Gdp Per Capita vs Generosity");
        assert_eq!(scatter.points[0].country, "Finland");
        assert_eq!(scatter.points[0].x, 0.15);
        assert_eq!(scatter.points[0].y, 1.3);
    }

    #[test]
    fn top_n_is_clamped_to_slider_bounds() {
        let mut session = Session::from_table(nordic_table(), &DashboardConfig::default());
        session.dispatch(DashboardEvent::SetTopN(1)).unwrap();
        assert_eq!(session.selection().top_n, 5);
        session.dispatch(DashboardEvent::SetTopN(50)).unwrap();
        assert_eq!(session.selection().top_n, 20);
    }

    #[test]
    fn inverted_top_n_bounds_do_not_panic() {
        let config = DashboardConfig {
            top_n: TopNConfig {
                min: 10,
                max: 3,
                default: 5,
            },
            ..DashboardConfig::default()
        };
        let mut session = Session::from_table(nordic_table(), &config);
        assert_eq!(session.selection().top_n, 10);
        session.dispatch(DashboardEvent::SetTopN(7)).unwrap();
        assert_eq!(session.artifacts().top.as_ref().unwrap().len(), 3);
    }

    #[test]
    fn set_countries_drops_repeated_keys() {
        let mut session = Session::from_table(nordic_table(), &DashboardConfig::default());
        session
            .dispatch(DashboardEvent::SetCountries(vec![
                "Norway".to_string(),
                "Norway".to_string(),
                "Finland".to_string(),
            ]))
            .unwrap();
        assert_eq!(session.selection().countries, ["Norway", "Finland"]);

        session
            .dispatch(DashboardEvent::ToggleCountry("Norway".to_string()))
            .unwrap();
        assert_eq!(session.selection().countries, ["Finland"]);
        assert_eq!(session.artifacts().view.countries(), vec!["Finland"]);
    }

    #[test]
    fn scatter_colour_key_ignores_other_selections() {
        let mut session = Session::from_table(nordic_table(), &DashboardConfig::default());
        let norway = |s: &Session| {
            s.artifacts()
                .scatter
                .as_ref()
                .unwrap()
                .points
                .iter()
                .find(|p| p.country == "Norway")
                .map(|p| p.key_index)
        };
        assert_eq!(norway(&session), Some(2));

        session
            .dispatch(DashboardEvent::ToggleCountry("Finland".to_string()))
            .unwrap();
        assert_eq!(norway(&session), Some(2));
    }

    #[test]
    fn derive_is_a_pure_function_of_its_inputs() {
        let table = nordic_table();
        let selection = Selection::initial(&table, &DashboardConfig::default());
        let a = derive(&table, &selection);
        let b = derive(&table, &selection);
        assert_eq!(a.view, b.view);
        assert_eq!(a.scatter, b.scatter);
        assert_eq!(a.top, b.top);
    }

    #[test]
    fn overview_averages_configured_columns() {
        let overview = Overview::compute(&nordic_table(), &DashboardConfig::default());
        assert_eq!(overview.averages.len(), 2);
        assert_eq!(overview.averages[0].0, "score");
        let gdp = overview.averages[1].1.as_ref().unwrap();
        assert!((gdp - 1.35).abs() < 1e-9);
        assert_eq!(overview.correlation.as_ref().unwrap().size(), 2);
    }
}
