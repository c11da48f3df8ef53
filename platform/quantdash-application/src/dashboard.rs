//! The composed dashboard: one load state feeding both the chart and the
//! metrics panel.

use crate::chart::ChartModel;
use crate::formatting::FormattedMetrics;
use crate::loading::LoadState;
use crate::series::{normalize_series, LabelTimezone, SeriesPoint};
use quantdash_domain::entities::backtest_result::BacktestResult;
use quantdash_domain::errors::LoadError;
use std::sync::Arc;

/// Everything the loaded screen draws, derived from a single snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardModel {
    pub result: Arc<BacktestResult>,
    pub series: Vec<SeriesPoint>,
    pub chart: ChartModel,
    pub metrics: FormattedMetrics,
}

impl DashboardModel {
    pub fn build(result: Arc<BacktestResult>, timezone: LabelTimezone) -> Self {
        let series = normalize_series(&result.equity_curve, timezone);
        let chart = ChartModel::from_series(&series);
        let metrics = FormattedMetrics::from_metrics(&result.metrics);
        Self {
            result,
            series,
            chart,
            metrics,
        }
    }

    pub fn to_json(&self, strategy_id: &str) -> serde_json::Value {
        serde_json::json!({
            "status": "ok",
            "strategy": strategy_id,
            "points": self.series.len(),
            "metrics": self.result.metrics,
            "cards": self.metrics.cards(),
            "series": self.series,
        })
    }
}

/// What the view should draw right now.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Screen<'a> {
    Loading,
    Error(&'a str),
    Loaded(&'a DashboardModel),
}

#[derive(Debug, Clone)]
pub struct Dashboard {
    state: LoadState,
    model: Option<DashboardModel>,
    timezone: LabelTimezone,
}

impl Dashboard {
    pub fn new(timezone: LabelTimezone) -> Self {
        Self {
            state: LoadState::new(),
            model: None,
            timezone,
        }
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    /// Settles the load state and, on success, derives the display model.
    /// Returns `false` when the dashboard had already settled.
    pub fn apply(&mut self, outcome: Result<BacktestResult, LoadError>) -> bool {
        if !self.state.settle(outcome) {
            return false;
        }
        if let LoadState::Loaded(result) = &self.state {
            self.model = Some(DashboardModel::build(result.clone(), self.timezone));
        }
        true
    }

    pub fn screen(&self) -> Screen<'_> {
        match (&self.state, &self.model) {
            (LoadState::Loaded(_), Some(model)) => Screen::Loaded(model),
            (LoadState::Error(msg), _) => Screen::Error(msg.as_str()),
            _ => Screen::Loading,
        }
    }

    pub fn model(&self) -> Option<&DashboardModel> {
        self.model.as_ref()
    }
}
