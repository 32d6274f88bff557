//! Dashboard view model and its activation lifecycle.

use serde::Serialize;
use taskdash_client::AnalyticsSource;
use taskdash_core::{
    derive_metrics, format_avg_completion, AggregateOutcome, DerivedMetrics, DurationAnalysis,
    HourlyCount, OutcomeStatus, StatusCount, WeeklyCompletion,
};
use tracing::debug;

use crate::aggregator::Aggregator;

/// Lifecycle of one dashboard activation.
#[derive(Debug, Clone, Default)]
pub enum ViewState {
    /// Not activated yet
    #[default]
    Idle,
    /// Waiting for the aggregation cycle to settle
    Loading,
    /// At least one source loaded
    Ready(Box<Dashboard>),
    /// Every source failed; carries the blocking message
    Errored(String),
}

/// Input to [`ViewState::transition`].
#[derive(Debug, Clone)]
pub enum ViewEvent {
    /// The view was activated
    Started,
    /// The aggregation cycle settled
    Settled(AggregateOutcome),
}

impl ViewState {
    /// Apply one event.
    ///
    /// `Idle -> Loading -> Ready | Errored`. Any other pairing leaves the state
    /// as it is; there is no refresh transition.
    pub fn transition(self, event: ViewEvent) -> ViewState {
        match (self, event) {
            (ViewState::Idle, ViewEvent::Started) => ViewState::Loading,
            (ViewState::Loading, ViewEvent::Settled(outcome)) => match outcome.status {
                OutcomeStatus::AllFailed => ViewState::Errored(
                    outcome.message().unwrap_or_default().to_string(),
                ),
                OutcomeStatus::AllOk | OutcomeStatus::PartialOk => {
                    ViewState::Ready(Box::new(Dashboard::new(outcome)))
                }
            },
            (state, event) => {
                debug!("Ignoring {} event in state {}", event_name(&event), state.name());
                state
            }
        }
    }

    /// Short state name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            ViewState::Idle => "idle",
            ViewState::Loading => "loading",
            ViewState::Ready(_) => "ready",
            ViewState::Errored(_) => "errored",
        }
    }
}

fn event_name(event: &ViewEvent) -> &'static str {
    match event {
        ViewEvent::Started => "started",
        ViewEvent::Settled(_) => "settled",
    }
}

/// Activate a view: run one aggregation cycle and return the settled state.
pub async fn activate<S: AnalyticsSource>(aggregator: &Aggregator<S>) -> ViewState {
    let state = ViewState::Idle.transition(ViewEvent::Started);
    let outcome = aggregator.aggregate().await;
    state.transition(ViewEvent::Settled(outcome))
}

/// A renderable dashboard: the outcome plus everything derived from it.
#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    /// The aggregated data
    pub outcome: AggregateOutcome,

    /// Headline metrics
    pub metrics: DerivedMetrics,

    /// Non-blocking warning shown above the content
    pub banner: Option<&'static str>,
}

impl Dashboard {
    /// Build the view model for an outcome.
    pub fn new(outcome: AggregateOutcome) -> Self {
        let metrics = derive_metrics(&outcome);
        let banner = match outcome.status {
            OutcomeStatus::PartialOk => outcome.message(),
            _ => None,
        };
        Self {
            outcome,
            metrics,
            banner,
        }
    }

    /// Average completion time card value.
    pub fn avg_completion_display(&self) -> String {
        format_avg_completion(
            self.outcome
                .productivity_patterns
                .as_ref()
                .and_then(|p| p.avg_completion_time_hours),
        )
    }

    /// The chart for `kind`, if its input is present.
    pub fn panel(&self, kind: PanelKind) -> Option<Panel<'_>> {
        let completion = self.outcome.completion_stats.as_ref();
        match kind {
            PanelKind::ActivityHeatmap => completion
                .and_then(|c| c.weekly_completion.as_deref())
                .map(Panel::ActivityHeatmap),
            PanelKind::CompletionTrend => completion
                .and_then(|c| c.weekly_completion.as_deref())
                .map(Panel::CompletionTrend),
            PanelKind::StatusDistribution => completion
                .and_then(|c| c.status_distribution.as_deref())
                .map(Panel::StatusDistribution),
            PanelKind::ProductivityByHour => self
                .outcome
                .productivity_patterns
                .as_ref()
                .and_then(|p| p.creation_hour_distribution.as_deref())
                .map(Panel::ProductivityByHour),
            PanelKind::TaskDuration => self
                .outcome
                .duration_analysis
                .as_ref()
                .map(Panel::TaskDuration),
        }
    }

    /// Present charts, in page order.
    pub fn panels(&self) -> Vec<Panel<'_>> {
        PanelKind::ALL
            .iter()
            .filter_map(|kind| self.panel(*kind))
            .collect()
    }
}

/// The five chart slots of the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PanelKind {
    /// Weekly activity heatmap
    ActivityHeatmap,
    /// Completion rate per week
    CompletionTrend,
    /// Tasks per status
    StatusDistribution,
    /// Task creation per hour of day
    ProductivityByHour,
    /// Duration analysis
    TaskDuration,
}

impl PanelKind {
    /// All panels, in page order.
    pub const ALL: [PanelKind; 5] = [
        PanelKind::ActivityHeatmap,
        PanelKind::CompletionTrend,
        PanelKind::StatusDistribution,
        PanelKind::ProductivityByHour,
        PanelKind::TaskDuration,
    ];

    /// Panel heading.
    pub fn title(&self) -> &'static str {
        match self {
            PanelKind::ActivityHeatmap => "Task Activity Heatmap",
            PanelKind::CompletionTrend => "Completion Rate Trend",
            PanelKind::StatusDistribution => "Task Status Distribution",
            PanelKind::ProductivityByHour => "Productivity by Hour",
            PanelKind::TaskDuration => "Task Duration Analysis",
        }
    }
}

/// A chart with its fully-present input.
#[derive(Debug, Clone, Copy)]
pub enum Panel<'a> {
    /// Weekly activity heatmap
    ActivityHeatmap(&'a [WeeklyCompletion]),
    /// Completion rate per week
    CompletionTrend(&'a [WeeklyCompletion]),
    /// Tasks per status
    StatusDistribution(&'a [StatusCount]),
    /// Task creation per hour of day
    ProductivityByHour(&'a [HourlyCount]),
    /// Duration analysis
    TaskDuration(&'a DurationAnalysis),
}

impl Panel<'_> {
    /// Which slot this chart fills.
    pub fn kind(&self) -> PanelKind {
        match self {
            Panel::ActivityHeatmap(_) => PanelKind::ActivityHeatmap,
            Panel::CompletionTrend(_) => PanelKind::CompletionTrend,
            Panel::StatusDistribution(_) => PanelKind::StatusDistribution,
            Panel::ProductivityByHour(_) => PanelKind::ProductivityByHour,
            Panel::TaskDuration(_) => PanelKind::TaskDuration,
        }
    }
}
