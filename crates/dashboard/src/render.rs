//! Plain-text chart rendering.
//!
//! Every renderer is a pure function of a fully-present payload.

use taskdash_core::{DurationAnalysis, HourlyCount, StatusCount, WeeklyCompletion};

use crate::view::{Dashboard, Panel};

/// Page title.
pub const TITLE: &str = "Task Analytics Dashboard";

/// Width of the longest bar, in cells.
const BAR_WIDTH: usize = 30;

/// Heatmap glyphs, least to most active.
const HEAT_LEVELS: [char; 5] = ['·', '░', '▒', '▓', '█'];

/// Bar of `value` scaled against `max`.
fn bar(value: u64, max: u64, width: usize) -> String {
    if max == 0 || value == 0 {
        return String::new();
    }
    let cells = ((value as f64 / max as f64) * width as f64).round() as usize;
    "█".repeat(cells.clamp(1, width))
}

/// Heatmap glyph for `value` relative to `max`.
fn heat(value: u64, max: u64) -> char {
    if max == 0 || value == 0 {
        return HEAT_LEVELS[0];
    }
    let top = HEAT_LEVELS.len() - 1;
    let level = ((value as f64 / max as f64) * top as f64).ceil() as usize;
    HEAT_LEVELS[level.clamp(1, top)]
}

/// One glyph per week, darker for more completions.
pub fn render_heatmap(weeks: &[WeeklyCompletion]) -> String {
    let (Some(first), Some(last)) = (weeks.first(), weeks.last()) else {
        return "No activity recorded\n".to_string();
    };
    let max = weeks.iter().map(|w| w.completed).max().unwrap_or(0);
    let strip: String = weeks.iter().map(|w| heat(w.completed, max)).collect();
    let legend: String = HEAT_LEVELS.iter().collect();

    format!(
        "{}\n{} .. {}\nLess {} More\n",
        strip, first.week, last.week, legend
    )
}

/// Completion rate per week.
pub fn render_completion_trend(weeks: &[WeeklyCompletion]) -> String {
    let label_width = weeks.iter().map(|w| w.week.len()).max().unwrap_or(0);
    weeks
        .iter()
        .map(|week| match week.rate() {
            Some(rate) => {
                let percent = (rate * 100.0).round() as u64;
                format!(
                    "{:<width$}  {:<bar_width$}  {:>3}%\n",
                    week.week,
                    bar(percent, 100, BAR_WIDTH),
                    percent,
                    width = label_width,
                    bar_width = BAR_WIDTH,
                )
            }
            None => format!(
                "{:<width$}  {} completed\n",
                week.week,
                week.completed,
                width = label_width,
            ),
        })
        .collect()
}

/// Tasks per status, with each status' share of the total.
pub fn render_status_distribution(items: &[StatusCount]) -> String {
    let total = items.iter().fold(0u64, |sum, i| sum.saturating_add(i.count));
    let max = items.iter().map(|i| i.count).max().unwrap_or(0);
    let label_width = items.iter().map(|i| i.status.len()).max().unwrap_or(0);

    items
        .iter()
        .map(|item| {
            let share = if total > 0 {
                (item.count as f64 / total as f64 * 100.0).round() as u64
            } else {
                0
            };
            format!(
                "{:<width$}  {:<bar_width$}  {} ({}%)\n",
                item.status,
                bar(item.count, max, BAR_WIDTH),
                item.count,
                share,
                width = label_width,
                bar_width = BAR_WIDTH,
            )
        })
        .collect()
}

/// Task creation for each hour of the day; missing hours count as zero.
pub fn render_productivity_by_hour(hours: &[HourlyCount]) -> String {
    let mut counts = [0u64; 24];
    for entry in hours.iter().filter(|h| h.hour < 24) {
        counts[entry.hour as usize] = counts[entry.hour as usize].saturating_add(entry.count);
    }
    let max = counts.iter().copied().max().unwrap_or(0);

    counts
        .iter()
        .enumerate()
        .map(|(hour, count)| {
            format!(
                "{:02}:00  {:<bar_width$}  {}\n",
                hour,
                bar(*count, max, BAR_WIDTH),
                count,
                bar_width = BAR_WIDTH,
            )
        })
        .collect()
}

/// Duration analysis, as received.
pub fn render_duration(analysis: &DurationAnalysis) -> String {
    let mut out = serde_json::to_string_pretty(analysis.as_value())
        .unwrap_or_else(|_| analysis.as_value().to_string());
    out.push('\n');
    out
}

/// Render one chart.
pub fn render_panel(panel: &Panel<'_>) -> String {
    match panel {
        Panel::ActivityHeatmap(weeks) => render_heatmap(weeks),
        Panel::CompletionTrend(weeks) => render_completion_trend(weeks),
        Panel::StatusDistribution(items) => render_status_distribution(items),
        Panel::ProductivityByHour(hours) => render_productivity_by_hour(hours),
        Panel::TaskDuration(analysis) => render_duration(analysis),
    }
}

/// Render the full dashboard: title, warning banner, summary cards, charts.
pub fn render_dashboard(dashboard: &Dashboard) -> String {
    let mut out = format!("{}\n{}\n", TITLE, "=".repeat(TITLE.len()));

    if let Some(banner) = dashboard.banner {
        out.push_str(&format!("\n! {}\n", banner));
    }

    out.push_str(&format!(
        "\nTask Success Rate      {}%  completed successfully\n\
         Total Tasks            {}  tasks created\n\
         Avg. Completion Time   {}  hours\n",
        dashboard.metrics.success_rate,
        dashboard.metrics.total_tasks,
        dashboard.avg_completion_display(),
    ));

    for panel in dashboard.panels() {
        let title = panel.kind().title();
        out.push_str(&format!("\n{}\n{}\n", title, "-".repeat(title.len())));
        out.push_str(&render_panel(&panel));
    }

    out
}

/// Render the blocking error panel.
pub fn render_error(message: &str) -> String {
    format!("Error\n-----\n{}\n", message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use taskdash_core::{
        AggregateOutcome, CompletionStats, ProductivityPatterns, SourceFailure, SourceKind,
        PARTIAL_MESSAGE,
    };

    fn week(label: &str, completed: u64, total: Option<u64>) -> WeeklyCompletion {
        WeeklyCompletion {
            week: label.to_string(),
            completed,
            total,
            completion_rate: None,
        }
    }

    #[test]
    fn test_bar_scaling() {
        assert_eq!(bar(0, 10, 30), "");
        assert_eq!(bar(5, 0, 30), "");
        assert_eq!(bar(10, 10, 30).chars().count(), 30);
        assert_eq!(bar(5, 10, 30).chars().count(), 15);
        // Small non-zero values stay visible
        assert_eq!(bar(1, 1000, 30).chars().count(), 1);
    }

    #[test]
    fn test_heat_levels() {
        assert_eq!(heat(0, 10), '·');
        assert_eq!(heat(1, 10), '░');
        assert_eq!(heat(10, 10), '█');
        assert_eq!(heat(3, 0), '·');
    }

    #[test]
    fn test_heatmap() {
        let out = render_heatmap(&[week("w1", 0, None), week("w2", 4, None), week("w3", 8, None)]);
        let lines: Vec<_> = out.lines().collect();
        assert_eq!(lines[0], "·▒█");
        assert_eq!(lines[1], "w1 .. w3");
        assert!(lines[2].starts_with("Less"));

        assert_eq!(render_heatmap(&[]), "No activity recorded\n");
    }

    #[test]
    fn test_completion_trend() {
        let out = render_completion_trend(&[week("2024-01-01", 3, Some(4)), week("2024-01-08", 2, None)]);
        let lines: Vec<_> = out.lines().collect();
        assert!(lines[0].starts_with("2024-01-01"));
        assert!(lines[0].ends_with(" 75%"));
        assert_eq!(lines[1], "2024-01-08  2 completed");
    }

    #[test]
    fn test_status_distribution_shares() {
        let out = render_status_distribution(&[
            StatusCount::new("success", 7),
            StatusCount::new("failure", 3),
        ]);
        let lines: Vec<_> = out.lines().collect();
        assert!(lines[0].starts_with("success"));
        assert!(lines[0].ends_with("7 (70%)"));
        assert!(lines[1].ends_with("3 (30%)"));
    }

    #[test]
    fn test_productivity_fills_every_hour() {
        let out = render_productivity_by_hour(&[
            HourlyCount { hour: 9, count: 5 },
            HourlyCount { hour: 30, count: 99 },
        ]);
        let lines: Vec<_> = out.lines().collect();
        assert_eq!(lines.len(), 24);
        assert!(lines[0].starts_with("00:00"));
        assert!(lines[9].ends_with(" 5"));
        assert!(lines[23].ends_with(" 0"));
    }

    #[test]
    fn test_duration_passthrough() {
        let out = render_duration(&DurationAnalysis(json!({ "median_hours": 3 })));
        assert!(out.contains("\"median_hours\": 3"));
    }

    #[test]
    fn test_dashboard_omits_missing_panels() {
        let outcome = AggregateOutcome::from_results(
            Ok(CompletionStats {
                status_distribution: Some(vec![StatusCount::new("success", 1)]),
                weekly_completion: None,
            }),
            Err(SourceFailure::new(SourceKind::ProductivityPatterns, "down")),
            Ok(DurationAnalysis(json!({}))),
        );
        let out = render_dashboard(&Dashboard::new(outcome));

        assert!(out.starts_with(TITLE));
        assert!(out.contains(PARTIAL_MESSAGE));
        assert!(out.contains("Task Success Rate      100%"));
        assert!(out.contains("Avg. Completion Time   0  hours"));
        assert!(out.contains("Task Status Distribution"));
        assert!(out.contains("Task Duration Analysis"));
        assert!(!out.contains("Task Activity Heatmap"));
        assert!(!out.contains("Completion Rate Trend"));
        assert!(!out.contains("Productivity by Hour"));
    }

    #[test]
    fn test_dashboard_without_banner() {
        let outcome = AggregateOutcome::from_results(
            Ok(CompletionStats::default()),
            Ok(ProductivityPatterns {
                avg_completion_time_hours: Some(12.04),
                creation_hour_distribution: None,
            }),
            Ok(DurationAnalysis(json!(null))),
        );
        let out = render_dashboard(&Dashboard::new(outcome));
        assert!(!out.contains('!'));
        assert!(out.contains("Avg. Completion Time   12.0  hours"));
        assert!(out.contains("Total Tasks            0  tasks created"));
    }

    #[test]
    fn test_dashboard_header_and_cards() {
        let outcome = AggregateOutcome::from_results(
            Ok(CompletionStats {
                status_distribution: Some(vec![
                    StatusCount::new("success", 7),
                    StatusCount::new("failure", 3),
                ]),
                weekly_completion: None,
            }),
            Err(SourceFailure::new(SourceKind::ProductivityPatterns, "down")),
            Err(SourceFailure::new(SourceKind::DurationAnalysis, "down")),
        );
        let out = render_dashboard(&Dashboard::new(outcome));
        let lines: Vec<_> = out.lines().collect();

        assert_eq!(lines[0], TITLE);
        assert_eq!(lines[1], "=".repeat(TITLE.len()));
        assert_eq!(lines[2], "");
        assert_eq!(lines[3], format!("! {}", PARTIAL_MESSAGE));
        assert_eq!(lines[4], "");
        assert_eq!(lines[5], "Task Success Rate      70%  completed successfully");
        assert_eq!(lines[6], "Total Tasks            10  tasks created");
        assert_eq!(lines[7], "Avg. Completion Time   0  hours");
        assert_eq!(lines[8], "");
        assert_eq!(lines[9], "Task Status Distribution");
        assert!(out.ends_with("3 (30%)\n"));
    }

    #[test]
    fn test_error_panel() {
        assert_eq!(render_error("nope"), "Error\n-----\nnope\n");
    }
}
