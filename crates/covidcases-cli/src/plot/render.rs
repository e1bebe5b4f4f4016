use chrono::{Datelike, NaiveDate};
use covidcases_core::CaseTable;
use ratatui::{
    layout::{Constraint, Direction, Layout},
    symbols,
    text::{Line, Span},
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph},
    Frame,
};

use super::styles;

/// Everything the chart needs, precomputed from a table so redraws are cheap.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartData {
    /// (area name, points) with x = days since the Common Era
    pub series: Vec<(String, Vec<(f64, f64)>)>,
    pub x_bounds: [f64; 2],
    pub y_bounds: [f64; 2],
    pub x_labels: Vec<String>,
    pub y_labels: Vec<String>,
}

fn day_number(date: NaiveDate) -> f64 {
    date.num_days_from_ce() as f64
}

fn format_y(value: f64, span: f64) -> String {
    if span <= 10.0 {
        format!("{:.2}", value)
    } else {
        format!("{:.0}", value)
    }
}

impl ChartData {
    pub fn from_table(table: &CaseTable) -> Self {
        let series: Vec<(String, Vec<(f64, f64)>)> = table
            .columns()
            .iter()
            .enumerate()
            .map(|(i, name)| {
                let points = table
                    .rows()
                    .iter()
                    .filter_map(|row| row.values[i].map(|v| (day_number(row.date), v)))
                    .collect();
                (name.clone(), points)
            })
            .collect();

        let dates: Vec<NaiveDate> = table.dates().collect();
        let (x_bounds, x_labels) = match (dates.first(), dates.last()) {
            (Some(&first), Some(&last)) => {
                let middle = dates[dates.len() / 2];
                let mut labels: Vec<String> = [first, middle, last]
                    .iter()
                    .map(|d| d.format("%Y-%m-%d").to_string())
                    .collect();
                labels.dedup();
                let hi = day_number(last).max(day_number(first) + 1.0);
                ([day_number(first), hi], labels)
            }
            _ => ([0.0, 1.0], Vec::new()),
        };

        let (lo, hi) = table
            .values()
            .fold((0.0_f64, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));
        let hi = if hi.is_finite() && hi > lo { hi } else { lo + 1.0 };
        let span = hi - lo;
        let y_labels = [lo, lo + span / 2.0, hi]
            .iter()
            .map(|v| format_y(*v, span))
            .collect();

        Self {
            series,
            x_bounds,
            y_bounds: [lo, hi],
            x_labels,
            y_labels,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.series.iter().all(|(_, points)| points.is_empty())
    }
}

pub fn render(frame: &mut Frame, data: &ChartData, title: &str) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(5),    // Chart
            Constraint::Length(1), // Key hints
        ])
        .split(frame.area());

    let block = Block::default()
        .title(Span::styled(format!(" {} ", title), styles::title_style()))
        .borders(Borders::ALL)
        .border_style(styles::muted_style());

    if data.is_empty() {
        let empty = Paragraph::new("No data to plot").block(block);
        frame.render_widget(empty, chunks[0]);
    } else {
        let datasets: Vec<Dataset> = data
            .series
            .iter()
            .enumerate()
            .map(|(i, (name, points))| {
                Dataset::default()
                    .name(name.as_str())
                    .marker(symbols::Marker::Braille)
                    .graph_type(GraphType::Line)
                    .style(styles::series_style(i))
                    .data(points)
            })
            .collect();

        let chart = Chart::new(datasets)
            .block(block)
            .x_axis(
                Axis::default()
                    .title("Date")
                    .style(styles::muted_style())
                    .bounds(data.x_bounds)
                    .labels(data.x_labels.iter().map(String::as_str)),
            )
            .y_axis(
                Axis::default()
                    .title("Cases")
                    .style(styles::muted_style())
                    .bounds(data.y_bounds)
                    .labels(data.y_labels.iter().map(String::as_str)),
            )
            .hidden_legend_constraints((Constraint::Ratio(1, 2), Constraint::Ratio(1, 2)));
        frame.render_widget(chart, chunks[0]);
    }

    let hints = Line::from(vec![
        Span::styled(" [q]", styles::help_key_style()),
        Span::styled(" quit", styles::muted_style()),
    ]);
    frame.render_widget(Paragraph::new(hints), chunks[1]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use covidcases_core::{CaseKind, CaseRecord};
    use ratatui::{backend::TestBackend, Terminal};

    fn table() -> CaseTable {
        let record = |day: u32, area: &str, cum: Option<i64>| CaseRecord {
            date: NaiveDate::from_ymd_opt(2020, 4, day).unwrap(),
            area_name: area.to_string(),
            area_code: None,
            new_cases: None,
            cum_cases: cum,
            new_deaths: None,
            cum_deaths: None,
        };
        CaseTable::from_records(
            &[
                record(1, "London", Some(100)),
                record(2, "London", Some(150)),
                record(3, "London", Some(200)),
                record(2, "Wales", None),
                record(3, "Wales", Some(40)),
            ],
            CaseKind::Cumulative,
        )
    }

    #[test]
    fn test_chart_data_from_table() {
        let data = ChartData::from_table(&table());
        assert_eq!(data.series.len(), 2);
        assert_eq!(data.series[0].0, "London");
        assert_eq!(data.series[0].1.len(), 3);
        // Empty cells are skipped, not plotted as zero
        assert_eq!(data.series[1].1.len(), 1);
        assert_eq!(data.series[1].1[0].1, 40.0);

        assert_eq!(data.y_bounds, [0.0, 200.0]);
        assert_eq!(data.x_bounds[1] - data.x_bounds[0], 2.0);
        assert_eq!(data.x_labels, vec!["2020-04-01", "2020-04-02", "2020-04-03"]);
        assert_eq!(data.y_labels, vec!["0", "100", "200"]);
    }

    #[test]
    fn test_chart_data_empty_table() {
        let data = ChartData::from_table(&CaseTable::default());
        assert!(data.is_empty());
        assert_eq!(data.y_bounds, [0.0, 1.0]);
        assert!(data.x_labels.is_empty());
    }

    #[test]
    fn test_normalised_labels_keep_decimals() {
        let table = covidcases_core::transform::normalise(table()).unwrap();
        let data = ChartData::from_table(&table);
        assert_eq!(data.y_bounds, [0.0, 1.0]);
        assert_eq!(data.y_labels, vec!["0.00", "0.50", "1.00"]);
    }

    #[test]
    fn test_render_draws_title_and_hints() {
        let data = ChartData::from_table(&table());
        let mut terminal = Terminal::new(TestBackend::new(80, 20)).unwrap();
        terminal.draw(|f| render(f, &data, "Cumulative cases")).unwrap();

        let buffer = terminal.backend().buffer();
        let text: String = buffer.content().iter().map(|c| c.symbol()).collect();
        assert!(text.contains("Cumulative cases"));
        assert!(text.contains("quit"));
    }
}
