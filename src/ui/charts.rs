use eframe::egui::{Color32, Ui};
use egui_plot::{Bar, BarChart, Legend, Line, Plot, PlotPoints, Points};

use quantum_dash::data::model::{
    CompanyRecord, InvestmentFlowRecord, MarketProjectionRecord, RegionalRecord,
};

use crate::color::{self, generate_palette};

const CHART_HEIGHT: f32 = 220.0;

// ---------------------------------------------------------------------------
// Chart input: labels + numeric series
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub name: String,
    pub color: Color32,
    pub values: Vec<f64>,
}

/// Input of every chart adapter. `series[i].values[j]` belongs to
/// `labels[j]`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ChartData {
    pub labels: Vec<String>,
    pub series: Vec<Series>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Bubble {
    pub label: String,
    pub x: f64,
    pub y: f64,
    pub radius: f32,
    pub color: Color32,
}

pub fn market_chart_data(records: &[MarketProjectionRecord]) -> ChartData {
    let series = |name: &str, color, value: fn(&MarketProjectionRecord) -> f64| Series {
        name: name.to_string(),
        color,
        values: records.iter().map(value).collect(),
    };
    ChartData {
        labels: records.iter().map(|r| r.year.to_string()).collect(),
        series: vec![
            series("Conservative", color::BLUE, |r| r.conservative),
            series("Moderate", color::GREEN, |r| r.moderate),
            series("Aggressive", color::RED, |r| r.aggressive),
        ],
    }
}

pub fn regional_chart_data(records: &[RegionalRecord]) -> ChartData {
    ChartData {
        labels: records.iter().map(|r| r.region.clone()).collect(),
        series: vec![Series {
            name: "Market share (%)".to_string(),
            color: color::BLUE,
            values: records.iter().map(|r| r.share).collect(),
        }],
    }
}

pub fn investment_chart_data(records: &[InvestmentFlowRecord]) -> ChartData {
    let series = |name: &str, color, value: fn(&InvestmentFlowRecord) -> f64| Series {
        name: name.to_string(),
        color,
        values: records.iter().map(value).collect(),
    };
    ChartData {
        labels: records.iter().map(|r| r.year.to_string()).collect(),
        series: vec![
            series("VC", color::BLUE, |r| r.vc),
            series("Government", color::GREEN, |r| r.government),
            series("Corporate", color::YELLOW, |r| r.corporate),
        ],
    }
}

/// Market cap on x, revenue on y, bubble size from headcount. Missing
/// figures plot at zero.
pub fn company_bubbles(records: &[CompanyRecord]) -> Vec<Bubble> {
    records
        .iter()
        .map(|c| Bubble {
            label: c.name.clone(),
            x: c.market_cap.unwrap_or(0.0),
            y: c.revenue.unwrap_or(0.0),
            radius: (c.employees as f32).sqrt() / 20.0,
            color: color::technology_color(c.technology),
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Redraw operations
// ---------------------------------------------------------------------------

fn label_x(labels: &[String], i: usize) -> f64 {
    labels
        .get(i)
        .and_then(|l| l.parse::<f64>().ok())
        .unwrap_or(i as f64)
}

/// Line per series; numeric labels (years) are used as x positions.
pub fn redraw_line_chart(ui: &mut Ui, id: &str, data: &ChartData) {
    Plot::new(id)
        .legend(Legend::default())
        .height(CHART_HEIGHT)
        .x_axis_label("Year")
        .y_axis_label("USD M")
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            for series in &data.series {
                let points: PlotPoints = series
                    .values
                    .iter()
                    .enumerate()
                    .map(|(i, &v)| [label_x(&data.labels, i), v])
                    .collect();
                plot_ui.line(Line::new(points).name(&series.name).color(series.color).width(2.0));
            }
        });
}

/// One bar per label, each in its own colour so the legend reads like a
/// doughnut key.
pub fn redraw_share_chart(ui: &mut Ui, id: &str, data: &ChartData) {
    let Some(series) = data.series.first() else {
        return;
    };
    let palette = generate_palette(data.labels.len());

    Plot::new(id)
        .legend(Legend::default())
        .height(CHART_HEIGHT)
        .y_axis_label("%")
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            for (i, (label, &value)) in data.labels.iter().zip(&series.values).enumerate() {
                let color = palette.get(i).copied().unwrap_or(color::SLATE);
                let bar = Bar::new(i as f64, value).name(label).width(0.7);
                plot_ui.bar_chart(BarChart::new(vec![bar]).name(label).color(color));
            }
        });
}

/// Series stacked on top of each other per label.
pub fn redraw_stacked_bars(ui: &mut Ui, id: &str, data: &ChartData) {
    Plot::new(id)
        .legend(Legend::default())
        .height(CHART_HEIGHT)
        .x_axis_label("Year")
        .y_axis_label("USD M")
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            let mut charts: Vec<BarChart> = Vec::with_capacity(data.series.len());
            for series in &data.series {
                let bars = series
                    .values
                    .iter()
                    .enumerate()
                    .map(|(i, &v)| Bar::new(label_x(&data.labels, i), v).width(0.6))
                    .collect();
                let below: Vec<&BarChart> = charts.iter().collect();
                let chart = BarChart::new(bars)
                    .name(&series.name)
                    .color(series.color)
                    .stack_on(&below);
                charts.push(chart);
            }
            for chart in charts {
                plot_ui.bar_chart(chart);
            }
        });
}

pub fn redraw_bubble_chart(ui: &mut Ui, id: &str, bubbles: &[Bubble]) {
    Plot::new(id)
        .legend(Legend::default())
        .height(CHART_HEIGHT)
        .x_axis_label("Market cap (USD B)")
        .y_axis_label("Revenue (USD M)")
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            for bubble in bubbles {
                plot_ui.points(
                    Points::new(vec![[bubble.x, bubble.y]])
                        .name(&bubble.label)
                        .radius(bubble.radius)
                        .color(bubble.color.gamma_multiply(0.7)),
                );
            }
        });
}

#[cfg(test)]
mod tests {
    use super::*;
    use quantum_dash::data::model::{Confidence, Dataset, Technology};

    #[test]
    fn market_chart_has_three_scenarios() {
        let records = vec![MarketProjectionRecord {
            year: 2024,
            conservative: 1.0,
            moderate: 2.0,
            aggressive: 3.0,
            sources: 1,
            confidence: Confidence::High,
        }];
        let data = market_chart_data(&records);
        assert_eq!(data.labels, vec!["2024"]);
        assert_eq!(data.series.len(), 3);
        assert_eq!(data.series[2].values, vec![3.0]);
    }

    #[test]
    fn investment_series_line_up_with_years() {
        let ds = Dataset::embedded();
        let data = investment_chart_data(&ds.investment_flows);
        assert_eq!(data.labels.len(), 6);
        for series in &data.series {
            assert_eq!(series.values.len(), data.labels.len());
        }
        assert_eq!(label_x(&data.labels, 0), 2020.0);
    }

    #[test]
    fn regional_chart_uses_region_labels() {
        let ds = Dataset::embedded();
        let data = regional_chart_data(&ds.regional);
        assert_eq!(data.labels[0], "North America");
        assert_eq!(data.series[0].values[0], 37.6);
        assert_eq!(label_x(&data.labels, 2), 2.0);
    }

    #[test]
    fn bubbles_default_missing_figures_to_zero() {
        let companies = vec![CompanyRecord {
            name: "IonQ".into(),
            revenue: None,
            market_cap: Some(2.5),
            employees: 400,
            technology: Technology::TrappedIon,
            confidence: Confidence::Medium,
            kind: "Primary".into(),
        }];
        let bubbles = company_bubbles(&companies);
        assert_eq!(bubbles[0].x, 2.5);
        assert_eq!(bubbles[0].y, 0.0);
        assert_eq!(bubbles[0].radius, 1.0);
        assert_eq!(bubbles[0].color, color::RED);
    }
}
