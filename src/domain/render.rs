// Chart dispatch: maps a bound chart onto the input shape of a visualization
use super::chart::ChartKind;
use super::dataset::{BoundChart, FieldValue};
use super::format::ValueFormatter;
use serde::Serialize;

pub const PALETTE: [&str; 5] = ["#8884d8", "#82ca9d", "#ffc658", "#ff7300", "#0088fe"];

pub fn palette_color(index: usize) -> &'static str {
    PALETTE[index % PALETTE.len()]
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PointView {
    /// Missing when the row has no such field
    pub value: Option<FieldValue>,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesView {
    pub field: String,
    pub color: &'static str,
    pub points: Vec<PointView>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartesianView {
    pub x_axis: String,
    pub categories: Vec<Option<FieldValue>>,
    pub series: Vec<SeriesView>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SliceView {
    pub name: String,
    pub value: f64,
    pub label: String,
    pub color: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "render", rename_all = "camelCase")]
pub enum ChartView {
    Line(CartesianView),
    Bar(CartesianView),
    Area(CartesianView),
    Pie { slices: Vec<SliceView> },
    /// Placeholder shown instead of a chart that cannot be drawn
    Unavailable { reason: String },
}

impl ChartView {
    pub fn unavailable(reason: impl ToString) -> Self {
        ChartView::Unavailable {
            reason: reason.to_string(),
        }
    }
}

pub fn render_chart(chart: BoundChart<'_>, formatter: &ValueFormatter) -> ChartView {
    match chart.config.kind {
        ChartKind::Line => ChartView::Line(cartesian(chart, formatter)),
        ChartKind::Bar => ChartView::Bar(cartesian(chart, formatter)),
        ChartKind::Area => ChartView::Area(cartesian(chart, formatter)),
        ChartKind::Pie => ChartView::Pie {
            slices: pie_slices(chart, formatter),
        },
    }
}

fn cartesian(chart: BoundChart<'_>, formatter: &ValueFormatter) -> CartesianView {
    let config = chart.config;
    let series = config
        .y_axis
        .iter()
        .enumerate()
        .map(|(index, field)| {
            let points = chart
                .dataset
                .column(field)
                .into_iter()
                .map(|value| {
                    let label = value
                        .as_ref()
                        .map(|v| formatter.format(field, v))
                        .unwrap_or_default();
                    PointView { value, label }
                })
                .collect();

            SeriesView {
                field: field.clone(),
                color: palette_color(index),
                points,
            }
        })
        .collect();

    CartesianView {
        x_axis: config.x_axis.clone(),
        categories: chart.dataset.column(&config.x_axis),
        series,
    }
}

fn pie_slices(chart: BoundChart<'_>, formatter: &ValueFormatter) -> Vec<SliceView> {
    chart
        .config
        .y_axis
        .iter()
        .enumerate()
        .map(|(index, field)| {
            let total: f64 = chart
                .dataset
                .column(field)
                .iter()
                .filter_map(|v| v.as_ref().and_then(FieldValue::as_f64))
                .sum();

            SliceView {
                name: field.clone(),
                value: total,
                label: formatter.format(field, &FieldValue::Number(total)),
                color: palette_color(index),
            }
        })
        .collect()
}
