// Global chart template and per-entity cloning
use super::chart::{new_id, ChartConfig, ChartGroup, ChartKind, DataKey};

/// One group of the built-in template holding a single chart
struct DefaultGroup {
    slug: &'static str,
    group_name: &'static str,
    chart_name: &'static str,
    kind: ChartKind,
    x_axis: &'static str,
    y_axis: &'static [&'static str],
    data_key: DataKey,
}

const DEFAULT_GROUPS: &[DefaultGroup] = &[
    DefaultGroup {
        slug: "revenue",
        group_name: "Revenue",
        chart_name: "Revenue Trend",
        kind: ChartKind::Line,
        x_axis: "date",
        y_axis: &["revenue", "adRevenue", "iapRevenue"],
        data_key: DataKey::Revenue,
    },
    DefaultGroup {
        slug: "users",
        group_name: "Users",
        chart_name: "User Growth",
        kind: ChartKind::Area,
        x_axis: "date",
        y_axis: &["totalUsers", "newUsers"],
        data_key: DataKey::Users,
    },
    DefaultGroup {
        slug: "retention",
        group_name: "Retention",
        chart_name: "Retention Curve",
        kind: ChartKind::Line,
        x_axis: "day",
        y_axis: &["retention"],
        data_key: DataKey::Retention,
    },
    DefaultGroup {
        slug: "countries",
        group_name: "Countries",
        chart_name: "Revenue by Country",
        kind: ChartKind::Bar,
        x_axis: "country",
        y_axis: &["revenue"],
        data_key: DataKey::Countries,
    },
    DefaultGroup {
        slug: "versions",
        group_name: "Versions",
        chart_name: "Users by Version",
        kind: ChartKind::Bar,
        x_axis: "version",
        y_axis: &["users"],
        data_key: DataKey::Versions,
    },
];

/// Built-in template used when no global template has been stored
pub fn default_template() -> Vec<ChartGroup> {
    DEFAULT_GROUPS
        .iter()
        .zip(0u32..)
        .map(|(group, order)| group.build(order))
        .collect()
}

impl DefaultGroup {
    fn build(&self, order: u32) -> ChartGroup {
        let group_id = format!("default-{}", self.slug);
        ChartGroup {
            id: group_id.clone(),
            name: self.group_name.to_string(),
            order,
            charts: vec![ChartConfig {
                id: format!("default-{}-chart", self.slug),
                name: self.chart_name.to_string(),
                kind: self.kind,
                x_axis: self.x_axis.to_string(),
                y_axis: self.y_axis.iter().map(|f| f.to_string()).collect(),
                group_id,
                order: 0,
                data_key: self.data_key,
            }],
        }
    }
}

/// Deep copy of `groups` where every group and chart gets a new id.
/// Charts are re-pointed at their copied group.
pub fn clone_with_fresh_ids(groups: &[ChartGroup]) -> Vec<ChartGroup> {
    groups
        .iter()
        .map(|group| {
            let group_id = new_id();
            let charts = group
                .charts
                .iter()
                .map(|chart| ChartConfig {
                    id: new_id(),
                    group_id: group_id.clone(),
                    ..chart.clone()
                })
                .collect();

            ChartGroup {
                id: group_id,
                name: group.name.clone(),
                order: group.order,
                charts,
            }
        })
        .collect()
}
