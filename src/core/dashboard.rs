//! Grafana dashboard generation.
//!
//! A [`DashboardSpec`] is plain configuration: metadata plus an ordered list
//! of panel definitions. [`build_dashboard`] expands it into the document
//! Grafana's import API expects, numbering panels from 1 in list order.

use crate::domain::ports::Storage;
use crate::utils::error::{LoadError, Result};
use crate::utils::validation::{validate_non_empty_string, validate_path, Validate};
use serde::{Deserialize, Serialize};

pub const DEFAULT_OUTPUT_FILE: &str = "grafana_dashboard.json";
pub const DEFAULT_Y_AXIS_FORMAT: &str = "ms";

/// One entry of the panel catalogue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PanelDef {
    pub title: String,
    pub expr: String,
    #[serde(default = "default_y_axis_format")]
    pub y_axis_format: String,
}

fn default_y_axis_format() -> String {
    DEFAULT_Y_AXIS_FORMAT.to_string()
}

impl PanelDef {
    pub fn new(title: impl Into<String>, expr: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            expr: expr.into(),
            y_axis_format: default_y_axis_format(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardSpec {
    pub title: String,
    pub tags: Vec<String>,
    pub timezone: String,
    pub schema_version: u32,
    pub version: u32,
    pub refresh: String,
    pub datasource: String,
    pub overwrite: bool,
    pub panels: Vec<PanelDef>,
}

impl Default for DashboardSpec {
    fn default() -> Self {
        Self {
            title: "API Monitoring Dashboard".to_string(),
            tags: vec!["API".to_string(), "Monitoring".to_string()],
            timezone: "browser".to_string(),
            schema_version: 16,
            version: 1,
            refresh: "5s".to_string(),
            datasource: "Prometheus".to_string(),
            overwrite: true,
            panels: default_panels(),
        }
    }
}

impl Validate for DashboardSpec {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("dashboard.title", &self.title)?;
        validate_non_empty_string("dashboard.datasource", &self.datasource)?;
        if self.panels.is_empty() {
            return Err(LoadError::ConfigError {
                message: "dashboard must define at least one panel".to_string(),
            });
        }
        for (index, panel) in self.panels.iter().enumerate() {
            validate_non_empty_string(&format!("panels[{}].title", index), &panel.title)?;
            validate_non_empty_string(&format!("panels[{}].expr", index), &panel.expr)?;
            validate_non_empty_string(
                &format!("panels[{}].y_axis_format", index),
                &panel.y_axis_format,
            )?;
        }
        Ok(())
    }
}

/// Latency, throughput, error, JVM, connection pool and cache panels for a
/// Spring Boot service scraped by Prometheus.
pub fn default_panels() -> Vec<PanelDef> {
    [
        (
            "Latency (99th Percentile)",
            "histogram_quantile(0.99, sum(rate(http_server_requests_seconds_bucket[5m])) by (le, uri))",
        ),
        ("Request Rate (per min)", "rate(http_server_requests_total[1m])"),
        (
            "Request Duration (95th Percentile)",
            "histogram_quantile(0.95, sum(rate(http_server_requests_seconds_bucket[5m])) by (le, uri))",
        ),
        (
            "Request Errors (4xx)",
            r#"sum(rate(http_server_requests_total{status=~"4.."}[5m])) by (uri)"#,
        ),
        (
            "Request Errors (5xx)",
            r#"sum(rate(http_server_requests_total{status=~"5.."}[5m])) by (uri)"#,
        ),
        (
            "Request Duration (Median)",
            "histogram_quantile(0.50, sum(rate(http_server_requests_seconds_bucket[5m])) by (le, uri))",
        ),
        (
            "Active Requests",
            "sum(http_server_requests_active_seconds_gcount) by (uri)",
        ),
        ("Max Request Time", "max(http_server_requests_seconds_max) by (uri)"),
        ("Min Request Time", "min(http_server_requests_seconds_max) by (uri)"),
        (
            "Request Success Rate",
            r#"sum(rate(http_server_requests_total{status=~"2.."}[5m])) by (uri)"#,
        ),
        (
            "Request Count by Status Code",
            "sum(rate(http_server_requests_total[5m])) by (status)",
        ),
        (
            "Total Request Count",
            "sum(rate(http_server_requests_total[5m])) by (uri)",
        ),
        ("JVM Memory Usage", "jvm_memory_used_bytes"),
        ("JVM CPU Usage", "process_cpu_usage"),
        ("System Load Average", "system_load_average_1m"),
        ("Active Threads", "jvm_threads_live_threads"),
        ("Idle Connections", "jdbc_connections_idle"),
        ("Active Connections", "jdbc_connections_active"),
        (
            "Database Query Duration",
            "sum(rate(spring_data_repository_invocations_seconds_sum[1m])) by (repository)",
        ),
        (
            "Cache Hits and Misses",
            "sum(rate(cache_gets_total[5m])) by (result)",
        ),
    ]
    .into_iter()
    .map(|(title, expr)| PanelDef::new(title, expr))
    .collect()
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardDocument {
    pub dashboard: Dashboard,
    pub overwrite: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub id: Option<u64>,
    pub uid: Option<String>,
    pub title: String,
    pub tags: Vec<String>,
    pub timezone: String,
    pub schema_version: u32,
    pub version: u32,
    pub refresh: String,
    pub panels: Vec<Panel>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Panel {
    #[serde(rename = "type")]
    pub kind: String,
    pub title: String,
    pub id: u32,
    pub datasource: String,
    pub targets: Vec<Target>,
    pub xaxis: XAxis,
    pub yaxes: Vec<YAxis>,
    pub lines: bool,
    pub fill: u32,
    pub linewidth: u32,
    pub legend: Legend,
    pub grid_pos: GridPos,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Target {
    pub expr: String,
    pub interval_factor: u32,
    pub ref_id: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct XAxis {
    pub mode: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct YAxis {
    pub format: String,
    pub label: String,
    pub log_base: u32,
    pub show: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct Legend {
    pub show: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct GridPos {
    pub h: u32,
    pub w: u32,
    pub x: u32,
    pub y: u32,
}

impl Panel {
    fn from_def(def: &PanelDef, id: u32, datasource: &str) -> Self {
        Self {
            kind: "graph".to_string(),
            title: def.title.clone(),
            id,
            datasource: datasource.to_string(),
            targets: vec![Target {
                expr: def.expr.clone(),
                interval_factor: 2,
                ref_id: "A".to_string(),
            }],
            xaxis: XAxis {
                mode: "time".to_string(),
            },
            yaxes: vec![YAxis {
                format: def.y_axis_format.clone(),
                label: "Time".to_string(),
                log_base: 1,
                show: true,
            }],
            lines: true,
            fill: 1,
            linewidth: 1,
            legend: Legend { show: true },
            grid_pos: GridPos {
                h: 9,
                w: 12,
                x: 0,
                y: 0,
            },
        }
    }
}

pub fn build_dashboard(spec: &DashboardSpec) -> DashboardDocument {
    let panels = spec
        .panels
        .iter()
        .zip(1u32..)
        .map(|(def, id)| Panel::from_def(def, id, &spec.datasource))
        .collect();

    DashboardDocument {
        dashboard: Dashboard {
            id: None,
            uid: None,
            title: spec.title.clone(),
            tags: spec.tags.clone(),
            timezone: spec.timezone.clone(),
            schema_version: spec.schema_version,
            version: spec.version,
            refresh: spec.refresh.clone(),
            panels,
        },
        overwrite: spec.overwrite,
    }
}

pub fn render_dashboard(spec: &DashboardSpec) -> Result<String> {
    Ok(serde_json::to_string_pretty(&build_dashboard(spec))?)
}

/// Validates, renders and stores the dashboard. Returns where it was written.
pub async fn write_dashboard<S: Storage>(
    storage: &S,
    spec: &DashboardSpec,
    file_name: &str,
) -> Result<String> {
    validate_path("output", file_name)?;
    spec.validate()?;

    let json = render_dashboard(spec)?;
    tracing::debug!(
        "Rendered dashboard '{}' with {} panels ({} bytes)",
        spec.title,
        spec.panels.len(),
        json.len()
    );

    storage.write_file(file_name, json.as_bytes()).await
}
