use anyhow::Result;
use tempfile::TempDir;
use txn_loadgen::core::dashboard::{default_panels, DEFAULT_OUTPUT_FILE};
use txn_loadgen::{write_dashboard, DashboardSpec, LocalStorage};

const EXPECTED_EXPRESSIONS: [&str; 20] = [
    "histogram_quantile(0.99, sum(rate(http_server_requests_seconds_bucket[5m])) by (le, uri))",
    "rate(http_server_requests_total[1m])",
    "histogram_quantile(0.95, sum(rate(http_server_requests_seconds_bucket[5m])) by (le, uri))",
    r#"sum(rate(http_server_requests_total{status=~"4.."}[5m])) by (uri)"#,
    r#"sum(rate(http_server_requests_total{status=~"5.."}[5m])) by (uri)"#,
    "histogram_quantile(0.50, sum(rate(http_server_requests_seconds_bucket[5m])) by (le, uri))",
    "sum(http_server_requests_active_seconds_gcount) by (uri)",
    "max(http_server_requests_seconds_max) by (uri)",
    "min(http_server_requests_seconds_max) by (uri)",
    r#"sum(rate(http_server_requests_total{status=~"2.."}[5m])) by (uri)"#,
    "sum(rate(http_server_requests_total[5m])) by (status)",
    "sum(rate(http_server_requests_total[5m])) by (uri)",
    "jvm_memory_used_bytes",
    "process_cpu_usage",
    "system_load_average_1m",
    "jvm_threads_live_threads",
    "jdbc_connections_idle",
    "jdbc_connections_active",
    "sum(rate(spring_data_repository_invocations_seconds_sum[1m])) by (repository)",
    "sum(rate(cache_gets_total[5m])) by (result)",
];

#[tokio::test]
async fn test_default_dashboard_file() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let output_dir = temp_dir.path().to_str().unwrap().to_string();
    let storage = LocalStorage::new(output_dir);

    let written = write_dashboard(&storage, &DashboardSpec::default(), DEFAULT_OUTPUT_FILE).await?;

    let full_path = temp_dir.path().join("grafana_dashboard.json");
    assert!(full_path.exists());
    assert!(written.ends_with("grafana_dashboard.json"));

    let content = std::fs::read_to_string(&full_path)?;
    // pretty printed with two-space indentation
    assert!(content.starts_with("{\n  \"dashboard\": {"));

    let json: serde_json::Value = serde_json::from_str(&content)?;
    assert_eq!(json["dashboard"]["title"], "API Monitoring Dashboard");
    assert_eq!(json["dashboard"]["tags"], serde_json::json!(["API", "Monitoring"]));
    assert_eq!(json["dashboard"]["version"], 1);
    assert_eq!(json["overwrite"], true);

    let panels = json["dashboard"]["panels"].as_array().unwrap();
    assert_eq!(panels.len(), 20);
    for (index, panel) in panels.iter().enumerate() {
        assert_eq!(panel["id"], index as u64 + 1);
        assert_eq!(panel["targets"][0]["expr"], EXPECTED_EXPRESSIONS[index]);
        assert_eq!(panel["title"], default_panels()[index].title.as_str());
        assert_eq!(panel["yaxes"][0]["format"], "ms");
    }
    Ok(())
}

#[tokio::test]
async fn test_dashboard_from_toml_file() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let config_path = temp_dir.path().join("dashboard.toml");
    std::fs::write(
        &config_path,
        r#"
title = "Ledger"
datasource = "Mimir"

[[panels]]
title = "Heap"
expr = "jvm_memory_used_bytes"
y_axis_format = "bytes"
"#,
    )?;

    let spec = DashboardSpec::from_file(&config_path)?;
    let storage = LocalStorage::new(temp_dir.path().join("out").to_str().unwrap().to_string());
    write_dashboard(&storage, &spec, "ledger.json").await?;

    let content = std::fs::read_to_string(temp_dir.path().join("out/ledger.json"))?;
    let json: serde_json::Value = serde_json::from_str(&content)?;
    let panels = json["dashboard"]["panels"].as_array().unwrap();

    assert_eq!(json["dashboard"]["title"], "Ledger");
    assert_eq!(panels.len(), 1);
    assert_eq!(panels[0]["id"], 1);
    assert_eq!(panels[0]["datasource"], "Mimir");
    assert_eq!(panels[0]["yaxes"][0]["format"], "bytes");
    Ok(())
}
