use crate::core::dashboard::DashboardSpec;
use crate::utils::error::{LoadError, Result};
use regex::Regex;
use std::path::Path;

impl DashboardSpec {
    /// 從 TOML 檔案載入儀表板定義
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(LoadError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// Fields missing from the document keep their defaults; a document
    /// without `[[panels]]` keeps the built-in catalogue.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| LoadError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }
}

/// 替換環境變數 (例如 ${GRAFANA_DATASOURCE})；未設定的變數保持原樣
fn substitute_env_vars(content: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| LoadError::ConfigError {
        message: format!("invalid substitution pattern: {}", e),
    })?;

    let result = re.replace_all(content, |caps: &regex::Captures| {
        let var_name = &caps[1];
        std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
    });

    Ok(result.to_string())
}
