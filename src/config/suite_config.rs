use crate::harness::condition::HostOs;
use crate::utils::error::{ContactError, Result};
use crate::utils::validation::{validate_non_empty_string, validate_path, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SuiteConfig {
    #[serde(default)]
    pub runner: RunnerConfig,
    /// Variables that shadow the process environment during a run.
    #[serde(default)]
    pub environment: HashMap<String, String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunnerConfig {
    #[serde(default = "default_resource_root")]
    pub resource_root: String,
    pub filter: Option<String>,
    pub host_os: Option<String>,
}

fn default_resource_root() -> String {
    "resources".to_string()
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            resource_root: default_resource_root(),
            filter: None,
            host_os: None,
        }
    }
}

impl SuiteConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(ContactError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        let config: Self = toml::from_str(&processed_content).map_err(|e| ContactError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// 替換環境變數 (例如 ${DEPLOY_ENV})，未設定者保留原文
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| ContactError::ConfigError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// Configured OS override, or the detected host OS.
    pub fn host_os(&self) -> Result<HostOs> {
        match &self.runner.host_os {
            Some(name) => name.parse(),
            None => Ok(HostOs::current()),
        }
    }
}

impl Validate for SuiteConfig {
    fn validate(&self) -> Result<()> {
        validate_path("runner.resource_root", &self.runner.resource_root)?;
        self.host_os()?;

        if let Some(filter) = &self.runner.filter {
            validate_non_empty_string("runner.filter", filter)?;
        }

        for key in self.environment.keys() {
            validate_non_empty_string("environment", key)?;
        }

        Ok(())
    }
}
