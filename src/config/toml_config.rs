use crate::utils::error::{WatchError, Result};
use crate::utils::validation::{
    self, validate_id_range, validate_non_empty_string, validate_positive_number, validate_url,
    Validate,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::ops::RangeInclusive;
use std::path::Path;
use std::time::Duration;

const DEFAULT_TIMEOUT_SECONDS: u64 = 20;
const DEFAULT_CYCLE_SLEEP_SECONDS: u64 = 300;
const DEFAULT_TELEGRAM_API_BASE: &str = "https://api.telegram.org";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatchConfig {
    pub watch: WatchInfo,
    pub target: TargetConfig,
    pub scan: ScanConfig,
    pub telegram: TelegramConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatchInfo {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetConfig {
    pub endpoint: String,
    pub id_field: String,
    pub timeout_seconds: Option<u64>,
    pub headers: Option<HashMap<String, String>>,
    pub cookies: Option<HashMap<String, String>>,
    pub form_fields: Option<HashMap<String, String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanConfig {
    pub id_start: u32,
    pub id_end: u32,
    pub marker: String,
    pub cycle_sleep_seconds: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelegramConfig {
    pub bot_token: String,
    pub chat_id: String,
    pub api_base: Option<String>,
}

impl WatchConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(WatchError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        // 處理環境變數替換
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| WatchError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${TELEGRAM_BOT_TOKEN})
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").unwrap();

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        validate_non_empty_string("watch.name", &self.watch.name)?;

        validate_url("target.endpoint", &self.target.endpoint)?;
        validate_non_empty_string("target.id_field", &self.target.id_field)?;
        if let Some(timeout) = self.target.timeout_seconds {
            validate_positive_number("target.timeout_seconds", timeout, 1)?;
        }

        validate_id_range("scan", self.scan.id_start, self.scan.id_end)?;
        validate_non_empty_string("scan.marker", &self.scan.marker)?;
        if let Some(sleep) = self.scan.cycle_sleep_seconds {
            validate_positive_number("scan.cycle_sleep_seconds", sleep, 1)?;
        }

        validate_non_empty_string("telegram.bot_token", &self.telegram.bot_token)?;
        validate_non_empty_string("telegram.chat_id", &self.telegram.chat_id)?;
        if let Some(api_base) = &self.telegram.api_base {
            validate_url("telegram.api_base", api_base)?;
        }

        // 未替換的環境變數代表缺少 secret
        validation::validate_env_substituted("telegram.bot_token", &self.telegram.bot_token)?;
        validation::validate_env_substituted("telegram.chat_id", &self.telegram.chat_id)?;
        if let Some(cookies) = &self.target.cookies {
            for (name, value) in cookies {
                validation::validate_env_substituted(
                    &format!("target.cookies.{}", name),
                    value,
                )?;
            }
        }

        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.target.timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECONDS))
    }

    pub fn cycle_sleep(&self) -> Duration {
        Duration::from_secs(
            self.scan
                .cycle_sleep_seconds
                .unwrap_or(DEFAULT_CYCLE_SLEEP_SECONDS),
        )
    }

    pub fn id_range(&self) -> RangeInclusive<u32> {
        self.scan.id_start..=self.scan.id_end
    }

    pub fn id_count(&self) -> u64 {
        u64::from(self.scan.id_end) - u64::from(self.scan.id_start) + 1
    }

}

impl TelegramConfig {
    pub fn api_base_url(&self) -> &str {
        self.api_base.as_deref().unwrap_or(DEFAULT_TELEGRAM_API_BASE)
    }
}

impl Validate for WatchConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
