use std::env;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::custom_error::CustomResult;
use crate::store;

pub const ENV_DATA_DIR: &str = "CSV2GRAFANA_DATA_DIR";
pub const ENV_LISTEN_ADDR: &str = "CSV2GRAFANA_LISTEN";
pub const ENV_STRICT_NUMBERS: &str = "CSV2GRAFANA_STRICT_NUMBERS";

const DEFAULT_DATA_DIR: &str = "./data";
const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:3000";

/// 进程配置
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Config {
    // csv 根目录，文件位于 <data_dir>/<dataset>/<file>
    pub data_dir: String,
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,
    // 非数字字段报错而不是按 0 处理
    #[serde(default)]
    pub strict_numbers: bool,
}

fn default_listen_addr() -> String {
    DEFAULT_LISTEN_ADDR.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Config {
            data_dir: DEFAULT_DATA_DIR.to_string(),
            listen_addr: default_listen_addr(),
            strict_numbers: false,
        }
    }
}

impl Config {
    /// 读取 json 格式的配置文件
    pub async fn from_file(path: &Path) -> CustomResult<Config> {
        let content = store::read_to_string(path).await?;
        Ok(serde_json::from_str(&content)?)
    }

    /// 从环境变量读取，未设置的项使用默认值
    pub fn from_env() -> Config {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Config
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();
        if let Some(dir) = lookup(ENV_DATA_DIR) {
            config.data_dir = dir;
        }
        if let Some(addr) = lookup(ENV_LISTEN_ADDR) {
            config.listen_addr = addr;
        }
        if let Some(strict) = lookup(ENV_STRICT_NUMBERS) {
            config.strict_numbers = matches!(strict.trim(), "1" | "true" | "yes");
        }
        config
    }
}
