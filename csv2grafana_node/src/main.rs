use std::env;
use std::path::Path;

use csv2grafana_base::config::Config;
use csv2grafana_base::custom_error::CustomResult;

use csv2grafana_node::node;

/// 用法: csv2grafana_node [config.json]，不传时从环境变量读取配置
#[tokio::main]
async fn main() -> CustomResult<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match env::args().nth(1) {
        Some(path) => Config::from_file(Path::new(&path)).await?,
        None => Config::from_env(),
    };
    node::serve(config).await
}
