use std::path::Path;
use std::sync::Arc;

use log::{info, warn};
use tokio::net::TcpListener;

use csv2grafana_base::config::Config;
use csv2grafana_base::custom_error::CustomResult;
use csv2grafana_base::protocol::QueryHandler;

use crate::router::create_routes;

pub struct Node {
    pub config: Config,
    pub handler: QueryHandler,
}

pub async fn create_and_init(config: Config) -> CustomResult<Node> {
    if tokio::fs::metadata(&config.data_dir).await.is_err() {
        warn!("数据目录不存在:{}", config.data_dir);
    }
    Ok(Node {
        handler: QueryHandler::from_config(&config),
        config,
    })
}

/// 绑定端口并处理请求，直到进程退出
pub async fn serve(config: Config) -> CustomResult<()> {
    let node = Arc::new(create_and_init(config).await?);
    let listener = TcpListener::bind(node.config.listen_addr.as_str()).await?;
    info!(
        "csv2grafana 启动, 监听:{}, 数据目录:{:?}, 严格解析:{}",
        node.config.listen_addr,
        Path::new(&node.config.data_dir),
        node.config.strict_numbers
    );

    axum::serve(listener, create_routes(node)).await?;
    Ok(())
}
