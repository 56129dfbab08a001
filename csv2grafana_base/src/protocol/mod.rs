use std::path::{Path, PathBuf};

use log::{debug, info};
use serde_json::Value;

use crate::config::Config;
use crate::custom_error::{file_not_found_err, invalid_request_err, malformed_query_err, CustomResult};
use crate::ds::{self, descriptor, ParsePolicy};
use crate::protocol::request::{QueryRequest, Target};
use crate::series::{self, TimeSeries};

pub mod request;

pub const CSV_SUFFIX: &str = ".csv";

/// 所有响应都要带上的跨域头，由传输层统一添加
pub const CORS_HEADERS: [(&str, &str); 3] = [
    ("Access-Control-Allow-Origin", "*"),
    ("Access-Control-Allow-Methods", "POST"),
    ("Access-Control-Allow-Headers", "accept, content-type"),
];

/// simple json datasource 协议的处理，每个请求独立读取文件，不做缓存
#[derive(Debug, Clone)]
pub struct QueryHandler {
    data_dir: PathBuf,
    policy: ParsePolicy,
}

impl QueryHandler {
    pub fn new(data_dir: PathBuf, policy: ParsePolicy) -> QueryHandler {
        QueryHandler { data_dir, policy }
    }

    pub fn from_config(config: &Config) -> QueryHandler {
        let policy = if config.strict_numbers {
            ParsePolicy::Strict
        } else {
            ParsePolicy::Lossy
        };
        QueryHandler::new(PathBuf::from(&config.data_dir), policy)
    }

    /// `<data_dir>/<dataset>/<file>`，拒绝带路径分隔符的名称
    pub fn resolve_path(&self, dataset: &str, file: &str) -> CustomResult<PathBuf> {
        check_segment(dataset)?;
        check_segment(file)?;
        Ok(self.data_dir.join(dataset).join(file))
    }

    /// 连接测试，文件名必须以 .csv 结尾，只检查文件是否存在
    pub async fn probe(&self, path: &Path) -> CustomResult<()> {
        let is_csv = path
            .file_name()
            .and_then(|n| n.to_str())
            .map_or(false, |n| n.ends_with(CSV_SUFFIX));
        if !is_csv {
            return Err(invalid_request_err(format!("只支持csv文件:{:?}", path)));
        }
        if crate::store::exists(path).await {
            Ok(())
        } else {
            Err(file_not_found_err(path))
        }
    }

    /// 可查询的列名，按 index 升序，不含时间戳列
    pub async fn search(&self, path: &Path) -> CustomResult<Vec<String>> {
        let descr = descriptor::resolve(path).await?;
        Ok(descr
            .value_columns()
            .into_iter()
            .map(|c| c.name.clone())
            .collect())
    }

    pub fn annotations(&self) -> Vec<Value> {
        Vec::new()
    }

    pub fn tag_keys(&self) -> Vec<Value> {
        Vec::new()
    }

    pub fn tag_values(&self) -> Vec<Value> {
        Vec::new()
    }

    /// 按请求的顺序返回每个 timeserie 目标的数据；找不到的列直接跳过，table 目标暂不支持。
    /// targets 为空时返回 not found。
    pub async fn query(&self, path: &Path, request: &QueryRequest) -> CustomResult<Vec<TimeSeries>> {
        let targets = request.targets();
        if targets.is_empty() {
            return Err(malformed_query_err("targets 为空"));
        }

        let dataset = ds::load(path, self.policy).await?;
        let descr = descriptor::resolve(path).await?;
        let window = request.window();
        info!(
            "query:{:?}, targets:{}, from:{:?}, to:{:?}",
            path,
            targets.len(),
            window.from,
            window.to
        );

        let points = series::project(&descr, &dataset, &window);
        let mut result = Vec::new();
        for target in targets {
            match target {
                Target::Timeserie { target } => match descr.find_value_column(target) {
                    Some(column) => {
                        let datapoints = points.get(&column.index).cloned().unwrap_or_default();
                        result.push(TimeSeries {
                            target: column.name.clone(),
                            datapoints,
                        });
                    }
                    None => debug!("目标列不存在:{}", target),
                },
                Target::Table { target } => debug!("暂不支持table查询:{}", target),
            }
        }
        Ok(result)
    }
}

fn check_segment(segment: &str) -> CustomResult<()> {
    if segment.is_empty()
        || segment == "."
        || segment == ".."
        || segment.contains(|c: char| c == '/' || c == '\\' || c == '\0')
    {
        return Err(invalid_request_err(format!("非法的路径:{:?}", segment)));
    }
    Ok(())
}
