use std::path::{Path, PathBuf};

use log::{debug, info};

use crate::custom_error::{empty_schema_err, CustomResult};
use crate::ds::column::DatasetDescriptor;
use crate::store;

pub const SIDECAR_SUFFIX: &str = ".descr.json";

/// 描述文件路径：`<file>.descr.json`
pub fn sidecar_path(path: &Path) -> PathBuf {
    let mut p = path.as_os_str().to_os_string();
    p.push(SIDECAR_SUFFIX);
    PathBuf::from(p)
}

/// 根据最后一个非空行的字段数推断列描述，只依赖文件内容。
/// 没有非空行时返回 None。
pub fn infer_descriptor(content: &str) -> Option<DatasetDescriptor> {
    let last_line = content.lines().rev().find(|l| !l.trim().is_empty())?;
    let count = last_line.split(',').count();
    Some(DatasetDescriptor::with_column_count(count))
}

/// 读取描述文件；不存在时从 csv 推断并落盘。
///
/// 描述文件一旦存在就不再和 csv 对比，列数以第一次推断为准。
pub async fn resolve(path: &Path) -> CustomResult<DatasetDescriptor> {
    let descr_path = sidecar_path(path);
    if store::exists(&descr_path).await {
        return read_sidecar(&descr_path).await;
    }

    let content = store::read_to_string(path).await?;
    let descr = infer_descriptor(&content).ok_or_else(|| empty_schema_err(path))?;
    let bytes = serde_json::to_vec(&descr)?;

    if store::write_new(&descr_path, &bytes).await? {
        info!("生成描述文件:{:?}, 列数:{}", descr_path, descr.columns.len());
        Ok(descr)
    } else {
        // 并发请求已经先写入，以已有文件为准
        debug!("描述文件已被其它请求创建:{:?}", descr_path);
        read_sidecar(&descr_path).await
    }
}

async fn read_sidecar(descr_path: &Path) -> CustomResult<DatasetDescriptor> {
    let content = store::read_to_string(descr_path).await?;
    Ok(serde_json::from_str(&content)?)
}
