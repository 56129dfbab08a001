use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};

use log::warn;
use tokio::fs;

use crate::custom_error::{file_not_found_err, CustomResult};

/// 路径存在且是普通文件
pub async fn exists(path: &Path) -> bool {
    match fs::metadata(path).await {
        Ok(meta) => meta.is_file(),
        Err(_) => false,
    }
}

/// 读取整个文件，文件不存在时返回 not found 错误
pub async fn read_to_string(path: &Path) -> CustomResult<String> {
    match fs::read_to_string(path).await {
        Ok(s) => Ok(s),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Err(file_not_found_err(path)),
        Err(e) => Err(e.into()),
    }
}

/// 仅当 `path` 不存在时写入，返回是否由本次调用创建。
///
/// 内容先完整写入同目录下的临时文件，再通过硬链接放到目标路径；
/// 硬链接在目标已存在时失败，因此读者永远看不到写了一半的文件。
pub async fn write_new(path: &Path, contents: &[u8]) -> CustomResult<bool> {
    let tmp = tmp_path(path);
    fs::write(&tmp, contents).await?;

    let linked = fs::hard_link(&tmp, path).await;
    if let Err(e) = fs::remove_file(&tmp).await {
        warn!("删除临时文件失败:{:?},{}", tmp, e);
    }

    match linked {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => Ok(false),
        Err(e) => Err(e.into()),
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(OsString::new);
    name.push(format!(".tmp-{:016x}", rand::random::<u64>()));
    path.with_file_name(name)
}
