use std::path::PathBuf;
use std::sync::Once;

pub mod config;
pub mod custom_error;
pub mod ds;
pub mod protocol;
pub mod series;
pub mod store;

static LOG_INIT: Once = Once::new();

/// 从 crate 目录下的 log4rs.yaml 初始化日志，重复调用只生效一次
pub fn init_log() {
    LOG_INIT.call_once(|| {
        let mut config_path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
        config_path.push("log4rs.yaml");
        if let Err(e) = log4rs::init_file(&config_path, Default::default()) {
            eprintln!("初始化日志失败:{:?},{}", config_path, e);
        }
    });
}
