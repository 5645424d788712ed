use std::fs::File;
use std::str::FromStr;
use std::sync::{Once, atomic::{AtomicBool, Ordering}};

static INIT_LOGGER: Once = Once::new();
static LOGGER_INITIALIZED: AtomicBool = AtomicBool::new(false);

/// 初始化日志。终端由显示端占用，所以默认写入日志文件
pub fn init_logger(log_file: Option<&str>, level: &str) {
    if !LOGGER_INITIALIZED.load(Ordering::SeqCst) {
        INIT_LOGGER.call_once(|| {
            let mut builder = env_logger::Builder::from_default_env();
            #[cfg(not(test))]
            {
                if let Some(path) = log_file {
                    if let Ok(file) = File::create(path) {
                        builder.target(env_logger::Target::Pipe(Box::new(file)));
                    }
                }
            }
            #[cfg(test)]
            let _ = log_file;
            if std::env::var_os("RUST_LOG").is_none() {
                let filter = log::LevelFilter::from_str(level).unwrap_or(log::LevelFilter::Info);
                builder.filter_level(filter);
            }
            let _ = builder.try_init();
            LOGGER_INITIALIZED.store(true, Ordering::SeqCst);
        });
    }
}

pub fn is_initialized() -> bool {
    LOGGER_INITIALIZED.load(Ordering::SeqCst)
}
