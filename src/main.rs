mod display;

use clap::Parser;
use display::{JsonDisplay, TerminalDisplay};
use log::{error, info};
use netmon_core::util::log::init_logger;
use netmon_core::{Classifier, Config, FrameSource, LogDiagnostics, Monitor, MonitorError, Result};
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(author, version, about = "被动监听网卡流量，实时统计协议分布、MAC/IP地址和吞吐量")]
struct Args {
    /// 监听的网卡名，覆盖配置文件
    interface: Option<String>,

    /// JSON 配置文件
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// 以 JSON 行输出统计快照，不使用终端界面
    #[arg(long, default_value_t = false)]
    json: bool,

    /// 开启混杂模式
    #[arg(short, long, default_value_t = false)]
    promiscuous: bool,

    /// 显示刷新间隔（毫秒）
    #[arg(long)]
    refresh_ms: Option<u64>,

    /// 日志文件
    #[arg(long)]
    log_file: Option<String>,

    /// 按 IHL 校验 IPv4 头部长度
    #[arg(long, default_value_t = false)]
    strict_ipv4: bool,
}

fn build_config(args: &Args) -> Result<Config> {
    let mut config = match &args.config {
        Some(path) => Config::from_json_file(path)?,
        None => Config::default(),
    };
    if let Some(interface) = &args.interface {
        config.interface = interface.clone();
    }
    if let Some(refresh_ms) = args.refresh_ms {
        config.refresh_interval_ms = refresh_ms;
    }
    if let Some(log_file) = &args.log_file {
        config.log_file = Some(log_file.clone());
    }
    config.promiscuous |= args.promiscuous;
    config.strict_ipv4_header_len |= args.strict_ipv4;
    config.validate()?;
    Ok(config)
}

#[cfg(target_os = "linux")]
fn open_source(config: &Config) -> Result<Box<dyn FrameSource + Send>> {
    Ok(Box::new(netmon_core::RawSocketSource::open(config)?))
}

#[cfg(not(target_os = "linux"))]
fn open_source(_config: &Config) -> Result<Box<dyn FrameSource + Send>> {
    Err(MonitorError::SourceUnavailable("仅支持Linux原始套接字".to_string()))
}

fn monitor_loop(
    config: Config,
    source: Box<dyn FrameSource + Send>,
    json: bool,
    cancel: &AtomicBool,
) -> Result<()> {
    let refresh = Duration::from_millis(config.refresh_interval_ms);
    let classifier = Classifier::new(config.strict_ipv4_header_len);

    if json {
        let display = JsonDisplay::new(io::stdout(), refresh);
        let mut monitor = Monitor::with_classifier(source, display, LogDiagnostics::new(), classifier);
        monitor.run(cancel)
    } else {
        let display = TerminalDisplay::new(refresh, config.max_packet_lines)?;
        let mut monitor = Monitor::with_classifier(source, display, LogDiagnostics::new(), classifier);
        let result = monitor.run(cancel);
        info!("异常报告总数: {}", monitor.diagnostics().reported());
        result
    }
}

async fn run(args: Args) -> Result<()> {
    let config = build_config(&args)?;
    init_logger(config.log_file.as_deref(), &config.log_level);
    info!("启动监控: {:?}", config);

    let source = open_source(&config)?;

    let cancel = Arc::new(AtomicBool::new(false));
    let flag = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("收到中断信号，停止监控");
            flag.store(true, Ordering::Relaxed);
        }
    });

    let json = args.json;
    let handle = tokio::task::spawn_blocking(move || monitor_loop(config, source, json, &cancel));
    handle
        .await
        .map_err(|e| MonitorError::IoError(io::Error::new(io::ErrorKind::Other, e)))?
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("监控失败: {}", e);
            eprintln!("netmon: {}", e);
            ExitCode::FAILURE
        }
    }
}
