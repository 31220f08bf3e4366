use tracing_subscriber::{EnvFilter, fmt};

/// 初始化日志系统
///
/// 日志级别通过 RUST_LOG 环境变量控制，默认 info。
/// 翻译过程中的 NarrowingWarning 以 warn 级别输出。
pub fn init_logger() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();

    tracing::debug!("logger initialized");
}
