use anyhow::Context;
use quote_server::{Config, Server, ServerState, init_logger};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. 设置环境 (dotenv, 日志)
    dotenv::dotenv().ok();
    let config = Config::from_env();
    init_logger(&config.log_level, config.log_json, config.log_dir.as_deref());

    tracing::info!(
        environment = %config.environment,
        store_backend = %config.store_backend,
        default_rule_kind = %config.default_rule_kind,
        "Quote server starting..."
    );

    // 2. 初始化服务器状态 (打开规则存储)
    let state = ServerState::initialize(&config).context("failed to initialize server state")?;

    // 3. 启动 HTTP 服务器
    let server = Server::with_state(config, state);
    if let Err(e) = server.run().await {
        tracing::error!("Server error: {}", e);
        return Err(e.into());
    }

    Ok(())
}
