use std::process::ExitCode;

use anyhow::Context;
use blockgen_compiler::CompilerConfig;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    match compile().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn compile() -> anyhow::Result<()> {
    let config = CompilerConfig::from_env().context("invalid configuration")?;
    tracing::info!("blockgen -- block registry compiler");

    let written = blockgen_compiler::run(&config)
        .await
        .with_context(|| format!("compiling {}", config.source))?;

    for path in &written {
        tracing::info!("Output: {}", path.display());
    }
    Ok(())
}
