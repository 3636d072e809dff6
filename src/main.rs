use anyhow::Context;
use gridscape::{GridscapeApp, SandboxConfig};

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let config = SandboxConfig::from_env_or_args().context("Failed to load configuration")?;
    log::info!("Starting {}", config.window.title);
    log::info!("   Left click places, 1-9 pick a template, ESC exits");

    GridscapeApp::new(config)?.run()
}
