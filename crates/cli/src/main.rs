mod app;
mod config;
mod error;
mod session;

use crate::error::Result;

fn main() -> Result<()> {
    let (config, command) = config::load()?;

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(format!(
            "ahorro={level},ahorro_prefs={level}",
            level = config.level
        ))
        .init();

    let app = app::App::new(config);
    app.run(command)?;
    Ok(())
}
