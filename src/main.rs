use anyhow::Result;
use country_dependence::{
    app::{App, RunOutcome},
    config::AppConfig,
};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

fn main() -> Result<()> {
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder().with_env_filter(env).init();

    let config = AppConfig::from_env();
    info!(?config, "startup");

    match App::new(config).run()? {
        RunOutcome::Completed(outputs) => {
            for path in outputs {
                info!(path = %path.display(), "written");
            }
        }
        RunOutcome::Aborted => warn!("run aborted; no output written"),
    }

    Ok(())
}
