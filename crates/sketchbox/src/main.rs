use sketchbox::prelude::*;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match SandboxConfig::load_or_default(CONFIG_FILE) {
        Ok(config) => config,
        Err(e) => {
            log::error!("{e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = run(config) {
        log::error!("Event loop error: {e}");
        std::process::exit(1);
    }
}
