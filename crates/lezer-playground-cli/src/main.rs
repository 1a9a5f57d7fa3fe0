mod cli;
mod commands;
mod logging;


use std::path::{Path, PathBuf};

use lezer_playground_pipeline::PlaygroundConfig;

use cli::{CheckParams, GlobalParams, RestoreParams, ShareParams, TreeParams, WatchParams, build_cli};
use commands::input::fail;

const DEFAULT_CONFIG: &str = "lezer-playground.toml";

fn main() {
    let matches = build_cli().get_matches();
    let Some((name, m)) = matches.subcommand() else {
        unreachable!("clap should have caught this")
    };

    let global = GlobalParams::from_matches(m);
    logging::init(global.verbose);
    let config = load_config(global.config.as_deref());
    tracing::debug!(command = name, ?config, "starting");

    match name {
        "tree" => {
            let params = TreeParams::from_matches(m);
            commands::tree::run(params.into(), &config);
        }
        "check" => {
            let params = CheckParams::from_matches(m);
            commands::check::run(params.into(), &config);
        }
        "share" => {
            let params = ShareParams::from_matches(m);
            commands::share::run(params.into(), &config);
        }
        "restore" => {
            let params = RestoreParams::from_matches(m);
            commands::restore::run(params.into());
        }
        "watch" => {
            let params = WatchParams::from_matches(m);
            commands::watch::run(params.into(), &config);
        }
        _ => unreachable!("clap should have caught this"),
    }
}

/// An explicit `--config` must exist; the default file is optional.
fn load_config(path: Option<&Path>) -> PlaygroundConfig {
    let explicit = path.is_some();
    let path = path.map_or_else(|| PathBuf::from(DEFAULT_CONFIG), Path::to_path_buf);

    match PlaygroundConfig::load_from_path(&path) {
        Ok(Some(config)) => config,
        Ok(None) if explicit => fail(format!("config file not found: {}", path.display())),
        Ok(None) => PlaygroundConfig::default(),
        Err(e) => fail(e),
    }
}
