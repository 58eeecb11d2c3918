use anyhow::Context;
use resroot::{config::Config, logging, resolver::ResourceRoot, server};
use std::path::PathBuf;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init();

    let args: Vec<String> = std::env::args().collect();
    let mut config_path = PathBuf::from("resroot.toml");
    let mut i = 1;
    while i < args.len() {
        if args[i] == "--config" {
            i += 1;
            if i >= args.len() { eprintln!("--config requires a path"); std::process::exit(2); }
            config_path = PathBuf::from(&args[i]);
        }
        i += 1;
    }

    let cfg = Config::load(&config_path).context("loading config")?;
    cfg.validate().context("validating config")?;

    let root = match &cfg.root.root_dir {
        Some(dir) => ResourceRoot::new(dunce::canonicalize(dir).context("canonicalizing root_dir")?),
        None => ResourceRoot::install().context("locating install directory")?,
    };

    let addr = format!("{}:{}", cfg.server.bind_addr, cfg.server.port);
    info!(addr = %addr, base_path = %cfg.server.base_path, root = %root.base().display(), "resroot ready");

    server::serve(cfg, root).await
}
