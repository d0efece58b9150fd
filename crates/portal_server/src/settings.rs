//! Command line and config-file handling.

use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use log::LevelFilter;
use portal_engine::PortalConfig;

use crate::logging::LogDestination;

#[derive(Debug, Parser)]
#[command(
    name = "portal_server",
    about = "HTTP front end for the portal login and course scrapers"
)]
pub struct Cli {
    /// RON file with a `PortalConfig`; missing fields take their defaults.
    #[arg(long, env = "PORTAL_CONFIG")]
    pub config: Option<PathBuf>,

    #[arg(long, env = "PORTAL_LISTEN", default_value = "127.0.0.1:3000")]
    pub listen: String,

    /// Overrides `base_url` from the config file.
    #[arg(long, env = "PORTAL_BASE_URL")]
    pub base_url: Option<String>,

    #[arg(long, value_enum, default_value_t = LogDestination::Terminal)]
    pub log: LogDestination,

    #[arg(long, default_value = "./portal.log")]
    pub log_file: PathBuf,

    #[arg(long, default_value = "info")]
    pub log_level: LevelFilter,
}

pub fn load_config(cli: &Cli) -> anyhow::Result<PortalConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            ron::from_str(&raw).with_context(|| format!("parsing config {}", path.display()))?
        }
        None => PortalConfig::default(),
    };
    if let Some(base_url) = &cli.base_url {
        config.base_url = base_url.clone();
    }
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn cli(args: &[&str]) -> Cli {
        Cli::parse_from(std::iter::once("portal_server").chain(args.iter().copied()))
    }

    #[test]
    fn defaults_without_config_file() {
        let config = load_config(&cli(&[])).unwrap();
        assert_eq!(config, PortalConfig::default());
    }

    #[test]
    fn partial_ron_file_keeps_other_defaults() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("portal.ron");
        fs::write(&path, r#"(session_cookie: "PortalSession", transport: (redirect_limit: 2))"#)
            .unwrap();

        let config = load_config(&cli(&["--config", path.to_str().unwrap()])).unwrap();
        assert_eq!(config.session_cookie, "PortalSession");
        assert_eq!(config.transport.redirect_limit, 2);
        assert_eq!(config.base_url, PortalConfig::default().base_url);
    }

    #[test]
    fn base_url_flag_overrides_file() {
        let config = load_config(&cli(&["--base-url", "http://localhost:9000"])).unwrap();
        assert_eq!(config.base_url, "http://localhost:9000");
        assert_eq!(config.login_url(), "http://localhost:9000/login/index.php");
    }

    #[test]
    fn unreadable_config_is_an_error() {
        assert!(load_config(&cli(&["--config", "/nonexistent/portal.ron"])).is_err());
    }
}
