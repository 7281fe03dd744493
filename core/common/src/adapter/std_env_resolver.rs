//! 標準環境変数解決実装（std::env を委譲）

use crate::domain::{HomeDir, SiteDir};
use crate::error::Error;
use crate::ports::outbound::EnvResolver;
use std::env;
use std::path::PathBuf;

/// 標準環境変数解決実装
#[derive(Debug, Clone, Default)]
pub struct StdEnvResolver;

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|s| !s.is_empty())
}

impl EnvResolver for StdEnvResolver {
    fn resolve_home_dir(&self) -> Result<HomeDir, Error> {
        if let Some(home) = non_empty_var("FEATGEN_HOME") {
            return Ok(HomeDir::new(PathBuf::from(home)));
        }

        let config_base = non_empty_var("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| non_empty_var("HOME").map(|h| PathBuf::from(h).join(".config")))
            .ok_or_else(|| Error::env("HOME is not set"))?;

        let mut path = config_base;
        path.push("featgen");
        Ok(HomeDir::new(path))
    }

    fn resolve_site_dir(&self, home: &HomeDir) -> SiteDir {
        non_empty_var("FEATGEN_SITE")
            .map(|s| SiteDir::new(PathBuf::from(s)))
            .unwrap_or_else(|| SiteDir::new(home.join("site")))
    }

    fn api_key_override(&self) -> Option<String> {
        non_empty_var("FEATGEN_API_KEY")
    }
}
