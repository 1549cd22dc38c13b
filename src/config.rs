// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{bail, Context, Result};
use rusqlite::Connection;

use crate::db::{get_setting, set_setting};

pub const DEFAULT_API_URL: &str = "https://finsys.onrender.com/api";
pub const API_URL_ENV: &str = "FINSYS_API_URL";
const API_URL_KEY: &str = "api_base_url";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Env,
    Settings,
    Default,
}

impl Source {
    pub fn as_str(&self) -> &'static str {
        match self {
            Source::Env => "environment",
            Source::Settings => "settings",
            Source::Default => "default",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub api_base_url: String,
    pub source: Source,
}

impl Config {
    /// Environment beats the stored setting, which beats the default.
    pub fn load(conn: &Connection) -> Result<Config> {
        let env = std::env::var(API_URL_ENV).ok();
        Self::resolve(conn, env.as_deref())
    }

    pub fn resolve(conn: &Connection, env_url: Option<&str>) -> Result<Config> {
        if let Some(url) = env_url.filter(|u| !u.trim().is_empty()) {
            return Ok(Config {
                api_base_url: normalize_base_url(url)
                    .with_context(|| format!("Invalid {}", API_URL_ENV))?,
                source: Source::Env,
            });
        }
        if let Some(url) = get_setting(conn, API_URL_KEY)? {
            return Ok(Config {
                api_base_url: normalize_base_url(&url)?,
                source: Source::Settings,
            });
        }
        Ok(Config {
            api_base_url: DEFAULT_API_URL.to_string(),
            source: Source::Default,
        })
    }
}

pub fn set_api_base_url(conn: &Connection, url: &str) -> Result<String> {
    let url = normalize_base_url(url)?;
    set_setting(conn, API_URL_KEY, &url)?;
    Ok(url)
}

pub fn normalize_base_url(raw: &str) -> Result<String> {
    let trimmed = raw.trim().trim_end_matches('/');
    let parsed = reqwest::Url::parse(trimmed)
        .with_context(|| format!("Invalid API URL '{}'", raw))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        bail!("API URL must use http or https, got '{}'", parsed.scheme());
    }
    Ok(trimmed.to_string())
}
