// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::path::Path;

use anyhow::{Result, bail};
use clap::ArgMatches;

use super::required;
use crate::config::{self, API_BASE_ENV};

/// `config show|set-api` against the file at `path`. Runs without a backend.
pub fn handle(path: &Path, m: &ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("show", _)) => {
            let env_base = std::env::var(API_BASE_ENV).ok();
            let cfg = config::load_from(path)?.with_api_base(env_base.as_deref());
            println!("Config file: {}", path.display());
            println!("{}", serde_json::to_string_pretty(&cfg)?);
            if env_base.is_some() {
                println!("({} overrides api_base)", API_BASE_ENV);
            }
        }
        Some(("set-api", sub)) => {
            let url = required::<String>(sub, "url")?.trim();
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                bail!("API base must start with http:// or https://, got '{}'", url);
            }
            let cfg = config::load_from(path)?.with_api_base(Some(url));
            config::save_to(path, &cfg)?;
            println!("API base set to {}", cfg.api_base);
        }
        _ => {}
    }
    Ok(())
}
