// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;

use super::Ctx;
use crate::config::{set_api_base_url, Config};
use crate::utils::pretty_table;

pub fn handle(ctx: &Ctx, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("show", _)) => show(ctx)?,
        Some(("set-api", sub)) => {
            let url = set_api_base_url(ctx.conn, sub.get_one::<String>("url").unwrap())?;
            println!("API base URL set to {}", url);
        }
        _ => {}
    }
    Ok(())
}

fn show(ctx: &Ctx) -> Result<()> {
    let cfg = Config::load(ctx.conn)?;
    let session = match &ctx.session {
        Some(s) => format!("{} ({})", s.display_name(), s.role),
        None => "none".to_string(),
    };
    let rows = vec![
        vec![
            "api_base_url".to_string(),
            cfg.api_base_url,
            cfg.source.as_str().to_string(),
        ],
        vec!["session".to_string(), session, "local store".to_string()],
    ];
    println!("{}", pretty_table(&["Key", "Value", "Source"], rows));
    Ok(())
}
