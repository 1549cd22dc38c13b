// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use finsys::api::ApiClient;
use finsys::commands::{self, Ctx};
use finsys::config::Config;
use finsys::{cli, db};

fn init_logging() {
    let filter = EnvFilter::try_from_env("FINSYS_LOG").unwrap_or_else(|_| EnvFilter::new("finsys=warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    init_logging();
    let matches = cli::build_cli().get_matches();

    let conn = db::open_or_init()?;
    let cfg = Config::load(&conn)?;
    let session = db::load_session(&conn)?;
    let api = ApiClient::new(&cfg.api_base_url)?.with_session(session.as_ref());
    let mut ctx = Ctx {
        conn: &conn,
        session,
        api,
    };

    let result = match matches.subcommand() {
        Some(("config", sub)) => commands::config::handle(&ctx, sub),
        Some(("auth", sub)) => commands::auth::handle(&mut ctx, sub),
        Some(("dashboard", sub)) => commands::dashboard::handle(&ctx, sub),
        Some(("tx", sub)) => commands::transactions::handle(&ctx, sub),
        Some(("financier", sub)) => commands::financier::handle(&ctx, sub),
        Some(("admin", sub)) => commands::admin::handle(&ctx, sub),
        Some(("export", sub)) => commands::exporter::handle(&ctx, sub),
        _ => {
            cli::build_cli().print_help()?;
            println!();
            Ok(())
        }
    };

    if let Err(err) = &result {
        if commands::clear_session_on_auth_failure(&conn, err)? {
            eprintln!("Session cleared; log in again with `finsys auth login`.");
        }
    }
    result
}
