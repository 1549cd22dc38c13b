// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use std::path::PathBuf;

use super::Ctx;
use crate::db::{clear_session, save_session};
use crate::guard::landing_view;
use crate::models::Registration;
use crate::session::Session;
use crate::utils::parse_date;

pub fn handle(ctx: &mut Ctx, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("login", sub)) => login(ctx, sub)?,
        Some(("register", sub)) => register(ctx, sub)?,
        Some(("logout", _)) => logout(ctx)?,
        Some(("whoami", _)) => whoami(ctx),
        _ => {}
    }
    Ok(())
}

fn login(ctx: &mut Ctx, sub: &clap::ArgMatches) -> Result<()> {
    let email = sub.get_one::<String>("email").unwrap();
    let password = sub.get_one::<String>("password").unwrap();
    let resp = ctx.api.login(email, password).context("Login failed")?;
    let session = Session::establish(resp, email)?;
    save_session(ctx.conn, &session)?;
    let landing = landing_view(session.role);
    println!("Welcome {}! Logged in as {}.", session.role, session.display_name());
    println!("Your home view is {}.", landing);
    ctx.session = Some(session);
    Ok(())
}

fn register(ctx: &Ctx, sub: &clap::ArgMatches) -> Result<()> {
    let dob = match sub.get_one::<String>("dob") {
        Some(s) => Some(parse_date(s)?),
        None => None,
    };
    let reg = Registration {
        name: sub.get_one::<String>("name").unwrap().clone(),
        surname: sub.get_one::<String>("surname").unwrap().clone(),
        email: sub.get_one::<String>("email").unwrap().clone(),
        password: sub.get_one::<String>("password").unwrap().clone(),
        dob,
        address: sub.get_one::<String>("address").cloned(),
        photo: sub.get_one::<String>("photo").map(PathBuf::from),
    };
    let user = ctx
        .api
        .register(&reg)
        .context("Error creating user. Please check all fields and try again.")?;
    println!(
        "Registration successful for {}. Log in with `finsys auth login`.",
        if user.email.is_empty() { &reg.email } else { &user.email }
    );
    Ok(())
}

fn logout(ctx: &mut Ctx) -> Result<()> {
    if clear_session(ctx.conn)? {
        tracing::info!("session cleared");
        println!("Logged out.");
    } else {
        println!("No active session.");
    }
    ctx.session = None;
    Ok(())
}

fn whoami(ctx: &Ctx) {
    match &ctx.session {
        Some(s) => println!(
            "{} (id {}, role {}) -> {}",
            s.display_name(),
            s.user_id,
            s.role,
            landing_view(s.role)
        ),
        None => println!("Not logged in."),
    }
}
