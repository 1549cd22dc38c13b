// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{bail, Context, Result};

use super::{confirm, flag, navigate, render, require, Ctx, Output};
use crate::api::Backend;
use crate::guard::View;
use crate::models::{Role, UserUpdate};
use crate::utils::{maybe_print_json, pretty_table};

pub fn handle(ctx: &Ctx, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("list", sub)) => {
            let landed = navigate(ctx, View::AdminUsers)?;
            render(ctx, landed, Output::from_matches(sub))?;
        }
        Some(("update", sub)) => update(ctx, sub)?,
        Some(("delete", sub)) => delete(ctx, sub)?,
        _ => {}
    }
    Ok(())
}

pub fn show(ctx: &Ctx, out: Output) -> Result<()> {
    let users = ctx.api.users().context("Failed to fetch users")?;
    if maybe_print_json(out.json, out.jsonl, &users)? {
        return Ok(());
    }
    let rows = users
        .iter()
        .map(|u| {
            vec![
                u.id.clone(),
                u.full_name(),
                u.email.clone(),
                u.role.to_string(),
                u.dob.map(|d| d.to_string()).unwrap_or_default(),
                u.address.clone(),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["ID", "Name", "Email", "Role", "DOB", "Address"], rows)
    );
    Ok(())
}

pub fn update_from_matches(sub: &clap::ArgMatches) -> UserUpdate {
    UserUpdate {
        name: sub.get_one::<String>("name").cloned(),
        surname: sub.get_one::<String>("surname").cloned(),
        email: sub.get_one::<String>("email").cloned(),
        address: sub.get_one::<String>("address").cloned(),
        role: sub.get_one::<String>("role").map(|r| Role::parse(r)),
    }
}

fn update(ctx: &Ctx, sub: &clap::ArgMatches) -> Result<()> {
    require(ctx, View::AdminUsers)?;
    let id = sub.get_one::<String>("id").unwrap();
    let patch = update_from_matches(sub);
    if patch.is_empty() {
        bail!("Nothing to update: pass at least one of --name, --surname, --email, --address, --role");
    }
    ctx.api
        .update_user(id, &patch)
        .with_context(|| format!("Failed to update user {}", id))?;
    println!("User {} updated.", id);
    Ok(())
}

fn delete(ctx: &Ctx, sub: &clap::ArgMatches) -> Result<()> {
    require(ctx, View::AdminUsers)?;
    let id = sub.get_one::<String>("id").unwrap();
    if !confirm(&format!("Delete user {}?", id), flag(sub, "yes"))? {
        println!("Cancelled.");
        return Ok(());
    }
    ctx.api
        .delete_user(id)
        .with_context(|| format!("Failed to delete user {}", id))?;
    println!("User {} deleted.", id);
    Ok(())
}
