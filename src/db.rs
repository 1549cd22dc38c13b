// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use directories::ProjectDirs;
use once_cell::sync::Lazy;
use rusqlite::{params, Connection, OptionalExtension};
use std::fs;
use std::path::PathBuf;

use crate::session::Session;

static APP: Lazy<(&str, &str, &str)> = Lazy::new(|| ("com.alphavelocity", "FinSys", "finsys"));

pub fn db_path() -> Result<PathBuf> {
    let proj = ProjectDirs::from(APP.0, APP.1, APP.2)
        .context("Could not determine platform-specific data dir")?;
    let data_dir = proj.data_dir();
    fs::create_dir_all(data_dir).context("Failed to create data dir")?;
    Ok(data_dir.join("finsys.sqlite"))
}

pub fn open_or_init() -> Result<Connection> {
    let path = db_path()?;
    let conn =
        Connection::open(&path).with_context(|| format!("Open DB at {}", path.display()))?;
    init_schema(&conn)?;
    Ok(conn)
}

pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
    CREATE TABLE IF NOT EXISTS settings(
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL
    );

    -- at most one logged-in session per local store
    CREATE TABLE IF NOT EXISTS session(
        id INTEGER PRIMARY KEY CHECK (id = 1),
        token TEXT NOT NULL,
        user_id TEXT NOT NULL,
        role TEXT NOT NULL,
        email TEXT,
        created_at TEXT NOT NULL DEFAULT (datetime('now'))
    );
    "#,
    )?;
    Ok(())
}

pub fn get_setting(conn: &Connection, key: &str) -> Result<Option<String>> {
    let v: Option<String> = conn
        .query_row(
            "SELECT value FROM settings WHERE key=?1",
            params![key],
            |r| r.get(0),
        )
        .optional()?;
    Ok(v)
}

pub fn set_setting(conn: &Connection, key: &str, value: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO settings(key, value) VALUES(?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value=excluded.value",
        params![key, value],
    )?;
    Ok(())
}

pub fn save_session(conn: &Connection, session: &Session) -> Result<()> {
    conn.execute(
        "INSERT INTO session(id, token, user_id, role, email) VALUES (1, ?1, ?2, ?3, ?4)
         ON CONFLICT(id) DO UPDATE SET token=excluded.token, user_id=excluded.user_id,
             role=excluded.role, email=excluded.email, created_at=datetime('now')",
        params![
            session.token,
            session.user_id,
            session.role.as_str(),
            session.email
        ],
    )
    .context("Failed to store session")?;
    Ok(())
}

/// The stored session, if any. A row that no longer decodes to a valid
/// session is dropped.
pub fn load_session(conn: &Connection) -> Result<Option<Session>> {
    let row = conn
        .query_row(
            "SELECT token, user_id, role, email FROM session WHERE id=1",
            [],
            |r| {
                Ok((
                    r.get::<_, String>(0)?,
                    r.get::<_, String>(1)?,
                    r.get::<_, String>(2)?,
                    r.get::<_, Option<String>>(3)?,
                ))
            },
        )
        .optional()?;
    let Some((token, user_id, role, email)) = row else {
        return Ok(None);
    };
    let session = Session::restore(token, user_id, &role, email);
    if !session.is_valid() {
        tracing::warn!("stored session is corrupt; clearing it");
        clear_session(conn)?;
        return Ok(None);
    }
    Ok(Some(session))
}

pub fn clear_session(conn: &Connection) -> Result<bool> {
    let n = conn.execute("DELETE FROM session", [])?;
    Ok(n > 0)
}
