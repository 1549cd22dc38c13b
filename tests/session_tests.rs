// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use finsys::db::{clear_session, init_schema, load_session, save_session};
use finsys::error::ApiError;
use finsys::models::{LoginResponse, Role};
use finsys::session::Session;
use rusqlite::Connection;

fn setup() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    init_schema(&conn).unwrap();
    conn
}

fn login_body(body: serde_json::Value) -> LoginResponse {
    serde_json::from_value(body).unwrap()
}

#[test]
fn login_response_decodes_role_once() {
    let resp = login_body(serde_json::json!({
        "success": true,
        "token": "jwt.token.here",
        "user": { "id": 12, "role": "Vice-President" }
    }));
    let s = Session::establish(resp, "vp@eglise.cd").unwrap();
    assert_eq!(s.user_id, "12");
    assert_eq!(s.role, Role::VicePresident);
    assert_eq!(s.display_name(), "vp@eglise.cd");
}

#[test]
fn incomplete_login_is_rejected() {
    let bodies = [
        serde_json::json!({ "success": false, "token": "t", "user": { "id": 1, "role": "user" } }),
        serde_json::json!({ "success": true, "user": { "id": 1, "role": "user" } }),
        serde_json::json!({ "success": true, "token": "t", "user": { "role": "user" } }),
        serde_json::json!({ "success": true, "token": "t", "user": { "id": 1 } }),
        serde_json::json!({ "success": true, "token": "  ", "user": { "id": 1, "role": "user" } }),
    ];
    for body in bodies {
        assert!(matches!(
            Session::establish(login_body(body), "x@y.z"),
            Err(ApiError::Validation(_))
        ));
    }
}

#[test]
fn debug_output_hides_the_token() {
    let s = Session::restore("secret-token".into(), "1".into(), "admin", None);
    let shown = format!("{:?}", s);
    assert!(!shown.contains("secret-token"));
    assert!(shown.contains("<redacted>"));
}

#[test]
fn session_survives_a_restart_and_dies_on_logout() {
    let conn = setup();
    assert!(load_session(&conn).unwrap().is_none());

    let s = Session::restore("tok".into(), "7".into(), "Financier", Some("f@x.cd".into()));
    save_session(&conn, &s).unwrap();
    let back = load_session(&conn).unwrap().unwrap();
    assert_eq!(back, s);
    assert_eq!(back.role, Role::Financier);

    let other = Session::restore("tok2".into(), "8".into(), "admin", None);
    save_session(&conn, &other).unwrap();
    assert_eq!(load_session(&conn).unwrap().unwrap().user_id, "8");

    assert!(clear_session(&conn).unwrap());
    assert!(load_session(&conn).unwrap().is_none());
    assert!(!clear_session(&conn).unwrap());
}

#[test]
fn corrupt_stored_session_is_dropped() {
    let conn = setup();
    conn.execute(
        "INSERT INTO session(id, token, user_id, role) VALUES (1, '', '3', 'user')",
        [],
    )
    .unwrap();
    assert!(load_session(&conn).unwrap().is_none());
    let left: i64 = conn
        .query_row("SELECT COUNT(*) FROM session", [], |r| r.get(0))
        .unwrap();
    assert_eq!(left, 0);
}
