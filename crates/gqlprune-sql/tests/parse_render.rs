//! Round-trip coverage for the parse/render bridge
//!
//! Statements of the supported shape must re-parse after rendering and
//! stabilize to the same text.

use gqlprune_sql::{parse_select, ParseError};

fn assert_stable(sql: &str) {
    let stmt = parse_select(sql).expect(sql);
    let rendered = stmt.to_string();
    let reparsed = parse_select(&rendered).expect(&rendered);
    assert_eq!(
        rendered,
        reparsed.to_string(),
        "rendering must be a fixed point for: {sql}"
    );
}

#[test]
fn round_trip_simple_select() {
    assert_stable("SELECT u.id, u.name FROM user u");
}

#[test]
fn round_trip_join_chain() {
    assert_stable(
        "SELECT u.id, p.bio, a.street FROM user u \
         JOIN profile p ON u.id = p.user_id \
         LEFT JOIN address a ON u.id = a.user_id",
    );
}

#[test]
fn round_trip_where_with_placeholders() {
    assert_stable("SELECT u.id FROM user u WHERE u.tenant_id = ? AND u.active = true");
}

#[test]
fn round_trip_opaque_predicates() {
    assert_stable("SELECT u.id FROM user u WHERE LOWER(u.email) LIKE '%@example.com'");
    assert_stable("SELECT u.id FROM user u WHERE u.status IN ('new', 'active')");
    assert_stable("SELECT u.id FROM user u WHERE u.deleted_at IS NULL");
}

#[test]
fn round_trip_unaliased_base_table() {
    assert_stable("SELECT id, name FROM user WHERE active = true");
}

#[test]
fn round_trip_order_by_without_direction() {
    assert_stable("SELECT u.id FROM user u ORDER BY u.id");
}

#[test]
fn reject_non_select_statements() {
    for sql in [
        "UPDATE user SET name = 'x' WHERE id = 1",
        "DELETE FROM user WHERE id = 1",
    ] {
        assert!(
            matches!(parse_select(sql), Err(ParseError::Unsupported(_))),
            "expected rejection: {sql}"
        );
    }
}
