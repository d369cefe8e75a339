//! Gate and fallback behavior of the interceptor

use gqlprune_engine::{FieldSelection, SelectionTree};
use gqlprune_intercept::config::{CacheConfig, Config, InterceptConfig};
use gqlprune_intercept::{FieldContext, SqlInterceptor, StatementKind};

const USER_PROFILE_SQL: &str = "SELECT u.id, u.name, p.bio FROM user u \
     JOIN profile p ON u.id = p.user_id WHERE u.active = true";

fn tree(names: &[&str]) -> SelectionTree {
    SelectionTree::new(names.iter().map(|n| FieldSelection::new(*n)).collect())
}

#[test]
fn select_with_context_is_rewritten() {
    let interceptor = SqlInterceptor::default();
    let _guard = FieldContext::enter(tree(&["id", "name"]));

    let out = interceptor.intercept(StatementKind::Select, USER_PROFILE_SQL);
    assert_eq!(out, "SELECT u.id, u.name FROM user u WHERE u.active = true");
}

#[test]
fn non_select_statements_pass_through() {
    let interceptor = SqlInterceptor::default();
    let _guard = FieldContext::enter(tree(&["id"]));

    let sql = "UPDATE user SET name = 'x' WHERE id = 1";
    for kind in [
        StatementKind::Insert,
        StatementKind::Update,
        StatementKind::Delete,
        StatementKind::Other,
    ] {
        assert_eq!(interceptor.intercept(kind, sql), sql);
    }
}

#[test]
fn missing_context_passes_through() {
    let interceptor = SqlInterceptor::default();
    assert_eq!(
        interceptor.intercept(StatementKind::Select, USER_PROFILE_SQL),
        USER_PROFILE_SQL
    );
}

#[test]
fn disabled_interceptor_passes_through() {
    let config = Config {
        intercept: InterceptConfig { enabled: false },
        ..Config::default()
    };
    let interceptor = SqlInterceptor::new(&config);
    let _guard = FieldContext::enter(tree(&["id"]));

    assert_eq!(
        interceptor.intercept(StatementKind::Select, USER_PROFILE_SQL),
        USER_PROFILE_SQL
    );
}

#[test]
fn rewrite_failure_falls_back_to_original() {
    let interceptor = SqlInterceptor::default();
    let _guard = FieldContext::enter(tree(&["id"]));

    // Unsupported shape: wildcard projection.
    let wildcard = "SELECT * FROM user u";
    assert_eq!(interceptor.intercept(StatementKind::Select, wildcard), wildcard);

    // Malformed input.
    let malformed = "SELEC u.id FRM user u";
    assert_eq!(
        interceptor.intercept(StatementKind::Select, malformed),
        malformed
    );
}

#[test]
fn empty_selection_falls_back_to_original() {
    let interceptor = SqlInterceptor::default();
    let _guard = FieldContext::enter(SelectionTree::default());

    assert_eq!(
        interceptor.intercept(StatementKind::Select, USER_PROFILE_SQL),
        USER_PROFILE_SQL
    );
}

#[test]
fn repeated_queries_hit_the_cache() {
    let interceptor = SqlInterceptor::default();
    let _guard = FieldContext::enter(tree(&["id"]));

    let first = interceptor.intercept(StatementKind::Select, USER_PROFILE_SQL);
    let second = interceptor.intercept(StatementKind::Select, USER_PROFILE_SQL);
    assert_eq!(first, second);
    assert_eq!(first, "SELECT u.id FROM user u WHERE u.active = true");
}

#[test]
fn cache_can_be_disabled() {
    let config = Config {
        cache: CacheConfig {
            enabled: false,
            max_entries: 0,
        },
        ..Config::default()
    };
    let interceptor = SqlInterceptor::new(&config);
    let _guard = FieldContext::enter(tree(&["id"]));

    let out = interceptor.intercept(StatementKind::Select, USER_PROFILE_SQL);
    assert_eq!(out, "SELECT u.id FROM user u WHERE u.active = true");
}

#[test]
fn context_does_not_leak_after_guard_drop() {
    let interceptor = SqlInterceptor::default();
    {
        let _guard = FieldContext::enter(tree(&["id"]));
        assert_ne!(
            interceptor.intercept(StatementKind::Select, USER_PROFILE_SQL),
            USER_PROFILE_SQL
        );
    }
    // Guard dropped: the same thread no longer rewrites anything.
    assert_eq!(
        interceptor.intercept(StatementKind::Select, USER_PROFILE_SQL),
        USER_PROFILE_SQL
    );
}
