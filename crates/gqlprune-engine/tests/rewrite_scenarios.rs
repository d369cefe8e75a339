//! End-to-end rewrite scenarios on the user/profile schema

use gqlprune_engine::{rewrite, FieldSelection, RewriteError, SelectionTree};
use gqlprune_sql::parse_select;

const USER_PROFILE_SQL: &str = "SELECT u.id, u.name, p.bio FROM user u \
     JOIN profile p ON u.id = p.user_id WHERE u.active = true";

fn tree(names: &[&str]) -> SelectionTree {
    SelectionTree::new(names.iter().map(|n| FieldSelection::new(*n)).collect())
}

#[test]
fn scalar_fields_drop_the_profile_join() {
    let out = rewrite(USER_PROFILE_SQL, Some(&tree(&["id", "name"]))).unwrap();
    assert_eq!(
        out,
        "SELECT u.id, u.name FROM user u WHERE u.active = true"
    );
}

#[test]
fn joined_field_keeps_the_profile_join() {
    let out = rewrite(USER_PROFILE_SQL, Some(&tree(&["id", "bio"]))).unwrap();
    assert_eq!(
        out,
        "SELECT u.id, p.bio FROM user u JOIN profile p ON u.id = p.user_id WHERE u.active = true"
    );
}

#[test]
fn empty_selection_refuses_to_produce_a_statement() {
    assert!(matches!(
        rewrite(USER_PROFILE_SQL, Some(&tree(&[]))),
        Err(RewriteError::EmptyProjection)
    ));
}

#[test]
fn missing_context_returns_input_byte_for_byte() {
    assert_eq!(rewrite(USER_PROFILE_SQL, None).unwrap(), USER_PROFILE_SQL);

    let oddly_formatted = "select  u.id ,u.name\n from user u";
    assert_eq!(rewrite(oddly_formatted, None).unwrap(), oddly_formatted);
}

#[test]
fn nested_selection_counts_at_every_depth() {
    let context = SelectionTree::new(vec![
        FieldSelection::new("id"),
        FieldSelection::nested("profile", vec![FieldSelection::new("bio")]),
    ]);
    let out = rewrite(USER_PROFILE_SQL, Some(&context)).unwrap();
    assert!(out.contains("p.bio"));
    assert!(out.contains("JOIN profile p"));
}

#[test]
fn camel_case_fields_match_snake_case_columns() {
    let sql = "SELECT u.id, u.first_name, u.last_name FROM user u";
    let out = rewrite(sql, Some(&tree(&["id", "firstName"]))).unwrap();
    assert_eq!(out, "SELECT u.id, u.first_name FROM user u");
}

#[test]
fn rewritten_items_are_a_subset_of_the_original() {
    let original = parse_select(USER_PROFILE_SQL).unwrap();
    let out = rewrite(USER_PROFILE_SQL, Some(&tree(&["id", "bio"]))).unwrap();
    let pruned = parse_select(&out).unwrap();

    for item in &pruned.items {
        assert!(
            original.items.contains(item),
            "rewritten item {item:?} not in original"
        );
    }
    assert!(pruned.items.len() <= original.items.len());
}

#[test]
fn where_clause_aliases_always_survive() {
    // Nothing selected from p, but the WHERE clause filters on it.
    let sql = "SELECT u.id, u.name FROM user u \
         JOIN profile p ON u.id = p.user_id WHERE p.visible = true";
    let out = rewrite(sql, Some(&tree(&["id"]))).unwrap();
    assert_eq!(
        out,
        "SELECT u.id FROM user u JOIN profile p ON u.id = p.user_id WHERE p.visible = true"
    );
}

#[test]
fn opaque_where_subtree_keeps_its_join() {
    let sql = "SELECT u.id, u.name FROM user u \
         JOIN profile p ON u.id = p.user_id WHERE LOWER(p.bio) = 'x'";
    let out = rewrite(sql, Some(&tree(&["id"]))).unwrap();
    assert!(out.contains("JOIN profile p"), "got: {out}");
}

#[test]
fn rewritten_output_reparses() {
    for fields in [&["id"][..], &["id", "name"], &["id", "bio"], &["bio"]] {
        let out = rewrite(USER_PROFILE_SQL, Some(&tree(fields))).unwrap();
        parse_select(&out).unwrap_or_else(|err| panic!("{out}: {err}"));
    }
}

#[test]
fn multiple_joins_prune_independently() {
    let sql = "SELECT u.id, p.bio, a.street FROM user u \
         JOIN profile p ON u.id = p.user_id \
         LEFT JOIN address a ON u.id = a.user_id";

    let out = rewrite(sql, Some(&tree(&["id", "street"]))).unwrap();
    assert_eq!(
        out,
        "SELECT u.id, a.street FROM user u LEFT JOIN address a ON u.id = a.user_id"
    );
}

#[test]
fn unsupported_statement_shape_fails_closed() {
    let cases = [
        "SELECT * FROM user u",
        "SELECT u.id FROM user u GROUP BY u.id",
        "SELECT u.id FROM user u UNION SELECT p.id FROM profile p",
    ];
    for sql in cases {
        assert!(
            matches!(
                rewrite(sql, Some(&tree(&["id"]))),
                Err(RewriteError::UnsupportedShape(_))
            ),
            "expected unsupported shape: {sql}"
        );
    }
}
