//! Query interception: gate, rewrite, fall back
//!
//! One call per query about to execute. Statements that are not SELECTs,
//! threads without a field context, and rewrites that fail all resolve the
//! same way: the original SQL text runs unmodified.

use gqlprune_engine::{rewrite, SelectionTree};

use crate::cache::RewriteCache;
use crate::config::Config;
use crate::context::FieldContext;

/// Statement kind reported by the host's execution layer.
///
/// Classification is the host's responsibility; the interceptor never
/// sniffs SQL text to decide what a statement is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementKind {
    Select,
    Insert,
    Update,
    Delete,
    Other,
}

pub struct SqlInterceptor {
    enabled: bool,
    cache: Option<RewriteCache>,
}

impl SqlInterceptor {
    pub fn new(config: &Config) -> Self {
        Self {
            enabled: config.intercept.enabled,
            cache: config
                .cache
                .enabled
                .then(|| RewriteCache::new(config.cache.max_entries)),
        }
    }

    /// Rewrite a query about to execute, or return it untouched.
    ///
    /// Eligible queries are SELECTs issued on a thread that currently holds
    /// a field context. Everything else, including any rewrite failure,
    /// yields the original text.
    pub fn intercept(&self, kind: StatementKind, sql: &str) -> String {
        if !self.enabled || kind != StatementKind::Select {
            return sql.to_string();
        }
        let Some(context) = FieldContext::current() else {
            return sql.to_string();
        };
        self.rewrite_cached(sql, &context)
    }

    fn rewrite_cached(&self, sql: &str, context: &SelectionTree) -> String {
        let key = self.cache.as_ref().map(|_| RewriteCache::key(sql, context));
        if let (Some(cache), Some(key)) = (&self.cache, &key) {
            if let Some(hit) = cache.get(key) {
                return hit;
            }
        }

        match rewrite(sql, Some(context)) {
            Ok(clean) => {
                tracing::debug!(original = sql, rewritten = %clean, "query rewritten");
                if let (Some(cache), Some(key)) = (&self.cache, key) {
                    cache.insert(key, clean.clone());
                }
                clean
            }
            Err(err) => {
                tracing::debug!(error = %err, "rewrite skipped, executing original sql");
                sql.to_string()
            }
        }
    }
}

impl Default for SqlInterceptor {
    fn default() -> Self {
        Self::new(&Config::default())
    }
}
