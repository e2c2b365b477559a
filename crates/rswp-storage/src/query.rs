//! Cursor-paginated, dynamically-filtered query construction.
//!
//! The builders here are pure: they translate a query-option struct into a
//! single SQL statement plus its bound parameters, without touching a
//! connection. Backends execute the result; tests assert on it directly.
//!
//! Ordering columns are interpolated as bare identifiers (placeholders
//! cannot stand in for identifiers), so they pass through
//! [`sanitize_order_column`] first. Everything else is bound.

use crate::cursor::decode_cursor;
use crate::types::{ObjectQuery, TermQuery, UserQuery};

/// A typed bound parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlArg {
    Int(i64),
    Str(String),
}

impl From<i64> for SqlArg {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<&str> for SqlArg {
    fn from(v: &str) -> Self {
        Self::Str(v.to_string())
    }
}

impl From<String> for SqlArg {
    fn from(v: String) -> Self {
        Self::Str(v)
    }
}

/// A statement plus its bound parameters, ready for execution.
#[derive(Debug, Clone, PartialEq)]
pub struct SqlQuery {
    pub sql: String,
    pub args: Vec<SqlArg>,
}

/// Strips every character outside `[A-Za-z0-9_.]` from an ordering-column
/// identifier. An identifier that sanitizes to nothing falls back to the
/// given default.
pub fn sanitize_order_column(column: &str, default: &str) -> String {
    let cleaned: String = column
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '.')
        .collect();

    if cleaned.is_empty() {
        default.to_string()
    } else {
        cleaned
    }
}

/// Splits a free-text query on runs of non-alphabetic characters and drops
/// tokens of length two or shorter.
pub fn search_tokens(query: &str) -> Vec<&str> {
    query
        .split(|c: char| !c.is_ascii_alphabetic())
        .filter(|tok| tok.len() > 2)
        .collect()
}

/// Accumulates AND-composed predicates and their bound parameters.
#[derive(Debug, Default)]
struct Clauses {
    conds: Vec<String>,
    args: Vec<SqlArg>,
}

impl Clauses {
    fn push(&mut self, cond: String, args: Vec<SqlArg>) {
        self.conds.push(cond);
        self.args.extend(args);
    }

    fn eq(&mut self, column: &str, arg: SqlArg) {
        self.push(format!("{column} = ?"), vec![arg]);
    }

    fn in_set(&mut self, column: &str, args: Vec<SqlArg>) {
        self.push(format!("{column} IN ({})", placeholders(args.len())), args);
    }

    fn not_in_set(&mut self, column: &str, args: Vec<SqlArg>) {
        self.push(
            format!("{column} NOT IN ({})", placeholders(args.len())),
            args,
        );
    }

    /// Applies the exact > in > not-in precedence for one filter axis.
    fn axis(&mut self, column: &str, exact: Option<SqlArg>, set_in: Vec<SqlArg>, set_not_in: Vec<SqlArg>) {
        if let Some(arg) = exact {
            self.eq(column, arg);
        } else if !set_in.is_empty() {
            self.in_set(column, set_in);
        } else if !set_not_in.is_empty() {
            self.not_in_set(column, set_not_in);
        }
    }

    fn where_sql(&self) -> String {
        if self.conds.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", self.conds.join(" AND "))
        }
    }
}

fn placeholders(n: usize) -> String {
    vec!["?"; n].join(", ")
}

fn int_args(values: &[i64]) -> Vec<SqlArg> {
    values.iter().map(|v| SqlArg::Int(*v)).collect()
}

fn str_args(values: &[String]) -> Vec<SqlArg> {
    values.iter().map(|v| SqlArg::Str(v.clone())).collect()
}

fn int_groups(groups: &[Vec<i64>]) -> Vec<Vec<SqlArg>> {
    groups.iter().map(|g| int_args(g)).collect()
}

/// Wraps flat and-form values as one-element groups.
fn singleton_groups(args: Vec<SqlArg>) -> Vec<Vec<SqlArg>> {
    args.into_iter().map(|a| vec![a]).collect()
}

fn nonzero(v: i64) -> Option<SqlArg> {
    (v != 0).then_some(SqlArg::Int(v))
}

fn nonempty(v: &str) -> Option<SqlArg> {
    (!v.is_empty()).then(|| SqlArg::Str(v.to_string()))
}

/// The membership column a term subquery constrains on.
enum TermFilterBy {
    Id,
    Slug,
}

/// Builds a `object_id`-producing subquery over the term-relationship join,
/// filtered to one taxonomy and a term id/slug set.
fn term_membership(prefix: &str, taxonomy: &str, by: &TermFilterBy, values: Vec<SqlArg>) -> (String, Vec<SqlArg>) {
    let column = match by {
        TermFilterBy::Id => "t.term_id",
        TermFilterBy::Slug => "t.slug",
    };

    let sql = format!(
        "SELECT tr.object_id FROM {prefix}term_relationships AS tr \
         JOIN {prefix}term_taxonomy AS tt ON tr.term_taxonomy_id = tt.term_taxonomy_id \
         JOIN {prefix}terms AS t ON tt.term_id = t.term_id \
         WHERE tt.taxonomy = ? AND {column} IN ({})",
        placeholders(values.len()),
    );

    let mut args = vec![SqlArg::Str(taxonomy.to_string())];
    args.extend(values);

    (sql, args)
}

/// Pushes an `ID [NOT] IN (term membership subquery)` predicate.
fn push_membership(
    clauses: &mut Clauses,
    prefix: &str,
    taxonomy: &str,
    by: &TermFilterBy,
    values: Vec<SqlArg>,
    negated: bool,
) {
    let (sub, args) = term_membership(prefix, taxonomy, by, values);
    let not = if negated { " NOT" } else { "" };
    clauses.push(format!("ID{not} IN ({sub})"), args);
}

/// Applies exact/and/in/not-in precedence for a taxonomy membership axis.
/// The "and" form emits one membership subquery per group, each matching
/// any id in the group.
#[allow(clippy::too_many_arguments)]
fn membership_axis(
    clauses: &mut Clauses,
    prefix: &str,
    taxonomy: &str,
    by: TermFilterBy,
    exact: Option<SqlArg>,
    and_groups: Vec<Vec<SqlArg>>,
    set_in: Vec<SqlArg>,
    set_not_in: Vec<SqlArg>,
) {
    if let Some(arg) = exact {
        push_membership(clauses, prefix, taxonomy, &by, vec![arg], false);
    } else if !and_groups.is_empty() {
        for group in and_groups {
            if !group.is_empty() {
                push_membership(clauses, prefix, taxonomy, &by, group, false);
            }
        }
    } else if !set_in.is_empty() {
        push_membership(clauses, prefix, taxonomy, &by, set_in, false);
    } else if !set_not_in.is_empty() {
        push_membership(clauses, prefix, taxonomy, &by, set_not_in, true);
    }
}

/// Parses a `key` or `key=value` meta constraint into an OR-able predicate.
fn meta_condition(constraint: &str) -> (String, Vec<SqlArg>) {
    match constraint.split_once('=') {
        Some((key, value)) => (
            "(meta_key = ? AND meta_value = ?)".to_string(),
            vec![SqlArg::Str(key.to_string()), SqlArg::Str(value.to_string())],
        ),
        None => (
            "(meta_key = ?)".to_string(),
            vec![SqlArg::Str(constraint.to_string())],
        ),
    }
}

/// Pushes an `ID [NOT] IN (SELECT DISTINCT post_id FROM postmeta ...)`
/// predicate ORing the given constraints.
fn push_meta(clauses: &mut Clauses, prefix: &str, constraints: &[String], negated: bool) {
    if constraints.is_empty() {
        return;
    }

    let mut ors = Vec::with_capacity(constraints.len());
    let mut args = Vec::new();
    for constraint in constraints {
        let (cond, cond_args) = meta_condition(constraint);
        ors.push(cond);
        args.extend(cond_args);
    }

    let not = if negated { " NOT" } else { "" };
    clauses.push(
        format!(
            "ID{not} IN (SELECT DISTINCT post_id FROM {prefix}postmeta WHERE {})",
            ors.join(" OR "),
        ),
        args,
    );
}

/// Adds the strict-inequality cursor predicate when the cursor decodes.
fn push_cursor(clauses: &mut Clauses, order: &str, after: &str, ascending: bool) {
    if after.is_empty() {
        return;
    }

    // A malformed cursor falls back to the first page rather than erroring.
    if let Some(value) = decode_cursor(after) {
        let op = if ascending { ">" } else { "<" };
        clauses.push(format!("{order} {op} ?"), vec![SqlArg::Str(value)]);
    }
}

fn order_and_limit(sql: &mut String, order: &str, ascending: bool, limit: i64) {
    let dir = if ascending { "ASC" } else { "DESC" };
    sql.push_str(&format!(" ORDER BY {order} {dir}"));

    let limit = if limit == 0 { 10 } else { limit };
    if limit > 0 {
        sql.push_str(&format!(" LIMIT {limit}"));
    }
}

/// Builds the object query: returns `(ID, raw order value)` rows.
pub fn build_object_query(prefix: &str, q: &ObjectQuery) -> SqlQuery {
    let order = sanitize_order_column(&q.order, "post_date");

    let mut clauses = Clauses::default();

    if let Some(ref kind) = q.post_type {
        clauses.eq("post_type", kind.as_str().into());
    }

    if let Some(status) = q.post_status {
        clauses.eq("post_status", status.as_str().into());
    }

    clauses.axis(
        "post_author",
        nonzero(q.author),
        int_args(&q.author_in),
        int_args(&q.author_not_in),
    );

    // Author slug resolves through a users subquery.
    {
        let users_sub = |values: Vec<SqlArg>| {
            (
                format!(
                    "SELECT ID FROM {prefix}users WHERE user_nicename IN ({})",
                    placeholders(values.len()),
                ),
                values,
            )
        };

        if !q.author_slug.is_empty() {
            let (sub, args) = users_sub(vec![q.author_slug.as_str().into()]);
            clauses.push(format!("post_author IN ({sub})"), args);
        } else if !q.author_slug_in.is_empty() {
            let (sub, args) = users_sub(str_args(&q.author_slug_in));
            clauses.push(format!("post_author IN ({sub})"), args);
        } else if !q.author_slug_not_in.is_empty() {
            let (sub, args) = users_sub(str_args(&q.author_slug_not_in));
            clauses.push(format!("post_author NOT IN ({sub})"), args);
        }
    }

    membership_axis(
        &mut clauses,
        prefix,
        "category",
        TermFilterBy::Id,
        nonzero(q.category),
        int_groups(&q.category_and),
        int_args(&q.category_in),
        int_args(&q.category_not_in),
    );

    membership_axis(
        &mut clauses,
        prefix,
        "nav_menu",
        TermFilterBy::Id,
        nonzero(q.menu_id),
        singleton_groups(int_args(&q.menu_id_and)),
        int_args(&q.menu_id_in),
        int_args(&q.menu_id_not_in),
    );

    membership_axis(
        &mut clauses,
        prefix,
        "nav_menu",
        TermFilterBy::Slug,
        nonempty(&q.menu_slug),
        Vec::new(),
        str_args(&q.menu_slug_in),
        str_args(&q.menu_slug_not_in),
    );

    if !q.meta.is_empty() {
        push_meta(&mut clauses, prefix, std::slice::from_ref(&q.meta), false);
    } else if !q.meta_and.is_empty() {
        for constraint in &q.meta_and {
            push_meta(&mut clauses, prefix, std::slice::from_ref(constraint), false);
        }
    } else if !q.meta_in.is_empty() {
        push_meta(&mut clauses, prefix, &q.meta_in, false);
    } else if !q.meta_not_in.is_empty() {
        push_meta(&mut clauses, prefix, &q.meta_not_in, true);
    }

    clauses.axis(
        "post_name",
        nonempty(&q.slug),
        str_args(&q.slug_in),
        str_args(&q.slug_not_in),
    );

    clauses.axis(
        "post_parent",
        nonzero(q.parent),
        int_args(&q.parent_in),
        int_args(&q.parent_not_in),
    );

    clauses.axis("ID", nonzero(q.id), int_args(&q.id_in), int_args(&q.id_not_in));

    membership_axis(
        &mut clauses,
        prefix,
        "post_tag",
        TermFilterBy::Id,
        nonzero(q.tag),
        singleton_groups(int_args(&q.tag_and)),
        int_args(&q.tag_in),
        int_args(&q.tag_not_in),
    );

    membership_axis(
        &mut clauses,
        prefix,
        "post_tag",
        TermFilterBy::Slug,
        nonempty(&q.tag_slug),
        singleton_groups(str_args(&q.tag_slug_and)),
        str_args(&q.tag_slug_in),
        str_args(&q.tag_slug_not_in),
    );

    if !q.search.is_empty() {
        let tokens = search_tokens(&q.search);
        if !tokens.is_empty() {
            let mut ors = Vec::with_capacity(tokens.len());
            let mut args = Vec::with_capacity(tokens.len() * 3);
            for token in tokens {
                ors.push("post_name LIKE ? OR post_title LIKE ? OR post_content LIKE ?");
                let pattern = format!("%{token}%");
                args.push(SqlArg::Str(pattern.clone()));
                args.push(SqlArg::Str(pattern.clone()));
                args.push(SqlArg::Str(pattern));
            }
            clauses.push(format!("({})", ors.join(" OR ")), args);
        }
    }

    if q.day > 0 {
        clauses.push("DAYOFMONTH(post_date) = ?".to_string(), vec![SqlArg::Int(q.day.into())]);
    }

    if q.month > 0 {
        clauses.push("MONTH(post_date) = ?".to_string(), vec![SqlArg::Int(q.month.into())]);
    }

    if q.year > 0 {
        clauses.push("YEAR(post_date) = ?".to_string(), vec![SqlArg::Int(q.year.into())]);
    }

    if let Some(after_date) = q.after_date {
        clauses.push(
            "post_date > ?".to_string(),
            vec![SqlArg::Str(after_date.format("%Y-%m-%d %H:%M:%S").to_string())],
        );
    }

    push_cursor(&mut clauses, &order, &q.after, q.order_ascending);

    let mut sql = format!("SELECT ID, {order} FROM {prefix}posts{}", clauses.where_sql());
    order_and_limit(&mut sql, &order, q.order_ascending, q.limit);

    SqlQuery { sql, args: clauses.args }
}

/// Builds the term query: returns `(term_id, raw order value)` rows.
///
/// The taxonomy and relationship joins are only emitted when an axis
/// actually needs them.
pub fn build_term_query(prefix: &str, q: &TermQuery) -> SqlQuery {
    let order = sanitize_order_column(&q.order, "t.term_id");
    // Terms default to ascending id order when no column is named.
    let ascending = q.order.is_empty() || q.order_ascending;

    let mut clauses = Clauses::default();
    let mut need_taxonomy = false;
    let mut need_relationships = false;

    clauses.axis(
        "t.name",
        nonempty(&q.name),
        str_args(&q.name_in),
        str_args(&q.name_not_in),
    );

    if q.object_id != 0 || !q.object_id_in.is_empty() || !q.object_id_not_in.is_empty() {
        need_relationships = true;
        clauses.axis(
            "tr.object_id",
            nonzero(q.object_id),
            int_args(&q.object_id_in),
            int_args(&q.object_id_not_in),
        );
    }

    if q.parent_id != 0 || !q.parent_id_in.is_empty() || !q.parent_id_not_in.is_empty() {
        need_taxonomy = true;
        clauses.axis(
            "tt.parent",
            nonzero(q.parent_id),
            int_args(&q.parent_id_in),
            int_args(&q.parent_id_not_in),
        );
    }

    clauses.axis(
        "t.slug",
        nonempty(&q.slug),
        str_args(&q.slug_in),
        str_args(&q.slug_not_in),
    );

    if q.taxonomy.is_some() || !q.taxonomy_in.is_empty() || !q.taxonomy_not_in.is_empty() {
        need_taxonomy = true;
        clauses.axis(
            "tt.taxonomy",
            q.taxonomy.as_ref().map(|t| SqlArg::Str(t.as_str().to_string())),
            q.taxonomy_in.iter().map(|t| SqlArg::Str(t.as_str().to_string())).collect(),
            q.taxonomy_not_in.iter().map(|t| SqlArg::Str(t.as_str().to_string())).collect(),
        );
    }

    clauses.axis("t.term_id", nonzero(q.id), int_args(&q.id_in), int_args(&q.id_not_in));

    push_cursor(&mut clauses, &order, &q.after, ascending);

    let mut sql = format!("SELECT DISTINCT t.term_id, {order} FROM {prefix}terms AS t");
    if need_taxonomy || need_relationships {
        sql.push_str(&format!(
            " JOIN {prefix}term_taxonomy AS tt ON tt.term_id = t.term_id",
        ));
    }
    if need_relationships {
        sql.push_str(&format!(
            " JOIN {prefix}term_relationships AS tr ON tr.term_taxonomy_id = tt.term_taxonomy_id",
        ));
    }
    sql.push_str(&clauses.where_sql());
    order_and_limit(&mut sql, &order, ascending, q.limit);

    SqlQuery { sql, args: clauses.args }
}

/// Builds the user query: returns `(ID, raw order value)` rows. Users are
/// always ordered by ascending id.
pub fn build_user_query(prefix: &str, q: &UserQuery) -> SqlQuery {
    let mut clauses = Clauses::default();

    clauses.axis("ID", nonzero(q.id), int_args(&q.id_in), int_args(&q.id_not_in));

    clauses.axis(
        "user_nicename",
        nonempty(&q.slug),
        str_args(&q.slug_in),
        str_args(&q.slug_not_in),
    );

    push_cursor(&mut clauses, "ID", &q.after, true);

    let mut sql = format!("SELECT ID, ID FROM {prefix}users{}", clauses.where_sql());
    order_and_limit(&mut sql, "ID", true, q.limit);

    SqlQuery { sql, args: clauses.args }
}
