//! Query builder for the `groups` entity.
//!
//! A [`GroupQuery`] is a small model of one GraphQL read: the `where`
//! predicates and the field selection. Constructors decide *what* is selected
//! and filtered from [`GroupOptions`]; [`GroupQuery::render`] is the only place
//! that produces query text, so an empty predicate list can never leak out as
//! an empty `where: {}`.
//!
//! Building is pure. Inputs are assumed to be valid; see [`crate::validation`].

use crate::options::TimeBound;
use crate::{GroupFilters, GroupId, GroupOptions};

const ENTITY: &str = "groups";
const INDENT: &str = "  ";

// ---------------------------------------------------------------------------
// Model
// ---------------------------------------------------------------------------

/// A selected field, optionally ordered, with nested selections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub name: &'static str,
    /// Value of the `orderBy` argument, if any.
    pub order_by: Option<&'static str>,
    pub children: Vec<Field>,
}

impl Field {
    fn leaf(name: &'static str) -> Self {
        Self {
            name,
            order_by: None,
            children: Vec::new(),
        }
    }

    fn object(name: &'static str, children: &[&'static str]) -> Self {
        Self {
            name,
            order_by: None,
            children: children.iter().copied().map(Field::leaf).collect(),
        }
    }

    fn ordered(mut self, order_by: &'static str) -> Self {
        self.order_by = Some(order_by);
        self
    }
}

/// One entry of the `where` argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Predicate {
    pub name: &'static str,
    pub value: PredicateValue,
}

/// Right-hand side of a [`Predicate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PredicateValue {
    /// Rendered as a GraphQL string literal.
    Str(String),
    /// Rendered as a nested input object (e.g. `members_: { .. }`).
    Object(Vec<Predicate>),
}

impl Predicate {
    fn string(name: &'static str, value: impl Into<String>) -> Self {
        Self {
            name,
            value: PredicateValue::Str(value.into()),
        }
    }
}

/// A read query over the `groups` entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupQuery {
    predicates: Vec<Predicate>,
    selection: Vec<Field>,
}

// ---------------------------------------------------------------------------
// Construction
// ---------------------------------------------------------------------------

impl GroupQuery {
    /// Query for every group matching `options.filters`.
    pub fn collection(options: &GroupOptions) -> Self {
        Self {
            predicates: options
                .filters
                .as_ref()
                .map(filter_predicates)
                .unwrap_or_default(),
            selection: group_selection(options),
        }
    }

    /// Query for the group with exactly `id`. `options.filters` is ignored.
    pub fn single(id: &GroupId, options: &GroupOptions) -> Self {
        Self {
            predicates: vec![Predicate::string("id", id.as_str())],
            selection: group_selection(options),
        }
    }

    /// Query selecting only the id of every group.
    pub fn ids() -> Self {
        Self {
            predicates: Vec::new(),
            selection: vec![Field::leaf("id")],
        }
    }

    /// Query matching group `id` only if it has a member with `commitment`.
    pub fn membership(id: &GroupId, commitment: &str) -> Self {
        Self {
            predicates: vec![
                Predicate::string("id", id.as_str()),
                Predicate {
                    name: "members_",
                    value: PredicateValue::Object(vec![Predicate::string(
                        "identityCommitment",
                        commitment,
                    )]),
                },
            ],
            selection: vec![Field::leaf("id")],
        }
    }

    /// The `where` predicates, in emission order.
    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    /// The top-level field selection, in emission order.
    pub fn selection(&self) -> &[Field] {
        &self.selection
    }
}

fn group_selection(options: &GroupOptions) -> Vec<Field> {
    let mut fields = vec![
        Field::leaf("id"),
        Field::object(
            "merkleTree",
            &["root", "depth", "zeroValue", "numberOfLeaves"],
        ),
        Field::leaf("admin"),
    ];
    if options.members {
        fields.push(Field::object("members", &["identityCommitment"]).ordered("index"));
    }
    if options.verified_proofs {
        fields.push(
            Field::object(
                "verifiedProofs",
                &[
                    "signal",
                    "merkleTreeRoot",
                    "externalNullifier",
                    "nullifierHash",
                    "timestamp",
                ],
            )
            .ordered("timestamp"),
        );
    }
    fields
}

fn filter_predicates(filters: &GroupFilters) -> Vec<Predicate> {
    let mut predicates = Vec::new();
    if let Some(admin) = &filters.admin {
        predicates.push(Predicate::string("admin", admin.as_str()));
    }
    match filters.time_bound() {
        Some(TimeBound::Exact(t)) => {
            predicates.push(Predicate::string("timestamp", t.to_graphql_date()));
        }
        Some(TimeBound::AtLeast(t)) => {
            predicates.push(Predicate::string("timestamp_gte", t.to_graphql_date()));
        }
        Some(TimeBound::AtMost(t)) => {
            predicates.push(Predicate::string("timestamp_lte", t.to_graphql_date()));
        }
        None => {}
    }
    predicates
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

impl GroupQuery {
    /// Renders the query document.
    ///
    /// Output is deterministic: the same query always renders to the same
    /// bytes. The `where` argument is omitted entirely when there are no
    /// predicates.
    pub fn render(&self) -> String {
        let mut out = String::from("query {\n");
        out.push_str(INDENT);
        out.push_str(ENTITY);
        if !self.predicates.is_empty() {
            out.push_str("(where: ");
            write_object(&mut out, &self.predicates);
            out.push(')');
        }
        out.push_str(" {\n");
        for field in &self.selection {
            write_field(&mut out, field, 2);
        }
        out.push_str(INDENT);
        out.push_str("}\n}\n");
        out
    }
}

impl std::fmt::Display for GroupQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.render())
    }
}

fn write_field(out: &mut String, field: &Field, depth: usize) {
    out.push_str(&INDENT.repeat(depth));
    out.push_str(field.name);
    if let Some(order_by) = field.order_by {
        out.push_str("(orderBy: ");
        out.push_str(order_by);
        out.push(')');
    }
    if field.children.is_empty() {
        out.push('\n');
        return;
    }
    out.push_str(" {\n");
    for child in &field.children {
        write_field(out, child, depth + 1);
    }
    out.push_str(&INDENT.repeat(depth));
    out.push_str("}\n");
}

fn write_object(out: &mut String, predicates: &[Predicate]) {
    out.push_str("{ ");
    for (i, predicate) in predicates.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        out.push_str(predicate.name);
        out.push_str(": ");
        match &predicate.value {
            PredicateValue::Str(s) => write_string_literal(out, s),
            PredicateValue::Object(inner) => write_object(out, inner),
        }
    }
    out.push_str(" }");
}

fn write_string_literal(out: &mut String, value: &str) {
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => {
                out.push_str(&format!("\\u{:04x}", c as u32));
            }
            c => out.push(c),
        }
    }
    out.push('"');
}
