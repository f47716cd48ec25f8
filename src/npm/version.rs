use semver::{Version, VersionReq};
use std::fmt;

/// A user- or registry-supplied version query: exact version, dist-tag, or npm range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionQuery {
    Exact(Version),
    Tag(String),
    Range(NpmRange),
}

impl VersionQuery {
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();

        if let Some(version) = parse_exact(trimmed) {
            return Some(VersionQuery::Exact(version));
        }

        if is_dist_tag(trimmed) {
            return Some(VersionQuery::Tag(trimmed.to_string()));
        }

        NpmRange::parse(trimmed).map(VersionQuery::Range)
    }

    /// Whether a concrete version satisfies the query. Dist-tags never match
    /// directly; they have to be looked up in the package's `dist-tags` first.
    pub fn matches(&self, version: &Version) -> bool {
        match self {
            VersionQuery::Exact(exact) => exact == version,
            VersionQuery::Tag(_) => false,
            VersionQuery::Range(range) => range.matches(version),
        }
    }
}

impl fmt::Display for VersionQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VersionQuery::Exact(version) => write!(f, "{version}"),
            VersionQuery::Tag(tag) => f.write_str(tag),
            VersionQuery::Range(range) => f.write_str(&range.raw),
        }
    }
}

/// An npm range expression (`^18.3.0 || ^19.0.0`, `>=1.2 <2`, `1.x`, `1.0.0 - 1.4`).
///
/// Each `||` alternative is translated into a [`VersionReq`]. Bare versions are
/// exact in npm, so they become `=` comparators; wildcard components are
/// dropped so `1.2.x` turns into `=1.2`, which the semver crate reads as
/// `>=1.2.0, <1.3.0`. Prerelease handling follows the semver crate, which uses
/// the same rule as npm: a prerelease only matches a comparator set that names
/// a prerelease on the same `major.minor.patch`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NpmRange {
    raw: String,
    alternatives: Vec<VersionReq>,
}

impl NpmRange {
    pub fn parse(raw: &str) -> Option<Self> {
        let mut alternatives = Vec::new();
        for set in raw.split("||") {
            alternatives.push(parse_comparator_set(set.trim())?);
        }

        Some(Self {
            raw: raw.trim().to_string(),
            alternatives,
        })
    }

    pub fn matches(&self, version: &Version) -> bool {
        self.alternatives.iter().any(|req| req.matches(version))
    }
}

fn parse_exact(raw: &str) -> Option<Version> {
    let stripped = raw.strip_prefix('=').unwrap_or(raw).trim();
    let stripped = strip_v_prefix(stripped);
    Version::parse(stripped).ok()
}

fn strip_v_prefix(raw: &str) -> &str {
    match raw.strip_prefix('v') {
        Some(rest) if rest.starts_with(|c: char| c.is_ascii_digit()) => rest,
        _ => raw,
    }
}

fn is_dist_tag(raw: &str) -> bool {
    let mut chars = raw.chars();
    let Some(first) = chars.next() else {
        return false;
    };

    if !first.is_ascii_alphabetic() || matches!(raw, "x" | "X") {
        return false;
    }

    // `v15` style tokens are versions, not tags.
    if strip_v_prefix(raw) != raw {
        return false;
    }

    chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '.' | '_'))
}

fn parse_comparator_set(set: &str) -> Option<VersionReq> {
    if set.is_empty() || matches!(set, "*" | "x" | "X") {
        return Some(VersionReq::STAR);
    }

    if let Some((low, high)) = set.split_once(" - ") {
        let low = normalize_partial(low.trim())?;
        let high = normalize_partial(high.trim())?;
        let mut comparators = Vec::new();
        if !low.is_empty() {
            comparators.push(format!(">={low}"));
        }
        if !high.is_empty() {
            comparators.push(format!("<={high}"));
        }
        return build_req(&comparators);
    }

    let mut comparators = Vec::new();
    let mut pending_op: Option<&str> = None;

    for token in set.split_whitespace() {
        let (op, rest) = split_operator(token);

        if rest.is_empty() {
            // Operator separated from its version by whitespace (`>= 1.2.3`).
            pending_op = Some(op);
            continue;
        }

        let op = match (pending_op.take(), op) {
            (Some(pending), "") => pending,
            (_, op) => op,
        };

        let partial = normalize_partial(rest)?;
        if partial.is_empty() {
            continue;
        }

        let op = match op {
            "" => "=",
            "~>" => "~",
            other => other,
        };
        comparators.push(format!("{op}{partial}"));
    }

    if pending_op.is_some() {
        return None;
    }

    build_req(&comparators)
}

fn build_req(comparators: &[String]) -> Option<VersionReq> {
    if comparators.is_empty() {
        return Some(VersionReq::STAR);
    }
    VersionReq::parse(&comparators.join(", ")).ok()
}

fn split_operator(token: &str) -> (&str, &str) {
    for op in ["<=", ">=", "~>", "<", ">", "=", "^", "~"] {
        if let Some(rest) = token.strip_prefix(op) {
            return (op, rest);
        }
    }
    ("", token)
}

/// Drops wildcard components (`1.x` → `1`, `*` → ``) and a leading `v`.
fn normalize_partial(raw: &str) -> Option<String> {
    let raw = strip_v_prefix(raw);
    let (core, suffix) = match raw.find(['-', '+']) {
        Some(idx) => raw.split_at(idx),
        None => (raw, ""),
    };

    let mut parts = Vec::new();
    for part in core.split('.') {
        if matches!(part, "x" | "X" | "*") {
            break;
        }
        if part.is_empty() || !part.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
        parts.push(part);
    }

    if parts.len() < 3 && !suffix.is_empty() {
        return None;
    }

    Some(format!("{}{}", parts.join("."), suffix))
}

pub struct VersionComparator;

impl VersionComparator {
    /// Highest published version satisfying `query`; unparseable entries are ignored.
    pub fn highest_matching(versions: &[String], query: &VersionQuery) -> Option<Version> {
        versions
            .iter()
            .filter_map(|v| Version::parse(v).ok())
            .filter(|v| query.matches(v))
            .max()
    }

    /// Check if version `a` is newer than version `b`
    pub fn is_newer(a: &Version, b: &Version) -> bool {
        a > b
    }
}
