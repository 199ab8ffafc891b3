//! Address helpers.
//!
//! Addresses are dot-separated paths such as
//! `module.net["a"].aws_subnet.private[0]`. A bracketed segment is a
//! repetition index produced by `count` or `for_each`; index keys may contain
//! dots, so splitting is bracket- and quote-aware.

use regex::Regex;
use std::sync::LazyLock;

/// Any repetition index, anywhere in an address.
static INDEX: LazyLock<Regex> = LazyLock::new(|| compile(r"\[[^\[\]]*\]"));

/// A repetition index closing the address.
static TRAILING_INDEX: LazyLock<Regex> = LazyLock::new(|| compile(r"\[[^\[\]]*\]$"));

#[allow(clippy::expect_used)]
fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("address patterns are valid")
}

/// Returns the config address: the address with every repetition index removed.
#[must_use]
pub fn strip_indexes(address: &str) -> String {
    INDEX.replace_all(address, "").into_owned()
}

/// Returns true if the address ends with a repetition index.
#[must_use]
pub fn has_trailing_index(address: &str) -> bool {
    TRAILING_INDEX.is_match(address)
}

/// Returns the bracket parent of an address, i.e. the address without its
/// trailing repetition index.
///
/// `aws_instance.web[0]` has the bracket parent `aws_instance.web`, while
/// `module.a[0].aws_instance.web` has none.
#[must_use]
pub fn bracket_parent(address: &str) -> Option<&str> {
    TRAILING_INDEX
        .find(address)
        .map(|m| &address[..m.start()])
        .filter(|parent| !parent.is_empty())
}

/// Splits an address into its dot-separated segments, keeping index keys
/// that contain dots intact.
#[must_use]
pub fn split_segments(address: &str) -> Vec<&str> {
    segment_spans(address)
        .into_iter()
        .map(|(start, end)| &address[start..end])
        .collect()
}

/// Returns the number of segments of an address.
#[must_use]
pub fn segment_count(address: &str) -> usize {
    segment_spans(address).len()
}

/// Returns the last segment of an address.
#[must_use]
pub fn last_segment(address: &str) -> &str {
    segment_spans(address)
        .last()
        .map_or(address, |&(start, end)| &address[start..end])
}

/// Returns the first `count` segments of an address as one slice.
#[must_use]
pub fn leading_segments(address: &str, count: usize) -> &str {
    let spans = segment_spans(address);
    match spans.get(count.saturating_sub(1)) {
        Some(&(_, end)) if count > 0 => &address[..end],
        _ if count == 0 => "",
        _ => address,
    }
}

/// Joins a module prefix and a module-relative address.
#[must_use]
pub fn join(prefix: &str, relative: &str) -> String {
    if prefix.is_empty() {
        relative.to_string()
    } else {
        format!("{prefix}.{relative}")
    }
}

/// Returns the address of the module enclosing a module address.
///
/// `module.a["x"].module.b[0]` is enclosed by `module.a["x"]`; top-level
/// module calls are enclosed by the root module (the empty address).
#[must_use]
pub fn parent_module(module_address: &str) -> &str {
    let spans = segment_spans(module_address);
    if spans.len() <= 2 {
        return "";
    }
    let (start, _) = spans[spans.len() - 2];
    &module_address[..start.saturating_sub(1)]
}

/// Computes the byte spans of every segment.
fn segment_spans(address: &str) -> Vec<(usize, usize)> {
    let mut spans = Vec::new();
    let mut start = 0;
    let mut depth = 0usize;
    let mut in_quotes = false;
    let mut escaped = false;

    for (i, c) in address.char_indices() {
        if in_quotes {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_quotes = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' if depth > 0 => in_quotes = true,
            '[' => depth += 1,
            ']' => depth = depth.saturating_sub(1),
            '.' if depth == 0 => {
                spans.push((start, i));
                start = i + 1;
            }
            _ => {}
        }
    }

    if !address.is_empty() {
        spans.push((start, address.len()));
    }

    spans
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_indexes() {
        assert_eq!(strip_indexes("aws_instance.web[0]"), "aws_instance.web");
        assert_eq!(
            strip_indexes(r#"module.net["a"].aws_subnet.sub["b"]"#),
            "module.net.aws_subnet.sub"
        );
        assert_eq!(strip_indexes("var.region"), "var.region");
    }

    #[test]
    fn test_bracket_parent() {
        assert_eq!(bracket_parent("x.a[1]"), Some("x.a"));
        assert_eq!(bracket_parent(r#"module.net["a"]"#), Some("module.net"));
        assert_eq!(bracket_parent("module.net[0].x.a"), None);
        assert_eq!(bracket_parent("x.a"), None);
        assert!(has_trailing_index("x.a[1]"));
        assert!(!has_trailing_index("module.net[0].x.a"));
    }

    #[test]
    fn test_split_segments_keeps_dotted_keys() {
        assert_eq!(
            split_segments(r#"module.dns["example.com"].aws_route53_zone.this"#),
            vec![
                "module",
                r#"dns["example.com"]"#,
                "aws_route53_zone",
                "this"
            ]
        );
        assert_eq!(segment_count("data.aws_ami.ubuntu.id"), 4);
        assert_eq!(segment_count(""), 0);
        assert_eq!(last_segment("aws_instance.web[3]"), "web[3]");
    }

    #[test]
    fn test_leading_segments() {
        assert_eq!(leading_segments("module.net.vpc_id", 2), "module.net");
        assert_eq!(leading_segments("module.net", 2), "module.net");
        assert_eq!(leading_segments(r#"module.n["a.b"].out"#, 2), r#"module.n["a.b"]"#);
        assert_eq!(leading_segments("module.net", 0), "");
    }

    #[test]
    fn test_join() {
        assert_eq!(join("", "var.region"), "var.region");
        assert_eq!(join("module.net", "var.cidr"), "module.net.var.cidr");
    }

    #[test]
    fn test_parent_module() {
        assert_eq!(parent_module("module.net"), "");
        assert_eq!(parent_module(r#"module.a["x"].module.b[0]"#), r#"module.a["x"]"#);
        assert_eq!(parent_module("module.a.module.b.module.c"), "module.a.module.b");
    }
}
