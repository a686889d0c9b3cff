use std::collections::BTreeSet;

/// Line-decoration directives carried by a code fence's meta string.
///
/// Derived once per block and immutable afterwards. Meta strings are free
/// text and may carry unrelated annotations, so anything unparsable
/// degrades to "no directives" instead of an error.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RangeSpec {
    // 1-based, blank lines included.
    pub highlighted_lines: BTreeSet<usize>,
    pub show_line_numbers: bool,
    pub line_number_start: usize,
}

impl Default for RangeSpec {
    fn default() -> Self {
        Self {
            highlighted_lines: BTreeSet::new(),
            show_line_numbers: false,
            line_number_start: 1,
        }
    }
}

/// Parses an optional meta string such as `"{1,3-4} showLineNumbers"`.
///
/// The `showLineNumbers` token is matched case-sensitively anywhere in the
/// string; `showLineNumbers=<n>` also moves the first rendered number to
/// `n`. At most one `{...}` group is honored.
pub fn parse_meta(meta: Option<&str>) -> RangeSpec {
    let mut spec = RangeSpec::default();
    let Some(meta) = meta else {
        return spec;
    };

    for token in meta.split_whitespace() {
        if token == "showLineNumbers" {
            spec.show_line_numbers = true;
        } else if let Some(start) = token.strip_prefix("showLineNumbers=")
            && let Ok(start) = start.parse::<usize>()
        {
            spec.show_line_numbers = true;
            spec.line_number_start = start;
        }
    }

    if let Some(body) = find_range_group(meta) {
        spec.highlighted_lines = parse_ranges(body);
    }

    spec
}

// Meta strings are free text, so braces may enclose anything; the range
// group is the first one whose body is made of digits, commas, hyphens,
// and whitespace only.
fn find_range_group(meta: &str) -> Option<&str> {
    let mut rest = meta;
    while let Some(open) = rest.find('{') {
        let tail = &rest[open + 1..];
        let close = tail.find('}')?;
        let body = &tail[..close];
        if body
            .chars()
            .all(|ch| ch.is_ascii_digit() || ch == ',' || ch == '-' || ch.is_whitespace())
        {
            return Some(body);
        }
        rest = &tail[close + 1..];
    }
    None
}

fn parse_ranges(body: &str) -> BTreeSet<usize> {
    let mut lines = BTreeSet::new();
    for entry in body.split(',') {
        let entry = entry.trim();
        if entry.is_empty() {
            continue;
        }
        if let Some((lo, hi)) = entry.split_once('-') {
            if let (Ok(lo), Ok(hi)) = (lo.trim().parse::<usize>(), hi.trim().parse::<usize>())
                && lo >= 1
                && lo <= hi
            {
                lines.extend(lo..=hi);
            }
        } else if let Ok(line) = entry.parse::<usize>()
            && line >= 1
        {
            lines.insert(line);
        }
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::parse_meta;
    use std::collections::BTreeSet;

    fn set(lines: &[usize]) -> BTreeSet<usize> {
        lines.iter().copied().collect()
    }

    #[test]
    fn equivalent_spellings_yield_the_same_set() {
        for meta in ["{1,3}", "{1, 3}", "{1-1,3-3}"] {
            assert_eq!(
                parse_meta(Some(meta)).highlighted_lines,
                set(&[1, 3]),
                "meta {meta:?}"
            );
        }
    }

    #[test]
    fn ranges_are_inclusive_on_both_ends() {
        assert_eq!(parse_meta(Some("{1-3}")).highlighted_lines, set(&[1, 2, 3]));
    }

    #[test]
    fn line_numbers_flag_is_case_sensitive() {
        assert!(parse_meta(Some("{1} showLineNumbers")).show_line_numbers);
        assert!(!parse_meta(Some("showlinenumbers")).show_line_numbers);
    }

    #[test]
    fn numbering_can_start_elsewhere() {
        let spec = parse_meta(Some("showLineNumbers=5"));
        assert!(spec.show_line_numbers);
        assert_eq!(spec.line_number_start, 5);
    }

    #[test]
    fn malformed_meta_degrades_to_no_directives() {
        for meta in ["{a-b}", "{1-}", "{-3}", "{0}", "{", "title=\"x\""] {
            let spec = parse_meta(Some(meta));
            assert!(spec.highlighted_lines.is_empty(), "meta {meta:?}");
            assert!(!spec.show_line_numbers, "meta {meta:?}");
        }
        assert_eq!(parse_meta(None), super::RangeSpec::default());
    }

    #[test]
    fn descending_ranges_are_skipped() {
        assert!(parse_meta(Some("{3-1}")).highlighted_lines.is_empty());
    }

    #[test]
    fn unrelated_brace_groups_do_not_shadow_the_range_group() {
        let spec = parse_meta(Some("title={x} {2,4}"));
        assert_eq!(spec.highlighted_lines, set(&[2, 4]));
    }
}
