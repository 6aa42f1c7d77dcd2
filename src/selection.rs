//! Page selection: turn a user-entered expression such as `"1-3, 5, 7-10"`
//! into a concrete, ordered set of 1-based page numbers.
//!
//! Parsing is lenient. A token that is not a number, a range whose bounds
//! fall outside the document, or a reversed range is dropped on its own;
//! the rest of the expression still counts. An expression that selects
//! nothing resolves to an empty [`PageSet`], which callers treat as
//! "nothing to convert".

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// A deduplicated, ascending sequence of 1-based page numbers.
///
/// Every element lies in `1..=total_pages` for the page count it was
/// parsed against.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<usize>")]
pub struct PageSet(Vec<usize>);

impl PageSet {
    /// Every page of a document with `total_pages` pages.
    pub fn all(total_pages: usize) -> Self {
        Self((1..=total_pages).collect())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.0.iter().copied()
    }
}

impl FromIterator<usize> for PageSet {
    /// Collects page numbers, sorting and deduplicating them. Zero is dropped.
    fn from_iter<I: IntoIterator<Item = usize>>(iter: I) -> Self {
        let set: BTreeSet<usize> = iter.into_iter().filter(|&p| p >= 1).collect();
        Self(set.into_iter().collect())
    }
}

impl From<Vec<usize>> for PageSet {
    fn from(pages: Vec<usize>) -> Self {
        pages.into_iter().collect()
    }
}

impl<'a> IntoIterator for &'a PageSet {
    type Item = &'a usize;
    type IntoIter = std::slice::Iter<'a, usize>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for PageSet {
    /// Compact form, collapsing consecutive runs: `1-3, 5, 7-10`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        let mut iter = self.0.iter().copied().peekable();
        while let Some(start) = iter.next() {
            let mut end = start;
            while iter.peek() == Some(&(end + 1)) {
                end += 1;
                iter.next();
            }
            if !first {
                f.write_str(", ")?;
            }
            first = false;
            if start == end {
                write!(f, "{start}")?;
            } else {
                write!(f, "{start}-{end}")?;
            }
        }
        Ok(())
    }
}

/// Which pages of the document a run should convert.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PageSelection {
    /// Every page (default).
    #[default]
    All,
    /// An already-parsed page set, used exactly as given.
    Pages(PageSet),
    /// A raw expression, parsed once the document's page count is known.
    Expression(String),
}

impl PageSelection {
    /// Resolve the selection into the effective page set for a document.
    pub fn resolve(&self, total_pages: usize) -> PageSet {
        match self {
            PageSelection::All => PageSet::all(total_pages),
            PageSelection::Pages(set) => set.clone(),
            PageSelection::Expression(expr) => parse_selection(expr, total_pages),
        }
    }
}

/// Parse a page-range expression against a document of `total_pages` pages.
///
/// Tokens are comma-separated; each is a single page (`5`) or an inclusive
/// range (`7-10`). Whitespace around tokens and around the hyphen is ignored.
/// Never fails: invalid tokens are skipped.
pub fn parse_selection(expression: &str, total_pages: usize) -> PageSet {
    let mut pages = BTreeSet::new();

    for token in expression.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        if token.contains('-') {
            // Only the first two pieces count: "1-2-3" reads as 1-2.
            let mut bounds = token.split('-');
            let start = bounds.next().and_then(parse_page);
            let end = bounds.next().and_then(parse_page);
            let (Some(start), Some(end)) = (start, end) else {
                continue;
            };
            if start < 1 || end > total_pages || start > end {
                continue;
            }
            pages.extend(start..=end);
        } else if let Some(page) = parse_page(token) {
            if (1..=total_pages).contains(&page) {
                pages.insert(page);
            }
        }
    }

    PageSet(pages.into_iter().collect())
}

/// Read the leading number of one side of a token: an optional `+`, then
/// the run of ASCII digits up to the first other character. `"3abc"` reads
/// as 3, `"abc"` and `""` as nothing.
fn parse_page(s: &str) -> Option<usize> {
    let s = s.trim();
    let s = s.strip_prefix('+').unwrap_or(s);
    let digits = s.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }
    s[..digits].parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(expr: &str, total: usize) -> Vec<usize> {
        parse_selection(expr, total).as_slice().to_vec()
    }

    #[test]
    fn mixed_ranges_and_singles() {
        assert_eq!(parse("1-3, 5, 7-10", 10), vec![1, 2, 3, 5, 7, 8, 9, 10]);
    }

    #[test]
    fn range_past_end_is_dropped_whole() {
        assert_eq!(parse("1-3, 5, 7-10", 6), vec![1, 2, 3, 5]);
    }

    #[test]
    fn empty_expression() {
        assert!(parse("", 0).is_empty());
        assert!(parse("", 10).is_empty());
        assert!(parse("  , ,", 10).is_empty());
    }

    #[test]
    fn invalid_tokens_dropped_valid_kept() {
        assert_eq!(parse("0-2, abc, 3", 5), vec![3]);
    }

    #[test]
    fn overlaps_collapse() {
        assert_eq!(parse("1-3,2,3-5", 5), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn whitespace_around_hyphen() {
        assert_eq!(parse(" 2 - 4 ", 9), vec![2, 3, 4]);
    }

    #[test]
    fn reversed_range_dropped() {
        assert_eq!(parse("5-3, 1", 9), vec![1]);
    }

    #[test]
    fn out_of_range_singles_dropped() {
        assert_eq!(parse("0, 4, 11", 10), vec![4]);
    }

    #[test]
    fn negative_and_empty_bounds_dropped() {
        assert_eq!(parse("-1, 2", 10), vec![2]);
        assert_eq!(parse("-, 4-, -4, +, +-3", 10), Vec::<usize>::new());
    }

    #[test]
    fn leading_number_of_a_token_counts() {
        assert_eq!(parse("3abc", 10), vec![3]);
        assert_eq!(parse("2-4pages", 10), vec![2, 3, 4]);
        assert_eq!(parse("7.5", 10), vec![7]);
        assert_eq!(parse("a3", 10), Vec::<usize>::new());
    }

    #[test]
    fn plus_sign_accepted() {
        assert_eq!(parse("+4", 10), vec![4]);
        assert_eq!(parse("+1-+2", 10), vec![1, 2]);
    }

    #[test]
    fn extra_range_pieces_ignored() {
        assert_eq!(parse("1-2-3", 10), vec![1, 2]);
        assert_eq!(parse("1-2-3, 3abc", 10), vec![1, 2, 3]);
        assert_eq!(parse("2-12-1", 10), Vec::<usize>::new());
    }

    #[test]
    fn huge_numbers_dropped() {
        assert_eq!(parse("99999999999999999999999, 1-99999999999999999999999, 2", 10), vec![2]);
    }

    #[test]
    fn deserialized_page_set_is_normalised() {
        let set: PageSet = serde_json::from_str("[3, 1, 1, 0]").unwrap();
        assert_eq!(set.as_slice(), &[1, 3]);

        let selection: PageSelection = serde_json::from_str(r#"{"Pages": [5, 2, 5]}"#).unwrap();
        assert_eq!(selection.resolve(9).as_slice(), &[2, 5]);

        let json = serde_json::to_string(&set).unwrap();
        assert_eq!(json, "[1,3]");
    }

    #[test]
    fn zero_page_document_selects_nothing() {
        assert!(parse("1, 1-2", 0).is_empty());
    }

    #[test]
    fn output_is_sorted_unique_and_bounded() {
        let exprs = ["9,1,5-7,3", "10-10, 1-1, 4", "x, 2-8, 8, 7", "100, 1-100"];
        for total in [0, 1, 5, 10] {
            for expr in exprs {
                let got = parse(expr, total);
                assert!(got.windows(2).all(|w| w[0] < w[1]), "{expr} / {total}: {got:?}");
                assert!(got.iter().all(|&p| p >= 1 && p <= total), "{expr} / {total}: {got:?}");
            }
        }
    }

    #[test]
    fn parsing_is_deterministic() {
        assert_eq!(
            parse_selection("3, 1-2, 8-9", 9),
            parse_selection("3, 1-2, 8-9", 9)
        );
    }

    #[test]
    fn selection_resolve() {
        assert_eq!(PageSelection::All.resolve(3).as_slice(), &[1, 2, 3]);
        assert!(PageSelection::All.resolve(0).is_empty());
        let set: PageSet = vec![4, 2, 2].into_iter().collect();
        assert_eq!(PageSelection::Pages(set.clone()).resolve(1), set);
        assert_eq!(
            PageSelection::Expression("2-3".into()).resolve(5).as_slice(),
            &[2, 3]
        );
    }

    #[test]
    fn display_collapses_runs() {
        let set = parse_selection("1-3, 5, 7-10", 10);
        assert_eq!(set.to_string(), "1-3, 5, 7-10");
        assert_eq!(PageSet::default().to_string(), "");
    }
}
