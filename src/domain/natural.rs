//! Natural ("human") ordering of names: `img2` before `img10`.

use std::cmp::Ordering;

/// A maximal run of either ASCII digits or non-digits.
#[derive(Debug, Clone, Copy)]
enum Chunk<'a> {
    /// Digit run with leading zeros stripped
    Number(&'a str),
    Text(&'a str),
}

impl Ord for Chunk<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            // No leading zeros left, so the longer run is the larger number.
            (Chunk::Number(a), Chunk::Number(b)) => a.len().cmp(&b.len()).then_with(|| a.cmp(b)),
            (Chunk::Number(_), Chunk::Text(_)) => Ordering::Less,
            (Chunk::Text(_), Chunk::Number(_)) => Ordering::Greater,
            (Chunk::Text(a), Chunk::Text(b)) => a
                .chars()
                .flat_map(char::to_lowercase)
                .cmp(b.chars().flat_map(char::to_lowercase)),
        }
    }
}

impl PartialOrd for Chunk<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Chunk<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Chunk<'_> {}

struct Chunks<'a> {
    rest: &'a str,
}

impl<'a> Iterator for Chunks<'a> {
    type Item = Chunk<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let first = self.rest.chars().next()?;
        let digits = first.is_ascii_digit();
        let end = self
            .rest
            .char_indices()
            .find(|(_, c)| c.is_ascii_digit() != digits)
            .map(|(i, _)| i)
            .unwrap_or(self.rest.len());
        let (head, tail) = self.rest.split_at(end);
        self.rest = tail;

        Some(if digits {
            Chunk::Number(head.trim_start_matches('0'))
        } else {
            Chunk::Text(head)
        })
    }
}

/// Compare two names in natural order.
///
/// Digit runs compare by numeric value (of any length), text runs compare
/// case-insensitively. Names that are equal under those rules (`a01`/`a1`,
/// `B`/`b`) fall back to byte order, which keeps this a total order.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    Chunks { rest: a }
        .cmp(Chunks { rest: b })
        .then_with(|| a.cmp(b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("img2", "img10", Ordering::Less)]
    #[case("img10", "img2", Ordering::Greater)]
    #[case("a", "B", Ordering::Less)]
    #[case("Chapter 9", "chapter 10", Ordering::Less)]
    #[case("1 intro", "intro", Ordering::Less)]
    #[case("v1.2.10", "v1.2.9", Ordering::Greater)]
    #[case("file", "file1", Ordering::Less)]
    #[case("same", "same", Ordering::Equal)]
    fn test_natural_cmp(#[case] a: &str, #[case] b: &str, #[case] expected: Ordering) {
        assert_eq!(natural_cmp(a, b), expected);
    }

    #[test]
    fn given_numerically_equal_names_when_comparing_then_order_is_still_strict() {
        assert_ne!(natural_cmp("a01", "a1"), Ordering::Equal);
        assert_eq!(natural_cmp("a01", "a1"), natural_cmp("a1", "a01").reverse());
        assert_ne!(natural_cmp("B", "b"), Ordering::Equal);
    }

    #[test]
    fn given_huge_digit_runs_when_comparing_then_no_overflow() {
        let small = "part99999999999999999999999999";
        let large = "part100000000000000000000000000";
        assert_eq!(natural_cmp(small, large), Ordering::Less);
    }

    #[test]
    fn given_list_when_sorting_then_natural_order() {
        let mut names = vec!["a2", "a10", "a1"];
        names.sort_by(|a, b| natural_cmp(a, b));
        assert_eq!(names, vec!["a1", "a2", "a10"]);

        let mut names = vec!["B", "a"];
        names.sort_by(|a, b| natural_cmp(a, b));
        assert_eq!(names, vec!["a", "B"]);
    }
}
