/// Pick the widest candidate from a `srcset` attribute value.
///
/// Entries are `url [descriptor]`, separated by commas. A descriptor ending in
/// `w` gives the width; anything else (density descriptors, missing or
/// malformed widths) counts as width 0. Ties on the maximum width go to the
/// last entry.
pub fn select_best(attribute: &str) -> Option<&str> {
    let mut candidates: Vec<(i64, &str)> = attribute
        .split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .filter_map(|entry| {
            let mut parts = entry.split_whitespace();
            let url = parts.next()?;
            let width = parts.next().map(parse_width).unwrap_or(0);
            Some((width, url))
        })
        .collect();

    // Stable sort keeps document order among equal widths.
    candidates.sort_by_key(|(width, _)| *width);
    candidates.last().map(|(_, url)| *url)
}

fn parse_width(descriptor: &str) -> i64 {
    descriptor
        .strip_suffix('w')
        .and_then(|digits| digits.parse::<i64>().ok())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::select_best;

    #[test]
    fn widest_candidate_wins() {
        assert_eq!(select_best("s.jpg 320w, m.jpg 640w, l.jpg"), Some("m.jpg"));
    }

    #[test]
    fn ties_go_to_the_last_entry() {
        assert_eq!(select_best("a.jpg 300w, b.jpg 300w"), Some("b.jpg"));
    }

    #[test]
    fn density_descriptors_count_as_zero_width() {
        assert_eq!(select_best("foo.jpg 1x, bar.jpg 2x"), Some("bar.jpg"));
        assert_eq!(select_best("foo.jpg 100w, bar.jpg 2x"), Some("foo.jpg"));
    }

    #[test]
    fn malformed_width_counts_as_zero() {
        assert_eq!(select_best("a.jpg 12abw, b.jpg 5w"), Some("b.jpg"));
    }

    #[test]
    fn empty_attribute_has_no_candidate() {
        assert_eq!(select_best(""), None);
        assert_eq!(select_best(" , ,"), None);
    }

    #[test]
    fn single_url_without_descriptor() {
        assert_eq!(select_best("only.png"), Some("only.png"));
    }
}
