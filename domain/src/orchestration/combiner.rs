//! Order-preserving result combiner.
//!
//! Used both to merge one layer's agent outputs and to merge the final
//! outputs of every iteration before aggregation.

/// Line appended after every combined entry
pub const RESULT_SEPARATOR: &str = "\n---\n";

/// Concatenate each result followed by [`RESULT_SEPARATOR`], in the given order.
///
/// No trimming, deduplication or reordering is applied, so the output is a
/// pure function of the inputs and their order.
///
/// ```
/// use moa_domain::combine_results;
///
/// assert_eq!(combine_results(&["a", "b"]), "a\n---\nb\n---\n");
/// assert_eq!(combine_results::<&str>(&[]), "");
/// ```
pub fn combine_results<S: AsRef<str>>(results: &[S]) -> String {
    let capacity = results
        .iter()
        .map(|r| r.as_ref().len() + RESULT_SEPARATOR.len())
        .sum();
    let mut combined = String::with_capacity(capacity);
    for result in results {
        combined.push_str(result.as_ref());
        combined.push_str(RESULT_SEPARATOR);
    }
    combined
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_result() {
        assert_eq!(combine_results(&["only"]), "only\n---\n");
    }

    #[test]
    fn test_preserves_order_and_duplicates() {
        let results = vec!["b".to_string(), "a".to_string(), "b".to_string()];
        assert_eq!(combine_results(&results), "b\n---\na\n---\nb\n---\n");
    }

    #[test]
    fn test_no_trimming() {
        assert_eq!(combine_results(&["  x \n", ""]), "  x \n\n---\n\n---\n");
    }

    #[test]
    fn test_nested_combination() {
        // A layer output fed through the combiner again, as iterations are
        let layer = combine_results(&["a", "b"]);
        assert_eq!(combine_results(&[layer]), "a\n---\nb\n---\n\n---\n");
    }
}
