//! Joining message fragments into a single sentence.

/// Connectors used when joining a list of words into a sentence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Connectors<'a> {
    /// Joins the elements of lists with three or more elements (except the last pair).
    pub words: &'a str,
    /// Joins the elements of lists with exactly two elements.
    pub two_words: &'a str,
    /// Joins the last element of lists with three or more elements.
    pub last_word: &'a str,
}

impl<'a> Connectors<'a> {
    pub const fn new(words: &'a str, two_words: &'a str, last_word: &'a str) -> Self {
        Self {
            words,
            two_words,
            last_word,
        }
    }
}

/// `a, b, and c`
pub const AND_CONNECTORS: Connectors<'static> = Connectors::new(", ", " and ", ", and ");

/// `a, b, or c`
pub const OR_CONNECTORS: Connectors<'static> = Connectors::new(", ", " or ", ", or ");

/// Join `items` into one sentence.
///
/// An empty list yields an empty string and a single item is returned as is.
///
/// ```
/// use sch_core::sentence::{OR_CONNECTORS, to_sentence};
///
/// assert_eq!(to_sentence(&["a", "b", "c"], &OR_CONNECTORS), "a, b, or c");
/// ```
pub fn to_sentence<S: AsRef<str>>(items: &[S], connectors: &Connectors<'_>) -> String {
    match items {
        [] => String::new(),
        [only] => only.as_ref().to_string(),
        [first, second] => format!(
            "{}{}{}",
            first.as_ref(),
            connectors.two_words,
            second.as_ref()
        ),
        [head @ .., last] => {
            let mut sentence = String::new();
            for (idx, item) in head.iter().enumerate() {
                if idx > 0 {
                    sentence.push_str(connectors.words);
                }
                sentence.push_str(item.as_ref());
            }
            sentence.push_str(connectors.last_word);
            sentence.push_str(last.as_ref());
            sentence
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_list_is_empty_string() {
        let items: [&str; 0] = [];
        assert_eq!(to_sentence(&items, &AND_CONNECTORS), "");
    }

    #[test]
    fn single_item_is_unchanged() {
        assert_eq!(to_sentence(&["a"], &AND_CONNECTORS), "a");
    }

    #[test]
    fn two_items_use_two_words_connector() {
        assert_eq!(to_sentence(&["a", "b"], &AND_CONNECTORS), "a and b");
        assert_eq!(to_sentence(&["a", "b"], &OR_CONNECTORS), "a or b");
    }

    #[test]
    fn three_or_more_items_use_last_word_connector() {
        assert_eq!(to_sentence(&["a", "b", "c"], &AND_CONNECTORS), "a, b, and c");
        assert_eq!(
            to_sentence(&["a", "b", "c", "d"], &OR_CONNECTORS),
            "a, b, c, or d"
        );
    }

    #[test]
    fn custom_connectors_are_literal() {
        let connectors = Connectors::new(" + ", " & ", " & finally ");
        assert_eq!(
            to_sentence(&["x".to_string(), "y".to_string(), "z".to_string()], &connectors),
            "x + y & finally z"
        );
    }
}
