//! Nested word content consumed by [`crate::tree::Tree::grow`].

use crate::error::GrowError;

/// A word, or a group of further content that grows into its own sub-tree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Content {
    Word(String),
    Group(Vec<Content>),
}

impl Content {
    pub fn word(text: impl Into<String>) -> Self {
        Content::Word(text.into())
    }

    /// Parses whitespace-separated words with parenthesised groups.
    ///
    /// `"a (b c) d"` yields `[Word(a), Group([Word(b), Word(c)]), Word(d)]`.
    pub fn parse(input: &str) -> Result<Vec<Content>, GrowError> {
        let mut stack: Vec<(usize, Vec<Content>)> = Vec::new();
        let mut current: Vec<Content> = Vec::new();
        let mut word_start: Option<usize> = None;

        let flush = |start: &mut Option<usize>, end: usize, into: &mut Vec<Content>| {
            if let Some(s) = start.take() {
                into.push(Content::word(&input[s..end]));
            }
        };

        for (i, c) in input.char_indices() {
            match c {
                '(' => {
                    flush(&mut word_start, i, &mut current);
                    stack.push((i, std::mem::take(&mut current)));
                }
                ')' => {
                    flush(&mut word_start, i, &mut current);
                    let (_, mut outer) = stack.pop().ok_or(GrowError::UnbalancedGroup(i))?;
                    outer.push(Content::Group(std::mem::take(&mut current)));
                    current = outer;
                }
                c if c.is_whitespace() => flush(&mut word_start, i, &mut current),
                _ => {
                    word_start.get_or_insert(i);
                }
            }
        }
        flush(&mut word_start, input.len(), &mut current);

        if let Some((open, _)) = stack.pop() {
            return Err(GrowError::UnbalancedGroup(open));
        }
        Ok(current)
    }
}

impl From<&str> for Content {
    fn from(text: &str) -> Self {
        Content::word(text)
    }
}

impl<T: Into<Content>> From<Vec<T>> for Content {
    fn from(items: Vec<T>) -> Self {
        Content::Group(items.into_iter().map(Into::into).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    #[test]
    fn parses_flat_words() {
        let parsed = Content::parse("  oak  elm\tash ").unwrap();
        assert_eq!(
            parsed,
            vec![Content::word("oak"), Content::word("elm"), Content::word("ash")]
        );
    }

    #[test]
    fn parses_nested_groups() {
        let parsed = Content::parse("(a b)(c (d e)) f").unwrap();
        assert_eq!(
            parsed,
            vec![
                Content::from(vec!["a", "b"]),
                Content::Group(vec![Content::word("c"), Content::from(vec!["d", "e"])]),
                Content::word("f"),
            ]
        );
    }

    #[test]
    fn unbalanced_parentheses_are_reported() {
        assert!(matches!(
            Content::parse("a (b c"),
            Err(GrowError::UnbalancedGroup(2))
        ));
        assert!(matches!(
            Content::parse("a b)"),
            Err(GrowError::UnbalancedGroup(3))
        ));
    }

    #[test]
    fn empty_input_is_empty_content() {
        assert!(Content::parse("   ").unwrap().is_empty());
        assert_eq!(Content::parse("()").unwrap(), vec![Content::Group(Vec::new())]);
    }
}
