use crate::{Error, Result};
use std::collections::HashSet;

/// Built-in adjectives, the outermost component of every Social ID.
pub const ADJECTIVES: &[&str] = &[
    "brave", "bright", "calm", "clever", "cosmic", "daring", "eager", "fancy",
    "fearless", "gentle", "glad", "happy", "humble", "jolly", "keen", "kind",
    "lively", "lucky", "merry", "mighty", "noble", "proud", "quick", "quiet",
    "radiant", "shiny", "silent", "swift", "sunny", "witty", "wise", "zesty",
];

/// Built-in colors, the middle component.
pub const COLORS: &[&str] = &[
    "amber", "azure", "beige", "black", "blue", "bronze", "coral", "crimson",
    "cyan", "gold", "gray", "green", "indigo", "ivory", "jade", "lilac",
    "magenta", "maroon", "olive", "orange", "pink", "purple", "silver", "teal",
];

/// Built-in fruits, the innermost component.
pub const FRUITS: &[&str] = &[
    "apple", "apricot", "banana", "cherry", "coconut", "date", "fig", "grape",
    "guava", "kiwi", "lemon", "lime", "lychee", "mango", "melon", "nectarine",
    "pomelo", "papaya", "peach", "pear", "plum", "quince", "berry", "tangerine",
];

/// The three ordered word lists an identifier space is built from.
///
/// Every list is non-empty and free of repeated words, which [`WordLists::new`]
/// checks. [`WordLists::default`] returns the built-in [`ADJECTIVES`],
/// [`COLORS`] and [`FRUITS`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WordLists {
    adjectives: Vec<String>,
    colors: Vec<String>,
    fruits: Vec<String>,
}

impl WordLists {
    /// Builds word lists from caller-supplied words.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidWordList`] if a list is empty, a word is empty
    /// or contains whitespace, or two words of the same list capitalize to the
    /// same string.
    ///
    /// # Example
    /// ```
    /// use socialid::WordLists;
    ///
    /// let words = WordLists::new(["brave"], ["crimson"], ["mango", "kiwi"]).unwrap();
    /// assert_eq!(words.fruits(), ["mango", "kiwi"]);
    /// assert!(WordLists::new(["brave"], Vec::<String>::new(), ["kiwi"]).is_err());
    /// ```
    pub fn new<A, C, F>(adjectives: A, colors: C, fruits: F) -> Result<Self>
    where
        A: IntoIterator,
        A::Item: Into<String>,
        C: IntoIterator,
        C::Item: Into<String>,
        F: IntoIterator,
        F::Item: Into<String>,
    {
        let adjectives = validate("adjectives", adjectives)?;
        let colors = validate("colors", colors)?;
        let fruits = validate("fruits", fruits)?;
        if space_size(adjectives.len(), colors.len(), fruits.len()).is_none() {
            return Err(Error::InvalidWordList {
                reason: "adjectives x colors x fruits overflows usize".into(),
            });
        }
        Ok(Self {
            adjectives,
            colors,
            fruits,
        })
    }

    pub fn adjectives(&self) -> &[String] {
        &self.adjectives
    }

    pub fn colors(&self) -> &[String] {
        &self.colors
    }

    pub fn fruits(&self) -> &[String] {
        &self.fruits
    }
}

impl Default for WordLists {
    fn default() -> Self {
        let owned = |words: &[&str]| words.iter().map(|w| (*w).to_owned()).collect();
        Self {
            adjectives: owned(ADJECTIVES),
            colors: owned(COLORS),
            fruits: owned(FRUITS),
        }
    }
}

/// `adjectives * colors * fruits`, or `None` on overflow.
pub(crate) fn space_size(adjectives: usize, colors: usize, fruits: usize) -> Option<usize> {
    adjectives.checked_mul(colors)?.checked_mul(fruits)
}

fn validate<I>(name: &str, words: I) -> Result<Vec<String>>
where
    I: IntoIterator,
    I::Item: Into<String>,
{
    let words: Vec<String> = words.into_iter().map(Into::into).collect();
    if words.is_empty() {
        return Err(Error::InvalidWordList {
            reason: format!("{name} must not be empty"),
        });
    }

    let mut seen = HashSet::with_capacity(words.len());
    for word in &words {
        if word.is_empty() || word.chars().any(char::is_whitespace) {
            return Err(Error::InvalidWordList {
                reason: format!("{name} contains an empty or whitespace word: {word:?}"),
            });
        }
        if !seen.insert(capitalize(word)) {
            return Err(Error::InvalidWordList {
                reason: format!("{name} repeats the word {word:?}"),
            });
        }
    }
    Ok(words)
}

/// Upper-cases the first character of `word`, leaving the rest as written.
///
/// Unlike title-casing helpers that also lower-case the tail, `"McIntosh"`
/// stays `"McIntosh"` rather than becoming `"Mcintosh"`.
///
/// # Example
/// ```
/// assert_eq!(socialid::capitalize("mango"), "Mango");
/// assert_eq!(socialid::capitalize("McIntosh"), "McIntosh");
/// ```
pub fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
