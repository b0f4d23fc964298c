use crate::words::space_size;
use crate::{Error, Result, WordLists, capitalize};
use std::collections::HashSet;

/// The full, enumerable set of candidate Social IDs.
///
/// Each candidate is one adjective, one color and one fruit, each capitalized
/// and concatenated (`"BraveCrimsonMango"`). Candidates are ordered by a
/// nested product: adjective outer, color middle, fruit inner. Index `i` maps
/// to the triple `(i / (C * F), (i / F) % C, i % F)`.
///
/// `len()` is the hard upper bound on how many users can ever be registered.
#[derive(Clone, Debug)]
pub struct IdentifierSpace {
    adjectives: Vec<String>,
    colors: Vec<String>,
    fruits: Vec<String>,
}

impl IdentifierSpace {
    /// Capitalizes every word once up front so lookups are plain
    /// concatenation.
    pub fn new(words: &WordLists) -> Self {
        let caps = |words: &[String]| words.iter().map(|w| capitalize(w)).collect();
        Self {
            adjectives: caps(words.adjectives()),
            colors: caps(words.colors()),
            fruits: caps(words.fruits()),
        }
    }

    /// Number of candidates, `|adjectives| * |colors| * |fruits|`.
    ///
    /// [`WordLists::new`] rejects lists whose product overflows, so this
    /// never saturates for a validated [`WordLists`].
    pub fn len(&self) -> usize {
        space_size(self.adjectives.len(), self.colors.len(), self.fruits.len())
            .unwrap_or(usize::MAX)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Renders the candidate at `index`, or `None` past the end.
    ///
    /// # Example
    /// ```
    /// use socialid::{IdentifierSpace, WordLists};
    ///
    /// let words = WordLists::new(["brave"], ["crimson"], ["mango", "kiwi"]).unwrap();
    /// let space = IdentifierSpace::new(&words);
    /// assert_eq!(space.len(), 2);
    /// assert_eq!(space.get(1).as_deref(), Some("BraveCrimsonKiwi"));
    /// assert_eq!(space.get(2), None);
    /// ```
    pub fn get(&self, index: usize) -> Option<String> {
        if index >= self.len() {
            return None;
        }
        let fruits = self.fruits.len();
        let colors = self.colors.len();
        let adjective = &self.adjectives[index / (colors * fruits)];
        let color = &self.colors[(index / fruits) % colors];
        let fruit = &self.fruits[index % fruits];
        Some(render(adjective, color, fruit))
    }

    /// Iterates every candidate in nested order.
    pub fn iter(&self) -> impl Iterator<Item = String> + '_ {
        self.adjectives.iter().flat_map(move |adjective| {
            self.colors.iter().flat_map(move |color| {
                self.fruits
                    .iter()
                    .map(move |fruit| render(adjective, color, fruit))
            })
        })
    }

    /// Returns `true` if `candidate` is one of the rendered identifiers.
    pub fn contains(&self, candidate: &str) -> bool {
        self.adjectives.iter().any(|adjective| {
            candidate.strip_prefix(adjective.as_str()).is_some_and(|rest| {
                self.colors.iter().any(|color| {
                    rest.strip_prefix(color.as_str())
                        .is_some_and(|fruit| self.fruits.iter().any(|f| f == fruit))
                })
            })
        })
    }

    /// Materializes the whole space.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateIdentifier`] if two different triples render
    /// to the same string, such as `Ab`+`CD` and `AbC`+`D` with the same fruit.
    /// Loading such a pool would hand the same ID to two users.
    pub fn enumerate(&self) -> Result<Vec<String>> {
        let mut seen = HashSet::with_capacity(self.len());
        let mut ids = Vec::with_capacity(self.len());
        for id in self.iter() {
            if !seen.insert(id.clone()) {
                return Err(Error::DuplicateIdentifier { identifier: id });
            }
            ids.push(id);
        }
        Ok(ids)
    }
}

fn render(adjective: &str, color: &str, fruit: &str) -> String {
    let mut id = String::with_capacity(adjective.len() + color.len() + fruit.len());
    id.push_str(adjective);
    id.push_str(color);
    id.push_str(fruit);
    id
}
