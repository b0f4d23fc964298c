use rand::seq::SliceRandom;
use rand::{Rng, rng};

/// A source of random permutations for the identifier pool.
///
/// This abstraction allows plugging in the real RNG or a fixed ordering in
/// tests. The shuffle only keeps IDs from being handed out in lexical order;
/// it is not a secrecy measure.
///
/// # Example
/// ```
/// use socialid::ShuffleSource;
///
/// struct Reverse;
/// impl ShuffleSource for Reverse {
///     fn shuffle(&self, ids: &mut [String]) {
///         ids.reverse();
///     }
/// }
///
/// let mut ids = vec!["A".to_string(), "B".to_string()];
/// Reverse.shuffle(&mut ids);
/// assert_eq!(ids, ["B", "A"]);
/// ```
pub trait ShuffleSource {
    /// Permutes `ids` in place.
    fn shuffle(&self, ids: &mut [String]);
}

/// A source of lock ownership tokens.
///
/// Tokens only need to differ between concurrent lock holders, so that one
/// caller can never release a lock another caller acquired after expiry.
pub trait TokenSource {
    /// Returns a fresh token.
    fn token(&self) -> String;
}

/// A [`ShuffleSource`] and [`TokenSource`] backed by the thread-local RNG
/// (`rand::rng()`).
///
/// This type does not store the RNG; it accesses the thread-local generator
/// on each call, so it is zero-sized and may be shared freely across threads.
#[derive(Default, Clone, Copy, Debug)]
pub struct ThreadRandom;

impl ShuffleSource for ThreadRandom {
    fn shuffle(&self, ids: &mut [String]) {
        ids.shuffle(&mut rng());
    }
}

impl TokenSource for ThreadRandom {
    fn token(&self) -> String {
        format!("{:032x}", rng().random::<u128>())
    }
}

impl<T: ShuffleSource + ?Sized> ShuffleSource for &T {
    fn shuffle(&self, ids: &mut [String]) {
        (**self).shuffle(ids);
    }
}

impl<T: TokenSource + ?Sized> TokenSource for &T {
    fn token(&self) -> String {
        (**self).token()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn shuffle_keeps_members() {
        let original: Vec<String> = (0..1_000).map(|i| format!("Id{i}")).collect();
        let mut shuffled = original.clone();
        ThreadRandom.shuffle(&mut shuffled);

        assert_eq!(shuffled.len(), original.len());
        let a: HashSet<&String> = original.iter().collect();
        let b: HashSet<&String> = shuffled.iter().collect();
        assert_eq!(a, b);
        // 1000! orderings; a fixed point is not a realistic outcome.
        assert_ne!(shuffled, original);
    }

    #[test]
    fn tokens_are_fixed_width_and_distinct() {
        let tokens: HashSet<String> = (0..256).map(|_| ThreadRandom.token()).collect();
        assert_eq!(tokens.len(), 256);
        assert!(tokens.iter().all(|t| t.len() == 32));
    }
}
