/// Key layout shared by every store backend.
///
/// With the default prefix `nelius`:
///
/// | key                      | type   | contents                    |
/// |--------------------------|--------|-----------------------------|
/// | `nelius:available_ids`   | list   | the unissued pool           |
/// | `nelius:user:<handle>`   | string | the bound Social ID         |
/// | `nelius:lock:<handle>`   | string | allocation lock token (TTL) |
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeySpace {
    prefix: String,
}

impl KeySpace {
    pub const DEFAULT_PREFIX: &'static str = "nelius";

    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn pool(&self) -> String {
        format!("{}:available_ids", self.prefix)
    }

    pub fn binding(&self, user_handle: &str) -> String {
        format!("{}:user:{user_handle}", self.prefix)
    }

    pub fn lock(&self, user_handle: &str) -> String {
        format!("{}:lock:{user_handle}", self.prefix)
    }
}

impl Default for KeySpace {
    fn default() -> Self {
        Self::new(Self::DEFAULT_PREFIX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_layout() {
        let keys = KeySpace::default();
        assert_eq!(keys.pool(), "nelius:available_ids");
        assert_eq!(keys.binding("42"), "nelius:user:42");
        assert_eq!(keys.lock("42"), "nelius:lock:42");
    }

    #[test]
    fn custom_prefix() {
        let keys = KeySpace::new("staging");
        assert_eq!(keys.prefix(), "staging");
        assert_eq!(keys.pool(), "staging:available_ids");
    }
}
