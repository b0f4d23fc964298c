/// The outcome of [`Allocator::assign`].
///
/// Both variants carry the user's Social ID; they only differ in whether this
/// call consumed a pool entry.
///
/// [`Allocator::assign`]: crate::Allocator::assign
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "status", rename_all = "snake_case"))]
pub enum AssignStatus {
    /// A new identifier was popped from the pool and bound to the user.
    Issued {
        /// The newly bound Social ID.
        social_id: String,
    },
    /// The user was already bound; the pool was not touched.
    Existing {
        /// The Social ID bound on the user's first registration.
        social_id: String,
    },
}

impl AssignStatus {
    pub fn social_id(&self) -> &str {
        match self {
            Self::Issued { social_id } | Self::Existing { social_id } => social_id,
        }
    }

    pub fn into_social_id(self) -> String {
        match self {
            Self::Issued { social_id } | Self::Existing { social_id } => social_id,
        }
    }

    pub const fn is_issued(&self) -> bool {
        matches!(self, Self::Issued { .. })
    }
}

#[cfg(all(test, feature = "serde"))]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_status_tag() {
        let status = AssignStatus::Issued {
            social_id: "BraveCrimsonMango".into(),
        };
        let json = serde_json::to_string(&status).unwrap();
        assert_eq!(json, r#"{"status":"issued","social_id":"BraveCrimsonMango"}"#);
        let back: AssignStatus = serde_json::from_str(&json).unwrap();
        assert_eq!(back, status);
    }
}
