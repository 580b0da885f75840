use serde::{Deserialize, Serialize};

/// Author name used when neither a verified identity nor the request body
/// provides one.
pub const ANONYMOUS_NAME: &str = "Anonymous";

/// Author id used when neither a verified identity nor the request body
/// provides one.
pub const ANONYMOUS_ID: &str = "anon";

/// Identity extracted from a verified ID token.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct VerifiedIdentity {
    pub uid: String,
    pub email: Option<String>,
    pub name: Option<String>,
}

impl VerifiedIdentity {
    pub fn new(uid: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            email: None,
            name: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }
}

/// Name and id recorded as the author of a post or comment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Author {
    pub name: String,
    pub id: String,
}

impl Author {
    /// Resolve the author of a post or comment.
    ///
    /// A verified identity always wins. Otherwise the self-declared values from
    /// the request body are used, and finally the anonymous defaults. Blank
    /// values count as absent.
    pub fn resolve(
        identity: Option<&VerifiedIdentity>,
        fallback_name: Option<&str>,
        fallback_id: Option<&str>,
    ) -> Self {
        let name = identity
            .and_then(|i| non_blank(i.name.as_deref()))
            .or_else(|| non_blank(fallback_name))
            .unwrap_or(ANONYMOUS_NAME);

        let id = identity
            .and_then(|i| non_blank(Some(i.uid.as_str())))
            .or_else(|| non_blank(fallback_id))
            .unwrap_or(ANONYMOUS_ID);

        Self {
            name: name.to_string(),
            id: id.to_string(),
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
