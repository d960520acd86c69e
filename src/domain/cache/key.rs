//! Cache key construction

use std::fmt;

/// Key namespace for one entity kind.
///
/// Keys are `<prefix>_<id>`, so ids never collide across namespaces that
/// use distinct prefixes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyNamespace {
    prefix: String,
}

impl KeyNamespace {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    /// Namespace used for product entries
    pub fn product() -> Self {
        Self::new("product")
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn key(&self, id: &str) -> String {
        format!("{}_{}", self.prefix, id)
    }
}

impl fmt::Display for KeyNamespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.prefix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_key() {
        assert_eq!(KeyNamespace::product().key("1"), "product_1");
        assert_eq!(KeyNamespace::product().key("p1"), "product_p1");
    }

    #[test]
    fn test_key_is_deterministic() {
        let ns = KeyNamespace::new("order");
        assert_eq!(ns.key("abc"), ns.key("abc"));
        assert_ne!(ns.key("abc"), KeyNamespace::product().key("abc"));
    }
}
