//! Visitor identity context
//!
//! Ephemeral, never persisted. Built from whatever the access form supplied.

/// The identifying attributes of an incoming visitor
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Visitor {
    email: Option<String>,
    domain: Option<String>,
}

impl Visitor {
    /// A visitor who supplied no identity
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Build a visitor from an optional email address
    ///
    /// The email is trimmed and lower-cased; the domain is the substring
    /// after the last `@`. Blank input yields an anonymous visitor.
    pub fn from_email(email: Option<&str>) -> Self {
        let email = match email.map(str::trim) {
            Some(e) if !e.is_empty() => e.to_lowercase(),
            _ => return Self::anonymous(),
        };

        let domain = email
            .rsplit_once('@')
            .map(|(_, d)| d.to_string())
            .filter(|d| !d.is_empty());

        Self {
            email: Some(email),
            domain,
        }
    }

    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    pub fn domain(&self) -> Option<&str> {
        self.domain.as_deref()
    }

    pub fn is_anonymous(&self) -> bool {
        self.email.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anonymous() {
        let visitor = Visitor::anonymous();
        assert!(visitor.is_anonymous());
        assert_eq!(visitor.email(), None);
        assert_eq!(visitor.domain(), None);
    }

    #[test]
    fn test_from_email_lowercases() {
        let visitor = Visitor::from_email(Some("Jane@ACME.com"));
        assert_eq!(visitor.email(), Some("jane@acme.com"));
        assert_eq!(visitor.domain(), Some("acme.com"));
    }

    #[test]
    fn test_from_email_trims() {
        let visitor = Visitor::from_email(Some("  bob@corp.io  "));
        assert_eq!(visitor.email(), Some("bob@corp.io"));
        assert_eq!(visitor.domain(), Some("corp.io"));
    }

    #[test]
    fn test_domain_after_last_at() {
        // Quoted local parts can legally contain '@'; the domain is whatever
        // follows the last one.
        let visitor = Visitor::from_email(Some("\"odd@local\"@real.com"));
        assert_eq!(visitor.domain(), Some("real.com"));
    }

    #[test]
    fn test_blank_email_is_anonymous() {
        assert!(Visitor::from_email(Some("")).is_anonymous());
        assert!(Visitor::from_email(Some("   ")).is_anonymous());
        assert!(Visitor::from_email(None).is_anonymous());
    }

    #[test]
    fn test_email_without_at_has_no_domain() {
        let visitor = Visitor::from_email(Some("not-an-email"));
        assert_eq!(visitor.email(), Some("not-an-email"));
        assert_eq!(visitor.domain(), None);
    }

    #[test]
    fn test_trailing_at_has_no_domain() {
        let visitor = Visitor::from_email(Some("jane@"));
        assert_eq!(visitor.domain(), None);
    }
}
