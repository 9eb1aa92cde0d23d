use std::collections::HashSet;

use fitcoach_domain::role::Role;

/// Static set of admin email addresses. Case-sensitive, fixed after startup.
#[derive(Debug, Clone, Default)]
pub struct AdminAllowList {
    emails: HashSet<String>,
}

impl AdminAllowList {
    pub fn new<I, E>(emails: I) -> Self
    where
        I: IntoIterator<Item = E>,
        E: Into<String>,
    {
        Self {
            emails: emails.into_iter().map(Into::into).collect(),
        }
    }

    /// Parse a comma-separated list, ignoring blanks around entries.
    pub fn from_csv(csv: &str) -> Self {
        Self::new(
            csv.split(',')
                .map(str::trim)
                .filter(|email| !email.is_empty()),
        )
    }

    /// Admin iff `email` is on the list; every other input is a client.
    pub fn resolve_role(&self, email: &str) -> Role {
        if self.emails.contains(email) {
            Role::Admin
        } else {
            Role::Client
        }
    }

    pub fn len(&self) -> usize {
        self.emails.len()
    }

    pub fn is_empty(&self) -> bool {
        self.emails.is_empty()
    }
}
