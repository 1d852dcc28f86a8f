//! Identity derived from token claims.

use crate::token::Claims;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Who is logged in, as claimed by the current token.
///
/// Always rebuilt from the stored token; never cached as a second source of
/// truth.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Identity {
    claims: Claims,
}

impl Identity {
    pub fn subject(&self) -> Option<&str> {
        self.claims.subject()
    }

    pub fn name(&self) -> Option<&str> {
        self.claims.name()
    }

    pub fn email(&self) -> Option<&str> {
        self.claims.email()
    }

    pub fn role(&self) -> Option<&str> {
        self.claims.role()
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.role() == Some(role)
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.claims.expires_at()
    }

    pub fn claims(&self) -> &Claims {
        &self.claims
    }
}

impl From<Claims> for Identity {
    fn from(claims: Claims) -> Self {
        Self { claims }
    }
}
