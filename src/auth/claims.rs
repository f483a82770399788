// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Request-scoped authenticated identity.

use super::token::Subject;

/// Member identity attached to a request by the authentication gate.
///
/// Built only from a [`Subject`], which in turn only comes out of a
/// successful token validation. Lives in the request extensions and is
/// dropped with the request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedMember {
    subject: Subject,
}

impl AuthenticatedMember {
    pub fn new(subject: Subject) -> Self {
        Self { subject }
    }

    /// Member email carried in the token's `sub` claim.
    pub fn subject(&self) -> &str {
        self.subject.as_str()
    }
}

impl From<Subject> for AuthenticatedMember {
    fn from(subject: Subject) -> Self {
        Self::new(subject)
    }
}
