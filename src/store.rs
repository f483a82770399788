// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! In-memory member store.
//!
//! The token core only needs the narrow [`MemberStore`] contract: resolve a
//! subject, and read or overwrite the member's refresh binding. The rest of
//! [`InMemoryStore`] backs the member endpoints.

use std::collections::HashMap;

use chrono::Utc;
use thiserror::Error;
use uuid::Uuid;

use crate::models::Member;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Already exists: {0}")]
    AlreadyExists(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Member storage as seen by the token core.
pub trait MemberStore {
    /// Find the member whose email equals `subject`.
    fn find_by_subject(&self, subject: &str) -> Option<Member>;

    /// Overwrite the member's refresh token. Only one is live at a time.
    fn bind_refresh_token(&mut self, member_id: &str, token: &str) -> StoreResult<()>;

    /// The refresh token currently bound to the member, if any.
    fn current_refresh_token(&self, member_id: &str) -> Option<String>;
}

/// Fields needed to register a member.
#[derive(Debug, Clone, Default)]
pub struct NewMember {
    pub email: String,
    pub password_hash: Option<String>,
    pub nickname: String,
    pub profile_image: Option<String>,
    pub social_type: Option<String>,
    pub social_id: Option<String>,
}

#[derive(Default)]
pub struct InMemoryStore {
    members: HashMap<String, Member>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn insert_member(&mut self, new: NewMember) -> StoreResult<Member> {
        if self.email_exists(&new.email) {
            return Err(StoreError::AlreadyExists(format!("Member {}", new.email)));
        }

        let member = Member {
            id: Uuid::new_v4().to_string(),
            email: new.email,
            password_hash: new.password_hash,
            nickname: new.nickname,
            profile_image: new.profile_image,
            social_type: new.social_type,
            social_id: new.social_id,
            refresh_token: None,
            created_at: Utc::now(),
        };
        self.members.insert(member.id.clone(), member.clone());
        Ok(member)
    }

    pub fn find_by_email(&self, email: &str) -> Option<Member> {
        self.members
            .values()
            .find(|member| member.email == email)
            .cloned()
    }

    pub fn find_by_social_id(&self, social_type: &str, social_id: &str) -> Option<Member> {
        self.members
            .values()
            .find(|member| {
                member.social_type.as_deref() == Some(social_type)
                    && member.social_id.as_deref() == Some(social_id)
            })
            .cloned()
    }

    pub fn email_exists(&self, email: &str) -> bool {
        self.members.values().any(|member| member.email == email)
    }

    pub fn update_nickname(&mut self, member_id: &str, nickname: &str) -> StoreResult<()> {
        self.member_mut(member_id)?.nickname = nickname.to_string();
        Ok(())
    }

    pub fn update_password_hash(&mut self, member_id: &str, hash: String) -> StoreResult<()> {
        self.member_mut(member_id)?.password_hash = Some(hash);
        Ok(())
    }

    /// Remove the member together with its refresh binding.
    pub fn delete_member(&mut self, member_id: &str) -> StoreResult<Member> {
        self.members
            .remove(member_id)
            .ok_or_else(|| StoreError::NotFound(format!("Member {member_id}")))
    }

    fn member_mut(&mut self, member_id: &str) -> StoreResult<&mut Member> {
        self.members
            .get_mut(member_id)
            .ok_or_else(|| StoreError::NotFound(format!("Member {member_id}")))
    }
}

impl MemberStore for InMemoryStore {
    fn find_by_subject(&self, subject: &str) -> Option<Member> {
        self.find_by_email(subject)
    }

    fn bind_refresh_token(&mut self, member_id: &str, token: &str) -> StoreResult<()> {
        self.member_mut(member_id)?.refresh_token = Some(token.to_string());
        Ok(())
    }

    fn current_refresh_token(&self, member_id: &str) -> Option<String> {
        self.members
            .get(member_id)
            .and_then(|member| member.refresh_token.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_member(email: &str) -> NewMember {
        NewMember {
            email: email.to_string(),
            password_hash: Some("hash".to_string()),
            nickname: "driver".to_string(),
            ..NewMember::default()
        }
    }

    #[test]
    fn insert_rejects_duplicate_email() {
        let mut store = InMemoryStore::new();
        store.insert_member(new_member("user@example.com")).unwrap();

        let err = store.insert_member(new_member("user@example.com")).unwrap_err();
        assert!(matches!(err, StoreError::AlreadyExists(_)));
    }

    #[test]
    fn find_by_subject_uses_email() {
        let mut store = InMemoryStore::new();
        let member = store.insert_member(new_member("user@example.com")).unwrap();

        assert_eq!(store.find_by_subject("user@example.com"), Some(member));
        assert_eq!(store.find_by_subject("other@example.com"), None);
    }

    #[test]
    fn binding_overwrites_previous_token() {
        let mut store = InMemoryStore::new();
        let member = store.insert_member(new_member("user@example.com")).unwrap();
        assert_eq!(store.current_refresh_token(&member.id), None);

        store.bind_refresh_token(&member.id, "r1").unwrap();
        store.bind_refresh_token(&member.id, "r2").unwrap();
        assert_eq!(store.current_refresh_token(&member.id).as_deref(), Some("r2"));
    }

    #[test]
    fn binding_unknown_member_fails() {
        let mut store = InMemoryStore::new();
        assert!(matches!(
            store.bind_refresh_token("missing", "r1"),
            Err(StoreError::NotFound(_))
        ));
    }

    #[test]
    fn delete_drops_binding() {
        let mut store = InMemoryStore::new();
        let member = store.insert_member(new_member("user@example.com")).unwrap();
        store.bind_refresh_token(&member.id, "r1").unwrap();

        store.delete_member(&member.id).unwrap();
        assert_eq!(store.current_refresh_token(&member.id), None);
        assert!(!store.email_exists("user@example.com"));
    }

    #[test]
    fn finds_social_members_by_provider_id() {
        let mut store = InMemoryStore::new();
        let member = store
            .insert_member(NewMember {
                email: "kakao_42@social.com".to_string(),
                nickname: "kakao".to_string(),
                social_type: Some("KAKAO".to_string()),
                social_id: Some("42".to_string()),
                ..NewMember::default()
            })
            .unwrap();

        assert_eq!(store.find_by_social_id("KAKAO", "42"), Some(member));
        assert_eq!(store.find_by_social_id("KAKAO", "43"), None);
    }
}
