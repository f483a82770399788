// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::auth::{
    signer::Signer, KakaoProvider, PublicRoutes, SocialIdentityProvider, TokenService,
};
use crate::config::{Config, ConfigError};
use crate::store::InMemoryStore;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<RwLock<InMemoryStore>>,
    pub tokens: Arc<TokenService>,
    pub public_routes: Arc<PublicRoutes>,
    pub social: Arc<dyn SocialIdentityProvider>,
}

impl AppState {
    pub fn new(
        tokens: TokenService,
        store: InMemoryStore,
        social: Arc<dyn SocialIdentityProvider>,
    ) -> Self {
        Self {
            store: Arc::new(RwLock::new(store)),
            tokens: Arc::new(tokens),
            public_routes: Arc::new(PublicRoutes::board_defaults()),
            social,
        }
    }

    /// Build production state. Fails if the signing secret is unusable.
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        let signer = Signer::new(&config.jwt_secret)?;
        let tokens = TokenService::new(signer, config.token_policy);
        let social = KakaoProvider::new(&config.kakao_user_info_url)?;
        Ok(Self::new(tokens, InMemoryStore::new(), Arc::new(social)))
    }

    /// Replace the gate's allow-list.
    pub fn with_public_routes(mut self, routes: PublicRoutes) -> Self {
        self.public_routes = Arc::new(routes);
        self
    }
}
