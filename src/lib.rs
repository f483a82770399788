// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Car Board - Member and Token Authentication Service
//!
//! This crate provides the account side of the car content board: member
//! registration, password and Kakao login, and stateless HMAC-signed bearer
//! tokens with refresh-token rotation.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers (Axum)
//! - `auth` - Token codec, signer, gate middleware, and session rotation
//! - `config` - Environment configuration
//! - `store` - In-memory member store

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod state;
pub mod store;
