//! Core components for provisioning cloud resources and signing access tokens.
//!
//! This crate provides the foundational types and traits for the provsign
//! workspace. It defines the execution context the service crates run in and
//! the abstractions that keep every remote collaborator swappable in tests.
//!
//! ## Overview
//!
//! The crate is built around a few key concepts:
//!
//! - **Context**: a container that holds implementations for HTTP sending and
//!   environment access
//! - **ProvideCredential**: an abstract interface for loading credentials from
//!   various sources, composable into a first-success-wins chain
//! - **Error**: a kind-based error type that lets callers distinguish the one
//!   recoverable condition (a missing remote resource) from everything else
//!
//! ## Example
//!
//! ```no_run
//! use provsign_core::{Context, OsEnv, ProvideCredential, Result, SigningCredential};
//! use async_trait::async_trait;
//!
//! #[derive(Clone, Debug)]
//! struct MyCredential {
//!     token: String,
//! }
//!
//! impl SigningCredential for MyCredential {
//!     fn is_valid(&self) -> bool {
//!         !self.token.is_empty()
//!     }
//! }
//!
//! #[derive(Debug)]
//! struct MyProvider;
//!
//! #[async_trait]
//! impl ProvideCredential for MyProvider {
//!     type Credential = MyCredential;
//!
//!     async fn provide_credential(&self, ctx: &Context) -> Result<Option<Self::Credential>> {
//!         Ok(ctx.env_var("MY_TOKEN").map(|token| MyCredential { token }))
//!     }
//! }
//!
//! # async fn example() -> Result<()> {
//! let ctx = Context::new().with_env(OsEnv);
//! let cred = MyProvider.provide_credential(&ctx).await?;
//! # Ok(())
//! # }
//! ```

// Make sure all our public APIs have docs.
#![warn(missing_docs)]

pub mod hash;
pub mod time;
pub mod utils;

mod context;
pub use context::Context;
mod env;
pub use env::{Env, OsEnv, StaticEnv};
mod http;
pub use http::HttpSend;

mod api;
pub use api::{ProvideCredential, ProvideCredentialChain, SigningCredential};

mod error;
pub use error::{Error, ErrorKind, Result};
