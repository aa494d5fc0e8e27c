//! Async API client core for the classroom lessons service.
//!
//! # Overview
//! `LessonClient` builds `HttpRequest` values and parses `HttpResponse`
//! values without touching the network. `LessonGateway` drives it over a
//! `Transport`, attaching the bearer token supplied by a `TokenProvider` and
//! normalizing failures into `Server error (<status>): <body>`.
//!
//! # Design
//! - `LessonClient` is stateless; it holds only `base_url`.
//! - The gateway holds no mutable state either; tokens are read per call.
//! - Local lookups go through an explicit `SessionContext`.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod gateway;
pub mod http;
pub mod session;
pub mod transport;
pub mod types;

pub use auth::{SharedToken, StaticToken, TokenProvider};
pub use client::{LessonClient, DEFAULT_BASE_PATH};
pub use config::GatewayConfig;
pub use error::{GatewayError, TransportError};
pub use gateway::LessonGateway;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use session::SessionContext;
pub use transport::{Transport, UreqTransport};
pub use types::{Lesson, LessonId, User, UserId};
