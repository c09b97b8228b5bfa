//! HTTP-to-ledger gateway client.
//!
//! Bridges a small REST surface to a permissioned distributed ledger over
//! a signed, mutually authenticated gRPC channel.
//!
//! # Architecture Overview
//!
//! ```text
//!                    ┌─────────────────────────────────────────────┐
//!                    │                LEDGER GATEWAY               │
//!                    │                                             │
//!   HTTP Request     │  ┌──────┐   ┌────────┐   ┌──────────────┐  │
//!   ─────────────────┼─▶│ http │──▶│ ledger │──▶│   gateway    │  │
//!                    │  │router│   │  ops   │   │ contract     │  │
//!                    │  └──────┘   └────────┘   └──────┬───────┘  │
//!                    │                                 │          │
//!                    │             ┌───────────────────▼───────┐  │       Ledger
//!                    │             │ session = channel (TLS)   │──┼─────▶ Peer
//!                    │             │  + identity + signer      │  │     (gRPC)
//!                    │             │  + timeout policy         │  │
//!                    │             └───────────────────────────┘  │
//!                    │                                             │
//!                    │  ┌───────────────────────────────────────┐  │
//!                    │  │        Cross-Cutting Concerns         │  │
//!                    │  │  ┌────────┐ ┌──────────┐ ┌─────────┐  │  │
//!                    │  │  │ config │ │ identity │ │ logging │  │  │
//!                    │  │  └────────┘ └──────────┘ └─────────┘  │  │
//!                    │  └───────────────────────────────────────┘  │
//!                    └─────────────────────────────────────────────┘
//! ```

// Core subsystems
pub mod config;
pub mod gateway;
pub mod identity;
pub mod ledger;

// Boundary & cross-cutting concerns
pub mod http;
pub mod observability;

pub use config::GatewayConfig;
pub use gateway::{Contract, GatewayError, GatewaySession, TimeoutPolicy};
pub use http::HttpServer;
