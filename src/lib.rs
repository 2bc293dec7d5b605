//! Taskmarket: a peer-to-peer task marketplace core.
//!
//! This crate enforces the lifecycle of escrow-funded tasks: which role may
//! act on a task, in which state, and the invariants that hold across
//! responses, chat, and ratings.
//!
//! # Architecture
//!
//! Taskmarket follows hexagonal architecture principles:
//!
//! - **Domain**: Pure lifecycle rules with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for storage, escrow, and identity
//! - **Adapters**: Concrete implementations of ports (in-memory, JSON file)
//!
//! # Modules
//!
//! - [`task`]: Task lifecycle, chat, ratings, and role-filtered views
//! - [`config`]: Marketplace settings

pub mod config;
pub mod task;
