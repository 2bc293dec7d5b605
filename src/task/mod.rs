//! Escrowed task lifecycle for the marketplace.
//!
//! A client posts a task funded through escrow, executors respond, the
//! client selects one, the executor submits a report, the client confirms
//! completion, and both parties rate each other. The module follows
//! hexagonal architecture:
//!
//! - Domain types and the lifecycle state machine in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;
