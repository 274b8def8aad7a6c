//! Domains module containing business logic organized by bounded contexts.
//!
//! The tools domain is the only bounded context in this server: every
//! operation the gateway exposes resolves to a tool handler.

pub mod tools;
