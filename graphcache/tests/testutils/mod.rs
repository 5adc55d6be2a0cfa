//! Test utilities for GraphCache integration tests
//!
//! - ScriptedExecutor: in-memory graph engine stand-in with canned responses
//! - TestFixture: coordinator wired to a scripted executor and a memory store

#![allow(dead_code)]

pub mod scripted_executor;
pub mod test_fixture;
