//! Shared test support for core scheduling tests.

pub mod repositories;
