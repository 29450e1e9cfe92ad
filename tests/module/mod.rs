//! Module system tests
//!
//! Tests for the registration entry point under each host mode, dependency
//! resolution and shared-namespace publication.

pub mod registration_tests;
pub mod async_definer_tests;
pub mod package_loader_tests;
