//! Test suite for the sandbox
//!
//! Unit tests live next to the code they cover; this module holds the
//! session-level scenarios and the property-based checks.

#[cfg(test)]
mod integration;
