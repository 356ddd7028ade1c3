//! Tests for the opaque token store

#[cfg(test)]
mod payload_tests;
#[cfg(test)]
mod store_tests;
