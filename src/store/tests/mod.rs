//! Unit tests for the store module.

mod memory_tests;
