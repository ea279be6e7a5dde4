//! Unit tests for `argot_runtime`.

mod error_tests;
mod keyvalue_tests;
