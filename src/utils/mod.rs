//! Utility functions and helpers for the lmest-rs library.

pub mod matrix_convert;
