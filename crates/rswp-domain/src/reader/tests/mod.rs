//! Tests for the content reader.
//!
//! Organized by functionality:
//! - Batched record fetches and positional alignment
//! - Cache-aside behavior and write-back
//! - Category hierarchy (links, closure, safety limits)
//! - Query normalization and cursor paging
//! - Post assembly, users, menus, attachments

mod fixtures;
