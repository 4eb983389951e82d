//! Database entry types
//!
//! Database entries are references to stored objects together with the mode recorded by
//! the tree that points at them.

pub mod database_entry;
