// src/lib.rs — Library root for Vonk

pub mod api;
pub mod cli;
pub mod context;
pub mod infra;
pub mod persist;
