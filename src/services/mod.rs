// src/services/mod.rs
pub mod history;
