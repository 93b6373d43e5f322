//! Core importer configuration

pub mod config;
