//! PFT: Procurement File Tracker
//!
//! A Unix-style tool for tracking physical procurement records across
//! shelves, cabinets, folders and boxes, stored as plain text YAML files.

pub mod cli;
pub mod core;
pub mod entities;
pub mod yaml;
