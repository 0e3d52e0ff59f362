//! recipegen generates Minecraft recipe and data files in bulk.
//! Templates contain `{placeholder}` tokens in their file name and content;
//! every combination of the configured values produces one output file.

/// Command-line interface
pub mod cli;

/// Cartesian-product enumeration of replacement values
pub mod combination;

/// Configuration document loading, invariants and saving
pub mod config;

/// Reserved placeholder names and defaults
pub mod constants;

/// Placeholder substitution and `extra` override rules
pub mod engine;

/// Error types and handling
pub mod error;

/// Logger initialization for the binary
pub mod logger;

/// Namespace parsing of replacement values
pub mod namespace;

/// Batch orchestration over all configured templates
pub mod processor;

/// Background execution with events and cancellation
pub mod service;

/// Template model, loading and directory scanning
pub mod template;

/// Output file sink
pub mod writer;
