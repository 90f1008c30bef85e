//! # Utility Modules
//!
//! - **`logging`**: Initializes the `tracing` subscriber used by tests and by
//!   binaries that want to see guard and verdict events.

pub mod logging;
