//! # Proxy Herd Test Suite
//!
//! Cross-crate integration flows.
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! └── integration/
//!     ├── cascade.rs   # In-memory flooding over the cyclic built-in herd
//!     └── herd.rs      # Real TCP servers on ephemeral ports
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p ph-tests
//! cargo test -p ph-tests integration::cascade
//! ```

pub mod integration;
