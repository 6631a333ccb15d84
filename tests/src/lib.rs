//! # Block Ledger Test Suite
//!
//! ## Structure
//!
//! ```text
//! tests/
//! ├── benches/          # criterion benchmarks (append, lookup, search)
//! └── src/integration/  # end-to-end flows across block-ledger and ledger-node
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p ledger-tests
//! cargo bench -p ledger-tests
//! ```

pub mod integration;
