//! Unit test suite for gamelaunch
//!
//! Exercises the public library API of the pure parts of the pipeline: entry
//! point discovery, asset selection and version comparison. No network and no
//! processes are involved.
//!
//! ```bash
//! cargo test --test unit
//! ```

mod locator;
mod version_record;
