//! Region and offset property tests.

pub mod tests_offsets;
