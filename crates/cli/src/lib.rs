//! Library half of the `orgscan` binary.
pub mod export;
pub mod sources;
