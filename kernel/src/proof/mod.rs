//! Proof module: canonical JSON bytes and content hashing for result families.
//!
//! Depends on `constraint`. Nothing depends on `proof` within the kernel.

pub mod canon;
pub mod hash;
pub mod hash_domain;
