//! Typed domain separators for canonical hashing.
//!
//! Every digest selects a domain via [`HashDomain`]; this module is the only
//! place domain-separator byte strings are spelled out. The enum, `as_bytes()`,
//! `ALL` and `Display` come from one macro invocation and cannot diverge.

/// Declares `HashDomain` enum, `as_bytes()`, `ALL`, and `Display` from one list.
macro_rules! define_hash_domains {
    (
        $(
            $(#[$meta:meta])*
            $variant:ident => $bytes:expr
        ),+ $(,)?
    ) => {
        /// Typed domain separator for [`super::hash::canonical_hash`].
        ///
        /// Every variant maps to a unique, null-terminated byte string used as
        /// a SHA-256 prefix.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum HashDomain {
            $(
                $(#[$meta])*
                $variant,
            )+
        }

        impl HashDomain {
            /// The raw domain-separator bytes (null-terminated).
            #[must_use]
            pub const fn as_bytes(&self) -> &'static [u8] {
                match self {
                    $( Self::$variant => $bytes, )+
                }
            }

            /// All domain variants in declaration order.
            ///
            /// Generated from the same macro invocation as the enum — cannot diverge.
            pub const ALL: &[HashDomain] = &[
                $( Self::$variant, )+
            ];
        }

        impl core::fmt::Display for HashDomain {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                match self {
                    $( Self::$variant => write!(f, stringify!($variant)), )+
                }
            }
        }
    };
}

define_hash_domains! {
    /// Sorted conflict/diagnosis families (the result digest).
    ResultFamily => b"HSDIAG::RESULT_FAMILY::V1\0",

    /// Full construction report (result families + policy echo + counters).
    ConstructionReport => b"HSDIAG::CONSTRUCTION_REPORT::V1\0",

    /// Search graph snapshot.
    SearchGraph => b"HSDIAG::SEARCH_GRAPH::V1\0",

    /// Constructor policy snapshot.
    PolicySnapshot => b"HSDIAG::POLICY_SNAPSHOT::V1\0",

    /// Benchmark determinism guard.
    BenchGuard => b"HSDIAG::BENCH_GUARD::V1\0",
}
