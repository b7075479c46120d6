// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Numeric identifier newtypes.

/// Define a newtype ID wrapper around `u64`.
///
/// Generates `new()`, `as_u64()`, `Display`, `From<u64>`, and
/// `PartialEq<u64>` implementations.
///
/// ```ignore
/// define_id! {
///     /// Doc comment for the ID type.
///     pub struct MyId;
/// }
/// ```
#[macro_export]
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        pub struct $name:ident;
    ) => {
        $(#[$meta])*
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            serde::Serialize,
            serde::Deserialize,
        )]
        pub struct $name(pub u64);

        impl $name {
            pub const fn new(id: u64) -> Self {
                Self(id)
            }

            pub const fn as_u64(&self) -> u64 {
                self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<u64> for $name {
            fn from(id: u64) -> Self {
                Self(id)
            }
        }

        impl PartialEq<u64> for $name {
            fn eq(&self, other: &u64) -> bool {
                self.0 == *other
            }
        }
    };
}

crate::define_id! {
    /// Unique identifier for a submitted job.
    ///
    /// Assigned monotonically by the pool at submission time, starting at 1.
    /// Never reused while the pool is running; the counter resets only when
    /// the pool is stopped.
    pub struct JobId;
}

crate::define_id! {
    /// Unique identifier for a worker instance.
    ///
    /// Worker id 0 is reserved to mean "not assigned to any worker".
    pub struct WorkerId;
}

#[cfg(test)]
#[path = "id_tests.rs"]
mod tests;
