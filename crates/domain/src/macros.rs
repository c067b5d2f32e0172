//! Macro for implementing Display and FromStr for string-backed enums
//!
//! Cache kinds and sources are persisted and logged as lowercase strings.
//! The macro keeps the string form in one place so the `Display` output and
//! the `FromStr` parser cannot drift apart.
//!
//! # Example
//!
//! ```rust
//! use zipcast_domain::impl_domain_enum_conversions;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! pub enum Origin {
//!     Cache,
//!     Upstream,
//! }
//!
//! impl_domain_enum_conversions!(Origin {
//!     Cache => "cache",
//!     Upstream => "upstream",
//! });
//!
//! assert_eq!(Origin::Upstream.to_string(), "upstream");
//! assert_eq!("CACHE".parse::<Origin>().unwrap(), Origin::Cache);
//! ```

/// Implements `Display`, `FromStr` and `as_str` for a fieldless enum.
///
/// Parsing is case-insensitive; output is always the listed string.
#[macro_export]
macro_rules! impl_domain_enum_conversions {
    ($enum_name:ident { $($variant:ident => $str:expr),+ $(,)? }) => {
        impl $enum_name {
            /// Canonical lowercase string form.
            pub const fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $str,)+
                }
            }
        }

        impl std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $enum_name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.to_lowercase().as_str() {
                    $($str => Ok(Self::$variant),)+
                    _ => Err(format!("Invalid {}: {}", stringify!($enum_name), s)),
                }
            }
        }
    };
}
