//! Macro for mapping closed wire enumerations to and from server text
//!
//! The remote server reports states as free text. Enumerations that model a
//! closed set of those states go through an explicit table so that any value
//! outside the table is rejected instead of being coerced to a default.
//!
//! # Example
//!
//! ```rust
//! use jenkins_trigger_domain::impl_wire_enum_conversions;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! pub enum Color {
//!     Blue,
//!     Red,
//! }
//!
//! impl_wire_enum_conversions!(Color {
//!     Blue => "blue",
//!     Red => "red",
//! });
//!
//! assert_eq!(Color::Blue.as_str(), "blue");
//! assert!("BLUE".parse::<Color>().is_err());
//! ```

/// Implements `as_str`, `ALL`, `Display` and `FromStr` for a wire enum.
///
/// Parsing is exact: the server text must match one of the table entries
/// byte for byte. The `FromStr` error carries the rejected text.
#[macro_export]
macro_rules! impl_wire_enum_conversions {
    ($enum_name:ident { $($variant:ident => $str:expr),+ $(,)? }) => {
        impl $enum_name {
            /// Every variant, in table order.
            pub const ALL: &'static [$enum_name] = &[$(Self::$variant),+];

            /// Text used for this variant on the wire.
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
                match s {
                    $($str => Ok(Self::$variant),)+
                    other => Err(other.to_string()),
                }
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum TestState {
        Queued,
        Running,
        Done,
    }

    impl_wire_enum_conversions!(TestState {
        Queued => "QUEUED",
        Running => "RUNNING",
        Done => "DONE",
    });

    #[test]
    fn test_display_uses_wire_text() {
        assert_eq!(TestState::Queued.to_string(), "QUEUED");
        assert_eq!(TestState::Running.to_string(), "RUNNING");
        assert_eq!(TestState::Done.to_string(), "DONE");
    }

    #[test]
    fn test_fromstr_exact_match() {
        assert_eq!(TestState::from_str("QUEUED").unwrap(), TestState::Queued);
        assert_eq!(TestState::from_str("DONE").unwrap(), TestState::Done);
    }

    #[test]
    fn test_fromstr_rejects_other_case() {
        assert_eq!(TestState::from_str("queued").unwrap_err(), "queued");
        assert!(TestState::from_str("Running").is_err());
    }

    #[test]
    fn test_fromstr_rejects_empty() {
        assert!(TestState::from_str("").is_err());
    }

    #[test]
    fn test_all_lists_every_variant_in_order() {
        assert_eq!(TestState::ALL, &[TestState::Queued, TestState::Running, TestState::Done]);
        for state in TestState::ALL {
            assert_eq!(TestState::from_str(state.as_str()).unwrap(), *state);
        }
    }
}
