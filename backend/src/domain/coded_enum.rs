//! Helper macro for closed enumerations persisted as integer codes.
//!
//! Each generated enum carries a stable storage code, a snake_case machine
//! name (also its serde representation), and a display label used by
//! reports.

use std::fmt;

/// Parse error shared by every coded enum.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseCodedEnumError {
    /// Name of the enum that rejected the input.
    pub kind: &'static str,
    /// Rejected input.
    pub input: String,
}

impl fmt::Display for ParseCodedEnumError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid {}: {}", self.kind, self.input)
    }
}

impl std::error::Error for ParseCodedEnumError {}

macro_rules! define_coded_enum {
    (
        $(#[$outer:meta])*
        pub enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident = ($code:expr, $text:literal, $label:literal)
            ),+ $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
        )]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                $variant,
            )+
        }

        impl $name {
            /// Every variant in declaration order.
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            /// Machine name, identical to the serde representation.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $text,)+
                }
            }

            /// Human-facing label.
            pub fn label(&self) -> &'static str {
                match self {
                    $(Self::$variant => $label,)+
                }
            }

            /// Stable integer code used by storage.
            pub fn code(&self) -> i32 {
                match self {
                    $(Self::$variant => $code,)+
                }
            }

            /// Resolve a storage code.
            pub fn from_code(code: i32) -> Option<Self> {
                Self::ALL.iter().copied().find(|value| value.code() == code)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = $crate::domain::coded_enum::ParseCodedEnumError;

            fn from_str(value: &str) -> Result<Self, Self::Err> {
                Self::ALL
                    .iter()
                    .copied()
                    .find(|candidate| candidate.as_str() == value)
                    .ok_or_else(|| $crate::domain::coded_enum::ParseCodedEnumError {
                        kind: stringify!($name),
                        input: value.to_owned(),
                    })
            }
        }
    };
}

pub(crate) use define_coded_enum;
