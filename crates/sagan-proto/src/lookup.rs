//! Numeric code lookup tables.
//!
//! Opcodes, classes, response codes and record types are closed tables of
//! RFC mnemonics. A value that is not in its table is still a valid value:
//! it is kept as [`Code::Unknown`] and rendered as its decimal string.

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::marker::PhantomData;

/// A closed table of numeric codes with RFC mnemonics.
pub trait Mnemonic: Copy + Eq + Sized + 'static {
    /// Every entry in the table.
    const ALL: &'static [Self];

    /// Looks up a numeric value.
    fn from_code(code: u16) -> Option<Self>;

    /// Returns the numeric value.
    fn code(self) -> u16;

    /// Returns the RFC mnemonic.
    fn mnemonic(self) -> &'static str;

    /// Looks up a mnemonic, ignoring ASCII case.
    fn from_mnemonic(text: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|entry| entry.mnemonic().eq_ignore_ascii_case(text))
    }
}

/// A code value that may or may not be in its table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Code<T> {
    /// A value with a known mnemonic.
    Known(T),
    /// A value outside the table.
    Unknown(u16),
}

impl<T: Mnemonic> Code<T> {
    /// Creates a code from its numeric value. Never fails.
    #[inline]
    pub fn from_u16(value: u16) -> Self {
        T::from_code(value).map_or(Self::Unknown(value), Self::Known)
    }

    /// Returns the numeric value.
    #[inline]
    pub fn to_u16(self) -> u16 {
        match self {
            Self::Known(known) => known.code(),
            Self::Unknown(value) => value,
        }
    }

    /// Returns the table entry if known.
    #[inline]
    pub fn as_known(self) -> Option<T> {
        match self {
            Self::Known(known) => Some(known),
            Self::Unknown(_) => None,
        }
    }

    /// Returns true if this is the given table entry.
    #[inline]
    pub fn is(self, entry: T) -> bool {
        self.as_known() == Some(entry)
    }

    /// Parses a mnemonic (any case) or a decimal value.
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        if let Some(known) = T::from_mnemonic(text) {
            return Some(Self::Known(known));
        }
        text.parse::<u16>().ok().map(Self::from_u16)
    }
}

impl<T: Mnemonic> From<u16> for Code<T> {
    fn from(value: u16) -> Self {
        Self::from_u16(value)
    }
}

impl<T: Mnemonic> fmt::Display for Code<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Known(known) => f.pad(known.mnemonic()),
            Self::Unknown(value) => f.pad(&value.to_string()),
        }
    }
}

impl<T: Mnemonic> Serialize for Code<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de, T: Mnemonic> Deserialize<'de> for Code<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct CodeVisitor<T>(PhantomData<T>);

        impl<T: Mnemonic> Visitor<'_> for CodeVisitor<T> {
            type Value = Code<T>;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a mnemonic or a 16-bit code")
            }

            fn visit_u64<E: de::Error>(self, value: u64) -> Result<Self::Value, E> {
                u16::try_from(value)
                    .map(Code::from_u16)
                    .map_err(|_| E::invalid_value(de::Unexpected::Unsigned(value), &self))
            }

            fn visit_i64<E: de::Error>(self, value: i64) -> Result<Self::Value, E> {
                u16::try_from(value)
                    .map(Code::from_u16)
                    .map_err(|_| E::invalid_value(de::Unexpected::Signed(value), &self))
            }

            fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
                Code::parse(value).ok_or_else(|| E::invalid_value(de::Unexpected::Str(value), &self))
            }
        }

        deserializer.deserialize_any(CodeVisitor(PhantomData))
    }
}

/// Implements [`Mnemonic`] for a `num_enum` table from `(variant, "MNEMONIC")`
/// pairs, so the table and its text live in one place.
macro_rules! mnemonic_table {
    ($ty:ident : $repr:ty { $($variant:ident => $text:literal),+ $(,)? }) => {
        impl $ty {
            /// Returns the RFC mnemonic.
            #[inline]
            pub const fn name(self) -> &'static str {
                match self {
                    $(Self::$variant => $text,)+
                }
            }
        }

        impl $crate::lookup::Mnemonic for $ty {
            const ALL: &'static [Self] = &[$(Self::$variant),+];

            #[inline]
            fn from_code(code: u16) -> Option<Self> {
                <$repr>::try_from(code).ok().and_then(|raw| Self::try_from(raw).ok())
            }

            #[inline]
            fn code(self) -> u16 {
                u16::from(<$repr>::from(self))
            }

            #[inline]
            fn mnemonic(self) -> &'static str {
                self.name()
            }
        }

        impl ::std::fmt::Display for $ty {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.pad(self.name())
            }
        }
    };
}

pub(crate) use mnemonic_table;
