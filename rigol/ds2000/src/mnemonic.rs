//! Enumerations that map to SCPI mnemonics.

/// Define an enum whose variants map to fixed SCPI mnemonics.
///
/// Every variant lists the full mnemonic that is sent to the instrument, followed by the
/// abbreviations the instrument may use in its replies:
///
/// ```ignore
/// mnemonic_enum! {
///     /// Acquisition type.
///     pub enum AcquisitionType {
///         /// Normal acquisition.
///         Normal => "NORMAL" | "NORM",
///     }
/// }
/// ```
///
/// The generated enum implements [`std::fmt::Display`] and [`crate::SettingValue`].
macro_rules! mnemonic_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$vmeta:meta])*
                $variant:ident => $full:literal $(| $alias:literal)*,
            )+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        $vis enum $name {
            $(
                $(#[$vmeta])*
                $variant,
            )+
        }

        impl $name {
            /// All variants, in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// All spellings that are accepted in a reply.
            const REPLIES: &'static [&'static str] = &[$($full, $($alias,)*)+];

            /// The full mnemonic that is sent to the instrument.
            pub fn mnemonic(self) -> &'static str {
                match self {
                    $($name::$variant => $full,)+
                }
            }

            /// Look up a variant by its full mnemonic or one of its abbreviations, ignoring case.
            pub fn from_mnemonic(value: &str) -> Option<Self> {
                $(
                    if value.eq_ignore_ascii_case($full)
                        $(|| value.eq_ignore_ascii_case($alias))*
                    {
                        return Some($name::$variant);
                    }
                )+
                None
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.mnemonic())
            }
        }

        impl $crate::setting::SettingValue for $name {
            fn to_argument(&self) -> $crate::command::Argument {
                $crate::command::Argument::Mnemonic(self.mnemonic())
            }

            fn from_reply(raw: &[u8]) -> Result<Self, $crate::error::Ds2000Error> {
                let matched = $crate::codec::decode_enum(raw, Self::REPLIES)?;
                Self::from_mnemonic(matched).ok_or_else(|| {
                    $crate::error::Ds2000Error::UnexpectedValue {
                        value: matched.to_string(),
                        allowed: Self::REPLIES.iter().map(|s| s.to_string()).collect(),
                    }
                })
            }
        }
    };
}

pub(crate) use mnemonic_enum;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::setting::SettingValue;

    mnemonic_enum! {
        /// Test enum.
        enum Fruit {
            /// An apple.
            Apple => "APPLE" | "APPL",
            /// A kiwi.
            Kiwi => "KIWI",
        }
    }

    #[test]
    fn test_mnemonic() {
        assert_eq!(Fruit::Apple.mnemonic(), "APPLE");
        assert_eq!(Fruit::Kiwi.to_string(), "KIWI");
        assert_eq!(Fruit::ALL, &[Fruit::Apple, Fruit::Kiwi]);
    }

    #[test]
    fn test_from_reply() {
        assert_eq!(Fruit::from_reply(b"APPL").unwrap(), Fruit::Apple);
        assert_eq!(Fruit::from_reply(b"apple").unwrap(), Fruit::Apple);
        assert_eq!(Fruit::from_reply(b"KIWI").unwrap(), Fruit::Kiwi);
        assert!(Fruit::from_reply(b"PEAR").is_err());
    }
}
