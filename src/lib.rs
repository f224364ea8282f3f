pub mod combat;
pub mod cpm;
pub mod dex;
pub mod error;
pub mod io;
pub mod iv_search;
pub mod moveset;
pub mod pokemon;
pub mod report;
pub mod types;
pub mod weather;

/// Declares a closed enum whose variants parse case-insensitively from their
/// names ("fire", "FIRE", "Partly Cloudy", "partly-cloudy") and display and
/// serialize as the given label.
#[macro_export]
macro_rules! define_enum_with_from_str {
    (
        $(#[$meta:meta])*
        $name:ident {
            $($variant:ident => $label:literal),+ $(,)?
        },
        error = $error:ident
    ) => {
        $(#[$meta])*
        #[allow(non_camel_case_types)]
        #[derive(Debug, PartialEq, Eq, Hash, Copy, Clone, PartialOrd, Ord)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn label(&self) -> &'static str {
                match self {
                    $($name::$variant => $label),+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = $crate::error::EngineError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let normalized = s
                    .trim()
                    .to_uppercase()
                    .replace(|c: char| c == ' ' || c == '-', "_");
                $(
                    if normalized == stringify!($variant) {
                        return Ok($name::$variant);
                    }
                )+
                Err($crate::error::EngineError::$error(s.to_string()))
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.pad(self.label())
            }
        }

        impl ::serde::Serialize for $name {
            fn serialize<S: ::serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.label())
            }
        }

        impl<'de> ::serde::Deserialize<'de> for $name {
            fn deserialize<D: ::serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let raw = <String as ::serde::Deserialize>::deserialize(deserializer)?;
                raw.parse().map_err(::serde::de::Error::custom)
            }
        }
    };
}
