//! Macros for declaring the closed lifecycle enums.

/// Declare a closed, fieldless enum whose variants carry a canonical
/// SCREAMING_SNAKE name.
///
/// The generated type is `Copy`, hashable and serde-compatible under the
/// canonical names, lists its variants in `ALL`, renders with `Display`
/// and parses with `FromStr` (failing with the given parse error, a tuple
/// struct wrapping the rejected input).
///
/// # Example
///
/// ```
/// use rebalance::lifecycle_enum;
///
/// #[derive(Debug)]
/// pub struct ParseLightError(pub String);
///
/// lifecycle_enum! {
///     pub enum Light: ParseLightError {
///         Red => "RED",
///         Green => "GREEN",
///     }
/// }
///
/// assert_eq!(Light::Red.to_string(), "RED");
/// assert_eq!("GREEN".parse::<Light>().unwrap(), Light::Green);
/// assert!("BLUE".parse::<Light>().is_err());
/// assert_eq!(Light::ALL.len(), 2);
/// ```
#[macro_export]
macro_rules! lifecycle_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident : $err:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident => $label:literal
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, serde::Serialize, serde::Deserialize)]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                #[serde(rename = $label)]
                $variant
            ),*
        }

        impl $name {
            /// Every variant, in declaration order.
            pub const ALL: &'static [$name] = &[$(Self::$variant),*];

            /// Canonical name of the variant.
            pub fn name(&self) -> &'static str {
                match self {
                    $(Self::$variant => $label),*
                }
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.pad(self.name())
            }
        }

        impl ::std::str::FromStr for $name {
            type Err = $err;

            fn from_str(s: &str) -> ::std::result::Result<Self, Self::Err> {
                match s {
                    $($label => Ok(Self::$variant),)*
                    other => Err($err(other.to_string())),
                }
            }
        }
    };
}
