/// Creates an algorithm enum with a numeric value and a short name for each variant.
/// Conversion from an unknown value or name fails with `Error::UnsupportedAlgorithm`.
macro_rules! algorithm_enum {
    ($(#[$outer:meta])* $name:ident, $ty:ty, $($(#[$inner:meta])* $var:ident => $val:expr, $text:expr),+ $(,)*) => (

        $(#[$outer])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
        pub enum $name {
            $(
                $(#[$inner])*
                $var,
            )*
        }

        impl $name {
            /// Every variant, in declaration order
            pub const ALL: &'static [$name] = &[$($name::$var,)*];

            /// Short name of the algorithm
            pub fn name(self) -> &'static str {
                match self {
                    $( $name::$var => $text, )*
                }
            }
        }

        impl TryFrom<$ty> for $name {
            type Error = $crate::error::Error;

            fn try_from(v: $ty) -> Result<Self, $crate::error::Error> {
                match v {
                    $( $val => Ok($name::$var),)*
                    _ => Err($crate::error::Error::UnsupportedAlgorithm),
                }
            }
        }

        impl From<$name> for $ty {
            fn from(v: $name) -> Self {
                match v {
                    $( $name::$var => $val, )*
                }
            }
        }

        impl core::str::FromStr for $name {
            type Err = $crate::error::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $( $text => Ok($name::$var),)*
                    _ => Err($crate::error::Error::UnsupportedAlgorithm),
                }
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.write_str(self.name())
            }
        }
    );
}
