/// Creates an identifier enum backed by a `u32` value.
/// Conversion from an unknown value fails with `Error::NotSupported`.
macro_rules! native_enum {
    ($(#[$outer:meta])* $name:ident, $($(#[$inner:meta])* $var:ident => $val:expr),+ $(,)*) => (

        $(#[$outer])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
        pub enum $name {
            $(
                $(#[$inner])*
                $var,
            )*
        }

        impl core::convert::TryFrom<u32> for $name {
            type Error = $crate::Error;

            fn try_from(v: u32) -> Result<Self, $crate::Error> {
                match v {
                    $( $val => Ok($name::$var),)*
                    _ => Err($crate::Error::NotSupported),
                }
            }
        }

        impl From<$name> for u32 {
            fn from(v: $name) -> Self {
                match v {
                    $( $name::$var => $val, )*
                }
            }
        }

        impl PartialEq<$name> for u32 {
            fn eq(&self, other: &$name) -> bool {
                match *other {
                    $( $name::$var => *self == $val, )*
                }
            }
        }
    );
}
