//! Macro for declaring outbound port error enums.
//!
//! Each variant gets a snake-case constructor taking `impl Into<_>` for its
//! fields, and the enum gets a `kind()` label used as a structured log field
//! when a service maps the error onto the domain [`Error`](crate::domain::Error).

macro_rules! define_port_error {
    (@ctor $variant:ident) => {
        ::paste::paste! {
            #[doc = "Build the `" $variant "` variant."]
            pub const fn [<$variant:snake>]() -> Self {
                Self::$variant
            }
        }
    };

    (@ctor $variant:ident { $($field:ident : $ty:ty),* $(,)? }) => {
        define_port_error!(@ctor_fields $variant () () $( $field : $ty, )*);
    };

    (@ctor_fields $variant:ident ($($params:tt)*) ($($inits:tt)*) ) => {
        ::paste::paste! {
            #[doc = "Build the `" $variant "` variant."]
            pub fn [<$variant:snake>]($($params)*) -> Self {
                Self::$variant { $($inits)* }
            }
        }
    };

    (@ctor_fields $variant:ident ($($params:tt)*) ($($inits:tt)*) $field:ident : $ty:ty, $($rest:tt)*) => {
        define_port_error!(
            @ctor_fields
            $variant
            ($($params)* $field: impl Into<$ty>,)
            ($($inits)* $field: $field.into(),)
            $($rest)*
        );
    };

    (
        $(#[$outer:meta])*
        pub enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident $( { $($field:ident : $ty:ty),* $(,)? } )? => $message:expr
            ),* $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                #[error($message)]
                $variant $( { $($field : $ty),* } )?,
            )*
        }

        impl $name {
            $(
                define_port_error!(@ctor $variant $( { $($field : $ty),* } )?);
            )*

            /// Snake-case variant label for log fields.
            pub const fn kind(&self) -> &'static str {
                ::paste::paste! {
                    match self {
                        $( Self::$variant { .. } => stringify!([<$variant:snake>]), )*
                    }
                }
            }
        }
    };
}

pub(crate) use define_port_error;
