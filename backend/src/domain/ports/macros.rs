//! Defines helper macros for generating domain port error enums.

macro_rules! define_port_error {
    (@ctor $variant:ident) => {
        ::paste::paste! {
            pub fn [<$variant:snake>]() -> Self {
                Self::$variant
            }
        }
    };

    (@ctor $variant:ident { $($field:ident : $ty:ty),* $(,)? }) => {
        define_port_error!(@ctor_impl $variant () () $( $field : $ty, )*);
    };

    (@ctor_impl $variant:ident ($($params:tt)*) ($($inits:tt)*) ) => {
        ::paste::paste! {
            pub fn [<$variant:snake>]($($params)*) -> Self {
                Self::$variant { $($inits)* }
            }
        }
    };

    (@ctor_impl $variant:ident ($($params:tt)*) ($($inits:tt)*) $field:ident : $ty:ty, $($rest:tt)*) => {
        define_port_error!(
            @ctor_impl
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
        }
    };
}

/// Repository errors share one shape: connectivity, query failure, and a
/// unique-key race. The generated `From` impl maps them onto the domain
/// taxonomy so services can use `?` directly.
macro_rules! define_repository_error {
    (
        $(#[$outer:meta])*
        pub enum $name:ident => $label:literal
    ) => {
        define_port_error! {
            $(#[$outer])*
            pub enum $name {
                /// Repository connection could not be established.
                Connection { message: String } =>
                    "repository connection failed: {message}",
                /// Query or mutation failed during execution.
                Query { message: String } =>
                    "repository query failed: {message}",
                /// A concurrent write raced on a unique key.
                Conflict { message: String } =>
                    "repository write conflicted: {message}",
            }
        }

        impl From<$name> for $crate::domain::Error {
            fn from(error: $name) -> Self {
                match error {
                    $name::Connection { message } => $crate::domain::Error::service_unavailable(
                        format!(concat!($label, " unavailable: {}"), message),
                    ),
                    $name::Query { message } => $crate::domain::Error::internal(format!(
                        concat!($label, " error: {}"),
                        message
                    )),
                    $name::Conflict { message } => $crate::domain::Error::conflict(format!(
                        concat!($label, " conflict: {}"),
                        message
                    )),
                }
            }
        }
    };
}

pub(crate) use define_port_error;
pub(crate) use define_repository_error;
