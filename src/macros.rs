//! Registration macros
//!
//! `mappable!` implements [`Mappable`](crate::Mappable) for a struct by
//! listing the members that take part in mapping:
//!
//! ```ignore
//! #[derive(Default)]
//! struct UserDto {
//!     name: String,
//!     city: String,
//!     password_hash: String,
//! }
//!
//! mappable!(UserDto {
//!     name: String,
//!     #[from(town)] city: String,
//!     #[ignore] password_hash: String,
//! });
//! ```
//!
//! Types without `Default` name a constructor instead. Its parameters are
//! bound to source members by name, and the listed members become read-only:
//!
//! ```ignore
//! mappable!(Money via Money::new(amount: i64, currency: String) {
//!     amount: i64,
//!     currency: String,
//! });
//! ```
//!
//! `mappable_enum!` registers a C-like enum so it can appear as a member:
//!
//! ```ignore
//! mappable_enum!(Status { Inactive = 0, Active = 1 });
//! ```

/// Implement `Mappable` for a struct
#[macro_export]
macro_rules! mappable {
    ($ty:ident { $( $(#[$marker:ident $(($arg:ident))?])* $field:ident : $fty:ty ),* $(,)? }) => {
        impl $crate::Mappable for $ty {
            fn shape() -> $crate::TypeShape {
                $crate::TypeShape::new(stringify!($ty))
                    .initializer(|| -> ::std::boxed::Box<dyn ::std::any::Any + Send + Sync> {
                        ::std::boxed::Box::new(<$ty as ::core::default::Default>::default())
                    })
                    $(
                        .member(
                            $crate::MemberShape::new(
                                stringify!($field),
                                <$fty as $crate::Field>::type_ref(),
                            )
                            .getter($crate::__member_getter!($ty, $field))
                            .setter(|obj: &mut dyn ::std::any::Any, value: $crate::Value| {
                                if let Some(this) = obj.downcast_mut::<$ty>() {
                                    this.$field = $crate::field_or_zero::<$fty>(value);
                                }
                            })
                            $( .marker(stringify!($marker), $crate::__marker_arg!($($arg)?)) )*
                        )
                    )*
            }
        }
    };

    (
        $ty:ident via $owner:ident :: $ctor:ident ( $( $param:ident : $pty:ty ),* $(,)? )
        { $( $(#[$marker:ident $(($arg:ident))?])* $field:ident : $fty:ty ),* $(,)? }
    ) => {
        impl $crate::Mappable for $ty {
            fn shape() -> $crate::TypeShape {
                $crate::TypeShape::new(stringify!($ty))
                    .constructor(
                        $crate::ConstructorShape::new(
                            |args: ::std::vec::Vec<$crate::Value>| -> ::std::boxed::Box<dyn ::std::any::Any + Send + Sync> {
                                #[allow(unused_mut, unused_variables)]
                                let mut args = args.into_iter();
                                ::std::boxed::Box::new($owner::$ctor(
                                    $(
                                        $crate::field_or_zero::<$pty>(
                                            args.next().unwrap_or($crate::Value::Null),
                                        ),
                                    )*
                                ))
                            },
                        )
                        $( .param(stringify!($param), <$pty as $crate::Field>::type_ref()) )*
                    )
                    $(
                        .member(
                            $crate::MemberShape::new(
                                stringify!($field),
                                <$fty as $crate::Field>::type_ref(),
                            )
                            .getter($crate::__member_getter!($ty, $field))
                            $( .marker(stringify!($marker), $crate::__marker_arg!($($arg)?)) )*
                        )
                    )*
            }
        }
    };
}

/// Implement `Field` (and nullable `Option` support) for a C-like enum
///
/// The first variant is the zero value.
#[macro_export]
macro_rules! mappable_enum {
    ($ty:ident { $( $variant:ident = $disc:expr ),+ $(,)? }) => {
        impl $crate::Field for $ty {
            fn type_ref() -> $crate::TypeRef {
                $crate::TypeRef::Enum($crate::EnumKey::of::<$ty>())
            }

            fn to_value(&self) -> $crate::Value {
                let (variant, discriminant): (&'static str, i64) = match self {
                    $( $ty::$variant => (stringify!($variant), $disc), )+
                };
                $crate::Value::Enum($crate::EnumValue {
                    key: $crate::EnumKey::of::<$ty>(),
                    variant,
                    discriminant,
                })
            }

            fn from_value(value: $crate::Value) -> ::core::option::Option<Self> {
                match value {
                    $crate::Value::Enum(e) if e.key == $crate::EnumKey::of::<$ty>() => {
                        match e.variant {
                            $( stringify!($variant) => ::core::option::Option::Some($ty::$variant), )+
                            _ => ::core::option::Option::None,
                        }
                    }
                    _ => ::core::option::Option::None,
                }
            }

            fn zero() -> Self {
                $crate::__first_variant!($ty; $($variant),+)
            }
        }

        impl $crate::Nullable for $ty {
            fn optional_type_ref() -> $crate::TypeRef {
                $crate::types::field::optional_type_ref::<$ty>()
            }

            fn optional_to_value(this: &::core::option::Option<Self>) -> $crate::Value {
                $crate::types::field::optional_to_value(this)
            }

            fn optional_from_value(
                value: $crate::Value,
            ) -> ::core::option::Option<::core::option::Option<Self>> {
                $crate::types::field::optional_from_value(value)
            }
        }
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __member_getter {
    ($ty:ident, $field:ident) => {
        |obj: &dyn ::std::any::Any| match obj.downcast_ref::<$ty>() {
            ::core::option::Option::Some(this) => $crate::Field::to_value(&this.$field),
            ::core::option::Option::None => $crate::Value::Null,
        }
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __marker_arg {
    () => {
        ::core::option::Option::None
    };
    ($arg:ident) => {
        ::core::option::Option::Some(stringify!($arg))
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __first_variant {
    ($ty:ident; $first:ident $(, $rest:ident)*) => {
        $ty::$first
    };
}
