// src/fields/macros.rs
// Accessor generators for structs, enums and bit flags.

/// Implements [`Fields`](crate::fields::Fields) and
/// [`Field`](crate::fields::Field) for a struct.
///
/// Each listed member is addressable by its identifier, or by an alias
/// given with `as`:
///
/// ```
/// use paramstyle::impl_fields;
///
/// #[derive(Default)]
/// struct GiParams {
///     on: bool,
///     gi: f32,
/// }
/// impl_fields!(GiParams { on as "On", gi as "Gi" });
/// ```
///
/// Every member type must itself implement `Field`: a primitive, a struct
/// run through this macro, or a type from [`param_enum!`](crate::param_enum)
/// or [`param_flags!`](crate::param_flags).
#[macro_export]
macro_rules! impl_fields {
    ($ty:ty { $($field:ident $(as $alias:literal)?),* $(,)? }) => {
        impl $crate::fields::Fields for $ty {
            fn field_names(&self) -> &'static [&'static str] {
                &[$($crate::__field_name!($field $(, $alias)?)),*]
            }

            #[allow(unused_variables)]
            fn field(&self, name: &str) -> Option<$crate::fields::FieldRef<'_>> {
                $(
                    if name == $crate::__field_name!($field $(, $alias)?) {
                        return Some($crate::fields::Field::as_field(&self.$field));
                    }
                )*
                None
            }

            #[allow(unused_variables)]
            fn field_mut(&mut self, name: &str) -> Option<$crate::fields::FieldMut<'_>> {
                $(
                    if name == $crate::__field_name!($field $(, $alias)?) {
                        return Some($crate::fields::Field::as_field_mut(&mut self.$field));
                    }
                )*
                None
            }
        }

        impl $crate::fields::Field for $ty {
            fn as_field(&self) -> $crate::fields::FieldRef<'_> {
                $crate::fields::FieldRef::Struct(self)
            }

            fn as_field_mut(&mut self) -> $crate::fields::FieldMut<'_> {
                $crate::fields::FieldMut::Struct(self)
            }
        }
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __field_name {
    ($field:ident) => {
        stringify!($field)
    };
    ($field:ident, $alias:literal) => {
        $alias
    };
}

/// Makes a fieldless enum settable by variant name.
///
/// ```
/// use paramstyle::param_enum;
///
/// #[derive(Debug, Clone, Copy, PartialEq)]
/// enum ActFun {
///     Rate,
///     Spike,
/// }
/// param_enum!(ActFun { Rate, Spike });
/// ```
#[macro_export]
macro_rules! param_enum {
    ($ty:ident { $($variant:ident),+ $(,)? }) => {
        impl $crate::fields::Leaf for $ty {
            fn kind(&self) -> $crate::fields::LeafKind {
                $crate::fields::LeafKind::Enum
            }

            fn value(&self) -> $crate::params::ParamValue {
                let name = match self {
                    $(Self::$variant => stringify!($variant),)+
                };
                $crate::params::ParamValue::Text(name.to_string())
            }

            fn set_value(
                &mut self,
                value: &$crate::params::ParamValue,
            ) -> ::std::result::Result<(), String> {
                let text = value.to_string();
                let text = text.trim();
                $(
                    if text == stringify!($variant) {
                        *self = Self::$variant;
                        return Ok(());
                    }
                )+
                Err(format!("`{}` is not a variant of {}", text, stringify!($ty)))
            }
        }

        impl $crate::fields::Field for $ty {
            fn as_field(&self) -> $crate::fields::FieldRef<'_> {
                $crate::fields::FieldRef::Leaf(self)
            }

            fn as_field_mut(&mut self) -> $crate::fields::FieldMut<'_> {
                $crate::fields::FieldMut::Leaf(self)
            }
        }
    };
}

/// Makes a bit-flag newtype settable by `|`-joined flag names.
///
/// The type must be a tuple struct over an unsigned integer. The macro adds
/// one associated constant per flag.
///
/// ```
/// use paramstyle::param_flags;
///
/// #[derive(Debug, Clone, Copy, PartialEq, Default)]
/// struct LayerFlags(u32);
/// param_flags!(LayerFlags: u32 { ACTIVE = 1, CLAMPED = 2, TARGET = 4 });
///
/// assert!((LayerFlags::ACTIVE | LayerFlags::CLAMPED).contains(LayerFlags::CLAMPED));
/// ```
#[macro_export]
macro_rules! param_flags {
    ($ty:ident : $repr:ty { $($flag:ident = $bit:expr),+ $(,)? }) => {
        #[allow(non_upper_case_globals, dead_code)]
        impl $ty {
            $(
                #[doc = concat!("`", stringify!($flag), "` flag")]
                pub const $flag: $ty = $ty($bit);
            )+

            /// True if every bit of `other` is set
            pub fn contains(self, other: $ty) -> bool {
                self.0 & other.0 == other.0
            }
        }

        impl ::std::ops::BitOr for $ty {
            type Output = $ty;

            fn bitor(self, rhs: $ty) -> $ty {
                $ty(self.0 | rhs.0)
            }
        }

        impl $crate::fields::Leaf for $ty {
            fn kind(&self) -> $crate::fields::LeafKind {
                $crate::fields::LeafKind::Enum
            }

            fn value(&self) -> $crate::params::ParamValue {
                let mut names: Vec<&str> = Vec::new();
                $(
                    if $bit != 0 && self.0 & $bit == $bit {
                        names.push(stringify!($flag));
                    }
                )+
                $crate::params::ParamValue::Text(names.join("|"))
            }

            fn set_value(
                &mut self,
                value: &$crate::params::ParamValue,
            ) -> ::std::result::Result<(), String> {
                if let $crate::params::ParamValue::Int(bits, _) = value {
                    self.0 = <$repr>::try_from(*bits)
                        .map_err(|_| format!("{} out of range for {}", bits, stringify!($ty)))?;
                    return Ok(());
                }
                let text = value.to_string();
                let mut bits: $repr = 0;
                for name in text.split('|').map(str::trim).filter(|n| !n.is_empty()) {
                    let bit: Option<$repr> = None
                        $(.or(if name == stringify!($flag) { Some($bit) } else { None }))+;
                    match bit {
                        Some(b) => bits |= b,
                        None => {
                            return Err(format!("`{}` is not a flag of {}", name, stringify!($ty)))
                        }
                    }
                }
                self.0 = bits;
                Ok(())
            }
        }

        impl $crate::fields::Field for $ty {
            fn as_field(&self) -> $crate::fields::FieldRef<'_> {
                $crate::fields::FieldRef::Leaf(self)
            }

            fn as_field_mut(&mut self) -> $crate::fields::FieldMut<'_> {
                $crate::fields::FieldMut::Leaf(self)
            }
        }
    };
}
