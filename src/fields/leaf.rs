// src/fields/leaf.rs
// Leaf implementations for the primitive field kinds.

use super::{Field, FieldMut, FieldRef, Leaf, LeafKind};
use crate::params::ParamValue;

macro_rules! leaf_field {
    ($($ty:ty),+) => {
        $(
            impl Field for $ty {
                fn as_field(&self) -> FieldRef<'_> {
                    FieldRef::Leaf(self)
                }

                fn as_field_mut(&mut self) -> FieldMut<'_> {
                    FieldMut::Leaf(self)
                }
            }
        )+
    };
}

macro_rules! float_leaf {
    ($($ty:ty),+) => {
        $(
            impl Leaf for $ty {
                fn kind(&self) -> LeafKind {
                    LeafKind::Float
                }

                fn value(&self) -> ParamValue {
                    ParamValue::from(*self)
                }

                fn set_value(&mut self, value: &ParamValue) -> Result<(), String> {
                    match value.as_f64() {
                        Some(v) => {
                            *self = v as $ty;
                            Ok(())
                        }
                        None => Err(format!("expected a number, got {}", value.kind_name())),
                    }
                }
            }
        )+
        leaf_field!($($ty),+);
    };
}

macro_rules! int_leaf {
    ($($ty:ty),+) => {
        $(
            impl Leaf for $ty {
                fn kind(&self) -> LeafKind {
                    LeafKind::Int
                }

                fn value(&self) -> ParamValue {
                    match i64::try_from(*self) {
                        Ok(i) => ParamValue::from(i),
                        Err(_) => ParamValue::Float(*self as f64, self.to_string()),
                    }
                }

                fn set_value(&mut self, value: &ParamValue) -> Result<(), String> {
                    if let ParamValue::Float(_, text) = value {
                        // digits past i64 only reach unsigned fields through the text
                        if let Ok(v) = text.parse::<$ty>() {
                            *self = v;
                            return Ok(());
                        }
                    }
                    let int = match value {
                        ParamValue::Int(i, _) => i128::from(*i),
                        // i128 holds every integral f64 a 64-bit field can take
                        ParamValue::Float(f, _) if f.fract() == 0.0 => *f as i128,
                        ParamValue::Float(_, text) => return Err(format!("{} is not an integer", text)),
                        other => return Err(format!("expected an integer, got {}", other.kind_name())),
                    };
                    *self = <$ty>::try_from(int)
                        .map_err(|_| format!("{} out of range for {}", value, stringify!($ty)))?;
                    Ok(())
                }
            }
        )+
        leaf_field!($($ty),+);
    };
}

float_leaf!(f32, f64);
int_leaf!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

impl Leaf for bool {
    fn kind(&self) -> LeafKind {
        LeafKind::Bool
    }

    fn value(&self) -> ParamValue {
        ParamValue::Bool(*self)
    }

    fn set_value(&mut self, value: &ParamValue) -> Result<(), String> {
        match value {
            ParamValue::Bool(b) => {
                *self = *b;
                Ok(())
            }
            other => Err(format!("expected true or false, got `{}`", other)),
        }
    }
}

impl Leaf for String {
    fn kind(&self) -> LeafKind {
        LeafKind::Text
    }

    fn value(&self) -> ParamValue {
        ParamValue::Text(self.clone())
    }

    /// Numbers are stored with the text they were written with.
    fn set_value(&mut self, value: &ParamValue) -> Result<(), String> {
        *self = value.to_string();
        Ok(())
    }
}

leaf_field!(bool, String);
