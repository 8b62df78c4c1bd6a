use std::fmt;

use bytes::Bytes;

use crate::types::HamiltonDataType;

/// A decoded DataFragment value.
#[derive(Debug, Clone, PartialEq)]
pub enum HoiValue {
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    F32(f32),
    F64(f64),
    String(String),
    Bool(bool),
    I8Array(Vec<i8>),
    I16Array(Vec<i16>),
    I32Array(Vec<i32>),
    I64Array(Vec<i64>),
    U8Array(Vec<u8>),
    U16Array(Vec<u16>),
    U32Array(Vec<u32>),
    U64Array(Vec<u64>),
    F32Array(Vec<f32>),
    F64Array(Vec<f64>),
    BoolArray(Vec<bool>),
    StringArray(Vec<String>),
    /// A fragment whose type id this codec does not know, kept verbatim.
    Raw { type_id: u8, flags: u8, data: Bytes },
}

impl HoiValue {
    /// Wire type id of this value.
    pub fn type_id(&self) -> u8 {
        match self.data_type() {
            Some(ty) => ty.id(),
            None => match self {
                HoiValue::Raw { type_id, .. } => *type_id,
                _ => 0,
            },
        }
    }

    /// Known data type, or `None` for [`HoiValue::Raw`].
    pub fn data_type(&self) -> Option<HamiltonDataType> {
        use HamiltonDataType as T;
        Some(match self {
            HoiValue::I8(_) => T::I8,
            HoiValue::I16(_) => T::I16,
            HoiValue::I32(_) => T::I32,
            HoiValue::I64(_) => T::I64,
            HoiValue::U8(_) => T::U8,
            HoiValue::U16(_) => T::U16,
            HoiValue::U32(_) => T::U32,
            HoiValue::U64(_) => T::U64,
            HoiValue::F32(_) => T::F32,
            HoiValue::F64(_) => T::F64,
            HoiValue::String(_) => T::String,
            HoiValue::Bool(_) => T::Bool,
            HoiValue::I8Array(_) => T::I8Array,
            HoiValue::I16Array(_) => T::I16Array,
            HoiValue::I32Array(_) => T::I32Array,
            HoiValue::I64Array(_) => T::I64Array,
            HoiValue::U8Array(_) => T::U8Array,
            HoiValue::U16Array(_) => T::U16Array,
            HoiValue::U32Array(_) => T::U32Array,
            HoiValue::U64Array(_) => T::U64Array,
            HoiValue::F32Array(_) => T::F32Array,
            HoiValue::F64Array(_) => T::F64Array,
            HoiValue::BoolArray(_) => T::BoolArray,
            HoiValue::StringArray(_) => T::StringArray,
            HoiValue::Raw { .. } => return None,
        })
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            HoiValue::Bool(v) => Some(*v),
            _ => None,
        }
    }

    /// Any integer scalar, widened to `i64`. `u64` values above `i64::MAX`
    /// return `None`.
    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            HoiValue::I8(v) => Some(v.into()),
            HoiValue::I16(v) => Some(v.into()),
            HoiValue::I32(v) => Some(v.into()),
            HoiValue::I64(v) => Some(v),
            HoiValue::U8(v) => Some(v.into()),
            HoiValue::U16(v) => Some(v.into()),
            HoiValue::U32(v) => Some(v.into()),
            HoiValue::U64(v) => i64::try_from(v).ok(),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            HoiValue::F32(v) => Some(v.into()),
            HoiValue::F64(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            HoiValue::String(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_bool_array(&self) -> Option<&[bool]> {
        match self {
            HoiValue::BoolArray(v) => Some(v),
            _ => None,
        }
    }

    /// Any integer array, widened to `i64`.
    pub fn as_i64_array(&self) -> Option<Vec<i64>> {
        fn widen<T: Copy + Into<i64>>(values: &[T]) -> Vec<i64> {
            values.iter().map(|&v| v.into()).collect()
        }
        match self {
            HoiValue::I8Array(v) => Some(widen(v)),
            HoiValue::I16Array(v) => Some(widen(v)),
            HoiValue::I32Array(v) => Some(widen(v)),
            HoiValue::I64Array(v) => Some(v.clone()),
            HoiValue::U8Array(v) => Some(widen(v)),
            HoiValue::U16Array(v) => Some(widen(v)),
            HoiValue::U32Array(v) => Some(widen(v)),
            HoiValue::U64Array(v) => v.iter().map(|&x| i64::try_from(x).ok()).collect(),
            _ => None,
        }
    }
}

impl fmt::Display for HoiValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HoiValue::I8(v) => write!(f, "{v}"),
            HoiValue::I16(v) => write!(f, "{v}"),
            HoiValue::I32(v) => write!(f, "{v}"),
            HoiValue::I64(v) => write!(f, "{v}"),
            HoiValue::U8(v) => write!(f, "{v}"),
            HoiValue::U16(v) => write!(f, "{v}"),
            HoiValue::U32(v) => write!(f, "{v}"),
            HoiValue::U64(v) => write!(f, "{v}"),
            HoiValue::F32(v) => write!(f, "{v}"),
            HoiValue::F64(v) => write!(f, "{v}"),
            HoiValue::String(v) => write!(f, "{v:?}"),
            HoiValue::Bool(v) => write!(f, "{v}"),
            HoiValue::I8Array(v) => write!(f, "{v:?}"),
            HoiValue::I16Array(v) => write!(f, "{v:?}"),
            HoiValue::I32Array(v) => write!(f, "{v:?}"),
            HoiValue::I64Array(v) => write!(f, "{v:?}"),
            HoiValue::U8Array(v) => write!(f, "{v:?}"),
            HoiValue::U16Array(v) => write!(f, "{v:?}"),
            HoiValue::U32Array(v) => write!(f, "{v:?}"),
            HoiValue::U64Array(v) => write!(f, "{v:?}"),
            HoiValue::F32Array(v) => write!(f, "{v:?}"),
            HoiValue::F64Array(v) => write!(f, "{v:?}"),
            HoiValue::BoolArray(v) => write!(f, "{v:?}"),
            HoiValue::StringArray(v) => write!(f, "{v:?}"),
            HoiValue::Raw { data, .. } => write!(f, "<{} raw bytes>", data.len()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_ids_follow_variants() {
        assert_eq!(HoiValue::I32(1).type_id(), 3);
        assert_eq!(HoiValue::BoolArray(vec![]).type_id(), 29);
        let raw = HoiValue::Raw {
            type_id: 99,
            flags: 0,
            data: Bytes::new(),
        };
        assert_eq!(raw.type_id(), 99);
        assert_eq!(raw.data_type(), None);
    }

    #[test]
    fn integer_accessors_widen() {
        assert_eq!(HoiValue::U16(65535).as_i64(), Some(65535));
        assert_eq!(HoiValue::I8(-1).as_i64(), Some(-1));
        assert_eq!(HoiValue::U64(u64::MAX).as_i64(), None);
        assert_eq!(HoiValue::String("x".into()).as_i64(), None);
        assert_eq!(
            HoiValue::U16Array(vec![1, 2]).as_i64_array(),
            Some(vec![1, 2])
        );
    }

    #[test]
    fn display_is_compact() {
        assert_eq!(HoiValue::I32(-5).to_string(), "-5");
        assert_eq!(HoiValue::String("tip".into()).to_string(), "\"tip\"");
        assert_eq!(HoiValue::BoolArray(vec![true, false]).to_string(), "[true, false]");
    }
}
