//! DataFragment type ids.

/// Flag set on bool-array fragments.
pub const FLAG_BOOL_ARRAY: u8 = 0x01;

/// Size of a fragment header: type id, flags, u16 length.
pub const FRAGMENT_HEADER_SIZE: usize = 4;

/// Type tag carried in the first byte of every DataFragment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum HamiltonDataType {
    I8 = 1,
    I16 = 2,
    I32 = 3,
    U8 = 4,
    U16 = 5,
    U32 = 6,
    String = 15,
    U8Array = 22,
    Bool = 23,
    I8Array = 24,
    I16Array = 25,
    U16Array = 26,
    I32Array = 27,
    U32Array = 28,
    BoolArray = 29,
    StringArray = 34,
    I64 = 36,
    U64 = 37,
    I64Array = 38,
    U64Array = 39,
    F32 = 40,
    F64 = 41,
    F32Array = 42,
    F64Array = 43,
}

impl HamiltonDataType {
    /// Look up a type by its wire id.
    pub fn from_id(id: u8) -> Option<Self> {
        use HamiltonDataType::*;
        Some(match id {
            1 => I8,
            2 => I16,
            3 => I32,
            4 => U8,
            5 => U16,
            6 => U32,
            15 => String,
            22 => U8Array,
            23 => Bool,
            24 => I8Array,
            25 => I16Array,
            26 => U16Array,
            27 => I32Array,
            28 => U32Array,
            29 => BoolArray,
            34 => StringArray,
            36 => I64,
            37 => U64,
            38 => I64Array,
            39 => U64Array,
            40 => F32,
            41 => F64,
            42 => F32Array,
            43 => F64Array,
            _ => return None,
        })
    }

    pub fn id(self) -> u8 {
        self as u8
    }

    /// Per-element width for fixed-width scalars and arrays. `None` for
    /// strings and string arrays.
    pub fn element_width(self) -> Option<usize> {
        use HamiltonDataType::*;
        match self {
            I8 | U8 | Bool | I8Array | U8Array | BoolArray => Some(1),
            I16 | U16 | I16Array | U16Array => Some(2),
            I32 | U32 | F32 | I32Array | U32Array | F32Array => Some(4),
            I64 | U64 | F64 | I64Array | U64Array | F64Array => Some(8),
            String | StringArray => None,
        }
    }

    pub fn is_array(self) -> bool {
        use HamiltonDataType::*;
        matches!(
            self,
            U8Array
                | I8Array
                | I16Array
                | U16Array
                | I32Array
                | U32Array
                | BoolArray
                | StringArray
                | I64Array
                | U64Array
                | F32Array
                | F64Array
        )
    }

    /// Flags byte emitted for this type.
    pub fn flags(self) -> u8 {
        if self == HamiltonDataType::BoolArray {
            FLAG_BOOL_ARRAY
        } else {
            0
        }
    }

    pub fn name(self) -> &'static str {
        use HamiltonDataType::*;
        match self {
            I8 => "i8",
            I16 => "i16",
            I32 => "i32",
            U8 => "u8",
            U16 => "u16",
            U32 => "u32",
            String => "string",
            U8Array => "u8[]",
            Bool => "bool",
            I8Array => "i8[]",
            I16Array => "i16[]",
            U16Array => "u16[]",
            I32Array => "i32[]",
            U32Array => "u32[]",
            BoolArray => "bool[]",
            StringArray => "string[]",
            I64 => "i64",
            U64 => "u64",
            I64Array => "i64[]",
            U64Array => "u64[]",
            F32 => "f32",
            F64 => "f64",
            F32Array => "f32[]",
            F64Array => "f64[]",
        }
    }
}

impl TryFrom<u8> for HamiltonDataType {
    type Error = u8;

    fn try_from(id: u8) -> std::result::Result<Self, u8> {
        Self::from_id(id).ok_or(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_id_round_trips() {
        for id in 0..=u8::MAX {
            if let Some(ty) = HamiltonDataType::from_id(id) {
                assert_eq!(ty.id(), id);
            }
        }
    }

    #[test]
    fn table_matches_wire_ids() {
        assert_eq!(HamiltonDataType::I32.id(), 3);
        assert_eq!(HamiltonDataType::String.id(), 15);
        assert_eq!(HamiltonDataType::Bool.id(), 23);
        assert_eq!(HamiltonDataType::BoolArray.id(), 29);
        assert_eq!(HamiltonDataType::StringArray.id(), 34);
        assert_eq!(HamiltonDataType::F64Array.id(), 43);
    }

    #[test]
    fn only_bool_arrays_carry_flags() {
        assert_eq!(HamiltonDataType::BoolArray.flags(), FLAG_BOOL_ARRAY);
        assert_eq!(HamiltonDataType::Bool.flags(), 0);
        assert_eq!(HamiltonDataType::U8Array.flags(), 0);
    }

    #[test]
    fn unknown_id_rejected() {
        assert_eq!(HamiltonDataType::try_from(0), Err(0));
        assert_eq!(HamiltonDataType::try_from(200), Err(200));
    }
}
