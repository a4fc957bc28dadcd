// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Column value type system.
//!
//! Decoded ensembles are stored column-wise: one typed `Vec` per named
//! field. [`ColumnRef`] is a borrowed, type-tagged view of one such column
//! and is what lookups by name, JSON export and CSV export operate on.
//!
//! Section records and their column groups are generated together by
//! [`columnar_record!`] so a record field and its column can never drift
//! apart.

use serde::Serialize;

/// Borrowed view of one output column.
///
/// Scalar columns hold one value per accepted ensemble; cell columns hold
/// one sequence per accepted ensemble.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ColumnRef<'a> {
    // Scalars
    U8(&'a [u8]),
    U16(&'a [u16]),
    U32(&'a [u32]),
    I16(&'a [i16]),
    F64(&'a [f64]),
    Bool(&'a [bool]),

    // Real-time clock tuples (year, month, day, hour, minute, second, hundredths)
    Clock(&'a [[u8; 7]]),

    // Per-ensemble sequences
    U8Cells(&'a [Vec<u8>]),
    I16Cells(&'a [Vec<i16>]),
    U16Lists(&'a [Vec<u16>]),
}

impl<'a> ColumnRef<'a> {
    /// Number of rows in the column.
    pub fn len(&self) -> usize {
        match self {
            ColumnRef::U8(v) => v.len(),
            ColumnRef::U16(v) => v.len(),
            ColumnRef::U32(v) => v.len(),
            ColumnRef::I16(v) => v.len(),
            ColumnRef::F64(v) => v.len(),
            ColumnRef::Bool(v) => v.len(),
            ColumnRef::Clock(v) => v.len(),
            ColumnRef::U8Cells(v) => v.len(),
            ColumnRef::I16Cells(v) => v.len(),
            ColumnRef::U16Lists(v) => v.len(),
        }
    }

    /// Check if the column has no rows.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Check if the column holds one plain number per row.
    pub fn is_scalar(&self) -> bool {
        matches!(
            self,
            ColumnRef::U8(_)
                | ColumnRef::U16(_)
                | ColumnRef::U32(_)
                | ColumnRef::I16(_)
                | ColumnRef::F64(_)
                | ColumnRef::Bool(_)
        )
    }

    /// Element type name, for listings.
    pub fn type_name(&self) -> &'static str {
        match self {
            ColumnRef::U8(_) => "u8",
            ColumnRef::U16(_) => "u16",
            ColumnRef::U32(_) => "u32",
            ColumnRef::I16(_) => "i16",
            ColumnRef::F64(_) => "f64",
            ColumnRef::Bool(_) => "bool",
            ColumnRef::Clock(_) => "clock",
            ColumnRef::U8Cells(_) => "[u8]",
            ColumnRef::I16Cells(_) => "[i16]",
            ColumnRef::U16Lists(_) => "[u16]",
        }
    }

    /// Scalar value at `row` widened to `f64`.
    ///
    /// Returns `None` for sequence columns or an out-of-range row.
    pub fn get_f64(&self, row: usize) -> Option<f64> {
        match self {
            ColumnRef::U8(v) => v.get(row).map(|&x| f64::from(x)),
            ColumnRef::U16(v) => v.get(row).map(|&x| f64::from(x)),
            ColumnRef::U32(v) => v.get(row).map(|&x| f64::from(x)),
            ColumnRef::I16(v) => v.get(row).map(|&x| f64::from(x)),
            ColumnRef::F64(v) => v.get(row).copied(),
            ColumnRef::Bool(v) => v.get(row).map(|&x| if x { 1.0 } else { 0.0 }),
            _ => None,
        }
    }

    /// Text rendering of the value at `row`.
    ///
    /// NaN renders as an empty string; sequences are joined with `;`.
    pub fn format_cell(&self, row: usize) -> String {
        fn join<T: ToString>(values: &[T]) -> String {
            values
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(";")
        }

        match self {
            ColumnRef::F64(v) => match v.get(row) {
                Some(x) if x.is_nan() => String::new(),
                Some(x) => x.to_string(),
                None => String::new(),
            },
            ColumnRef::Bool(v) => v
                .get(row)
                .map(|&x| if x { "1" } else { "0" }.to_string())
                .unwrap_or_default(),
            ColumnRef::Clock(v) => v.get(row).map(|c| join(&c[..])).unwrap_or_default(),
            ColumnRef::U8Cells(v) => v.get(row).map(|c| join(c.as_slice())).unwrap_or_default(),
            ColumnRef::I16Cells(v) => v.get(row).map(|c| join(c.as_slice())).unwrap_or_default(),
            ColumnRef::U16Lists(v) => v.get(row).map(|c| join(c.as_slice())).unwrap_or_default(),
            scalar => scalar
                .get_f64(row)
                .map(|x| x.to_string())
                .unwrap_or_default(),
        }
    }
}

/// Conversion from owned column storage to a [`ColumnRef`].
pub trait ColumnData {
    /// Borrow the storage as a type-tagged column view.
    fn column_ref(&self) -> ColumnRef<'_>;
}

macro_rules! impl_column_data {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl ColumnData for Vec<$ty> {
                fn column_ref(&self) -> ColumnRef<'_> {
                    ColumnRef::$variant(self)
                }
            }
        )*
    };
}

impl_column_data! {
    u8 => U8,
    u16 => U16,
    u32 => U32,
    i16 => I16,
    f64 => F64,
    bool => Bool,
    [u8; 7] => Clock,
    Vec<u8> => U8Cells,
    Vec<i16> => I16Cells,
    Vec<u16> => U16Lists,
}

/// Declare a decoded section record together with its column group.
///
/// `pub struct Record => Columns { .. }` generates the record, a column
/// group holding one `Vec<T>` per field, and `push`/`reserve`/`columns`.
///
/// `pub struct Record => nan_filled Columns { .. }` stores every field as
/// `f64` and adds `push_missing`, which appends NaN to every column so the
/// group stays row-aligned when the section is absent from an ensemble.
macro_rules! columnar_record {
    (@record
        $(#[$meta:meta])*
        $record:ident { $( $(#[$fmeta:meta])* $field:ident : $ty:ty ),* }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq)]
        pub struct $record {
            $( $(#[$fmeta])* pub $field: $ty, )*
        }

        impl $record {
            /// Output column names, in declaration order.
            pub const FIELD_NAMES: &'static [&'static str] = &[$(stringify!($field)),*];
        }
    };

    (
        $(#[$meta:meta])*
        pub struct $record:ident => nan_filled $columns:ident {
            $( $(#[$fmeta:meta])* $field:ident : $ty:ty ),* $(,)?
        }
    ) => {
        $crate::core::column::columnar_record!(@record
            $(#[$meta])*
            $record { $( $(#[$fmeta])* $field : $ty ),* }
        );

        #[doc = concat!("NaN-filled column group for [`", stringify!($record), "`].")]
        #[derive(Debug, Clone, Default, PartialEq)]
        pub struct $columns {
            $( pub $field: Vec<f64>, )*
        }

        impl $columns {
            /// Append one decoded record.
            pub fn push(&mut self, record: &$record) {
                $( self.$field.push(f64::from(record.$field)); )*
            }

            /// Append a NaN row for an ensemble without this section.
            pub fn push_missing(&mut self) {
                $( self.$field.push(f64::NAN); )*
            }

            /// Reserve room for `additional` rows in every column.
            pub fn reserve(&mut self, additional: usize) {
                $( self.$field.reserve(additional); )*
            }

            /// Named views of every column, in declaration order.
            pub fn columns(&self) -> Vec<(&'static str, $crate::core::ColumnRef<'_>)> {
                vec![$( (stringify!($field), $crate::core::ColumnRef::F64(&self.$field)) ),*]
            }
        }
    };

    (
        $(#[$meta:meta])*
        pub struct $record:ident => $columns:ident {
            $( $(#[$fmeta:meta])* $field:ident : $ty:ty ),* $(,)?
        }
    ) => {
        $crate::core::column::columnar_record!(@record
            $(#[$meta])*
            $record { $( $(#[$fmeta])* $field : $ty ),* }
        );

        #[doc = concat!("Column group for [`", stringify!($record), "`].")]
        #[derive(Debug, Clone, Default, PartialEq)]
        pub struct $columns {
            $( pub $field: Vec<$ty>, )*
        }

        impl $columns {
            /// Append one decoded record.
            pub fn push(&mut self, record: $record) {
                $( self.$field.push(record.$field); )*
            }

            /// Reserve room for `additional` rows in every column.
            pub fn reserve(&mut self, additional: usize) {
                $( self.$field.reserve(additional); )*
            }

            /// Named views of every column, in declaration order.
            pub fn columns(&self) -> Vec<(&'static str, $crate::core::ColumnRef<'_>)> {
                vec![$( (stringify!($field), $crate::core::ColumnData::column_ref(&self.$field)) ),*]
            }
        }
    };
}

pub(crate) use columnar_record;
