// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Columnar aggregate of every accepted ensemble.
//!
//! The store owns one column per named field. Each appended [`Ensemble`]
//! adds exactly one row to every column; bottom track columns get a NaN row
//! when the ensemble has no bottom track section, so all columns always
//! have the same length.

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::core::{ColumnData, ColumnRef};
use crate::pd0::constants::NTP_EPOCH_OFFSET;
use crate::pd0::header::{EnsembleHeader, HeaderColumns};
use crate::pd0::sections::{
    BottomTrack, BottomTrackColumns, CorrelationMagnitude, CorrelationMagnitudeColumns,
    EchoIntensity, EchoIntensityColumns, FixedLeader, FixedLeaderColumns, PercentGood,
    PercentGoodColumns, VariableLeader, VariableLeaderColumns, Velocity, VelocityColumns,
};
use crate::pd0::Ensemble;
use crate::Result;

pub use crate::pd0::sections::bottom_track::BOTTOM_TRACK_FIELDS;

/// Convert Unix epoch seconds to NTP seconds (since 1900-01-01).
pub fn ntp_timestamp(epoch: f64) -> f64 {
    epoch + NTP_EPOCH_OFFSET
}

/// Column store for a decode run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AggregateStore {
    len: usize,
    checksum: Vec<u16>,
    header: HeaderColumns,
    fixed_leader: FixedLeaderColumns,
    variable_leader: VariableLeaderColumns,
    velocity: VelocityColumns,
    correlation_magnitude: CorrelationMagnitudeColumns,
    echo_intensity: EchoIntensityColumns,
    percent_good: PercentGoodColumns,
    bottom_track: BottomTrackColumns,
}

impl AggregateStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty store with room for `rows` ensembles.
    pub fn with_capacity(rows: usize) -> Self {
        let mut store = Self::default();
        store.reserve(rows);
        store
    }

    /// Reserve room for `additional` rows in every column.
    pub fn reserve(&mut self, additional: usize) {
        self.checksum.reserve(additional);
        self.header.reserve(additional);
        self.fixed_leader.reserve(additional);
        self.variable_leader.reserve(additional);
        self.velocity.reserve(additional);
        self.correlation_magnitude.reserve(additional);
        self.echo_intensity.reserve(additional);
        self.percent_good.reserve(additional);
        self.bottom_track.reserve(additional);
    }

    /// Append one fully decoded ensemble as a new row.
    pub fn append(&mut self, ensemble: Ensemble) {
        self.checksum.push(ensemble.checksum);
        self.header.push(ensemble.header);
        self.fixed_leader.push(ensemble.fixed_leader);
        self.variable_leader.push(ensemble.variable_leader);
        self.velocity.push(ensemble.velocity);
        self.correlation_magnitude.push(ensemble.correlation_magnitude);
        self.echo_intensity.push(ensemble.echo_intensity);
        self.percent_good.push(ensemble.percent_good);
        match &ensemble.bottom_track {
            Some(track) => self.bottom_track.push(track),
            None => self.bottom_track.push_missing(),
        }
        self.len += 1;
    }

    /// Number of accepted ensembles (rows).
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check if no ensemble has been appended.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Per-ensemble stored checksums.
    pub fn checksums(&self) -> &[u16] {
        &self.checksum
    }

    pub fn header(&self) -> &HeaderColumns {
        &self.header
    }

    pub fn fixed_leader(&self) -> &FixedLeaderColumns {
        &self.fixed_leader
    }

    pub fn variable_leader(&self) -> &VariableLeaderColumns {
        &self.variable_leader
    }

    pub fn velocity(&self) -> &VelocityColumns {
        &self.velocity
    }

    pub fn correlation_magnitude(&self) -> &CorrelationMagnitudeColumns {
        &self.correlation_magnitude
    }

    pub fn echo_intensity(&self) -> &EchoIntensityColumns {
        &self.echo_intensity
    }

    pub fn percent_good(&self) -> &PercentGoodColumns {
        &self.percent_good
    }

    /// Bottom track columns, NaN where the section was absent.
    pub fn bottom_track(&self) -> &BottomTrackColumns {
        &self.bottom_track
    }

    /// Every column, in [`field_names`](Self::field_names) order.
    pub fn columns(&self) -> Vec<(&'static str, ColumnRef<'_>)> {
        let mut columns = vec![("checksum", self.checksum.column_ref())];
        columns.extend(self.header.columns());
        columns.extend(self.fixed_leader.columns());
        columns.extend(self.variable_leader.columns());
        columns.extend(self.velocity.columns());
        columns.extend(self.correlation_magnitude.columns());
        columns.extend(self.echo_intensity.columns());
        columns.extend(self.percent_good.columns());
        columns.extend(self.bottom_track.columns());
        columns
    }

    /// Look up a column by its field name.
    pub fn column(&self, name: &str) -> Option<ColumnRef<'_>> {
        self.columns()
            .into_iter()
            .find(|(field, _)| *field == name)
            .map(|(_, column)| column)
    }

    /// All column names in a stable order.
    pub fn field_names() -> Vec<&'static str> {
        let groups: [&[&'static str]; 9] = [
            &["checksum"],
            EnsembleHeader::FIELD_NAMES,
            FixedLeader::FIELD_NAMES,
            VariableLeader::FIELD_NAMES,
            Velocity::FIELD_NAMES,
            CorrelationMagnitude::FIELD_NAMES,
            EchoIntensity::FIELD_NAMES,
            PercentGood::FIELD_NAMES,
            BottomTrack::FIELD_NAMES,
        ];
        groups.into_iter().flatten().copied().collect()
    }

    /// Check that every column holds exactly [`len`](Self::len) rows.
    pub fn is_aligned(&self) -> bool {
        self.columns().iter().all(|(_, column)| column.len() == self.len)
    }

    /// Bottom range of `beam` (1-4) per row, `lsb + msb * 65536`.
    pub fn bottom_range(&self, beam: usize) -> Result<Vec<f64>> {
        self.bottom_track.range(beam)
    }

    /// Ensemble start times as NTP seconds.
    pub fn ntp_start_times(&self) -> Vec<f64> {
        self.variable_leader
            .ensemble_start_time
            .iter()
            .map(|&epoch| ntp_timestamp(epoch))
            .collect()
    }
}

impl Serialize for AggregateStore {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let columns = self.columns();
        let mut map = serializer.serialize_map(Some(columns.len()))?;
        for (name, column) in &columns {
            map.serialize_entry(name, column)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pd0::testing::sample_ensemble;

    fn store_of(ensembles: impl IntoIterator<Item = Ensemble>) -> AggregateStore {
        let mut store = AggregateStore::new();
        for ensemble in ensembles {
            store.append(ensemble);
        }
        store
    }

    #[test]
    fn test_append_keeps_columns_aligned() {
        let store = store_of([
            sample_ensemble(1, 5, true),
            sample_ensemble(2, 5, false),
            sample_ensemble(3, 5, true),
        ]);
        assert_eq!(store.len(), 3);
        assert!(store.is_aligned());
        assert_eq!(store.columns().len(), AggregateStore::field_names().len());
    }

    #[test]
    fn test_missing_bottom_track_is_nan() {
        let store = store_of([sample_ensemble(1, 2, true), sample_ensemble(2, 2, false)]);
        for name in BOTTOM_TRACK_FIELDS {
            let column = store.column(name).unwrap();
            assert_eq!(column.len(), 2);
            assert!(!column.get_f64(0).unwrap().is_nan(), "{name}");
            assert!(column.get_f64(1).unwrap().is_nan(), "{name}");
        }
        assert_eq!(
            store.column("ensemble_number").unwrap(),
            ColumnRef::U16(&[1, 2])
        );
    }

    #[test]
    fn test_field_names_are_unique() {
        let names = AggregateStore::field_names();
        let unique: std::collections::HashSet<_> = names.iter().collect();
        assert_eq!(unique.len(), names.len());
        assert_eq!(names[0], "checksum");
        assert!(names.contains(&"water_velocity_east"));
        assert!(names.contains(&"percent_good_4beam"));
    }

    #[test]
    fn test_unknown_column() {
        let store = store_of([sample_ensemble(1, 2, false)]);
        assert!(store.column("no_such_field").is_none());
    }

    #[test]
    fn test_bottom_range() {
        let store = store_of([sample_ensemble(4, 2, true), sample_ensemble(5, 2, false)]);
        let range = store.bottom_range(1).unwrap();
        assert_eq!(range[0], 2004.0 + 65536.0);
        assert!(range[1].is_nan());
        assert!(store.bottom_range(0).is_err());
        assert!(store.bottom_range(5).is_err());
    }

    #[test]
    fn test_ntp_timestamp() {
        assert_eq!(ntp_timestamp(0.0), 2_208_988_800.0);
        let store = store_of([sample_ensemble(9, 1, false)]);
        assert_eq!(store.ntp_start_times(), vec![1_400_360_589.25 + 2_208_988_800.0]);
    }

    #[test]
    fn test_serialize_as_object() {
        let store = store_of([sample_ensemble(1, 2, false)]);
        let value = serde_json::to_value(&store).unwrap();
        let object = value.as_object().unwrap();
        assert_eq!(object.len(), AggregateStore::field_names().len());
        assert_eq!(object["num_cells"], serde_json::json!([2]));
        assert_eq!(object["beam1_bt_range_lsb"], serde_json::json!([null]));
        assert_eq!(
            object["water_velocity_north"],
            serde_json::json!([[101, 97]])
        );
    }
}
