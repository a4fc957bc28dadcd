// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Fields command - list every output column name.

use clap::Args;

use crate::common::Result;
use dvlcodec::{AggregateStore, BOTTOM_TRACK_FIELDS};

/// List output column names.
#[derive(Args, Clone, Debug)]
pub struct FieldsCmd {
    /// Only list the bottom track group
    #[arg(long)]
    bottom_track: bool,
}

impl FieldsCmd {
    pub fn run(self) -> Result<()> {
        for name in AggregateStore::field_names() {
            let in_bottom_track = BOTTOM_TRACK_FIELDS.contains(&name);
            if self.bottom_track && !in_bottom_track {
                continue;
            }
            if in_bottom_track {
                println!("{name}\t(bottom track, NaN when absent)");
            } else {
                println!("{name}");
            }
        }
        Ok(())
    }
}
