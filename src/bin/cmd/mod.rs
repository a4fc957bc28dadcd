// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! CLI subcommands.

mod decode;
mod fields;
mod inspect;

pub use decode::DecodeCmd;
pub use fields::FieldsCmd;
pub use inspect::InspectCmd;
