//! Service layer for the encounter table

mod encounter_table;

pub use encounter_table::EncounterTable;
