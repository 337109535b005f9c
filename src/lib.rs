//! LOBSTER message-log parsing and serialization library.
//!
//! This crate provides the typed core used by the `lobster_data` converter
//! binary:
//!
//! - `kind`: the event kind and halt reason code enumerations
//! - `error`: the row parse-failure taxonomy
//! - `record`: the seven event record types, the parse/format contract
//!   they share, and the kind-dispatched `LobsterEvent` sum type
//!
//! Parsing works on pre-split rows of ordered text fields; CSV framing,
//! file handling and JSON document assembly belong to the caller
//! (`src/main.rs` here), which moves rows in and out of this core one at
//! a time.
pub mod error;
pub mod kind;
pub mod record;
