// This module serves as the hub for the infrastructure shared by the frontend parser,
// the JavaScript emitters and the entry points. It exports the error types used across
// the crate (TranslateError and the TranslateResult alias), the RuntimeProfile that
// describes the target runtime surface (suspending opcodes, reserved event names, module
// and handle names), and the TranslationStats counters filled in while a program is
// emitted.

//! Core translator infrastructure.
//!
//! # Key Components
//!
//! ## Errors (`error`)
//! - One error enum for every way a translation can fail
//!
//! ## Runtime Profile (`profile`)
//! - Suspending-opcode registry consulted by the call emitter
//! - Reserved event names matched by the program assembler
//!
//! ## Statistics (`stats`)
//! - Counters for emitted constants, handlers, statements and calls

pub mod error;
pub mod profile;
pub mod stats;

pub use error::{TranslateError, TranslateResult};
pub use profile::{parse_opcode_list, RuntimeProfile, ALAN_ASYNC_OPCODES};
pub use stats::TranslationStats;
