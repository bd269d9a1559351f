//! ammtojs - AMM to JavaScript translation.
//!
//! Translates AMM, the mid-level intermediate representation of Alan
//! programs, into JavaScript that runs on the event-driven
//! `alan-js-runtime`. Opcodes become calls on the runtime handle, handlers
//! become async event subscriptions, and the program is started by emitting
//! the synthetic `_start` event once everything is registered.
//!
//! # Primary Usage
//!
//! ```no_run
//! use ammtojs::{from_file, from_str};
//!
//! let js = from_str("on _start fn (): void {\n  emit exit\n}\n")?;
//! assert!(js.ends_with("r.emit('_start', undefined)\n"));
//!
//! let js = from_file("hello.amm")?;
//! # Ok::<(), ammtojs::TranslateError>(())
//! ```
//!
//! # Architecture
//!
//! - [`amm`] - Program model and text parser
//! - [`js`] - JavaScript emitters and program assembly
//! - [`core`] - Errors, runtime profile, statistics
//! - [`translate`] - File and text entry points
//! - [`filecheck`] - CHECK directive validation for `.amm` fixtures

pub mod amm;
pub mod core;
pub mod filecheck;
pub mod js;
pub mod translate;

pub use crate::amm::{ParseError, Program};
pub use crate::core::{
    RuntimeProfile, TranslateError, TranslateResult, TranslationStats,
};
pub use crate::js::JsEmitter;
pub use crate::translate::{
    from_file, from_file_with_profile, from_str, from_str_with_profile, parse, translate,
    translate_with_stats,
};
