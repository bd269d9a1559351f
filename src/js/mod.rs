// This module holds the JavaScript backend: a syntax-directed translation from the AMM
// program tree to source text for alan-js-runtime. JsEmitter carries the injected
// RuntimeProfile and the statistics of the translation in progress; its methods are
// split across submodules by the IR layer they render. The call emitter turns opcode
// invocations into calls on the runtime handle, awaiting exactly the opcodes the profile
// lists as suspending. The expression emitter renders closures, calls, variable
// references and literals (widening int64 literals to BigInt). The function body emitter
// renders statement lists line by line at a given indentation. The program emitter
// orders everything: runtime import, global constants, handler registrations, listener
// start-up and the final _start trigger. All text is written into buffers owned by the
// caller so a failed translation never leaks partial output.

//! JavaScript code generation for `alan-js-runtime`.
//!
//! # Generated Code Structure
//!
//! ```text
//! const r = require('alan-js-runtime')
//! const x = 5n
//! r.on('greet', async (name) => {
//!   const msg = r.concat(name, name)
//!   await r.httpsend(msg)
//!   r.emit('greeted', name)
//! })
//! r.on('_start', () => r.httplsn())
//! r.emit('_start', undefined)
//! ```

pub mod call;
pub mod expression;
pub mod function_body;
pub mod program;

use crate::core::{RuntimeProfile, TranslationStats};

pub use expression::is_decimal_integer;

/// One indentation level in the generated code.
pub const INDENT: &str = "  ";

/// Emits AMM as JavaScript.
pub struct JsEmitter<'p> {
    profile: &'p RuntimeProfile,
    stats: TranslationStats,
}

impl<'p> JsEmitter<'p> {
    pub fn new(profile: &'p RuntimeProfile) -> Self {
        Self {
            profile,
            stats: TranslationStats::default(),
        }
    }

    /// Statistics gathered so far.
    pub fn stats(&self) -> &TranslationStats {
        &self.stats
    }

    pub fn into_stats(self) -> TranslationStats {
        self.stats
    }
}
