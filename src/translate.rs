// This module provides the entry points of the translator. Each one obtains an AMM
// program, either by reading and parsing a file or by parsing text already in memory,
// wraps a parse failure into TranslateError::Parse with the parser's message unchanged,
// and hands the program to the JavaScript emitter. The *_with_profile variants take an
// explicit RuntimeProfile; the plain ones use the alan-js-runtime default. Translation is
// a pure function of its input: the same text always yields the same output and nothing
// is cached between calls.

//! Translation entry points.

use std::fs;
use std::path::Path;

use log::debug;

use crate::amm::Program;
use crate::core::{RuntimeProfile, TranslateError, TranslateResult, TranslationStats};
use crate::js::JsEmitter;

/// Translate an already parsed program.
pub fn translate(program: &Program, profile: &RuntimeProfile) -> TranslateResult<String> {
    translate_with_stats(program, profile).map(|(text, _)| text)
}

/// Translate a program and return the statistics gathered along the way.
pub fn translate_with_stats(
    program: &Program,
    profile: &RuntimeProfile,
) -> TranslateResult<(String, TranslationStats)> {
    let mut emitter = JsEmitter::new(profile);
    let text = emitter.emit_program(program)?;
    let stats = emitter.into_stats();
    debug!("{}", stats);
    Ok((text, stats))
}

/// Parse AMM text, mapping a parse failure to [`TranslateError::Parse`].
pub fn parse(text: &str) -> TranslateResult<Program> {
    Program::parse(text).map_err(|e| TranslateError::Parse {
        message: e.to_string(),
    })
}

/// Translate AMM text with the default runtime profile.
pub fn from_str(text: &str) -> TranslateResult<String> {
    from_str_with_profile(text, &RuntimeProfile::default())
}

pub fn from_str_with_profile(text: &str, profile: &RuntimeProfile) -> TranslateResult<String> {
    let program = parse(text)?;
    translate(&program, profile)
}

/// Read and translate an AMM file with the default runtime profile.
pub fn from_file(path: impl AsRef<Path>) -> TranslateResult<String> {
    from_file_with_profile(path, &RuntimeProfile::default())
}

pub fn from_file_with_profile(
    path: impl AsRef<Path>,
    profile: &RuntimeProfile,
) -> TranslateResult<String> {
    let path = path.as_ref();
    debug!("reading {}", path.display());
    let text = fs::read_to_string(path).map_err(|source| TranslateError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    from_str_with_profile(&text, profile)
}
