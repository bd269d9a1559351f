//! Command line front end for the AMM to JavaScript translator.

use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::process;

use ammtojs::core::parse_opcode_list;
use ammtojs::{
    from_str_with_profile, parse, translate_with_stats, RuntimeProfile, TranslateError,
    TranslateResult,
};
use clap::Parser;
use log::LevelFilter;

#[derive(Parser, Debug)]
#[command(name = "ammtojs", version, about = "Translate AMM into JavaScript for alan-js-runtime")]
struct Cli {
    /// AMM file to translate; reads stdin when omitted or `-`
    input: Option<PathBuf>,

    /// Write the JavaScript here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Module the generated code requires as its runtime
    #[arg(long, default_value = "alan-js-runtime")]
    runtime_module: String,

    /// Treat this opcode as suspending (repeatable)
    #[arg(long = "async-opcode", value_name = "OPCODE")]
    async_opcodes: Vec<String>,

    /// Read suspending opcodes from a file, one per line
    #[arg(long, value_name = "FILE")]
    async_opcodes_file: Option<PathBuf>,

    /// Start from an empty opcode registry instead of alan-js-runtime's
    #[arg(long)]
    replace_async_opcodes: bool,

    /// Print translation statistics to stderr
    #[arg(long)]
    stats: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    if let Err(e) = run(&cli) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    let profile = build_profile(cli)?;

    let (input_name, source) = match &cli.input {
        Some(path) if path.as_os_str() != "-" => {
            let source = fs::read_to_string(path)
                .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
            (path.display().to_string(), source)
        }
        _ => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            ("<stdin>".to_string(), buffer)
        }
    };

    let result: TranslateResult<String> = if cli.stats {
        parse(&source).and_then(|program| {
            let (js, stats) = translate_with_stats(&program, &profile)?;
            eprint!("{}", stats);
            Ok(js)
        })
    } else {
        from_str_with_profile(&source, &profile)
    };
    let js = result.map_err(|e| describe_failure(&input_name, &e))?;

    match &cli.output {
        Some(path) => fs::write(path, js)
            .map_err(|e| format!("Failed to write {}: {}", path.display(), e))?,
        None => io::stdout().write_all(js.as_bytes())?,
    }
    Ok(())
}

/// Parse failures carry a position, so they are reported against the input.
fn describe_failure(input_name: &str, err: &TranslateError) -> String {
    if err.is_parse() {
        format!("{}: {}", input_name, err)
    } else {
        err.to_string()
    }
}

fn build_profile(cli: &Cli) -> Result<RuntimeProfile, Box<dyn std::error::Error>> {
    let mut profile = RuntimeProfile::default().with_runtime_module(cli.runtime_module.as_str());
    if cli.replace_async_opcodes {
        profile = profile.without_suspending_opcodes();
    }

    if let Some(path) = &cli.async_opcodes_file {
        let text = fs::read_to_string(path)
            .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
        let ops = parse_opcode_list(&text);
        log::debug!("loaded {} suspending opcodes from {}", ops.len(), path.display());
        profile = profile.with_suspending_opcodes(ops);
    }

    Ok(profile.with_suspending_opcodes(cli.async_opcodes.iter().cloned()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_profile_from_flags() {
        let cli = Cli::parse_from([
            "ammtojs",
            "--replace-async-opcodes",
            "--async-opcode",
            "slowop",
            "--runtime-module",
            "./rt.js",
        ]);
        let profile = build_profile(&cli).unwrap();

        assert_eq!(profile.runtime_module, "./rt.js");
        assert!(profile.is_suspending("slowop"));
        assert!(!profile.is_suspending("httpget"));
    }

    #[test]
    fn test_parse_failure_names_input() {
        let err = ammtojs::from_str("const y int64 = 6\n").unwrap_err();
        assert_eq!(
            describe_failure("main.amm", &err),
            "main.amm: line 1, column 9: Expected ':' but found 'i'"
        );
    }

    #[test]
    fn test_capability_failure_is_unprefixed() {
        let err = ammtojs::from_str("on __ctrl fn (): void {\n}\n").unwrap_err();
        let message = describe_failure("main.amm", &err);
        assert!(message.starts_with("AVM Control Port unavailable in JS"));
    }
}
