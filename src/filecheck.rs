//! FileCheck-style test validation for AMM files.
//!
//! Fixture files carry their expectations as comment directives, similar to
//! LLVM's FileCheck tool:
//!
//! ```text
//! // RUN: ammtojs --async-opcode slowop
//! // CHECK: r.on('greet', async (name) => {
//! // CHECK-NEXT: r.emit('greeted', name)
//! on greet fn (name: string): void {
//!   emit greeted name
//! }
//! ```
//!
//! `// RUN: not ammtojs` expects the translation to fail; `// ERROR:` lines
//! then match against the error message.

use crate::core::RuntimeProfile;
use crate::translate;

/// A CHECK directive extracted from an AMM file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckDirective {
    /// CHECK: pattern - Match on this or any later line
    Check(String),
    /// CHECK-NEXT: pattern - Match on the line right after the previous match
    CheckNext(String),
    /// CHECK-NOT: pattern - Must not appear in the rest of the output
    CheckNot(String),
    /// CHECK-EMPTY - Match empty line
    CheckEmpty,
    /// COM: comment - Comment, ignored
    Comment(String),
}

/// A RUN directive specifying how to execute the test
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunDirective {
    pub command: String,
    pub args: Vec<String>,
    pub expect_failure: bool,
}

/// Test specification extracted from an AMM file
#[derive(Debug)]
pub struct TestSpec {
    pub run_directives: Vec<RunDirective>,
    pub check_directives: Vec<CheckDirective>,
    /// Substrings the error message must contain.
    pub error_patterns: Vec<String>,
    pub amm_content: String,
}

impl TestSpec {
    /// Split a fixture into directives and AMM source.
    pub fn parse(content: &str) -> Result<Self, String> {
        let mut run_directives = Vec::new();
        let mut check_directives = Vec::new();
        let mut error_patterns = Vec::new();
        let mut amm_lines = Vec::new();

        for line in content.lines() {
            let trimmed = line.trim();

            if let Some(run_cmd) = trimmed.strip_prefix("// RUN:") {
                let (expect_failure, run_cmd) = match run_cmd.trim().strip_prefix("not ") {
                    Some(cmd) => (true, cmd),
                    None => (false, run_cmd),
                };
                let parts: Vec<&str> = run_cmd.split_whitespace().collect();
                if parts.is_empty() {
                    return Err(format!("Empty RUN directive: '{}'", trimmed));
                }
                run_directives.push(RunDirective {
                    command: parts[0].to_string(),
                    args: parts[1..].iter().map(|s| s.to_string()).collect(),
                    expect_failure,
                });
            } else if let Some(pattern) = trimmed.strip_prefix("// CHECK-NEXT:") {
                check_directives.push(CheckDirective::CheckNext(pattern.trim().to_string()));
            } else if let Some(pattern) = trimmed.strip_prefix("// CHECK-NOT:") {
                check_directives.push(CheckDirective::CheckNot(pattern.trim().to_string()));
            } else if trimmed.starts_with("// CHECK-EMPTY") {
                check_directives.push(CheckDirective::CheckEmpty);
            } else if let Some(pattern) = trimmed.strip_prefix("// CHECK:") {
                check_directives.push(CheckDirective::Check(pattern.trim().to_string()));
            } else if let Some(pattern) = trimmed.strip_prefix("// ERROR:") {
                error_patterns.push(pattern.trim().to_string());
            } else if let Some(comment) = trimmed.strip_prefix("// COM:") {
                check_directives.push(CheckDirective::Comment(comment.trim().to_string()));
            } else {
                amm_lines.push(line);
            }
        }

        Ok(TestSpec {
            run_directives,
            check_directives,
            error_patterns,
            amm_content: amm_lines.join("\n"),
        })
    }
}

/// Test runner that executes AMM fixture tests
pub struct TestRunner {
    verbose: bool,
}

impl TestRunner {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }

    /// Run every RUN directive of a fixture and validate its result
    pub fn run_test(&self, spec: &TestSpec) -> Result<(), String> {
        if spec.run_directives.is_empty() {
            return Err("No RUN directive".to_string());
        }

        for run_dir in &spec.run_directives {
            let profile = Self::profile_for(run_dir)?;
            let result = translate::from_str_with_profile(&spec.amm_content, &profile);

            match (result, run_dir.expect_failure) {
                (Ok(output), false) => {
                    self.validate_output(&output, &spec.check_directives)?;
                }
                (Err(err), true) => {
                    let message = err.to_string();
                    for pattern in &spec.error_patterns {
                        if !message.contains(pattern.as_str()) {
                            return Err(format!(
                                "ERROR: pattern '{}' not found in '{}'",
                                pattern, message
                            ));
                        }
                    }
                }
                (Ok(output), true) => {
                    return Err(format!("Expected failure but got output:\n{}", output));
                }
                (Err(err), false) => {
                    return Err(format!("Translation failed: {}", err));
                }
            }
        }

        Ok(())
    }

    /// Build the runtime profile a RUN line asks for.
    fn profile_for(run_dir: &RunDirective) -> Result<RuntimeProfile, String> {
        if run_dir.command != "ammtojs" {
            return Err(format!("Unknown RUN command: {}", run_dir.command));
        }

        let mut profile = RuntimeProfile::default();
        let mut args = run_dir.args.iter();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--async-opcode" => {
                    let op = args.next().ok_or("--async-opcode needs a value")?;
                    profile = profile.with_suspending_opcode(op.as_str());
                }
                "--runtime-module" => {
                    let module = args.next().ok_or("--runtime-module needs a value")?;
                    profile = profile.with_runtime_module(module.as_str());
                }
                "--replace-async-opcodes" => {
                    profile = profile.without_suspending_opcodes();
                }
                other => return Err(format!("Unknown RUN argument: {}", other)),
            }
        }
        Ok(profile)
    }

    /// Validate output against CHECK directives
    pub fn validate_output(
        &self,
        output: &str,
        directives: &[CheckDirective],
    ) -> Result<(), String> {
        let output_lines: Vec<&str> = output.lines().collect();
        let mut line_idx = 0;

        for directive in directives {
            match directive {
                CheckDirective::Comment(_) => continue,

                CheckDirective::Check(pattern) => {
                    let found = output_lines
                        .iter()
                        .skip(line_idx)
                        .position(|line| line.contains(pattern.as_str()));

                    match found {
                        Some(idx) => {
                            line_idx += idx + 1; // Move to the next line after the match
                            if self.verbose {
                                println!("CHECK: '{}' found at line {}", pattern, line_idx - 1);
                            }
                        }
                        None => {
                            return Err(format!(
                                "CHECK: pattern '{}' not found in output:\n{}",
                                pattern, output
                            ));
                        }
                    }
                }

                CheckDirective::CheckNext(pattern) => {
                    if line_idx >= output_lines.len() {
                        return Err(format!("CHECK-NEXT: no more lines, expected '{}'", pattern));
                    }

                    let line = output_lines[line_idx];
                    if !line.contains(pattern.as_str()) {
                        return Err(format!(
                            "CHECK-NEXT: expected '{}' but got '{}'",
                            pattern, line
                        ));
                    }

                    if self.verbose {
                        println!("CHECK-NEXT: '{}' matches at line {}", pattern, line_idx);
                    }
                    line_idx += 1;
                }

                CheckDirective::CheckNot(pattern) => {
                    if let Some(idx) = output_lines
                        .iter()
                        .skip(line_idx)
                        .position(|line| line.contains(pattern.as_str()))
                    {
                        return Err(format!(
                            "CHECK-NOT: pattern '{}' found at line {}",
                            pattern,
                            line_idx + idx
                        ));
                    }
                }

                CheckDirective::CheckEmpty => {
                    if line_idx >= output_lines.len() {
                        continue; // End of output counts as empty
                    }

                    let line = output_lines[line_idx];
                    if !line.trim().is_empty() {
                        return Err(format!(
                            "CHECK-EMPTY: expected empty line but got '{}'",
                            line
                        ));
                    }
                    line_idx += 1;
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_directives() {
        let content = r#"// RUN: ammtojs --async-opcode slowop
// CHECK: const r = require
// CHECK-NEXT: r.emit('_start', undefined)
// CHECK-NOT: httplsn
// COM: This is a comment
// plain comments stay in the source
"#;

        let spec = TestSpec::parse(content).unwrap();
        assert_eq!(spec.run_directives.len(), 1);
        assert_eq!(spec.run_directives[0].args, vec!["--async-opcode", "slowop"]);
        assert!(!spec.run_directives[0].expect_failure);
        assert_eq!(spec.check_directives.len(), 4);
        assert!(spec.amm_content.contains("plain comments"));
    }

    #[test]
    fn test_expected_failure() {
        let content = "// RUN: not ammtojs\n// ERROR: Control Port\non __ctrl fn (): void {\n}\n";
        let spec = TestSpec::parse(content).unwrap();
        assert!(spec.run_directives[0].expect_failure);

        TestRunner::new(false).run_test(&spec).unwrap();
    }

    #[test]
    fn test_check_matching() {
        let runner = TestRunner::new(false);
        let output = "const r = require('alan-js-runtime')\nr.emit('_start', undefined)\n";

        let directives = vec![
            CheckDirective::Check("require".to_string()),
            CheckDirective::CheckNext("r.emit('_start'".to_string()),
            CheckDirective::CheckNot("httplsn".to_string()),
            CheckDirective::CheckEmpty,
        ];

        runner.validate_output(output, &directives).unwrap();
    }

    #[test]
    fn test_check_next_failure() {
        let runner = TestRunner::new(false);
        let output = "Line 1\nLine 2\nLine 3\n";

        let directives = vec![
            CheckDirective::Check("Line 1".to_string()),
            CheckDirective::CheckNext("Line 3".to_string()), // Should fail
        ];

        let result = runner.validate_output(output, &directives);
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("CHECK-NEXT"));
    }

    #[test]
    fn test_check_not_failure() {
        let runner = TestRunner::new(false);
        let directives = vec![CheckDirective::CheckNot("tcplsn".to_string())];

        let result = runner.validate_output("r.on('_start', () => r.tcplsn())\n", &directives);
        assert!(result.unwrap_err().contains("CHECK-NOT"));
    }

    #[test]
    fn test_unknown_run_argument() {
        let content = "// RUN: ammtojs --optimize\n";
        let spec = TestSpec::parse(content).unwrap();
        let result = TestRunner::new(false).run_test(&spec);
        assert!(result.unwrap_err().contains("--optimize"));
    }
}
