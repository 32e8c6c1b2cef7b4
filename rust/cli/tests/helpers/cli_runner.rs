use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

use super::CONFIG_VARS;

#[derive(Debug)]
pub struct CliRunner {
    binary_path: Option<PathBuf>,
    workdir: tempfile::TempDir,
}

#[allow(dead_code)]
#[derive(Debug, Clone)]
pub struct CliResult {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
    pub duration: Duration,
}

struct EnvGuard {
    restores: Vec<(String, Option<String>)>,
}

impl EnvGuard {
    fn apply(pairs: &[(&str, &str)]) -> Self {
        let mut restores = Vec::new();
        for key in CONFIG_VARS {
            restores.push((key.to_string(), std::env::var(key).ok()));
            unsafe { std::env::remove_var(key) };
        }
        for (key, value) in pairs {
            if !CONFIG_VARS.contains(key) {
                restores.push((key.to_string(), std::env::var(key).ok()));
            }
            unsafe { std::env::set_var(key, value) };
        }
        EnvGuard { restores }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        for (key, previous) in self.restores.iter().rev() {
            unsafe {
                match previous {
                    Some(val) => std::env::set_var(key, val),
                    None => std::env::remove_var(key),
                }
            }
        }
    }
}

impl CliRunner {
    pub fn new() -> std::io::Result<Self> {
        Ok(Self {
            binary_path: option_env!("CARGO_BIN_EXE_ronda")
                .map(PathBuf::from)
                .filter(|p| p.is_file()),
            workdir: tempfile::tempdir()?,
        })
    }

    pub fn run(&self, args: &[&str]) -> CliResult {
        self.run_inner(args, &[], None)
    }

    /// Runs with only `env` set among the configuration variables.
    pub fn run_with_env(&self, args: &[&str], env: &[(&str, &str)]) -> CliResult {
        self.run_inner(args, env, None)
    }

    pub fn run_with_input(&self, args: &[&str], input: &str) -> CliResult {
        self.run_inner(args, &[], Some(input))
    }

    fn run_inner(&self, args: &[&str], env: &[(&str, &str)], input: Option<&str>) -> CliResult {
        match &self.binary_path {
            Some(bin) => self.run_via_binary(bin, args, env, input),
            None => Self::run_via_library(args, env),
        }
    }

    fn run_via_binary(
        &self,
        bin: &PathBuf,
        args: &[&str],
        env: &[(&str, &str)],
        input: Option<&str>,
    ) -> CliResult {
        let mut cmd = Command::new(bin);
        cmd.args(args)
            .current_dir(self.workdir.path())
            .stdin(if input.is_some() {
                Stdio::piped()
            } else {
                Stdio::null()
            })
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        for key in CONFIG_VARS {
            cmd.env_remove(key);
        }
        for (key, value) in env {
            cmd.env(key, value);
        }

        let start = Instant::now();
        let mut child = cmd.spawn().expect("failed to spawn CLI binary");
        if let Some(payload) = input {
            use std::io::Write as _;
            if let Some(mut stdin) = child.stdin.take() {
                let _ = stdin.write_all(payload.as_bytes());
            }
        }
        let output = child.wait_with_output().expect("failed to read output");

        CliResult {
            exit_code: output.status.code().unwrap_or(1),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            duration: start.elapsed(),
        }
    }

    fn run_via_library(args: &[&str], env: &[(&str, &str)]) -> CliResult {
        let _guard = EnvGuard::apply(env);
        let mut out = Vec::new();
        let mut err = Vec::new();
        let start = Instant::now();
        let argv: Vec<String> = std::iter::once("ronda".to_string())
            .chain(args.iter().map(|s| s.to_string()))
            .collect();
        let code = ronda_cli::run(argv, &mut out, &mut err);
        CliResult {
            exit_code: code,
            stdout: String::from_utf8_lossy(&out).to_string(),
            stderr: String::from_utf8_lossy(&err).to_string(),
            duration: start.elapsed(),
        }
    }
}
