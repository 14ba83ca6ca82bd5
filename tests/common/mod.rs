#![allow(dead_code)]

pub mod mock_controller;

use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use std::fs;
use tempfile::TempDir;

/// Isolated directory for running the `richedit` binary
pub struct TestContext {
    pub temp_dir: TempDir,
    pub config_dir: PathBuf,
}

impl TestContext {
    pub fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let config_dir = temp_dir.path().join("config");
        fs::create_dir_all(&config_dir).expect("Failed to create config dir");
        Self {
            temp_dir,
            config_dir,
        }
    }

    /// Write a file inside the temp dir and return its path
    pub fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.temp_dir.path().join(name);
        fs::write(&path, contents).expect("Failed to write fixture");
        path
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.temp_dir.path().join(name)
    }

    /// Run the CLI with its config directory pointed into the temp dir
    pub fn run(&self, args: &[&str]) -> Output {
        Command::new(env!("CARGO_BIN_EXE_richedit"))
            .args(args)
            .env("XDG_CONFIG_HOME", &self.config_dir)
            .output()
            .expect("Failed to run richedit")
    }
}

pub fn read(path: &Path) -> String {
    fs::read_to_string(path).expect("Failed to read output")
}
