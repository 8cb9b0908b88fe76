//! Integration tests for Bigsby
//!
//! Note: Most tests live in dedicated test modules:
//! - Memtable tests: tests/memtable_tests/
//! - Storage tests: tests/storage_tests/
//! - Engine tests: tests/engine_tests/
//!
//! This file contains higher-level tests that span multiple components,
//! including full shell sessions.

use std::io::Cursor;

use bigsby::{Config, Engine};
use tempfile::TempDir;

// =============================================================================
// Config Tests
// =============================================================================

#[test]
fn test_config_default() {
    let config = Config::default();

    assert_eq!(config.data_dir.to_str().unwrap(), "./.bigsby");
    assert_eq!(config.compaction_limit, 1000);
    assert_eq!(config.level_max_segments, 4);
}

#[test]
fn test_config_builder() {
    let config = Config::builder()
        .data_dir("/custom/path")
        .compaction_limit(20)
        .level_max_segments(8)
        .build();

    assert_eq!(config.data_dir.to_str().unwrap(), "/custom/path");
    assert_eq!(config.compaction_limit, 20);
    assert_eq!(config.level_max_segments, 8);
}

#[test]
fn test_config_builder_default_values() {
    // Builder should start with default values
    let config = Config::builder().build();
    let default_config = Config::default();

    assert_eq!(config.data_dir, default_config.data_dir);
    assert_eq!(config.compaction_limit, default_config.compaction_limit);
}

// =============================================================================
// End-to-End Integration Tests
// =============================================================================

#[test]
fn test_full_lifecycle() {
    let temp_dir = TempDir::new().unwrap();

    // Phase 1: write, flush, delete, flush again
    {
        let config = Config::builder()
            .data_dir(temp_dir.path())
            .compaction_limit(10000)
            .build();
        let mut engine = Engine::open(config).unwrap();

        engine
            .insert("user:1".to_string(), "Alice".to_string())
            .unwrap();
        engine
            .insert("user:2".to_string(), "Bob".to_string())
            .unwrap();
        engine
            .insert("user:3".to_string(), "Charlie".to_string())
            .unwrap();
        engine.flush().unwrap();

        std::thread::sleep(std::time::Duration::from_millis(20));
        engine
            .insert("user:4".to_string(), "Diana".to_string())
            .unwrap();
        engine.remove("user:2".to_string()).unwrap();
        engine.flush().unwrap();
    }

    // Phase 2: reopen and verify everything persisted
    {
        let config = Config::builder()
            .data_dir(temp_dir.path())
            .compaction_limit(10000)
            .build();
        let engine = Engine::open(config).unwrap();

        assert_eq!(engine.levels()[0].len(), 2);

        assert_eq!(engine.search("user:1").unwrap(), Some("Alice".to_string()));
        assert_eq!(
            engine.search("user:3").unwrap(),
            Some("Charlie".to_string())
        );
        assert_eq!(engine.search("user:4").unwrap(), Some("Diana".to_string()));
        assert_eq!(engine.search("user:2").unwrap(), None); // Deleted
    }
}

// =============================================================================
// Shell Tests
// =============================================================================

fn run_shell(temp_dir: &TempDir, script: &str) -> String {
    let config = Config::builder()
        .data_dir(temp_dir.path())
        .compaction_limit(10000)
        .build();
    let mut engine = Engine::open(config).unwrap();

    let mut input = Cursor::new(script.as_bytes());
    let mut out = Vec::new();
    bigsby::repl::run(&mut engine, &mut input, &mut out).unwrap();

    String::from_utf8(out).unwrap()
}

#[test]
fn test_shell_session() {
    let temp_dir = TempDir::new().unwrap();
    let output = run_shell(
        &temp_dir,
        "insert hello world\n\
         search hello\n\
         remove hello\n\
         search hello\n\
         quit\n",
    );

    assert!(output.contains("Running BigsbyDB"));
    assert!(output.contains("Inserted [hello, world]"));
    assert!(output.contains("world"));
    assert!(output.contains("Removed key hello"));
}

#[test]
fn test_shell_multiword_values_and_aliases() {
    let temp_dir = TempDir::new().unwrap();
    let output = run_shell(
        &temp_dir,
        "i greeting hello out there\n\
         s greeting\n\
         q\n",
    );

    assert!(output.contains("Inserted [greeting, hello out there]"));
    assert!(output.contains("hello out there"));
}

#[test]
fn test_shell_reports_errors_and_continues() {
    let temp_dir = TempDir::new().unwrap();
    let output = run_shell(
        &temp_dir,
        "bananas\n\
         insert lonely\n\
         print nonsense\n\
         insert key value\n\
         quit\n",
    );

    assert!(output.contains("Unknown command: bananas"));
    assert!(output.contains("Error executing command insert"));
    assert!(output.contains("Error executing command print"));
    // The loop keeps going after errors.
    assert!(output.contains("Inserted [key, value]"));
}

#[test]
fn test_shell_print_commands() {
    let temp_dir = TempDir::new().unwrap();
    let output = run_shell(
        &temp_dir,
        "insert hello world\n\
         flush\n\
         insert fresh value\n\
         print memtable\n\
         print segment\n\
         quit\n",
    );

    assert!(output.contains("Flushed memtable to disk."));
    assert!(output.contains("Height: 1"));
    assert!(output.contains("fresh"));
    assert!(output.contains("Level 0:"));
    assert!(output.contains("[hello, world]"));
}

#[test]
fn test_shell_exit_flushes_memtable() {
    let temp_dir = TempDir::new().unwrap();

    // No explicit flush: quitting must persist the buffered write.
    run_shell(&temp_dir, "insert persisted value\nquit\n");

    let config = Config::builder().data_dir(temp_dir.path()).build();
    let engine = Engine::open(config).unwrap();
    assert_eq!(
        engine.search("persisted").unwrap(),
        Some("value".to_string())
    );
}

#[test]
fn test_shell_eof_exits_cleanly() {
    let temp_dir = TempDir::new().unwrap();
    let output = run_shell(&temp_dir, "insert hello world\n");

    assert!(output.contains("Inserted [hello, world]"));
}
