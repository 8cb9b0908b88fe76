//! Interactive shell
//!
//! Line-oriented REPL translating commands to engine calls.
//!
//! ## Commands
//! - `insert|i <key> <value...>` — write a key-value pair
//! - `search|s <key>` — print the value for a key, if any
//! - `remove|r <key>` — delete a key
//! - `flush|f` — force the memtable to disk
//! - `print|p memtable|m|segment|s` — dump internal state
//! - `quit|q` — exit (also EOF)
//!
//! Command errors are printed and the loop continues; only I/O failures on
//! the shell's own streams terminate it.

use std::io::{BufRead, Write};

use crate::engine::Engine;
use crate::error::{BigsbyError, Result};

pub const PROMPT: &str = ">> ";

/// Run the shell over the given input and output streams until `quit` or
/// EOF, then flush whatever is still buffered in the memtable.
pub fn run<R: BufRead, W: Write>(engine: &mut Engine, input: &mut R, out: &mut W) -> Result<()> {
    writeln!(out, "Running BigsbyDB")?;

    let mut line = String::new();
    loop {
        write!(out, "{PROMPT}")?;
        out.flush()?;

        line.clear();
        if input.read_line(&mut line)? == 0 {
            break;
        }

        let mut parts = line.split_whitespace();
        let Some(cmd) = parts.next() else {
            continue;
        };
        let args: Vec<&str> = parts.collect();

        let result = match cmd {
            "insert" | "i" => insert(engine, out, &args),
            "search" | "s" => search(engine, out, &args),
            "remove" | "r" => remove(engine, out, &args),
            "print" | "p" => print_object(engine, out, &args),
            "flush" | "f" => flush(engine, out),
            "quit" | "q" => break,
            unknown => {
                writeln!(out, "Unknown command: {unknown}")?;
                continue;
            }
        };

        if let Err(err) = result {
            writeln!(out, "Error executing command {cmd}: {err}")?;
        }
    }

    // Persist anything still buffered before exiting.
    engine.flush()
}

fn insert<W: Write>(engine: &mut Engine, out: &mut W, args: &[&str]) -> Result<()> {
    if args.len() < 2 {
        return Err(BigsbyError::BadArguments(
            "not enough arguments (expected 2)".to_string(),
        ));
    }
    let key = args[0].to_string();
    let value = args[1..].join(" ");
    engine.insert(key.clone(), value.clone())?;
    writeln!(out, "Inserted [{key}, {value}]")?;
    Ok(())
}

fn search<W: Write>(engine: &mut Engine, out: &mut W, args: &[&str]) -> Result<()> {
    if args.is_empty() {
        return Err(BigsbyError::BadArguments(
            "not enough arguments (expected 1)".to_string(),
        ));
    }
    if let Some(value) = engine.search(args[0])? {
        writeln!(out, "{value}")?;
    }
    Ok(())
}

fn remove<W: Write>(engine: &mut Engine, out: &mut W, args: &[&str]) -> Result<()> {
    if args.is_empty() {
        return Err(BigsbyError::BadArguments(
            "not enough arguments (expected 1)".to_string(),
        ));
    }
    engine.remove(args[0].to_string())?;
    writeln!(out, "Removed key {}", args[0])?;
    Ok(())
}

fn flush<W: Write>(engine: &mut Engine, out: &mut W) -> Result<()> {
    engine.flush()?;
    writeln!(out, "Flushed memtable to disk.")?;
    Ok(())
}

fn print_object<W: Write>(engine: &mut Engine, out: &mut W, args: &[&str]) -> Result<()> {
    if args.is_empty() {
        return Err(BigsbyError::BadArguments(
            "not enough arguments (expected 1)".to_string(),
        ));
    }
    match args[0] {
        "memtable" | "m" => engine.print_memtable(out),
        "segment" | "s" => engine.print_segments(out),
        other => Err(BigsbyError::BadArguments(format!(
            "don't know how to print {other}"
        ))),
    }
}
