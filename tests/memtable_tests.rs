//! Test harness for memtable test modules
