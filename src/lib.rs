//! Benchmark harness package for the toric workspace.
