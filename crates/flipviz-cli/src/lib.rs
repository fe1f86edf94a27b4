//! Command definition and argument handling for the `flipviz` binary.
pub mod cli;
pub mod input;
