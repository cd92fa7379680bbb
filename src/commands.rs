//! Implementations of the `repo` subcommands on [`crate::App`].

pub mod fork;
pub mod view;
