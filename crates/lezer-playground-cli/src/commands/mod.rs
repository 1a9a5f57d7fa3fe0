pub mod check;
pub mod input;
pub mod restore;
pub mod share;
pub mod tree;
pub mod watch;

#[cfg(test)]
mod restore_tests;
