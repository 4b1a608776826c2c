// # State Store Implementations
//
// This module provides implementations of the StateStore trait.

pub mod file;

pub use file::FileStateStore;
