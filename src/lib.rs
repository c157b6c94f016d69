//! Traffic Cellular Automaton Library
//!
//! A Nagel-Schreckenberg traffic simulation on one- and two-lane ring roads
//! that can run headless or be driven step by step by an outside caller.

pub mod simulation;
