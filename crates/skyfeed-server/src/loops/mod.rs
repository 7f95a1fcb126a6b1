//! Background loops for continuous processing.

pub mod sim_loop;
