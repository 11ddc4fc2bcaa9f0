pub mod chart;
pub mod controls;
pub mod sql_input;
