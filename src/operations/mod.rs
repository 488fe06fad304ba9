pub mod burst_op;
pub mod capture_op;
pub mod diagnostic_op;
pub mod op_helper;
