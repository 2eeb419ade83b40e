pub mod diagnostic_op;
pub mod list_op;
pub mod op_helper;
pub mod player_op;
pub mod stream_op;
