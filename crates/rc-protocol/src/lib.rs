pub mod status;
pub mod tool_call;

pub use status::*;
pub use tool_call::*;
