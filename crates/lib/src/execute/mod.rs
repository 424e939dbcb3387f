//! External tool execution.
//!
//! Every packaging and compiler step goes through [`run_tool`], which
//! returns the exit status and captured output instead of discarding them.

pub mod process;
pub mod types;

pub use process::{find_tool, run_tool, run_tool_with};
pub use types::{CommandLine, ExecError, OutputMode, ToolOutput};
