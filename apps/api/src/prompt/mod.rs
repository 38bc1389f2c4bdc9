// Prompt Compiler: PreferenceModel -> CompiledPrompt.
// Pure text assembly; no I/O and no clock, so the output is reproducible.

pub mod compiler;
pub mod policy;
pub mod prompts;

pub use compiler::{compile, CompiledPrompt};
