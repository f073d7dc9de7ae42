//! Frame sequencing: the pause/typing/hold plan and the assembler that drives a renderer into a
//! sink.

pub(crate) mod assembler;
pub(crate) mod plan;
