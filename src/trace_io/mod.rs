// mod.rs
//
// Trace file format and loading. The core never touches a filesystem path
// or a `serde_json::Value` — this module is the only place that crosses
// that boundary, consistent with the teacher's separation between
// `elf_loader`/`utils::parser` (outer I/O) and the simulators themselves.

mod loader;

pub use loader::{load_trace, InstructionDescriptor, TraceFile};
