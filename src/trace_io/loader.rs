// loader.rs
//
// JSON trace file format and the loader that turns it into a `Trace`.
// Grounded on `elf_loader`'s "read file, validate, build in-memory
// structure" shape, swapping its binary ELF parsing for `serde_json`
// (declared but unused in the teacher's `Cargo.toml` — this is where it
// earns its keep).

use crate::core::instruction::{InstructionRecord, OpClass, RegId};
use crate::core::trace::Trace;
use crate::errors::CoreError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One decoded instruction as it appears in a trace file. `r_in`/`r_out`
/// entries are `null` for `DNA` (no register).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstructionDescriptor {
    pub op: OpClass,
    #[serde(default)]
    pub opcode: u32,
    pub r_in: Vec<RegId>,
    pub r_out: Vec<RegId>,
}

/// The top-level shape of a trace file: just an ordered instruction list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraceFile {
    pub instructions: Vec<InstructionDescriptor>,
}

/// Parse and validate a trace file at `path`, returning a `Trace` ready
/// for [`crate::core::TomasuloCore::run`].
pub fn load_trace(path: impl AsRef<Path>) -> Result<Trace, CoreError> {
    let text = std::fs::read_to_string(path)?;
    parse_trace(&text)
}

fn parse_trace(text: &str) -> Result<Trace, CoreError> {
    let file: TraceFile = serde_json::from_str(text)?;
    if file.instructions.is_empty() {
        return Err(CoreError::InvalidTrace("trace contains no instructions".into()));
    }

    let mut records = Vec::with_capacity(file.instructions.len());
    for (i, descr) in file.instructions.into_iter().enumerate() {
        let index = i + 1;
        if descr.r_in.len() > 3 {
            return Err(CoreError::InvalidTrace(format!(
                "instruction {index}: at most 3 input registers, got {}",
                descr.r_in.len()
            )));
        }
        if descr.r_out.len() > 2 {
            return Err(CoreError::InvalidTrace(format!(
                "instruction {index}: at most 2 output registers, got {}",
                descr.r_out.len()
            )));
        }

        let mut r_in = [None; 3];
        r_in[..descr.r_in.len()].copy_from_slice(&descr.r_in);
        let mut r_out = [None; 2];
        r_out[..descr.r_out.len()].copy_from_slice(&descr.r_out);

        records.push(InstructionRecord::new(index, descr.op, descr.opcode, r_in, r_out));
    }

    Ok(Trace::new(records))
}
