// validator.rs
//
// Post-simulation property checker. Mirrors `check_all`/`print_check_instr`
// in the source, which run once after `is_simulation_done` and assert on
// every recorded cycle stamp. Unlike the core loop's `debug_assert!`s
// (bugs in this crate), a property violation here means the *trace* or
// *config* the caller supplied produced an inconsistent run, so it is
// reported through `Result` rather than a panic (see DESIGN.md, "validator
// strictness").

use crate::core::config::TomasuloConfig;
use crate::core::instruction::OpClass;
use crate::core::trace::Trace;
use crate::errors::CoreError;
use std::collections::HashMap;

/// Checks P1, P2, P3, P6, P7 against a trace that has already been run
/// through [`crate::core::TomasuloCore::run`]. Returns the first violation
/// found; does not attempt to collect every failure.
pub fn validate(trace: &Trace, config: &TomasuloConfig, total_cycles: u64) -> Result<(), CoreError> {
    let mut cdb_occupants: HashMap<u64, usize> = HashMap::new();

    for instr in trace.iter() {
        let idx = instr.index;

        if instr.op_class.is_trap() {
            if instr.dispatch_cycle != 0 {
                return Err(CoreError::PropertyViolation(format!(
                    "instruction {idx}: trap was dispatched (P6 requires traps never enter the pipeline)"
                )));
            }
            continue;
        }

        if instr.dispatch_cycle == 0 {
            // Never fetched/dispatched (e.g. trace tail beyond what fetch
            // reached before the run ended) — nothing else to check.
            continue;
        }

        // P1 (ordering) / P7 (bounds), adapted per class below.
        if instr.dispatch_cycle > total_cycles {
            return Err(CoreError::PropertyViolation(format!(
                "instruction {idx}: dispatch_cycle {} exceeds total_cycles {total_cycles} (P7)",
                instr.dispatch_cycle
            )));
        }

        if instr.op_class.is_branch() {
            // Branches only ever receive a dispatch stamp (§4.4).
            if instr.issue_cycle != 0 || instr.execute_cycle != 0 || instr.cdb_cycle != 0 {
                return Err(CoreError::PropertyViolation(format!(
                    "instruction {idx}: branch-class instruction advanced past dispatch (P1)"
                )));
            }
            continue;
        }

        // P2: issue is exactly one cycle after dispatch.
        if instr.issue_cycle != instr.dispatch_cycle + 1 {
            return Err(CoreError::PropertyViolation(format!(
                "instruction {idx}: issue_cycle {} is not dispatch_cycle {} + 1 (P2)",
                instr.issue_cycle, instr.dispatch_cycle
            )));
        }

        // P1: issue < execute.
        if instr.execute_cycle <= instr.issue_cycle {
            return Err(CoreError::PropertyViolation(format!(
                "instruction {idx}: execute_cycle {} does not exceed issue_cycle {} (P1)",
                instr.execute_cycle, instr.issue_cycle
            )));
        }

        let latency = if instr.op_class.uses_fp_fu() { config.l_fp } else { config.l_int };
        let complete = instr.complete_cycle(latency);

        if instr.op_class.is_store() {
            // P3 (store case): stores bypass the CDB and carry their FU
            // completion cycle verbatim, with no arbitration offset.
            if instr.cdb_cycle != complete {
                return Err(CoreError::PropertyViolation(format!(
                    "instruction {idx}: store cdb_cycle {} != execute_cycle + latency - 1 ({complete}) (P3)",
                    instr.cdb_cycle
                )));
            }
        } else if instr.op_class.writes_cdb() {
            // P3 (general case): cdb_cycle >= execute_cycle + latency,
            // the +1 accounting for at least one cycle of CDB arbitration.
            if instr.cdb_cycle < complete + 1 {
                return Err(CoreError::PropertyViolation(format!(
                    "instruction {idx}: cdb_cycle {} precedes earliest possible arbitration win {} (P3)",
                    instr.cdb_cycle,
                    complete + 1
                )));
            }
            if instr.cdb_cycle > total_cycles {
                return Err(CoreError::PropertyViolation(format!(
                    "instruction {idx}: cdb_cycle {} exceeds total_cycles {total_cycles} (P7)",
                    instr.cdb_cycle
                )));
            }
            if let Some(other) = cdb_occupants.insert(instr.cdb_cycle, idx) {
                return Err(CoreError::PropertyViolation(format!(
                    "instructions {other} and {idx} both claim the CDB at cycle {} (single-broadcast invariant)",
                    instr.cdb_cycle
                )));
            }
        }

        // P6: every dispatched, CDB-eligible instruction must complete.
        if instr.op_class.writes_cdb() && instr.cdb_cycle == 0 {
            return Err(CoreError::PropertyViolation(format!(
                "instruction {idx}: dispatched but never reached the CDB (P6)"
            )));
        }
        if instr.op_class == OpClass::Store && instr.cdb_cycle == 0 {
            return Err(CoreError::PropertyViolation(format!(
                "instruction {idx}: store dispatched but never completed (P6)"
            )));
        }
    }

    Ok(())
}
