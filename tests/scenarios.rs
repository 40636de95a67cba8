use std::io::Write;
use tempfile::NamedTempFile;
use tomasulo_core::core::instruction::{InstructionRecord, OpClass};
use tomasulo_core::core::{validate, Trace, TomasuloConfig, TomasuloCore};
use tomasulo_core::trace_io::load_trace;

fn int_add(index: usize, r_out: u32, r_in: [Option<u32>; 2]) -> InstructionRecord {
    InstructionRecord::new(index, OpClass::IntCompute, 0, [r_in[0], r_in[1], None], [Some(r_out), None])
}

fn trace_file(json: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{json}").unwrap();
    file
}

#[test]
fn json_trace_loads_runs_and_validates_end_to_end() {
    let file = trace_file(
        r#"{"instructions": [
            {"op": "int_compute", "opcode": 32, "r_in": [1, 2], "r_out": [3]},
            {"op": "int_compute", "opcode": 32, "r_in": [3, 4], "r_out": [5]},
            {"op": "store", "r_in": [5, 6], "r_out": []}
        ]}"#,
    );

    let mut trace = load_trace(file.path()).expect("a well-formed trace must load");
    let config = TomasuloConfig::default();
    let mut core = TomasuloCore::new(config);
    let total = core.run(&mut trace);

    validate(&trace, &config, total).expect("a clean run must satisfy every testable property");
}

#[test]
fn fp_instructions_use_the_longer_fp_latency() {
    let fp_add = InstructionRecord::new(1, OpClass::FpCompute, 0, [Some(1), Some(2), None], [Some(3), None]);
    let mut trace = Trace::new(vec![fp_add]);
    let config = TomasuloConfig::default();
    let mut core = TomasuloCore::new(config);
    core.run(&mut trace);

    let instr = trace.get(1);
    assert!(instr.cdb_cycle - instr.execute_cycle >= config.l_fp);
}

#[test]
fn a_dependency_chain_longer_than_any_single_table_still_drains() {
    // Each instruction depends on the previous one, forcing full
    // serialization; this stresses RS/FU reuse across many more
    // instructions than either table has slots for.
    let records: Vec<_> = (0..20)
        .map(|i| int_add(i + 1, i as u32 + 1, [Some(i as u32), Some(100)]))
        .collect();
    let mut trace = Trace::new(records);
    let config = TomasuloConfig::default();
    let mut core = TomasuloCore::new(config);
    let total = core.run(&mut trace);

    validate(&trace, &config, total).expect("a long dependency chain must still satisfy every property");
    for instr in trace.iter() {
        assert!(instr.cdb_cycle > 0, "every instruction in the chain must eventually complete");
    }
}

#[test]
fn a_register_with_no_producer_is_immediately_ready() {
    let file = trace_file(
        r#"{"instructions": [
            {"op": "int_compute", "opcode": 32, "r_in": [null, null], "r_out": [1]}
        ]}"#,
    );
    let mut trace = load_trace(file.path()).unwrap();
    let mut core = TomasuloCore::new(TomasuloConfig::default());
    core.run(&mut trace);

    // No producer to wait on, so dispatch happens on the very first cycle.
    assert_eq!(trace.get(1).dispatch_cycle, 1);
}

#[test]
fn unclassified_opcodes_are_treated_as_branches() {
    let mystery = InstructionRecord::new(1, OpClass::Unclassified, 0xFFFF_FFFF, [None; 3], [None, None]);
    let mut trace = Trace::new(vec![mystery]);
    let mut core = TomasuloCore::new(TomasuloConfig::default());
    core.run(&mut trace);

    let instr = trace.get(1);
    assert!(instr.dispatch_cycle > 0);
    assert_eq!(instr.issue_cycle, 0);
    assert_eq!(instr.execute_cycle, 0);
    assert_eq!(instr.cdb_cycle, 0);
}

#[test]
fn validator_catches_a_hand_corrupted_trace() {
    let mut trace = Trace::new(vec![int_add(1, 3, [Some(1), Some(2)])]);
    let config = TomasuloConfig::default();
    let mut core = TomasuloCore::new(config);
    let total = core.run(&mut trace);
    validate(&trace, &config, total).unwrap();

    // Corrupt the stamp after the fact; the validator must notice.
    trace.get_mut(1).issue_cycle = trace.get(1).dispatch_cycle; // violates P2
    assert!(validate(&trace, &config, total).is_err());
}
