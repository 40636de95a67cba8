use proptest::prelude::*;
use quickcheck::TestResult;
use tomasulo_core::core::instruction::{InstructionRecord, OpClass};
use tomasulo_core::core::{validate, Trace, TomasuloConfig, TomasuloCore};

fn int_add(index: usize, r_out: u32, r_in: [Option<u32>; 2]) -> InstructionRecord {
    InstructionRecord::new(index, OpClass::IntCompute, 0, [r_in[0], r_in[1], None], [Some(r_out), None])
}

fn run_adds(specs: &[(u32, u32, u32)]) -> (Trace, TomasuloConfig, u64) {
    let records = specs
        .iter()
        .enumerate()
        .map(|(i, &(out, a, b))| int_add(i + 1, out, [Some(a), Some(b)]))
        .collect();
    let mut trace = Trace::new(records);
    let config = TomasuloConfig::default();
    let mut core = TomasuloCore::new(config);
    let total = core.run(&mut trace);
    (trace, config, total)
}

proptest! {
    // P1/P2/P3/P6/P7 over arbitrary small programs of integer adds with
    // arbitrary (possibly overlapping, possibly chained) register operands.
    #[test]
    fn every_random_program_of_adds_validates(
        specs in prop::collection::vec(
            (0u32..8, 0u32..8, 0u32..8),
            1..24,
        )
    ) {
        let (trace, config, total) = run_adds(&specs);
        prop_assert!(validate(&trace, &config, total).is_ok());
    }

    // P1: every dispatched instruction's four stamps are strictly
    // increasing (dispatch < issue < execute), and bounded by total_cycles.
    #[test]
    fn cycle_stamps_never_exceed_total_cycles(
        specs in prop::collection::vec((0u32..8, 0u32..8, 0u32..8), 1..24)
    ) {
        let (trace, _config, total) = run_adds(&specs);
        for instr in trace.iter() {
            prop_assert!(instr.dispatch_cycle <= total);
            prop_assert!(instr.issue_cycle <= total);
            prop_assert!(instr.execute_cycle <= total);
            prop_assert!(instr.cdb_cycle <= total);
        }
    }
}

quickcheck::quickcheck! {
    // P6 (termination/completeness): every instruction that gets dispatched
    // and uses a functional unit eventually reaches the CDB, regardless of
    // how registers happen to alias across the program.
    fn all_dispatched_int_compute_instructions_complete(outs: Vec<u8>) -> TestResult {
        if outs.is_empty() || outs.len() > 32 {
            return TestResult::discard();
        }
        let specs: Vec<(u32, u32, u32)> = outs
            .iter()
            .enumerate()
            .map(|(i, &o)| (o as u32 % 32, i as u32 % 8, (i as u32 + 1) % 8))
            .collect();
        let (trace, _config, _total) = run_adds(&specs);

        for instr in trace.iter() {
            if instr.dispatch_cycle > 0 && !instr.op_class.is_trap() && !instr.op_class.is_branch() && instr.cdb_cycle == 0 {
                return TestResult::failed();
            }
        }
        TestResult::passed()
    }
}
