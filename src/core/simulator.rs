// simulator.rs
//
// The Tomasulo scheduling core: the five-phase cycle loop of §2, the
// top-level `run` entry point, and the termination check. Mirrors
// `runTomasulo`, `fetch_To_dispatch`, `dispatch_To_issue`,
// `issue_To_execute`, `execute_To_CDB`, `CDB_To_retire`, and
// `is_simulation_done` in the source almost function-for-function, with
// the pointer-graph state replaced by trace-index bookkeeping (§3).

use super::config::TomasuloConfig;
use super::functional_unit::FunctionalUnitTable;
use super::ifq::InstructionQueue;
use super::instruction::Tag;
use super::map_table::MapTable;
use super::reservation_station::ReservationStationTable;
use super::trace::Trace;

#[derive(Debug, Clone)]
pub struct TomasuloCore {
    config: TomasuloConfig,
    ifq: InstructionQueue,
    rs_int: ReservationStationTable,
    rs_fp: ReservationStationTable,
    fu_int: FunctionalUnitTable,
    fu_fp: FunctionalUnitTable,
    map_table: MapTable,
    /// Trace index of the instruction currently holding the CDB, if its
    /// writeback has not yet been broadcast (§3).
    cdb: Option<usize>,
    fetch_index: usize,
    cycle: u64,
}

impl TomasuloCore {
    pub fn new(config: TomasuloConfig) -> Self {
        Self {
            ifq: InstructionQueue::new(config.c_ifq),
            rs_int: ReservationStationTable::new(config.rs_int),
            rs_fp: ReservationStationTable::new(config.rs_fp),
            fu_int: FunctionalUnitTable::new(config.fu_int, config.l_int),
            fu_fp: FunctionalUnitTable::new(config.fu_fp, config.l_fp),
            map_table: MapTable::new(config.r_total),
            cdb: None,
            fetch_index: 1,
            cycle: 1,
            config,
        }
    }

    pub fn config(&self) -> &TomasuloConfig {
        &self.config
    }

    /// The sole entry point (§6). Mutates `trace` in place to stamp the
    /// four cycle numbers on each instruction, and returns the total cycle
    /// count needed to drain the pipeline.
    pub fn run(&mut self, trace: &mut Trace) -> u64 {
        let mut cycle: u64 = 1;
        loop {
            self.fetch_to_dispatch(trace, cycle);
            self.dispatch_to_issue(trace, cycle);
            self.issue_to_execute(trace, cycle);
            self.execute_to_cdb(trace, cycle);
            self.cdb_to_retire(trace, cycle);
            cycle += 1;
            if self.is_simulation_done(trace) {
                break;
            }
        }
        self.cycle = cycle;
        cycle
    }

    /// §4.9: done when the trace is exhausted and both RS tables are empty.
    fn is_simulation_done(&self, trace: &Trace) -> bool {
        self.fetch_index > trace.len() && self.rs_int.occupied() == 0 && self.rs_fp.occupied() == 0
    }

    /// §4.4 step 1 / §4.2: pull the next non-trap instruction into the IFQ.
    fn fetch(&mut self, trace: &Trace) {
        if self.fetch_index > trace.len() {
            return;
        }
        if self.ifq.is_full() {
            return;
        }
        loop {
            if self.fetch_index > trace.len() {
                return;
            }
            if trace.get(self.fetch_index).op_class.is_trap() {
                self.fetch_index += 1;
                continue;
            }
            break;
        }
        let idx = self.fetch_index;
        self.fetch_index += 1;
        self.ifq.push(idx);
    }

    /// §4.4: fetch, then attempt to dispatch the oldest queued instruction.
    fn fetch_to_dispatch(&mut self, trace: &mut Trace, cycle: u64) {
        self.fetch(trace);

        let Some(idx) = self.ifq.peek_tail() else {
            return;
        };
        let class = trace.get(idx).op_class;

        if class.uses_int_fu() {
            if !self.rs_int.try_place(idx) {
                return; // RS_INT full; retry next cycle.
            }
        } else if class.uses_fp_fu() {
            if !self.rs_fp.try_place(idx) {
                return; // RS_FP full; retry next cycle.
            }
        } else {
            log::debug!("trace index {idx}: branch-class dispatch (no RS/FU/CDB)");
            if class == super::instruction::OpClass::Unclassified {
                log::debug!("trace index {idx}: unclassified opcode treated as branch");
            }
        }

        let instr = trace.get_mut(idx);
        instr.dispatch_cycle = cycle;
        for k in 0..3 {
            instr.q[k] = self.map_table.lookup(instr.r_in[k]);
        }
        let instr = trace.get(idx);
        self.map_table.set(instr);

        self.ifq.pop_tail();
    }

    /// §4.5: one-cycle dispatch-to-issue latency.
    fn dispatch_to_issue(&mut self, trace: &mut Trace, cycle: u64) {
        for idx in self.rs_int.occupants().chain(self.rs_fp.occupants()).collect::<Vec<_>>() {
            let instr = trace.get_mut(idx);
            if instr.issue_cycle == 0 && instr.dispatch_cycle == cycle - 1 {
                instr.issue_cycle = cycle;
            }
        }
    }

    /// §4.6: place the oldest ready RS entry into each free FU slot, by
    /// table, INT before FP.
    fn issue_to_execute(&mut self, trace: &mut Trace, cycle: u64) {
        Self::issue_one_table(&mut self.fu_int, &self.rs_int, trace, cycle);
        Self::issue_one_table(&mut self.fu_fp, &self.rs_fp, trace, cycle);
    }

    fn issue_one_table(fu: &mut FunctionalUnitTable, rs: &ReservationStationTable, trace: &mut Trace, cycle: u64) {
        for slot in fu.empty_slot_indices().collect::<Vec<_>>() {
            let candidate = rs
                .occupants()
                .filter(|&idx| trace.get(idx).is_ready_to_execute(cycle))
                .min_by_key(|&idx| trace.get(idx).dispatch_cycle);
            match candidate {
                Some(idx) => {
                    trace.get_mut(idx).execute_cycle = cycle;
                    fu.occupy(slot, idx);
                },
                None => break, // nothing ready now; nothing younger will be either (§4.6).
            }
        }
    }

    /// §4.7: broadcast last cycle's winner, then complete/arbitrate.
    fn execute_to_cdb(&mut self, trace: &mut Trace, cycle: u64) {
        if let Some(winner) = self.cdb.take() {
            if trace.get(winner).cdb_cycle == cycle {
                self.broadcast(trace, winner);
            }
        }

        let mut winner: Option<usize> = None;
        let mut winner_slot: Option<(bool, usize)> = None;

        for (slot, idx) in self.fu_int.occupants().collect::<Vec<_>>() {
            self.consider_completion(trace, slot, idx, false, cycle, &mut winner, &mut winner_slot);
        }
        for (slot, idx) in self.fu_fp.occupants().collect::<Vec<_>>() {
            self.consider_completion(trace, slot, idx, true, cycle, &mut winner, &mut winner_slot);
        }

        if let (Some(idx), Some((is_fp, slot))) = (winner, winner_slot) {
            trace.get_mut(idx).cdb_cycle = cycle + 1;
            if is_fp {
                self.fu_fp.free(slot);
            } else {
                self.fu_int.free(slot);
            }
        }
        self.cdb = winner;
    }

    #[allow(clippy::too_many_arguments)]
    fn consider_completion(
        &mut self,
        trace: &mut Trace,
        slot: usize,
        idx: usize,
        is_fp: bool,
        cycle: u64,
        winner: &mut Option<usize>,
        winner_slot: &mut Option<(bool, usize)>,
    ) {
        let latency = if is_fp { self.fu_fp.latency() } else { self.fu_int.latency() };
        let instr = trace.get(idx);
        if instr.complete_cycle(latency) > cycle {
            return;
        }

        if instr.op_class.is_store() {
            let complete_cycle = instr.complete_cycle(latency);
            trace.get_mut(idx).cdb_cycle = complete_cycle;
            if is_fp {
                self.fu_fp.free(slot);
                self.rs_fp.free(idx);
            } else {
                self.fu_int.free(slot);
                self.rs_int.free(idx);
            }
            return;
        }

        let is_older = match winner {
            Some(w) => instr.dispatch_cycle < trace.get(*w).dispatch_cycle,
            None => true,
        };
        if is_older {
            *winner = Some(idx);
            *winner_slot = Some((is_fp, slot));
        }
    }

    /// Clear every tag and map-table slot still referencing `winner`.
    fn broadcast(&mut self, trace: &mut Trace, winner: usize) {
        self.map_table.clear_if(winner);
        for idx in self.rs_int.occupants().chain(self.rs_fp.occupants()).collect::<Vec<_>>() {
            let instr = trace.get_mut(idx);
            for q in &mut instr.q {
                if q.matches(winner) {
                    *q = Tag::Ready;
                }
            }
        }
    }

    /// §4.8: free the RS slot of whoever's writeback lands next cycle.
    fn cdb_to_retire(&mut self, trace: &Trace, cycle: u64) {
        for idx in self.rs_int.occupants().collect::<Vec<_>>() {
            if trace.get(idx).cdb_cycle == cycle + 1 {
                self.rs_int.free(idx);
            }
        }
        for idx in self.rs_fp.occupants().collect::<Vec<_>>() {
            if trace.get(idx).cdb_cycle == cycle + 1 {
                self.rs_fp.free(idx);
            }
        }
    }
}
