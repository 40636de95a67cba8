// functional_unit.rs
//
// Functional-unit table (§3, §4.6, §4.7): fixed number of slots, each
// carrying a fixed latency, occupied by a trace index for the duration of
// an instruction's execute phase. Mirrors `fuINT`/`fuFP` plus the
// `FU_INT_LATENCY`/`FU_FP_LATENCY` constants in the source.

#[derive(Debug, Clone)]
pub struct FunctionalUnitTable {
    latency: u64,
    slots: Vec<Option<usize>>,
}

impl FunctionalUnitTable {
    pub fn new(size: usize, latency: u64) -> Self {
        assert!(size > 0, "functional unit table must have at least one slot");
        assert!(latency > 0, "functional unit latency must be positive");
        Self {
            latency,
            slots: vec![None; size],
        }
    }

    pub fn latency(&self) -> u64 {
        self.latency
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Indices of empty slots, in table order (the oldest-first occupancy
    /// rule of §4.6 iterates over free slots in order).
    pub fn empty_slot_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, s)| if s.is_none() { Some(i) } else { None })
    }

    pub fn occupy(&mut self, slot: usize, trace_idx: usize) {
        debug_assert!(self.slots[slot].is_none());
        self.slots[slot] = Some(trace_idx);
    }

    pub fn free(&mut self, slot: usize) {
        self.slots[slot] = None;
    }

    pub fn occupants(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, s)| s.map(|idx| (i, idx)))
    }

    pub fn occupied(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracks_empty_slots_and_occupants() {
        let mut fu = FunctionalUnitTable::new(2, 4);
        let empties: Vec<_> = fu.empty_slot_indices().collect();
        assert_eq!(empties, vec![0, 1]);

        fu.occupy(0, 7);
        assert_eq!(fu.occupied(), 1);
        let empties: Vec<_> = fu.empty_slot_indices().collect();
        assert_eq!(empties, vec![1]);

        fu.free(0);
        assert_eq!(fu.occupied(), 0);
    }
}
