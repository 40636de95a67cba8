// map_table.rs
//
// Register producer map (§3, §4.3): per-register record of the most recent
// in-flight producer, the sole mechanism for RAW detection. Mirrors
// `map_table[MD_TOTAL_REGS]` and `d_update_mt` in the source.

use super::instruction::{InstructionRecord, Tag};

#[derive(Debug, Clone)]
pub struct MapTable {
    slots: Vec<Tag>,
}

impl MapTable {
    pub fn new(num_registers: usize) -> Self {
        Self {
            slots: vec![Tag::Ready; num_registers],
        }
    }

    /// `lookup(r)`; `r == None` (DNA) is always ready.
    pub fn lookup(&self, r: Option<u32>) -> Tag {
        match r {
            None => Tag::Ready,
            Some(reg) => self.slots[reg as usize],
        }
    }

    /// `set(instr)`: both output registers (if present) now name `instr` as
    /// producer. Later producers shadow earlier ones (§4.3) — callers must
    /// invoke this in dispatch order for that guarantee to hold.
    pub fn set(&mut self, instr: &InstructionRecord) {
        for r in instr.r_out {
            if let Some(reg) = r {
                self.slots[reg as usize] = Tag::Producer(instr.index);
            }
        }
    }

    /// `clear_if(instr)`: clear every slot still referencing `instr`.
    pub fn clear_if(&mut self, idx: usize) {
        for slot in &mut self.slots {
            if slot.matches(idx) {
                *slot = Tag::Ready;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::instruction::OpClass;

    #[test]
    fn last_writer_shadows_earlier_ones() {
        let mut map = MapTable::new(8);
        let i1 = InstructionRecord::new(1, OpClass::IntCompute, 0, [None; 3], [Some(3), None]);
        let i2 = InstructionRecord::new(2, OpClass::IntCompute, 0, [None; 3], [Some(3), None]);
        map.set(&i1);
        assert_eq!(map.lookup(Some(3)), Tag::Producer(1));
        map.set(&i2);
        assert_eq!(map.lookup(Some(3)), Tag::Producer(2));
    }

    #[test]
    fn dna_is_always_ready() {
        let map = MapTable::new(8);
        assert_eq!(map.lookup(None), Tag::Ready);
    }

    #[test]
    fn clear_if_only_clears_matching_slots() {
        let mut map = MapTable::new(8);
        let i1 = InstructionRecord::new(1, OpClass::IntCompute, 0, [None; 3], [Some(1), Some(2)]);
        map.set(&i1);
        map.clear_if(1);
        assert_eq!(map.lookup(Some(1)), Tag::Ready);
        assert_eq!(map.lookup(Some(2)), Tag::Ready);

        let i2 = InstructionRecord::new(2, OpClass::IntCompute, 0, [None; 3], [Some(1), None]);
        map.set(&i2);
        map.clear_if(99); // no-op, nothing references instruction 99
        assert_eq!(map.lookup(Some(1)), Tag::Producer(2));
    }
}
