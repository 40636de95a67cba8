// instruction.rs
//
// The instruction record replayed by the Tomasulo core, its opcode
// classification, and the producer-tag type used by the map table and
// reservation stations.

use serde::{Deserialize, Serialize};

/// Architectural register id. `None` is the `DNA` sentinel ("no register").
pub type RegId = Option<u32>;

/// The category a decoded instruction falls into, as produced by the
/// opcode classifier. Mirrors the `F_ICOMP`/`F_FCOMP`/`F_LOAD`/`F_STORE`/
/// `F_COND`/`F_UNCOND`/`F_TRAP` opcode flags of the source ISA.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OpClass {
    IntCompute,
    FpCompute,
    Load,
    Store,
    CondBranch,
    UncondBranch,
    Trap,
    /// An opcode the classifier does not recognize. Treated as a branch
    /// (§7): no RS allocation, no FU, no CDB, logged at debug level.
    Unclassified,
}

impl OpClass {
    /// `uses_int_fu = integer-compute ∨ load ∨ store` (§4.1).
    pub fn uses_int_fu(self) -> bool {
        matches!(self, OpClass::IntCompute | OpClass::Load | OpClass::Store)
    }

    /// `uses_fp_fu = fp-compute` (§4.1).
    pub fn uses_fp_fu(self) -> bool {
        matches!(self, OpClass::FpCompute)
    }

    /// `writes_cdb = integer-compute ∨ load ∨ fp-compute` (§4.1). Stores and
    /// branches never produce a register value.
    pub fn writes_cdb(self) -> bool {
        matches!(self, OpClass::IntCompute | OpClass::Load | OpClass::FpCompute)
    }

    /// `is_branch = conditional ∨ unconditional`. Unclassified opcodes are
    /// folded into this category (§7).
    pub fn is_branch(self) -> bool {
        matches!(
            self,
            OpClass::CondBranch | OpClass::UncondBranch | OpClass::Unclassified
        )
    }

    pub fn is_trap(self) -> bool {
        matches!(self, OpClass::Trap)
    }

    pub fn is_store(self) -> bool {
        matches!(self, OpClass::Store)
    }
}

/// A per-input-operand dependence tag (§3, Q slot). `Ready` means no
/// outstanding producer; `Producer` names the producing instruction by its
/// stable trace index (see "Ownership model" in SPEC_FULL §3 — this is the
/// weak reference the design notes ask for, realized as an index rather
/// than a pointer or `Rc`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tag {
    Ready,
    Producer(usize),
}

impl Tag {
    pub fn is_ready(self) -> bool {
        matches!(self, Tag::Ready)
    }

    /// True if this tag names `idx` as its producer.
    pub fn matches(self, idx: usize) -> bool {
        matches!(self, Tag::Producer(p) if p == idx)
    }
}

/// One trace entry. Identity is by position in the trace (program order);
/// `index` caches that position so a record can be compared or logged
/// without needing the trace alongside it.
#[derive(Debug, Clone)]
pub struct InstructionRecord {
    pub index: usize,
    pub op_class: OpClass,
    /// Opaque payload carried through for display/debugging; the core
    /// never interprets it.
    pub opcode: u32,
    pub r_in: [RegId; 3],
    pub r_out: [RegId; 2],

    pub dispatch_cycle: u64,
    pub issue_cycle: u64,
    pub execute_cycle: u64,
    pub cdb_cycle: u64,

    pub q: [Tag; 3],
}

impl InstructionRecord {
    pub fn new(index: usize, op_class: OpClass, opcode: u32, r_in: [RegId; 3], r_out: [RegId; 2]) -> Self {
        Self {
            index,
            op_class,
            opcode,
            r_in,
            r_out,
            dispatch_cycle: 0,
            issue_cycle: 0,
            execute_cycle: 0,
            cdb_cycle: 0,
            q: [Tag::Ready; 3],
        }
    }

    /// All three input tags are `Ready`, it has not yet been issued to a
    /// functional unit, and it was issued strictly before this cycle
    /// (§4.6 — issue and execute can never land in the same cycle).
    pub fn is_ready_to_execute(&self, current_cycle: u64) -> bool {
        self.q.iter().all(|t| t.is_ready())
            && self.execute_cycle == 0
            && self.issue_cycle > 0
            && self.issue_cycle < current_cycle
    }

    /// `complete_cycle(I) = execute_cycle(I) + latency(I) - 1` (§4.7).
    pub fn complete_cycle(&self, latency: u64) -> u64 {
        self.execute_cycle + latency - 1
    }
}
