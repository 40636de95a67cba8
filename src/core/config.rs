// config.rs
//
// Compile-time-configurable Tomasulo parameters (§6), collected in a single
// validated config struct following the teacher's `CacheConfig`/
// `PipelineConfig` pattern (assert-validated constructor plus `Default`).

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TomasuloConfig {
    pub c_ifq: usize,
    pub rs_int: usize,
    pub rs_fp: usize,
    pub fu_int: usize,
    pub fu_fp: usize,
    pub l_int: u64,
    pub l_fp: u64,
    pub r_total: usize,
}

impl TomasuloConfig {
    pub fn new(
        c_ifq: usize,
        rs_int: usize,
        rs_fp: usize,
        fu_int: usize,
        fu_fp: usize,
        l_int: u64,
        l_fp: u64,
        r_total: usize,
    ) -> Self {
        assert!(c_ifq > 0, "instruction queue capacity must be positive");
        assert!(rs_int > 0, "RS_INT must have at least one slot");
        assert!(rs_fp > 0, "RS_FP must have at least one slot");
        assert!(fu_int > 0, "FU_INT must have at least one slot");
        assert!(fu_fp > 0, "FU_FP must have at least one slot");
        assert!(l_int > 0, "integer FU latency must be positive");
        assert!(l_fp > 0, "floating-point FU latency must be positive");
        assert!(r_total > 0, "register file must have at least one register");

        Self {
            c_ifq,
            rs_int,
            rs_fp,
            fu_int,
            fu_fp,
            l_int,
            l_fp,
            r_total,
        }
    }
}

impl Default for TomasuloConfig {
    /// The defaults of §6: `C_ifq=10`, `|RS_INT|=4`, `|RS_FP|=2`,
    /// `|FU_INT|=2`, `|FU_FP|=1`, `L_int=4`, `L_fp=9`, plus a 32-register
    /// file matching the source ISA's architectural register count.
    fn default() -> Self {
        Self::new(10, 4, 2, 2, 1, 4, 9, 32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_spec_parameters() {
        let cfg = TomasuloConfig::default();
        assert_eq!(cfg.c_ifq, 10);
        assert_eq!(cfg.rs_int, 4);
        assert_eq!(cfg.rs_fp, 2);
        assert_eq!(cfg.fu_int, 2);
        assert_eq!(cfg.fu_fp, 1);
        assert_eq!(cfg.l_int, 4);
        assert_eq!(cfg.l_fp, 9);
    }

    #[test]
    #[should_panic(expected = "RS_INT")]
    fn rejects_zero_capacity() {
        TomasuloConfig::new(10, 0, 2, 2, 1, 4, 9, 32);
    }
}
