// output.rs
//
// Run summary formatting for the CLI driver. Mirrors the shape of
// `timing_simulator::visualization::PipelineVisualization` (a small enum
// selecting between text/CSV/JSON renderers) but reports per-instruction
// cycle stamps instead of per-cycle pipeline occupancy, since a Tomasulo
// run's interesting output is the stamped trace, not a moving diagram.

use crate::core::trace::Trace;
use colored::Colorize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Csv,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "csv" => Ok(OutputFormat::Csv),
            "json" => Ok(OutputFormat::Json),
            other => Err(format!("unknown output format '{other}' (expected text, csv, or json)")),
        }
    }
}

pub fn render(trace: &Trace, total_cycles: u64, format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => render_text(trace, total_cycles),
        OutputFormat::Csv => render_csv(trace),
        OutputFormat::Json => render_json(trace, total_cycles),
    }
}

fn render_text(trace: &Trace, total_cycles: u64) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}\n", "Tomasulo run summary".bold()));
    out.push_str(&format!("total cycles: {}\n\n", total_cycles.to_string().green()));
    out.push_str(&format!(
        "{:>4} {:>10} {:>10} {:>6} {:>7} {:>7} {:>7} {:>7}\n",
        "idx", "class", "opcode", "r_in", "r_out", "disp", "iss/ex", "cdb"
    ));
    for instr in trace.iter() {
        out.push_str(&format!(
            "{:>4} {:>10?} {:>10} {:>6} {:>7} {:>7} {:>3}/{:<3} {:>7}\n",
            instr.index,
            instr.op_class,
            instr.opcode,
            format_regs(&instr.r_in),
            format_regs2(&instr.r_out),
            instr.dispatch_cycle,
            instr.issue_cycle,
            instr.execute_cycle,
            instr.cdb_cycle,
        ));
    }
    out
}

fn render_csv(trace: &Trace) -> String {
    let mut out = String::from("index,op_class,opcode,dispatch_cycle,issue_cycle,execute_cycle,cdb_cycle\n");
    for instr in trace.iter() {
        out.push_str(&format!(
            "{},{:?},{},{},{},{},{}\n",
            instr.index, instr.op_class, instr.opcode, instr.dispatch_cycle, instr.issue_cycle, instr.execute_cycle, instr.cdb_cycle
        ));
    }
    out
}

fn render_json(trace: &Trace, total_cycles: u64) -> String {
    let mut out = String::new();
    out.push_str("{\n");
    out.push_str(&format!("  \"total_cycles\": {},\n", total_cycles));
    out.push_str("  \"instructions\": [\n");
    let count = trace.len();
    for (i, instr) in trace.iter().enumerate() {
        out.push_str("    {\n");
        out.push_str(&format!("      \"index\": {},\n", instr.index));
        out.push_str(&format!("      \"op_class\": \"{:?}\",\n", instr.op_class));
        out.push_str(&format!("      \"dispatch_cycle\": {},\n", instr.dispatch_cycle));
        out.push_str(&format!("      \"issue_cycle\": {},\n", instr.issue_cycle));
        out.push_str(&format!("      \"execute_cycle\": {},\n", instr.execute_cycle));
        out.push_str(&format!("      \"cdb_cycle\": {}\n", instr.cdb_cycle));
        out.push_str("    }");
        if i + 1 < count {
            out.push(',');
        }
        out.push('\n');
    }
    out.push_str("  ]\n}\n");
    out
}

fn format_regs(regs: &[Option<u32>; 3]) -> String {
    regs.iter()
        .filter_map(|r| r.map(|v| v.to_string()))
        .collect::<Vec<_>>()
        .join("/")
}

fn format_regs2(regs: &[Option<u32>; 2]) -> String {
    regs.iter()
        .filter_map(|r| r.map(|v| v.to_string()))
        .collect::<Vec<_>>()
        .join("/")
}
