// Hierarchical region timing
//
// Named regions are opened and closed in strict LIFO order, like a call
// stack. Each (parent path, name) pair accumulates total time and call
// count; the report breaks every region down by its children plus a
// residual "other" row for time no child accounts for.

mod accumulator;
mod report;
mod timer;

pub use accumulator::RegionAccumulator;
pub use report::{format_fixed, format_sci, ReportStyle};
pub use timer::HierarchicalTimer;
