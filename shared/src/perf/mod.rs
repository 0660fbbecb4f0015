mod perf_counter;
mod perf_monitor;
mod perf_report;

pub use perf_counter::PerfCounter;
pub use perf_monitor::PerfMonitor;
pub use perf_report::PerfReport;
