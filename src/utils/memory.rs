//! Process memory readings

/// Source of resident memory readings, in megabytes
#[cfg_attr(test, mockall::automock)]
pub trait MemoryProbe: Send + Sync {
    fn current_memory_mb(&self) -> f64;
}

/// Reads the resident set size of the current process.
///
/// Linux only (`/proc/self/status`); other targets always read 0.0, so the
/// race's memory delta is 0.0 there.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessMemory;

impl MemoryProbe for ProcessMemory {
    fn current_memory_mb(&self) -> f64 {
        current_memory_mb()
    }
}

/// Resident memory of this process in MB, 0.0 where unavailable
pub fn current_memory_mb() -> f64 {
    #[cfg(target_os = "linux")]
    {
        if let Ok(status) = std::fs::read_to_string("/proc/self/status") {
            if let Some(kb) = parse_vm_rss_kb(&status) {
                return kb as f64 / 1024.0;
            }
        }
    }
    0.0
}

/// Difference between two readings; never NaN or infinite
pub fn memory_delta_mb(before: f64, after: f64) -> f64 {
    let delta = after - before;
    if delta.is_finite() { delta } else { 0.0 }
}

#[cfg_attr(not(target_os = "linux"), allow(dead_code))]
fn parse_vm_rss_kb(status: &str) -> Option<u64> {
    status
        .lines()
        .find(|line| line.starts_with("VmRSS:"))
        .and_then(|line| line.split_whitespace().nth(1))
        .and_then(|kb| kb.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_vm_rss() {
        let status = "Name:\talgorace\nVmPeak:\t  20480 kB\nVmRSS:\t   2048 kB\nThreads:\t4\n";
        assert_eq!(parse_vm_rss_kb(status), Some(2048));
        assert_eq!(parse_vm_rss_kb("Name:\talgorace\n"), None);
    }

    #[test]
    fn test_current_memory_is_finite() {
        let mb = ProcessMemory.current_memory_mb();
        assert!(mb.is_finite());
        assert!(mb >= 0.0);
    }

    #[test]
    fn test_memory_delta() {
        assert_eq!(memory_delta_mb(10.0, 12.5), 2.5);
        assert_eq!(memory_delta_mb(12.5, 10.0), -2.5);
        assert_eq!(memory_delta_mb(f64::NAN, 10.0), 0.0);
        assert_eq!(memory_delta_mb(0.0, f64::INFINITY), 0.0);
    }
}
