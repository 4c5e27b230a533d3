use log::{debug, trace};
use sysinfo::{Pid, System};

/// Checks if a process with the given PID is currently running.
/// Note: PID recycling means a new process could have the same PID later.
/// This check is a snapshot in time.
pub fn is_process_running(pid: u32) -> bool {
    let mut sys = System::new();
    sys.refresh_process(Pid::from_u32(pid));
    sys.process(Pid::from_u32(pid)).is_some()
}

/// Finds the PID of the first running process whose image name matches
/// `image_name` exactly.
pub fn find_process_by_name(image_name: &str) -> Option<u32> {
    trace!("Searching process table for image name '{}'", image_name);
    let mut sys = System::new();
    sys.refresh_processes();
    // The match iterator borrows `sys`; keep the result in a local so the
    // borrow ends before `sys` goes out of scope.
    let pid = sys
        .processes_by_exact_name(image_name)
        .next()
        .map(|process| process.pid().as_u32());
    pid
}

/// Forcefully terminates the process `pid` and every descendant of it.
///
/// Children are killed before their parent so a shutting-down parent cannot
/// re-spawn them mid-teardown. Returns how many processes were signalled;
/// a process that already exited simply drops out of the count.
pub fn kill_process_tree(pid: u32) -> usize {
    let mut sys = System::new();
    sys.refresh_processes();

    let root = Pid::from_u32(pid);
    let mut doomed = vec![root];
    // Breadth-first walk over the parent links in the process table.
    let mut cursor = 0;
    while cursor < doomed.len() {
        let parent = doomed[cursor];
        for (child_pid, process) in sys.processes() {
            if process.parent() == Some(parent) && !doomed.contains(child_pid) {
                doomed.push(*child_pid);
            }
        }
        cursor += 1;
    }

    let mut killed = 0;
    for target in doomed.iter().rev() {
        if let Some(process) = sys.process(*target) {
            if process.kill() {
                killed += 1;
            }
        }
    }
    debug!(
        "Kill tree for PID {}: {} process(es) signalled",
        pid, killed
    );
    killed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_pid_is_not_running() {
        // Near the top of the PID space; no real process lives there.
        assert!(!is_process_running(u32::MAX - 1));
    }

    #[test]
    fn unknown_image_name_is_not_found() {
        assert_eq!(find_process_by_name("ra3_no_such_proc"), None);
    }

    #[test]
    fn finds_a_live_process_by_its_exact_name() {
        // The test binary itself is always in the process table; look its
        // own image name up the same way the game watcher would.
        let mut sys = System::new();
        sys.refresh_processes();
        let own_name = sys
            .process(Pid::from_u32(std::process::id()))
            .expect("own process missing from table")
            .name()
            .to_string();

        let found = find_process_by_name(&own_name).expect("own image name not found");
        assert!(is_process_running(found));
    }

    #[test]
    fn kill_tree_of_dead_pid_is_a_no_op() {
        assert_eq!(kill_process_tree(u32::MAX - 1), 0);
    }
}
