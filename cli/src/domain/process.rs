//! Process-table matching for node agents running outside the service.

/// One row of the OS process listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessEntry {
    pub pid: u32,
    pub command_line: String,
}

/// A foreground node agent: the command line mentions `openclaw`, `node`
/// and `run`, in any case and any order.
#[must_use]
pub fn is_foreground_node(command_line: &str) -> bool {
    let lowered = command_line.to_lowercase();
    ["openclaw", "node", "run"]
        .iter()
        .all(|needle| lowered.contains(needle))
}

/// Parse a `<pid> <command line>` row, as printed by
/// `ps -eo pid=,args=` or the equivalent PowerShell query.
#[must_use]
pub fn parse_process_line(line: &str) -> Option<ProcessEntry> {
    let line = line.trim();
    let (pid, rest) = line.split_once(char::is_whitespace)?;
    let command_line = rest.trim();
    if command_line.is_empty() {
        return None;
    }
    Some(ProcessEntry {
        pid: pid.parse().ok()?,
        command_line: command_line.to_string(),
    })
}

/// PIDs of foreground node agents in a process listing, skipping `own_pid`.
#[must_use]
pub fn foreground_node_pids(listing: &str, own_pid: u32) -> Vec<u32> {
    listing
        .lines()
        .filter_map(parse_process_line)
        .filter(|p| p.pid != own_pid && is_foreground_node(&p.command_line))
        .map(|p| p.pid)
        .collect()
}
