//! Static kernel log corpora used across harnesses.
//!
//! Every line is newline-terminated exactly as the kernel writes it. The
//! `OOM_PATTERN` constant is the pattern most harnesses configure.

/// Pattern capturing (pid, process name) from the text after the timestamp.
pub const OOM_PATTERN: &str = r"(\d+).*?\((\w+)\)";

/// A stricter pattern that only matches the kernel's kill message.
pub const KILLED_PATTERN: &str = r"Killed process (\d+) \(([^)]+)\)";

/// The single-line scenario used throughout: one nginx kill.
pub const NGINX_KILL: &str = "Jan 02 15:04:05 OOM: Killed process 1234 (nginx)\n";

/// A realistic excerpt of `/var/log/kern.log` around two OOM kills.
pub const KERN_LOG: &[&str] = &[
    "Mar 11 09:12:01 web-1 kernel: [1023.442] eth0: link becomes ready\n",
    "Mar 11 09:14:33 web-1 kernel: [1175.001] java invoked oom-killer: gfp_mask=0x100cca\n",
    "Mar 11 09:14:33 web-1 kernel: [1175.002] Out of memory: Killed process 4242 (java) total-vm:8123456kB\n",
    "Mar 11 09:14:34 web-1 kernel: [1175.100] oom_reaper: reaped process 4242 (java)\n",
    "Mar 11 09:20:00 web-1 kernel: [1502.000] usb 1-1: new high-speed USB device\n",
    "Mar 11 09:31:45 web-1 kernel: [2167.900] Out of memory: Killed process 777 (postgres) total-vm:2000000kB\n",
];

/// Number of `KERN_LOG` lines `KILLED_PATTERN` matches.
pub const KERN_LOG_KILLS: u64 = 2;

/// Lines that must never reach the counter.
pub const NOISE: &[&str] = &[
    "short\n",
    "\n",
    "Killed 9 (x)\n",
    "not-a-date!!!!! Killed process 9 (x)\n",
    "2024-01-02T15:04:05Z Killed process 9 (x)\n",
];

/// `n` kill lines with distinct pids, cycling through a few process names.
pub fn numbered_kills(n: usize) -> Vec<String> {
    const NAMES: &[&str] = &["nginx", "java", "python", "redis"];
    (0..n)
        .map(|i| {
            format!(
                "Jan {:02} {:02}:{:02}:{:02} Out of memory: Killed process {} ({})\n",
                1 + i / 86_400 % 28,
                i / 3600 % 24,
                i / 60 % 60,
                i % 60,
                1000 + i,
                NAMES[i % NAMES.len()],
            )
        })
        .collect()
}

/// Concatenate lines into one buffer.
pub fn join(lines: &[impl AsRef<str>]) -> String {
    let mut out = String::new();
    for line in lines {
        out.push_str(line.as_ref());
    }
    out
}
