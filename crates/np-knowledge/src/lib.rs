//! NX-OS command knowledge base.
//!
//! Three deterministic rule sets, no I/O:
//! - [`classify`] — read-only vs configuration-changing, fail-safe default
//! - [`correct`] — IOS-style command forms rewritten to NX-OS syntax
//! - [`is_syntax_failure`] — device error markers in captured output
//!
//! Classification is prefix-based: only commands starting with a known
//! read-only verb are `ReadOnly`. A keyword list that tries to enumerate
//! every mutating verb can never be exhaustive, so the default branch is
//! `ConfigChanging`.

use np_protocol::CommandCategory;

/// Verbs that open a read-only command.
const READ_ONLY_PREFIXES: &[&str] = &[
    "show", "display", "dir", "ping", "traceroute", "terminal", "where", "pwd",
];

/// IOS command forms and their NX-OS equivalents.
///
/// Checked longest-prefix-first; the matched prefix is replaced and any
/// trailing arguments are kept.
const IOS_TO_NXOS: &[(&str, &str)] = &[
    ("show ip bgp summary", "show bgp ipv4 unicast summary"),
    ("show ip bgp neighbors", "show bgp ipv4 unicast neighbors"),
    ("show ip bgp", "show bgp ipv4 unicast summary"),
    ("show bgp summary", "show bgp l2vpn evpn summary"),
    ("show bgp neighbors", "show bgp l2vpn evpn neighbors"),
    ("show processes cpu", "show system resources"),
    ("show processes", "show system resources"),
];

/// Interface shorthands rewritten to the canonical `ethernet` form.
const INTERFACE_SHORTHANDS: &[(&str, &str)] = &[("eth", "ethernet"), ("e", "ethernet")];

/// Output fragments that indicate the device rejected the command syntax.
const SYNTAX_FAILURE_MARKERS: &[&str] = &[
    "% Invalid",
    "Invalid command",
    "Syntax error",
    "% Ambiguous command",
    "Command not found",
    "% Incomplete command",
    "Permission denied",
];

/// Classify a device command as read-only or configuration-changing.
///
/// Unknown verbs classify as `ConfigChanging` (fail-safe).
pub fn classify(command: &str) -> CommandCategory {
    let lower = command.trim().to_lowercase();
    let Some(verb) = lower.split_whitespace().next() else {
        return CommandCategory::ConfigChanging;
    };

    if READ_ONLY_PREFIXES.contains(&verb) {
        CommandCategory::ReadOnly
    } else {
        CommandCategory::ConfigChanging
    }
}

/// Rewrite a known foreign-syntax command to its NX-OS canonical form.
///
/// Returns `None` when no rule matches; the caller then runs the command
/// verbatim.
pub fn correct(command: &str) -> Option<String> {
    let trimmed = command.trim();
    let lower = trimmed.to_lowercase();

    for (ios, nxos) in IOS_TO_NXOS {
        if let Some(rest) = lower.strip_prefix(ios) {
            return Some(format!("{nxos}{rest}"));
        }
    }

    correct_interface_shorthand(trimmed)
}

/// Rewrite `e1/7` / `eth1/7` style interface shorthand to `ethernet1/7`.
fn correct_interface_shorthand(command: &str) -> Option<String> {
    let mut changed = false;
    let rewritten: Vec<String> = command
        .split_whitespace()
        .map(|word| {
            let lower = word.to_lowercase();
            for (short, full) in INTERFACE_SHORTHANDS {
                // Shorthand is <prefix><digits>/<...>, e.g. "e1/7".
                if let Some(rest) = lower.strip_prefix(short) {
                    if rest.contains('/')
                        && rest.chars().next().is_some_and(|c| c.is_ascii_digit())
                    {
                        changed = true;
                        return format!("{full}{rest}");
                    }
                }
            }
            word.to_string()
        })
        .collect();

    changed.then(|| rewritten.join(" "))
}

/// True when the captured output indicates a syntax-level rejection.
pub fn is_syntax_failure(output: &str) -> bool {
    SYNTAX_FAILURE_MARKERS
        .iter()
        .any(|marker| output.contains(marker))
}
