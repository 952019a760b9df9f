//! Suspicion scorer: fixed, independent, additive heuristics.
//!
//! Each [`Heuristic`] looks at one validated [`LogEntry`] and either fires
//! (adding its points, and its flag if it has one) or stays silent. The
//! total is clamped to [`MAX_SCORE`]. Evaluation order only decides the
//! order of the flag list.
//!
//! | # | Rule | Points | Flag |
//! |---|------|--------|------|
//! | 1 | destination port in the suspicious set | 25 | `SUSPICIOUS_PORT` |
//! | 2 | hour of day before 06 or after 22 | 15 | `UNUSUAL_TIME` |
//! | 3 | more than 100 MiB transferred | 20 | `LARGE_TRANSFER` |
//! | 4 | action is DENY, BLOCK or DROP | 30 | - |
//! | 5 | TCP to a privileged port other than 80/443 | 10 | - |
//! | 6 | private source to a public destination | 5 | - |
//! | 7 | more than 1000 packets carrying under 10000 bytes | 25 | `HIGH_FREQUENCY` |

use crate::predicates::is_private_ip;
use crate::types::{Contribution, Flag, HourBasis, LogEntry, RuleId, ScoredRecord};

pub const MAX_SCORE: u8 = 100;

/// Ports of exploitation-prone services: telnet, MSRPC, NetBIOS, SMB, MSSQL,
/// RDP, VNC, X11.
pub static SUSPICIOUS_PORTS: phf::Set<u16> = phf::phf_set! {
    23u16, 135u16, 139u16, 445u16, 1433u16, 3389u16, 5900u16, 6000u16,
};

pub static BLOCKING_ACTIONS: phf::Set<&'static str> = phf::phf_set! {
    "DENY", "BLOCK", "DROP",
};

pub const LARGE_TRANSFER_BYTES: u64 = 100 * 1024 * 1024;
pub const FLOOD_MIN_PACKETS: u64 = 1000;
pub const FLOOD_MAX_BYTES: u64 = 10_000;
/// Quiet hours are `hour < 6 || hour > 22`.
pub const QUIET_HOURS_END: u32 = 6;
pub const QUIET_HOURS_START: u32 = 22;

/// One scoring rule.
pub trait Heuristic: Send + Sync {
    fn rule(&self) -> RuleId;

    fn points(&self) -> u8;

    /// Flag attached when the rule fires, if the rule is an explained one.
    fn flag(&self) -> Option<Flag> {
        None
    }

    fn fires(&self, entry: &LogEntry) -> bool;
}

// ---------------------------------------------------------------------------
// Rules
// ---------------------------------------------------------------------------

pub struct SuspiciousPort;

impl Heuristic for SuspiciousPort {
    fn rule(&self) -> RuleId {
        RuleId::SuspiciousPort
    }

    fn points(&self) -> u8 {
        25
    }

    fn flag(&self) -> Option<Flag> {
        Some(Flag::SuspiciousPort)
    }

    fn fires(&self, entry: &LogEntry) -> bool {
        SUSPICIOUS_PORTS.contains(&entry.destination_port)
    }
}

/// Reads the hour in the configured basis. Entries without a timestamp
/// never fire.
pub struct UnusualTime {
    basis: HourBasis,
}

impl UnusualTime {
    pub fn new(basis: HourBasis) -> Self {
        Self { basis }
    }
}

impl Heuristic for UnusualTime {
    fn rule(&self) -> RuleId {
        RuleId::UnusualTime
    }

    fn points(&self) -> u8 {
        15
    }

    fn flag(&self) -> Option<Flag> {
        Some(Flag::UnusualTime)
    }

    fn fires(&self, entry: &LogEntry) -> bool {
        entry.timestamp.is_some_and(|ts| {
            let hour = self.basis.hour_of(&ts);
            hour < QUIET_HOURS_END || hour > QUIET_HOURS_START
        })
    }
}

pub struct LargeTransfer;

impl Heuristic for LargeTransfer {
    fn rule(&self) -> RuleId {
        RuleId::LargeTransfer
    }

    fn points(&self) -> u8 {
        20
    }

    fn flag(&self) -> Option<Flag> {
        Some(Flag::LargeTransfer)
    }

    fn fires(&self, entry: &LogEntry) -> bool {
        entry.bytes > LARGE_TRANSFER_BYTES
    }
}

pub struct BlockedAction;

impl Heuristic for BlockedAction {
    fn rule(&self) -> RuleId {
        RuleId::BlockedAction
    }

    fn points(&self) -> u8 {
        30
    }

    fn fires(&self, entry: &LogEntry) -> bool {
        BLOCKING_ACTIONS.contains(entry.action.as_str())
    }
}

pub struct PrivilegedPort;

impl Heuristic for PrivilegedPort {
    fn rule(&self) -> RuleId {
        RuleId::PrivilegedPort
    }

    fn points(&self) -> u8 {
        10
    }

    fn fires(&self, entry: &LogEntry) -> bool {
        entry.protocol == "TCP"
            && entry.destination_port < 1024
            && !matches!(entry.destination_port, 80 | 443)
    }
}

/// Informational: private-to-public egress is common and rarely malicious
/// on its own.
pub struct PrivateEgress;

impl Heuristic for PrivateEgress {
    fn rule(&self) -> RuleId {
        RuleId::PrivateEgress
    }

    fn points(&self) -> u8 {
        5
    }

    fn fires(&self, entry: &LogEntry) -> bool {
        is_private_ip(&entry.source_ip) && !is_private_ip(&entry.destination_ip)
    }
}

/// Many packets, little payload: the shape of a flood or scan.
pub struct HighFrequency;

impl Heuristic for HighFrequency {
    fn rule(&self) -> RuleId {
        RuleId::HighFrequency
    }

    fn points(&self) -> u8 {
        25
    }

    fn flag(&self) -> Option<Flag> {
        Some(Flag::HighFrequency)
    }

    fn fires(&self, entry: &LogEntry) -> bool {
        entry.packets > FLOOD_MIN_PACKETS && entry.bytes < FLOOD_MAX_BYTES
    }
}

// ---------------------------------------------------------------------------
// Scorer
// ---------------------------------------------------------------------------

/// Outcome of scoring one entry.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Assessment {
    pub score: u8,
    pub flags: Vec<Flag>,
    pub contributions: Vec<Contribution>,
}

/// Runs the rule table over an entry.
pub struct Scorer {
    heuristics: Vec<Box<dyn Heuristic>>,
}

impl Scorer {
    /// The standard rule table, in flag order.
    pub fn new(basis: HourBasis) -> Self {
        Self::with_heuristics(vec![
            Box::new(SuspiciousPort),
            Box::new(UnusualTime::new(basis)),
            Box::new(LargeTransfer),
            Box::new(BlockedAction),
            Box::new(PrivilegedPort),
            Box::new(PrivateEgress),
            Box::new(HighFrequency),
        ])
    }

    /// A scorer over an explicit rule list. Flags follow list order.
    pub fn with_heuristics(heuristics: Vec<Box<dyn Heuristic>>) -> Self {
        Self { heuristics }
    }

    pub fn rules(&self) -> impl Iterator<Item = RuleId> + '_ {
        self.heuristics.iter().map(|h| h.rule())
    }

    /// Evaluate every rule against `entry` without touching it.
    pub fn assess(&self, entry: &LogEntry) -> Assessment {
        let contributions: Vec<Contribution> = self
            .heuristics
            .iter()
            .filter(|h| h.fires(entry))
            .map(|h| Contribution {
                rule: h.rule(),
                points: h.points(),
                flag: h.flag(),
            })
            .collect();

        let total: u32 = contributions.iter().map(|c| u32::from(c.points)).sum();
        let score = total.min(u32::from(MAX_SCORE)) as u8;
        let flags = contributions.iter().filter_map(|c| c.flag).collect();

        Assessment {
            score,
            flags,
            contributions,
        }
    }

    /// Score `entry`, replacing its flag list with the triggered flags.
    pub fn score(&self, mut entry: LogEntry) -> ScoredRecord {
        let Assessment {
            score,
            flags,
            contributions,
        } = self.assess(&entry);
        entry.flags = flags;
        ScoredRecord {
            entry,
            score,
            contributions,
        }
    }
}

impl Default for Scorer {
    fn default() -> Self {
        Self::new(HourBasis::default())
    }
}

impl std::fmt::Debug for Scorer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scorer")
            .field("rules", &self.rules().collect::<Vec<_>>())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
