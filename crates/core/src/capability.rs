//! Capability mapping
//!
//! Maps the outcome of the list, put and get probes to the CockroachDB
//! features that depend on them.

use std::fmt;

use crate::probe::ProbeSet;

/// A product feature whose feasibility follows from the probe results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    Backup,
    Restore,
    Import,
    Export,
    Changefeeds,
}

impl Capability {
    /// All capabilities, in report order
    pub const ALL: [Capability; 5] = [
        Capability::Backup,
        Capability::Restore,
        Capability::Import,
        Capability::Export,
        Capability::Changefeeds,
    ];

    /// Label shown in the report
    pub const fn label(self) -> &'static str {
        match self {
            Self::Backup => "Backup",
            Self::Restore => "Restore",
            Self::Import => "Import",
            Self::Export => "Export",
            Self::Changefeeds => "Enterprise Changefeeds",
        }
    }

    /// Whether the given permissions are enough for this capability
    pub const fn is_sufficient(self, list: bool, put: bool, get: bool) -> bool {
        match self {
            Self::Backup => put && get && list,
            Self::Restore => get && list,
            Self::Import => get,
            Self::Export | Self::Changefeeds => put,
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Whether the probed permissions suffice for one capability
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Verdict {
    pub capability: Capability,
    pub sufficient: bool,
}

/// Derive every verdict from the three permission booleans
pub fn verdicts(list: bool, put: bool, get: bool) -> Vec<Verdict> {
    Capability::ALL
        .iter()
        .map(|&capability| Verdict {
            capability,
            sufficient: capability.is_sufficient(list, put, get),
        })
        .collect()
}

/// Derive every verdict from a completed probe set
pub fn verdicts_for(probes: &ProbeSet) -> Vec<Verdict> {
    verdicts(
        probes.list.succeeded(),
        probes.put.succeeded(),
        probes.get.succeeded(),
    )
}
