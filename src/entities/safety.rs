//! Target integrity levels for safety functions
//!
//! Safety functions are classified with an ISO 26262 ASIL. The level fixes
//! the architectural metric targets that the evaluated SPFM, LFM and MPHF
//! are checked against.

use serde::{Deserialize, Serialize};

/// ISO 26262 Automotive Safety Integrity Level (ASIL)
///
/// ASIL levels from lowest (QM) to highest (D) rigor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Asil {
    /// Quality Management - no specific safety requirements
    QM,
    /// ASIL A - lowest safety integrity level
    A,
    /// ASIL B
    B,
    /// ASIL C
    C,
    /// ASIL D - highest safety integrity level
    D,
}

/// Hardware architectural metric targets for one ASIL
///
/// SPFM and LFM are fractions (0..1); MPHF is a probability per hour.
/// `None` means the level sets no target for that metric.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArchitecturalTargets {
    pub spfm_min: Option<f64>,
    pub lfm_min: Option<f64>,
    pub mphf_max: Option<f64>,
}

impl Asil {
    pub const ALL: [Asil; 5] = [Asil::QM, Asil::A, Asil::B, Asil::C, Asil::D];

    /// ISO 26262-5 targets for this level
    pub fn targets(&self) -> ArchitecturalTargets {
        match self {
            Asil::QM => ArchitecturalTargets {
                spfm_min: None,
                lfm_min: None,
                mphf_max: None,
            },
            Asil::A => ArchitecturalTargets {
                spfm_min: None,
                lfm_min: None,
                mphf_max: Some(1e-6),
            },
            Asil::B => ArchitecturalTargets {
                spfm_min: Some(0.90),
                lfm_min: Some(0.60),
                mphf_max: Some(1e-7),
            },
            Asil::C => ArchitecturalTargets {
                spfm_min: Some(0.97),
                lfm_min: Some(0.80),
                mphf_max: Some(1e-7),
            },
            Asil::D => ArchitecturalTargets {
                spfm_min: Some(0.99),
                lfm_min: Some(0.90),
                mphf_max: Some(1e-8),
            },
        }
    }
}

impl std::fmt::Display for Asil {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Asil::QM => write!(f, "QM"),
            Asil::A => write!(f, "ASIL A"),
            Asil::B => write!(f, "ASIL B"),
            Asil::C => write!(f, "ASIL C"),
            Asil::D => write!(f, "ASIL D"),
        }
    }
}

impl std::str::FromStr for Asil {
    type Err = String;

    /// Accepts "QM", "B", "ASIL B", "asil-b" and "ASIL_B"
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_uppercase();
        let level = upper
            .strip_prefix("ASIL")
            .map(|rest| rest.trim_start_matches([' ', '-', '_']))
            .unwrap_or(&upper);

        match level {
            "QM" => Ok(Asil::QM),
            "A" => Ok(Asil::A),
            "B" => Ok(Asil::B),
            "C" => Ok(Asil::C),
            "D" => Ok(Asil::D),
            _ => Err(format!(
                "Unknown ASIL: {}. Expected QM, A, B, C, or D",
                s
            )),
        }
    }
}

/// Target integrity level as recorded on a safety function
///
/// Levels that are not an ASIL (e.g. "SIL 2" from another standard) are
/// kept verbatim so snapshots round-trip; they carry no targets.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TargetLevel {
    Asil(Asil),
    Other(String),
}

impl TargetLevel {
    /// The ASIL, if this level is one
    pub fn asil(&self) -> Option<Asil> {
        match self {
            TargetLevel::Asil(level) => Some(*level),
            TargetLevel::Other(_) => None,
        }
    }
}

impl From<Asil> for TargetLevel {
    fn from(level: Asil) -> Self {
        TargetLevel::Asil(level)
    }
}

impl std::fmt::Display for TargetLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TargetLevel::Asil(level) => level.fmt(f),
            TargetLevel::Other(label) => f.write_str(label),
        }
    }
}

/// Parse an optional level where an empty string means "not assigned"
pub fn parse_target_level(s: &str) -> Option<TargetLevel> {
    let s = s.trim();
    if s.is_empty() {
        None
    } else {
        Some(
            s.parse::<Asil>()
                .map(TargetLevel::Asil)
                .unwrap_or_else(|_| TargetLevel::Other(s.to_string())),
        )
    }
}
