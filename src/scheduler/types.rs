/*!
 * Scheduler Types
 * Policy selection, queue tiers, and completion accounting
 */

use crate::core::limits::{HIGH_TIER_THRESHOLD, MEDIUM_TIER_THRESHOLD};
use crate::core::types::{Pid, Priority, Tick};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Which scheduling policy drives the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PolicyKind {
    /// Single FIFO queue with a fixed time quantum
    RoundRobin,
    /// Three strict-priority FIFO tiers
    MultilevelQueue,
}

impl PolicyKind {
    /// Parse from string representation
    pub fn from_str(s: &str) -> Result<Self, String> {
        match s.trim().to_lowercase().as_str() {
            "round_robin" | "roundrobin" | "rr" => Ok(Self::RoundRobin),
            "multilevel_queue" | "multilevel" | "mlq" => Ok(Self::MultilevelQueue),
            _ => Err(format!(
                "Invalid policy '{}'. Valid: round_robin, multilevel_queue",
                s
            )),
        }
    }

    #[inline(always)]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::RoundRobin => "round_robin",
            Self::MultilevelQueue => "multilevel_queue",
        }
    }
}

impl fmt::Display for PolicyKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for PolicyKind {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for PolicyKind {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::from_str(&s).map_err(serde::de::Error::custom)
    }
}

/// Multilevel queue tier, fixed at first admission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    Low,
    Medium,
    High,
}

impl Tier {
    /// Dispatch order: High drains before Medium before Low
    pub const DISPATCH_ORDER: [Tier; 3] = [Tier::High, Tier::Medium, Tier::Low];

    #[inline]
    pub const fn from_priority(priority: Priority) -> Self {
        if priority >= HIGH_TIER_THRESHOLD {
            Tier::High
        } else if priority >= MEDIUM_TIER_THRESHOLD {
            Tier::Medium
        } else {
            Tier::Low
        }
    }

    /// A priority that lands in this tier, for front ends offering a tier choice
    pub const fn representative_priority(&self) -> Priority {
        match self {
            Tier::Low => 1,
            Tier::Medium => 5,
            Tier::High => 9,
        }
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            Tier::Low => "Low",
            Tier::Medium => "Medium",
            Tier::High => "High",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One finished process, recorded by the policy in finish order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionRecord {
    pub pid: Pid,
    pub arrival: Tick,
    pub burst: u32,
    pub finish: Tick,
}

impl CompletionRecord {
    pub fn turnaround(&self) -> Tick {
        self.finish.saturating_sub(self.arrival)
    }

    pub fn waiting(&self) -> Tick {
        self.turnaround().saturating_sub(Tick::from(self.burst))
    }
}

/// Aggregated turnaround and waiting figures
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchedulingReport {
    pub policy: String,
    pub completed: Vec<CompletionRecord>,
    pub average_turnaround: f64,
    pub average_waiting: f64,
}

impl SchedulingReport {
    pub fn new(policy: impl Into<String>, completed: Vec<CompletionRecord>) -> Self {
        let (average_turnaround, average_waiting) = if completed.is_empty() {
            (0.0, 0.0)
        } else {
            let n = completed.len() as f64;
            let turnaround: Tick = completed.iter().map(CompletionRecord::turnaround).sum();
            let waiting: Tick = completed.iter().map(CompletionRecord::waiting).sum();
            (turnaround as f64 / n, waiting as f64 / n)
        };

        Self {
            policy: policy.into(),
            completed,
            average_turnaround,
            average_waiting,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.completed.is_empty()
    }
}

impl fmt::Display for SchedulingReport {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "{}", self.policy)?;
        writeln!(
            f,
            "{:>5} {:>8} {:>6} {:>7} {:>11} {:>8}",
            "PID", "Arrival", "Burst", "Finish", "Turnaround", "Waiting"
        )?;
        for r in &self.completed {
            writeln!(
                f,
                "{:>5} {:>8} {:>6} {:>7} {:>11} {:>8}",
                r.pid,
                r.arrival,
                r.burst,
                r.finish,
                r.turnaround(),
                r.waiting()
            )?;
        }
        write!(
            f,
            "Average turnaround: {:.2} | Average waiting: {:.2}",
            self.average_turnaround, self.average_waiting
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_parse() {
        assert_eq!(PolicyKind::from_str("RR"), Ok(PolicyKind::RoundRobin));
        assert_eq!(PolicyKind::from_str("mlq"), Ok(PolicyKind::MultilevelQueue));
        assert_eq!(
            PolicyKind::from_str(" multilevel "),
            Ok(PolicyKind::MultilevelQueue)
        );
        assert!(PolicyKind::from_str("fifo").is_err());
    }

    #[test]
    fn test_policy_serde() {
        let json = serde_json::to_string(&PolicyKind::MultilevelQueue).unwrap();
        assert_eq!(json, "\"multilevel_queue\"");
        let back: PolicyKind = serde_json::from_str("\"rr\"").unwrap();
        assert_eq!(back, PolicyKind::RoundRobin);
    }

    #[test]
    fn test_tier_thresholds() {
        assert_eq!(Tier::from_priority(9), Tier::High);
        assert_eq!(Tier::from_priority(7), Tier::High);
        assert_eq!(Tier::from_priority(6), Tier::Medium);
        assert_eq!(Tier::from_priority(4), Tier::Medium);
        assert_eq!(Tier::from_priority(3), Tier::Low);
        assert_eq!(Tier::from_priority(0), Tier::Low);
    }

    #[test]
    fn test_representative_priority_round_trips() {
        for tier in Tier::DISPATCH_ORDER {
            assert_eq!(Tier::from_priority(tier.representative_priority()), tier);
        }
    }

    #[test]
    fn test_completion_figures() {
        let r = CompletionRecord {
            pid: 1,
            arrival: 2,
            burst: 3,
            finish: 10,
        };
        assert_eq!(r.turnaround(), 8);
        assert_eq!(r.waiting(), 5);
    }

    #[test]
    fn test_report_averages() {
        let report = SchedulingReport::new(
            "Round Robin (quantum=2)",
            vec![
                CompletionRecord { pid: 1, arrival: 0, burst: 2, finish: 2 },
                CompletionRecord { pid: 2, arrival: 0, burst: 2, finish: 4 },
            ],
        );
        assert_eq!(report.average_turnaround, 3.0);
        assert_eq!(report.average_waiting, 1.0);
        assert!(SchedulingReport::new("x", vec![]).is_empty());
    }
}
