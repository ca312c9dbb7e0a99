//! Serialize entries into length-bounded summon commands.
//!
//! Each entry becomes one passenger fragment. Fragments are packed in order
//! into commands that stay under a maximum length:
//!
//! ```text
//! summon block_display ~ ~ ~ {Passengers:[{id:"minecraft:block_display",...},...]}
//! ```

use serde::Serialize;
use std::collections::HashMap;

use crate::format::format_float;
use crate::grid::ColorLabel;
use crate::transform::Entry;

/// Wrapping syntax of a command and of each entry in it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    /// Text every command starts with
    pub open: String,
    /// Text every command ends with
    pub close: String,
}

impl Envelope {
    /// One `block_display` entity carrying the blocks as passengers.
    pub fn block_display() -> Self {
        Self {
            open: "summon block_display ~ ~ ~ {Passengers:[".to_string(),
            close: "]}".to_string(),
        }
    }

    /// Serialized passenger for one entry, trailing separator included.
    pub fn fragment(&self, entry: &Entry) -> String {
        let components: Vec<String> =
            entry.transform.to_row_major().iter().map(|&v| format_float(v)).collect();
        format!(
            "{{id:\"minecraft:block_display\",block_state:{{Name:\"{}\",Properties:{{}}}},transformation:[{}]}},",
            entry.label,
            components.join(",")
        )
    }
}

impl Default for Envelope {
    fn default() -> Self {
        Self::block_display()
    }
}

/// Upper bound on command length, in characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MaxLength {
    /// Everything goes in one command
    #[default]
    Unbounded,
    /// A new command starts once `current + fragment >= limit`
    Limit(usize),
}

impl MaxLength {
    /// Settings value: `-1` is unbounded, positive values are limits.
    /// Zero and other negatives are rejected.
    pub fn from_setting(value: i64) -> Option<Self> {
        match value {
            -1 => Some(MaxLength::Unbounded),
            n if n > 0 => Some(MaxLength::Limit(n as usize)),
            _ => None,
        }
    }
}

/// Per-label entry counts, most used first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UsageSummary {
    pub counts: Vec<(ColorLabel, usize)>,
}

impl UsageSummary {
    /// Count labels across `entries`. Equal counts keep first-seen order.
    pub fn from_entries(entries: &[Entry]) -> Self {
        let mut counts: Vec<(ColorLabel, usize)> = Vec::new();
        let mut index: HashMap<&ColorLabel, usize> = HashMap::new();

        for entry in entries {
            match index.get(&entry.label) {
                Some(&i) => counts[i].1 += 1,
                None => {
                    index.insert(&entry.label, counts.len());
                    counts.push((entry.label.clone(), 1));
                }
            }
        }

        // Stable sort keeps first-seen order among ties
        counts.sort_by(|a, b| b.1.cmp(&a.1));
        Self { counts }
    }

    pub fn total(&self) -> usize {
        self.counts.iter().map(|(_, n)| n).sum()
    }

    pub fn get(&self, label: &str) -> Option<usize> {
        self.counts.iter().find(|(l, _)| l.as_str() == label).map(|(_, n)| *n)
    }

    /// Report lines `white_concrete: x12`, namespace stripped.
    pub fn report_lines(&self) -> Vec<String> {
        self.counts.iter().map(|(label, n)| format!("{}: x{}", label.display_name(), n)).collect()
    }
}

/// Commands in order plus label usage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Batch {
    pub commands: Vec<String>,
    pub usage: UsageSummary,
}

/// Pack already-serialized fragments into commands.
///
/// The first fragment after a split is added unconditionally, so a single
/// fragment longer than the limit produces one oversized command. The
/// opening buffer gets no such exemption and may be flushed empty.
pub fn pack_fragments<I, S>(fragments: I, envelope: &Envelope, max_length: MaxLength) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let open_len = envelope.open.chars().count();
    let mut commands = Vec::new();
    let mut current = envelope.open.clone();
    let mut current_len = open_len;

    for fragment in fragments {
        let fragment = fragment.as_ref();
        let fragment_len = fragment.chars().count();

        let overflows = match max_length {
            MaxLength::Unbounded => false,
            MaxLength::Limit(limit) => current_len + fragment_len >= limit,
        };

        if overflows {
            current.push_str(&envelope.close);
            commands.push(std::mem::replace(&mut current, envelope.open.clone()));
            current_len = open_len;
        }

        current.push_str(fragment);
        current_len += fragment_len;
    }

    current.push_str(&envelope.close);
    commands.push(current);
    commands
}

/// Serialize `entries` into commands and tabulate label usage.
pub fn batch_entries(entries: &[Entry], envelope: &Envelope, max_length: MaxLength) -> Batch {
    let fragments = entries.iter().map(|entry| envelope.fragment(entry));
    Batch {
        commands: pack_fragments(fragments, envelope, max_length),
        usage: UsageSummary::from_entries(entries),
    }
}
