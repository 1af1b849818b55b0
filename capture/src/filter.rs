//! Name-based capture filters.
//!
//! A filter string is a whitespace-separated list of names. `!Name` excludes
//! entries carrying that name; a bare `Name` restricts the view to entries
//! carrying at least one listed name. Matching ignores ASCII case.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// High-rate messages hidden from the default view.
pub const DEFAULT_FILTER: &str = "!StartPingCheck !CompletePingCheck !PacketAck \
    !SimulatorViewerTimeMessage !SimStats !AgentUpdate !AgentAnimation !AvatarAnimation \
    !ViewerEffect !CoarseLocationUpdate !LayerData !CameraConstraint !ObjectUpdateCached \
    !RequestMultipleObjects !ObjectUpdate !ObjectUpdateCompressed !ImprovedTerseObjectUpdate \
    !KillObject !ImagePacket !SendXferPacket !ConfirmXferPacket !TransferPacket !SoundTrigger \
    !AttachedSound !PreloadSound !ViewerAsset";

/// A parsed filter: included and excluded names, lower-cased.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSpec {
    include: BTreeSet<String>,
    exclude: BTreeSet<String>,
}

impl FilterSpec {
    /// Parses a filter string. Unknown names are fine; a lone `!` is ignored.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        let mut spec = Self::default();
        for token in text.split_whitespace() {
            match token.strip_prefix('!') {
                Some("") => {}
                Some(name) => {
                    spec.exclude.insert(name.to_ascii_lowercase());
                }
                None => {
                    spec.include.insert(token.to_ascii_lowercase());
                }
            }
        }
        spec
    }

    /// The filter used when none is configured.
    #[must_use]
    pub fn default_view() -> Self {
        Self::parse(DEFAULT_FILTER)
    }

    /// Returns `true` when the filter accepts everything.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.include.is_empty() && self.exclude.is_empty()
    }

    /// Decides whether an entry carrying `names` passes.
    ///
    /// Exclusion wins over inclusion; with no inclusions every
    /// non-excluded entry passes.
    pub fn accepts<I, S>(&self, names: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut included = self.include.is_empty();
        for name in names {
            let name = name.as_ref().to_ascii_lowercase();
            if self.exclude.contains(&name) {
                return false;
            }
            included |= self.include.contains(&name);
        }
        included
    }

    /// Keeps the items whose names pass, preserving order.
    pub fn apply<'a, T, F, N>(&self, items: &'a [T], mut names: F) -> Vec<&'a T>
    where
        F: FnMut(&T) -> N,
        N: IntoIterator,
        N::Item: AsRef<str>,
    {
        items.iter().filter(|item| self.accepts(names(*item))).collect()
    }
}

impl FromStr for FilterSpec {
    type Err = std::convert::Infallible;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(text))
    }
}

impl fmt::Display for FilterSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        let tokens = self
            .exclude
            .iter()
            .map(|name| format!("!{name}"))
            .chain(self.include.iter().cloned());
        for token in tokens {
            if !first {
                f.write_str(" ")?;
            }
            f.write_str(&token)?;
            first = false;
        }
        Ok(())
    }
}
