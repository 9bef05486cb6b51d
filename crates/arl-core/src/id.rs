//! Label identifiers.
//!
//! Labels are addressed by string ids: assigned by the persistence service
//! for fetched content, minted locally for labels created in edit mode.
//! Every pointer event and store mutation is routed by id, so ids are
//! interned once and handled as a small `Copy` index afterwards — comparing
//! two of them is an integer compare, not a string walk.

use lasso::{Spur, ThreadedRodeo};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::sync::LazyLock;
use std::sync::atomic::{AtomicU64, Ordering};

static IDS: LazyLock<ThreadedRodeo> = LazyLock::new(ThreadedRodeo::default);

/// Interned handle for one label's wire id.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct LabelId(Spur);

impl LabelId {
    pub fn intern(s: &str) -> Self {
        LabelId(IDS.get_or_intern(s))
    }

    pub fn as_str(&self) -> &str {
        IDS.resolve(&self.0)
    }

    /// Mint an id for a label created in this session. The service keeps
    /// whatever id the next PUT carries, so a locally minted id only has to
    /// be unique within the process.
    pub fn fresh() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        let n = NEXT.fetch_add(1, Ordering::Relaxed);
        Self::intern(&format!("local-{n}"))
    }
}

impl fmt::Display for LabelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Debug for LabelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LabelId({})", self.as_str())
    }
}

// On the wire an id is nothing but its string.

impl Serialize for LabelId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for LabelId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(|s| Self::intern(&s))
    }
}
