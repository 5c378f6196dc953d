//! Interned point names.
//!
//! Widgets name their points (`origin`, `a`, `sum`, ...) so tests, logs and
//! readouts can refer to them. Names are interned once into a process-wide
//! table; every widget reuses the same handful of strings.

use lasso::{Spur, ThreadedRodeo};
use std::fmt;
use std::sync::LazyLock;

static NAMES: LazyLock<ThreadedRodeo> = LazyLock::new(ThreadedRodeo::default);

/// Name of an observable point: a 4-byte `Spur`, compared in O(1).
///
/// Unique within one `PointGraph`; different widgets reuse the same names.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct PointId(Spur);

impl PointId {
    /// Intern `name`, reusing the existing entry if there is one.
    pub fn intern(name: &str) -> Self {
        PointId(NAMES.get_or_intern(name))
    }

    /// The id for `name` if it was ever interned. Never grows the table.
    pub fn lookup(name: &str) -> Option<Self> {
        NAMES.get(name).map(PointId)
    }

    pub fn as_str(&self) -> &'static str {
        NAMES.resolve(&self.0)
    }
}

impl fmt::Debug for PointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PointId({})", self.as_str())
    }
}

impl fmt::Display for PointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_name_same_id() {
        let a = PointId::intern("sum");
        assert_eq!(a, PointId::intern("sum"));
        assert_eq!(a.to_string(), "sum");
        assert_eq!(format!("{a:?}"), "PointId(sum)");
    }

    #[test]
    fn lookup_does_not_intern() {
        assert_eq!(PointId::lookup("id_never_interned"), None);
        let tip = PointId::intern("id_tip");
        assert_eq!(PointId::lookup("id_tip"), Some(tip));
    }
}
