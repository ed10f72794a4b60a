use std::collections::BTreeSet;

/// Item numbers in scope and the one the user last picked.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct Selection {
    scoped: BTreeSet<i64>,
    active: Option<i64>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_parts(scoped: impl IntoIterator<Item = i64>, active: Option<i64>) -> Self {
        Self {
            scoped: scoped.into_iter().collect(),
            active,
        }
    }

    pub fn scoped(&self) -> &BTreeSet<i64> {
        &self.scoped
    }

    pub fn active(&self) -> Option<i64> {
        self.active
    }

    pub fn set_active(&mut self, active: Option<i64>) {
        self.active = active;
    }

    pub fn is_scoped(&self, item_no: Option<i64>) -> bool {
        item_no.is_some_and(|id| self.scoped.contains(&id))
    }

    /// Active implies scoped: a picked item outside the scope set is not highlighted.
    pub fn is_active(&self, item_no: Option<i64>) -> bool {
        self.is_scoped(item_no) && item_no == self.active
    }
}
