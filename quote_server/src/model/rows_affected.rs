use std::fmt;

/// Row count reported by a completed insert, used only for the request log line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowsAffected {
    pub quantity: u64,
}

impl RowsAffected {
    pub fn new(quantity: u64) -> Self {
        Self { quantity }
    }

    /// `"row"` for zero or one, `"rows"` otherwise.
    pub fn label(&self) -> &'static str {
        if self.quantity > 1 { "rows" } else { "row" }
    }
}

impl fmt::Display for RowsAffected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}) {}", self.quantity, self.label())
    }
}
