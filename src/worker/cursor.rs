//! Per-account update cursor.

use crate::telegram::InboundUpdate;

/// Offset acknowledging consumed updates to the remote queue.
///
/// Starts absent, meaning "from the beginning of the queue", and only moves
/// forward.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpdateCursor(Option<i64>);

impl UpdateCursor {
    /// A cursor that has not acknowledged anything yet.
    #[must_use]
    pub const fn start() -> Self {
        Self(None)
    }

    /// Value to send as `offset`, if any.
    #[must_use]
    pub const fn offset(&self) -> Option<i64> {
        self.0
    }

    /// Cursor after consuming `updates`: one past the highest update id.
    ///
    /// An empty batch, or one whose ids are all behind the cursor, leaves
    /// it unchanged.
    #[must_use]
    pub fn advance(self, updates: &[InboundUpdate]) -> Self {
        let Some(highest) = updates.iter().map(|u| u.update_id).max() else {
            return self;
        };
        let next = highest.saturating_add(1);
        match self.0 {
            Some(current) if current >= next => self,
            _ => Self(Some(next)),
        }
    }
}

impl std::fmt::Display for UpdateCursor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.0 {
            Some(offset) => write!(f, "{offset}"),
            None => f.write_str("start"),
        }
    }
}
