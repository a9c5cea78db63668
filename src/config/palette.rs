//! Reaction emoji palette.

use rand::Rng;
use rand::seq::SliceRandom;

/// Emoji accepted by Telegram as standard message reactions.
pub const EMOJIS: &[&str] = &[
    "❤️", "👍", "🔥", "🥰", "👏", "😁", "🤔", "🤯", "😱", "🤬", "😢", "🎉",
    "🤩", "🤮", "💩", "🙏", "👌", "🕊️", "🤡", "🥱", "🥴", "😍", "🐳", "❤️‍🔥",
    "🌚", "🌭", "💯", "🤣", "⚡", "🍌", "🏆", "💔", "🤨", "😐", "🍓", "🍾",
    "💋", "🖕", "😈", "😴", "😭", "🤓", "👻", "👨‍💻", "👀", "🎃", "🙈", "😇",
    "😨", "🤝", "✍️", "🤗", "🫡", "🎅", "🎄", "☃️", "💅", "🤪", "🗿", "🆒",
    "💘", "🙉", "🦄", "😘", "💊", "🙊", "😎", "👾", "🤷‍♂️", "🤷", "🤷‍♀️", "😡",
];

/// Read-only set of emoji to draw reactions from.
#[derive(Debug, Clone, Copy)]
pub struct EmojiPalette {
    emojis: &'static [&'static str],
}

impl Default for EmojiPalette {
    fn default() -> Self {
        Self { emojis: EMOJIS }
    }
}

impl EmojiPalette {
    /// Draws one emoji uniformly at random.
    pub fn choose<R: Rng + ?Sized>(&self, rng: &mut R) -> &'static str {
        self.emojis.choose(rng).copied().unwrap_or("👍")
    }

    /// Checks whether `emoji` belongs to this palette.
    #[must_use]
    pub fn contains(&self, emoji: &str) -> bool {
        self.emojis.contains(&emoji)
    }

    /// Number of emoji in the palette.
    #[must_use]
    pub fn len(&self) -> usize {
        self.emojis.len()
    }

    /// Returns `true` if the palette has no emoji.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.emojis.is_empty()
    }
}
