//! Welcome message sent in reply to `/start`.

use crate::config::WelcomeLinks;
use crate::telegram::{
    AccountIdentity, InlineKeyboardButton, InlineKeyboardMarkup, OutgoingMessage, ParseMode,
};

const WELCOME_TEXT: &str = "👋 Hey there! I'm <b>ReactionBot</b>.\n\n\
    I automatically react to messages in your group with fun and random emojis like ❤️🔥🎉👌.\n\
    Just add me to your group and enjoy the reactions!\n\
    P.S. I work best when I have a little admin magic 😉";

/// Builds the welcome reply for one chat.
#[derive(Debug, Clone)]
pub struct WelcomeMessage {
    links: WelcomeLinks,
}

impl WelcomeMessage {
    #[must_use]
    pub const fn new(links: WelcomeLinks) -> Self {
        Self { links }
    }

    /// Welcome text with "Updates", "Support" and "Add Me To Your Group" buttons.
    #[must_use]
    pub fn render(&self, chat_id: i64, identity: &AccountIdentity) -> OutgoingMessage {
        OutgoingMessage {
            chat_id,
            text: WELCOME_TEXT.to_owned(),
            parse_mode: ParseMode::Html,
            reply_markup: InlineKeyboardMarkup {
                inline_keyboard: vec![
                    vec![
                        InlineKeyboardButton::link("Updates", &self.links.channel_url),
                        InlineKeyboardButton::link("Support", &self.links.group_url),
                    ],
                    vec![InlineKeyboardButton::link(
                        "Add Me To Your Group",
                        add_to_group_url(identity),
                    )],
                ],
            },
        }
    }
}

/// Deep link that opens the "add to group" picker for the bot.
fn add_to_group_url(identity: &AccountIdentity) -> String {
    format!("https://t.me/{}?startgroup=true", identity.username)
}
