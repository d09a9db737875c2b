/// Commands exposed to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StickerCommand {
    /// Download images from the current or replied-to message.
    AddSticker,
    /// Report count, size and recent additions.
    ListStickers,
    /// Delete the whole collection.
    ClearStickers,
    /// Send one sticker at random.
    RandomSticker,
}

impl StickerCommand {
    /// Every command, in help order.
    pub const ALL: [Self; 4] = [
        Self::AddSticker,
        Self::ListStickers,
        Self::ClearStickers,
        Self::RandomSticker,
    ];

    /// Primary chat literal.
    #[must_use]
    pub const fn literal(self) -> &'static str {
        match self {
            Self::AddSticker => "添加表情包",
            Self::ListStickers => "表情包列表",
            Self::ClearStickers => "清理表情包",
            Self::RandomSticker => "随机表情包",
        }
    }

    /// ASCII alias accepted alongside the literal.
    #[must_use]
    pub const fn alias(self) -> &'static str {
        match self {
            Self::AddSticker => "add-sticker",
            Self::ListStickers => "list-stickers",
            Self::ClearStickers => "clear-stickers",
            Self::RandomSticker => "random-sticker",
        }
    }

    /// Whether only administrators may run the command.
    #[must_use]
    pub const fn requires_admin(self) -> bool {
        matches!(self, Self::ClearStickers)
    }
}

impl std::fmt::Display for StickerCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.alias())
    }
}

/// Maps command strings to commands.
pub struct CommandRegistry {
    bindings: Vec<(&'static str, StickerCommand)>,
}

impl Default for CommandRegistry {
    fn default() -> Self {
        let mut bindings = Vec::new();

        let mut register = |command: StickerCommand| {
            bindings.push((command.literal(), command));
            bindings.push((command.alias(), command));
        };

        for command in StickerCommand::ALL {
            register(command);
        }

        Self { bindings }
    }
}

impl CommandRegistry {
    /// Resolves message text to a command.
    ///
    /// The text may start with `/` and the command word must be followed by
    /// whitespace or the end of the text.
    #[must_use]
    pub fn resolve(&self, text: &str) -> Option<StickerCommand> {
        let text = text.trim();
        let text = text.strip_prefix('/').unwrap_or(text);

        self.bindings.iter().find_map(|(word, command)| {
            let rest = text.strip_prefix(word)?;
            (rest.is_empty() || rest.starts_with(char::is_whitespace)).then_some(*command)
        })
    }
}
