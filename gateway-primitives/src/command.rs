//! Typed automation steps and the macro request that groups them.

use serde::Serialize;

/// A single automation instruction within a macro.
///
/// Commands are immutable once built. Semantic validation (known actions,
/// pointer buttons, key names) belongs to the execution engine; construction
/// never fails.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Command {
    action: String,
    x: i32,
    y: i32,
    text: Option<String>,
    key: Option<String>,
    button: Option<String>,
    clicks: i32,
    duration: i32,
    scroll_direction: Option<String>,
    filename: Option<String>,
    window_id: i32,
    window_name: Option<String>,
    modifiers: Vec<String>,
}

impl Command {
    /// Starts building a command for the supplied action tag.
    #[must_use]
    pub fn builder(action: impl Into<String>) -> CommandBuilder {
        CommandBuilder {
            command: Self {
                action: action.into(),
                ..Self::default()
            },
        }
    }

    /// Action tag identifying the operation. Empty when the request omitted it.
    #[must_use]
    pub fn action(&self) -> &str {
        &self.action
    }

    /// Horizontal coordinate.
    #[must_use]
    pub const fn x(&self) -> i32 {
        self.x
    }

    /// Vertical coordinate.
    #[must_use]
    pub const fn y(&self) -> i32 {
        self.y
    }

    /// Text payload for typed input.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// Key for single key actions.
    #[must_use]
    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    /// Pointer button.
    #[must_use]
    pub fn button(&self) -> Option<&str> {
        self.button.as_deref()
    }

    /// Repeat count.
    #[must_use]
    pub const fn clicks(&self) -> i32 {
        self.clicks
    }

    /// Duration in milliseconds; `0` leaves the meaning to the engine.
    #[must_use]
    pub const fn duration(&self) -> i32 {
        self.duration
    }

    /// Scroll direction.
    #[must_use]
    pub fn scroll_direction(&self) -> Option<&str> {
        self.scroll_direction.as_deref()
    }

    /// File name for save/load style actions.
    #[must_use]
    pub fn filename(&self) -> Option<&str> {
        self.filename.as_deref()
    }

    /// Native window handle.
    #[must_use]
    pub const fn window_id(&self) -> i32 {
        self.window_id
    }

    /// Window title.
    #[must_use]
    pub fn window_name(&self) -> Option<&str> {
        self.window_name.as_deref()
    }

    /// Modifier keys held during the action, in order.
    #[must_use]
    pub fn modifiers(&self) -> &[String] {
        &self.modifiers
    }
}

impl Default for Command {
    fn default() -> Self {
        Self {
            action: String::new(),
            x: 0,
            y: 0,
            text: None,
            key: None,
            button: None,
            clicks: 1,
            duration: 0,
            scroll_direction: None,
            filename: None,
            window_id: 0,
            window_name: None,
            modifiers: Vec::new(),
        }
    }
}

/// Builder for [`Command`].
#[derive(Debug, Clone)]
pub struct CommandBuilder {
    command: Command,
}

impl CommandBuilder {
    /// Sets both coordinates.
    #[must_use]
    pub fn position(mut self, x: i32, y: i32) -> Self {
        self.command.x = x;
        self.command.y = y;
        self
    }

    /// Sets the text payload.
    #[must_use]
    pub fn text(mut self, text: Option<String>) -> Self {
        self.command.text = text;
        self
    }

    /// Sets the key name.
    #[must_use]
    pub fn key(mut self, key: Option<String>) -> Self {
        self.command.key = key;
        self
    }

    /// Sets the pointer button.
    #[must_use]
    pub fn button(mut self, button: Option<String>) -> Self {
        self.command.button = button;
        self
    }

    /// Sets the repeat count.
    #[must_use]
    pub fn clicks(mut self, clicks: i32) -> Self {
        self.command.clicks = clicks;
        self
    }

    /// Sets the duration in milliseconds.
    #[must_use]
    pub fn duration(mut self, duration: i32) -> Self {
        self.command.duration = duration;
        self
    }

    /// Sets the scroll direction.
    #[must_use]
    pub fn scroll_direction(mut self, direction: Option<String>) -> Self {
        self.command.scroll_direction = direction;
        self
    }

    /// Sets the file name.
    #[must_use]
    pub fn filename(mut self, filename: Option<String>) -> Self {
        self.command.filename = filename;
        self
    }

    /// Sets the window handle.
    #[must_use]
    pub fn window_id(mut self, window_id: i32) -> Self {
        self.command.window_id = window_id;
        self
    }

    /// Sets the window title.
    #[must_use]
    pub fn window_name(mut self, window_name: Option<String>) -> Self {
        self.command.window_name = window_name;
        self
    }

    /// Replaces the modifier list.
    #[must_use]
    pub fn modifiers(mut self, modifiers: Vec<String>) -> Self {
        self.command.modifiers = modifiers;
        self
    }

    /// Finalises the command.
    #[must_use]
    pub fn build(self) -> Command {
        self.command
    }
}

/// Ordered commands plus an optional display name, executed as one unit.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct MacroRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    commands: Vec<Command>,
}

impl MacroRequest {
    /// Creates an unnamed macro from the supplied commands.
    #[must_use]
    pub fn new(commands: Vec<Command>) -> Self {
        Self {
            name: None,
            commands,
        }
    }

    /// Sets the display name. Blank names leave the macro unnamed.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        self.name = (!name.trim().is_empty()).then_some(name);
        self
    }

    /// Returns the display name, if any.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Returns the commands in execution order.
    #[must_use]
    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    /// Number of commands submitted.
    #[must_use]
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Returns `true` when the macro carries no commands.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_wire_contract() {
        let command = Command::default();
        assert_eq!(command.action(), "");
        assert_eq!((command.x(), command.y()), (0, 0));
        assert_eq!(command.clicks(), 1);
        assert_eq!(command.duration(), 0);
        assert_eq!(command.window_id(), 0);
        assert!(command.modifiers().is_empty());
        assert!(command.text().is_none());
    }

    #[test]
    fn builder_sets_fields() {
        let command = Command::builder("click")
            .position(10, 20)
            .button(Some("left".into()))
            .clicks(2)
            .modifiers(vec!["ctrl".into()])
            .build();

        assert_eq!(command.action(), "click");
        assert_eq!((command.x(), command.y()), (10, 20));
        assert_eq!(command.button(), Some("left"));
        assert_eq!(command.clicks(), 2);
        assert_eq!(command.modifiers(), ["ctrl"]);
    }

    #[test]
    fn blank_macro_name_is_dropped() {
        let request = MacroRequest::new(vec![Command::default()]).with_name("  ");
        assert_eq!(request.name(), None);
        assert_eq!(request.len(), 1);

        let named = MacroRequest::new(Vec::new()).with_name("login");
        assert_eq!(named.name(), Some("login"));
        assert!(named.is_empty());
    }
}
