// input.rs - Keyboard events to simulation commands

use conway_life::Command;
use egui::{Event, InputState, Key};

pub fn map_key(key: Key) -> Option<Command> {
    match key {
        Key::Q | Key::Escape => Some(Command::Quit),
        Key::R => Some(Command::Reset),
        Key::D => Some(Command::ToggleDebug),
        Key::L => Some(Command::ToggleGridLines),
        Key::N | Key::Space => Some(Command::Step),
        Key::ArrowUp => Some(Command::IncreaseSpeed),
        Key::ArrowDown => Some(Command::DecreaseSpeed),
        _ => None,
    }
}

/// `+`, `=` and `-` arrive as text so they work across keyboard layouts.
pub fn map_text(text: &str) -> Option<Command> {
    match text {
        "+" | "=" => Some(Command::IncreaseSpeed),
        "-" => Some(Command::DecreaseSpeed),
        _ => None,
    }
}

/// Commands in arrival order, each at most once.
pub fn commands_from_events<'a>(events: impl IntoIterator<Item = &'a Event>) -> Vec<Command> {
    let mut out = Vec::new();
    for event in events {
        let command = match event {
            Event::Key { key, pressed: true, repeat: false, .. } => map_key(*key),
            Event::Text(text) => map_text(text),
            _ => None,
        };
        if let Some(command) = command {
            if !out.contains(&command) {
                out.push(command);
            }
        }
    }
    out
}

pub fn collect_commands(input: &InputState) -> Vec<Command> {
    commands_from_events(&input.events)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys() {
        assert_eq!(map_key(Key::Q), Some(Command::Quit));
        assert_eq!(map_key(Key::R), Some(Command::Reset));
        assert_eq!(map_key(Key::D), Some(Command::ToggleDebug));
        assert_eq!(map_key(Key::L), Some(Command::ToggleGridLines));
        assert_eq!(map_key(Key::Space), Some(Command::Step));
        assert_eq!(map_key(Key::X), None);
    }

    #[test]
    fn speed_keys_come_from_text() {
        assert_eq!(map_text("="), Some(Command::IncreaseSpeed));
        assert_eq!(map_text("+"), Some(Command::IncreaseSpeed));
        assert_eq!(map_text("-"), Some(Command::DecreaseSpeed));
        assert_eq!(map_text("q"), None);
    }

    #[test]
    fn each_command_at_most_once_per_frame() {
        let events = [
            Event::Text("=".into()),
            Event::Text("+".into()),
            Event::Text("-".into()),
            Event::Text("=".into()),
        ];
        assert_eq!(
            commands_from_events(&events),
            vec![Command::IncreaseSpeed, Command::DecreaseSpeed]
        );
    }
}
