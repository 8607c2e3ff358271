use crossterm::event::Event as CrossTermEvent;
use crossterm::event::KeyCode;
use crossterm::event::KeyEvent;
use crossterm::event::KeyEventKind;
use crossterm::event::KeyModifiers;

use crate::driver::Control;

/// Converts a crossterm event into a request for the simulation loop.
///
/// `q`, `Esc` and `Ctrl-C` quit. Everything else, key releases included, is ignored.
pub fn convert_event(event: CrossTermEvent) -> Option<Control> {
    let CrossTermEvent::Key(key_event) = event else {
        return None;
    };

    if key_event.kind == KeyEventKind::Release {
        return None;
    }

    match key_event {
        KeyEvent {
            code: KeyCode::Char('q') | KeyCode::Esc,
            ..
        }
        | KeyEvent {
            code: KeyCode::Char('c'),
            modifiers: KeyModifiers::CONTROL,
            ..
        } => Some(Control::Quit),
        _ => None,
    }
}

#[cfg(test)]
mod test {
    use crossterm::event::Event;
    use crossterm::event::KeyCode;
    use crossterm::event::KeyEvent;
    use crossterm::event::KeyEventKind;
    use crossterm::event::KeyModifiers;

    use super::convert_event;
    use crate::driver::Control;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> Event {
        Event::Key(KeyEvent::new(code, modifiers))
    }

    #[test]
    fn quit_keys() {
        let quits = [
            key(KeyCode::Char('q'), KeyModifiers::NONE),
            key(KeyCode::Esc, KeyModifiers::NONE),
            key(KeyCode::Char('c'), KeyModifiers::CONTROL),
        ];

        for event in quits {
            assert_eq!(convert_event(event.clone()), Some(Control::Quit), "{event:?}");
        }
    }

    #[test]
    fn other_events() {
        assert_eq!(convert_event(key(KeyCode::Char('c'), KeyModifiers::NONE)), None);
        assert_eq!(convert_event(key(KeyCode::Enter, KeyModifiers::NONE)), None);
        assert_eq!(convert_event(Event::Resize(80, 24)), None);

        let release = KeyEvent::new_with_kind(
            KeyCode::Char('q'),
            KeyModifiers::NONE,
            KeyEventKind::Release,
        );
        assert_eq!(convert_event(Event::Key(release)), None);
    }
}
