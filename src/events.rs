use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers, MouseEvent, MouseEventKind};

use crate::app::App;

/// File written by the export key.
pub const EXPORT_PATH: &str = "pulse_export.json";

/// Poll for events with a timeout
pub fn poll_event(timeout: Duration) -> Result<Option<Event>> {
    if event::poll(timeout)? {
        Ok(Some(event::read()?))
    } else {
        Ok(None)
    }
}

/// Handle a key event
pub fn handle_key_event(app: &mut App, key: KeyEvent) {
    // If help is shown, any key closes it
    if app.show_help {
        app.show_help = false;
        return;
    }

    match key.code {
        KeyCode::Char('q') => app.quit(),
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => app.quit(),

        KeyCode::Esc => app.close_overlay(),

        KeyCode::Char('r') => {
            if !app.force_reload() {
                if let Some(err) = app.load_error.clone() {
                    app.set_status_message(format!("Refresh failed: {}", err));
                }
            }
        }

        KeyCode::Char('?') => app.toggle_help(),

        KeyCode::Char('e') => {
            let export_path = PathBuf::from(EXPORT_PATH);
            match app.export_state(&export_path) {
                Ok(()) => {
                    app.set_status_message(format!("Exported to {}", export_path.display()));
                }
                Err(e) => {
                    app.set_status_message(format!("Export failed: {}", e));
                }
            }
        }

        _ => {}
    }
}

/// Handle mouse events
///
/// Pointer motion drives the hover overlay. Terminals only report motion
/// while mouse capture is enabled.
pub fn handle_mouse_event(app: &mut App, mouse: MouseEvent, now: Instant) {
    match mouse.kind {
        MouseEventKind::Moved | MouseEventKind::Drag(_) => {
            app.hover_at(mouse.column, mouse.row, now);
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{Board, Renderer};
    use crate::source::ChannelSource;
    use crossterm::event::{KeyEventKind, KeyEventState};
    use ratatui::layout::Rect;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    fn moved(column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind: MouseEventKind::Moved,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    fn app() -> App {
        let (_tx, source) = ChannelSource::create("test");
        let mut app = App::new(Box::new(source), Renderer::default(), Board::fixed(["cpu"]));
        app.viewport = Rect::new(0, 1, 100, 30);
        app.tile_areas = vec![("cpu".to_string(), Rect::new(0, 1, 28, 7))];
        app
    }

    #[test]
    fn test_quit_and_help() {
        let mut app = app();

        handle_key_event(&mut app, key(KeyCode::Char('?')));
        assert!(app.show_help);

        // Any key closes help without acting
        handle_key_event(&mut app, key(KeyCode::Char('q')));
        assert!(!app.show_help);
        assert!(app.running);

        handle_key_event(&mut app, key(KeyCode::Char('q')));
        assert!(!app.running);
    }

    #[test]
    fn test_mouse_motion_opens_overlay_and_esc_closes() {
        let mut app = app();
        let t0 = Instant::now();

        handle_mouse_event(&mut app, moved(3, 3), t0);
        app.tick(t0 + Duration::from_millis(500));
        assert_eq!(app.hover.overlay_count(), 1);

        handle_key_event(&mut app, key(KeyCode::Esc));
        assert_eq!(app.hover.overlay_count(), 0);
        assert!(app.overlay_graph.is_none());
    }

    #[test]
    fn test_mouse_leaving_tiles_cancels_hover() {
        let mut app = app();
        let t0 = Instant::now();

        handle_mouse_event(&mut app, moved(3, 3), t0);
        handle_mouse_event(&mut app, moved(90, 20), t0 + Duration::from_millis(100));
        app.tick(t0 + Duration::from_millis(800));

        assert_eq!(app.hover.overlay_count(), 0);
    }
}
