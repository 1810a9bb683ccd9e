use crate::entity::{Direction, Position};
use crate::game::GameState;
use crate::renderer::{Input, Renderer, Snapshot};
use crossterm::{
    cursor,
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, ClearType},
};
use std::collections::VecDeque;
use std::io::{self, Write};
use std::time::{Duration, Instant};

pub struct CliRenderer {
    last_render: Instant,
    target_frame_time: Duration,
    /// Whether the terminal reports key releases. Without them every press
    /// is followed by a synthetic release and the terminal's own autorepeat
    /// drives held keys.
    release_events: bool,
    pending: VecDeque<Input>,
    last_state: Option<GameState>,
}

impl CliRenderer {
    pub fn new() -> Self {
        Self {
            last_render: Instant::now(),
            // Target 60 FPS so move animations stay smooth
            target_frame_time: Duration::from_millis(16),
            release_events: false,
            pending: VecDeque::new(),
            last_state: None,
        }
    }

    fn draw_cell(&self, snapshot: &Snapshot, pos: Position, stdout: &mut io::Stdout) -> io::Result<()> {
        let (bg, fg, glyph) = if pos == snapshot.player {
            (Color::Blue, Color::White, "[]")
        } else if pos == snapshot.pursuer {
            (Color::Red, Color::White, "()")
        } else if snapshot.turrets.iter().any(|t| t.position == pos) {
            let glyph = snapshot
                .turrets
                .iter()
                .find(|t| t.position == pos)
                .map(|t| match t.direction {
                    Direction::Up => "^^",
                    Direction::Down => "vv",
                    Direction::Left => "<<",
                    Direction::Right => ">>",
                })
                .unwrap_or("TT");
            (Color::DarkGrey, Color::White, glyph)
        } else if snapshot.spikes.contains(&pos) {
            (Color::Black, Color::DarkYellow, "/\\")
        } else if pos == snapshot.exit {
            (Color::Green, Color::Black, "  ")
        } else if snapshot.beams.contains(&pos) {
            (Color::Black, Color::Yellow, "::")
        } else {
            (Color::Black, Color::DarkGrey, " .")
        };

        queue!(
            stdout,
            SetBackgroundColor(bg),
            SetForegroundColor(fg),
            Print(glyph)
        )?;
        Ok(())
    }

    fn draw_menu(&self, snapshot: &Snapshot, stdout: &mut io::Stdout) -> io::Result<()> {
        queue!(
            stdout,
            cursor::MoveTo(0, 1),
            SetForegroundColor(Color::Green),
            Print("  ESCAPE FROM DUCK"),
            ResetColor,
            cursor::MoveTo(0, 3),
            Print("  Enter  start game"),
            cursor::MoveTo(0, 4),
            Print("  X      delete saved data"),
            cursor::MoveTo(0, 5),
            Print("  Q      quit"),
        )?;

        let mut row = 7;
        if snapshot.escapes > 0 {
            queue!(
                stdout,
                cursor::MoveTo(0, row),
                Print(format!(
                    "  Escapes: {}   Level: {}",
                    snapshot.escapes, snapshot.level
                ))
            )?;
            row += 2;
        }
        if !snapshot.achievements.is_empty() {
            queue!(
                stdout,
                cursor::MoveTo(0, row),
                SetForegroundColor(Color::Yellow),
                Print("  Achievements:")
            )?;
            for name in &snapshot.achievements {
                row += 1;
                queue!(stdout, cursor::MoveTo(0, row), Print(format!("    {name}")))?;
            }
            queue!(stdout, ResetColor)?;
        }
        Ok(())
    }

    fn draw_info(&self, snapshot: &Snapshot, stdout: &mut io::Stdout) -> io::Result<()> {
        let base = (snapshot.grid_size + 1) as u16;

        queue!(
            stdout,
            cursor::MoveTo(0, base),
            ResetColor,
            terminal::Clear(ClearType::CurrentLine),
            Print(&snapshot.status)
        )?;

        queue!(
            stdout,
            cursor::MoveTo(0, base + 1),
            terminal::Clear(ClearType::CurrentLine)
        )?;
        if let Some(text) = &snapshot.notification {
            queue!(
                stdout,
                SetForegroundColor(Color::Yellow),
                Print(format!("*** {text} ***")),
                ResetColor
            )?;
        }

        let color = match snapshot.state {
            GameState::Won => Color::Green,
            GameState::Lost => Color::Red,
            GameState::Running | GameState::Idle => Color::Reset,
        };
        queue!(
            stdout,
            cursor::MoveTo(0, base + 2),
            SetForegroundColor(color),
            Print("Controls: Arrow Keys / WASD to move | Q to quit"),
            ResetColor
        )?;

        Ok(())
    }

    fn map_key(&self, key: KeyEvent) -> Option<Input> {
        let direction = match key.code {
            KeyCode::Up => Some(Direction::Up),
            KeyCode::Down => Some(Direction::Down),
            KeyCode::Left => Some(Direction::Left),
            KeyCode::Right => Some(Direction::Right),
            KeyCode::Char(c) => Direction::from_key(c).ok(),
            _ => None,
        };

        match key.kind {
            KeyEventKind::Release => return direction.map(Input::Release),
            // Held keys are re-fired by the repeat policy, not the terminal.
            KeyEventKind::Repeat if self.release_events => return None,
            KeyEventKind::Press | KeyEventKind::Repeat => {}
        }

        if let Some(direction) = direction {
            return Some(Input::Direction(direction));
        }

        Some(match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => Input::Quit,
            KeyCode::Char('x') | KeyCode::Char('X') => Input::DeleteData,
            KeyCode::Enter | KeyCode::Char(' ') => Input::Confirm,
            _ => Input::Other,
        })
    }
}

impl Default for CliRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer for CliRenderer {
    fn init(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(
            stdout,
            terminal::EnterAlternateScreen,
            terminal::Clear(ClearType::All),
            cursor::Hide
        )?;

        self.release_events = terminal::supports_keyboard_enhancement().unwrap_or(false);
        if self.release_events {
            execute!(
                stdout,
                PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
            )?;
        }
        tracing::debug!(release_events = self.release_events, "terminal initialized");
        Ok(())
    }

    fn render(&mut self, snapshot: &Snapshot) -> io::Result<()> {
        // Frame rate limiting: skip rendering if not enough time has passed
        if self.last_render.elapsed() < self.target_frame_time {
            return Ok(());
        }

        self.last_render = Instant::now();

        let mut stdout = io::stdout();

        if self.last_state != Some(snapshot.state) {
            queue!(stdout, terminal::Clear(ClearType::All))?;
            self.last_state = Some(snapshot.state);
        }

        queue!(stdout, cursor::MoveTo(0, 0))?;

        if snapshot.state == GameState::Idle {
            self.draw_menu(snapshot, &mut stdout)?;
            stdout.flush()?;
            return Ok(());
        }

        // Draw board
        for y in 0..snapshot.grid_size {
            for x in 0..snapshot.grid_size {
                self.draw_cell(snapshot, Position::new(x, y), &mut stdout)?;
            }
            queue!(stdout, ResetColor, Print("\r\n"))?;
        }

        // Draw info
        self.draw_info(snapshot, &mut stdout)?;

        stdout.flush()?;
        Ok(())
    }

    fn cleanup(&mut self) -> io::Result<()> {
        let mut stdout = io::stdout();
        if self.release_events {
            execute!(stdout, PopKeyboardEnhancementFlags)?;
            self.release_events = false;
        }
        execute!(
            stdout,
            cursor::Show,
            terminal::LeaveAlternateScreen,
            ResetColor
        )?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    fn poll_input(&mut self) -> io::Result<Option<Input>> {
        if let Some(input) = self.pending.pop_front() {
            return Ok(Some(input));
        }
        if event::poll(Duration::from_millis(5))? {
            if let Event::Key(key) = event::read()? {
                let input = self.map_key(key);
                if let (false, Some(Input::Direction(direction))) = (self.release_events, input) {
                    self.pending.push_back(Input::Release(direction));
                }
                return Ok(input);
            }
        }
        Ok(None)
    }
}

impl Drop for CliRenderer {
    fn drop(&mut self) {
        let _ = self.cleanup();
    }
}
