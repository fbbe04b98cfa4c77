// Terminal swiper - ratatui front-end for the card deck
//
// Mouse drags are converted from terminal cells to pixels so the same
// thresholds apply as on the web page. Keyboard shortcuts and the fly-out
// timer drive the rest. Input handling lives on `SwiperApp` and never touches
// the terminal, so it can be tested headless.

use std::io;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        MouseButton, MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, BorderType, Borders, Paragraph, Wrap},
    Frame, Terminal,
};

use super::client::SwipeClient;
use super::{shortcut, CardDeck, GestureState, Point, Release};
use crate::config::SwipeConfig;
use crate::store::{ActionKind, Animal, Id, NewAction, Species};

/// Command-line choices for `petmatch swipe`
#[derive(Debug, Clone)]
pub struct SwipeOptions {
    pub server_url: String,
    /// Reported as `userId` on every decision
    pub user_id: Id,
    pub species: Option<Species>,
}

// ─────────────────────────────────────────────────────────────────────────────
// App state
// ─────────────────────────────────────────────────────────────────────────────

pub struct SwiperApp {
    pub deck: CardDeck<Animal>,
    user_id: Id,
    px_per_column: f32,
    px_per_row: f32,
    animation: Duration,
    animating_since: Option<Instant>,
    pub show_details: bool,
    pub adopted: usize,
    pub rejected: usize,
    pub should_quit: bool,
}

impl SwiperApp {
    pub fn new(animals: Vec<Animal>, config: &SwipeConfig, user_id: Id) -> Self {
        Self {
            deck: CardDeck::new(animals, config.settings()),
            user_id,
            px_per_column: config.px_per_column,
            px_per_row: config.px_per_row,
            animation: Duration::from_millis(config.animation_ms),
            animating_since: None,
            show_details: false,
            adopted: 0,
            rejected: 0,
            should_quit: false,
        }
    }

    fn to_px(&self, column: u16, row: u16) -> Point {
        Point::new(
            column as f32 * self.px_per_column,
            row as f32 * self.px_per_row,
        )
    }

    fn start_animation(&mut self, now: Instant) {
        self.animating_since = Some(now);
        self.show_details = false;
    }

    pub fn handle_key(&mut self, key: KeyEvent, now: Instant) {
        if key.kind != KeyEventKind::Press {
            return;
        }

        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Esc if self.show_details => self.show_details = false,
            KeyCode::Esc => self.should_quit = true,
            KeyCode::Enter | KeyCode::Char('i') => {
                if self.deck.state().is_idle() && !self.deck.is_empty() {
                    self.show_details = !self.show_details;
                }
            }
            code => {
                let name = match code {
                    KeyCode::Left => "ArrowLeft".to_string(),
                    KeyCode::Right => "ArrowRight".to_string(),
                    KeyCode::Char(c) => c.to_string(),
                    _ => return,
                };
                if let Some(action) = shortcut(&name) {
                    if self.deck.commit(action) {
                        self.start_animation(now);
                    }
                }
            }
        }
    }

    pub fn handle_mouse(&mut self, mouse: MouseEvent, now: Instant) {
        let at = self.to_px(mouse.column, mouse.row);
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => self.deck.pointer_down(at),
            MouseEventKind::Drag(MouseButton::Left) => self.deck.pointer_move(at),
            MouseEventKind::Up(MouseButton::Left) => match self.deck.pointer_up(at) {
                Some(Release::Commit(_)) => self.start_animation(now),
                Some(Release::Tap) => self.show_details = !self.show_details,
                Some(Release::Cancel) | None => {}
            },
            _ => {}
        }
    }

    /// Finish the fly-out once it has run its course. Returns the decision
    /// to report to the server.
    pub fn tick(&mut self, now: Instant) -> Option<NewAction> {
        let since = self.animating_since?;
        if now.duration_since(since) < self.animation {
            return None;
        }
        self.animating_since = None;

        let (action, animal) = self.deck.animation_finished()?;
        match action {
            ActionKind::Adopt => self.adopted += 1,
            ActionKind::Reject => self.rejected += 1,
        }
        tracing::debug!(animal_id = animal.id, "{} {}", action, animal.name);

        Some(NewAction {
            animal_id: animal.id,
            action,
            user_id: self.user_id,
        })
    }

    /// Horizontal card offset in columns for the current frame
    fn offset_columns(&self, now: Instant, area_width: u16) -> i32 {
        match self.deck.state() {
            GestureState::Animating { action } => {
                let elapsed = self
                    .animating_since
                    .map(|since| now.duration_since(since))
                    .unwrap_or_default();
                let progress = if self.animation.is_zero() {
                    1.0
                } else {
                    (elapsed.as_secs_f32() / self.animation.as_secs_f32()).min(1.0)
                };
                let distance = progress * area_width as f32 / 2.0;
                match action {
                    ActionKind::Adopt => distance as i32,
                    ActionKind::Reject => -(distance as i32),
                }
            }
            _ => (self.deck.transform().offset_x / self.px_per_column) as i32,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Terminal lifecycle
// ─────────────────────────────────────────────────────────────────────────────

/// Fetch the catalog and run the swiper until the user quits
pub async fn run_swiper(config: &SwipeConfig, options: SwipeOptions) -> Result<()> {
    let client = SwipeClient::new(&options.server_url)?;
    let animals = client
        .fetch_animals(options.species)
        .await
        .with_context(|| format!("Could not load animals from {}", client.base_url()))?;

    tracing::info!("Loaded {} animals from {}", animals.len(), client.base_url());
    let mut app = SwiperApp::new(animals, config, options.user_id);

    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)
        .context("Failed to setup terminal")?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;

    let result = run_event_loop(&mut terminal, &mut app, &client).await;

    disable_raw_mode().context("Failed to disable raw mode")?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )
    .context("Failed to restore terminal")?;
    terminal.show_cursor().context("Failed to show cursor")?;

    result
}

async fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut SwiperApp,
    client: &SwipeClient,
) -> Result<()> {
    // ~30 FPS keeps the fly-out smooth
    let mut tick_interval = tokio::time::interval(Duration::from_millis(33));

    loop {
        terminal
            .draw(|f| draw(f, app, Instant::now()))
            .context("Failed to draw terminal")?;

        tokio::select! {
            input = async {
                if event::poll(Duration::from_millis(10)).unwrap_or(false) {
                    event::read().ok()
                } else {
                    None
                }
            } => match input {
                Some(Event::Key(key)) => app.handle_key(key, Instant::now()),
                Some(Event::Mouse(mouse)) => app.handle_mouse(mouse, Instant::now()),
                _ => {}
            },

            _ = tick_interval.tick() => {
                if let Some(decision) = app.tick(Instant::now()) {
                    client.post_action_detached(decision);
                }
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Rendering
// ─────────────────────────────────────────────────────────────────────────────

const CARD_WIDTH: u16 = 48;
const CARD_HEIGHT: u16 = 16;

fn draw(f: &mut Frame, app: &SwiperApp, now: Instant) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(CARD_HEIGHT),
            Constraint::Length(1),
        ])
        .split(f.area());

    let header = Line::from(vec![
        Span::styled(
            " PetMatch ",
            Style::default()
                .fg(Color::Black)
                .bg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!(
            "  ❤ {}  ✕ {}  ",
            app.adopted, app.rejected
        )),
        Span::styled(
            format!("{}/{}", (app.deck.index() + 1).min(app.deck.len()), app.deck.len()),
            Style::default().fg(Color::DarkGray),
        ),
    ]);
    f.render_widget(Paragraph::new(header), chunks[0]);

    draw_card(f, app, chunks[1], now);

    let help = Line::from(Span::styled(
        " ←/a pass   →/d/space adopt   drag the card   enter details   q quit ",
        Style::default().fg(Color::DarkGray),
    ));
    f.render_widget(Paragraph::new(help), chunks[2]);
}

fn card_rect(area: Rect, offset: i32) -> Rect {
    let width = CARD_WIDTH.min(area.width);
    let height = CARD_HEIGHT.min(area.height);
    let centered_x = area.x as i32 + (area.width.saturating_sub(width) / 2) as i32;
    let max_x = (area.x + area.width).saturating_sub(width) as i32;
    let x = (centered_x + offset).clamp(area.x as i32, max_x.max(area.x as i32));
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect::new(x as u16, y, width, height)
}

fn draw_card(f: &mut Frame, app: &SwiperApp, area: Rect, now: Instant) {
    let Some(animal) = app.deck.current() else {
        let empty = Paragraph::new("No animals to show")
            .block(Block::default().borders(Borders::ALL).title(" PetMatch "));
        f.render_widget(empty, card_rect(area, 0));
        return;
    };

    let transform = app.deck.transform();
    let (verdict, border_color) = match app.deck.state() {
        GestureState::Animating {
            action: ActionKind::Adopt,
        } => (Some("ADOPT ❤"), Color::Green),
        GestureState::Animating {
            action: ActionKind::Reject,
        } => (Some("PASS ✕"), Color::Red),
        _ if transform.offset_x > 0.0 => (Some("ADOPT ❤"), Color::Green),
        _ if transform.offset_x < 0.0 => (Some("PASS ✕"), Color::Red),
        _ => (None, Color::Magenta),
    };

    let mut style = Style::default();
    if transform.opacity < 0.5 || app.deck.state().is_animating() {
        style = style.add_modifier(Modifier::DIM);
    }

    let label = Style::default().fg(Color::DarkGray);
    let mut lines = vec![
        Line::from(Span::styled(
            format!("{}, {}", animal.name, animal.age),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(vec![Span::styled("Breed    ", label), Span::raw(&animal.breed)]),
        Line::from(vec![Span::styled("Size     ", label), Span::raw(&animal.size)]),
        Line::from(vec![Span::styled("Location ", label), Span::raw(&animal.location)]),
        Line::from(""),
        Line::from(Span::styled(
            animal.characteristics.join(" · "),
            Style::default().fg(Color::Cyan),
        )),
    ];
    if app.show_details {
        lines.push(Line::from(""));
        lines.push(Line::from(animal.bio.as_str()));
    }

    let mut block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(border_color))
        .title(format!(" {} ", animal.species));
    if let Some(verdict) = verdict {
        block = block.title_bottom(
            Line::from(Span::styled(
                format!(" {} {:+.0}° ", verdict, transform.rotation_deg),
                Style::default().fg(border_color).add_modifier(Modifier::BOLD),
            ))
            .centered(),
        );
    }

    let card = Paragraph::new(Text::from(lines))
        .style(style)
        .wrap(Wrap { trim: true })
        .block(block);
    f.render_widget(card, card_rect(area, app.offset_columns(now, area.width)));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn animal(id: Id, name: &str) -> Animal {
        Animal {
            id,
            name: name.to_string(),
            age: "2 anos".to_string(),
            breed: "SRD".to_string(),
            location: "Recife, PE".to_string(),
            image: None,
            characteristics: vec!["Calmo".to_string()],
            bio: String::new(),
            size: "Médio".to_string(),
            species: Species::Dog,
            ong_id: None,
        }
    }

    fn app() -> SwiperApp {
        SwiperApp::new(
            vec![animal(10, "Luna"), animal(11, "Max")],
            &SwipeConfig::default(),
            7,
        )
    }

    fn mouse(kind: MouseEventKind, column: u16) -> MouseEvent {
        MouseEvent {
            kind,
            column,
            row: 10,
            modifiers: KeyModifiers::NONE,
        }
    }

    #[test]
    fn test_key_commit_reports_after_animation() {
        let mut app = app();
        let start = Instant::now();
        app.handle_key(KeyEvent::new(KeyCode::Right, KeyModifiers::NONE), start);

        assert!(app.tick(start + Duration::from_millis(100)).is_none());
        let decision = app.tick(start + Duration::from_millis(400)).unwrap();
        assert_eq!(decision.animal_id, 10);
        assert_eq!(decision.action, ActionKind::Adopt);
        assert_eq!(decision.user_id, 7);
        assert_eq!(app.deck.index(), 1);
        assert_eq!(app.adopted, 1);
    }

    #[test]
    fn test_mouse_drag_scaled_to_pixels() {
        let mut app = app();
        let start = Instant::now();

        // 10 columns * 8 px = 80 px: below the threshold
        app.handle_mouse(mouse(MouseEventKind::Down(MouseButton::Left), 20), start);
        app.handle_mouse(mouse(MouseEventKind::Drag(MouseButton::Left), 10), start);
        app.handle_mouse(mouse(MouseEventKind::Up(MouseButton::Left), 10), start);
        assert!(app.deck.state().is_idle());
        assert!(app.tick(start + Duration::from_secs(1)).is_none());

        // 20 columns = 160 px to the left: reject
        app.handle_mouse(mouse(MouseEventKind::Down(MouseButton::Left), 30), start);
        app.handle_mouse(mouse(MouseEventKind::Drag(MouseButton::Left), 10), start);
        app.handle_mouse(mouse(MouseEventKind::Up(MouseButton::Left), 10), start);
        let decision = app.tick(start + Duration::from_secs(1)).unwrap();
        assert_eq!(decision.action, ActionKind::Reject);
        assert_eq!(app.rejected, 1);
    }

    #[test]
    fn test_click_toggles_details() {
        let mut app = app();
        let now = Instant::now();
        app.handle_mouse(mouse(MouseEventKind::Down(MouseButton::Left), 20), now);
        app.handle_mouse(mouse(MouseEventKind::Up(MouseButton::Left), 20), now);
        assert!(app.show_details);

        app.handle_key(KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE), now);
        assert!(!app.show_details);
        assert!(!app.should_quit);
    }

    #[test]
    fn test_card_rect_stays_inside_area() {
        let area = Rect::new(0, 0, 80, 20);
        let rect = card_rect(area, 500);
        assert!(rect.x + rect.width <= area.width);
        assert_eq!(card_rect(area, -500).x, 0);
    }
}
