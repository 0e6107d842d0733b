use std::io;
use std::sync::mpsc;
use std::time::{Duration, Instant};

use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::prelude::*;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph};

use sportsdb_terminal::badge;
use sportsdb_terminal::config;
use sportsdb_terminal::debounce::Debounce;
use sportsdb_terminal::feed;
use sportsdb_terminal::state::{AppState, Delta, League, ProviderCommand, apply_delta};
use sportsdb_terminal::ttl_cache::TtlCache;

struct App {
    state: AppState,
    ttl: TtlCache,
    should_quit: bool,
    cmd_tx: Option<mpsc::Sender<ProviderCommand>>,
    search_input: String,
    search_debounce: Debounce<String>,
}

impl App {
    fn new(cmd_tx: Option<mpsc::Sender<ProviderCommand>>) -> Self {
        let mut ttl = TtlCache::open_default();
        ttl.clear_expired();

        let mut state = AppState::new();
        if let Some(query) = ttl.get::<String>(config::SEARCH_QUERY_KEY) {
            state.update_search_query(query);
        }
        if let Some(sport) = ttl.get::<String>(config::SPORT_FILTER_KEY) {
            state.update_selected_sport(sport);
        }
        let search_input = state.search_query.clone();

        Self {
            state,
            ttl,
            should_quit: false,
            cmd_tx,
            search_input,
            search_debounce: Debounce::new(config::search_debounce()),
        }
    }

    fn load_leagues(&mut self) {
        if let Some(leagues) = self.ttl.get::<Vec<League>>(config::LEAGUES_CACHE_KEY) {
            let count = leagues.len();
            self.state.set_leagues(leagues);
            self.state.push_log(format!("loaded {count} leagues from cache"));
            return;
        }
        self.request_leagues();
    }

    fn request_leagues(&mut self) {
        self.state.leagues_loading = true;
        self.state.leagues_error = None;
        self.send(ProviderCommand::FetchLeagues);
    }

    fn send(&mut self, cmd: ProviderCommand) {
        if let Some(tx) = self.cmd_tx.as_ref() {
            if tx.send(cmd).is_err() {
                self.state.push_log("provider thread is gone".to_string());
            }
        }
    }

    fn on_key(&mut self, key: KeyEvent) {
        if self.state.help_overlay {
            self.state.help_overlay = false;
            return;
        }
        if self.state.search_input_active {
            self.on_search_key(key);
            return;
        }
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('/') => self.state.search_input_active = true,
            KeyCode::Char('s') | KeyCode::Char('S') => {
                self.state.cycle_sport();
                self.persist_sport();
            }
            KeyCode::Char('c') | KeyCode::Char('C') => {
                self.search_input.clear();
                self.search_debounce.cancel();
                self.state.clear_filters();
                self.persist_query();
                self.persist_sport();
            }
            KeyCode::Char('r') | KeyCode::Char('R') => self.request_leagues(),
            KeyCode::Char('j') | KeyCode::Down => self.state.select_next(),
            KeyCode::Char('k') | KeyCode::Up => self.state.select_prev(),
            KeyCode::Enter => {
                if let Some(league_id) = self.state.selected_league_id() {
                    let cmd = badge::open_badge(&mut self.state, &mut self.ttl, &league_id);
                    if let Some(cmd) = cmd {
                        self.send(cmd);
                    }
                }
            }
            KeyCode::Esc => {
                if self.state.active_badge.is_some()
                    || self.state.badge_loading
                    || self.state.badge_error.is_some()
                {
                    self.state.clear_active_badge();
                }
            }
            KeyCode::Char('?') => self.state.help_overlay = true,
            _ => {}
        }
    }

    fn on_search_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => self.state.search_input_active = false,
            KeyCode::Enter => {
                self.state.search_input_active = false;
                if let Some(query) = self.search_debounce.flush() {
                    self.apply_query(query);
                }
            }
            KeyCode::Backspace => {
                self.search_input.pop();
                self.search_debounce.submit(self.search_input.clone());
            }
            KeyCode::Char(c) => {
                self.search_input.push(c);
                self.search_debounce.submit(self.search_input.clone());
            }
            _ => {}
        }
    }

    fn on_tick(&mut self) {
        if let Some(query) = self.search_debounce.poll() {
            self.apply_query(query);
        }
    }

    fn apply_query(&mut self, query: String) {
        self.state.update_search_query(query);
        self.persist_query();
    }

    fn persist_query(&mut self) {
        self.ttl.set(
            config::SEARCH_QUERY_KEY,
            &self.state.search_query,
            config::FILTER_TTL,
        );
    }

    fn persist_sport(&mut self) {
        self.ttl.set(
            config::SPORT_FILTER_KEY,
            &self.state.selected_sport,
            config::FILTER_TTL,
        );
    }
}

fn main() -> io::Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = ratatui::Terminal::new(backend)?;

    let (tx, rx) = mpsc::channel();
    let (cmd_tx, cmd_rx) = mpsc::channel();
    feed::spawn_provider(tx, cmd_rx);

    let mut app = App::new(Some(cmd_tx));
    app.load_leagues();
    let res = run_app(&mut terminal, &mut app, rx);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("error: {err}");
    }
    Ok(())
}

fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    rx: mpsc::Receiver<Delta>,
) -> io::Result<()> {
    let tick_rate = Duration::from_millis(100);
    let mut last_tick = Instant::now();

    loop {
        while let Ok(delta) = rx.try_recv() {
            apply_delta(&mut app.state, &mut app.ttl, delta);
        }

        app.on_tick();

        terminal.draw(|f| ui(f, app))?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.on_key(key);
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            last_tick = Instant::now();
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn ui(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(frame.size());

    render_header(frame, app, chunks[0]);
    render_search_bar(frame, app, chunks[1]);
    render_league_list(frame, app, chunks[2]);
    render_footer(frame, app, chunks[3]);

    if app.state.help_overlay {
        render_help_overlay(frame);
    } else if app.state.active_badge.is_some()
        || app.state.badge_loading
        || app.state.badge_error.is_some()
    {
        render_badge_popup(frame, app);
    }
}

fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let sport = if app.state.selected_sport.is_empty() {
        "All sports".to_string()
    } else {
        app.state.selected_sport.clone()
    };
    let status = if app.state.leagues_loading {
        "  loading...".to_string()
    } else if let Some(err) = app.state.leagues_error.as_ref() {
        format!("  error: {err}")
    } else {
        String::new()
    };
    let line = Line::from(vec![
        Span::styled(
            " League Browser ",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!(
            "{}/{} leagues | {sport}{status}",
            app.state.total_filtered_count(),
            app.state.league_order.len(),
        )),
    ]);
    let header = Paragraph::new(line).block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, area);
}

fn render_search_bar(frame: &mut Frame, app: &App, area: Rect) {
    let style = if app.state.search_input_active {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    let cursor = if app.state.search_input_active { "_" } else { "" };
    let search = Paragraph::new(format!("{}{cursor}", app.search_input))
        .style(style)
        .block(Block::default().borders(Borders::ALL).title(" Search (/) "));
    frame.render_widget(search, area);
}

fn render_league_list(frame: &mut Frame, app: &App, area: Rect) {
    let leagues = app.state.filtered_leagues();
    let items: Vec<ListItem> = leagues
        .iter()
        .map(|league| {
            let marker = if app.state.is_league_selected(&league.id) {
                "* "
            } else {
                "  "
            };
            let mut spans = vec![
                Span::raw(marker),
                Span::styled(
                    league.name.clone(),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    format!("  [{}]", league.sport),
                    Style::default().fg(Color::Green),
                ),
            ];
            if let Some(alt) = league.alternate_name.as_ref() {
                spans.push(Span::styled(
                    format!("  {alt}"),
                    Style::default().fg(Color::DarkGray),
                ));
            }
            ListItem::new(Line::from(spans))
        })
        .collect();

    let title = if app.state.has_active_filters() {
        " Leagues (filtered) "
    } else {
        " Leagues "
    };
    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(title))
        .highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    let mut list_state = ListState::default();
    if !leagues.is_empty() {
        list_state.select(Some(app.state.selected.min(leagues.len() - 1)));
    }
    frame.render_stateful_widget(list, area, &mut list_state);
}

fn render_footer(frame: &mut Frame, app: &App, area: Rect) {
    let hints = "/ search  s sport  c clear  enter badge  r reload  ? help  q quit";
    let text = match app.state.logs.back() {
        Some(log) => format!("{hints}  |  {log}"),
        None => hints.to_string(),
    };
    let footer = Paragraph::new(text).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(footer, area);
}

fn render_badge_popup(frame: &mut Frame, app: &App) {
    let area = centered_rect(60, 7, frame.size());
    let title = app
        .state
        .active_badge
        .as_ref()
        .and_then(|badge| app.state.league_by_id(&badge.league_id))
        .map(|league| format!(" {} ", league.name))
        .unwrap_or_else(|| " Badge ".to_string());

    let body = if app.state.badge_loading {
        "loading badge...".to_string()
    } else if let Some(err) = app.state.badge_error.as_ref() {
        format!("error: {err}")
    } else {
        match app
            .state
            .active_badge
            .as_ref()
            .and_then(|badge| badge.badge_url.clone())
        {
            Some(url) => url,
            None => "no badge available".to_string(),
        }
    };

    frame.render_widget(Clear, area);
    let popup = Paragraph::new(format!("\n{body}\n\nesc to close"))
        .block(Block::default().borders(Borders::ALL).title(title));
    frame.render_widget(popup, area);
}

fn render_help_overlay(frame: &mut Frame) {
    let area = centered_rect(50, 12, frame.size());
    let text = "\
 /        edit search text
 enter    show badge for selected league
 s        cycle sport filter
 c        clear search + sport filters
 j/k      move selection
 r        reload leagues from the API
 esc      close popup / leave search
 q        quit";
    frame.render_widget(Clear, area);
    let popup = Paragraph::new(text)
        .block(Block::default().borders(Borders::ALL).title(" Keys "));
    frame.render_widget(popup, area);
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
