use std::io::Stdout;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::{Local, Utc};
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
    MouseButton, MouseEvent, MouseEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use nn_client::page::SCROLL_LOCKED;
use nn_client::{ArticleView, ClickTarget, HomeView, Key, MemoryPage, OverlayView, Page};
use nn_core::format::{article_count_label, date_label, format_generated_on, format_read_time, format_views};
use nn_core::{category_color, ArticleDetail, ArticleSummary, LoadState, NewsApi, SourceEntry};
use tracing::debug;
use tui::backend::{Backend, CrosstermBackend};
use tui::layout::{Constraint, Direction, Layout, Rect};
use tui::style::{Color, Modifier, Style};
use tui::text::{Span, Spans};
use tui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap};
use tui::{Frame, Terminal};

use crate::clipboard::Osc52Clipboard;
use crate::render::summary_meta;

const TICK: Duration = Duration::from_millis(50);

type Term = Terminal<CrosstermBackend<Stdout>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Screen {
    Home,
    Article,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pane {
    Dates,
    Articles,
}

enum Action {
    None,
    Quit,
    OpenArticle(String),
}

struct Browser {
    home: HomeView,
    article: ArticleView,
    page: Arc<MemoryPage>,
    screen: Screen,
    focus: Pane,
    dates: ListState,
    articles: ListState,
    scroll: u16,
    opening: bool,
    status: Option<String>,
}

/// Run the interactive archive browser until the user quits.
pub async fn run(api: Arc<dyn NewsApi>) -> Result<()> {
    let home = HomeView::new(api.clone())?;
    home.init().await;

    let page = Arc::new(
        MemoryPage::new()
            .with_scroll_affordance("auto")
            .with_clipboard(Arc::new(Osc52Clipboard)),
    );
    let article = ArticleView::new(api, page.clone());

    let mut browser = Browser {
        home,
        article,
        page,
        screen: Screen::Home,
        focus: Pane::Dates,
        dates: ListState::default(),
        articles: ListState::default(),
        scroll: 0,
        opening: false,
        status: None,
    };
    browser.dates.select(Some(0));

    let mut terminal = setup_terminal()?;
    let result = browser.event_loop(&mut terminal).await;
    restore_terminal(&mut terminal)?;
    result
}

impl Browser {
    async fn event_loop(&mut self, terminal: &mut Term) -> Result<()> {
        loop {
            terminal
                .draw(|frame| self.draw(frame))
                .context("rendering frame")?;

            if !event::poll(Duration::ZERO).context("polling for terminal events")? {
                tokio::time::sleep(TICK).await;
                continue;
            }
            let action = match event::read().context("reading terminal event")? {
                Event::Key(key) => self.handle_key(key),
                Event::Mouse(mouse) => {
                    let size = terminal.size().context("reading terminal size")?;
                    self.handle_mouse(mouse, size);
                    Action::None
                }
                _ => Action::None,
            };

            match action {
                Action::None => {}
                Action::Quit => break,
                Action::OpenArticle(id) => {
                    self.screen = Screen::Article;
                    self.scroll = 0;
                    self.opening = true;
                    terminal
                        .draw(|frame| self.draw(frame))
                        .context("rendering frame")?;
                    self.article.open_article(Some(&id)).await;
                    self.opening = false;
                }
            }
        }
        Ok(())
    }

    fn handle_key(&mut self, key: KeyEvent) -> Action {
        if key.kind != KeyEventKind::Press {
            return Action::None;
        }
        self.status = None;

        // every key reaches the page first, as a document-level listener would
        let overlay_open = self.article.sources_open();
        if let Some(page_key) = page_key(key.code) {
            self.page.dispatch_key(&page_key);
        }
        if overlay_open {
            match key.code {
                KeyCode::Char('c') => {
                    self.status = Some(if self.article.overlay().copy_all() {
                        "Sources copied to clipboard".to_string()
                    } else {
                        "Nothing to copy".to_string()
                    });
                }
                KeyCode::Char('q') => return Action::Quit,
                _ => {}
            }
            return Action::None;
        }

        match (self.screen, key.code) {
            (_, KeyCode::Char('q')) => Action::Quit,
            (Screen::Home, KeyCode::Tab | KeyCode::Left | KeyCode::Right) => {
                self.focus = match self.focus {
                    Pane::Dates => Pane::Articles,
                    Pane::Articles => Pane::Dates,
                };
                if self.focus == Pane::Articles && self.articles.selected().is_none() {
                    self.articles.select(Some(0));
                }
                Action::None
            }
            (Screen::Home, KeyCode::Up) => {
                self.move_cursor(-1);
                Action::None
            }
            (Screen::Home, KeyCode::Down) => {
                self.move_cursor(1);
                Action::None
            }
            (Screen::Home, KeyCode::Enter) => self.activate(),
            (Screen::Article, KeyCode::Esc | KeyCode::Backspace | KeyCode::Char('b')) => {
                self.screen = Screen::Home;
                Action::None
            }
            (Screen::Article, KeyCode::Char('s')) => {
                self.article.open_sources();
                Action::None
            }
            (Screen::Article, KeyCode::Up) => {
                self.scroll_by(-1);
                Action::None
            }
            (Screen::Article, KeyCode::Down) => {
                self.scroll_by(1);
                Action::None
            }
            (Screen::Article, KeyCode::PageUp) => {
                self.scroll_by(-10);
                Action::None
            }
            (Screen::Article, KeyCode::PageDown) => {
                self.scroll_by(10);
                Action::None
            }
            _ => Action::None,
        }
    }

    fn handle_mouse(&mut self, mouse: MouseEvent, size: Rect) {
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) if self.article.sources_open() => {
                let target = if contains(overlay_area(size), mouse.column, mouse.row) {
                    ClickTarget::Panel
                } else {
                    ClickTarget::Backdrop
                };
                debug!("Overlay click on {:?}", target);
                self.article.overlay().click(target);
            }
            MouseEventKind::ScrollDown if self.screen == Screen::Article => self.scroll_by(3),
            MouseEventKind::ScrollUp if self.screen == Screen::Article => self.scroll_by(-3),
            _ => {}
        }
    }

    fn move_cursor(&mut self, delta: i32) {
        let (state, len) = match self.focus {
            Pane::Dates => (&mut self.dates, self.home.dates().with(|d| d.len())),
            Pane::Articles => (
                &mut self.articles,
                self.home
                    .articles()
                    .with(|list| list.data().map(|a| a.len()).unwrap_or(0)),
            ),
        };
        if len == 0 {
            state.select(None);
            return;
        }
        let current = state.selected().unwrap_or(0) as i32;
        let next = (current + delta).clamp(0, len as i32 - 1);
        state.select(Some(next as usize));
    }

    fn activate(&mut self) -> Action {
        match self.focus {
            Pane::Dates => {
                let date = self.dates.selected().and_then(|i| {
                    self.home.dates().with(|dates| dates.get(i).map(|d| d.date.clone()))
                });
                if let Some(date) = date {
                    self.home.select_date(&date);
                    self.articles.select(Some(0));
                }
                Action::None
            }
            Pane::Articles => {
                let id = self.articles.selected().and_then(|i| {
                    self.home
                        .articles()
                        .with(|list| list.data().and_then(|a| a.get(i)).map(|a| a.id.clone()))
                });
                match id {
                    Some(id) => Action::OpenArticle(id),
                    None => Action::None,
                }
            }
        }
    }

    /// Article scrolling follows the page's scroll affordance, so it stops
    /// while the sources overlay holds the lock.
    fn scroll_by(&mut self, delta: i32) {
        if self.page.scroll_affordance() == SCROLL_LOCKED {
            return;
        }
        self.scroll = (self.scroll as i32 + delta).max(0) as u16;
    }

    fn draw<B: Backend>(&mut self, frame: &mut Frame<B>) {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(1), Constraint::Length(1)].as_ref())
            .split(frame.size());

        match self.screen {
            Screen::Home => self.draw_home(frame, rows[0]),
            Screen::Article => self.draw_article(frame, rows[0]),
        }
        frame.render_widget(Paragraph::new(self.status_line()), rows[1]);

        if let Some(view) = self.article.overlay().view() {
            draw_overlay(frame, &view);
        }
    }

    fn draw_home<B: Backend>(&mut self, frame: &mut Frame<B>, area: Rect) {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(30), Constraint::Percentage(70)].as_ref())
            .split(area);
        let today = Local::now().date_naive();
        let selected = self.home.selected_date();

        let items: Vec<ListItem> = self.home.dates().with(|dates| {
            dates
                .iter()
                .map(|d| {
                    let style = if selected.as_deref() == Some(d.date.as_str()) {
                        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
                    } else {
                        Style::default()
                    };
                    ListItem::new(vec![
                        Spans::from(Span::styled(date_label(&d.date, today), style)),
                        Spans::from(Span::styled(
                            article_count_label(d.article_count),
                            Style::default().fg(Color::Gray),
                        )),
                    ])
                })
                .collect()
        });
        let dates = List::new(items)
            .block(pane_block("Archive", self.focus == Pane::Dates))
            .highlight_symbol("▸ ");
        frame.render_stateful_widget(dates, columns[0], &mut self.dates);

        let block = pane_block(&self.home.header_label(today), self.focus == Pane::Articles);
        let now = Utc::now();
        match self.home.articles().get() {
            LoadState::Idle | LoadState::Loading => {
                frame.render_widget(Paragraph::new("Loading articles...").block(block), columns[1]);
            }
            LoadState::Failed(message) => {
                let text = Span::styled(message, Style::default().fg(Color::Red));
                frame.render_widget(Paragraph::new(Spans::from(text)).block(block), columns[1]);
            }
            LoadState::Ready(articles) if articles.is_empty() => {
                frame.render_widget(
                    Paragraph::new("No articles found for this date.").block(block),
                    columns[1],
                );
            }
            LoadState::Ready(articles) => {
                let items: Vec<ListItem> = articles.iter().map(|a| summary_item(a, now)).collect();
                let list = List::new(items).block(block).highlight_symbol("▸ ");
                frame.render_stateful_widget(list, columns[1], &mut self.articles);
            }
        }
    }

    fn draw_article<B: Backend>(&self, frame: &mut Frame<B>, area: Rect) {
        let block = Block::default().borders(Borders::ALL).title("Article");
        if self.opening {
            frame.render_widget(Paragraph::new("Loading article...").block(block), area);
            return;
        }
        let article = self.article.article();
        let paragraph = Paragraph::new(article_lines(&article))
            .block(block)
            .wrap(Wrap { trim: false })
            .scroll((self.scroll, 0));
        frame.render_widget(paragraph, area);
    }

    fn status_line(&self) -> Spans<'static> {
        let help = if self.article.sources_open() {
            "c copy · Esc close · click outside to close · q quit"
        } else {
            match self.screen {
                Screen::Home => "↑↓ move · Enter open · Tab switch pane · q quit",
                Screen::Article => "↑↓ scroll · s sources · b back · q quit",
            }
        };
        let mut spans = vec![Span::styled(help, Style::default().fg(Color::Gray))];
        if let Some(status) = &self.status {
            spans.push(Span::raw("  "));
            spans.push(Span::styled(status.clone(), Style::default().fg(Color::Green)));
        }
        Spans::from(spans)
    }
}

fn page_key(code: KeyCode) -> Option<Key> {
    match code {
        KeyCode::Esc => Some(Key::Escape),
        KeyCode::Enter => Some(Key::Enter),
        KeyCode::Up => Some(Key::Up),
        KeyCode::Down => Some(Key::Down),
        KeyCode::Left => Some(Key::Left),
        KeyCode::Right => Some(Key::Right),
        KeyCode::Tab => Some(Key::Tab),
        KeyCode::Char(c) => Some(Key::Char(c)),
        _ => None,
    }
}

fn pane_block(title: &str, focused: bool) -> Block<'static> {
    let border = if focused { Color::Cyan } else { Color::DarkGray };
    Block::default()
        .title(title.to_string())
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border))
}

fn category_spans(categories: &[String]) -> Vec<Span<'static>> {
    let mut spans = Vec::new();
    for category in categories {
        let (r, g, b) = category_color(category).rgb();
        spans.push(Span::styled(
            format!("[{}]", category),
            Style::default().fg(Color::Rgb(r, g, b)),
        ));
        spans.push(Span::raw(" "));
    }
    spans
}

fn summary_item(article: &ArticleSummary, now: chrono::DateTime<Utc>) -> ListItem<'static> {
    let mut title = vec![Span::styled(
        article.title.clone(),
        Style::default().add_modifier(Modifier::BOLD),
    )];
    if article.groundbreaking {
        title.push(Span::styled(" ⚡ Groundbreaking", Style::default().fg(Color::Yellow)));
    }
    let mut lines = vec![Spans::from(title)];
    if !article.subtitle.is_empty() {
        lines.push(Spans::from(article.subtitle.clone()));
    }
    lines.push(Spans::from(Span::styled(
        summary_meta(article, now),
        Style::default().fg(Color::Gray),
    )));
    lines.push(Spans::from(""));
    ListItem::new(lines)
}

fn article_lines(article: &ArticleDetail) -> Vec<Spans<'static>> {
    if article.is_placeholder() {
        return vec![Spans::from("Article not available.")];
    }
    let mut lines = Vec::new();
    if !article.categories.is_empty() {
        lines.push(Spans::from(category_spans(&article.categories)));
    }
    if article.groundbreaking {
        lines.push(Spans::from(Span::styled("⚡ Groundbreaking", Style::default().fg(Color::Yellow))));
    }
    lines.push(Spans::from(Span::styled(
        article.title.clone(),
        Style::default().add_modifier(Modifier::BOLD),
    )));
    if !article.subtitle.is_empty() {
        lines.push(Spans::from(Span::styled(
            article.subtitle.clone(),
            Style::default().add_modifier(Modifier::ITALIC),
        )));
    }
    lines.push(Spans::from(Span::styled(
        format!(
            "Generated on {} · {} read · {} views",
            format_generated_on(article.created_at),
            format_read_time(article.read_time),
            format_views(article.views)
        ),
        Style::default().fg(Color::Gray),
    )));
    for section in &article.content {
        lines.push(Spans::from(""));
        if !section.heading.is_empty() {
            lines.push(Spans::from(Span::styled(
                section.heading.clone(),
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            )));
        }
        for paragraph in section.paragraphs() {
            lines.push(Spans::from(paragraph.to_string()));
            lines.push(Spans::from(""));
        }
    }
    lines.push(Spans::from(Span::styled(
        format!("Sources ({}) · press s", article.sources.len()),
        Style::default().fg(Color::Gray),
    )));
    lines
}

fn draw_overlay<B: Backend>(frame: &mut Frame<B>, view: &OverlayView) {
    let area = overlay_area(frame.size());
    frame.render_widget(Clear, area);

    let mut lines = Vec::new();
    match view.empty_message {
        Some(message) => lines.push(Spans::from(Span::styled(message, Style::default().fg(Color::Gray)))),
        None => {
            for (i, entry) in view.entries.iter().enumerate() {
                let line = match entry {
                    SourceEntry::Link(url) => Span::styled(
                        format!("{}. {} ↗", i + 1, url),
                        Style::default().fg(Color::Blue).add_modifier(Modifier::UNDERLINED),
                    ),
                    SourceEntry::Text(text) => Span::raw(format!("{}. {}", i + 1, text)),
                };
                lines.push(Spans::from(line));
            }
        }
    }
    lines.push(Spans::from(""));
    lines.push(Spans::from(Span::styled(
        "c Copy All · Esc close",
        Style::default().fg(Color::Gray),
    )));

    let panel = Paragraph::new(lines)
        .block(
            Block::default()
                .title(view.heading.clone())
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .wrap(Wrap { trim: false });
    frame.render_widget(panel, area);
}

fn overlay_area(size: Rect) -> Rect {
    centered_rect(70, 60, size)
}

fn contains(area: Rect, column: u16, row: u16) -> bool {
    column >= area.x && column < area.x + area.width && row >= area.y && row < area.y + area.height
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Percentage((100 - percent_y) / 2),
                Constraint::Percentage(percent_y),
                Constraint::Percentage((100 - percent_y) / 2),
            ]
            .as_ref(),
        )
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints(
            [
                Constraint::Percentage((100 - percent_x) / 2),
                Constraint::Percentage(percent_x),
                Constraint::Percentage((100 - percent_x) / 2),
            ]
            .as_ref(),
        )
        .split(vertical[1])[1]
}

fn setup_terminal() -> Result<Term> {
    enable_raw_mode().context("enabling raw mode")?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)
        .context("switching to alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("creating terminal backend")?;
    terminal.hide_cursor().context("hiding cursor")?;
    Ok(terminal)
}

fn restore_terminal(terminal: &mut Term) -> Result<()> {
    terminal.show_cursor().ok();
    disable_raw_mode().context("disabling raw mode")?;
    execute!(std::io::stdout(), LeaveAlternateScreen, DisableMouseCapture)
        .context("restoring screen state")?;
    Ok(())
}
