use std::io::{self, Write};

use colored::Colorize;
use crossterm::cursor::{Hide, MoveTo, MoveToColumn, Show};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{self, Clear, ClearType};
use tokio::task;
use tracing::debug;

use crate::api::ApiClient;
use crate::output;
use crate::view::{Layout, Notice, TerminalView, ViewOptions};

/// Raw-mode guard; the Drop impl puts the terminal back even on early exits.
struct RawTerminal {
    active: bool,
}

impl RawTerminal {
    fn enter() -> Result<Self, String> {
        terminal::enable_raw_mode().map_err(|e| format!("failed to enter raw mode: {e}"))?;
        execute!(io::stdout(), Hide).map_err(|e| format!("failed to hide cursor: {e}"))?;
        Ok(Self { active: true })
    }

    fn exit(&mut self) -> Result<(), String> {
        if self.active {
            terminal::disable_raw_mode().map_err(|e| format!("failed to leave raw mode: {e}"))?;
            execute!(io::stdout(), Show).map_err(|e| format!("failed to show cursor: {e}"))?;
            self.active = false;
        }
        Ok(())
    }

    fn clear_screen(&self) -> Result<(), String> {
        execute!(io::stdout(), Clear(ClearType::All), MoveTo(0, 0))
            .map_err(|e| format!("failed to clear screen: {e}"))
    }
}

impl Drop for RawTerminal {
    fn drop(&mut self) {
        let _ = self.exit();
    }
}

// event::read blocks, so it runs on the blocking pool and the session loop
// stays a plain await chain
async fn read_key() -> Result<KeyEvent, String> {
    loop {
        let event = task::spawn_blocking(event::read)
            .await
            .map_err(|e| format!("key reader task failed: {e}"))?
            .map_err(|e| format!("failed to read key: {e}"))?;
        if let Event::Key(key) = event {
            return Ok(key);
        }
    }
}

async fn prompt_line(label: &str) -> Result<Option<String>, String> {
    let mut stdout = io::stdout();
    execute!(stdout, Show).map_err(|e| format!("failed to show cursor: {e}"))?;

    let mut input = String::new();
    let entered = loop {
        execute!(stdout, MoveToColumn(0), Clear(ClearType::CurrentLine))
            .map_err(|e| format!("failed to redraw prompt: {e}"))?;
        write!(stdout, "{label}: {input}").map_err(|e| format!("failed to write prompt: {e}"))?;
        stdout
            .flush()
            .map_err(|e| format!("failed to flush prompt: {e}"))?;

        let key = read_key().await?;
        match (key.code, key.modifiers) {
            (KeyCode::Enter, _) => break true,
            (KeyCode::Esc, _) => break false,
            (KeyCode::Char('c'), KeyModifiers::CONTROL) => break false,
            (KeyCode::Backspace, _) => {
                input.pop();
            }
            (KeyCode::Char(c), modifiers) if !modifiers.contains(KeyModifiers::CONTROL) => {
                input.push(c);
            }
            _ => {}
        }
    };

    execute!(stdout, Hide).map_err(|e| format!("failed to hide cursor: {e}"))?;
    Ok(if entered { Some(input) } else { None })
}

// raw mode needs explicit carriage returns
fn print_raw(text: &str) -> Result<(), String> {
    let mut stdout = io::stdout();
    for line in text.lines() {
        write!(stdout, "{line}\r\n").map_err(|e| format!("failed to write screen: {e}"))?;
    }
    stdout
        .flush()
        .map_err(|e| format!("failed to flush screen: {e}"))
}

struct BrowseSession {
    client: ApiClient,
    view: TerminalView,
    status: Option<Notice>,
}

impl BrowseSession {
    fn status_line(&self, message: &str) -> Result<(), String> {
        let mut stdout = io::stdout();
        execute!(stdout, MoveToColumn(0), Clear(ClearType::CurrentLine))
            .map_err(|e| format!("failed to clear status line: {e}"))?;
        write!(stdout, ":: {message}").map_err(|e| format!("failed to write status: {e}"))?;
        stdout
            .flush()
            .map_err(|e| format!("failed to flush status: {e}"))
    }

    fn absorb_notice(&mut self) {
        if let Some(notice) = self.view.take_notice() {
            self.status = Some(notice);
        }
    }

    // keeps an earlier success message on screen unless something went wrong
    fn absorb_error_notice(&mut self) {
        if let Some(notice @ Notice::Error(_)) = self.view.take_notice() {
            self.status = Some(notice);
        }
    }

    async fn load_list(&mut self) -> Result<(), String> {
        self.status_line("Loading terminals...")?;
        let listed = self.client.list_all().await;
        self.view.apply_list(listed);
        self.absorb_notice();
        Ok(())
    }

    // generate, then details, then a list refresh, in that order
    async fn generate(&mut self) -> Result<(), String> {
        self.view.begin_generate();
        self.status_line("Generating terminal number...")?;
        let generated = self.client.generate().await;
        self.view.apply_generate(generated);
        self.absorb_notice();

        let number = self.view.generated().map(|g| g.number.clone());
        if let Some(number) = number {
            self.status_line("Fetching terminal details...")?;
            match self.client.find_by_number(&number).await {
                Ok(record) => self.view.apply_generate_details(Some(record)),
                // the code is already on screen, detail lookups fail quietly
                Err(err) => debug!("detail lookup after generate failed: {err}"),
            }
            self.status_line("Refreshing terminal list...")?;
            let listed = self.client.list_all().await;
            self.view.apply_list(listed);
            self.absorb_error_notice();
        }
        Ok(())
    }

    async fn search(&mut self) -> Result<(), String> {
        let input = match prompt_line("Search terminal number").await? {
            Some(input) => input,
            None => return Ok(()),
        };
        let query = match self.view.begin_search(&input) {
            Some(query) => query,
            None => {
                self.absorb_notice();
                return Ok(());
            }
        };
        self.status_line("Searching...")?;
        let found = self.client.find_by_number(&query).await;
        self.view.apply_search(found);
        self.absorb_notice();
        Ok(())
    }

    async fn refresh(&mut self) -> Result<(), String> {
        self.status_line("Refreshing terminal list...")?;
        let listed = self.client.list_all().await;
        self.view.apply_list(listed);
        self.absorb_notice();
        Ok(())
    }

    fn redraw(&self, term: &RawTerminal) -> Result<(), String> {
        term.clear_screen()?;
        let options = self.view.options();
        let date_format = options.date_format;

        let mut screen = String::new();
        screen.push_str(&format!("  {}\n", "POS Terminal Code Generator".bold()));
        screen.push_str(&format!(
            "  {}\n\n",
            "Generate and manage terminal numbers".dimmed()
        ));

        if let Some(notice) = self.status.as_ref() {
            screen.push_str(&format!("  {}\n\n", output::render_notice(notice)));
        }

        // the generated panel wins over a stale search result
        if let Some(generated) = self.view.generated() {
            screen.push_str(&output::render_generated(generated, date_format));
            screen.push('\n');
        } else if let Some(record) = self.view.search_result() {
            screen.push_str(&output::render_search(record, date_format));
            screen.push('\n');
        }

        if self.view.records().is_empty() {
            screen.push_str(&output::render_empty());
        } else {
            let pager = self.view.pager();
            let slice = pager.slice();
            screen.push_str(&format!(
                "  {} {}\n\n",
                "All Terminal Codes".bold(),
                format!("({} total)", pager.total_items()).dimmed()
            ));
            match options.layout {
                Layout::Table => {
                    screen.push_str(&output::render_table(
                        self.view.visible(),
                        slice.start,
                        date_format,
                    ));
                }
                Layout::Grid => {
                    screen.push_str(&output::render_grid(self.view.visible(), date_format));
                }
            }
            if pager.total_pages() > 1 {
                screen.push_str(&format!("\n  {}\n", output::render_pager(pager)));
            }
        }

        screen.push_str(&format!(
            "\n  {}\n",
            format!(
                "←/→ page  Home/End ends  1-9 jump  g generate  / search  r refresh  z size [{}]  t layout [{}]  q quit",
                options.page_size.label(),
                options.layout.label()
            )
            .dimmed()
        ));

        print_raw(&screen)
    }
}

pub async fn run(client: ApiClient, options: ViewOptions, start_page: usize) -> Result<(), String> {
    let mut session = BrowseSession {
        client,
        view: TerminalView::new(options),
        status: None,
    };
    let mut term = RawTerminal::enter()?;

    session.load_list().await?;
    session.view.goto_page(start_page);
    session.redraw(&term)?;

    loop {
        let key = read_key().await?;
        match (key.code, key.modifiers) {
            (KeyCode::Char('q'), _) | (KeyCode::Esc, _) => break,
            (KeyCode::Char('c'), KeyModifiers::CONTROL) => break,
            (KeyCode::Left, _) | (KeyCode::PageUp, _) => session.view.prev_page(),
            (KeyCode::Right, _) | (KeyCode::PageDown, _) => session.view.next_page(),
            (KeyCode::Home, _) => session.view.first_page(),
            (KeyCode::End, _) => session.view.last_page(),
            (KeyCode::Char(c), _) if c.is_ascii_digit() && c != '0' => {
                session.view.goto_page(c as usize - '0' as usize);
            }
            (KeyCode::Char('g'), _) => session.generate().await?,
            (KeyCode::Char('/'), _) | (KeyCode::Char('s'), _) => session.search().await?,
            (KeyCode::Char('r'), _) => session.refresh().await?,
            (KeyCode::Char('z'), _) => {
                session.view.cycle_page_size();
            }
            (KeyCode::Char('t'), _) => {
                session.view.toggle_layout();
            }
            _ => continue,
        }
        session.redraw(&term)?;
    }

    term.exit()
}
