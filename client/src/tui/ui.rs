use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Bar, BarChart, BarGroup, Block, Borders, Paragraph, Row, Table, Wrap},
    Frame, Terminal,
};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use super::app::{App, InputMode, LoginApp, LoginMode, LoginStep, Screen};
use crate::sync;
use budget_analyzer::stat::{format_amount, ItemRef};

type Term = Terminal<CrosstermBackend<io::Stdout>>;

struct Session {
    token: String,
    username: String,
}

pub fn run_tui(base_url: String) -> anyhow::Result<()> {
    let rt = tokio::runtime::Runtime::new()?;

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_screens(&mut terminal, base_url, &rt);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_screens(terminal: &mut Term, base_url: String, rt: &tokio::runtime::Runtime) -> anyhow::Result<()> {
    let Some(session) = run_login(terminal, base_url.clone(), rt)? else {
        return Ok(());
    };
    let today = chrono::Local::now().date_naive();
    let mut app = App::new(base_url, session.token, session.username, today);

    loop {
        if app.needs_refresh {
            app.needs_refresh = false;
            refresh(&mut app, rt);
        }

        terminal.draw(|f| ui(f, &app))?;

        if app.should_quit {
            break;
        }

        if event::poll(Duration::from_millis(200))? {
            if let Event::Key(key) = event::read()? {
                handle_key_event(&mut app, key, rt);
            }
        }
    }
    Ok(())
}

fn run_login(
    terminal: &mut Term,
    base_url: String,
    rt: &tokio::runtime::Runtime,
) -> anyhow::Result<Option<Session>> {
    let mut login = LoginApp::new(base_url);
    loop {
        terminal.draw(|f| draw_login(f, &login))?;
        if login.should_quit {
            return Ok(None);
        }
        if !event::poll(Duration::from_millis(200))? {
            continue;
        }
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }
        if let Some(session) = handle_key_login(&mut login, key, rt) {
            return Ok(Some(session));
        }
    }
}

fn handle_key_login(login: &mut LoginApp, key: KeyEvent, rt: &tokio::runtime::Runtime) -> Option<Session> {
    use KeyCode::*;

    match login.step {
        LoginStep::Choose => match key.code {
            Char('l') => login.step = LoginStep::Login,
            Char('r') => login.step = LoginStep::Register,
            Char('q') | Esc => login.should_quit = true,
            _ => {}
        },
        LoginStep::Login | LoginStep::Register => match key.code {
            Esc => {
                login.step = LoginStep::Choose;
                login.error_message = None;
            }
            Tab | BackTab => login.toggle_field(),
            Backspace => login.pop_char(),
            Char(c) => login.push_char(c),
            Enter => {
                if let Err(msg) = login.ready() {
                    login.error_message = Some(msg);
                    return None;
                }
                let username = login.username.trim().to_string();
                if login.step == LoginStep::Register {
                    if let Err(e) = rt.block_on(sync::register(&login.base_url, &username, &login.password)) {
                        login.error_message = Some(format!("Register failed: {e}"));
                        return None;
                    }
                }
                match rt.block_on(sync::login(&login.base_url, &username, &login.password)) {
                    Ok(resp) => {
                        return Some(Session {
                            token: resp.token,
                            username: resp.username,
                        })
                    }
                    Err(e) => login.error_message = Some(format!("Login failed: {e}")),
                }
            }
            _ => {}
        },
    }
    None
}

fn refresh(app: &mut App, rt: &tokio::runtime::Runtime) {
    let base = app.base_url.clone();
    let token = app.token.clone();
    let fetched = rt.block_on(async {
        let budget = sync::download_budget(&base, &token).await?;
        let dashboard = sync::download_dashboard(&base, &token).await?;
        let presets = sync::list_presets(&base, &token).await?;
        anyhow::Ok((budget, dashboard, presets))
    });
    match fetched {
        Ok((budget, dashboard, presets)) => {
            app.set_budget(budget);
            app.dashboard = Some(dashboard);
            app.set_presets(presets);
        }
        Err(e) => app.fail(format!("Refresh failed: {e}")),
    }
}

fn handle_key_event(app: &mut App, key: KeyEvent, rt: &tokio::runtime::Runtime) {
    if key.kind != KeyEventKind::Press {
        return;
    }

    match app.input_mode {
        InputMode::Normal => handle_key_normal(app, key, rt),
        InputMode::EditingAmount => handle_key_amount(app, key),
        InputMode::NamingPreset => handle_key_preset_name(app, key),
    }
}

fn handle_key_normal(app: &mut App, key: KeyEvent, rt: &tokio::runtime::Runtime) {
    use KeyCode::*;

    match key.code {
        Char('q') => app.should_quit = true,

        // Screen switch
        Tab => app.next_screen(),
        BackTab => app.prev_screen(),
        Char('?') => app.current_screen = Screen::Help,

        Char('r') => {
            if app.dirty {
                app.succeed("Local edits discarded");
            }
            app.needs_refresh = true;
        }
        Char('c') => app.clear_messages(),

        Up => match app.current_screen {
            Screen::EditBudget => app.select_prev_field(),
            Screen::SaveLoad => app.select_prev_preset(),
            _ => {}
        },
        Down => match app.current_screen {
            Screen::EditBudget => app.select_next_field(),
            Screen::SaveLoad => app.select_next_preset(),
            _ => {}
        },

        Enter if app.current_screen == Screen::EditBudget => app.begin_edit(),
        Char('u') if app.current_screen == Screen::EditBudget => submit_budget(app, rt),

        Char('n') if app.current_screen == Screen::SaveLoad => {
            app.input_mode = InputMode::NamingPreset;
        }
        Char('s') if app.current_screen == Screen::SaveLoad => save_preset(app, rt),
        Char('l') if app.current_screen == Screen::SaveLoad => load_preset(app, rt),
        Char('D') if app.current_screen == Screen::SaveLoad => reset_budget(app, rt),
        _ => {}
    }
}

fn handle_key_amount(app: &mut App, key: KeyEvent) {
    use KeyCode::*;

    match key.code {
        Esc => app.cancel_edit(),
        Enter => match app.commit_edit() {
            Ok(()) => app.clear_messages(),
            Err(e) => app.fail(e.to_string()),
        },
        Backspace => {
            app.amount_input.pop();
        }
        Char(c) if c.is_ascii_digit() || matches!(c, '.' | ',' | ' ' | '_' | '-') => {
            app.amount_input.push(c);
        }
        _ => {}
    }
}

fn handle_key_preset_name(app: &mut App, key: KeyEvent) {
    use KeyCode::*;

    match key.code {
        Esc | Enter => app.input_mode = InputMode::Normal,
        Backspace => {
            app.preset_name.pop();
        }
        Char(c) => app.preset_name.push(c),
        _ => {}
    }
}

fn submit_budget(app: &mut App, rt: &tokio::runtime::Runtime) {
    match rt.block_on(sync::upload_budget(&app.base_url, &app.token, &app.budget)) {
        Ok(saved) => {
            app.set_budget(saved);
            app.needs_refresh = true;
            app.succeed("Budget updated successfully!");
        }
        Err(e) => app.fail(format!("Update failed: {e}")),
    }
}

fn save_preset(app: &mut App, rt: &tokio::runtime::Runtime) {
    let name = app.preset_name.trim().to_string();
    if name.is_empty() {
        app.fail("Budget name is required");
        return;
    }
    match rt.block_on(sync::save_preset(&app.base_url, &app.token, &name, &app.budget)) {
        // a full refresh would drop unsaved edits, so only the list is reloaded
        Ok(()) => match rt.block_on(sync::list_presets(&app.base_url, &app.token)) {
            Ok(presets) => {
                app.set_presets(presets);
                app.succeed(format!("Budget saved as '{name}'!"));
            }
            Err(e) => app.fail(format!("Refresh failed: {e}")),
        },
        Err(e) => app.fail(format!("Save failed: {e}")),
    }
}

fn load_preset(app: &mut App, rt: &tokio::runtime::Runtime) {
    let Some(name) = app.selected_preset().map(str::to_string) else {
        app.fail("No saved budgets found");
        return;
    };
    match rt.block_on(sync::load_preset(&app.base_url, &app.token, &name)) {
        Ok(budget) => {
            app.set_budget(budget);
            app.needs_refresh = true;
            app.succeed(format!("Budget loaded from '{name}'!"));
        }
        Err(e) => app.fail(format!("Error loading budget: {e}")),
    }
}

fn reset_budget(app: &mut App, rt: &tokio::runtime::Runtime) {
    match rt.block_on(sync::reset_budget(&app.base_url, &app.token)) {
        Ok(budget) => {
            app.set_budget(budget);
            app.needs_refresh = true;
            app.succeed("Budget reset to default values!");
        }
        Err(e) => app.fail(format!("Reset failed: {e}")),
    }
}

fn ui(f: &mut Frame<'_>, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3), // header
            Constraint::Min(0),    // main
            Constraint::Length(3), // footer
        ])
        .split(f.area());

    let screen_name = match app.current_screen {
        Screen::Dashboard => "Dashboard",
        Screen::EditBudget => "Edit Budget",
        Screen::SaveLoad => "Save/Load",
        Screen::Help => "Help",
    };
    let header_text = format!("Budget Analyzer - {screen_name}   |   User: {}", app.username);
    let header = Paragraph::new(header_text).block(Block::default().borders(Borders::ALL));
    f.render_widget(header, chunks[0]);

    match app.current_screen {
        Screen::Dashboard => draw_dashboard(f, chunks[1], app),
        Screen::EditBudget => draw_edit_budget(f, chunks[1], app),
        Screen::SaveLoad => draw_save_load(f, chunks[1], app),
        Screen::Help => draw_help(f, chunks[1]),
    }

    let footer_text = if let Some(ref msg) = app.error_message {
        format!("ERROR: {msg} | Press 'c' to clear")
    } else if let Some(ref msg) = app.success_message {
        format!("SUCCESS: {msg} | Press 'c' to clear")
    } else {
        match app.input_mode {
            InputMode::Normal => {
                "Tab/Shift+Tab: switch screen  |  ↑/↓: move  |  r: refresh  |  ?: help  |  q: quit".to_string()
            }
            InputMode::EditingAmount => {
                "Editing amount: type a number, Enter to apply, Esc to cancel".to_string()
            }
            InputMode::NamingPreset => {
                "Naming budget: type a name, Enter to finish, Esc to cancel".to_string()
            }
        }
    };
    let footer = Paragraph::new(footer_text).block(Block::default().borders(Borders::ALL));
    f.render_widget(footer, chunks[2]);
}

/// Bar height for an amount; a deficit is drawn at its absolute size.
fn bar_value(amount: Decimal) -> u64 {
    amount.abs().round().to_u64().unwrap_or(0)
}

/// Label and bar text for the savings bar. A negative net is shown as a
/// deficit with its signed amount.
fn savings_bar(net: Decimal, currency: &str) -> (&'static str, String) {
    let label = if net.is_sign_negative() && !net.is_zero() {
        "Deficit"
    } else {
        "Savings"
    };
    (label, format_amount(net, currency))
}

fn draw_dashboard(f: &mut Frame<'_>, area: Rect, app: &App) {
    let Some(dash) = app.dashboard.as_ref() else {
        let p = Paragraph::new("Loading...").block(Block::default().borders(Borders::ALL));
        f.render_widget(p, area);
        return;
    };
    let cur = dash.currency.as_str();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(12),
            Constraint::Min(0),
        ])
        .split(area);

    let metrics = format!(
        "Total Income: {}   |   Total Expenses: {}   |   Savings: {}   |   Savings Rate: {:.1}%",
        format_amount(dash.total_income, cur),
        format_amount(dash.total_expenses, cur),
        format_amount(dash.net, cur),
        dash.savings_rate,
    );
    let p = Paragraph::new(metrics).block(Block::default().title("Summary").borders(Borders::ALL));
    f.render_widget(p, chunks[0]);

    let (savings_label, savings_text) = savings_bar(dash.net, cur);
    let overspent = savings_label == "Deficit";
    let mut savings = Bar::default()
        .label(Line::from(savings_label))
        .value(bar_value(dash.net))
        .text_value(savings_text);
    if overspent {
        savings = savings.style(Style::default().fg(Color::Red));
    }
    let bars = [
        Bar::default()
            .label(Line::from("Income"))
            .value(bar_value(dash.total_income))
            .text_value(format_amount(dash.total_income, cur)),
        Bar::default()
            .label(Line::from("Expenses"))
            .value(bar_value(dash.total_expenses))
            .text_value(format_amount(dash.total_expenses, cur)),
        savings,
    ];
    let title = if overspent {
        format!("Income vs. Expenses ({cur}) - OVERSPENDING")
    } else {
        format!("Income vs. Expenses ({cur})")
    };
    let chart = BarChart::default()
        .block(Block::default().title(title).borders(Borders::ALL))
        .data(BarGroup::default().bars(&bars))
        .bar_width(12)
        .bar_gap(4);
    f.render_widget(chart, chunks[1]);

    if dash.total_expenses.is_zero() {
        let p = Paragraph::new("No expense data to display. Add expenses on the Edit Budget screen.")
            .block(Block::default().title("Expense Breakdown").borders(Borders::ALL));
        f.render_widget(p, chunks[2]);
        return;
    }

    let bottom = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(chunks[2]);

    let rows = dash.categories.iter().map(|c| {
        let blocks = (c.share / Decimal::from(5)).round().to_usize().unwrap_or(0);
        Row::new(vec![
            c.category.clone(),
            format_amount(c.amount, cur),
            format!("{:.1}%", c.share),
            "█".repeat(blocks),
        ])
    });
    let widths = [
        Constraint::Length(16),
        Constraint::Length(14),
        Constraint::Length(7),
        Constraint::Min(0),
    ];
    let table = Table::new(rows, widths)
        .header(
            Row::new(vec!["Category", "Amount", "Share", ""])
                .style(Style::default().add_modifier(Modifier::BOLD)),
        )
        .block(
            Block::default()
                .title("Expense Distribution by Category")
                .borders(Borders::ALL),
        );
    f.render_widget(table, bottom[0]);

    let rows = dash.top_expenses.iter().enumerate().map(|(i, line)| {
        Row::new(vec![
            format!("{}", i + 1),
            line.label(),
            format_amount(line.amount, cur),
        ])
    });
    let widths = [
        Constraint::Length(3),
        Constraint::Min(20),
        Constraint::Length(14),
    ];
    let table = Table::new(rows, widths)
        .header(
            Row::new(vec!["#", "Expense", "Amount"])
                .style(Style::default().add_modifier(Modifier::BOLD)),
        )
        .block(
            Block::default()
                .title(format!("Top {} Expenses", dash.top_expenses.len()))
                .borders(Borders::ALL),
        );
    f.render_widget(table, bottom[1]);
}

fn draw_edit_budget(f: &mut Frame<'_>, area: Rect, app: &App) {
    let selected = app.selected_ref();
    let bold = Style::default().add_modifier(Modifier::BOLD);

    let amount_cell = |target: ItemRef, amount: Decimal| -> String {
        if selected == Some(target) && app.input_mode == InputMode::EditingAmount {
            format!("{}_", app.amount_input)
        } else {
            format_amount(amount, budget_analyzer::stat::DEFAULT_CURRENCY)
        }
    };
    let field_row = |target: ItemRef, name: &str, amount: Decimal| {
        let row = Row::new(vec![format!("  {name}"), amount_cell(target, amount)]);
        if selected == Some(target) {
            row.style(Style::default().add_modifier(Modifier::REVERSED))
        } else {
            row
        }
    };

    let mut rows = vec![Row::new(vec!["Income".to_string(), String::new()]).style(bold)];
    for (i, item) in app.budget.income.iter().enumerate() {
        rows.push(field_row(ItemRef::Income(i), &item.name, item.amount));
    }
    for (g, group) in app.budget.expenses.iter().enumerate() {
        rows.push(Row::new(vec![group.name.clone(), String::new()]).style(bold));
        for (i, item) in group.items.iter().enumerate() {
            rows.push(field_row(ItemRef::Expense(g, i), &item.name, item.amount));
        }
    }

    // keep the selected row on screen
    let visible = area.height.saturating_sub(3) as usize;
    let selected_row = selected_row_index(app);
    let skip = selected_row.saturating_sub(visible.saturating_sub(1));
    let rows: Vec<Row> = rows.into_iter().skip(skip).collect();

    let title = if app.dirty {
        "Edit Your Budget (unsaved changes, press 'u' to update)"
    } else {
        "Edit Your Budget"
    };
    let widths = [Constraint::Length(28), Constraint::Length(18)];
    let table = Table::new(rows, widths)
        .header(Row::new(vec!["Field", "Amount"]).style(bold))
        .block(Block::default().title(title).borders(Borders::ALL));
    f.render_widget(table, area);
}

/// Row index of the selected field once group header rows are counted.
fn selected_row_index(app: &App) -> usize {
    match app.selected_ref() {
        None => 0,
        Some(ItemRef::Income(i)) => 1 + i,
        Some(ItemRef::Expense(g, i)) => {
            let before: usize = app.budget.expenses[..g]
                .iter()
                .map(|group| group.items.len() + 1)
                .sum();
            1 + app.budget.income.len() + before + 1 + i
        }
    }
}

fn draw_save_load(f: &mut Frame<'_>, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(4)])
        .split(area);
    let top = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[0]);

    let naming = app.input_mode == InputMode::NamingPreset;
    let name_line = if naming {
        Line::from(vec![
            Span::raw("Budget Name: "),
            Span::styled(
                format!("{}_", app.preset_name),
                Style::default().add_modifier(Modifier::REVERSED),
            ),
        ])
    } else {
        Line::from(format!("Budget Name: {}", app.preset_name))
    };
    let save = Paragraph::new(vec![
        name_line,
        Line::from(""),
        Line::from("n: edit name   s: save current budget"),
        Line::from("Saving under an existing name overwrites it."),
    ])
    .wrap(Wrap { trim: false })
    .block(Block::default().title("Save Current Budget").borders(Borders::ALL));
    f.render_widget(save, top[0]);

    let block = Block::default().title("Load Saved Budget").borders(Borders::ALL);
    if app.presets.is_empty() {
        f.render_widget(Paragraph::new("No saved budgets found.").block(block), top[1]);
    } else {
        let rows = app.presets.iter().enumerate().map(|(idx, name)| {
            let row = Row::new(vec![name.clone()]);
            if idx == app.selected_preset_idx {
                row.style(Style::default().add_modifier(Modifier::REVERSED))
            } else {
                row
            }
        });
        let table = Table::new(rows, [Constraint::Min(0)])
            .header(
                Row::new(vec!["↑/↓ select, l: load selected budget"])
                    .style(Style::default().add_modifier(Modifier::BOLD)),
            )
            .block(block);
        f.render_widget(table, top[1]);
    }

    let reset = Paragraph::new("Press 'D' to reset your budget to the default values.")
        .block(Block::default().title("Reset to Default").borders(Borders::ALL));
    f.render_widget(reset, chunks[1]);
}

fn draw_help(f: &mut Frame<'_>, area: Rect) {
    let text = "\
Global
  Tab / Shift+Tab   switch screen
  r                 reload budget, dashboard and saved budgets
  c                 clear message
  ?                 this help
  q                 quit

Edit Budget
  ↑ / ↓             select field
  Enter             edit amount (Enter applies, Esc cancels)
  u                 update budget on the server

Save/Load
  n                 edit the budget name
  s                 save the current budget under that name
  ↑ / ↓, l          select and load a saved budget
  D                 reset to default values";
    let p = Paragraph::new(text).block(Block::default().title("Help").borders(Borders::ALL));
    f.render_widget(p, area);
}

fn draw_login(f: &mut Frame<'_>, login: &LoginApp) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(2)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(8),
            Constraint::Length(3),
            Constraint::Min(0),
        ])
        .split(f.area());

    let header = Paragraph::new(format!("Budget Analyzer   |   Server: {}", login.base_url))
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(header, chunks[0]);

    let body = match login.step {
        LoginStep::Choose => vec![
            Line::from("l: log in"),
            Line::from("r: create an account"),
            Line::from("q: quit"),
        ],
        LoginStep::Login | LoginStep::Register => {
            let field = |label: &str, value: String, active: bool| {
                let style = if active {
                    Style::default().add_modifier(Modifier::REVERSED)
                } else {
                    Style::default()
                };
                Line::from(vec![
                    Span::raw(format!("{label:<10}")),
                    Span::styled(value, style),
                ])
            };
            vec![
                field(
                    "Username",
                    login.username.clone(),
                    login.mode == LoginMode::Username,
                ),
                field(
                    "Password",
                    "*".repeat(login.password.chars().count()),
                    login.mode == LoginMode::Password,
                ),
                Line::from(""),
                Line::from("Tab: switch field   Enter: submit   Esc: back"),
            ]
        }
    };
    let title = match login.step {
        LoginStep::Choose => "Welcome",
        LoginStep::Login => "Log In",
        LoginStep::Register => "Create Account",
    };
    let p = Paragraph::new(body).block(Block::default().title(title).borders(Borders::ALL));
    f.render_widget(p, chunks[1]);

    if let Some(ref msg) = login.error_message {
        let p = Paragraph::new(format!("ERROR: {msg}")).block(Block::default().borders(Borders::ALL));
        f.render_widget(p, chunks[2]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use budget_analyzer::stat::{ExpenseGroup, LineItem};
    use budget_analyzer::Budget;
    use ratatui::backend::TestBackend;

    fn app() -> App {
        let mut app = App::new(
            "http://localhost:8080".into(),
            "token".into(),
            "ola".into(),
            chrono::NaiveDate::from_ymd_opt(2025, 1, 31).unwrap(),
        );
        app.set_budget(Budget::new(
            vec![LineItem::new("Salary", 40000), LineItem::new("Bonus", 0)],
            vec![
                ExpenseGroup::new("Housing", vec![LineItem::new("Rent", 12000)]),
                ExpenseGroup::new(
                    "Food",
                    vec![LineItem::new("Groceries", 4000), LineItem::new("Eating Out", 1000)],
                ),
            ],
        ));
        app
    }

    #[test]
    fn selected_row_counts_group_headers() {
        let mut a = app();
        assert_eq!(selected_row_index(&a), 1);
        a.selected_field = 2; // Housing / Rent
        assert_eq!(selected_row_index(&a), 4);
        a.selected_field = 4; // Food / Eating Out
        assert_eq!(selected_row_index(&a), 7);
    }

    #[test]
    fn amount_keys_only_accept_number_characters() {
        let mut a = app();
        a.begin_edit();
        a.amount_input.clear();
        for c in ['4', 'x', '2', ' ', '0'] {
            handle_key_amount(&mut a, KeyEvent::from(KeyCode::Char(c)));
        }
        assert_eq!(a.amount_input, "42 0");
        handle_key_amount(&mut a, KeyEvent::from(KeyCode::Enter));
        assert_eq!(a.input_mode, InputMode::Normal);
        assert_eq!(a.budget.income[0].amount, Decimal::from(420));
    }

    #[test]
    fn bad_amount_shows_inline_error() {
        let mut a = app();
        a.begin_edit();
        a.amount_input = "1.2.3".into();
        handle_key_amount(&mut a, KeyEvent::from(KeyCode::Enter));
        assert!(a.error_message.is_some());
        assert_eq!(a.input_mode, InputMode::EditingAmount);
    }

    #[test]
    fn screens_render_without_panicking() {
        let backend = TestBackend::new(120, 40);
        let mut terminal = Terminal::new(backend).unwrap();
        let mut a = app();
        a.dashboard = Some(budget_analyzer::Dashboard::from_budget(&a.budget, "NOK"));
        a.set_presets(vec!["Lean".into()]);
        for _ in 0..4 {
            terminal.draw(|f| ui(f, &a)).unwrap();
            a.next_screen();
        }
        terminal
            .draw(|f| draw_login(f, &LoginApp::new("http://localhost:8080".into())))
            .unwrap();

        a.current_screen = Screen::Dashboard;
        a.budget.income[0].amount = Decimal::from(100);
        a.dashboard = Some(budget_analyzer::Dashboard::from_budget(&a.budget, "NOK"));
        terminal.draw(|f| ui(f, &a)).unwrap();
        let screen = format!("{:?}", terminal.backend().buffer());
        assert!(screen.contains("OVERSPENDING"));
        assert!(screen.contains("Deficit"));
    }

    #[test]
    fn deficit_is_drawn_with_its_size_and_sign() {
        assert_eq!(bar_value(Decimal::from(-500)), 500);
        assert_eq!(bar_value(Decimal::new(12345, 1)), 1234);
        assert_eq!(
            savings_bar(Decimal::from(-3000), "NOK"),
            ("Deficit", "-3,000 NOK".to_string())
        );
        assert_eq!(
            savings_bar(Decimal::from(23000), "NOK"),
            ("Savings", "23,000 NOK".to_string())
        );
        assert_eq!(savings_bar(Decimal::ZERO, "NOK").0, "Savings");
    }
}
