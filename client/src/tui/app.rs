use budget_analyzer::stat::{parse_amount, Budget, BudgetError, Dashboard, ItemRef};
use chrono::NaiveDate;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Screen {
    Dashboard,
    EditBudget,
    SaveLoad,
    Help,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    EditingAmount,
    NamingPreset,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum LoginMode {
    Username,
    Password,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum LoginStep {
    Choose,
    Login,
    Register,
}

pub struct LoginApp {
    pub base_url: String,
    pub username: String,
    pub password: String,
    pub mode: LoginMode,
    pub step: LoginStep,
    pub error_message: Option<String>,
    pub should_quit: bool,
}

impl LoginApp {
    pub fn new(base_url: String) -> Self {
        Self {
            base_url,
            username: String::new(),
            password: String::new(),
            mode: LoginMode::Username,
            step: LoginStep::Choose,
            error_message: None,
            should_quit: false,
        }
    }

    pub fn toggle_field(&mut self) {
        self.mode = match self.mode {
            LoginMode::Username => LoginMode::Password,
            LoginMode::Password => LoginMode::Username,
        };
    }

    pub fn push_char(&mut self, c: char) {
        match self.mode {
            LoginMode::Username => self.username.push(c),
            LoginMode::Password => self.password.push(c),
        }
    }

    pub fn pop_char(&mut self) {
        match self.mode {
            LoginMode::Username => self.username.pop(),
            LoginMode::Password => self.password.pop(),
        };
    }

    /// Field check before anything is sent to the server.
    pub fn ready(&self) -> Result<(), String> {
        if self.username.trim().is_empty() {
            return Err("Username is required".to_string());
        }
        if self.password.is_empty() {
            return Err("Password is required".to_string());
        }
        Ok(())
    }
}

pub struct App {
    pub base_url: String,
    pub token: String,
    pub username: String,
    /// Working copy edited on the Edit Budget screen.
    pub budget: Budget,
    pub dashboard: Option<Dashboard>,
    pub presets: Vec<String>,
    pub current_screen: Screen,
    pub input_mode: InputMode,
    pub selected_field: usize,
    pub amount_input: String,
    pub preset_name: String,
    pub selected_preset_idx: usize,
    pub dirty: bool,
    pub should_quit: bool,
    pub needs_refresh: bool,
    pub error_message: Option<String>,
    pub success_message: Option<String>,
}

/// Preset name offered by default, e.g. `Budget_20250131`.
pub fn default_preset_name(today: NaiveDate) -> String {
    format!("Budget_{}", today.format("%Y%m%d"))
}

impl App {
    pub fn new(base_url: String, token: String, username: String, today: NaiveDate) -> Self {
        Self {
            base_url,
            token,
            username,
            budget: Budget::default(),
            dashboard: None,
            presets: Vec::new(),
            current_screen: Screen::Dashboard,
            input_mode: InputMode::Normal,
            selected_field: 0,
            amount_input: String::new(),
            preset_name: default_preset_name(today),
            selected_preset_idx: 0,
            dirty: false,
            should_quit: false,
            needs_refresh: true,
            error_message: None,
            success_message: None,
        }
    }

    pub fn next_screen(&mut self) {
        self.current_screen = match self.current_screen {
            Screen::Dashboard => Screen::EditBudget,
            Screen::EditBudget => Screen::SaveLoad,
            Screen::SaveLoad => Screen::Help,
            Screen::Help => Screen::Dashboard,
        };
    }

    pub fn prev_screen(&mut self) {
        self.current_screen = match self.current_screen {
            Screen::Dashboard => Screen::Help,
            Screen::EditBudget => Screen::Dashboard,
            Screen::SaveLoad => Screen::EditBudget,
            Screen::Help => Screen::SaveLoad,
        };
    }

    /// Replace the working copy with a budget fetched from the server.
    pub fn set_budget(&mut self, budget: Budget) {
        self.budget = budget;
        self.dirty = false;
        let len = self.budget.item_refs().len();
        if self.selected_field >= len {
            self.selected_field = len.saturating_sub(1);
        }
    }

    pub fn set_presets(&mut self, presets: Vec<String>) {
        self.presets = presets;
        if self.selected_preset_idx >= self.presets.len() {
            self.selected_preset_idx = self.presets.len().saturating_sub(1);
        }
    }

    pub fn selected_ref(&self) -> Option<ItemRef> {
        self.budget.item_refs().get(self.selected_field).copied()
    }

    pub fn select_next_field(&mut self) {
        let len = self.budget.item_refs().len();
        if self.selected_field + 1 < len {
            self.selected_field += 1;
        }
    }

    pub fn select_prev_field(&mut self) {
        self.selected_field = self.selected_field.saturating_sub(1);
    }

    pub fn begin_edit(&mut self) {
        let Some(target) = self.selected_ref() else {
            return;
        };
        if let Some(item) = self.budget.item(target) {
            self.amount_input = item.amount.to_string();
            self.input_mode = InputMode::EditingAmount;
        }
    }

    pub fn cancel_edit(&mut self) {
        self.amount_input.clear();
        self.input_mode = InputMode::Normal;
    }

    /// Apply the typed amount to the selected field. On error the input
    /// stays open so the user can correct it.
    pub fn commit_edit(&mut self) -> Result<(), BudgetError> {
        let target = self
            .selected_ref()
            .ok_or(BudgetError::UnknownItem(ItemRef::Income(self.selected_field)))?;
        let amount = parse_amount(&self.amount_input)?;
        self.budget.set_amount(target, amount)?;
        self.dirty = true;
        self.cancel_edit();
        Ok(())
    }

    pub fn select_next_preset(&mut self) {
        if self.selected_preset_idx + 1 < self.presets.len() {
            self.selected_preset_idx += 1;
        }
    }

    pub fn select_prev_preset(&mut self) {
        self.selected_preset_idx = self.selected_preset_idx.saturating_sub(1);
    }

    pub fn selected_preset(&self) -> Option<&str> {
        self.presets.get(self.selected_preset_idx).map(String::as_str)
    }

    pub fn clear_messages(&mut self) {
        self.error_message = None;
        self.success_message = None;
    }

    pub fn fail(&mut self, msg: impl Into<String>) {
        self.success_message = None;
        self.error_message = Some(msg.into());
    }

    pub fn succeed(&mut self, msg: impl Into<String>) {
        self.error_message = None;
        self.success_message = Some(msg.into());
    }
}
