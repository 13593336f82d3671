use super::datatype::{Budget, BudgetError, ExpenseGroup, LineItem};
use anyhow::{Context, Result};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

pub const DEFAULT_CURRENCY: &str = "NOK";

const INCOME: &[(&str, i64)] = &[
    ("Salary", 45000),
    ("Side Income", 0),
    ("Investments", 0),
    ("Other Income", 0),
];

// Typical monthly amounts in Norway, in NOK.
const EXPENSES: &[(&str, &[(&str, i64)])] = &[
    (
        "Housing",
        &[
            ("Rent/Mortgage", 12000),
            ("Utilities", 1200),
            ("Internet", 550),
            ("Maintenance", 500),
        ],
    ),
    (
        "Transportation",
        &[
            ("Public Transport", 800),
            ("Car Expenses", 0),
            ("Fuel", 0),
            ("Car Insurance", 0),
            ("Car Maintenance", 0),
        ],
    ),
    (
        "Food",
        &[("Groceries", 4000), ("Eating Out", 1500), ("Food Delivery", 800)],
    ),
    (
        "Entertainment",
        &[
            ("Streaming Services", 400),
            ("Movies/Events", 600),
            ("Hobbies", 800),
        ],
    ),
    (
        "Health",
        &[("Insurance", 400), ("Medication", 200), ("Gym/Fitness", 500)],
    ),
    (
        "Personal",
        &[("Clothing", 1000), ("Haircuts", 400), ("Personal Care", 500)],
    ),
    (
        "Education",
        &[("Courses", 0), ("Books", 300), ("School Fees", 0)],
    ),
    (
        "Savings",
        &[
            ("Emergency Fund", 2000),
            ("Investment Savings", 1500),
            ("Retirement", 1000),
        ],
    ),
    (
        "Debt",
        &[("Student Loans", 0), ("Credit Card", 0), ("Other Loans", 0)],
    ),
    (
        "Other",
        &[("Gifts", 500), ("Charity", 300), ("Miscellaneous", 1000)],
    ),
];

/// Starting values for a new or reset budget.
///
/// Built once at startup and shared read-only; the store receives it by
/// injection so tests and deployments can swap the table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Defaults {
    budget: Budget,
}

impl Defaults {
    pub fn new(budget: Budget) -> Result<Self, BudgetError> {
        budget.validate()?;
        Ok(Self { budget })
    }

    pub fn builtin() -> Self {
        let income = INCOME
            .iter()
            .map(|&(name, amount)| LineItem::new(name, amount))
            .collect();
        let expenses = EXPENSES
            .iter()
            .map(|&(group, items)| {
                ExpenseGroup::new(
                    group,
                    items
                        .iter()
                        .map(|&(name, amount)| LineItem::new(name, amount))
                        .collect(),
                )
            })
            .collect();
        Self {
            budget: Budget::new(income, expenses),
        }
    }

    /// Load a defaults table from a JSON file holding a serialized [`Budget`].
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("opening defaults file {}", path.display()))?;
        let budget: Budget = serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("parsing defaults file {}", path.display()))?;
        Self::new(budget).with_context(|| format!("invalid defaults in {}", path.display()))
    }

    pub fn budget(&self) -> Budget {
        self.budget.clone()
    }

    pub fn as_budget(&self) -> &Budget {
        &self.budget
    }
}

impl Default for Defaults {
    fn default() -> Self {
        Self::builtin()
    }
}
