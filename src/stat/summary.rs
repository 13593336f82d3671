use super::datatype::Budget;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// How many line items the dashboard ranks.
pub const TOP_EXPENSES: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryTotal {
    pub category: String,
    pub amount: Decimal,
    /// Percent of total expenses.
    pub share: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseLine {
    pub category: String,
    pub item: String,
    pub amount: Decimal,
}

impl ExpenseLine {
    pub fn label(&self) -> String {
        format!("{} - {}", self.category, self.item)
    }
}

impl Budget {
    pub fn total_income(&self) -> Decimal {
        self.income.iter().map(|i| i.amount).sum()
    }

    pub fn total_expenses(&self) -> Decimal {
        self.expenses
            .iter()
            .flat_map(|g| g.items.iter())
            .map(|i| i.amount)
            .sum()
    }

    /// Income minus expenses. Negative when the budget overspends.
    pub fn net(&self) -> Decimal {
        self.total_income() - self.total_expenses()
    }

    /// Net as a percent of income, zero when there is no income.
    pub fn savings_rate(&self) -> Decimal {
        let income = self.total_income();
        if income.is_zero() {
            return Decimal::ZERO;
        }
        (self.net() * Decimal::ONE_HUNDRED)
            .checked_div(income)
            .unwrap_or(Decimal::ZERO)
    }

    pub fn category_breakdown(&self) -> Vec<CategoryTotal> {
        let total = self.total_expenses();
        let mut rows: Vec<CategoryTotal> = self
            .expenses
            .iter()
            .map(|g| {
                let amount: Decimal = g.items.iter().map(|i| i.amount).sum();
                let share = if total.is_zero() {
                    Decimal::ZERO
                } else {
                    amount * Decimal::ONE_HUNDRED / total
                };
                CategoryTotal {
                    category: g.name.clone(),
                    amount,
                    share,
                }
            })
            .collect();
        // stable: equal amounts keep declaration order
        rows.sort_by(|a, b| b.amount.cmp(&a.amount));
        rows
    }

    /// Non-zero expense items, largest first. Ties keep declaration order
    /// (group order, then item order).
    pub fn top_expenses(&self, limit: usize) -> Vec<ExpenseLine> {
        let mut lines: Vec<ExpenseLine> = self
            .expenses
            .iter()
            .flat_map(|g| {
                g.items.iter().map(move |i| ExpenseLine {
                    category: g.name.clone(),
                    item: i.name.clone(),
                    amount: i.amount,
                })
            })
            .filter(|l| l.amount > Decimal::ZERO)
            .collect();
        lines.sort_by(|a, b| b.amount.cmp(&a.amount));
        lines.truncate(limit);
        lines
    }
}

/// Everything the dashboard view shows, computed from one budget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dashboard {
    pub currency: String,
    pub total_income: Decimal,
    pub total_expenses: Decimal,
    pub net: Decimal,
    pub savings_rate: Decimal,
    pub categories: Vec<CategoryTotal>,
    pub top_expenses: Vec<ExpenseLine>,
}

impl Dashboard {
    pub fn from_budget(budget: &Budget, currency: &str) -> Self {
        Self {
            currency: currency.to_string(),
            total_income: budget.total_income(),
            total_expenses: budget.total_expenses(),
            net: budget.net(),
            savings_rate: budget
                .savings_rate()
                .round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero),
            categories: budget.category_breakdown(),
            top_expenses: budget.top_expenses(TOP_EXPENSES),
        }
    }
}

/// Whole currency units with `,` grouping, e.g. `40,000 NOK`.
pub fn format_amount(amount: Decimal, currency: &str) -> String {
    let rounded = amount.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    let digits = rounded.abs().trunc().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    format!("{sign}{grouped} {currency}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stat::datatype::{ExpenseGroup, LineItem};
    use crate::stat::defaults::Defaults;

    fn d(v: i64) -> Decimal {
        Decimal::from(v)
    }

    fn example() -> Budget {
        Budget::new(
            vec![LineItem::new("Salary", 40000)],
            vec![ExpenseGroup::new(
                "Living",
                vec![LineItem::new("Rent", 12000), LineItem::new("Food", 5000)],
            )],
        )
    }

    #[test]
    fn totals_for_example_budget() {
        let b = example();
        assert_eq!(b.total_income(), d(40000));
        assert_eq!(b.total_expenses(), d(17000));
        assert_eq!(b.net(), d(23000));
        let top = b.top_expenses(TOP_EXPENSES);
        let names: Vec<_> = top.iter().map(|l| (l.item.as_str(), l.amount)).collect();
        assert_eq!(names, vec![("Rent", d(12000)), ("Food", d(5000))]);
    }

    #[test]
    fn net_is_income_minus_expenses() {
        let budgets = vec![
            example(),
            Defaults::builtin().budget(),
            Budget::default(),
            Budget::new(
                vec![LineItem::new("Salary", 100)],
                vec![ExpenseGroup::new("X", vec![LineItem::new("Y", 900)])],
            ),
        ];
        for b in budgets {
            assert_eq!(b.total_income() - b.total_expenses(), b.net());
        }
    }

    #[test]
    fn negative_net_is_reported_not_rejected() {
        let b = Budget::new(
            vec![LineItem::new("Salary", 1000)],
            vec![ExpenseGroup::new("Housing", vec![LineItem::new("Rent", 4000)])],
        );
        assert_eq!(b.net(), d(-3000));
        assert_eq!(b.savings_rate(), d(-300));
    }

    #[test]
    fn savings_rate_is_zero_without_income() {
        let b = Budget::new(
            vec![LineItem::new("Salary", 0)],
            vec![ExpenseGroup::new("Food", vec![LineItem::new("Groceries", 10)])],
        );
        assert_eq!(b.savings_rate(), Decimal::ZERO);
    }

    #[test]
    fn top_expenses_ties_keep_declaration_order() {
        let b = Budget::new(
            vec![],
            vec![
                ExpenseGroup::new(
                    "A",
                    vec![LineItem::new("a1", 100), LineItem::new("a2", 300)],
                ),
                ExpenseGroup::new(
                    "B",
                    vec![
                        LineItem::new("b1", 100),
                        LineItem::new("b2", 0),
                        LineItem::new("b3", 300),
                    ],
                ),
            ],
        );
        let order: Vec<_> = b
            .top_expenses(10)
            .into_iter()
            .map(|l| l.item)
            .collect();
        assert_eq!(order, vec!["a2", "b3", "a1", "b1"]);
        assert_eq!(b.top_expenses(2).len(), 2);
    }

    #[test]
    fn category_breakdown_ranks_groups() {
        let b = Budget::new(
            vec![],
            vec![
                ExpenseGroup::new("Food", vec![LineItem::new("Groceries", 250)]),
                ExpenseGroup::new(
                    "Housing",
                    vec![LineItem::new("Rent", 600), LineItem::new("Power", 150)],
                ),
                ExpenseGroup::new("Empty", vec![LineItem::new("Nothing", 0)]),
            ],
        );
        let rows = b.category_breakdown();
        assert_eq!(rows[0].category, "Housing");
        assert_eq!(rows[0].amount, d(750));
        assert_eq!(rows[0].share, d(75));
        assert_eq!(rows[1].share, d(25));
        assert_eq!(rows[2].category, "Empty");
        assert_eq!(rows[2].share, Decimal::ZERO);
    }

    #[test]
    fn dashboard_for_builtin_defaults() {
        let dash = Dashboard::from_budget(&Defaults::builtin().budget(), "NOK");
        assert_eq!(dash.total_income, d(45000));
        assert_eq!(dash.total_expenses, d(32750));
        assert_eq!(dash.net, d(12250));
        assert_eq!(dash.savings_rate.to_string(), "27.2");
        assert_eq!(dash.top_expenses.len(), TOP_EXPENSES);
        assert_eq!(dash.top_expenses[0].label(), "Housing - Rent/Mortgage");
        assert_eq!(dash.categories[0].category, "Housing");
    }

    #[test]
    fn formats_amounts_with_grouping() {
        assert_eq!(format_amount(d(40000), "NOK"), "40,000 NOK");
        assert_eq!(format_amount(d(1234567), "NOK"), "1,234,567 NOK");
        assert_eq!(format_amount(d(999), "NOK"), "999 NOK");
        assert_eq!(format_amount(d(-3000), "NOK"), "-3,000 NOK");
        assert_eq!(format_amount(Decimal::ZERO, "NOK"), "0 NOK");
        assert_eq!(format_amount(Decimal::new(12345, 1), "NOK"), "1,235 NOK");
    }

    #[test]
    fn largest_valid_amounts_aggregate_without_overflow() {
        use crate::stat::datatype::MAX_AMOUNT;

        let income = (0..50)
            .map(|i| LineItem::new(format!("Job {i}"), MAX_AMOUNT))
            .collect();
        let b = Budget::new(
            income,
            vec![
                ExpenseGroup::new("Housing", vec![LineItem::new("Rent", MAX_AMOUNT)]),
                ExpenseGroup::new("Food", vec![LineItem::new("Groceries", MAX_AMOUNT)]),
            ],
        );
        assert_eq!(b.validate(), Ok(()));

        let dash = Dashboard::from_budget(&b, "NOK");
        assert_eq!(dash.total_income, MAX_AMOUNT * d(50));
        assert_eq!(dash.total_expenses, MAX_AMOUNT * d(2));
        assert_eq!(dash.savings_rate, d(96));
        assert_eq!(dash.categories[0].share, d(50));
    }
}
