use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::str::FromStr;

/// Largest amount a single field may hold. Keeps every total and percent
/// computed over a budget well inside `Decimal` range.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(2_764_472_320, 232_830, 0, false, 0);

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BudgetError {
    #[error("amount for '{0}' must not be negative")]
    NegativeAmount(String),
    #[error("'{0}' is not a valid amount")]
    InvalidAmount(String),
    #[error("amount for '{0}' is larger than {max}", max = MAX_AMOUNT)]
    AmountTooLarge(String),
    #[error("field names must not be empty")]
    EmptyName,
    #[error("duplicate field name '{0}'")]
    DuplicateName(String),
    #[error("no budget field at {0:?}")]
    UnknownItem(ItemRef),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub name: String,
    pub amount: Decimal,
}

impl LineItem {
    pub fn new(name: impl Into<String>, amount: impl Into<Decimal>) -> Self {
        Self {
            name: name.into(),
            amount: amount.into(),
        }
    }
}

/// A named expense category (Housing, Food, ...) holding its line items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseGroup {
    pub name: String,
    pub items: Vec<LineItem>,
}

impl ExpenseGroup {
    pub fn new(name: impl Into<String>, items: Vec<LineItem>) -> Self {
        Self {
            name: name.into(),
            items,
        }
    }
}

/// Position of a single field inside a [`Budget`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemRef {
    Income(usize),
    /// (group index, item index)
    Expense(usize, usize),
}

/// A user's current income and expense field values.
///
/// Order of `income`, `expenses` and each group's `items` is declaration
/// order and is kept through storage and the wire format.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Budget {
    pub income: Vec<LineItem>,
    pub expenses: Vec<ExpenseGroup>,
}

impl Budget {
    pub fn new(income: Vec<LineItem>, expenses: Vec<ExpenseGroup>) -> Self {
        Self { income, expenses }
    }

    pub fn validate(&self) -> Result<(), BudgetError> {
        check_items(&self.income)?;
        let mut groups = HashSet::new();
        for group in &self.expenses {
            if group.name.trim().is_empty() {
                return Err(BudgetError::EmptyName);
            }
            if !groups.insert(group.name.as_str()) {
                return Err(BudgetError::DuplicateName(group.name.clone()));
            }
            check_items(&group.items)?;
        }
        Ok(())
    }

    pub fn item(&self, target: ItemRef) -> Option<&LineItem> {
        match target {
            ItemRef::Income(i) => self.income.get(i),
            ItemRef::Expense(g, i) => self.expenses.get(g).and_then(|group| group.items.get(i)),
        }
    }

    pub fn item_mut(&mut self, target: ItemRef) -> Option<&mut LineItem> {
        match target {
            ItemRef::Income(i) => self.income.get_mut(i),
            ItemRef::Expense(g, i) => self
                .expenses
                .get_mut(g)
                .and_then(|group| group.items.get_mut(i)),
        }
    }

    pub fn set_amount(&mut self, target: ItemRef, amount: Decimal) -> Result<(), BudgetError> {
        let item = self
            .item_mut(target)
            .ok_or(BudgetError::UnknownItem(target))?;
        check_amount(&item.name, amount)?;
        item.amount = amount;
        Ok(())
    }

    /// Every field position in declaration order: income first, then each
    /// expense group's items.
    pub fn item_refs(&self) -> Vec<ItemRef> {
        let mut refs: Vec<ItemRef> = (0..self.income.len()).map(ItemRef::Income).collect();
        for (g, group) in self.expenses.iter().enumerate() {
            refs.extend((0..group.items.len()).map(|i| ItemRef::Expense(g, i)));
        }
        refs
    }
}

fn check_items(items: &[LineItem]) -> Result<(), BudgetError> {
    let mut seen = HashSet::new();
    for item in items {
        if item.name.trim().is_empty() {
            return Err(BudgetError::EmptyName);
        }
        if !seen.insert(item.name.as_str()) {
            return Err(BudgetError::DuplicateName(item.name.clone()));
        }
        check_amount(&item.name, item.amount)?;
    }
    Ok(())
}

fn check_amount(label: &str, amount: Decimal) -> Result<(), BudgetError> {
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(BudgetError::NegativeAmount(label.to_string()));
    }
    if amount > MAX_AMOUNT {
        return Err(BudgetError::AmountTooLarge(label.to_string()));
    }
    Ok(())
}

/// Parse an amount typed into the edit form. Spaces, `_` and `,` are
/// accepted as thousands separators.
pub fn parse_amount(input: &str) -> Result<Decimal, BudgetError> {
    let cleaned: String = input
        .trim()
        .chars()
        .filter(|c| !matches!(c, ' ' | '_' | ','))
        .collect();
    if cleaned.is_empty() {
        return Err(BudgetError::InvalidAmount(input.to_string()));
    }
    let amount = Decimal::from_str(&cleaned)
        .map_err(|_| BudgetError::InvalidAmount(input.to_string()))?;
    check_amount(input.trim(), amount)?;
    Ok(amount.normalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Budget {
        Budget::new(
            vec![LineItem::new("Salary", 40000)],
            vec![ExpenseGroup::new(
                "Living",
                vec![LineItem::new("Rent", 12000), LineItem::new("Food", 5000)],
            )],
        )
    }

    #[test]
    fn valid_budget_passes() {
        assert_eq!(sample().validate(), Ok(()));
    }

    #[test]
    fn negative_amount_is_rejected() {
        let mut b = sample();
        b.expenses[0].items[1].amount = Decimal::from(-1);
        assert_eq!(
            b.validate(),
            Err(BudgetError::NegativeAmount("Food".to_string()))
        );
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let mut b = sample();
        b.income.push(LineItem::new("Salary", 1));
        assert_eq!(
            b.validate(),
            Err(BudgetError::DuplicateName("Salary".to_string()))
        );

        let mut b = sample();
        b.expenses.push(ExpenseGroup::new("Living", vec![]));
        assert!(matches!(b.validate(), Err(BudgetError::DuplicateName(_))));
    }

    #[test]
    fn same_item_name_in_different_groups_is_allowed() {
        let mut b = sample();
        b.expenses
            .push(ExpenseGroup::new("Other", vec![LineItem::new("Food", 10)]));
        assert_eq!(b.validate(), Ok(()));
    }

    #[test]
    fn blank_name_is_rejected() {
        let mut b = sample();
        b.income[0].name = "  ".to_string();
        assert_eq!(b.validate(), Err(BudgetError::EmptyName));
    }

    #[test]
    fn set_amount_updates_in_place() {
        let mut b = sample();
        b.set_amount(ItemRef::Expense(0, 0), Decimal::from(9000))
            .unwrap();
        assert_eq!(b.expenses[0].items[0].amount, Decimal::from(9000));
        assert_eq!(
            b.set_amount(ItemRef::Income(3), Decimal::ONE),
            Err(BudgetError::UnknownItem(ItemRef::Income(3)))
        );
        assert!(b.set_amount(ItemRef::Income(0), Decimal::from(-5)).is_err());
        assert_eq!(b.income[0].amount, Decimal::from(40000));
    }

    #[test]
    fn item_refs_follow_declaration_order() {
        let refs = sample().item_refs();
        assert_eq!(
            refs,
            vec![
                ItemRef::Income(0),
                ItemRef::Expense(0, 0),
                ItemRef::Expense(0, 1)
            ]
        );
    }

    #[test]
    fn parse_amount_accepts_separators() {
        assert_eq!(parse_amount("40 000"), Ok(Decimal::from(40000)));
        assert_eq!(parse_amount("12,500"), Ok(Decimal::from(12500)));
        assert_eq!(parse_amount(" 1_200 "), Ok(Decimal::from(1200)));
        assert_eq!(parse_amount("0"), Ok(Decimal::ZERO));
        assert_eq!(parse_amount("99.50").unwrap().to_string(), "99.5");
    }

    #[test]
    fn parse_amount_rejects_bad_input() {
        assert!(matches!(
            parse_amount("abc"),
            Err(BudgetError::InvalidAmount(_))
        ));
        assert!(matches!(parse_amount(""), Err(BudgetError::InvalidAmount(_))));
        assert!(matches!(
            parse_amount("-100"),
            Err(BudgetError::NegativeAmount(_))
        ));
    }

    #[test]
    fn amounts_above_the_cap_are_rejected() {
        let mut b = sample();
        b.income.push(LineItem::new("Lottery", Decimal::MAX));
        assert_eq!(
            b.validate(),
            Err(BudgetError::AmountTooLarge("Lottery".to_string()))
        );

        let mut b = sample();
        assert!(matches!(
            b.set_amount(ItemRef::Expense(0, 0), MAX_AMOUNT + Decimal::ONE),
            Err(BudgetError::AmountTooLarge(_))
        ));
        b.set_amount(ItemRef::Expense(0, 0), MAX_AMOUNT).unwrap();
        assert_eq!(b.validate(), Ok(()));

        assert_eq!(parse_amount("1 000 000 000 000 000"), Ok(MAX_AMOUNT));
        assert!(matches!(
            parse_amount("79228162514264337593543950335"),
            Err(BudgetError::AmountTooLarge(_))
        ));
    }
}
