use anyhow::Result;
use budget_analyzer::stat::*;

fn main() -> Result<()> {
    let defaults = match std::env::args().nth(1) {
        Some(path) => Defaults::from_json_file(path)?,
        None => Defaults::builtin(),
    };
    let budget = defaults.budget();
    let dash = Dashboard::from_budget(&budget, DEFAULT_CURRENCY);
    let cur = dash.currency.as_str();

    println!("== Budget Summary ==\n");
    println!("Total Income:   {:>16}", format_amount(dash.total_income, cur));
    println!("Total Expenses: {:>16}", format_amount(dash.total_expenses, cur));
    println!("Savings:        {:>16}", format_amount(dash.net, cur));
    println!("Savings Rate:   {:>15}%", dash.savings_rate);

    println!("\n== Expenses by Category ==\n");
    for c in &dash.categories {
        println!(
            "{:<16} | {:>12} | {:>5.1}%",
            c.category,
            format_amount(c.amount, cur),
            c.share
        );
    }

    println!("\n== Top {} Expenses ==\n", dash.top_expenses.len());
    for (rank, line) in dash.top_expenses.iter().enumerate() {
        println!(
            "{:>2}. {:<36} {:>12}",
            rank + 1,
            line.label(),
            format_amount(line.amount, cur)
        );
    }
    Ok(())
}
