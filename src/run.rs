use anyhow::Result;
use std::path::PathBuf;

use crate::engine::{parse_amount, EntryForm, Ledger};
use crate::export;
use crate::models::{EntryKind, ExpenseGroup, Model};

pub(crate) fn as_cli(args: &[String], ledger: &mut Ledger) -> Result<()> {
    match args[1].as_str() {
        "add" => cli_add(&args[2..], ledger),
        "delete" | "rm" => cli_delete(&args[2..], ledger),
        "summary" | "s" => cli_summary(&args[2..], ledger),
        "month" => cli_month(&args[2..], ledger),
        "categories" => cli_categories(&args[2..], ledger),
        "limit" => cli_limit(&args[2..], ledger),
        "model" => cli_model(&args[2..], ledger),
        "export" => cli_export(&args[2..], ledger),
        "--help" | "-h" | "help" => {
            print_usage();
            Ok(())
        }
        "--version" | "-V" | "version" => {
            println!("budgetnav {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        other => {
            print_usage();
            anyhow::bail!("Unknown command: {other}");
        }
    }
}

pub(crate) fn print_usage() {
    println!("Budget Navigator — local-only personal budget tracker");
    println!();
    println!("Usage: budgetnav <command>");
    println!();
    println!("Commands:");
    println!("  add --amount <n> --desc <text>    Record an entry");
    println!("    --date <YYYY-MM-DD>             Entry date (default: today)");
    println!("    --income                        Income instead of expense");
    println!("    --group <fixed|variable>        Expense group (default: fixed)");
    println!("    --category <key|text>           Expense category key, or income label");
    println!("  delete <id>                       Remove an entry by id");
    println!("  summary [YYYY-MM]                 Monthly totals, limits, desired income");
    println!("  month <YYYY-MM>                   Switch the selected month");
    println!("  categories [add <label>]          List categories, or append one");
    println!("  limit <key> <amount>              Set a per-category monthly cap");
    println!("  model <fixed> <variable> <savings>  Set the allocation percentages");
    println!("  export [path] [--month <YYYY-MM>] Write the month as semicolon CSV");
    println!("  --help, -h                        Show this help");
    println!("  --version, -V                     Show version");
}

fn flag(args: &[String], name: &str) -> Option<String> {
    args.windows(2)
        .find(|w| w[0] == name)
        .map(|w| w[1].clone())
}

fn has_flag(args: &[String], name: &str) -> bool {
    args.iter().any(|a| a == name)
}

// ── Commands ─────────────────────────────────────────────────

fn cli_add(args: &[String], ledger: &mut Ledger) -> Result<()> {
    let kind = if has_flag(args, "--income") {
        EntryKind::Income
    } else {
        EntryKind::Expense
    };
    let category = flag(args, "--category");

    let form = EntryForm {
        date: flag(args, "--date")
            .unwrap_or_else(|| chrono::Local::now().format("%Y-%m-%d").to_string()),
        kind: Some(kind),
        group: flag(args, "--group")
            .and_then(|g| ExpenseGroup::parse(&g))
            .unwrap_or_default(),
        category: category.clone().unwrap_or_else(|| {
            ledger
                .categories
                .first()
                .map(|c| c.key.clone())
                .unwrap_or_else(|| "other".into())
        }),
        income_category: category.unwrap_or_default(),
        description: flag(args, "--desc").unwrap_or_default(),
        amount: flag(args, "--amount").unwrap_or_default(),
    };

    // The ledger rejects bad forms silently; the feedback lives here.
    match ledger.add_entry(&form)? {
        Some(id) => {
            println!("Added entry {id} ({})", form.date);
            Ok(())
        }
        None => anyhow::bail!(
            "Entry rejected: needs --desc, a valid --date (YYYY-MM-DD) and a positive --amount"
        ),
    }
}

fn cli_delete(args: &[String], ledger: &mut Ledger) -> Result<()> {
    let Some(id) = args.first().and_then(|a| a.parse::<i64>().ok()) else {
        anyhow::bail!("Usage: budgetnav delete <id>");
    };
    if ledger.delete_entry(id)? {
        println!("Deleted entry {id}");
    } else {
        println!("No entry with id {id}");
    }
    Ok(())
}

fn cli_summary(args: &[String], ledger: &mut Ledger) -> Result<()> {
    let month = args
        .first()
        .filter(|a| !a.starts_with('-'))
        .cloned()
        .unwrap_or_else(|| ledger.month.clone());
    let view = ledger.view_for(&month);

    println!("Budget Navigator — {month}");
    println!("{}", "─".repeat(44));
    println!("  Income:      {:>12.2}", view.income_total);
    println!("  Expenses:    {:>12.2}", view.expense_total);
    println!("  Net:         {:>12.2}", view.net);
    println!(
        "  Fixed / Variable: {:.2} / {:.2}",
        view.fixed_total, view.variable_total
    );
    match view.desired_income {
        Some(desired) => println!("  Desired income (model): {desired:.2}"),
        None => println!("  Desired income: — (fix the model percentages)"),
    }

    println!();
    println!("Spending by category:");
    for cat in &view.by_category {
        let limit = if cat.limit > rust_decimal::Decimal::ZERO {
            format!("{:.2}", cat.limit)
        } else {
            "—".into()
        };
        println!(
            "  {:<20} {:>10.2} / {:<10} [{}]",
            cat.label,
            cat.used,
            limit,
            cat.band.tag()
        );
    }

    if !view.entries.is_empty() {
        println!();
        println!("{:<6} {:<12} {:<8} {:<10} Description", "ID", "Date", "Type", "Amount");
        for entry in &view.entries {
            println!(
                "{:<6} {:<12} {:<8} {:<10.2} {}",
                entry.id,
                entry.date.to_string(),
                entry.kind.as_str(),
                entry.amount,
                entry.description
            );
        }
    }
    Ok(())
}

fn cli_month(args: &[String], ledger: &mut Ledger) -> Result<()> {
    let Some(month) = args.first() else {
        println!("Selected month: {}", ledger.month);
        return Ok(());
    };
    if ledger.set_month(month)? {
        println!("Selected month: {month}");
        Ok(())
    } else {
        anyhow::bail!("Not a YYYY-MM month key: {month}")
    }
}

fn cli_categories(args: &[String], ledger: &mut Ledger) -> Result<()> {
    if args.first().map(String::as_str) == Some("add") {
        let label = args[1..].join(" ");
        return match ledger.add_category(&label)? {
            Some(key) => {
                println!("Added category {key}");
                Ok(())
            }
            None => anyhow::bail!("Category rejected: empty label or key already taken"),
        };
    }

    println!("{:<20} {:<20} Limit", "Key", "Label");
    println!("{}", "─".repeat(50));
    for cat in &ledger.categories {
        let limit = ledger.settings.limit_for(&cat.key);
        let limit = if limit > rust_decimal::Decimal::ZERO {
            format!("{limit:.2}")
        } else {
            "—".into()
        };
        println!("{:<20} {:<20} {limit}", cat.key, cat.label);
    }
    Ok(())
}

fn cli_limit(args: &[String], ledger: &mut Ledger) -> Result<()> {
    let (Some(key), Some(raw)) = (args.first(), args.get(1)) else {
        anyhow::bail!("Usage: budgetnav limit <category-key> <amount>");
    };
    ledger.set_limit(key, raw)?;
    println!("Limit for {key}: {:.2}", ledger.settings.limit_for(key));
    Ok(())
}

fn cli_model(args: &[String], ledger: &mut Ledger) -> Result<()> {
    let parts: Vec<_> = args.iter().filter_map(|a| parse_amount(a)).collect();
    let [fixed, variable, savings] = parts[..] else {
        anyhow::bail!("Usage: budgetnav model <fixed> <variable> <savings>");
    };
    let model = Model::new(fixed, variable, savings);
    let valid = model.is_valid();
    ledger.set_model(model)?;
    println!("Model set: {fixed}/{variable}/{savings}");
    if !valid {
        println!("Note: percentages must be non-negative and sum to 100; the desired-income projection is disabled until then.");
    }
    Ok(())
}

fn cli_export(args: &[String], ledger: &mut Ledger) -> Result<()> {
    let month = flag(args, "--month").unwrap_or_else(|| ledger.month.clone());

    let output_path = args
        .first()
        .filter(|a| !a.starts_with('-'))
        .map(|a| shellexpand(a))
        .unwrap_or_else(|| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
            format!("{home}/{}", export::export_filename(&month))
        });

    let rows = export::export_rows(&ledger.entries, &month, &ledger.categories);
    if rows.is_empty() {
        println!("No entries for {month}");
        return Ok(());
    }
    export::write_csv(&PathBuf::from(&output_path), &rows)?;
    println!("Exported {} entries to {output_path}", rows.len());
    Ok(())
}

pub(crate) fn shellexpand(path: &str) -> String {
    if let Some(rest) = path.strip_prefix("~/") {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
        format!("{home}/{rest}")
    } else {
        path.to_string()
    }
}
