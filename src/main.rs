use std::path::PathBuf;

use clap::Parser;
use profile_cut_optimizer::input::load_order;
use profile_cut_optimizer::render::{self, format_mm};
use profile_cut_optimizer::solver::Solver;
use profile_cut_optimizer::types::{CutRequirement, OptimizeParams, OrderInput};
use tracing::Level;

#[derive(Parser)]
#[command(
    name = "profile_cut_optimizer",
    about = "1D profile bar cutting stock optimizer"
)]
struct Cli {
    /// JSON cut list: an array of requirement lines, or an order object
    /// with "requirements", "blade_kerf" and "min_acceptable_waste"
    #[arg(long, conflicts_with_all = ["stock", "cuts"])]
    input: Option<PathBuf>,

    /// Stock bar length in mm for a single ad-hoc profile (e.g. 6000)
    #[arg(long, requires = "cuts")]
    stock: Option<f64>,

    /// Cut pieces as length:qty (e.g. 2000:4 1250.5:2)
    #[arg(long = "cuts", num_args = 1..)]
    cuts: Vec<String>,

    /// Blade kerf in mm (overrides the cut list)
    #[arg(long)]
    kerf: Option<f64>,

    /// Minimum acceptable waste per bar in mm (overrides the cut list)
    #[arg(long)]
    min_waste: Option<f64>,

    /// Show ASCII layout of each bar
    #[arg(long)]
    layout: bool,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,

    /// Log each packed bar to stderr
    #[arg(short, long)]
    verbose: bool,
}

fn parse_length(s: &str, what: &str) -> Result<f64, String> {
    let value = s
        .trim()
        .parse::<f64>()
        .map_err(|_| format!("invalid {} '{}'", what, s))?;
    if !value.is_finite() || value <= 0.0 {
        return Err(format!("{} must be positive in '{}'", what, s));
    }
    Ok(value)
}

fn parse_cut(s: &str, stock: f64) -> Result<CutRequirement, String> {
    let parts: Vec<&str> = s.split(':').collect();
    if parts.len() != 2 {
        return Err(format!("invalid cut '{}', expected length:qty", s));
    }
    let length = parse_length(parts[0], "length")?;
    let qty = parts[1]
        .parse::<u32>()
        .map_err(|_| format!("invalid quantity in '{}'", s))?;
    if qty == 0 {
        return Err(format!("quantity must be non-zero in '{}'", s));
    }
    Ok(CutRequirement::new("cli", "ad-hoc", stock, length, qty as f64))
}

fn read_order(cli: &Cli) -> Result<OrderInput, String> {
    let mut order = match (&cli.input, cli.stock) {
        (Some(path), _) => load_order(path).map_err(|e| e.to_string())?,
        (None, Some(stock)) => {
            if !stock.is_finite() || stock <= 0.0 {
                return Err(format!("stock length must be positive, got {}", stock));
            }
            let requirements = cli
                .cuts
                .iter()
                .map(|c| parse_cut(c, stock))
                .collect::<Result<Vec<_>, _>>()?;
            OrderInput {
                requirements,
                ..OrderInput::default()
            }
        }
        (None, None) => return Err("either --input or --stock with --cuts is required".into()),
    };

    if let Some(kerf) = cli.kerf {
        order.blade_kerf = kerf;
    }
    if let Some(min_waste) = cli.min_waste {
        order.min_acceptable_waste = min_waste;
    }
    Ok(order)
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::WARN })
        .init();

    let order = read_order(&cli).unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    });
    let params: OptimizeParams = order.params();

    let solver = Solver::new(order.requirements, params);
    let solution = solver.solve();

    if cli.json {
        match serde_json::to_string_pretty(&solution) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        }
        return;
    }

    for result in &solution.results {
        println!(
            "Profile {} ({}), stock {} mm:",
            result.profile_id,
            result.profile_name,
            format_mm(result.stock_length)
        );
        for bar in &result.bars {
            println!("  {}", bar.label);
            if cli.layout {
                print!(
                    "  {}",
                    render::render_bar(result.stock_length, &bar.cuts, params.blade_kerf)
                );
            }
        }
        if let (Some(last), Some(plus_50)) = (
            result.last_bar_consumption,
            result.last_bar_consumption_plus_50,
        ) {
            println!(
                "  Last bar: {} mm used, {} mm with end allowance",
                format_mm(last),
                format_mm(plus_50)
            );
        }
        if !result.unplaced.is_empty() {
            let pieces: Vec<String> = result.unplaced.iter().map(|&p| format_mm(p)).collect();
            println!("  Unplaced (longer than stock): {}", pieces.join(", "));
        }
        println!();
    }

    println!(
        "Summary: {} bar{} used, {:.1}% waste",
        solution.bar_count(),
        if solution.bar_count() == 1 { "" } else { "s" },
        solution.total_waste_percent(),
    );
    if solution.unplaced_count() > 0 {
        eprintln!(
            "Warning: {} piece{} could not be placed",
            solution.unplaced_count(),
            if solution.unplaced_count() == 1 { "" } else { "s" },
        );
    }
}
