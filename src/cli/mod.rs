use clap::{Parser, ValueEnum};
use log::{debug, info, warn};
use thiserror::Error;

use crate::core::{Inputs, Projection, ProjectionError, ProjectionModel};

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum OutputFormat {
    Plain,
    Json,
}

/// Flag defaults reproduce the reference scenario: 100k income, 10k monthly
/// spend, 4% returns, no job hopping, 13% tax.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "fire-freedom",
    version,
    about = "Years of saving until capital sustains expenses at a 4% safe withdrawal rate"
)]
pub struct Cli {
    #[arg(long, default_value_t = 100_000.0, help = "Starting gross annual income")]
    initial_income: f64,
    #[arg(long, default_value_t = 10_000.0, help = "Fixed monthly spending")]
    monthly_expense: f64,
    #[arg(
        long,
        default_value_t = 4.0,
        help = "Annual return on invested capital in percent"
    )]
    investment_return_rate: f64,
    #[arg(
        long,
        default_value_t = 5.0,
        help = "Annual pay rise in percent when not changing jobs"
    )]
    wage_increase_rate: f64,
    #[arg(
        long,
        default_value_t = 0.0,
        help = "Pay rise in percent applied in job-change years; 0 disables job changes"
    )]
    job_hopping_increase_rate: f64,
    #[arg(long, default_value_t = 3, help = "Years between job changes")]
    years_to_hop: u32,
    #[arg(
        long,
        default_value_t = 3.0,
        help = "Annual inflation in percent; must differ from the 4% withdrawal rate"
    )]
    inflation_rate: f64,
    #[arg(long, default_value_t = 13.0, help = "Tax on gross income in percent")]
    tax_rate: f64,
    #[arg(
        long,
        default_value_t = 0.0,
        help = "Capital already held in reserve, excluded from the target"
    )]
    emergency_fund: f64,
    #[arg(
        long,
        help = "Stop after this many years; without it a persistent deficit never finishes"
    )]
    max_years: Option<u64>,
    #[arg(long, help = "Include the per-year capital trace")]
    trace: bool,
    #[arg(long, value_enum, default_value_t = OutputFormat::Plain)]
    output: OutputFormat,
}

#[derive(Debug, Error)]
pub enum CliError {
    #[error("{0}")]
    InvalidArgument(String),

    #[error(transparent)]
    Projection(#[from] ProjectionError),

    #[error("failed to serialize projection: {0}")]
    Serialization(#[from] serde_json::Error),
}

fn build_inputs(cli: &Cli) -> Result<Inputs, String> {
    for (name, value) in [
        ("--initial-income", cli.initial_income),
        ("--monthly-expense", cli.monthly_expense),
        ("--investment-return-rate", cli.investment_return_rate),
        ("--wage-increase-rate", cli.wage_increase_rate),
        ("--job-hopping-increase-rate", cli.job_hopping_increase_rate),
        ("--inflation-rate", cli.inflation_rate),
        ("--tax-rate", cli.tax_rate),
        ("--emergency-fund", cli.emergency_fund),
    ] {
        if !value.is_finite() {
            return Err(format!("{name} must be a finite number"));
        }
    }

    Ok(Inputs {
        initial_income: cli.initial_income,
        monthly_expense: cli.monthly_expense,
        investment_return_rate: cli.investment_return_rate / 100.0,
        wage_increase_rate: cli.wage_increase_rate / 100.0,
        job_hopping_increase_rate: cli.job_hopping_increase_rate / 100.0,
        years_to_hop: cli.years_to_hop,
        inflation_rate: cli.inflation_rate / 100.0,
        tax_rate: cli.tax_rate / 100.0,
        emergency_fund: cli.emergency_fund,
    })
}

/// Runs the projection described by `cli` and returns the text to print.
pub fn run(cli: Cli) -> Result<String, CliError> {
    let inputs = build_inputs(&cli).map_err(CliError::InvalidArgument)?;
    debug!("projection inputs: {inputs:?}");
    warn_on_year_one_deficit(&inputs, cli.max_years);

    let model = ProjectionModel::new(inputs);

    if cli.output == OutputFormat::Plain && !cli.trace {
        let years = match cli.max_years {
            Some(cap) => model.years_within(cap)?,
            None => Some(model.calculate_years_to_financial_freedom()?),
        };
        log_outcome(years, cli.max_years);
        return Ok(render_years(years, cli.max_years));
    }

    let mut projection = model.project(cli.max_years)?;
    log_outcome(projection.years, cli.max_years);
    if !cli.trace {
        projection.trace.clear();
    }

    match cli.output {
        OutputFormat::Json => Ok(serde_json::to_string(&projection)?),
        OutputFormat::Plain => Ok(render_trace_table(&projection, cli.max_years)),
    }
}

fn warn_on_year_one_deficit(inputs: &Inputs, max_years: Option<u64>) {
    let savings = inputs.year_one_savings();
    if savings < 0.0 && max_years.is_none() {
        warn!(
            "year-one savings are negative ({savings:.2}); the projection may never finish, \
             pass --max-years to bound it"
        );
    }
}

fn log_outcome(years: Option<u64>, max_years: Option<u64>) {
    match (years, max_years) {
        (Some(years), _) => info!("financial freedom reached after {years} years"),
        (None, Some(cap)) => info!("financial freedom not reached within {cap} years"),
        (None, None) => {}
    }
}

fn render_years(years: Option<u64>, max_years: Option<u64>) -> String {
    match (years, max_years) {
        (Some(years), _) => years.to_string(),
        (None, Some(cap)) => format!("target not reached within {cap} years"),
        (None, None) => "target not reached".to_string(),
    }
}

fn render_trace_table(projection: &Projection, max_years: Option<u64>) -> String {
    let mut lines = vec![render_years(projection.years, max_years)];
    lines.push(format!(
        "{:>5} {:>16} {:>16} {:>16} {:>18}",
        "Year", "Gross income", "Net income", "Savings", "Capital"
    ));
    lines.push("-".repeat(75));
    for row in &projection.trace {
        lines.push(format!(
            "{:>5} {:>16.2} {:>16.2} {:>16.2} {:>18.2}",
            row.year, row.gross_income, row.net_income, row.annual_savings, row.capital
        ));
    }
    lines.push(format!(
        "Required capital: {:.2}  Final capital: {:.2}",
        projection.required_capital, projection.final_capital
    ));
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;

    const EPS: f64 = 1e-9;

    fn assert_approx(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() <= EPS,
            "expected {expected}, got {actual}"
        );
    }

    fn cli_from(args: &[&str]) -> Cli {
        let argv = std::iter::once("fire-freedom").chain(args.iter().copied());
        Cli::try_parse_from(argv).expect("flags should parse")
    }

    fn assert_golden_snapshot(path: &str, actual: &str) {
        let update = matches!(
            std::env::var("UPDATE_GOLDEN").as_deref(),
            Ok("1") | Ok("true")
        );
        let snapshot_path = Path::new(path);

        if update {
            if let Some(parent) = snapshot_path.parent() {
                fs::create_dir_all(parent).expect("failed to create snapshot directory");
            }
            fs::write(snapshot_path, actual).expect("failed to write golden snapshot");
            return;
        }

        let expected = fs::read_to_string(snapshot_path).unwrap_or_else(|_| {
            panic!("missing golden snapshot at {path}; run with UPDATE_GOLDEN=1 to generate")
        });
        assert_eq!(
            actual, expected,
            "snapshot mismatch for {path}; run with UPDATE_GOLDEN=1 to refresh if expected"
        );
    }

    #[test]
    fn default_flags_print_reference_year_count() {
        let output = run(cli_from(&[])).expect("reference run");
        assert_eq!(output, "44");
    }

    #[test]
    fn build_inputs_converts_percent_flags_to_fractions() {
        let cli = cli_from(&[
            "--investment-return-rate",
            "7",
            "--wage-increase-rate",
            "2",
            "--job-hopping-increase-rate",
            "30",
            "--inflation-rate",
            "2.5",
            "--tax-rate",
            "20",
            "--emergency-fund",
            "15000",
        ]);

        let inputs = build_inputs(&cli).expect("valid inputs");
        assert_approx(inputs.investment_return_rate, 0.07);
        assert_approx(inputs.wage_increase_rate, 0.02);
        assert_approx(inputs.job_hopping_increase_rate, 0.30);
        assert_approx(inputs.inflation_rate, 0.025);
        assert_approx(inputs.tax_rate, 0.20);
        assert_approx(inputs.emergency_fund, 15_000.0);
        assert_eq!(inputs.years_to_hop, 3);
    }

    #[test]
    fn build_inputs_rejects_non_finite_values() {
        let cli = cli_from(&["--tax-rate", "NaN"]);
        let err = build_inputs(&cli).expect_err("must reject NaN");
        assert!(err.contains("--tax-rate"));

        let err = run(cli_from(&["--monthly-expense", "inf"])).expect_err("must reject inf");
        assert!(matches!(err, CliError::InvalidArgument(_)));
    }

    #[test]
    fn inflation_at_withdrawal_rate_surfaces_division_by_zero() {
        let err = run(cli_from(&["--inflation-rate", "4"])).expect_err("must fail");
        assert!(matches!(
            err,
            CliError::Projection(ProjectionError::DivisionByZero { .. })
        ));
        assert!(err.to_string().contains("division by zero"));
    }

    #[test]
    fn zero_hop_period_surfaces_modulo_by_zero() {
        let err = run(cli_from(&[
            "--job-hopping-increase-rate",
            "20",
            "--years-to-hop",
            "0",
        ]))
        .expect_err("must fail");
        assert!(matches!(
            err,
            CliError::Projection(ProjectionError::ModuloByZero { .. })
        ));
    }

    #[test]
    fn max_years_reports_unreached_target() {
        let args = [
            "--monthly-expense",
            "20000",
            "--investment-return-rate",
            "0",
            "--wage-increase-rate",
            "0",
            "--max-years",
            "50",
        ];
        let output = run(cli_from(&args)).expect("bounded run");
        assert_eq!(output, "target not reached within 50 years");

        let mut json_args = args.to_vec();
        json_args.extend(["--output", "json"]);
        let json = run(cli_from(&json_args)).expect("bounded run");
        assert!(json.contains("\"years\":null"));
    }

    #[test]
    fn json_output_omits_trace_unless_requested() {
        let json = run(cli_from(&["--output", "json"])).expect("reference run");
        assert!(json.starts_with("{\"years\":44,"));
        assert!(json.contains("\"requiredCapital\""));
        assert!(json.contains("\"finalCapital\""));
        assert!(!json.contains("\"trace\""));
    }

    #[test]
    fn plain_trace_prints_count_then_one_row_per_year() {
        let output = run(cli_from(&["--trace"])).expect("reference run");
        let lines = output.lines().collect::<Vec<_>>();

        assert_eq!(lines[0], "44");
        assert!(lines[1].contains("Capital"));
        // count, header, rule, 44 rows, summary
        assert_eq!(lines.len(), 48);
        assert!(lines[3].trim_start().starts_with("1 "));
        assert!(lines[47].starts_with("Required capital:"));
    }

    #[test]
    fn golden_snapshot_reference_trace_json() {
        let output = run(cli_from(&["--output", "json", "--trace"])).expect("reference run");
        let json = format!("{output}\n");

        assert_golden_snapshot("tests/golden/reference_scenario_trace.json", &json);
    }
}
