#![deny(warnings)]

//! Headless manufacturing cockpit: command-center metrics, what-if
//! simulation, logistics, analytics, scenarios and the assistant chat.

use anyhow::{bail, Context, Result};
use chrono::{Local, NaiveDate};
use cockpit_ai::{
    anomaly_series, critical_skus, demand_forecast, risk_distribution, supplier_watchlist,
    AnomalyMetric,
};
use cockpit_api::{ChatSession, CockpitClient, KeywordResponder, MemoryScenarioStore, ScenarioStore};
use cockpit_core::format::{format_currency, format_number, format_percent, format_signed_percent};
use cockpit_core::{validate_dashboard, CockpitConfig, DashboardData, Scenario};
use cockpit_econ::{command_center, expiring_contracts, logistics_summary};
use cockpit_sim::{
    recent_scenarios, simulate, SimulatorAction, SimulatorState, DEFAULT_TOP_COMPONENTS,
};
use serde::Serialize;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const USAGE: &str = "usage: cockpit [--config FILE] [--data FILE] [--json] <command>

commands:
  summary                                  command-center metrics
  simulate [--production P] [--lead-time P] [--safety-stock P] [--top N]
  logistics [--target N] [--as-of DATE] [--horizon DAYS]
  forecast [--sku NAME] [--scenario P] [--metric NAME] [--seed N]
  scenarios                                recent saved scenarios
  save --name NAME [--notes TEXT] [--by USER] [--production P] [--lead-time P] [--safety-stock P]
  chat [--offline] MESSAGE...";

const RECENT_SCENARIOS: usize = 5;
const DEFAULT_CONSOLIDATION_TARGET: usize = 8;
const DEFAULT_EXPIRY_HORIZON_DAYS: u64 = 180;

#[derive(Debug, Default, PartialEq)]
struct SimArgs {
    production: f64,
    lead_time: f64,
    safety_stock: f64,
}

impl SimArgs {
    /// Route through the slider reducer so CLI values obey slider bounds.
    fn state(&self) -> SimulatorState {
        [
            SimulatorAction::SetProductionDelta(self.production),
            SimulatorAction::SetLeadTimeVariance(self.lead_time),
            SimulatorAction::SetSafetyStockAdj(self.safety_stock),
        ]
        .into_iter()
        .fold(SimulatorState::default(), SimulatorState::reduce)
    }
}

#[derive(Debug, PartialEq)]
enum Command {
    Summary,
    Simulate {
        sim: SimArgs,
        top: usize,
    },
    Logistics {
        target: usize,
        as_of: Option<NaiveDate>,
        horizon_days: u64,
    },
    Forecast {
        sku: Option<String>,
        scenario_pct: f64,
        metric: AnomalyMetric,
        seed: Option<u64>,
    },
    Scenarios,
    Save {
        name: String,
        notes: String,
        created_by: String,
        sim: SimArgs,
    },
    Chat {
        offline: bool,
        message: String,
    },
}

#[derive(Debug, PartialEq)]
struct Args {
    config: Option<String>,
    data: Option<String>,
    json: bool,
    command: Command,
}

fn value(it: &mut impl Iterator<Item = String>, flag: &str) -> Result<String> {
    it.next().with_context(|| format!("{flag} needs a value"))
}

fn number<T: std::str::FromStr>(it: &mut impl Iterator<Item = String>, flag: &str) -> Result<T> {
    let raw = value(it, flag)?;
    raw.parse()
        .map_err(|_| anyhow::anyhow!("{flag}: invalid number {raw:?}"))
}

fn sim_flag(sim: &mut SimArgs, flag: &str, it: &mut impl Iterator<Item = String>) -> Result<bool> {
    match flag {
        "--production" => sim.production = number(it, flag)?,
        "--lead-time" => sim.lead_time = number(it, flag)?,
        "--safety-stock" => sim.safety_stock = number(it, flag)?,
        _ => return Ok(false),
    }
    Ok(true)
}

fn parse_args(args: impl IntoIterator<Item = String>) -> Result<Args> {
    let mut it = args.into_iter();
    let mut config = None;
    let mut data = None;
    let mut json = false;
    let name = loop {
        match it.next() {
            Some(a) if a == "--config" => config = Some(value(&mut it, "--config")?),
            Some(a) if a == "--data" => data = Some(value(&mut it, "--data")?),
            Some(a) if a == "--json" => json = true,
            Some(a) => break a,
            None => bail!("missing command\n{USAGE}"),
        }
    };

    let command = match name.as_str() {
        "summary" => Command::Summary,
        "scenarios" => Command::Scenarios,
        "simulate" => {
            let mut sim = SimArgs::default();
            let mut top = DEFAULT_TOP_COMPONENTS;
            while let Some(flag) = it.next() {
                if flag == "--top" {
                    top = number(&mut it, &flag)?;
                } else if !sim_flag(&mut sim, &flag, &mut it)? {
                    bail!("simulate: unknown option {flag}");
                }
            }
            Command::Simulate { sim, top }
        }
        "logistics" => {
            let mut target = DEFAULT_CONSOLIDATION_TARGET;
            let mut as_of = None;
            let mut horizon_days = DEFAULT_EXPIRY_HORIZON_DAYS;
            while let Some(flag) = it.next() {
                match flag.as_str() {
                    "--target" => target = number(&mut it, &flag)?,
                    "--as-of" => as_of = Some(number(&mut it, &flag)?),
                    "--horizon" => horizon_days = number(&mut it, &flag)?,
                    _ => bail!("logistics: unknown option {flag}"),
                }
            }
            Command::Logistics {
                target,
                as_of,
                horizon_days,
            }
        }
        "forecast" => {
            let mut sku = None;
            let mut scenario_pct = 0.0;
            let mut metric = AnomalyMetric::LeadTimeDelays;
            let mut seed = None;
            while let Some(flag) = it.next() {
                match flag.as_str() {
                    "--sku" => sku = Some(value(&mut it, &flag)?),
                    "--scenario" => scenario_pct = number(&mut it, &flag)?,
                    "--seed" => seed = Some(number(&mut it, &flag)?),
                    "--metric" => {
                        let label = value(&mut it, &flag)?;
                        metric = AnomalyMetric::from_label(&label)
                            .with_context(|| format!("unknown metric {label:?}"))?;
                    }
                    _ => bail!("forecast: unknown option {flag}"),
                }
            }
            Command::Forecast {
                sku,
                scenario_pct,
                metric,
                seed,
            }
        }
        "save" => {
            let mut name = None;
            let mut notes = String::new();
            let mut created_by = "User".to_string();
            let mut sim = SimArgs::default();
            while let Some(flag) = it.next() {
                match flag.as_str() {
                    "--name" => name = Some(value(&mut it, &flag)?),
                    "--notes" => notes = value(&mut it, &flag)?,
                    "--by" => created_by = value(&mut it, &flag)?,
                    _ if sim_flag(&mut sim, &flag, &mut it)? => {}
                    _ => bail!("save: unknown option {flag}"),
                }
            }
            Command::Save {
                name: name.context("save needs --name")?,
                notes,
                created_by,
                sim,
            }
        }
        "chat" => {
            let mut offline = false;
            let mut words = Vec::new();
            for a in it.by_ref() {
                if a == "--offline" {
                    offline = true;
                } else {
                    words.push(a);
                }
            }
            if words.is_empty() {
                bail!("chat needs a message");
            }
            Command::Chat {
                offline,
                message: words.join(" "),
            }
        }
        other => bail!("unknown command {other:?}\n{USAGE}"),
    };
    Ok(Args {
        config,
        data,
        json,
        command,
    })
}

fn load_config(path: Option<&str>) -> Result<CockpitConfig> {
    let cfg = match path {
        Some(p) => CockpitConfig::load(p).with_context(|| format!("loading config {p}"))?,
        None => CockpitConfig::default(),
    };
    Ok(cfg.with_env_overrides())
}

/// Where dashboard data comes from: a local JSON file or the backend.
enum Source {
    File(DashboardData),
    Remote(CockpitClient),
}

impl Source {
    fn open(data: Option<&str>, cfg: &CockpitConfig) -> Result<Self> {
        match data {
            Some(path) => {
                let d = DashboardData::load_json(path)
                    .with_context(|| format!("loading data {path}"))?;
                Ok(Source::File(d))
            }
            None => Ok(Source::Remote(CockpitClient::from_config(cfg)?)),
        }
    }

    async fn dashboard(&self) -> Result<DashboardData> {
        let data = match self {
            Source::File(d) => d.clone(),
            Source::Remote(c) => c.fetch_dashboard().await.context("fetching dashboard")?,
        };
        if let Err(e) = validate_dashboard(&data) {
            warn!(error = %e, "dashboard data failed validation");
        }
        Ok(data)
    }
}

/// A saved scenario plus whether it reached the backend.
#[derive(Debug, Serialize)]
struct SaveOutcome {
    #[serde(flatten)]
    scenario: Scenario,
    #[serde(rename = "PERSISTED")]
    persisted: bool,
}

impl SaveOutcome {
    fn line(&self) -> String {
        let s = &self.scenario;
        let mut line = format!("saved {} ({})", s.scenario_id, s.scenario_name);
        if !self.persisted {
            line.push_str(" [not persisted: in-memory store, data file unchanged]");
        }
        line
    }
}

fn emit<T: Serialize>(json: bool, value: &T, text: impl FnOnce(&T)) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        text(value);
    }
    Ok(())
}

async fn run(args: Args) -> Result<()> {
    let cfg = load_config(args.config.as_deref())?;
    let source = Source::open(args.data.as_deref(), &cfg)?;
    let json = args.json;

    match args.command {
        Command::Summary => {
            let data = source.dashboard().await?;
            let m = command_center(&data, &cfg)?;
            emit(json, &m, |m| {
                println!(
                    "Inventory value (monthly) | {}",
                    format_currency(m.monthly_inventory_value)
                );
                println!(
                    "Cash tied (monthly)       | {}",
                    format_currency(m.monthly_cash_tied)
                );
                println!(
                    "Logistics spend           | {} of {} ({})",
                    format_currency(m.logistics_spend),
                    format_currency(m.logistics_budget),
                    format_percent(m.logistics_utilization_pct, 1)
                );
                println!(
                    "Plants                    | critical: {} | warning: {} | normal: {}",
                    m.plants.counts.critical, m.plants.counts.warning, m.plants.counts.normal
                );
                for p in &m.plants.critical {
                    println!(
                        "  CRITICAL {} ({}) {}",
                        p.plant_name,
                        p.region,
                        format_currency(p.inventory_value)
                    );
                }
                for s in &m.critical_skus {
                    println!(
                        "  SHORT {} @ {} | stock {} / reorder {} | -{}",
                        s.sku_name.as_deref().unwrap_or(&s.sku_code),
                        s.plant_name.as_deref().unwrap_or(&s.plant_id),
                        format_number(s.current_stock),
                        format_number(s.reorder_point),
                        format_percent(s.severity_pct, 0)
                    );
                }
                for o in &m.cash_release {
                    println!("  {:<24} {}", o.kind.label(), format_currency(o.value));
                }
                println!("Risk score                | {:.0}/100", m.risk.total);
                for h in &m.stockout {
                    println!("  stock-out within {:<8} {}", h.horizon.label(), h.count);
                }
            })?;
        }
        Command::Simulate { sim, top } => {
            let data = source.dashboard().await?;
            let state = sim.state();
            let result = simulate(state.params, &data.bom, &cfg.simulation)?;
            emit(json, &result, |r| {
                println!(
                    "Vehicles | {} -> {} ({})",
                    format_number(r.base_annual_vehicles as f64),
                    format_number(r.adjusted_annual_vehicles as f64),
                    format_signed_percent(r.params.production_delta, 0)
                );
                println!(
                    "Cash impact      | {}",
                    format_currency(r.total_cash_impact)
                );
                println!(
                    "Days of inventory| {:.1} -> {:.1}",
                    r.base_doi, r.adjusted_doi
                );
                println!(
                    "Working capital  | {}",
                    format_currency(r.working_capital_impact)
                );
                for c in r.top_components(top) {
                    println!(
                        "  {:<28} {:>4} -> {:>4} days | {:>10} | {:?}",
                        c.component,
                        c.base_lead_days,
                        c.adjusted_lead_days,
                        format_currency(c.inventory_impact),
                        c.risk
                    );
                }
            })?;
        }
        Command::Logistics {
            target,
            as_of,
            horizon_days,
        } => {
            let data = source.dashboard().await?;
            let summary = logistics_summary(&data.providers_3pl, cfg.logistics_budget_eur, target);
            let as_of = as_of.unwrap_or_else(|| Local::now().date_naive());
            let expiring = expiring_contracts(&data.providers_3pl, as_of, horizon_days);
            emit(json, &(&summary, &expiring), |(s, exp)| {
                println!(
                    "Spend {} | budget {} ({}) | avg performance {} | plants served {}",
                    format_currency(s.total_spend),
                    format_currency(s.budget),
                    format_signed_percent(s.budget_variance_pct, 1),
                    format_percent(s.avg_performance, 1),
                    s.total_plants_served
                );
                for r in &s.region_spend {
                    println!(
                        "  {:<14} {} ({})",
                        r.region,
                        format_currency(r.value),
                        format_percent(r.percentage, 1)
                    );
                }
                let c = &s.consolidation;
                println!(
                    "Consolidate {} -> {} | savings {} | new avg {} | turnover +{:.1}",
                    c.current_count,
                    c.target_count,
                    format_currency(c.projected_savings),
                    format_percent(c.new_avg_performance, 1),
                    c.turnover_improvement
                );
                for p in exp.iter() {
                    println!("  expiring {} on {}", p.provider_name, p.contract_expiry);
                }
            })?;
        }
        Command::Forecast {
            sku,
            scenario_pct,
            metric,
            seed,
        } => {
            let seed = seed.unwrap_or(cfg.analytics_seed);
            let sku = match sku {
                Some(s) => s,
                None => {
                    let data = source.dashboard().await?;
                    critical_skus(&data.bom, cockpit_ai::FORECAST_SKU_LIMIT)
                        .first()
                        .map(|b| b.sku_name.clone())
                        .context("no critical components to forecast")?
                }
            };
            let forecast = demand_forecast(&sku, scenario_pct, seed);
            let anomalies = anomaly_series(metric, Local::now().date_naive(), seed)?;
            let watchlist = supplier_watchlist();
            let distribution = risk_distribution(&watchlist);
            let report = (&forecast, &anomalies, &watchlist, &distribution);
            emit(json, &report, |(f, a, w, d)| {
                println!(
                    "Forecast {} | change {} | accuracy {} | confidence {}",
                    f.sku_name,
                    format_signed_percent(f.pct_change, 1),
                    format_percent(f.accuracy, 1),
                    f.confidence
                );
                for p in &f.points {
                    let shown = p.forecast.or(p.actual).unwrap_or_default();
                    let kind = if p.forecast.is_some() {
                        "forecast"
                    } else {
                        "actual"
                    };
                    println!("  {} {:>6} {kind}", p.month, shown);
                }
                println!("Anomalies: {} ({})", a.metric.label(), a.unit);
                for d in &a.detected {
                    println!(
                        "  {} {:?} value {:.1} deviation {}",
                        d.date,
                        d.severity,
                        d.value,
                        format_signed_percent(d.deviation_pct, 1)
                    );
                }
                for s in w.iter() {
                    println!(
                        "  {:<24} {:<13} {} risk {}",
                        s.name,
                        s.region,
                        format_currency(s.annual_spend_eur),
                        s.risk_score
                    );
                }
                for c in d.iter() {
                    println!("  {}: {}", c.level.label(), c.count);
                }
            })?;
        }
        Command::Scenarios => {
            let scenarios = match &source {
                Source::File(d) => d.scenarios.clone(),
                Source::Remote(c) => c.list().await.context("fetching scenarios")?,
            };
            let recent: Vec<_> = recent_scenarios(&scenarios, RECENT_SCENARIOS);
            emit(json, &recent, |list| {
                for s in list {
                    println!(
                        "{} | {} | prod {} lead {} ss {} | {}",
                        s.created_at,
                        s.scenario_name,
                        format_signed_percent(s.production_delta_pct, 0),
                        format_signed_percent(s.lead_time_variance_pct, 0),
                        format_signed_percent(s.safety_stock_adj_pct, 0),
                        format_currency(s.cash_impact_eur)
                    );
                }
            })?;
        }
        Command::Save {
            name,
            notes,
            created_by,
            sim,
        } => {
            let data = source.dashboard().await?;
            let state = sim
                .state()
                .reduce(SimulatorAction::OpenSaveDialog)
                .reduce(SimulatorAction::SetScenarioName(name))
                .reduce(SimulatorAction::SetScenarioNotes(notes));
            let result = simulate(state.params, &data.bom, &cfg.simulation)?;
            let persisted = matches!(source, Source::Remote(_));
            let store: Box<dyn ScenarioStore> = match source {
                Source::File(d) => {
                    warn!("--data given; the scenario is kept in memory only");
                    Box::new(MemoryScenarioStore::new().seeded(d.scenarios))
                }
                Source::Remote(c) => Box::new(c),
            };
            let (state, saved) =
                cockpit_api::save_scenario(store.as_ref(), state, &result, &created_by).await;
            match saved {
                Some(scenario) => {
                    let outcome = SaveOutcome {
                        scenario,
                        persisted,
                    };
                    emit(json, &outcome, |o| println!("{}", o.line()))?;
                }
                None => {
                    let error = state.dialog.last_error.as_deref();
                    bail!("save failed: {}", error.unwrap_or("unknown error"));
                }
            }
        }
        Command::Chat { offline, message } => {
            let mut session = ChatSession::new();
            let reply = match (&source, offline) {
                (Source::Remote(c), false) => session.ask(c, &message).await,
                _ => session.ask(&KeywordResponder, &message).await,
            };
            let reply = reply.cloned().context("empty message")?;
            emit(json, &reply, |r| {
                println!("{}", r.content);
                for s in &r.sources {
                    println!("  source: {}", s.title);
                }
                if let Some(sql) = &r.sql {
                    println!("  sql: {sql}");
                }
            })?;
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logging setup
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let args = parse_args(std::env::args().skip(1))?;
    info!(command = ?args.command, data = ?args.data, "starting cockpit");
    run(args).await
}
