//! trade-runner: headless driver for the trade history.
//!
//! Usage:
//!   trade-runner --seed 12345 --ticks 3650 --db saves.db
//!   trade-runner --seed 12345 --start 1990-01-01 --ipc-mode

use anyhow::{Context, Result};
use chrono::NaiveDate;
use std::env;
use std::io::{self, BufRead, Write};
use std::sync::Arc;
use tradeview_core::{
    chart::{ChartRequest, HistoryChart},
    command::ChartCommand,
    config::ViewConfig,
    engine::HistoryEngine,
    event::HistoryEvent,
    hit_test::Cursor,
    history::SnapshotHistory,
    save_data,
    source::SyntheticSource,
    store::SaveStore,
};

#[derive(serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum IpcCommand {
    Tick { count: u64 },
    Jump { date: NaiveDate },
    GetChart,
    Hover { x: f64, y: f64 },
    Command { command: ChartCommand },
    Save,
    Quit,
}

#[derive(serde::Serialize)]
struct UiState<'a> {
    date:      NaiveDate,
    snapshots: usize,
    loaded:    bool,
    events:    Vec<HistoryEvent>,
    request:   &'a ChartRequest,
}

struct Session {
    engine:    HistoryEngine,
    store:     SaveStore,
    save_id:   String,
    request:   ChartRequest,
    tolerance: f64,
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let seed = parse_arg(&args, "--seed", 42u64);
    let ticks = parse_arg(&args, "--ticks", 3650u64);
    let ipc_mode = args.iter().any(|a| a == "--ipc-mode");
    let db = arg_value(&args, "--db").unwrap_or(":memory:");
    let config_path = arg_value(&args, "--config").unwrap_or("./data/view_config.json");
    let start = match arg_value(&args, "--start") {
        Some(s) => s.parse::<NaiveDate>().with_context(|| format!("bad --start date {s}"))?,
        None => NaiveDate::from_ymd_opt(2000, 1, 1).context("default start date")?,
    };

    if !ipc_mode {
        println!("Trade history - trade-runner");
        println!("  seed:      {seed}");
        println!("  ticks:     {ticks}");
        println!("  start:     {start}");
        println!("  db:        {db}");
        println!("  config:    {config_path}");
        println!();
    }

    let config = ViewConfig::load(config_path)?;
    let store = if db == ":memory:" { SaveStore::in_memory()? } else { SaveStore::open(db)? };
    store.migrate()?;

    // Continue the most recent save in a file database, else start one.
    let save_id = match store.saves()?.pop() {
        Some((id, _)) => id,
        None => store.create_save(&format!("seed-{seed}"))?,
    };
    let start = store.game_date(&save_id)?.unwrap_or(start);

    let history = Arc::new(SnapshotHistory::new());
    if !save_data::load_history(&history, &store, &save_id) {
        log::warn!("continuing without trade history for this session");
    }

    let mut engine = HistoryEngine::new(start, Arc::clone(&history), Box::new(SyntheticSource::new(seed)));
    engine.sample_now();

    let mut session = Session {
        engine,
        store,
        save_id,
        request: config.chart_request(),
        tolerance: config.tooltip_tolerance,
    };

    if ipc_mode {
        run_ipc_loop(&mut session)?;
    } else {
        session.engine.run_ticks(ticks);
        session.save()?;
        print_summary(&session)?;
    }

    session.engine.history().deinitialize();
    Ok(())
}

impl Session {
    fn save(&self) -> Result<bool> {
        self.store.set_game_date(&self.save_id, self.engine.date())?;
        Ok(save_data::save_history(self.engine.history(), &self.store, &self.save_id))
    }

    fn chart(&self) -> HistoryChart {
        HistoryChart::build(self.engine.history(), &self.request, self.engine.date())
    }

    fn state(&self, events: Vec<HistoryEvent>) -> UiState<'_> {
        let history = self.engine.history();
        UiState {
            date:      self.engine.date(),
            snapshots: history.len(),
            loaded:    history.is_loaded(),
            events,
            request:   &self.request,
        }
    }
}

fn run_ipc_loop(session: &mut Session) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut handle = stdin.lock();
    let mut buffer = String::new();

    loop {
        buffer.clear();
        let bytes_read = handle.read_line(&mut buffer)?;
        if bytes_read == 0 {
            break; // EOF
        }

        let cmd: IpcCommand = match serde_json::from_str(&buffer) {
            Ok(c) => c,
            Err(e) => {
                let err_json = serde_json::json!({ "error": e.to_string() });
                writeln!(stdout, "{}", err_json)?;
                stdout.flush()?;
                continue;
            }
        };

        let reply = match cmd {
            IpcCommand::Quit => break,
            IpcCommand::Tick { count } => {
                let events = session.engine.run_ticks(count);
                serde_json::to_string(&session.state(events))?
            }
            IpcCommand::Jump { date } => {
                let events = session.engine.jump_to(date);
                serde_json::to_string(&session.state(events))?
            }
            IpcCommand::GetChart => {
                let chart = session.chart();
                serde_json::to_string(&serde_json::json!({
                    "chart": chart,
                    "gridlines": chart.gridlines(),
                }))?
            }
            IpcCommand::Hover { x, y } => {
                let tooltip = session.chart().tooltip_within(Cursor::new(x, y), session.tolerance);
                serde_json::to_string(&serde_json::json!({ "tooltip": tooltip }))?
            }
            IpcCommand::Command { command } => {
                let changed = command.apply(&mut session.request);
                serde_json::to_string(&serde_json::json!({
                    "changed": changed,
                    "request": session.request,
                }))?
            }
            IpcCommand::Save => {
                let saved = session.save()?;
                serde_json::to_string(&serde_json::json!({ "saved": saved }))?
            }
        };
        writeln!(stdout, "{reply}")?;
        stdout.flush()?;
    }
    Ok(())
}

fn print_summary(session: &Session) -> Result<()> {
    let history = session.engine.history();
    let chart = session.chart();
    let gridlines = chart.gridlines();
    let gaps = history.with_snapshots(|s| s.iter().filter(|s| s.is_gap_filler()).count());

    println!("=== RUN SUMMARY ===");
    println!("  save_id:        {}", session.save_id);
    println!("  final date:     {}", session.engine.date());
    println!("  snapshots:      {}", history.len());
    println!("  gap months:     {gaps}");
    if let (Some(first), Some(last)) = (history.first_date(), history.last_date()) {
        println!("  history:        {first} .. {last}");
    }
    println!("  stored keys:    {:?}", session.store.keys(&session.save_id)?);

    println!();
    println!("=== {} ({}) ===", chart.heading.to_uppercase(), session.request.window.label());
    if chart.is_empty() {
        println!("  (No history yet)");
        return Ok(());
    }
    println!("  points/curve:   {}", chart.dates.len());
    println!("  value range:    {} .. {}", chart.min_value, chart.max_value);
    for curve in &chart.curves {
        let last = curve.values.iter().rev().flatten().next();
        match last {
            Some(v) => println!("  {:<10} latest {v:.0}", curve.label),
            None => println!("  {:<10} no data", curve.label),
        }
    }
    let years: Vec<&str> = gridlines.years.iter().map(|t| t.label.as_str()).collect();
    let values: Vec<&str> = gridlines.values.iter().map(|t| t.label.as_str()).collect();
    println!("  year lines:     {}", years.join(" "));
    println!("  value lines:    {}", values.join(" "));
    if !chart.windows.is_empty() {
        let windows: Vec<&str> = chart.windows.iter().map(|w| w.label()).collect();
        println!("  windows:        {}", windows.join(", "));
    }
    Ok(())
}

fn arg_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    arg_value(args, flag)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
