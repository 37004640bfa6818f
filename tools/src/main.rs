//! sim-runner: headless simulation runner.
//!
//! Usage:
//!   sim-runner --seed 12345 --ticks 200 --minutes-per-tick 10
//!   sim-runner --seed 12345 --ipc-mode
//!   sim-runner --seed 12345 --config balance.json

use anyhow::Result;
use kingpin_core::{PlayerCommand, SimConfig, SimEngine, WorldSnapshot};
use std::env;
use std::io::{self, BufRead, Write};
use uuid::Uuid;

#[derive(serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum IpcCommand {
    GetState,
    Tick { count: u64, minutes: f64 },
    Command { command: PlayerCommand },
    Quit,
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let seed = parse_arg(&args, "--seed", 42u64);
    let ticks = parse_arg(&args, "--ticks", 200u64);
    let minutes_per_tick = parse_arg(&args, "--minutes-per-tick", 10.0f64);
    let ipc_mode = args.iter().any(|a| a == "--ipc-mode");
    let config = match args.windows(2).find(|w| w[0] == "--config") {
        Some(w) => SimConfig::load(&w[1])?,
        None => SimConfig::default_balance(),
    };

    let run_id = format!("run-{seed}-{}", Uuid::new_v4());
    let mut engine = SimEngine::new(run_id.clone(), seed, config)?;

    if ipc_mode {
        run_ipc_loop(&mut engine)?;
    } else {
        println!("kingpin sim-runner");
        println!("  run_id:  {run_id}");
        println!("  seed:    {seed}");
        println!("  ticks:   {ticks} x {minutes_per_tick} min");
        println!();
        engine.run_ticks(ticks, minutes_per_tick)?;
        print_summary(&engine);
    }

    Ok(())
}

fn parse_arg<T: std::str::FromStr>(args: &[String], flag: &str, default: T) -> T {
    args.windows(2)
        .find(|w| w[0] == flag)
        .and_then(|w| w[1].parse().ok())
        .unwrap_or(default)
}

fn run_ipc_loop(engine: &mut SimEngine) -> Result<()> {
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

        match cmd {
            IpcCommand::Quit => break,
            IpcCommand::Tick { count, minutes } => {
                engine.run_ticks(count, minutes)?;
                let snapshot = WorldSnapshot::take(engine);
                writeln!(stdout, "{}", serde_json::to_string(&snapshot)?)?;
            }
            IpcCommand::GetState => {
                let snapshot = WorldSnapshot::take(engine);
                writeln!(stdout, "{}", serde_json::to_string(&snapshot)?)?;
            }
            IpcCommand::Command { command } => {
                // Expected rejections go back to the UI as a reason
                // string, not an aborted run.
                let response = match engine.execute(command) {
                    Ok(outcome) => serde_json::json!({
                        "success": true,
                        "outcome": outcome,
                    }),
                    Err(e) => serde_json::json!({
                        "success": false,
                        "reason": e.to_string(),
                    }),
                };
                writeln!(stdout, "{}", response)?;
            }
        }
        stdout.flush()?;
    }
    Ok(())
}

fn print_summary(engine: &SimEngine) {
    let world = engine.world();
    let clock = engine.clock();

    let total_revenue: i64 = engine
        .event_log()
        .iter()
        .filter(|e| e.event_type == "sale_completed")
        .filter_map(|e| serde_json::from_str::<serde_json::Value>(&e.payload).ok())
        .filter_map(|v| v["revenue"].as_i64())
        .sum();
    let sales = engine
        .event_log()
        .iter()
        .filter(|e| e.event_type == "sale_completed")
        .count();
    let churned = engine
        .event_log()
        .iter()
        .filter(|e| e.event_type == "customer_churned")
        .count();

    println!("=== RUN SUMMARY ===");
    println!("  final tick:   {}", clock.current_tick);
    println!("  game minutes: {:.0}", clock.minutes);
    println!("  cash:         ${}", world.cash());
    println!("  customers:    {}", world.customers.len());
    println!("  churned:      {churned}");
    println!("  workers:      {}", world.workers.len());
    println!("  sales:        {sales}");
    println!("  revenue:      ${total_revenue}");
    println!("  seeds held:   {}", world.inventory.seeds().len());
    println!("  grams held:   {:.1}", world.inventory.total_grams_all());
    println!("  events:       {}", engine.event_log().len());

    println!();
    println!("=== RECENT ACTIVITY ===");
    let entries: Vec<_> = world.activity.entries().collect();
    for entry in entries.iter().rev().take(10).rev() {
        println!("  [t{:>4}] {}", entry.tick, entry.message);
    }
}
