//! Line-oriented command loop
//!
//! One command per line. `wait <ms>` feeds elapsed time to the scheduler so
//! `start`/`stop`/`interval` can be exercised without a real clock.

use std::io::BufRead;
use std::str::FromStr;

use anyhow::{anyhow, bail, Context, Result};
use pizza_shop_core_rs::{ManualScheduler, SimulationEngine};
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayCommand {
    Step(u64),
    Wait(u64),
    Make,
    Send,
    Buy(String),
    Interval(u64),
    Start,
    Stop,
    Reset,
    Quit,
}

impl FromStr for PlayCommand {
    type Err = anyhow::Error;

    fn from_str(line: &str) -> Result<Self> {
        let mut words = line.split_whitespace();
        let verb = words.next().ok_or_else(|| anyhow!("empty command"))?;
        let arg = words.next();

        let number = |arg: Option<&str>, what: &str| -> Result<u64> {
            let raw = arg.ok_or_else(|| anyhow!("missing {}", what))?;
            raw.parse::<u64>()
                .with_context(|| format!("invalid {}: {}", what, raw))
        };

        let command = match verb {
            "step" => match arg {
                Some(_) => PlayCommand::Step(number(arg, "tick count")?),
                None => PlayCommand::Step(1),
            },
            "wait" => PlayCommand::Wait(number(arg, "milliseconds")?),
            "make" => PlayCommand::Make,
            "send" => PlayCommand::Send,
            "buy" => PlayCommand::Buy(
                arg.ok_or_else(|| anyhow!("missing car id"))?
                    .to_string(),
            ),
            "interval" => PlayCommand::Interval(number(arg, "milliseconds")?),
            "start" => PlayCommand::Start,
            "stop" => PlayCommand::Stop,
            "reset" => PlayCommand::Reset,
            "quit" | "exit" => PlayCommand::Quit,
            other => bail!("unknown command: {}", other),
        };
        Ok(command)
    }
}

/// Apply one command; returns false when the loop should end
pub fn apply(
    engine: &mut SimulationEngine,
    scheduler: &ManualScheduler,
    command: PlayCommand,
) -> bool {
    match command {
        PlayCommand::Step(count) => {
            for _ in 0..count {
                engine.step();
            }
        }
        PlayCommand::Wait(elapsed_ms) => {
            for _ in 0..scheduler.advance(elapsed_ms) {
                engine.step();
            }
        }
        PlayCommand::Make => {
            engine.make_pizza();
        }
        PlayCommand::Send => {
            engine.send_worker();
        }
        PlayCommand::Buy(car_id) => {
            engine.buy_car(&car_id);
        }
        PlayCommand::Interval(interval_ms) => {
            engine.set_interval_ms(interval_ms);
        }
        PlayCommand::Start => {
            engine.start();
        }
        PlayCommand::Stop => {
            engine.stop();
        }
        PlayCommand::Reset => {
            engine.reset();
        }
        PlayCommand::Quit => return false,
    }
    true
}

pub fn play(
    engine: &mut SimulationEngine,
    scheduler: &ManualScheduler,
    input: impl BufRead,
) -> Result<()> {
    for line in input.lines() {
        let line = line.context("failed to read stdin")?;
        if line.trim().is_empty() {
            continue;
        }

        match line.parse::<PlayCommand>() {
            Ok(command) => {
                if !apply(engine, scheduler, command) {
                    break;
                }
            }
            Err(err) => warn!(error = %err, "ignoring input line"),
        }
    }
    Ok(())
}
