//! Line-oriented event loop standing in for the UI controls.
//!
//! ```text
//! type difference | var tmin | day 3 | click 412 230 | clear
//! save frame.png  | legend   | range | quit
//! ```

use std::fs;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{anyhow, bail, Context, Result};
use met_common::Variable;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::warn;
use viewer::{ControlEvent, Frame, Session};

use crate::view;

#[derive(Debug, Clone, PartialEq)]
enum Input {
    Event(ControlEvent),
    Click { x: f64, y: f64 },
    Save(PathBuf),
    SaveLegend(PathBuf),
    Legend,
    Range,
    Quit,
}

impl FromStr for Input {
    type Err = anyhow::Error;

    fn from_str(line: &str) -> Result<Self> {
        let mut parts = line.split_whitespace();
        let command = parts.next().ok_or_else(|| anyhow!("empty command"))?;
        let args: Vec<&str> = parts.collect();
        let arg = |i: usize| nth_arg(&args, command, i);

        let input = match command {
            "type" => Input::Event(ControlEvent::SetDataType(arg(0)?.parse()?)),
            "var" => Input::Event(ControlEvent::SetVariable(arg(0)?.parse::<Variable>()?)),
            "day" => Input::Event(ControlEvent::SetDay(
                arg(0)?.parse().context("day must be a non-negative integer")?,
            )),
            "click" => Input::Click {
                x: arg(0)?.parse().context("x must be a number")?,
                y: arg(1)?.parse().context("y must be a number")?,
            },
            "clear" => Input::Event(ControlEvent::ClearPoint),
            "save" => Input::Save(PathBuf::from(arg(0)?)),
            "legend" => match args.first() {
                Some(path) => Input::SaveLegend(PathBuf::from(path)),
                None => Input::Legend,
            },
            "range" => Input::Range,
            "quit" | "exit" => Input::Quit,
            other => bail!("unknown command '{}'", other),
        };
        Ok(input)
    }
}

fn nth_arg<'a>(args: &[&'a str], command: &str, i: usize) -> Result<&'a str> {
    args.get(i)
        .copied()
        .ok_or_else(|| anyhow!("'{}' needs {} argument(s)", command, i + 1))
}

fn report(frame: &Frame) {
    let range = frame
        .range
        .map(|r| format!("[{}, {}]", r.min, r.max))
        .unwrap_or_else(|| "none".to_string());
    println!(
        "{} | range {} | {} cells",
        frame.selection,
        range,
        frame.painted_cells()
    );
}

/// Handle one input. Returns `false` on `quit`.
fn handle(session: &mut Session, input: Input) -> Result<bool> {
    match input {
        Input::Event(event) => report(&session.apply(event)?),
        Input::Click { x, y } => match session.click(x, y) {
            Some(series) => println!("{}", serde_json::to_string(&series)?),
            None => println!("no cell at ({}, {})", x, y),
        },
        Input::Save(path) => {
            let png = session.render()?.encode_png()?;
            fs::write(&path, png).with_context(|| format!("Failed to write {}", path.display()))?;
            println!("saved {}", path.display());
        }
        Input::SaveLegend(path) => view::write_legend(session, &path)?,
        Input::Legend => match session.legend() {
            Some(legend) => println!("{}", serde_json::to_string(&legend)?),
            None => println!("no legend"),
        },
        Input::Range => {
            let selection = session.store().selection();
            match session.store().current_range() {
                Some(r) => println!("{} {} {}", selection.data_type, r.min, r.max),
                None => println!("{} none", selection.data_type),
            }
        }
        Input::Quit => return Ok(false),
    }
    Ok(true)
}

pub async fn run(session: &mut Session) -> Result<()> {
    report(&session.render()?);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let input = match line.parse::<Input>() {
            Ok(input) => input,
            Err(e) => {
                println!("error: {}", e);
                continue;
            }
        };
        match handle(session, input) {
            Ok(true) => {}
            Ok(false) => break,
            Err(e) => {
                warn!(error = %e, "Command failed");
                println!("error: {:#}", e);
            }
        }
    }
    session.teardown();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use met_common::DataType;
    use test_utils::fixtures::tiny_dataset;
    use viewer::{LoadOutcome, ViewerConfig};

    fn loaded_session() -> Session {
        let mut session = Session::new(ViewerConfig::default()).unwrap();
        let token = session.begin_load();
        session.finish_load(
            token,
            LoadOutcome {
                dataset: Ok(tiny_dataset()),
                boundary: None,
            },
        );
        session
    }

    #[test]
    fn test_parse_events() {
        assert_eq!(
            "type diff".parse::<Input>().unwrap(),
            Input::Event(ControlEvent::SetDataType(DataType::Difference))
        );
        assert_eq!(
            "var geopotential_500".parse::<Input>().unwrap(),
            Input::Event(ControlEvent::SetVariable(Variable::Geopotential500))
        );
        assert_eq!(
            "day 2".parse::<Input>().unwrap(),
            Input::Event(ControlEvent::SetDay(2))
        );
        assert_eq!(
            "click 10.5 20".parse::<Input>().unwrap(),
            Input::Click { x: 10.5, y: 20.0 }
        );
        assert_eq!("legend".parse::<Input>().unwrap(), Input::Legend);
        assert_eq!("quit".parse::<Input>().unwrap(), Input::Quit);
    }

    #[test]
    fn test_parse_errors() {
        assert!("".parse::<Input>().is_err());
        assert!("day".parse::<Input>().is_err());
        assert!("day -1".parse::<Input>().is_err());
        assert!("var snow".parse::<Input>().is_err());
        assert!("click 1".parse::<Input>().is_err());
        assert!("zoom 2".parse::<Input>().is_err());
    }

    #[test]
    fn test_handle_events() {
        let mut session = loaded_session();
        assert!(handle(&mut session, Input::Event(ControlEvent::SetDay(1))).unwrap());
        assert_eq!(session.store().selection().day, 1);
        assert!(handle(&mut session, Input::Event(ControlEvent::SetDay(7))).is_err());
        assert!(handle(&mut session, Input::Range).unwrap());
        assert!(!handle(&mut session, Input::Quit).unwrap());
    }
}
