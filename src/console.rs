use crate::config::Config;
use crate::dataset;
use crate::error::Error;
use crate::flight::Flight;
use crate::query;
use crate::schedule::schedule::Schedule;
use crate::schedule::shift::ShiftParams;
use colored::Colorize;
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::{Context, Editor, Helper, Highlighter, Hinter, Validator};
use std::io::Write;
use std::process::{Command, Stdio};
use tabled::settings::Style;
use tabled::{Table, Tabled};

const PAGE_ROWS: usize = 20;

#[derive(Helper, Hinter, Highlighter, Validator)]
pub struct CompleteHelper {
    pub commands: Vec<String>,
}

impl Completer for CompleteHelper {
    type Candidate = Pair;

    fn complete(&self, line: &str, _pos: usize, _ctx: &Context<'_>) -> rustyline::Result<(usize, Vec<Pair>)> {
        let candidates = self
            .commands
            .iter()
            .filter(|cmd| cmd.starts_with(line))
            .map(|cmd| Pair {
                display: cmd.clone(),
                replacement: format!("{} ", cmd),
            })
            .collect();
        Ok((0, candidates))
    }
}

#[derive(Tabled)]
struct FlightRow {
    #[tabled(rename = "Flight")]
    id: String,
    #[tabled(rename = "Airline")]
    airline: String,
    #[tabled(rename = "Aircraft")]
    aircraft: String,
    #[tabled(rename = "Destination")]
    destination: String,
    #[tabled(rename = "Scheduled")]
    departure: String,
    #[tabled(rename = "Delay")]
    delay: String,
}

impl From<&Flight> for FlightRow {
    fn from(f: &Flight) -> Self {
        FlightRow {
            id: f.id.to_string(),
            airline: f.airline.to_string(),
            aircraft: f.aircraft_id.to_string(),
            destination: f.destination.to_string(),
            departure: f.scheduled_departure.to_string(),
            delay: format_delay(f.delay_minutes),
        }
    }
}

#[derive(Tabled)]
struct CascadeRow {
    #[tabled(rename = "Flight")]
    id: String,
    #[tabled(rename = "Aircraft")]
    aircraft: String,
    #[tabled(rename = "Scheduled")]
    departure: String,
    #[tabled(rename = "Delay")]
    delay: String,
    #[tabled(rename = "Downstream")]
    downstream: usize,
    #[tabled(rename = "Score")]
    score: i64,
}

#[derive(Tabled)]
struct SlotRow {
    #[tabled(rename = "Slot")]
    slot: String,
    #[tabled(rename = "Flights")]
    count: usize,
}

fn format_delay(delay: Option<i64>) -> String {
    delay.map_or_else(|| "-".to_string(), |d| d.to_string())
}

fn paginate(content: &str) -> std::io::Result<()> {
    let mut pager = Command::new("less")
        .arg("-R")
        .stdin(Stdio::piped())
        .spawn()
        // Fallback to 'more' if 'less' isn't available
        .or_else(|_| Command::new("more").stdin(Stdio::piped()).spawn())?;

    if let Some(mut stdin) = pager.stdin.take() {
        if let Err(e) = stdin.write_all(content.as_bytes()) {
            // Broken pipe is common if the user quits the pager early
            if e.kind() != std::io::ErrorKind::BrokenPipe {
                return Err(e);
            }
        }
    }

    // Wait for the user to close the pager before returning to the ">> " prompt
    pager.wait().map(|_| ())
}

fn print_table<T: Tabled>(rows: Vec<T>) {
    if rows.is_empty() {
        println!("No matching flights found.");
        return;
    }
    let len = rows.len();
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    table.with(tabled::settings::Alignment::left());
    let rendered = table.to_string();
    if len > PAGE_ROWS {
        if let Err(e) = paginate(&rendered) {
            eprintln!("{} {}", "Pager unavailable:".yellow(), e);
            println!("{}", rendered);
        }
    } else {
        println!("{}", rendered);
    }
}

fn arg<T: std::str::FromStr>(parts: &[&str], idx: usize, default: T) -> Result<T, String> {
    match parts.get(idx) {
        None => Ok(default),
        Some(raw) => raw
            .parse::<T>()
            .map_err(|_| format!("invalid value '{}'", raw)),
    }
}

/// Interactive session over one loaded copy of the dataset; `reload` re-reads it.
pub struct Console {
    config: Config,
    flights: Vec<Flight>,
}

impl Console {
    pub fn new(config: Config) -> Result<Self, Error> {
        let flights = dataset::load_flights(&config.dataset_path)?;
        Ok(Console { config, flights })
    }

    pub fn run(&mut self) -> Result<(), Error> {
        println!(
            "Tower online. Loaded {} flights from {}",
            self.flights.len(),
            self.config.dataset_path.display()
        );

        let rl_config = rustyline::Config::builder()
            .history_ignore_space(true)
            .completion_type(rustyline::CompletionType::List)
            .build();

        let helper = CompleteHelper {
            commands: ["ls", "top", "optimize", "slots", "stats", "reload", "help", "exit"]
                .iter()
                .map(|c| c.to_string())
                .collect(),
        };

        let mut rl = Editor::with_config(rl_config)?;
        rl.set_helper(Some(helper));

        loop {
            match rl.readline(">> ") {
                Ok(line) => {
                    let trimmed = line.trim();
                    if trimmed.is_empty() {
                        continue;
                    }
                    rl.add_history_entry(trimmed)?;

                    let parts: Vec<&str> = trimmed.split_whitespace().collect();
                    if matches!(parts[0], "exit" | "quit") {
                        break;
                    }
                    if let Err(message) = self.execute(&parts) {
                        println!("{}", message.red());
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    println!("CTRL-C");
                    break;
                }
                Err(ReadlineError::Eof) => {
                    println!("CTRL-D");
                    break;
                }
                Err(err) => return Err(err.into()),
            }
        }
        Ok(())
    }

    fn execute(&mut self, parts: &[&str]) -> Result<(), String> {
        let cascade = self.config.cascade;
        match parts[0] {
            "ls" => {
                let needle = parts[1..].join(" ");
                let rows = query::search_flights(&self.flights, &needle, usize::MAX)
                    .into_iter()
                    .map(FlightRow::from)
                    .collect();
                print_table::<FlightRow>(rows);
            }
            "top" => {
                let window = arg(parts, 1, cascade.window_min)?;
                let top = arg(parts, 2, 10usize)?;
                let schedule = Schedule::new(self.flights.clone());
                let rows = schedule
                    .top_cascade(i64::from(window), top)
                    .iter()
                    .map(|s| CascadeRow {
                        id: s.flight.id.to_string(),
                        aircraft: s.flight.aircraft_id.to_string(),
                        departure: s.flight.scheduled_departure.to_string(),
                        delay: format_delay(s.flight.delay_minutes),
                        downstream: s.downstream,
                        score: s.score,
                    })
                    .collect();
                print_table::<CascadeRow>(rows);
            }
            "optimize" => {
                let defaults = cascade.shift_params();
                let params = ShiftParams {
                    max_shift: arg(parts, 1, defaults.max_shift)?,
                    step: arg(parts, 2, defaults.step)?,
                    ..defaults
                };
                params.validate().map_err(|e| e.to_string())?;
                let schedule = Schedule::new(self.flights.clone());
                match schedule.suggest_shift(params) {
                    None => println!("{}", "No flights loaded.".yellow()),
                    Some(s) if s.suggested_shift == 0 => println!(
                        "Flight {} (scheduled {}, score {}): no shift within ±{} min improves it.",
                        s.flight.bold(),
                        s.orig_time,
                        s.orig_score,
                        params.max_shift.saturating_abs()
                    ),
                    Some(s) => println!(
                        "Flight {} (scheduled {}, score {}): shift {:+} min to {} for score {}.",
                        s.flight.bold(),
                        s.orig_time,
                        s.orig_score,
                        s.suggested_shift,
                        s.suggested_time,
                        s.new_score.to_string().green()
                    ),
                }
            }
            "slots" => {
                let hours = arg(parts, 1, 1u32)?;
                if hours == 0 {
                    return Err("Slot width must be at least 1 hour.".to_string());
                }
                let top = arg(parts, 2, 12usize)?;
                let slots = query::busiest_slots(&self.flights, hours, top);
                let rows = slots
                    .labels
                    .into_iter()
                    .zip(slots.data)
                    .map(|(slot, count)| SlotRow { slot, count })
                    .collect();
                print_table::<SlotRow>(rows);
            }
            "stats" => {
                let stats = query::delay_stats(&self.flights, self.config.delayed_threshold_min);
                let fmt = |v: Option<f64>| v.map_or_else(|| "-".to_string(), |v| format!("{:.1}", v));
                println!("Flights: {}", stats.total_flights);
                println!(
                    "Delayed (> {} min): {}",
                    self.config.delayed_threshold_min, stats.delayed_flights
                );
                println!("Mean delay: {} min", fmt(stats.avg_delay_min));
                println!("Median delay: {} min", fmt(stats.median_delay_min));
                for airline in stats.by_airline {
                    println!("  {:<24} {} min", airline.airline, fmt(airline.mean_delay));
                }
            }
            "reload" => {
                self.flights = dataset::load_flights(&self.config.dataset_path).map_err(|e| e.to_string())?;
                println!("Reloaded {} flights.", self.flights.len());
            }
            "help" | "?" => {
                println!("\nAvailable Commands:");
                println!("  ls [text]               - List flights, optionally filtered by id, airline or destination");
                println!("  top [window] [n]        - Top <n> flights by cascade score within <window> minutes");
                println!("  optimize [max] [step]   - Suggest a departure shift for the worst cascading flight");
                println!("  slots [hours] [n]       - Busiest departure slots of <hours> width");
                println!("  stats                   - Delay summary overall and per airline");
                println!("  reload                  - Re-read the dataset from disk");
                println!("  help / ?                - Show this help menu");
                println!("  exit / quit             - Exit the console\n");
            }
            other => return Err(format!("Unknown command: {}", other)),
        }
        Ok(())
    }
}
