#![warn(clippy::unwrap_in_result, clippy::unwrap_used)]
#![warn(
    rust_2018_idioms,
    rust_2021_compatibility,
    arithmetic_overflow,
    nonstandard_style,
    clippy::disallowed_types,
    clippy::nursery,
)]
use std::{
    io::BufReader,
    path::{Path, PathBuf},
    time::{Duration, Instant},
};

use aeronav::{
    common::{FormatFloat, FormatNum, RelativeTime},
    network::Network,
    registry::Airport,
    route::{Metric, Router},
};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use color_eyre::eyre::{eyre, Context, Result};
use fs_err::File;
use human_repr::{HumanCount, HumanDuration};
use serde::Deserialize;
use tracing::*;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use yansi::{Paint, Style};

/// Airport reference: ":" prefixed code or airport name (bare numbers are
/// treated as codes)
#[derive(Debug, Clone, parse_display::Display, parse_display::FromStr)]
enum AirportRef {
    #[display(":{0}")]
    Code(u32),
    #[display("{0}")]
    Name(String),
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
enum MetricArg {
    /// Minimize the total distance in kilometers
    Distance,
    /// Minimize the total flight time in hours
    FlightTime,
}

impl From<MetricArg> for Metric {
    fn from(val: MetricArg) -> Self {
        match val {
            MetricArg::Distance => Self::Distance,
            MetricArg::FlightTime => Self::FlightTime,
        }
    }
}

/// Network description consumed by every subcommand. Airports are
/// registered in file order (so they get codes 1..=n), routes go through
/// the same validation as programmatic callers.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct NetworkFile {
    airports: Vec<AirportEntry>,
    #[serde(default)]
    routes: Vec<RouteEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct AirportEntry {
    name: String,
    location: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RouteEntry {
    from: u32,
    to: u32,
    distance: f32,
    flight_time: f32,
}

impl NetworkFile {
    fn build(&self) -> Result<Network> {
        let mut network = Network::default();
        for AirportEntry { name, location } in &self.airports {
            network.add_airport(name, location)?;
        }
        for &RouteEntry { from, to, distance, flight_time } in &self.routes {
            network.add_route(from, to, distance, flight_time)?;
        }
        Ok(network)
    }
}

#[derive(Subcommand, Debug, Clone)]
enum Command {
    /// List registered airports
    Airports {
        /// Network description file (JSON)
        network: PathBuf,
    },
    /// List every route with both of its weights
    Routes {
        /// Network description file (JSON)
        network: PathBuf,
    },
    /// Compute the cheapest route between two airports
    Route {
        /// Network description file (JSON)
        network: PathBuf,
        /// Weight attribute to minimize
        #[arg(short, long, value_enum, default_value_t = MetricArg::Distance)]
        metric: MetricArg,
        /// Don't print the computed route hop by hop (mostly useful for
        /// benchmarks and testing)
        #[arg(long, short)]
        quiet: bool,
        /// Origin: ":" prefixed code, bare code or airport name
        from: AirportRef,
        /// Destination: ":" prefixed code, bare code or airport name
        to: AirportRef,
    },
}

#[derive(Parser, Debug)]
#[command(about, version, long_about = None)]
struct Cli {
    /// Minimum time between printing progress updates
    #[arg(short, long, default_value_t = 0.5)]
    progress_interval: f64,
    /// Command to run
    #[command(subcommand)]
    cmd: Option<Command>,
}

fn load_network(path: &Path) -> Result<Network> {
    let t_load = Instant::now();
    let file: NetworkFile =
        serde_json::from_reader(BufReader::new(File::open(path)?))
            .with_context(|| {
                format!("Error loading network from {}", path.display())
            })?;
    let network = file.build()?;
    info!(
        "{network} loaded from [{path}] in {dt}",
        path = path.display(),
        dt = t_load.elapsed().human_duration()
    );
    Ok(network)
}

fn resolve(network: &Network, ent: &AirportRef) -> Result<u32> {
    let mut ent = ent.clone();
    if let AirportRef::Name(name) = &ent {
        if let Ok(code) = name.parse() {
            ent = AirportRef::Code(code);
        }
    }
    match &ent {
        AirportRef::Code(code) => {
            network.airport(*code)?;
            Ok(*code)
        }
        AirportRef::Name(name) => network
            .airport_by_name(name)
            .map(|airport| airport.code)
            .ok_or_else(|| eyre!("no airport named {name:?} is registered")),
    }
}

fn print_airport_match(ent: &AirportRef, airport: &Airport) {
    if let AirportRef::Name(name) = ent {
        if name == &airport.name {
            info!("{airport} [EXACT MATCH]", airport = airport.green());
        } else {
            info!(
                "{name} => {airport}",
                name = name.yellow(),
                airport = airport.green(),
            );
        }
    } else {
        info!("{ent} => {airport}");
    }
}

fn print_airports(network: &Network) {
    info!(
        "{count} airport(s) registered",
        count = network.airport_count().format_num()
    );
    for airport in network.list_airports() {
        println!(
            "{code:>4}  {name} ({location})",
            code = airport.code,
            name = airport.name.green(),
            location = airport.location.dim(),
        );
    }
}

fn print_routes(network: &Network) -> Result<()> {
    info!(
        "{count} route(s) registered",
        count = network.route_count().format_num()
    );
    for (from, edge) in network.routes() {
        println!(
            "{a} <-> {b}: {dist}, {time}",
            a = network.airport(from)?.green(),
            b = network.airport(edge.to)?.green(),
            dist = edge.distance.human_count("km"),
            time = edge.flight_time.human_count("h"),
        );
    }
    Ok(())
}

fn print_route(
    network: &Network,
    path: &[u32],
    cost: f32,
    metric: Metric,
    dt: Duration,
    quiet: bool,
) -> Result<()> {
    info!(
        "Route computed in {dt}: {stops} stop(s), {cost} {unit}",
        dt = dt.human_duration(),
        stops = path.len().format_num(),
        cost = cost.format_float(),
        unit = metric.unit()
    );
    if quiet {
        return Ok(());
    }
    for (n, &code) in path.iter().enumerate() {
        let airport = network.airport(code)?;
        let leg = path.get(n + 1).and_then(|&next| {
            network.neighbours(code).iter().find(|edge| edge.to == next)
        });
        let style = if n == 0 || n == path.len() - 1 {
            Style::new().bold()
        } else {
            Style::new()
        };
        let name = airport.name.paint(style);
        let location = airport.location.paint(style.dim());
        match leg {
            Some(edge) => println!(
                " {n}  {name} (#{code}, {location}) {weight}",
                weight = metric.weight(edge).human_count(metric.unit())
            ),
            None => println!(" {n}  {name} (#{code}, {location})"),
        }
    }
    Ok(())
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .event_format(fmt::format().with_ansi(yansi::is_enabled()))
                .with_timer(RelativeTime::default())
                .compact(),
        )
        .with(
            EnvFilter::try_from_env("AERONAV_LOG")
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
}

fn main() -> Result<()> {
    use yansi::Condition;
    color_eyre::install()?;
    yansi::whenever(Condition::DEFAULT);
    run()
}

fn run() -> Result<()> {
    let args = Cli::parse();
    init_tracing();
    let Some(cmd) = args.cmd else {
        Cli::command().print_long_help()?;
        return Ok(());
    };
    match cmd {
        Command::Airports { network } => {
            let network = load_network(&network)?;
            print_airports(&network);
        }
        Command::Routes { network } => {
            let network = load_network(&network)?;
            print_routes(&network)?;
        }
        Command::Route { network, metric, quiet, from, to } => {
            let network = load_network(&network)?;
            let metric = Metric::from(metric);
            let src = resolve(&network, &from)?;
            let dst = resolve(&network, &to)?;
            print_airport_match(&from, network.airport(src)?);
            print_airport_match(&to, network.airport(dst)?);
            let mut router = Router::new(network);
            router.status_interval =
                Duration::from_secs_f64(args.progress_interval);
            let t_route = Instant::now();
            let (path, cost) = router.shortest_path(src, dst, metric)?;
            print_route(
                router.network(),
                &path,
                cost,
                metric,
                t_route.elapsed(),
                quiet,
            )?;
        }
    }
    Ok(())
}
