use std::fs;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::fmt::SubscriberBuilder;

use montri::prelude::*;

#[derive(Parser)]
#[command(name = "montri")]
#[command(about = "Monotone-polygon triangulation with a replayable step trace")]
struct Cmd {
    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand)]
enum Action {
    /// Triangulate a polygon read from a JSON file ([[x, y], ...])
    Run {
        #[arg(long)]
        input: String,
        /// Print every recorded step after the summary
        #[arg(long, default_value_t = false)]
        steps: bool,
        /// Emit the summary as JSON instead of plain text
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Sample a random x-monotone polygon and print it as JSON
    Gen {
        #[arg(long, default_value_t = 12)]
        vertices: usize,
        #[arg(long, default_value_t = 0)]
        seed: u64,
        /// Draw from the convex family instead of the general monotone one
        #[arg(long, default_value_t = false)]
        convex: bool,
    },
}

fn main() -> Result<()> {
    SubscriberBuilder::default().with_target(false).init();
    let cmd = Cmd::parse();
    match cmd.action {
        Action::Run { input, steps, json } => run(input, steps, json),
        Action::Gen {
            vertices,
            seed,
            convex,
        } => gen(vertices, seed, convex),
    }
}

#[derive(Serialize)]
struct Summary {
    vertices: usize,
    steps: usize,
    diagonals: usize,
    monotone: bool,
    /// Index of the vertex where x-monotonicity failed, if it did.
    violation: Option<usize>,
}

fn run(input: String, steps: bool, json: bool) -> Result<()> {
    let raw = fs::read_to_string(&input).with_context(|| format!("reading {input}"))?;
    let coords: Vec<[f64; 2]> =
        serde_json::from_str(&raw).context("polygon JSON must be [[x, y], ...]")?;
    let points: Vec<Vec2<f64>> = coords.iter().map(|&[x, y]| Vec2::new(x, y)).collect();

    let mut tri = Triangulation::new(&points);
    let outcome = tri.triangulate()?;
    let trace = tri.trace().context("no trace recorded")?;
    tracing::info!(vertices = points.len(), steps = trace.len(), "triangulated");

    if json {
        let summary = Summary {
            vertices: points.len(),
            steps: trace.len(),
            diagonals: outcome.state().diagonals.len(),
            monotone: outcome.is_monotone(),
            violation: match &outcome {
                TriangulationOutcome::NotMonotone { violation, .. } => Some(violation.index),
                TriangulationOutcome::Triangulated(_) => None,
            },
        };
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        match &outcome {
            TriangulationOutcome::Triangulated(state) => {
                println!("{} diagonals:", state.diagonals.len());
                for d in &state.diagonals {
                    println!("  {d}");
                }
            }
            TriangulationOutcome::NotMonotone { violation, .. } => {
                println!("not x-monotone at {violation}; no triangulation");
            }
        }
    }
    if steps {
        for (i, step) in trace.steps().iter().enumerate() {
            println!("{i:4}  {}", step.description);
        }
    }
    Ok(())
}

fn gen(vertices: usize, seed: u64, convex: bool) -> Result<()> {
    let cfg = MonotoneCfg {
        vertex_count: VertexCount::Fixed(vertices),
        ..MonotoneCfg::default()
    };
    let tok = ReplayToken { seed, index: 0 };
    let points = if convex {
        draw_convex_polygon(cfg, tok)
    } else {
        draw_monotone_polygon(cfg, tok)
    };
    let coords: Vec<[f64; 2]> = points.iter().map(|p| [p.x, p.y]).collect();
    println!("{}", serde_json::to_string(&coords)?);
    Ok(())
}
