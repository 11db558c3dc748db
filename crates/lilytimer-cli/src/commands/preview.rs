use clap::{Args, ValueEnum};
use lilytimer_core::{derive_stage, format_remaining, Phase};
use serde::Serialize;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum PhaseArg {
    Idle,
    Working,
    Break,
}

impl From<PhaseArg> for Phase {
    fn from(arg: PhaseArg) -> Self {
        match arg {
            PhaseArg::Idle => Phase::Idle,
            PhaseArg::Working => Phase::Working,
            PhaseArg::Break => Phase::Break,
        }
    }
}

#[derive(Args)]
pub struct PreviewArgs {
    /// Work interval length in seconds
    #[arg(long)]
    work: u64,
    /// Seconds left in the current phase
    #[arg(long)]
    remaining: u64,
    /// Phase to preview
    #[arg(long, value_enum, default_value = "working")]
    phase: PhaseArg,
}

#[derive(Serialize)]
struct Preview {
    phase: Phase,
    stage: lilytimer_core::Stage,
    asset: &'static str,
    display: String,
}

fn preview(args: &PreviewArgs) -> Preview {
    let phase = Phase::from(args.phase);
    let stage = derive_stage(args.work, args.remaining, phase);
    Preview {
        phase,
        stage,
        asset: stage.asset_name(),
        display: format_remaining(args.remaining),
    }
}

pub fn run(args: PreviewArgs) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(&preview(&args))?);
    Ok(())
}
