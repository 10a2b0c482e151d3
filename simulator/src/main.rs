use anyhow::Context;
use clap::Parser;
use gui_bridge::bridge::{gui_bind_address, GuiBridge};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Builder as TokioBuilder;
use tokio::signal;
use tokio::time::{interval, MissedTickBehavior};
use workflow::config::WorkflowConfig;
use workflow::runner::{now_epoch, Runner, TickOutcome};

mod generator;
mod gui_bridge;
mod workflow;

#[derive(Parser)]
#[command(author, version, about = "Conjunction screening workflow driver")]
struct Args {
    /// Run a single detection cycle and emit a summary
    #[arg(long, default_value_t = false)]
    offline: bool,
    /// Load a workflow config from YAML
    #[arg(long)]
    workflow: Option<PathBuf>,
    /// Synthetic catalog size when no workflow file is given
    #[arg(long, default_value_t = 200)]
    objects: usize,
    #[arg(long, default_value_t = 0)]
    seed: u64,
    #[arg(long, default_value_t = 30)]
    steps: usize,
    #[arg(long, default_value_t = 1)]
    workers: usize,
    /// Simulate the debris cascade for the conjunction at this rank
    #[arg(long)]
    cascade: Option<usize>,
    /// Keep the report bridge alive and refresh the screening periodically
    #[arg(long, default_value_t = false)]
    serve: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let workflow_config = if let Some(path) = args.workflow {
        WorkflowConfig::load(path)?
    } else {
        WorkflowConfig::from_args(args.objects, args.seed, args.steps, args.workers)
    };

    let runner = Arc::new(Runner::new(workflow_config.clone())?);
    let gui_bridge = GuiBridge::new(runner.clone());
    let catalog = runner.build_catalog()?;
    gui_bridge.set_catalog(catalog.clone());

    if args.offline {
        let report = runner.screen(&catalog, now_epoch()?)?;

        println!(
            "Offline run -> objects {}, candidates {}/{}, conjunctions {} of {} qualifying ({:?})",
            report.objects,
            report.candidate_pairs,
            report.pairs_considered,
            report.conjunctions.len(),
            report.qualifying,
            report.status
        );
        for (rank, conjunction) in report.conjunctions.iter().enumerate() {
            println!(
                "  #{} {} x {} -> {} miss {:.3} km, rel {:.2} km/s, in {:.1} min",
                rank,
                conjunction.primary_name,
                conjunction.secondary_name,
                conjunction.risk_tier,
                conjunction.miss_distance_km,
                conjunction.relative_velocity_km_s,
                conjunction.time_to_closest_approach_min
            );
        }
        gui_bridge.publish(&report)?;

        let mut cascade_note = String::from("none");
        if let Some(index) = args.cascade {
            let cascade = runner.cascade(&report, index, &catalog, workflow_config.cascade_seed)?;
            println!(
                "Cascade #{} -> fragments {}, mean size {:.3}, threatened objects {}",
                index,
                cascade.summary.fragment_count,
                cascade.summary.mean_fragment_size,
                cascade.summary.threatened_objects
            );
            for impact in &cascade.impacts {
                println!(
                    "  {} ({}) {:.1} km -> {}",
                    impact.object_name, impact.reason, impact.nearest_fragment_km, impact.risk_level
                );
            }
            cascade_note = format!(
                "#{} fragments={} impacts={}",
                index, cascade.summary.fragment_count, cascade.summary.threatened_objects
            );
            gui_bridge.publish_cascade(&cascade);
        }
        gui_bridge.publish_status("Offline screening results ready.");

        let report_line = format!(
            "epoch={:.0} objects={} candidates={} qualifying={} reported={} status={:?} elapsed_ms={} cascade={}\n",
            report.epoch,
            report.objects,
            report.candidate_pairs,
            report.qualifying,
            report.conjunctions.len(),
            report.status,
            report.elapsed_ms,
            cascade_note
        );
        let report_path = PathBuf::from("tools/data/offline_screening.log");
        if let Some(parent) = report_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&report_path)
            .with_context(|| format!("opening {}", report_path.display()))?;
        file.write_all(report_line.as_bytes())?;
    }

    if args.serve {
        gui_bridge.serve(gui_bind_address());
        gui_bridge.publish_status("HTTP bridge running (Ctrl+C to stop)...");
        let runtime = TokioBuilder::new_multi_thread()
            .enable_all()
            .build()
            .context("creating runtime for refresh loop")?;
        let refresh = Duration::from_secs(workflow_config.refresh_secs.max(1));
        runtime.block_on(async {
            let mut ticker = interval(refresh);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            let shutdown = signal::ctrl_c();
            tokio::pin!(shutdown);
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        let worker = runner.clone();
                        let catalog = gui_bridge.catalog();
                        let epoch = now_epoch()?;
                        let outcome =
                            tokio::task::spawn_blocking(move || worker.tick(&catalog, epoch))
                                .await
                                .context("joining detection cycle")??;
                        match outcome {
                            TickOutcome::Screened(report) => gui_bridge.publish(&report)?,
                            TickOutcome::Skipped => log::debug!("refresh tick skipped"),
                        }
                        log::debug!("screening metrics {:?}", runner.metrics());
                    }
                    result = &mut shutdown => {
                        result.context("awaiting Ctrl+C to exit")?;
                        break;
                    }
                }
            }
            Ok::<(), anyhow::Error>(())
        })?;
    }

    if !args.offline && !args.serve {
        log::info!("nothing to do: pass --offline and/or --serve");
    }

    Ok(())
}
