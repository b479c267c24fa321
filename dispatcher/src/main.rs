use anyhow::Context;
use bridge::client::ReliefClient;
use clap::Parser;
use floodcore::allocation::{RankedCluster, RankingQuery};
use floodcore::dashboard::LoadOutcome;
use floodcore::SystemClock;
use generator::clusters::{generate_records, render_batch, GeneratorConfig};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::runtime::Builder as TokioBuilder;
use tokio::signal;
use workflow::config::DispatchConfig;
use workflow::runner::Runner;

mod bridge;
mod generator;
mod workflow;

#[derive(Parser)]
#[command(author, version, about = "Flood-relief dispatch driver and API server")]
struct Args {
    /// Load a dispatch config from YAML
    #[arg(long)]
    config: Option<PathBuf>,
    /// Detection batch (delimited text, header row first)
    #[arg(long)]
    detections: Option<PathBuf>,
    /// Inventory file updated when stock is added
    #[arg(long)]
    inventory: Option<PathBuf>,
    #[arg(long)]
    bind: Option<SocketAddr>,
    /// Load the batch once and print a summary and ranking
    #[arg(long, default_value_t = false)]
    offline: bool,
    /// Serve the dispatch API until Ctrl+C
    #[arg(long, default_value_t = false)]
    serve: bool,
    /// Write a synthetic batch of this many clusters to the detections path
    #[arg(long)]
    generate: Option<usize>,
    #[arg(long, default_value_t = 0)]
    seed: u64,
    /// Fetch a ranking from a running server at this base URL
    #[arg(long)]
    query: Option<String>,
    /// With --query: add stock for this item on the remote server
    #[arg(long, requires = "query")]
    restock: Option<String>,
    #[arg(long, default_value_t = 1)]
    quantity: u32,
    #[arg(long, default_value_t = 0)]
    min_people: u32,
    #[arg(long, default_value_t = 100.0)]
    max_distance: f64,
}

fn print_ranking(ranking: &[RankedCluster]) {
    for (idx, cluster) in ranking.iter().enumerate() {
        println!(
            "#{} {} people={} distance={:.2}km score={:.3} food={} medical={}",
            idx + 1,
            cluster.cluster_id,
            cluster.people_count,
            cluster.distance_from_depot_km,
            cluster.priority_score,
            cluster.recommended_resources.food_packets,
            cluster.recommended_resources.medical_kits
        );
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut config = if let Some(path) = &args.config {
        DispatchConfig::load(path)?
    } else {
        DispatchConfig::default()
    };
    config.apply_overrides(args.detections.clone(), args.inventory.clone(), args.bind);

    let query = RankingQuery {
        min_people: args.min_people,
        max_distance_km: args.max_distance,
    };
    let runtime = TokioBuilder::new_multi_thread()
        .enable_all()
        .build()
        .context("creating tokio runtime")?;

    if let Some(clusters) = args.generate {
        let generator = GeneratorConfig {
            clusters,
            seed: args.seed,
            depot: config.depot,
            ..Default::default()
        };
        let batch = render_batch(&generate_records(&generator));
        if let Some(parent) = config.detections_path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&config.detections_path, batch)
            .with_context(|| format!("writing {}", config.detections_path.display()))?;
        println!(
            "Generated {} clusters -> {}",
            clusters,
            config.detections_path.display()
        );
    }

    if let Some(base_url) = &args.query {
        let client = ReliefClient::new(base_url.as_str());
        if let Some(item) = &args.restock {
            let reply = runtime
                .block_on(client.update_inventory(item, args.quantity))
                .with_context(|| format!("restocking {} on {}", item, base_url))?;
            println!(
                "Restocked {} +{} -> applied {}, current {:?}",
                item, args.quantity, reply.applied, reply.current
            );
        }
        let ranking = runtime
            .block_on(client.recommendations(query.min_people, query.max_distance_km))
            .with_context(|| format!("querying {}", base_url))?;
        print_ranking(&ranking);
    }

    let runner = Runner::new(config.clone(), Arc::new(SystemClock));

    if args.offline {
        let outcome = runtime.block_on(runner.load());
        let (accepted, dropped) = match outcome {
            LoadOutcome::Applied { accepted, dropped } => (accepted, dropped),
            LoadOutcome::Stale => (0, 0),
            LoadOutcome::Failed(err) => {
                return Err(err).with_context(|| {
                    format!("loading {}", config.detections_path.display())
                })
            }
        };
        let report = runner.offline_report(&query);

        println!(
            "Offline run -> clusters {}, dropped {}, people {}, critical {}, mean distance {:.2}km",
            accepted,
            dropped,
            report.summary.total_people,
            report.summary.critical_clusters,
            report.summary.mean_distance_km
        );
        print_ranking(&report.ranking);

        let line = format!(
            "clusters={} dropped={} people={} critical={} top={:?}\n",
            accepted,
            dropped,
            report.summary.total_people,
            report.summary.critical_clusters,
            report
                .ranking
                .iter()
                .map(|c| c.cluster_id.as_str())
                .collect::<Vec<_>>()
        );
        let report_path = PathBuf::from("tools/data/offline_dispatch.log");
        if let Some(parent) = report_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&report_path)
            .with_context(|| format!("opening {}", report_path.display()))?;
        file.write_all(line.as_bytes())?;
    }

    if args.serve {
        let bind_address = config.bind_address;
        runtime.block_on(async {
            let _load = runner.spawn_load();
            let (addr, server) = warp::serve(bridge::server::routes(runner.state()))
                .try_bind_with_graceful_shutdown(bind_address, async {
                    if let Err(err) = signal::ctrl_c().await {
                        log::error!("awaiting Ctrl+C: {}", err);
                    }
                })
                .with_context(|| format!("binding {}", bind_address))?;
            println!("[API] dispatch API on http://{} (Ctrl+C to stop)", addr);
            server.await;
            Ok::<(), anyhow::Error>(())
        })?;
    }

    Ok(())
}
