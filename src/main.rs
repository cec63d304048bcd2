use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use indicatif::{ProgressBar, ProgressStyle};

use signclip::{BuildConfig, BuildEvent, FeatureLayout, archive};

fn main() -> Result<()> {
    env_logger::init();

    let config = parse_args().context("failed to parse arguments")?;

    println!(
        "building dataset from {} (T={})",
        config
            .roots
            .iter()
            .map(|r| r.display().to_string())
            .collect::<Vec<_>>()
            .join(", "),
        config.seq_length
    );

    let mut progress: Option<ProgressBar> = None;
    let mut skipped = 0usize;
    let dataset = signclip::build(&config, |event| match event {
        BuildEvent::Started { total } => {
            progress = Some(create_progress_bar(total));
        }
        BuildEvent::ClipAccepted { .. } => {
            if let Some(pb) = progress.as_ref() {
                pb.inc(1);
            }
        }
        BuildEvent::ClipSkipped { path, reason } => {
            skipped += 1;
            if let Some(pb) = progress.as_ref() {
                pb.inc(1);
                pb.println(format!("skipped {}: {reason}", path.display()));
            }
        }
        BuildEvent::Finished { .. } => {
            if let Some(pb) = progress.take() {
                pb.finish_and_clear();
            }
        }
    })?;

    archive::save(&dataset, &config.dataset_path, &config.encoder_path)?;

    let shape = dataset.x.shape();
    println!(
        "saved {}  X: ({}, {}, {})  labels: {}  skipped clips: {}",
        config.dataset_path.display(),
        shape[0],
        shape[1],
        shape[2],
        dataset.num_classes(),
        skipped
    );
    println!("saved {}", config.encoder_path.display());

    Ok(())
}

fn parse_args() -> Result<BuildConfig> {
    let mut config = BuildConfig::default();
    let mut roots: Vec<PathBuf> = Vec::new();

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--seq-length" => {
                let value = args.next().context("--seq-length needs a value")?;
                config.seq_length = value
                    .parse()
                    .with_context(|| format!("invalid --seq-length {value}"))?;
                if config.seq_length == 0 {
                    bail!("--seq-length must be positive");
                }
            }
            "--feature-dim" => {
                let value = args.next().context("--feature-dim needs a value")?;
                config.feature_dim = Some(
                    value
                        .parse()
                        .with_context(|| format!("invalid --feature-dim {value}"))?,
                );
            }
            "--holistic" => {
                // Pin D to the full holistic capture layout instead of
                // inferring it from the first clip.
                config.feature_dim = Some(FeatureLayout::holistic().total_dim());
            }
            "--out" => {
                config.dataset_path = args.next().context("--out needs a path")?.into();
            }
            "--encoder" => {
                config.encoder_path = args.next().context("--encoder needs a path")?.into();
            }
            "--help" | "-h" => {
                print_usage();
                std::process::exit(0);
            }
            flag if flag.starts_with("--") => bail!("unknown flag {flag}"),
            root => roots.push(PathBuf::from(root)),
        }
    }

    if !roots.is_empty() {
        config.roots = roots;
    }
    Ok(config)
}

fn print_usage() {
    println!(
        "usage: build-dataset [ROOT ...] [--seq-length N] [--feature-dim D] \
         [--holistic] [--out PATH] [--encoder PATH]\n\n\
         Roots default to `recordings uploads`; missing roots are skipped."
    );
}

fn create_progress_bar(total: usize) -> ProgressBar {
    let pb = ProgressBar::new(total as u64);
    let style = ProgressStyle::with_template(
        "{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} clips",
    )
    .unwrap()
    .progress_chars("=>-");
    pb.set_style(style);
    pb
}
