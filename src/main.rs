use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand, ValueEnum};

use roger_series::input::{CoordinateFile, SampleFile, SampleSource, load_inputs};
use roger_series::logging;
use roger_series::model::sample::SampleTable;
use roger_series::report::{ReportInput, write_reports};
use roger_series::series::{JoinPolicy, SeriesBuilder};

const TOOL_NAME: &str = "roger-series";

#[derive(Debug, Parser)]
#[command(name = "roger-series", version, about = "Group sample annotations into PCA scatter series")]
struct Cli {
    /// Debug logging (overridden by RUST_LOG).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Join annotations with coordinates and write one series set per attribute.
    Run(RunArgs),
    /// List attributes available for grouping.
    Attributes(AttributesArgs),
}

#[derive(Debug, Clone, Args)]
struct RunArgs {
    /// Sample annotation table (.tsv/.txt/.json, optionally .gz).
    #[arg(long)]
    samples: PathBuf,
    /// Per-sample coordinates (.tsv/.txt/.json, optionally .gz).
    #[arg(long)]
    coords: PathBuf,
    /// Grouping attribute; repeat to emit several groupings.
    #[arg(long = "group-by", required = true)]
    group_by: Vec<String>,
    #[arg(long)]
    out: PathBuf,
    /// Sample id column of the annotation table.
    #[arg(long)]
    id_column: Option<String>,
    /// Component plotted on the x axis.
    #[arg(long)]
    x: Option<String>,
    /// Component plotted on the y axis.
    #[arg(long)]
    y: Option<String>,
    #[arg(long, value_enum, default_value_t = JoinPolicy::Reject)]
    on_unresolved: JoinPolicy,
    #[arg(long, value_enum, default_value_t = RunMode::Standalone)]
    run_mode: RunMode,
    /// Figure title; defaults to "<y> vs <x> by <attribute>".
    #[arg(long)]
    title: Option<String>,
}

#[derive(Debug, Clone, Args)]
struct AttributesArgs {
    #[arg(long)]
    samples: PathBuf,
    #[arg(long)]
    id_column: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum RunMode {
    Standalone,
    Pipeline,
}

impl RunMode {
    fn as_str(self) -> &'static str {
        match self {
            RunMode::Standalone => "standalone",
            RunMode::Pipeline => "pipeline",
        }
    }
}

#[derive(Debug, Clone)]
struct RunConfig {
    samples: SampleFile,
    coordinates: CoordinateFile,
    attributes: Vec<String>,
    out_dir: PathBuf,
    policy: JoinPolicy,
    run_mode: RunMode,
    title: Option<String>,
}

impl From<RunArgs> for RunConfig {
    fn from(args: RunArgs) -> Self {
        let mut attributes: Vec<String> = Vec::with_capacity(args.group_by.len());
        for attr in args.group_by {
            if !attributes.contains(&attr) {
                attributes.push(attr);
            }
        }
        RunConfig {
            samples: SampleFile {
                path: args.samples,
                id_column: args.id_column,
            },
            coordinates: CoordinateFile {
                path: args.coords,
                x: args.x,
                y: args.y,
            },
            attributes,
            out_dir: args.out,
            policy: args.on_unresolved,
            run_mode: args.run_mode,
            title: args.title,
        }
    }
}

fn main() {
    let args = std::env::args().skip(1).collect::<Vec<_>>();
    let cli = match parse_args(&args) {
        Ok(cli) => cli,
        Err(err) => err.exit(),
    };
    logging::init(cli.verbose);
    if let Err(err) = run(cli.command) {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

fn parse_args(args: &[String]) -> Result<Cli, clap::Error> {
    Cli::try_parse_from(std::iter::once(TOOL_NAME.to_string()).chain(args.iter().cloned()))
}

fn run(command: Command) -> Result<(), String> {
    match command {
        Command::Run(args) => run_series(&RunConfig::from(args)),
        Command::Attributes(args) => list_attributes(&args),
    }
}

fn run_series(config: &RunConfig) -> Result<(), String> {
    let out_dir = resolve_output_dir(&config.out_dir, config.run_mode);

    let bundle = load_inputs(&config.samples, &config.coordinates).map_err(|e| e.to_string())?;
    if bundle.samples.is_empty() {
        roger_series::warn!("sample annotations contain no records; series will be empty");
    }
    let builder = SeriesBuilder::new(
        &bundle.samples.records,
        &bundle.coordinates.points,
        config.policy,
    );

    let mut builds = Vec::with_capacity(config.attributes.len());
    for attribute in &config.attributes {
        let build = builder.build(attribute).map_err(|e| e.to_string())?;
        roger_series::info!(
            "grouped by {}: {} series, {} points",
            attribute,
            build.series.len(),
            build.n_points()
        );
        if build.diagnostics.skipped() > 0 {
            roger_series::warn!(
                "{}: skipped {} samples without a unique coordinate ({} missing, {} duplicated)",
                attribute,
                build.diagnostics.skipped(),
                build.diagnostics.unmatched.len(),
                build.diagnostics.ambiguous.len()
            );
        }
        if build.diagnostics.unused_coordinates > 0 {
            roger_series::debug!(
                "{}: {} coordinates have no annotation",
                attribute,
                build.diagnostics.unused_coordinates
            );
        }
        builds.push(build);
    }

    let input = ReportInput {
        tool_name: TOOL_NAME.to_string(),
        tool_version: env!("CARGO_PKG_VERSION").to_string(),
        run_mode: config.run_mode.as_str().to_string(),
        title: config.title.clone(),
        samples_path: config.samples.path.display().to_string(),
        coordinates_path: config.coordinates.path.display().to_string(),
        n_samples: bundle.samples.len(),
        n_coordinates: bundle.coordinates.points.len(),
        axes: &bundle.coordinates.axes,
        policy: config.policy,
        builds: &builds,
    };
    let written = write_reports(&input, &out_dir).map_err(|e| e.to_string())?;
    roger_series::info!("wrote {} files to {}", written.len(), out_dir.display());
    Ok(())
}

fn list_attributes(args: &AttributesArgs) -> Result<(), String> {
    let source = SampleFile {
        path: args.samples.clone(),
        id_column: args.id_column.clone(),
    };
    let table = source.load_samples().map_err(|e| e.to_string())?;
    println!("{}", render_attribute_table(&table));
    Ok(())
}

fn render_attribute_table(table: &SampleTable) -> String {
    let mut out = String::from("attribute\trecords\tdistinct\tmissing");
    for summary in table.attribute_summaries() {
        out.push_str(&format!(
            "\n{}\t{}\t{}\t{}",
            summary.name, summary.n_records, summary.n_distinct, summary.n_missing
        ));
    }
    out
}

fn resolve_output_dir(base: &Path, run_mode: RunMode) -> PathBuf {
    match run_mode {
        RunMode::Standalone => base.to_path_buf(),
        RunMode::Pipeline => base.join(TOOL_NAME),
    }
}

#[cfg(test)]
#[path = "../tests/src_inline/main_inline.rs"]
mod tests;
