use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::Parser;
use squarer::observer::Poller;
use squarer::{input, logging, Config, Job, JobState};

/// Square numbers on worker threads and report them one by one.
#[derive(Parser, Debug)]
#[command(name = "squarer", version, about)]
struct Cli {
	/// Comma-separated numbers; takes precedence over --file
	#[arg(short, long, env = "SQUARER_NUMBERS")]
	numbers: Option<String>,

	/// File holding comma-separated numbers
	#[arg(short, long, env = "SQUARER_FILE")]
	file: Option<PathBuf>,

	/// Number of worker threads
	#[arg(short, long, env = "SQUARER_THREADS", default_value_t = 1, conflicts_with = "all_cores")]
	threads: usize,

	/// One worker per CPU
	#[arg(long)]
	all_cores: bool,

	/// Pause before each reported result, in milliseconds
	#[arg(long, env = "SQUARER_DELAY_MS", default_value_t = 1000)]
	delay_ms: u64,

	/// Status refresh interval, in milliseconds
	#[arg(long, env = "SQUARER_POLL_MS", default_value_t = 1000)]
	poll_ms: u64,

	/// Draw a progress bar instead of status lines
	#[cfg(feature = "progression")]
	#[arg(long)]
	bar: bool,

	/// Log level used when RUST_LOG is unset
	#[arg(long, default_value = "warn")]
	log_level: String,
}

fn main() -> Result<()> {
	let cli = Cli::parse();
	logging::init_with_level(&cli.log_level);

	let numbers = match (&cli.numbers, &cli.file) {
		(Some(numbers), _) => input::parse_numbers(numbers).context("Please enter valid numbers")?,
		(None, Some(path)) => input::read_numbers(path).context("The file contains invalid numbers")?,
		(None, None) => bail!("Please provide a file or a list of numbers"),
	};

	let mut config = if cli.all_cores { Config::all_cores() } else { Config { thread_count: cli.threads, ..Default::default() } };
	config.item_delay = Duration::from_millis(cli.delay_ms);
	#[cfg(feature = "progression")]
	{
		config.progress_bar = cli.bar;
	}
	#[cfg(feature = "progression")]
	let show_status = !cli.bar;
	#[cfg(not(feature = "progression"))]
	let show_status = true;

	let job = Job::new(config);
	let poller = show_status
		.then(|| {
			let mut last = None;
			Poller::spawn(job.monitor(), Duration::from_millis(cli.poll_ms), move |snapshot, state| {
				let status = snapshot.status();
				if last != Some(status) {
					eprintln!("{status}");
					last = Some(status);
				}
				if state == JobState::Done {
					eprintln!("OK - Process complete");
				}
			})
		})
		.transpose()
		.context("Failed to start progress poller")?;

	let handle = job.start_numbers(numbers, std::io::stdout())?;
	let result = handle.wait();

	if let Some(poller) = poller {
		poller.join();
	}

	let summary = result.context("Non-specific error in the process")?;
	tracing::debug!(elapsed = ?summary.elapsed, "done");
	Ok(())
}
