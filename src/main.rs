//! Command line front-end for the snippet playground

use std::{
	env,
	io::{self, Read, Write},
	path::PathBuf,
	process,
	sync::Arc,
};

use anyhow::{bail, Context, Result};
use log::warn;
use snippet_playground::{
	Config, Engine, ExampleLibrary, ExecutionResult, PageRenderer, Playground,
};

enum Command {
	Render,
	Run(usize),
	Eval,
}

fn main() -> Result<()> {
	init_logger();

	let mut args = env::args().skip(1);

	let command = match args.next().as_deref() {
		None | Some("render") => Command::Render,
		Some("run") => {
			let Some(index) = args.next() else {
				bail!("Missing example index, usage: snippet-playground run <index> [dir]");
			};
			Command::Run(
				index
					.parse()
					.with_context(|| format!("Invalid example index {index}"))?,
			)
		}
		Some("eval") => Command::Eval,
		Some(other) => bail!("Unexpected command {other}"),
	};

	let root = args.next().map_or_else(env::current_dir, |dir| Ok(PathBuf::from(dir)))?;
	if let Some(extra) = args.next() {
		warn!("Ignoring extra argument {extra}");
	}

	let config = Config::read(&root)?;
	let library = ExampleLibrary::from_config(&config)?;
	let engine = Engine::from_config(&config);
	let mut playground = Playground::from_config(&config, Arc::new(library), engine);

	match command {
		Command::Render => {
			let html = PageRenderer::new(&config)?.render(&playground)?;
			io::stdout().write_all(html.as_bytes())?;
			Ok(())
		}
		Command::Run(index) => {
			playground.select_example(index)?;
			let success = print_result(playground.run_from_editor()?)?;
			exit(success)
		}
		Command::Eval => {
			let mut source = String::new();
			io::stdin()
				.read_to_string(&mut source)
				.context("Failed to read source from stdin")?;
			let success = print_result(playground.run(source))?;
			exit(success)
		}
	}
}

fn print_result(result: Option<&ExecutionResult>) -> Result<bool> {
	let Some(result) = result else {
		bail!("The run didn't produce a result");
	};

	println!("{}", serde_json::to_string(result)?);
	Ok(result.is_success())
}

fn exit(success: bool) -> Result<()> {
	if success {
		Ok(())
	} else {
		process::exit(1);
	}
}

fn init_logger() {
	let mut builder = env_logger::Builder::new();

	builder.format(|formatter, record| {
		writeln!(
			formatter,
			"{} [{}] ({}): {}",
			chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
			record.level(),
			record.target(),
			record.args()
		)
	});

	if let Ok(var) = env::var("RUST_LOG") {
		builder.parse_filters(&var);
	} else {
		// if no RUST_LOG provided, default to logging at the Info level
		builder.filter(None, log::LevelFilter::Info);
	}

	builder.init();
}
