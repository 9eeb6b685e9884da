use clap::Parser;
use markup::{SerializeOptions, TokenizerConfig, serialize_with, tokenize_with};
use mimalloc::MiMalloc;
use springform::json::JsonEvaluator;
use springform::Config;
use std::error::Error;
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

/// Decorate the form controls in a markup template.
#[derive(Parser, Debug)]
#[command(name = "springform")]
#[command(about = "Fill in name, value, id, tabindex and label targets on form controls")]
struct Cli {
    /// Template to rewrite, or `-` for stdin
    template: PathBuf,

    /// JSON document the bindings resolve against
    #[arg(long)]
    data: Option<PathBuf>,

    /// TOML file with root settings
    #[arg(long)]
    config: Option<PathBuf>,

    /// Prefix bound to the directive namespace
    #[arg(long, default_value = "f")]
    prefix: String,

    /// Separator joining binding path segments into names
    #[arg(long)]
    separator: Option<String>,

    /// Output file (stdout when omitted)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Keep declarations of the directive namespace in the output
    #[arg(long)]
    keep_xmlns: bool,
}

fn read_input(path: &Path) -> io::Result<String> {
    if path.as_os_str() == "-" {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf)?;
        return Ok(buf);
    }
    fs::read_to_string(path)
}

fn load_config(path: Option<&Path>) -> Result<Config, Box<dyn Error>> {
    let Some(path) = path else {
        return Ok(Config::default());
    };
    let text = fs::read_to_string(path)?;
    Ok(toml::from_str(&text)?)
}

fn load_data(path: Option<&Path>) -> Result<serde_json::Value, Box<dyn Error>> {
    let Some(path) = path else {
        return Ok(serde_json::Value::Null);
    };
    let text = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}

fn run(cli: &Cli) -> Result<(), Box<dyn Error>> {
    let config = load_config(cli.config.as_deref())?;
    let mut evaluator = JsonEvaluator::new(load_data(cli.data.as_deref())?);
    if let Some(separator) = &cli.separator {
        evaluator = evaluator.with_separator(separator.as_str());
    }

    let input = read_input(&cli.template)?;
    let tokenizer = TokenizerConfig::new().declare(&cli.prefix, &config.namespace);
    let events = tokenize_with(&input, &tokenizer);
    log::debug!(target: "springform.cli", "tokenized {} events", events.len());

    let mut ctx = config.context();
    let out = springform::transform_in(events, config.namespace(), &mut ctx, &evaluator)
        .collect::<Result<Vec<_>, _>>()?;

    let mut options = SerializeOptions::new();
    if !cli.keep_xmlns {
        options = options.drop_declarations_for(&config.namespace);
    }
    let rendered = serialize_with(&out, &options);
    match &cli.output {
        Some(path) => fs::write(path, rendered)?,
        None => io::stdout().write_all(rendered.as_bytes())?,
    }
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_default_env().init();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!(target: "springform.cli", "{err}");
            eprintln!("springform: {err}");
            ExitCode::FAILURE
        }
    }
}
