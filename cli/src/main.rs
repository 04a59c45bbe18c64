use std::error::Error;
use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;

use cfgparse::{Document, Format, Indent, ParseOptions, PrintOptions, SEARCH_DEPTH_UNBOUNDED};
use clap::{ArgAction, Parser, ValueEnum};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "cfgparse", version, about = "INI/XML/JSON configuration parser and printer")]
struct Args {
    /// Input file path. Omit or use '-' to read from stdin.
    input: Option<String>,

    /// Output file path (prints to stdout if omitted).
    #[arg(short, long, value_name = "file")]
    output: Option<String>,

    /// Input format (auto-detected from the file extension if omitted).
    #[arg(short, long, value_enum)]
    format: Option<FormatArg>,

    /// Print the scalar value of the first node with this name.
    #[arg(long, value_name = "name", conflicts_with = "tree")]
    get: Option<String>,

    /// Search depth for --get below the roots (default: unlimited).
    #[arg(long, value_name = "number", requires = "get")]
    depth: Option<usize>,

    /// Print the parsed tree as JSON instead of re-printing the document.
    #[arg(long)]
    tree: bool,

    /// Indent with this many spaces instead of tabs.
    #[arg(long, value_name = "number")]
    indent: Option<usize>,

    /// Maximum nesting depth accepted while parsing and printing.
    #[arg(long = "max-depth", value_name = "number")]
    max_depth: Option<usize>,

    /// Raise log verbosity (-v info, -vv debug, -vvv trace). RUST_LOG wins.
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum FormatArg {
    Ini,
    Xml,
    Json,
    Yaml,
}

impl From<FormatArg> for Format {
    fn from(value: FormatArg) -> Self {
        match value {
            FormatArg::Ini => Format::Ini,
            FormatArg::Xml => Format::Xml,
            FormatArg::Json => Format::Json,
            FormatArg::Yaml => Format::Yaml,
        }
    }
}

#[derive(Debug)]
enum InputSource {
    Stdin,
    File(String),
}

fn main() {
    let args = Args::parse();
    init_tracing(args.verbose);
    if let Err(err) = run(&args) {
        eprintln!("ERROR  {err}");
        std::process::exit(1);
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    // A subscriber installed by an embedding process stays in place.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

fn run(args: &Args) -> Result<(), Box<dyn Error>> {
    let (input, source) = read_input(args.input.as_deref())?;
    let format = resolve_format(args, &source)?;

    let mut parse_options = ParseOptions::default();
    let mut print_options = PrintOptions::default();
    if let Some(max_depth) = args.max_depth {
        parse_options = parse_options.with_max_depth(max_depth);
        print_options = print_options.with_max_depth(max_depth);
    }
    if let Some(spaces) = args.indent {
        print_options = print_options.with_indent(Indent::spaces(spaces));
    }

    let doc = cfgparse::parse_with_options(&input, format, &parse_options)?;
    debug!(%format, roots = doc.root_count(), "parsed input");

    let output = OutputTarget::from_arg(args.output.as_deref());
    if let Some(name) = &args.get {
        let depth = args.depth.unwrap_or(SEARCH_DEPTH_UNBOUNDED);
        let node = doc
            .find(name, depth)
            .ok_or_else(|| format!("no node named '{name}'"))?;
        let value = node
            .value()
            .ok_or_else(|| format!("node '{name}' has no scalar value"))?;
        with_output_writer(output.path(), |writer| {
            writer.write_all(value)?;
            writer.write_all(b"\n")?;
            Ok(())
        })?;
    } else if args.tree {
        with_output_writer(output.path(), |writer| {
            serde_json::to_writer_pretty(&mut *writer, &doc)?;
            writer.write_all(b"\n")?;
            Ok(())
        })?;
    } else {
        with_output_writer(output.path(), |writer| {
            doc.print_to(writer, &print_options)?;
            Ok(())
        })?;
    }

    if let OutputTarget::File(path) = &output {
        report_status(&source, path);
    }
    Ok(())
}

fn resolve_format(args: &Args, source: &InputSource) -> Result<Format, Box<dyn Error>> {
    if let Some(format) = args.format {
        return Ok(format.into());
    }
    match source {
        InputSource::Stdin => Err("reading from stdin requires --format".into()),
        InputSource::File(path) => Format::from_extension(path)
            .ok_or_else(|| "unable to auto-detect format; use --format".into()),
    }
}

fn read_input(input: Option<&str>) -> Result<(Vec<u8>, InputSource), Box<dyn Error>> {
    match input {
        None | Some("-") => {
            let mut buf = Vec::new();
            io::stdin().read_to_end(&mut buf)?;
            Ok((buf, InputSource::Stdin))
        }
        Some(path) => {
            let buf = fs::read(path)?;
            Ok((buf, InputSource::File(path.to_string())))
        }
    }
}

#[derive(Clone, Debug)]
enum OutputTarget {
    Stdout,
    File(String),
}

impl OutputTarget {
    fn from_arg(output: Option<&str>) -> Self {
        match output {
            Some(path) if path != "-" => OutputTarget::File(path.to_string()),
            _ => OutputTarget::Stdout,
        }
    }

    fn path(&self) -> Option<&str> {
        match self {
            OutputTarget::Stdout => None,
            OutputTarget::File(path) => Some(path.as_str()),
        }
    }
}

fn with_output_writer<F>(path: Option<&str>, f: F) -> Result<(), Box<dyn Error>>
where
    F: FnOnce(&mut dyn Write) -> Result<(), Box<dyn Error>>,
{
    match path {
        Some(path) => {
            let mut file = fs::File::create(path)?;
            f(&mut file)
        }
        None => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            f(&mut handle)
        }
    }
}

fn report_status(source: &InputSource, output_path: &str) {
    let input_label = match source {
        InputSource::Stdin => "stdin".to_string(),
        InputSource::File(path) => file_label(path),
    };
    println!("✔ Printed {input_label} → {}", file_label(output_path));
}

fn file_label(path: &str) -> String {
    Path::new(path)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string())
}
