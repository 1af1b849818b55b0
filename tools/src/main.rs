use std::fs;
use std::net::SocketAddr;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use capture::{CaptureConfig, EntryInspector, FilterSpec, DEFAULT_FILTER};
use clap::{Parser, Subcommand, ValueEnum};
use codec::{
    decode_message, hex_dump, parse_message, render_hex_dump, render_http_request,
    render_message, skeleton, CodecLimits, Direction, ParseContext, ParsedMessage,
    RenderOptions, StaticCapabilities, StaticSession,
};
use glob::Pattern;
use msgscope_tools::{
    catalog_fingerprint, catalog_listing, load_catalog, load_datagram, read_capabilities,
    read_trace, replay, ReplayConfig, SessionFile,
};
use template::{TemplateCatalog, TemplateRegistry};
use tracing::{debug, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(
    name = "msgscope",
    version,
    about = "Decode, edit and replay template-protocol traffic"
)]
struct Cli {
    /// Template catalog JSON; the built-in demo catalog when omitted.
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,
    /// Log level used when RUST_LOG is unset.
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Decode datagram files (raw bytes or hex dumps) into message text.
    Decode {
        /// A datagram file or a directory of them.
        path: PathBuf,
        /// Glob filter when decoding a directory.
        #[arg(long)]
        glob: Option<String>,
        /// Direction written on the first line.
        #[arg(long, value_enum, default_value_t = DirectionArg::In)]
        direction: DirectionArg,
        /// Omit the [Header] section.
        #[arg(long)]
        no_header: bool,
        /// Abbreviate long blobs as in list views.
        #[arg(long)]
        summary: bool,
    },
    /// Encode message text into a hex datagram or a normalized HTTP request.
    Encode {
        /// Message text file.
        text_file: PathBuf,
        /// Session values for $-tokens, as JSON.
        #[arg(long)]
        session: Option<PathBuf>,
        /// Capability names to URLs, as a JSON object.
        #[arg(long)]
        caps: Option<PathBuf>,
        /// Write raw datagram bytes here instead of printing hex.
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Print editable default text for a template.
    Skeleton {
        /// Template name.
        name: String,
    },
    /// Replay a JSON-lines trace through capture, filter and correlation.
    Replay {
        /// Trace file.
        trace: PathBuf,
        /// Filter string such as "!AgentUpdate ChatFromSimulator".
        #[arg(long)]
        filter: Option<String>,
        /// Show every entry instead of applying the default filter.
        #[arg(long, conflicts_with = "filter")]
        all: bool,
        /// Capture log capacity.
        #[arg(long, default_value_t = capture::DEFAULT_CAPACITY)]
        capacity: NonZeroUsize,
        /// Local client endpoint; loopback sources count as outgoing otherwise.
        #[arg(long)]
        local: Option<SocketAddr>,
        /// Capability names to URLs, as a JSON object.
        #[arg(long)]
        caps: Option<PathBuf>,
        /// Reformat XML and HTML bodies.
        #[arg(long)]
        beautify: bool,
        /// Omit datagram [Header] sections.
        #[arg(long)]
        no_header: bool,
    },
    /// Describe the template catalog.
    Catalog {
        #[arg(long, value_enum, default_value_t = CatalogFormat::List)]
        format: CatalogFormat,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum DirectionArg {
    In,
    Out,
}

impl From<DirectionArg> for Direction {
    fn from(arg: DirectionArg) -> Self {
        match arg {
            DirectionArg::In => Self::Incoming,
            DirectionArg::Out => Self::Outgoing,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum CatalogFormat {
    List,
    Hash,
    Json,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    let catalog = load_catalog(cli.catalog.as_deref())?;
    debug!(
        templates = catalog.len(),
        hash = %catalog_fingerprint(&catalog),
        "catalog loaded"
    );
    let limits = CodecLimits::default();

    match cli.command {
        Command::Decode {
            path,
            glob,
            direction,
            no_header,
            summary,
        } => {
            let options = RenderOptions {
                show_header: !no_header,
                summary,
                ..RenderOptions::default()
            };
            let direction = Direction::from(direction);
            if path.is_dir() {
                let files = collect_files(&path, glob.as_deref())?;
                for file in files {
                    println!("== {} ==", file.display());
                    println!("{}", decode_file(&catalog, &file, direction, &options, &limits)?);
                }
            } else {
                println!("{}", decode_file(&catalog, &path, direction, &options, &limits)?);
            }
        }
        Command::Encode {
            text_file,
            session,
            caps,
            out,
        } => {
            let text = fs::read_to_string(&text_file)
                .with_context(|| format!("read message text {}", text_file.display()))?;
            let session = match session {
                Some(path) => load_session(&path)?,
                None => StaticSession::default(),
            };
            let capabilities = load_capabilities(caps.as_deref())?;
            let ctx = ParseContext {
                registry: &catalog,
                session: &session,
                capabilities: &capabilities,
                limits: &limits,
            };
            match parse_message(&ctx, &text)
                .with_context(|| format!("parse {}", text_file.display()))?
            {
                ParsedMessage::Datagram(datagram) => {
                    let bytes = datagram.to_datagram(&limits).context("encode datagram")?;
                    info!(name = %datagram.name, len = bytes.len(), "encoded datagram");
                    match out {
                        Some(out) => fs::write(&out, &bytes)
                            .with_context(|| format!("write datagram {}", out.display()))?,
                        None => println!("{}", hex_dump(&bytes)),
                    }
                }
                ParsedMessage::Http(request) => {
                    if out.is_some() {
                        bail!("--out only applies to datagram text");
                    }
                    print!("{}", render_http_request(&request, &RenderOptions::default()));
                }
            }
        }
        Command::Skeleton { name } => {
            let Some(template) = catalog.resolve_by_name(&name) else {
                bail!("no template named {name}");
            };
            print!("{}", skeleton(template));
        }
        Command::Replay {
            trace,
            filter,
            all,
            capacity,
            local,
            caps,
            beautify,
            no_header,
        } => {
            let text = fs::read_to_string(&trace)
                .with_context(|| format!("read trace {}", trace.display()))?;
            let entries = read_trace(&text).with_context(|| format!("load trace {}", trace.display()))?;
            let capabilities = load_capabilities(caps.as_deref())?;
            let mut inspector = EntryInspector::new(&catalog, &capabilities).with_limits(limits.clone());
            if let Some(local) = local {
                inspector = inspector.with_local(local);
            }
            let filter = if all {
                FilterSpec::default()
            } else {
                FilterSpec::parse(filter.as_deref().unwrap_or(DEFAULT_FILTER))
            };
            let config = ReplayConfig {
                capture: CaptureConfig { capacity },
                filter,
                render: RenderOptions {
                    show_header: !no_header,
                    beautify,
                    summary: false,
                },
                ..ReplayConfig::default()
            };
            let report = replay(entries, &inspector, &config);
            print!("{}", report.output);
            eprintln!(
                "captured {} (evicted {}), shown {}, paired {}, standalone responses {}",
                report.stats.captured,
                report.stats.evicted,
                report.shown,
                report.pairs,
                report.standalone
            );
        }
        Command::Catalog { format } => match format {
            CatalogFormat::List => print!("{}", catalog_listing(&catalog)),
            CatalogFormat::Hash => println!("{}", catalog_fingerprint(&catalog)),
            CatalogFormat::Json => {
                let json = serde_json::to_string_pretty(&catalog).context("serialize catalog")?;
                println!("{json}");
            }
        },
    }
    Ok(())
}

fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn decode_file(
    catalog: &TemplateCatalog,
    path: &Path,
    direction: Direction,
    options: &RenderOptions,
    limits: &CodecLimits,
) -> Result<String> {
    let contents = fs::read(path).with_context(|| format!("read datagram {}", path.display()))?;
    let bytes = load_datagram(&contents).with_context(|| format!("load datagram {}", path.display()))?;
    match decode_message(catalog, &bytes, limits) {
        Ok(message) => Ok(render_message(&message, direction, options)),
        Err(err) => {
            warn!(path = %path.display(), %err, "datagram did not decode");
            Ok(render_hex_dump(direction, &bytes))
        }
    }
}

fn load_session(path: &Path) -> Result<StaticSession> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("read session {}", path.display()))?;
    let file: SessionFile = serde_json::from_str(&contents).context("parse session json")?;
    Ok(file.into())
}

fn load_capabilities(path: Option<&Path>) -> Result<StaticCapabilities> {
    let Some(path) = path else {
        return Ok(StaticCapabilities::new());
    };
    let contents = fs::read_to_string(path)
        .with_context(|| format!("read capabilities {}", path.display()))?;
    read_capabilities(&contents)
}

fn collect_files(dir: &Path, glob: Option<&str>) -> Result<Vec<PathBuf>> {
    let pattern = match glob {
        Some(value) => Some(Pattern::new(value).context("invalid glob pattern")?),
        None => None,
    };

    let mut files = Vec::new();
    for entry in fs::read_dir(dir).with_context(|| format!("read dir {}", dir.display()))? {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        if let Some(pattern) = &pattern {
            let matches_path = pattern.matches_path(&path);
            let matches_name = path
                .file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| pattern.matches(name));
            if !matches_path && !matches_name {
                continue;
            }
        }
        files.push(path);
    }
    files.sort();
    Ok(files)
}
