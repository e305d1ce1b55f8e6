//! Command-line host for the signing engine
//!
//! `sign` opens a PDF or image, places the signature overlay (from a gesture
//! script or the configured default rect), and writes `signed_<name>` next
//! to the document or into `--output`. `inspect` prints the page geometry
//! the overlay is placed against. Both print a JSON report on stdout.

pub mod config;
pub mod gestures;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use config::Config;
use docsign_core::{
    DocumentKind, OverlayRect, SignatureAsset, SigningSession, SourceDocument, ViewportBounds,
};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "docsign")]
#[command(version, about = "Place a handwritten signature on a PDF page or image")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Stamp a signature onto a document
    Sign(SignArgs),
    /// Print page sizes of a document as JSON
    Inspect {
        /// PDF or image to inspect
        document: PathBuf,
    },
}

#[derive(clap::Args, Debug)]
pub struct SignArgs {
    /// PDF or image to sign
    pub document: PathBuf,

    /// Signature image, or a text file holding a `data:image/png;base64,` URL
    #[arg(short, long)]
    pub signature: PathBuf,

    /// Page to sign, starting at 1
    #[arg(short, long, default_value = "1")]
    pub page: usize,

    /// On-screen size of the page the gestures refer to, e.g. `800x1035`
    #[arg(long, value_parser = parse_viewport)]
    pub viewport: Option<ViewportBounds>,

    /// JSON gesture script to replay before exporting
    #[arg(short, long)]
    pub gestures: Option<PathBuf>,

    /// Directory for the signed copy (default: next to the document)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

/// Printed after a successful `sign`
#[derive(Debug, Clone, Serialize)]
pub struct SignReport {
    pub output: PathBuf,
    pub file_name: String,
    pub mime_type: String,
    pub page: usize,
    pub viewport: ViewportBounds,
    pub rect: OverlayRect,
    pub bytes: usize,
    pub missed_gestures: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct InspectReport {
    pub name: Option<String>,
    pub kind: &'static str,
    pub mime_type: &'static str,
    pub pages: Vec<PageInfo>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PageInfo {
    pub page: usize,
    pub width: f64,
    pub height: f64,
}

pub fn run(cli: Cli) -> anyhow::Result<()> {
    let report = match cli.command {
        Command::Sign(args) => serde_json::to_string_pretty(&sign(&args)?)?,
        Command::Inspect { document } => serde_json::to_string_pretty(&inspect(&document)?)?,
    };
    println!("{}", report);
    Ok(())
}

pub fn sign(args: &SignArgs) -> anyhow::Result<SignReport> {
    let config = match &args.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };

    let document = open_document(&args.document)?;
    let page_count = document.page_count();
    if args.page == 0 || args.page > page_count {
        bail!(
            "Page {} out of range: {} has {} page(s)",
            args.page,
            args.document.display(),
            page_count
        );
    }
    let page_index = args.page - 1;

    let mut session = SigningSession::new(document, config.placement);
    session.go_to_page(page_index);
    session.set_signature(read_signature(&args.signature)?);

    let frame = session
        .natural_frame()
        .context("Selected page has no size")?;
    let viewport = args
        .viewport
        .unwrap_or_else(|| ViewportBounds::fit_to_width(frame, config.display.max_width));
    session.report_viewport(viewport);

    let missed_gestures = match &args.gestures {
        Some(path) => gestures::replay(&mut session, &gestures::load_script(path)?),
        None => 0,
    };

    let artifact = session.export().context("Failed to sign document")?;

    let out_dir = match &args.output {
        Some(dir) => dir.clone(),
        None => args
            .document
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default(),
    };
    if !out_dir.as_os_str().is_empty() {
        fs::create_dir_all(&out_dir)
            .with_context(|| format!("Failed to create output directory: {}", out_dir.display()))?;
    }
    let output = out_dir.join(&artifact.file_name);
    fs::write(&output, &artifact.bytes)
        .with_context(|| format!("Failed to write signed document: {}", output.display()))?;

    tracing::info!(output = %output.display(), "wrote signed document");

    Ok(SignReport {
        output,
        file_name: artifact.file_name,
        mime_type: artifact.mime_type,
        page: args.page,
        viewport: session.engine().viewport().unwrap_or(viewport),
        rect: session.current_rect(),
        bytes: artifact.bytes.len(),
        missed_gestures,
    })
}

pub fn inspect(path: &Path) -> anyhow::Result<InspectReport> {
    let document = open_document(path)?;

    let pages = (0..document.page_count())
        .filter_map(|index| {
            document.natural_frame(index).map(|frame| PageInfo {
                page: index + 1,
                width: frame.width,
                height: frame.height,
            })
        })
        .collect();

    Ok(InspectReport {
        name: document.name().map(str::to_string),
        kind: match document.kind() {
            DocumentKind::Pdf => "pdf",
            DocumentKind::Image(_) => "image",
        },
        mime_type: document.mime_type(),
        pages,
    })
}

fn open_document(path: &Path) -> anyhow::Result<SourceDocument> {
    let bytes =
        fs::read(path).with_context(|| format!("Failed to read document: {}", path.display()))?;
    let name = path.file_name().and_then(|n| n.to_str());
    SourceDocument::load(name, bytes)
        .with_context(|| format!("Failed to open document: {}", path.display()))
}

fn read_signature(path: &Path) -> anyhow::Result<SignatureAsset> {
    let bytes =
        fs::read(path).with_context(|| format!("Failed to read signature: {}", path.display()))?;

    if bytes.starts_with(b"data:") {
        let url = String::from_utf8(bytes).context("Signature data URL is not UTF-8")?;
        return SignatureAsset::from_data_url(&url).context("Failed to parse signature data URL");
    }
    Ok(SignatureAsset::from_bytes(bytes))
}

/// Parse `WIDTHxHEIGHT`
pub fn parse_viewport(s: &str) -> Result<ViewportBounds, String> {
    let (w, h) = s
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got '{}'", s))?;
    let width: f64 = w.trim().parse().map_err(|_| format!("invalid width '{}'", w))?;
    let height: f64 = h.trim().parse().map_err(|_| format!("invalid height '{}'", h))?;

    let bounds = ViewportBounds::new(width, height);
    if !bounds.is_measurable() {
        return Err(format!("viewport must be positive, got '{}'", s));
    }
    Ok(bounds)
}
