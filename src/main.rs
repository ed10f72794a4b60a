use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

use bandplan::io::window_io::{self, PageExport};
use bandplan::io::workbook_io::{self, BandSource};
use bandplan::state::band_model::display_value;
use bandplan::state::layout::PageLayout;
use bandplan::{Selection, SelectionField, SpectrumObserver, SpectrumState, DEFAULT_PAGE_SIZE};

#[derive(Parser, Debug)]
#[command(name = "bandplan", about = "Groups and pages frequency band allocations")]
struct Args {
    /// Workbook JSON: band name -> sheet rows, header row first
    #[arg(long, env = "BANDPLAN_WORKBOOK")]
    workbook: PathBuf,

    /// Band (sheet) to show; lists the bands when omitted
    #[arg(long, env = "BANDPLAN_BAND")]
    band: Option<String>,

    /// 1-based page, clamped to the available pages
    #[arg(long, default_value_t = 1)]
    page: usize,

    #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
    page_size: usize,

    /// Item numbers in scope
    #[arg(long, value_delimiter = ',')]
    scope: Vec<i64>,

    /// Item number to activate, as if its block was clicked
    #[arg(long)]
    active: Option<i64>,

    /// Print the page as JSON instead of text
    #[arg(long)]
    json: bool,

    /// Also write the page as JSON to this file
    #[arg(long, value_name = "PATH")]
    output: Option<PathBuf>,

    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[arg(short, long)]
    quiet: bool,
}

/// Mirrors what the parent view would hold after each notification.
#[derive(Default)]
struct HostView {
    content: String,
    scope: Option<i64>,
}

impl SpectrumObserver for HostView {
    fn on_content_changed(&mut self, content: &str) {
        self.content = content.to_string();
    }

    fn on_selection_changed(&mut self, field: SelectionField, value: Option<i64>) {
        tracing::debug!(field = field.as_str(), ?value, "selection changed");
        match field {
            SelectionField::Scope => self.scope = value,
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose, args.quiet);

    let workbook = match workbook_io::load_workbook_async(&args.workbook).await {
        Ok(workbook) => workbook,
        Err(err) => {
            tracing::error!(path = %args.workbook.display(), %err, "cannot load workbook");
            return ExitCode::FAILURE;
        }
    };

    let Some(band) = args.band.clone() else {
        for name in workbook.band_names() {
            println!("{name}");
        }
        return ExitCode::SUCCESS;
    };

    match run(&args, &workbook, &band) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(band = band.as_str(), %err, "failed");
            ExitCode::FAILURE
        }
    }
}

fn run(
    args: &Args,
    source: &impl BandSource,
    band: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut view = HostView::default();
    let mut state = SpectrumState::with_page_size(args.page_size);
    state.load_from_source(source, band, &mut view)?;
    state.set_page(args.page);

    if let Some(item_no) = args.active {
        if !state.select(item_no, &mut view) {
            tracing::warn!(item_no, "no block carries this item number");
        }
    }

    let selection = Selection::from_parts(args.scope.iter().copied(), view.scope);
    let layout = state.page_layout(&selection);
    let export = PageExport {
        band: band.to_string(),
        content: (!view.content.is_empty()).then(|| view.content.clone()),
        layout,
    };

    if let Some(path) = &args.output {
        window_io::save_page(path, &export)?;
    }

    if args.json {
        println!("{}", window_io::page_to_json(&export)?);
    } else {
        print_page(band, &export.layout, &view.content);
    }
    Ok(())
}

fn print_page(band: &str, layout: &PageLayout, content: &str) {
    if layout.is_empty() {
        println!("{band}: No Band Data Entered Yet.");
        return;
    }

    println!(
        "{band}: page {}/{} (span {})",
        layout.page, layout.total_pages, layout.span_length
    );
    for segment in &layout.segments {
        let end = segment.end_label.as_deref().unwrap_or("");
        println!(
            "  [{}] {:>5.1}%  {} .. {}",
            display_value(&segment.master),
            segment.width_fraction * 100.0,
            segment.start_label,
            end
        );
        for block in &segment.blocks {
            let marker = if block.active {
                '*'
            } else if block.scoped {
                '~'
            } else {
                ' '
            };
            let item = block.item_no.map(|n| n.to_string()).unwrap_or_default();
            println!("     {marker} {item:>6}  {}", block.label.text());
        }
    }
    if !content.is_empty() {
        println!();
        println!("{content}");
    }
}

fn init_logging(verbose: u8, quiet: bool) {
    let level = if quiet {
        LevelFilter::ERROR
    } else {
        match verbose {
            0 => LevelFilter::WARN,
            1 => LevelFilter::INFO,
            2 => LevelFilter::DEBUG,
            _ => LevelFilter::TRACE,
        }
    };

    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
