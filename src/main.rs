use chrono::NaiveDate;
use clap::Parser;
use quotegrid::{QuotationJob, QuotationService, QuotegridConfig, QuotegridError};
use std::env;
use std::path::PathBuf;

/// Issue a quotation from a JSON job file and write it as a PDF.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Configuration file (fonts, logo, history, overflow policy)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Issue date (YYYY-MM-DD); defaults to the job's date, then today
    #[arg(long)]
    date: Option<NaiveDate>,

    /// Render without recording the number in the history
    #[arg(long, default_value_t = false)]
    no_record: bool,

    /// Job file
    job: PathBuf,

    /// Output PDF
    output: PathBuf,
}

fn main() -> Result<(), QuotegridError> {
    if env::var("RUST_LOG").is_err() {
        unsafe {
            env::set_var("RUST_LOG", "quotegrid=info");
        }
    }
    env_logger::init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => QuotegridConfig::from_file(path)?,
        None => QuotegridConfig::default(),
    };
    let service = QuotationService::from_config(&config)?;

    let mut job = QuotationJob::from_file(&args.job)?;
    if let Some(date) = args.date {
        job = job.with_date(date);
    }

    let issued = if args.no_record {
        service.preview(&job)?
    } else {
        service.issue(&job)?
    };
    issued.save(&args.output)?;

    println!(
        "{} -> {} ({} page(s), grand total {})",
        issued.number,
        args.output.display(),
        issued.rendered.page_count,
        issued.totals.grand_total
    );
    for warning in &issued.rendered.warnings {
        eprintln!("warning: {}", warning);
    }
    Ok(())
}
