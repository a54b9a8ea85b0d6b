//! Quote Client — requests the current bid from the quotation server, stores it as
//! `Dólar: <bid>` in a local file and echoes the raw response to stdout.
//!
//! Usage example (CLI):
//! ```bash
//! quote_client --url http://localhost:8080/cotacao --timeout-ms 300 --output logs/cotacao.txt
//! ```
//!
//! The request is bounded by `--timeout-ms`; on timeout or any non-success answer
//! nothing is written and the process exits with an error.
#![warn(missing_docs)]
mod args;
mod report;
mod sender;

use crate::args::Args;
use crate::report::write_bid_file;
use crate::sender::QuotationRequester;
use clap::Parser;
use log::{error, info};
use quote_common::Result;
use std::io::{self, Write};

#[tokio::main]
async fn main() -> Result<()> {
    init_logger();
    let args = Args::parse();

    let requester = QuotationRequester::new(&args.url, args.timeout())?;
    let quotation = match requester.request_bid().await {
        Ok(quotation) => quotation,
        Err(e) => {
            error!("Error requesting quotation :: {}", e);
            return Err(e);
        }
    };

    let size = write_bid_file(&args.output, &quotation.bid.bid)?;
    info!("Log file created :: {} - ({} bytes)", args.output.display(), size);

    let mut stdout = io::stdout().lock();
    stdout.write_all(&quotation.raw)?;
    stdout.flush()?;
    Ok(())
}

fn init_logger() {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();
}
