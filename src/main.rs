//! Coupons CLI

use std::{io, process::ExitCode};

use clap::Parser;
use jiff::Timestamp;
use thiserror::Error;
use tracing::{error, info};

use coupons::{
    config::CliConfig,
    engine::redeem,
    fixtures::{FixtureError, read_cart, read_coupons},
    observability::init_subscriber,
    receipt::{Receipt, ReceiptError},
};

/// Errors that stop the CLI before a receipt is printed.
#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Fixture(#[from] FixtureError),

    #[error(transparent)]
    Receipt(#[from] ReceiptError),
}

/// Coupons CLI entry point
fn main() -> ExitCode {
    let config = CliConfig::parse();

    if let Err(err) = init_subscriber(&config.logging) {
        #[expect(
            clippy::print_stderr,
            reason = "logging failed to initialise, must use eprintln"
        )]
        {
            eprintln!("{err}");
        }

        return ExitCode::FAILURE;
    }

    match run(&config) {
        Ok(code) => code,
        Err(err) => {
            error!("{err}");

            ExitCode::FAILURE
        }
    }
}

fn run(config: &CliConfig) -> Result<ExitCode, CliError> {
    let catalog = read_coupons(&config.coupons)?;
    let cart = read_cart(&config.cart)?;
    let now = config.at.unwrap_or_else(Timestamp::now);

    info!(
        coupons = catalog.len(),
        lines = cart.len(),
        %now,
        "loaded catalog and cart"
    );

    let application = match redeem(&catalog, &config.code, &cart, now) {
        Ok(application) => application,
        Err(err) => {
            #[expect(clippy::print_stderr, reason = "user-facing rejection message")]
            {
                eprintln!("Coupon rejected: {err}");
            }

            return Ok(ExitCode::from(2));
        }
    };

    Receipt::new(&cart, application).write_to(io::stdout().lock())?;

    Ok(ExitCode::SUCCESS)
}
