//! `hashmaster hashes-com` - escrow jobs, founds and earnings on Hashes.com

use std::path::PathBuf;

use anyhow::Result;
use chrono::{NaiveDate, NaiveDateTime};
use clap::{Args, Subcommand};
use comfy_table::{Cell, CellAlignment};

use hashmaster_hashes_com::{Currency, CurrencyTotals, Kraken, filter_last_days};

use super::{print_json, table};
use crate::config::Config;

#[derive(Args, Debug)]
pub struct HashesComArgs {
    #[command(subcommand)]
    pub action: HashesComAction,
}

#[derive(Subcommand, Debug)]
pub enum HashesComAction {
    /// Open jobs for one algorithm
    Jobs {
        /// Hashes.com algorithm id (1000 = NTLM)
        #[arg(short, long, default_value_t = 1000)]
        algorithm: u32,

        /// Only jobs created on or after this date (YYYY-MM-DD)
        #[arg(short, long, value_parser = parse_date)]
        since: Option<NaiveDateTime>,

        /// Minimum price per hash in USD
        #[arg(long, default_value_t = 0.01)]
        min_price: f64,

        #[arg(long)]
        json: bool,
    },
    /// Upload a founds file (hash:plain lines)
    Submit {
        file: PathBuf,

        #[arg(short, long)]
        algorithm: u32,
    },
    /// Founds upload history with USD values
    History {
        /// Only the last N days (0 = all)
        #[arg(short, long)]
        days: Option<u32>,

        #[arg(long)]
        json: bool,
    },
    /// Lifetime earnings in USD
    Profit,
}

fn parse_date(s: &str) -> Result<NaiveDateTime, String> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map(|d| d.and_hms_opt(0, 0, 0).unwrap_or_default())
        .map_err(|e| format!("Invalid date '{s}': {e}"))
}

pub fn run(args: HashesComArgs, config: &Config) -> Result<()> {
    let client = config.hashes_com_client()?;
    match args.action {
        HashesComAction::Jobs {
            algorithm,
            since,
            min_price,
            json,
        } => {
            let min_price = (min_price > 0.0).then_some(min_price);
            let jobs = client.jobs(algorithm, since, min_price)?;
            if json {
                return print_json(&jobs);
            }
            let mut t = table(&[
                "ID", "Created", "Algorithm", "Left", "Total", "Currency", "Price/hash", "USD/hash",
            ]);
            for job in &jobs {
                t.add_row(vec![
                    Cell::new(job.id),
                    Cell::new(&job.created_at),
                    Cell::new(&job.algorithm_name),
                    Cell::new(job.left_hashes).set_alignment(CellAlignment::Right),
                    Cell::new(job.total_hashes).set_alignment(CellAlignment::Right),
                    Cell::new(&job.currency),
                    Cell::new(format!("{:.8}", job.price_per_hash)),
                    Cell::new(format!("${:.3}", job.price_per_hash_usd)),
                ]);
            }
            println!("{t}");
            eprintln!("{} jobs", jobs.len());
            Ok(())
        }
        HashesComAction::Submit { file, algorithm } => {
            let response = client.submit_founds(&file, algorithm)?;
            println!("{response}");
            Ok(())
        }
        HashesComAction::History { days, json } => {
            let mut uploads = client.upload_history()?;
            if let Some(days) = days {
                uploads = filter_last_days(uploads, days, chrono::Local::now().naive_local());
            }
            uploads.sort_by(|a, b| a.uploaded().cmp(&b.uploaded()));
            if json {
                return print_json(&uploads);
            }

            let kraken = config.kraken();
            let mut t = table(&[
                "Date", "Status", "Algorithm", "Total", "Valid", "BTC", "BTC USD", "XMR", "XMR USD",
                "LTC", "LTC USD",
            ]);
            for u in &uploads {
                t.add_row(vec![
                    Cell::new(&u.date),
                    Cell::new(&u.status),
                    Cell::new(&u.algorithm),
                    Cell::new(u.total_hashes),
                    Cell::new(u.valid_hashes),
                    Cell::new(u.btc),
                    Cell::new(kraken.to_usd_string(u.btc, Currency::Btc)?),
                    Cell::new(u.xmr),
                    Cell::new(kraken.to_usd_string(u.xmr, Currency::Xmr)?),
                    Cell::new(u.ltc),
                    Cell::new(kraken.to_usd_string(u.ltc, Currency::Ltc)?),
                ]);
            }
            println!("{t}");
            print_totals(&kraken, &CurrencyTotals::of(&uploads))
        }
        HashesComAction::Profit => {
            let profit = client.profit()?;
            print_totals(&config.kraken(), &profit)
        }
    }
}

fn print_totals(kraken: &Kraken, totals: &CurrencyTotals) -> Result<()> {
    let mut t = table(&["Currency", "Amount", "USD"]);
    for (name, amount, currency) in [
        ("BTC", totals.btc, Currency::Btc),
        ("XMR", totals.xmr, Currency::Xmr),
        ("LTC", totals.ltc, Currency::Ltc),
    ] {
        t.add_row(vec![
            Cell::new(name),
            Cell::new(amount),
            Cell::new(kraken.to_usd_string(amount, currency)?),
        ]);
    }
    println!("{t}");
    Ok(())
}
