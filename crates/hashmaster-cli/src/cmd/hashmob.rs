//! `hashmaster hashmob` - HashMob.net hashlists and founds

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Subcommand, ValueEnum};
use comfy_table::Cell;

use hashmaster_core::fmt_num;
use hashmaster_hashmob::{Hashlist, HashlistKind};

use super::{print_json, table, write_output};
use crate::config::Config;

#[derive(Args, Debug)]
pub struct HashmobArgs {
    #[command(subcommand)]
    pub action: HashmobAction,
}

#[derive(Clone, Copy, ValueEnum, Debug)]
pub enum ListKind {
    User,
    Official,
    Premium,
    All,
}

impl ListKind {
    fn kinds(self) -> &'static [HashlistKind] {
        match self {
            Self::User => &[HashlistKind::User],
            Self::Official => &[HashlistKind::Official],
            Self::Premium => &[HashlistKind::Premium],
            Self::All => &HashlistKind::ALL,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum HashmobAction {
    /// List hashlists
    Hashlists {
        #[arg(short, long, value_enum, default_value = "official")]
        kind: ListKind,

        /// Only hashlists of this hashcat mode
        #[arg(short = 't', long)]
        hash_type: Option<u32>,

        #[arg(long)]
        json: bool,
    },
    /// Download the uncracked hashes of a hashlist
    Left {
        id: u64,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Download the cracked hash:plain lines of a hashlist
    Found {
        id: u64,
        /// Hashcat mode of the founds
        hash_type: u32,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Submit a founds file (hash:plain lines)
    Submit {
        file: PathBuf,
        #[arg(short = 't', long)]
        hash_type: u32,
    },
    /// Full record of a hashlist
    Details { id: u64 },
}

pub fn run(args: HashmobArgs, config: &Config) -> Result<()> {
    let client = config.hashmob_client();
    match args.action {
        HashmobAction::Hashlists {
            kind,
            hash_type,
            json,
        } => {
            let lists = match (kind, hash_type) {
                (ListKind::All, Some(mode)) => client.all_hashlists(mode)?,
                _ => client.hashlists_of(kind.kinds(), hash_type)?,
            };
            if json {
                return print_json(&lists);
            }
            print_hashlists(&lists);
            Ok(())
        }
        HashmobAction::Left { id, output } => {
            let text = client.left_hashes(id)?;
            write_output(&text, output.as_deref())
        }
        HashmobAction::Found {
            id,
            hash_type,
            output,
        } => {
            let text = client.found_hashes(id, hash_type)?;
            write_output(&text, output.as_deref())
        }
        HashmobAction::Submit { file, hash_type } => {
            let founds = std::fs::read_to_string(&file)
                .with_context(|| format!("Failed to read founds file: {}", file.display()))?;
            let response = client.submit_founds(&founds, hash_type)?;
            println!("{response}");
            Ok(())
        }
        HashmobAction::Details { id } => print_json(&client.details(id)?),
    }
}

fn print_hashlists(lists: &[Hashlist]) {
    let mut t = table(&["List", "ID", "Mode", "Total", "Found", "Left", "Name"]);
    for l in lists {
        t.add_row(vec![
            Cell::new(l.list_type),
            Cell::new(l.id),
            Cell::new(l.hash_type),
            Cell::new(fmt_num(l.total_hashes)),
            Cell::new(fmt_num(l.found_hashes)),
            Cell::new(fmt_num(l.left_to_crack)),
            Cell::new(&l.name),
        ]);
    }
    println!("{t}");
    eprintln!("{} hashlists", lists.len());
}
