//! `hashmaster hashtopolis` - manage a Hashtopolis server

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use comfy_table::{Cell, Color};

use hashmaster_core::{SharedProgress, fmt_num};
use hashmaster_hashtopolis::{
    BenchmarkType, Client, ImportSummary, MAX_CHUNK_SIZE_MB, NewHashlist, NewTask, TaskKind,
};

use super::{print_json, table, write_output};
use crate::config::Config;

#[derive(Args, Debug)]
pub struct HashtopolisArgs {
    #[command(subcommand)]
    pub action: HashtopolisAction,
}

#[derive(Subcommand, Debug)]
pub enum HashtopolisAction {
    /// Hashlists
    Hashlist {
        #[command(subcommand)]
        action: HashlistAction,
    },
    /// Superhashlists
    Superhashlist {
        #[command(subcommand)]
        action: SuperhashlistAction,
    },
    /// Tasks
    Task {
        #[command(subcommand)]
        action: TaskAction,
    },
    /// Supertasks (preconfigured and running)
    Supertask {
        #[command(subcommand)]
        action: SupertaskAction,
    },
    /// Preconfigured tasks
    Pretask {
        #[command(subcommand)]
        action: PretaskAction,
    },
    /// Server-side files
    File {
        #[command(subcommand)]
        action: FileAction,
    },
    /// Agents
    Agent {
        #[command(subcommand)]
        action: AgentAction,
    },
    /// Server configuration and crackers
    Server {
        #[command(subcommand)]
        action: ServerAction,
    },
    /// Import a precracked hash:plain file into a hashlist in chunks
    ImportCracked {
        /// Target hashlist
        #[arg(short = 'l', long)]
        hashlist: u64,

        /// File with one hash:plain per line
        file: PathBuf,

        /// Chunk size in MiB (default: from config)
        #[arg(long, value_parser = clap::value_parser!(u64).range(1..=MAX_CHUNK_SIZE_MB))]
        chunk_size_mb: Option<u64>,
    },
    /// Every distinct plaintext cracked on the server
    Plaintexts {
        /// Write to file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand, Debug)]
pub enum HashlistAction {
    /// List hashlists
    List {
        /// Show archived hashlists instead
        #[arg(long)]
        archived: bool,
        #[arg(long)]
        json: bool,
    },
    /// Create a hashlist from a file
    Create {
        #[arg(short, long)]
        name: String,

        /// Hashcat mode
        #[arg(short = 't', long)]
        hash_type: u32,

        /// File with one hash per line
        file: PathBuf,

        #[arg(long)]
        secret: bool,

        #[arg(long)]
        salted: bool,

        #[arg(long)]
        hex_salt: bool,

        /// Hash/salt separator
        #[arg(long, default_value = ":")]
        separator: String,
    },
    /// Cracked hashes as hash:plain lines
    Cracked {
        id: u64,
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[arg(long)]
        json: bool,
    },
    /// Export uncracked hashes to a new server-side file
    ExportLeft { id: u64 },
    /// Generate a wordlist of cracked plains as a new server-side file
    Wordlist { id: u64 },
    /// Delete a hashlist
    Delete { id: u64 },
}

#[derive(Subcommand, Debug)]
pub enum SuperhashlistAction {
    /// List superhashlists
    List {
        #[arg(long)]
        json: bool,
    },
    /// Combine hashlists into a superhashlist
    Create {
        #[arg(short, long)]
        name: String,
        /// Member hashlist ids
        #[arg(required = true)]
        hashlists: Vec<u64>,
    },
    /// Delete a superhashlist
    Delete { id: u64 },
}

#[derive(Subcommand, Debug)]
pub enum TaskAction {
    /// List tasks and supertasks
    List {
        #[arg(long)]
        json: bool,
    },
    /// Full details of a task
    Get { id: u64 },
    /// Create a task
    Create {
        #[arg(short, long)]
        name: String,

        #[arg(short = 'l', long)]
        hashlist: u64,

        /// Attack command, e.g. "#HL# -a 0 -r dive.rule rockyou.txt"
        #[arg(short, long)]
        attack: String,

        /// Cracker version (default: newest hashcat)
        #[arg(long)]
        cracker_version: Option<u64>,

        /// File ids the attack uses
        #[arg(short, long = "file")]
        files: Vec<u64>,

        #[arg(long, default_value_t = 0)]
        priority: i64,

        #[arg(long, default_value_t = 0)]
        max_agents: u64,

        /// Fixed chunk size; 0 uses the server's chunk time
        #[arg(long, default_value_t = 0)]
        chunk_size: u64,

        /// 0 = dynamic, 1 = fixed chunk size, 2 = fixed number of chunks
        #[arg(long, default_value_t = 0)]
        static_chunking: u8,

        #[arg(long)]
        cpu_only: bool,

        #[arg(long)]
        small: bool,

        /// Benchmark by runtime instead of speed
        #[arg(long)]
        runtime_benchmark: bool,

        /// Hex colour, e.g. 3DD2FF
        #[arg(long)]
        color: Option<String>,

        /// Preprocessor id (e.g. PRINCE); enables the preprocessor
        #[arg(long)]
        preprocessor_id: Option<u64>,

        /// Preprocessor arguments, e.g. "words.txt --pw-min=8"
        #[arg(long, requires = "preprocessor_id")]
        preprocessor_command: Option<String>,
    },
    /// Create a task from an exported task definition (JSON, UTF-8 or UTF-16)
    Import {
        definition: PathBuf,
        #[arg(short = 'l', long)]
        hashlist: u64,
        #[arg(long)]
        cracker_version: Option<u64>,
    },
    /// Toggle CPU-only
    CpuOnly {
        id: u64,
        #[arg(long, action = clap::ArgAction::Set, default_value_t = true)]
        enabled: bool,
    },
    /// Archive a task
    Archive { id: u64 },
    /// Delete a task
    Delete { id: u64 },
}

#[derive(Subcommand, Debug)]
pub enum SupertaskAction {
    /// List preconfigured supertasks
    List {
        #[arg(long)]
        json: bool,
    },
    /// A preconfigured supertask and its pretasks
    Get { id: u64 },
    /// Run a preconfigured supertask on a hashlist
    Run {
        id: u64,
        #[arg(short = 'l', long)]
        hashlist: u64,
        #[arg(long)]
        cracker_version: Option<u64>,
    },
    /// Subtasks of a running supertask
    Subtasks { id: u64 },
    /// Archive a running supertask
    Archive { id: u64 },
    /// Delete a running supertask
    Delete { id: u64 },
}

#[derive(Subcommand, Debug)]
pub enum PretaskAction {
    /// Toggle CPU-only
    CpuOnly {
        id: u64,
        #[arg(long, action = clap::ArgAction::Set, default_value_t = true)]
        enabled: bool,
    },
    /// Delete a pretask
    Delete { id: u64 },
}

#[derive(Subcommand, Debug)]
pub enum FileAction {
    /// List files
    List {
        #[arg(long)]
        json: bool,
    },
    /// Metadata of a file
    Get { id: u64 },
    /// Download a file's contents
    Download {
        id: u64,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Upload a local file as a wordlist
    Upload {
        path: PathBuf,
        /// Name on the server (default: local file name)
        #[arg(short, long)]
        name: Option<String>,
    },
    /// Delete a file
    Delete { id: u64 },
    /// Mark every file as not secret
    UnsecretAll,
}

#[derive(Subcommand, Debug)]
pub enum AgentAction {
    /// List agents
    List {
        #[arg(long)]
        json: bool,
    },
    /// Full settings of an agent
    Get { id: u64 },
    /// Set extra cracker parameters
    ExtraParams { id: u64, params: String },
    /// Activate or deactivate an agent
    Active {
        id: u64,
        #[arg(action = clap::ArgAction::Set)]
        active: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum ServerAction {
    /// One config item, or all of them
    Config { item: Option<String> },
    /// Installed hashcat versions
    Cracker {
        #[arg(long)]
        json: bool,
    },
}

pub fn run(args: HashtopolisArgs, config: &Config, progress: &SharedProgress) -> Result<()> {
    let client = config.hashtopolis_client()?;
    match args.action {
        HashtopolisAction::Hashlist { action } => hashlist(&client, action),
        HashtopolisAction::Superhashlist { action } => superhashlist(&client, action),
        HashtopolisAction::Task { action } => task(&client, action),
        HashtopolisAction::Supertask { action } => supertask(&client, action),
        HashtopolisAction::Pretask { action } => pretask(&client, action),
        HashtopolisAction::File { action } => file(&client, action),
        HashtopolisAction::Agent { action } => agent(&client, action),
        HashtopolisAction::Server { action } => server(&client, action),
        HashtopolisAction::ImportCracked {
            hashlist,
            file,
            chunk_size_mb,
        } => {
            let chunk_size_mb = chunk_size_mb.unwrap_or(config.import.chunk_size_mb);
            let summary = client.import_cracked_file(hashlist, &file, chunk_size_mb, progress)?;
            print_import_summary(hashlist, &file, &summary);
            Ok(())
        }
        HashtopolisAction::Plaintexts { output } => {
            let plains = client.known_plaintexts()?;
            log::info!("{} distinct plaintexts", fmt_num(plains.len() as u64));
            let mut text = plains.join("\n");
            if !text.is_empty() {
                text.push('\n');
            }
            write_output(&text, output.as_deref())
        }
    }
}

/// Explicit version, else the newest installed hashcat
fn cracker_version(client: &Client, explicit: Option<u64>) -> Result<u64> {
    if let Some(id) = explicit {
        return Ok(id);
    }
    let cracker = client.get_cracker()?;
    cracker
        .cracker_versions
        .iter()
        .map(|v| v.version_id)
        .max()
        .context("Hashtopolis has no hashcat version installed")
}

fn hashlist(client: &Client, action: HashlistAction) -> Result<()> {
    match action {
        HashlistAction::List { archived, json } => {
            let lists = if archived {
                client.list_archived_hashlists()?
            } else {
                client.list_hashlists()?
            };
            if json {
                return print_json(&lists);
            }
            let mut t = table(&["ID", "Name", "Mode", "Format", "Hashes"]);
            for l in &lists {
                t.add_row(vec![
                    Cell::new(l.hashlist_id),
                    Cell::new(&l.name),
                    Cell::new(l.hashtype_id),
                    Cell::new(l.format),
                    Cell::new(fmt_num(l.hash_count)),
                ]);
            }
            println!("{t}");
            eprintln!("{} hashlists", lists.len());
            Ok(())
        }
        HashlistAction::Create {
            name,
            hash_type,
            file,
            secret,
            salted,
            hex_salt,
            separator,
        } => {
            let data = std::fs::read_to_string(&file)
                .with_context(|| format!("Failed to read hashlist: {}", file.display()))?;
            let mut list = NewHashlist::new(name, hash_type, data);
            list.is_secret = secret;
            list.is_salted = salted;
            list.is_hex_salt = hex_salt;
            list.separator = separator;
            let id = client.create_hashlist(&list)?;
            eprintln!("Created hashlist {id}");
            Ok(())
        }
        HashlistAction::Cracked { id, output, json } => {
            let cracked = client.cracked_hashes(id)?;
            if json {
                return print_json(&cracked);
            }
            let text: String = cracked
                .iter()
                .map(|c| format!("{}:{}\n", c.hash, c.plain))
                .collect();
            write_output(&text, output.as_deref())
        }
        HashlistAction::ExportLeft { id } => {
            let created = client.export_left(id)?;
            eprintln!("Exported to file {} ({})", created.file_id, created.filename);
            Ok(())
        }
        HashlistAction::Wordlist { id } => {
            let created = client.generate_wordlist(id)?;
            eprintln!("Wordlist is file {} ({})", created.file_id, created.filename);
            Ok(())
        }
        HashlistAction::Delete { id } => {
            client.delete_hashlist(id)?;
            eprintln!("Deleted hashlist {id}");
            Ok(())
        }
    }
}

fn superhashlist(client: &Client, action: SuperhashlistAction) -> Result<()> {
    match action {
        SuperhashlistAction::List { json } => {
            let lists = client.list_superhashlists()?;
            if json {
                return print_json(&lists);
            }
            let mut t = table(&["ID", "Name", "Mode", "Hashes"]);
            for l in &lists {
                t.add_row(vec![
                    Cell::new(l.hashlist_id),
                    Cell::new(&l.name),
                    Cell::new(l.hashtype_id),
                    Cell::new(fmt_num(l.hash_count)),
                ]);
            }
            println!("{t}");
            Ok(())
        }
        SuperhashlistAction::Create { name, hashlists } => {
            client.create_superhashlist(&name, &hashlists)?;
            eprintln!("Created superhashlist '{name}' from {} hashlists", hashlists.len());
            Ok(())
        }
        SuperhashlistAction::Delete { id } => {
            client.delete_superhashlist(id)?;
            eprintln!("Deleted superhashlist {id}");
            Ok(())
        }
    }
}

fn task(client: &Client, action: TaskAction) -> Result<()> {
    match action {
        TaskAction::List { json } => {
            let tasks = client.list_tasks()?;
            if json {
                return print_json(&tasks);
            }
            let mut t = table(&["ID", "Kind", "Name", "Hashlist", "Priority"]);
            for task in &tasks {
                let kind = match task.kind() {
                    TaskKind::Task => Cell::new("task"),
                    TaskKind::Supertask => Cell::new("supertask").fg(Color::Yellow),
                };
                t.add_row(vec![
                    Cell::new(task.id()),
                    kind,
                    Cell::new(&task.name),
                    Cell::new(task.hashlist_id),
                    Cell::new(task.priority),
                ]);
            }
            println!("{t}");
            Ok(())
        }
        TaskAction::Get { id } => print_json(&client.get_task(id)?),
        TaskAction::Create {
            name,
            hashlist,
            attack,
            cracker_version: version,
            files,
            priority,
            max_agents,
            chunk_size,
            static_chunking,
            cpu_only,
            small,
            runtime_benchmark,
            color,
            preprocessor_id,
            preprocessor_command,
        } => {
            let version = cracker_version(client, version)?;
            let mut task = NewTask::new(name, hashlist, attack, version);
            task.files = files;
            task.priority = priority;
            task.max_agents = max_agents;
            task.chunk_size = chunk_size;
            task.static_chunking = static_chunking;
            task.cpu_only = cpu_only;
            task.small = small;
            task.color = color;
            if runtime_benchmark {
                task.benchmark = BenchmarkType::Runtime;
            }
            task.preprocessor_id = preprocessor_id.unwrap_or(0);
            task.preprocessor_command = preprocessor_command.unwrap_or_default();
            let id = client.create_task(&task)?;
            eprintln!("Created task {id}");
            Ok(())
        }
        TaskAction::Import {
            definition,
            hashlist,
            cracker_version: version,
        } => {
            let version = cracker_version(client, version)?;
            let id = client.import_task_definition(&definition, hashlist, version)?;
            eprintln!("Created task {id} from {}", definition.display());
            Ok(())
        }
        TaskAction::CpuOnly { id, enabled } => {
            client.set_task_cpu_only(id, enabled)?;
            eprintln!("Task {id} CPU-only: {enabled}");
            Ok(())
        }
        TaskAction::Archive { id } => {
            client.archive_task(id)?;
            eprintln!("Archived task {id}");
            Ok(())
        }
        TaskAction::Delete { id } => {
            client.delete_task(id)?;
            eprintln!("Deleted task {id}");
            Ok(())
        }
    }
}

fn supertask(client: &Client, action: SupertaskAction) -> Result<()> {
    match action {
        SupertaskAction::List { json } => {
            let supertasks = client.list_supertasks()?;
            if json {
                return print_json(&supertasks);
            }
            let mut t = table(&["ID", "Name"]);
            for s in &supertasks {
                t.add_row(vec![Cell::new(s.supertask_id), Cell::new(&s.name)]);
            }
            println!("{t}");
            Ok(())
        }
        SupertaskAction::Get { id } => print_json(&client.get_supertask(id)?),
        SupertaskAction::Run {
            id,
            hashlist,
            cracker_version: version,
        } => {
            let version = cracker_version(client, version)?;
            client.run_supertask(id, hashlist, version)?;
            eprintln!("Started supertask {id} on hashlist {hashlist}");
            Ok(())
        }
        SupertaskAction::Subtasks { id } => print_json(&client.list_subtasks(id)?),
        SupertaskAction::Archive { id } => {
            client.archive_supertask(id)?;
            eprintln!("Archived supertask {id}");
            Ok(())
        }
        SupertaskAction::Delete { id } => {
            client.delete_supertask(id)?;
            eprintln!("Deleted supertask {id}");
            Ok(())
        }
    }
}

fn pretask(client: &Client, action: PretaskAction) -> Result<()> {
    match action {
        PretaskAction::CpuOnly { id, enabled } => {
            client.set_pretask_cpu_only(id, enabled)?;
            eprintln!("Pretask {id} CPU-only: {enabled}");
        }
        PretaskAction::Delete { id } => {
            client.delete_pretask(id)?;
            eprintln!("Deleted pretask {id}");
        }
    }
    Ok(())
}

fn file(client: &Client, action: FileAction) -> Result<()> {
    match action {
        FileAction::List { json } => {
            let files = client.list_files()?;
            if json {
                return print_json(&files);
            }
            let mut t = table(&["ID", "Type", "Filename"]);
            for f in &files {
                t.add_row(vec![
                    Cell::new(f.file_id),
                    Cell::new(f.file_type),
                    Cell::new(&f.filename),
                ]);
            }
            println!("{t}");
            Ok(())
        }
        FileAction::Get { id } => print_json(&client.get_file(id)?),
        FileAction::Download { id, output } => {
            let text = client.download_file(id)?;
            write_output(&text, output.as_deref())
        }
        FileAction::Upload { path, name } => {
            let name = match name {
                Some(name) => name,
                None => upload_name(&path)?,
            };
            let contents = std::fs::read(&path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            client.upload_file(&name, &contents)?;
            eprintln!("Uploaded {} as '{name}'", path.display());
            Ok(())
        }
        FileAction::Delete { id } => {
            client.delete_file(id)?;
            eprintln!("Deleted file {id}");
            Ok(())
        }
        FileAction::UnsecretAll => {
            let count = client.set_all_files_not_secret()?;
            eprintln!("{count} files are no longer secret");
            Ok(())
        }
    }
}

fn upload_name(path: &Path) -> Result<String> {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .with_context(|| format!("No file name in {}", path.display()))
}

fn agent(client: &Client, action: AgentAction) -> Result<()> {
    match action {
        AgentAction::List { json } => {
            let agents = client.list_agents()?;
            if json {
                return print_json(&agents);
            }
            let mut t = table(&["ID", "Name", "Devices"]);
            for a in &agents {
                t.add_row(vec![
                    Cell::new(a.agent_id),
                    Cell::new(&a.name),
                    Cell::new(a.devices.join("\n")),
                ]);
            }
            println!("{t}");
            Ok(())
        }
        AgentAction::Get { id } => print_json(&client.get_agent(id)?),
        AgentAction::ExtraParams { id, params } => {
            client.set_agent_extra_params(id, &params)?;
            eprintln!("Agent {id} extra parameters: {params}");
            Ok(())
        }
        AgentAction::Active { id, active } => {
            client.set_agent_active(id, active)?;
            eprintln!("Agent {id} active: {active}");
            Ok(())
        }
    }
}

fn server(client: &Client, action: ServerAction) -> Result<()> {
    match action {
        ServerAction::Config { item: Some(item) } => {
            let config = client.get_server_config(&item)?;
            let mut t = table(&["Item", "Type", "Value"]);
            t.add_row(vec![
                Cell::new(&config.item),
                Cell::new(&config.config_type),
                Cell::new(&config.value),
            ]);
            println!("{t}");
            Ok(())
        }
        ServerAction::Config { item: None } => print_json(&client.list_server_config()?),
        ServerAction::Cracker { json } => {
            let cracker = client.get_cracker()?;
            if json {
                return print_json(&cracker);
            }
            let mut t = table(&["Version ID", "Version", "Binary"]);
            for v in &cracker.cracker_versions {
                t.add_row(vec![
                    Cell::new(v.version_id),
                    Cell::new(&v.version),
                    Cell::new(&v.binary_basename),
                ]);
            }
            println!("{} (type {})", cracker.cracker_type_name, cracker.cracker_type_id);
            println!("{t}");
            Ok(())
        }
    }
}

fn print_import_summary(hashlist: u64, file: &Path, summary: &ImportSummary) {
    let totals = &summary.totals;
    let mut t = table(&["Import", "Value"]);
    t.add_row(vec!["Hashlist", &hashlist.to_string()]);
    t.add_row(vec!["File", &file.display().to_string()]);
    t.add_row(vec!["Chunks", &summary.chunks_submitted.to_string()]);
    t.add_row(vec!["Lines processed", &fmt_num(totals.lines_processed)]);
    t.add_row(vec!["New cracks", &fmt_num(totals.new_cracked)]);
    t.add_row(vec!["Already cracked", &fmt_num(totals.already_cracked)]);
    t.add_row(vec!["Invalid lines", &fmt_num(totals.invalid_lines)]);
    t.add_row(vec!["Not found", &fmt_num(totals.not_found)]);
    t.add_row(vec!["Too long plains", &fmt_num(totals.too_long_plains)]);
    t.add_row(vec!["Elapsed", &format!("{:.1}s", summary.elapsed.as_secs_f64())]);
    if summary.interrupted {
        t.add_row(vec![
            Cell::new("Status"),
            Cell::new("interrupted").fg(Color::Yellow),
        ]);
    }
    println!("{t}");
}
