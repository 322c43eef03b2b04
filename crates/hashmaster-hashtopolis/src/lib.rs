//! HashMaster Hashtopolis - client for the Hashtopolis user API
//!
//! Every operation is a JSON POST to `<server>/api/user.php` carrying a
//! `section`, a `request` and the user's access key. Besides thin wrappers
//! for hashlists, tasks, files and agents this crate provides a chunked
//! importer for large precracked `hash:plain` files.
//!
//! # Example
//!
//! ```no_run
//! use hashmaster_hashtopolis::{Client, NewHashlist};
//!
//! let client = Client::new("http://10.100.100.200:80", "my-access-key");
//! let id = client
//!     .create_hashlist(&NewHashlist::new("leak", 1000, "8846f7eaee8fb117ad06bdd830b7586c\n"))
//!     .expect("create failed");
//! println!("created hashlist {id}");
//! ```

pub mod algorithms;
pub mod client;
pub mod file;
pub mod hashlist;
pub mod import;
pub mod models;
pub mod pretask;
pub mod request;
pub mod server;
pub mod task;

// Re-exports for convenience
pub use client::{Client, SERVICE};
pub use hashlist::NewHashlist;
pub use import::{
    ChunkBatcher, ChunkReport, DEFAULT_CHUNK_SIZE_MB, ImportCounters, ImportProgress, MAX_CHUNK_SIZE_MB,
    ImportSummary, estimated_chunks, fmt_remaining, import_file,
};
pub use models::{
    AgentSummary, ConfigItem, CrackedHash, CrackerInfo, CrackerVersion, CreatedFile, FileDetails,
    FileSummary, HashlistSummary, SupertaskSummary, TaskKind, TaskSummary,
};
pub use pretask::TaskDefinition;
pub use request::Request;
pub use task::{BenchmarkType, NewTask};
