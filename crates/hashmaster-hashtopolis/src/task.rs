//! Tasks and supertasks

use hashmaster_core::ApiError;
use serde_json::Value;

use crate::client::Client;
use crate::models::{SupertaskSummary, SupertaskList, TaskList, TaskSummary};
use crate::request::Request;

/// Task colour used when none (or a null-ish one) is given
pub const DEFAULT_COLOR: &str = "5D5D5D";

/// How agents benchmark a task before receiving chunks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BenchmarkType {
    Runtime,
    #[default]
    Speed,
}

impl BenchmarkType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Runtime => "runtime",
            Self::Speed => "speed",
        }
    }

    /// Anything other than "runtime" benchmarks by speed
    pub fn from_name(name: &str) -> Self {
        if name.eq_ignore_ascii_case("runtime") {
            Self::Runtime
        } else {
            Self::Speed
        }
    }
}

/// Parameters of a new task.
///
/// `chunk_size == 0` means "use the server's chunk time" and forces dynamic
/// chunking. Otherwise `static_chunking` is 1 (fixed chunk size) or
/// 2 (fixed number of chunks); any other value falls back to dynamic (0).
#[derive(Debug, Clone)]
pub struct NewTask {
    pub name: String,
    pub hashlist_id: u64,
    pub attack_cmd: String,
    pub cracker_version_id: u64,
    pub files: Vec<u64>,
    pub cpu_only: bool,
    pub small: bool,
    pub priority: i64,
    pub max_agents: u64,
    pub chunk_size: u64,
    pub static_chunking: u8,
    pub benchmark: BenchmarkType,
    pub preprocessor_id: u64,
    pub preprocessor_command: String,
    pub color: Option<String>,
}

impl NewTask {
    pub fn new(
        name: impl Into<String>,
        hashlist_id: u64,
        attack_cmd: impl Into<String>,
        cracker_version_id: u64,
    ) -> Self {
        Self {
            name: name.into(),
            hashlist_id,
            attack_cmd: attack_cmd.into(),
            cracker_version_id,
            files: Vec::new(),
            cpu_only: false,
            small: false,
            priority: 0,
            max_agents: 0,
            chunk_size: 0,
            static_chunking: 0,
            benchmark: BenchmarkType::default(),
            preprocessor_id: 0,
            preprocessor_command: String::new(),
            color: None,
        }
    }

    /// A preprocessor (e.g. PRINCE) feeds the attack when an id is set
    pub fn uses_preprocessor(&self) -> bool {
        self.preprocessor_id > 0
    }

    /// Chunking resolved against the server's chunk time
    pub(crate) fn chunking(&self, server_chunk_time: impl FnOnce() -> Result<u64, ApiError>) -> Result<(u64, u8), ApiError> {
        if self.chunk_size == 0 {
            return Ok((server_chunk_time()?, 0));
        }
        let mode = match self.static_chunking {
            1 | 2 => self.static_chunking,
            _ => 0,
        };
        Ok((self.chunk_size, mode))
    }

    pub(crate) fn to_request(&self, chunk_size: u64, static_chunking: u8, status_timer: u64) -> Request {
        Request::new("task", "createTask")
            .with("name", self.name.as_str())
            .with("hashlistId", self.hashlist_id)
            .with("attackCmd", self.attack_cmd.as_str())
            .with("chunksize", chunk_size)
            .with("staticChunking", static_chunking)
            .with("statusTimer", status_timer)
            .with("benchmarkType", self.benchmark.as_str())
            .with("color", normalize_color(self.color.as_deref()))
            .with("isCpuOnly", self.cpu_only)
            .with("isSmall", self.small)
            .with("skip", 0)
            .with("crackerVersionId", self.cracker_version_id)
            .with("files", self.files.clone())
            .with("priority", self.priority)
            .with("maxAgents", self.max_agents)
            .with("usePreprocessor", self.uses_preprocessor())
            .with("preprocessorId", self.preprocessor_id)
            .with("preprocessorCommand", self.preprocessor_command.as_str())
    }
}

/// Exported task definitions carry colours like "", "null" or "None"
pub fn normalize_color(color: Option<&str>) -> String {
    match color.map(str::trim) {
        None | Some("") => DEFAULT_COLOR.to_string(),
        Some(c) if c.eq_ignore_ascii_case("null") || c.eq_ignore_ascii_case("none") => {
            DEFAULT_COLOR.to_string()
        }
        Some(c) => c.trim_start_matches('#').to_string(),
    }
}

impl Client {
    /// `task/createTask`, returning the new task id.
    ///
    /// Status timer and (for dynamic chunking) chunk time come from the server config.
    pub fn create_task(&self, task: &NewTask) -> Result<u64, ApiError> {
        let (chunk_size, static_chunking) =
            task.chunking(|| self.server_config_u64("chunktime"))?;
        let status_timer = self.server_config_u64("statustimer")?;
        let request = task.to_request(chunk_size, static_chunking, status_timer);
        log::debug!("createTask {:?}", request);

        let response = self.submit(request)?;
        let task_id = response
            .get("taskId")
            .and_then(Value::as_u64)
            .ok_or_else(|| ApiError::Decode("createTask response without taskId".into()))?;
        log::info!("Created task {task_id} '{}' on hashlist {}", task.name, task.hashlist_id);
        Ok(task_id)
    }

    /// `task/getTask`: full details of a task or subtask (not supertasks)
    pub fn get_task(&self, task_id: u64) -> Result<Value, ApiError> {
        self.submit(Request::new("task", "getTask").with("taskId", task_id))
    }

    /// `task/listTasks`: tasks and supertasks
    pub fn list_tasks(&self) -> Result<Vec<TaskSummary>, ApiError> {
        let list: TaskList = self.submit_as(Request::new("task", "listTasks"))?;
        Ok(list.tasks)
    }

    /// `task/setTaskCpuOnly`
    pub fn set_task_cpu_only(&self, task_id: u64, cpu_only: bool) -> Result<(), ApiError> {
        self.submit(
            Request::new("task", "setTaskCpuOnly")
                .with("taskId", task_id)
                .with("isCpuOnly", cpu_only),
        )?;
        Ok(())
    }

    /// `task/archiveTask`
    pub fn archive_task(&self, task_id: u64) -> Result<(), ApiError> {
        self.submit(Request::new("task", "archiveTask").with("taskId", task_id))?;
        Ok(())
    }

    /// `task/deleteTask`
    pub fn delete_task(&self, task_id: u64) -> Result<(), ApiError> {
        self.submit(Request::new("task", "deleteTask").with("taskId", task_id))?;
        Ok(())
    }

    /// `task/runSupertask`: instantiate a preconfigured supertask on a hashlist
    pub fn run_supertask(
        &self,
        supertask_id: u64,
        hashlist_id: u64,
        cracker_version_id: u64,
    ) -> Result<(), ApiError> {
        self.submit(
            Request::new("task", "runSupertask")
                .with("hashlistId", hashlist_id)
                .with("supertaskId", supertask_id)
                .with("crackerVersionId", cracker_version_id),
        )?;
        Ok(())
    }

    /// `task/listSubtasks` of a running supertask
    pub fn list_subtasks(&self, supertask_id: u64) -> Result<Value, ApiError> {
        self.submit(Request::new("task", "listSubtasks").with("supertaskId", supertask_id))
    }

    /// `task/archiveSupertask`
    pub fn archive_supertask(&self, supertask_id: u64) -> Result<(), ApiError> {
        self.submit(Request::new("task", "archiveSupertask").with("supertaskId", supertask_id))?;
        Ok(())
    }

    /// `task/deleteSupertask`
    pub fn delete_supertask(&self, supertask_id: u64) -> Result<(), ApiError> {
        self.submit(Request::new("task", "deleteSupertask").with("supertaskId", supertask_id))?;
        Ok(())
    }

    /// `supertask/listSupertasks`: preconfigured supertasks
    pub fn list_supertasks(&self) -> Result<Vec<SupertaskSummary>, ApiError> {
        let list: SupertaskList = self.submit_as(Request::new("supertask", "listSupertasks"))?;
        Ok(list.supertasks)
    }

    /// `supertask/getSupertask`: a preconfigured supertask and its pretasks
    pub fn get_supertask(&self, supertask_id: u64) -> Result<Value, ApiError> {
        self.submit(Request::new("supertask", "getSupertask").with("supertaskId", supertask_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task() -> NewTask {
        NewTask::new("API Task", 1, "#HL# -a 0 -r dive.rule example.dict", 2)
    }

    #[test]
    fn zero_chunk_size_uses_server_chunk_time() {
        let mut t = task();
        t.static_chunking = 2;
        assert_eq!(t.chunking(|| Ok(600)).unwrap(), (600, 0));
    }

    #[test]
    fn explicit_chunk_size_keeps_valid_mode() {
        let mut t = task();
        t.chunk_size = 1200;
        t.static_chunking = 1;
        let (size, mode) = t
            .chunking(|| panic!("server must not be asked"))
            .unwrap();
        assert_eq!((size, mode), (1200, 1));
    }

    #[test]
    fn invalid_static_chunking_falls_back_to_dynamic() {
        let mut t = task();
        t.chunk_size = 1200;
        t.static_chunking = 7;
        assert_eq!(t.chunking(|| Ok(0)).unwrap(), (1200, 0));
    }

    #[test]
    fn chunk_time_error_propagates() {
        let t = task();
        let err = t
            .chunking(|| Err(ApiError::Decode("boom".into())))
            .unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
    }

    #[test]
    fn colors_normalized() {
        assert_eq!(normalize_color(None), "5D5D5D");
        assert_eq!(normalize_color(Some("")), "5D5D5D");
        assert_eq!(normalize_color(Some("null")), "5D5D5D");
        assert_eq!(normalize_color(Some("None")), "5D5D5D");
        assert_eq!(normalize_color(Some("#3DD2FF")), "3DD2FF");
    }

    #[test]
    fn benchmark_names() {
        assert_eq!(BenchmarkType::from_name("runtime"), BenchmarkType::Runtime);
        assert_eq!(BenchmarkType::from_name("speed"), BenchmarkType::Speed);
        assert_eq!(BenchmarkType::from_name("anything"), BenchmarkType::Speed);
    }

    #[test]
    fn create_request_fields() {
        let mut t = task();
        t.files = vec![346, 347];
        t.small = true;
        t.benchmark = BenchmarkType::Runtime;
        let req = t.to_request(600, 0, 5);
        assert_eq!(req.name(), "createTask");
        assert_eq!(req.field("chunksize").unwrap(), 600);
        assert_eq!(req.field("statusTimer").unwrap(), 5);
        assert_eq!(req.field("isSmall").unwrap(), true);
        assert_eq!(req.field("isCpuOnly").unwrap(), false);
        assert_eq!(req.field("skip").unwrap(), 0);
        assert_eq!(req.field("files"), Some(&Value::from(vec![346u64, 347])));
        assert_eq!(req.field("benchmarkType"), Some(&Value::from("runtime")));
        assert_eq!(req.field("color"), Some(&Value::from("5D5D5D")));
        assert_eq!(req.field("usePreprocessor").unwrap(), false);
        assert_eq!(req.field("preprocessorId").unwrap(), 0);
    }

    #[test]
    fn preprocessor_request_fields() {
        let mut t = task();
        t.preprocessor_id = 1;
        t.preprocessor_command = "Names_v1.txt --elem-cnt-min=2 --elem-cnt-max=2 --pw-min=8".into();
        let req = t.to_request(600, 0, 5);
        assert_eq!(req.field("usePreprocessor").unwrap(), true);
        assert_eq!(req.field("preprocessorId").unwrap(), 1);
        assert_eq!(
            req.field("preprocessorCommand"),
            Some(&Value::from("Names_v1.txt --elem-cnt-min=2 --elem-cnt-max=2 --pw-min=8"))
        );
    }
}
