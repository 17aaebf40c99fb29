//! Album service: mostly reads, occasional writes

use crate::payload::Album;
use crate::request::RequestSpec;
use crate::scenario::Scenario;
use crate::task::{Task, TaskSet};
use crate::wait::WaitTime;
use rand::rngs::StdRng;

/// Lists albums three times as often as it creates one
#[derive(Debug, Clone)]
pub struct AlbumScenario {
    tasks: TaskSet<Self>,
}

impl AlbumScenario {
    pub fn new() -> Self {
        Self {
            tasks: TaskSet::new(vec![
                Task::new("get_albums", 3, Self::get_albums),
                Task::new("post_album", 1, Self::post_album),
            ]),
        }
    }

    fn get_albums(&self, _rng: &mut StdRng) -> RequestSpec {
        RequestSpec::get("/albums")
    }

    fn post_album(&self, _rng: &mut StdRng) -> RequestSpec {
        RequestSpec::post("/albums").json(Album::sample().to_json())
    }
}

impl Default for AlbumScenario {
    fn default() -> Self {
        Self::new()
    }
}

impl Scenario for AlbumScenario {
    fn name(&self) -> &'static str {
        "album"
    }

    fn description(&self) -> &'static str {
        "GET /albums and POST /albums in a 3:1 ratio"
    }

    fn wait_time(&self) -> WaitTime {
        WaitTime::between_secs(1.0, 2.0)
    }

    fn tasks(&self) -> &TaskSet<Self> {
        &self.tasks
    }
}
