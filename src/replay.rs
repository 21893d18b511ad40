use crate::error::MowerResult;
use crate::lawn::GridBounds;
use crate::mower::{Command, CommandOutcome, Status};
use serde_json::json;
use std::{collections::HashMap, fs::File, io::BufWriter, io::Write};

/// Creates the replay logger for a scenario.
///
/// # Arguments
/// * `filename` - Where to save the replay. If `None`, nothing is recorded.
/// * `bounds` - The bounds of the lawn being replayed.
pub fn create_replay_logger(filename: Option<String>, bounds: GridBounds) -> Box<dyn ReplayLogger> {
    match filename {
        None => Box::new(NoOpReplayLogger {}),
        Some(filename) => Box::new(JsonReplayLogger::new(filename, bounds)),
    }
}

/// Observer of a scenario replay. Every method defaults to doing nothing.
pub trait ReplayLogger: Send + Sync {
    #[allow(unused_variables)]
    fn log_start(&mut self, id: &str, program: String, initial: Status) {}

    #[allow(unused_variables)]
    fn log_event(&mut self, id: &str, event: Event) {}

    #[allow(unused_variables)]
    fn log_finish(&mut self, id: &str, status: Status) {}

    fn clear(&mut self) {}

    fn save(&self) -> MowerResult<()> {
        Ok(())
    }

    fn log_step(
        &mut self,
        id: &str,
        step: usize,
        command: Command,
        outcome: CommandOutcome,
        status: Status,
    ) {
        self.log_event(
            id,
            Event {
                step,
                command,
                event_type: outcome,
                status,
            },
        );
    }
}

/// A single command applied to a mower, as written to the replay file.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct Event {
    /// 1-based index of the command in the mower program.
    pub step: usize,
    pub command: Command,
    pub event_type: CommandOutcome,
    /// Status of the mower once the command was applied.
    pub status: Status,
}

struct Track {
    id: String,
    program: String,
    initial: Status,
    last: Option<Status>,
}

struct NoOpReplayLogger;
impl ReplayLogger for NoOpReplayLogger {}

struct JsonReplayLogger {
    filename: String,
    bounds: GridBounds,
    tracks: Vec<Track>,
    events: HashMap<String, Vec<Event>>,
}

impl JsonReplayLogger {
    pub fn new(filename: String, bounds: GridBounds) -> JsonReplayLogger {
        JsonReplayLogger {
            filename,
            bounds,
            tracks: Vec::new(),
            events: HashMap::new(),
        }
    }
}

impl ReplayLogger for JsonReplayLogger {
    fn log_start(&mut self, id: &str, program: String, initial: Status) {
        self.tracks.push(Track {
            id: id.to_string(),
            program,
            initial,
            last: None,
        });
    }

    fn log_event(&mut self, id: &str, event: Event) {
        self.events.entry(id.to_string()).or_default().push(event);
    }

    fn log_finish(&mut self, id: &str, status: Status) {
        if let Some(track) = self.tracks.iter_mut().find(|track| track.id == id) {
            track.last = Some(status);
        }
    }

    fn clear(&mut self) {
        self.tracks.clear();
        self.events.clear();
    }

    fn save(&self) -> MowerResult<()> {
        let file = File::create(&self.filename)?;
        let mowers: Vec<_> = self
            .tracks
            .iter()
            .map(|track| {
                json!({
                    "id": track.id,
                    "program": track.program,
                    "initial": track.initial,
                    "final": track.last,
                    "events": self.events.get(&track.id).unwrap_or(&Vec::new()),
                })
            })
            .collect();

        let data = json!({
            "lawn": self.bounds,
            "mowers": mowers,
        });

        let mut writer = BufWriter::new(&file);
        serde_json::to_writer_pretty(&mut writer, &data)?;
        writer.flush()?;
        Ok(())
    }
}
