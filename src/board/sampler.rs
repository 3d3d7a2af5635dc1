use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rodio::source::Buffered;
use rodio::{Decoder, OutputStreamHandle, Sink, Source};
use tracing::{debug, warn};

use crate::board::config::AudioConfig;
use crate::board::dispatcher::NotePlayer;

type SampleSource = Buffered<Decoder<BufReader<File>>>;

/// One decoded clip plus the sink currently playing it, if any.
struct SampleHandle {
    source: SampleSource,
    sink: Option<Sink>,
}

/// The note → audio handle table. Built once at startup and immutable
/// afterwards, except for each handle's own playback sink.
pub struct SampleBank {
    stream: OutputStreamHandle,
    gain: f32,
    handles: HashMap<String, SampleHandle>,
}

/// Resource naming convention: one clip per note at `<dir>/<note>.<ext>`.
pub fn sample_path(dir: &Path, note: &str, extension: &str) -> PathBuf {
    dir.join(format!("{note}.{extension}"))
}

fn decode_sample(path: &Path) -> Result<SampleSource> {
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let source = Decoder::new(BufReader::new(file))
        .with_context(|| format!("Failed to decode {}", path.display()))?
        .buffered();
    // Walk the decoder once so the whole clip is resident before the first
    // trigger; every later clone replays the cached frames.
    for _ in source.clone() {}
    Ok(source)
}

impl SampleBank {
    /// Decodes one clip per distinct note. Notes whose file is missing or
    /// unreadable are skipped with a warning and stay inert.
    pub fn load<'a>(
        audio: &AudioConfig,
        notes: impl Iterator<Item = &'a str>,
        stream: OutputStreamHandle,
    ) -> Self {
        let mut handles = HashMap::new();
        for note in notes {
            if handles.contains_key(note) {
                continue;
            }
            let path = sample_path(&audio.sound_dir, note, &audio.extension);
            match decode_sample(&path) {
                Ok(source) => {
                    debug!(note, path = %path.display(), "sample loaded");
                    handles.insert(note.to_string(), SampleHandle { source, sink: None });
                }
                Err(err) => {
                    warn!(note, "skipping sample: {err:#}");
                }
            }
        }
        SampleBank {
            stream,
            gain: audio.gain,
            handles,
        }
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }
}

impl NotePlayer for SampleBank {
    /// Restarts `note` from position zero. Dropping the previous sink halts
    /// any in-flight playback first, so the most recent trigger always wins
    /// and the same sample never plays layered over itself. A sink that the
    /// platform refuses to open is logged and swallowed; the trigger still
    /// counts as recognized.
    fn restart(&mut self, note: &str) -> bool {
        let Some(handle) = self.handles.get_mut(note) else {
            return false;
        };
        handle.sink = None;
        match Sink::try_new(&self.stream) {
            Ok(sink) => {
                sink.set_volume(self.gain);
                sink.append(handle.source.clone());
                handle.sink = Some(sink);
            }
            Err(err) => {
                warn!(note, "playback start rejected: {err}");
            }
        }
        true
    }
}
