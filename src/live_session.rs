// THEORY:
// A live session turns a stream of camera frames into a stream of skin and mood
// readings, at a fixed cadence rather than at the camera's rate.
//
// Key principles:
// 1.  **Latest frame wins**: frames arrive on an mpsc channel whenever the camera
//     produces them. On each tick the session drains the channel and keeps only the
//     newest frame; older ones are superseded without being analyzed.
// 2.  **One analysis in flight**: the chosen frame is analyzed synchronously to
//     completion before the next tick is awaited. `MissedTickBehavior::Skip` keeps a
//     slow analysis from causing a burst of catch-up ticks.
// 3.  **Bounded history**: skin and mood readings feed the rolling windows of a
//     `SessionHistory`, which becomes the `SessionReport` when the session ends.
// 4.  **Non-blocking display**: updates are offered to the display with `try_send`;
//     a display that falls behind misses updates, it never stalls the session.
//
// Face detection and expression scoring happen upstream. A frame carries their
// results, if any.

use crate::config::{CosmeticConfig, LiveConfig};
use crate::core_modules::cosmetic_scorer::SkinMetrics;
use crate::core_modules::mood::{ExpressionScores, MoodReading};
use crate::core_modules::session_history::SessionHistory;
use crate::core_modules::skin_report::{SessionReport, SkinAdvisory};
use crate::error::{Result, VisionError};
use crate::pipeline::{BoundingBox, SkinAnalyzer};
use image::RgbaImage;
use serde::Serialize;
use std::time::Duration;
use tokio::sync::mpsc::error::{TryRecvError, TrySendError};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval};
use tracing::{debug, info, warn};

/// What the upstream face detector saw in a frame.
#[derive(Debug, Clone, PartialEq)]
pub struct FaceObservation {
    pub bbox: BoundingBox,
    /// Detector confidence in [0, 1].
    pub detection_score: f64,
    pub expressions: Option<ExpressionScores>,
}

#[derive(Debug, Clone)]
pub struct LiveFrame {
    pub image: RgbaImage,
    pub face: Option<FaceObservation>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DetectionQuality {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl DetectionQuality {
    pub fn from_score(score: f64) -> Self {
        if score > 0.8 {
            DetectionQuality::Excellent
        } else if score > 0.6 {
            DetectionQuality::Good
        } else if score > 0.4 {
            DetectionQuality::Fair
        } else {
            DetectionQuality::Poor
        }
    }
}

/// The result of analyzing one frame that contained a face.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameReading {
    pub frame_id: u64,
    pub metrics: SkinMetrics,
    pub mood: Option<MoodReading>,
    pub detection: DetectionQuality,
    pub advisories: Vec<SkinAdvisory>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum SessionUpdate {
    Reading(FrameReading),
    NoFace { frame_id: u64 },
    /// The frame could not be analyzed, e.g. the face box lay outside the image.
    Dropped { frame_id: u64, reason: String },
}

/// Caller's side of a running session.
#[derive(Debug)]
pub struct LiveSessionHandle {
    updates: mpsc::Receiver<SessionUpdate>,
    stop: Option<oneshot::Sender<()>>,
    task: JoinHandle<SessionReport>,
}

impl LiveSessionHandle {
    /// Next update, or `SessionClosed` once the session has ended and every
    /// buffered update has been read.
    pub async fn next_update(&mut self) -> Result<SessionUpdate> {
        self.updates.recv().await.ok_or(VisionError::SessionClosed)
    }

    /// Ends the session after any in-progress analysis and returns its report.
    pub async fn stop(mut self) -> Result<SessionReport> {
        if let Some(stop) = self.stop.take() {
            // The session may already have ended on its own.
            let _ = stop.send(());
        }
        Ok(self.task.await?)
    }

    /// Waits for the frame sender to be dropped, then returns the report.
    pub async fn finish(self) -> Result<SessionReport> {
        let LiveSessionHandle { stop, task, .. } = self;
        let report = task.await?;
        drop(stop);
        Ok(report)
    }
}

pub struct LiveSession {
    config: LiveConfig,
    analyzer: SkinAnalyzer,
    history: SessionHistory,
    frames_seen: u64,
}

impl LiveSession {
    /// Starts a session on the current tokio runtime.
    pub fn spawn(
        config: LiveConfig,
        cosmetic: CosmeticConfig,
        frames: mpsc::Receiver<LiveFrame>,
    ) -> Result<LiveSessionHandle> {
        config.validate()?;
        let session = LiveSession {
            analyzer: SkinAnalyzer::new(cosmetic)?,
            history: SessionHistory::new(config.metric_window, config.mood_window),
            frames_seen: 0,
            config,
        };
        let (update_tx, update_rx) = mpsc::channel(session.config.update_buffer);
        let (stop_tx, stop_rx) = oneshot::channel();
        let task = tokio::spawn(session.run(frames, stop_rx, update_tx));
        Ok(LiveSessionHandle {
            updates: update_rx,
            stop: Some(stop_tx),
            task,
        })
    }

    async fn run(
        mut self,
        mut frames: mpsc::Receiver<LiveFrame>,
        mut stop: oneshot::Receiver<()>,
        updates: mpsc::Sender<SessionUpdate>,
    ) -> SessionReport {
        let mut ticker = interval(Duration::from_millis(self.config.interval_ms));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        info!(interval_ms = self.config.interval_ms, "live session started");

        loop {
            tokio::select! {
                biased;
                _ = &mut stop => break,
                _ = ticker.tick() => {
                    let (latest, closed) = self.take_latest(&mut frames);
                    if let Some((frame_id, frame)) = latest {
                        let update = self.process(frame_id, frame);
                        publish(&updates, update);
                    }
                    if closed {
                        break;
                    }
                }
            }
        }

        let report = SessionReport::from_history(&self.history);
        info!(
            frames = self.frames_seen,
            readings = report.readings,
            mood = %report.mood,
            "live session ended"
        );
        report
    }

    /// Drains the frame channel, returning the newest frame and whether the sender is gone.
    fn take_latest(&mut self, frames: &mut mpsc::Receiver<LiveFrame>) -> (Option<(u64, LiveFrame)>, bool) {
        let mut latest = None;
        loop {
            match frames.try_recv() {
                Ok(frame) => {
                    self.frames_seen += 1;
                    if let Some((superseded, _)) = latest.replace((self.frames_seen, frame)) {
                        debug!(frame_id = superseded, "frame superseded before analysis");
                    }
                }
                Err(TryRecvError::Empty) => return (latest, false),
                Err(TryRecvError::Disconnected) => return (latest, true),
            }
        }
    }

    fn process(&mut self, frame_id: u64, frame: LiveFrame) -> SessionUpdate {
        let Some(face) = frame.face else {
            debug!(frame_id, "no face in frame");
            return SessionUpdate::NoFace { frame_id };
        };

        let metrics = match self.analyzer.analyze_region(&frame.image, &face.bbox) {
            Ok(metrics) => metrics,
            Err(error) => {
                warn!(frame_id, %error, "dropping frame");
                return SessionUpdate::Dropped {
                    frame_id,
                    reason: error.to_string(),
                };
            }
        };
        self.history.record_skin(metrics);

        let mood = face.expressions.map(MoodReading::from_scores);
        if let Some(reading) = mood {
            self.history.record_mood(reading);
        }

        SessionUpdate::Reading(FrameReading {
            frame_id,
            metrics,
            mood,
            detection: DetectionQuality::from_score(face.detection_score),
            advisories: SkinAdvisory::for_reading(&metrics),
        })
    }
}

fn publish(updates: &mpsc::Sender<SessionUpdate>, update: SessionUpdate) {
    match updates.try_send(update) {
        Ok(()) => {}
        Err(TrySendError::Full(_)) => debug!("display is behind, update dropped"),
        Err(TrySendError::Closed(_)) => {}
    }
}
