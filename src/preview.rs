//! Hover-thumbnail sampling off a secondary decode context.
//!
//! Scrub-bar hover asks for a frame at the hovered time. Decoding happens on
//! a dedicated worker thread owning its own `MediaStream` over the same
//! locator, so the primary playback deck is never disturbed (their
//! independence is a correctness invariant, not an optimization).
//!
//! There is no cancellation: a sample resolved for an older pointer position
//! may render for a tick before the next request supersedes it. Bounded
//! staleness, accepted. Queued requests are coalesced to the newest before
//! decoding so a fast-moving pointer does not back the worker up.

use crate::frame::Surface;
use crate::media::StreamOpener;
use crossbeam_channel::{unbounded, Receiver, Sender, TryRecvError};
use log::{debug, trace, warn};
use std::sync::Arc;
use std::thread;

#[derive(Debug, Clone)]
struct PreviewRequest {
    locator: String,
    time: f64,
}

/// One resolved preview: the requested time and its decoded frame.
#[derive(Debug, Clone)]
pub struct PreviewSample {
    pub time: f64,
    pub frame: Surface,
}

/// Client handle living on the event thread.
pub struct PreviewSampler {
    req_tx: Sender<PreviewRequest>,
    res_rx: Receiver<PreviewSample>,
    latest: Option<PreviewSample>,
    last_requested: Option<(String, f64)>,
}

impl PreviewSampler {
    /// Spawn the worker. The worker holds its own streams opened through
    /// `opener` and exits when the sampler is dropped.
    pub fn new(opener: Arc<dyn StreamOpener>) -> Self {
        let (req_tx, req_rx) = unbounded::<PreviewRequest>();
        let (res_tx, res_rx) = unbounded::<PreviewSample>();

        thread::Builder::new()
            .name("vidget-preview".into())
            .spawn(move || worker_loop(opener, req_rx, res_tx))
            .ok();

        Self {
            req_tx,
            res_rx,
            latest: None,
            last_requested: None,
        }
    }

    /// Request a thumbnail for `locator` at `time` seconds. Repeats of the
    /// most recent request are dropped on this side of the channel.
    pub fn request(&mut self, locator: &str, time: f64) {
        if let Some((last_loc, last_time)) = &self.last_requested {
            if last_loc == locator && (last_time - time).abs() < 1e-3 {
                return;
            }
        }
        self.last_requested = Some((locator.to_string(), time));
        let _ = self.req_tx.send(PreviewRequest {
            locator: locator.to_string(),
            time,
        });
    }

    /// Drain resolved samples, keeping the newest. Returns the latest
    /// resolved sample, which may lag the latest request.
    pub fn poll(&mut self) -> Option<&PreviewSample> {
        while let Ok(sample) = self.res_rx.try_recv() {
            self.latest = Some(sample);
        }
        self.latest.as_ref()
    }

    /// Forget the cached sample (media changed or pointer left the bar).
    pub fn clear(&mut self) {
        self.latest = None;
        self.last_requested = None;
        // Flush anything already resolved for the old media
        while self.res_rx.try_recv().is_ok() {}
    }
}

fn worker_loop(
    opener: Arc<dyn StreamOpener>,
    req_rx: Receiver<PreviewRequest>,
    res_tx: Sender<PreviewSample>,
) {
    let mut deck: Option<(String, Box<dyn crate::media::MediaStream>)> = None;

    while let Ok(mut request) = req_rx.recv() {
        // Coalesce: only the newest queued request matters
        loop {
            match req_rx.try_recv() {
                Ok(newer) => request = newer,
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => return,
            }
        }

        let needs_open = deck.as_ref().map(|(loc, _)| loc != &request.locator).unwrap_or(true);
        if needs_open {
            match opener.open(&request.locator) {
                Ok(stream) => {
                    debug!("Preview deck opened for {}", request.locator);
                    deck = Some((request.locator.clone(), stream));
                }
                Err(e) => {
                    warn!("Preview deck open failed ({}): {}", request.locator, e);
                    deck = None;
                    continue;
                }
            }
        }

        let Some((_, stream)) = deck.as_mut() else { continue };
        stream.seek(request.time);
        match stream.frame() {
            Some(frame) => {
                trace!("Preview sample at {:.3}s", request.time);
                // Receiver gone means shutdown
                if res_tx.send(PreviewSample { time: request.time, frame }).is_err() {
                    return;
                }
            }
            None => {
                // Frame not ready: skip this sample, the next hover re-asks
                trace!("Preview frame not ready at {:.3}s", request.time);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::MediaStream;
    use std::time::Duration;

    struct StaticStream {
        position: f64,
    }

    impl MediaStream for StaticStream {
        fn play(&mut self) -> anyhow::Result<()> {
            Ok(())
        }
        fn pause(&mut self) {}
        fn paused(&self) -> bool {
            true
        }
        fn seek(&mut self, seconds: f64) {
            self.position = seconds;
        }
        fn set_volume(&mut self, _volume: f32) {}
        fn current_time(&self) -> f64 {
            self.position
        }
        fn duration(&self) -> f64 {
            10.0
        }
        fn frame(&mut self) -> Option<Surface> {
            let mut s = Surface::new(2, 2);
            // Encode the seeked second in the red channel for assertions
            let v = (self.position as u8).saturating_mul(10);
            s.fill([v, 0, 0, 255]);
            Some(s)
        }
    }

    struct StaticOpener;

    impl StreamOpener for StaticOpener {
        fn open(&self, _locator: &str) -> anyhow::Result<Box<dyn MediaStream>> {
            Ok(Box::new(StaticStream { position: 0.0 }))
        }
    }

    fn wait_for_sample(sampler: &mut PreviewSampler) -> PreviewSample {
        for _ in 0..200 {
            if let Some(s) = sampler.poll() {
                return s.clone();
            }
            thread::sleep(Duration::from_millis(5));
        }
        panic!("preview sample did not resolve");
    }

    #[test]
    fn test_sample_resolves_with_requested_time() {
        let mut sampler = PreviewSampler::new(Arc::new(StaticOpener));
        sampler.request("clip", 3.0);
        let sample = wait_for_sample(&mut sampler);
        assert_eq!(sample.time, 3.0);
        assert_eq!(sample.frame.pixels()[0], 30);
    }

    #[test]
    fn test_duplicate_requests_are_dropped_client_side() {
        let mut sampler = PreviewSampler::new(Arc::new(StaticOpener));
        sampler.request("clip", 2.0);
        sampler.request("clip", 2.0);
        sampler.request("clip", 2.0);
        let sample = wait_for_sample(&mut sampler);
        assert_eq!(sample.time, 2.0);
    }

    #[test]
    fn test_latest_wins_across_requests() {
        let mut sampler = PreviewSampler::new(Arc::new(StaticOpener));
        sampler.request("clip", 1.0);
        sampler.request("clip", 5.0);
        // Eventually the cached sample settles on the newest request
        for _ in 0..200 {
            if let Some(s) = sampler.poll() {
                if s.time == 5.0 {
                    return;
                }
            }
            thread::sleep(Duration::from_millis(5));
        }
        panic!("latest sample never arrived");
    }

    #[test]
    fn test_clear_forgets_sample() {
        let mut sampler = PreviewSampler::new(Arc::new(StaticOpener));
        sampler.request("clip", 1.0);
        wait_for_sample(&mut sampler);
        sampler.clear();
        assert!(sampler.latest.is_none());
    }
}
