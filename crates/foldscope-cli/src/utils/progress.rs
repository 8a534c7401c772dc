use foldscope::engine::progress::{Progress, ProgressCallback};
use indicatif::{ProgressBar, ProgressState, ProgressStyle};
use std::sync::{Arc, Mutex};
use tracing::warn;

#[derive(Clone)]
pub struct CliProgressHandler {
    pb: Arc<Mutex<ProgressBar>>,
}

impl CliProgressHandler {
    pub fn new() -> Self {
        let pb = ProgressBar::new(0)
            .with_style(Self::spinner_style())
            .with_message("Initializing...");
        pb.set_draw_target(indicatif::ProgressDrawTarget::stderr());
        pb.disable_steady_tick();
        pb.finish_and_clear();

        Self {
            pb: Arc::new(Mutex::new(pb)),
        }
    }

    pub fn get_callback(&self) -> ProgressCallback<'static> {
        let pb_clone = self.pb.clone();

        Box::new(move |progress: Progress| {
            let Ok(mut pb_guard) = pb_clone.lock() else {
                warn!("Progress bar mutex was poisoned. Cannot update progress.");
                return;
            };

            match progress {
                Progress::LoadStart { total_files } => {
                    pb_guard.disable_steady_tick();
                    pb_guard.reset();
                    pb_guard.set_length(total_files);
                    pb_guard.set_position(0);
                    pb_guard.set_style(Self::bar_style());
                    pb_guard.set_message("Loading");
                }
                Progress::FileLoaded { id, atoms } => {
                    pb_guard.inc(1);
                    pb_guard.println(format!("  ✓ {} ({} atoms)", id, atoms));
                }
                Progress::FileFailed { name, reason } => {
                    pb_guard.inc(1);
                    pb_guard.println(format!("  ✗ {}: {}", name, reason));
                }
                Progress::FileDiscarded { id } => {
                    pb_guard.inc(1);
                    pb_guard.println(format!("  - {} (discarded)", id));
                }
                Progress::LoadFinish => {
                    if pb_guard.position() < pb_guard.length().unwrap_or(0) {
                        pb_guard.set_position(pb_guard.length().unwrap_or(0));
                    }
                    pb_guard.finish();
                }
                Progress::AnalysisStart { total_structures } => {
                    pb_guard.disable_steady_tick();
                    pb_guard.reset();
                    pb_guard.set_length(total_structures);
                    pb_guard.set_position(0);
                    pb_guard.set_style(Self::bar_style());
                    pb_guard.set_message("Distograms");
                }
                Progress::StructureAnalyzed { id, residues } => {
                    pb_guard.inc(1);
                    pb_guard.println(format!("  ✓ {} ({} residues)", id, residues));
                }
                Progress::AnalysisFinish => {
                    let total = pb_guard.length().unwrap_or(0);
                    if pb_guard.position() < total {
                        pb_guard.set_position(total);
                    }
                    pb_guard.finish_with_message(format!("✓ {} distogram(s)", total));
                }
                Progress::Message(msg) => {
                    if !pb_guard.is_finished() {
                        pb_guard.println(format!("  {}", msg));
                    } else {
                        pb_guard.set_message(msg);
                    }
                }
            }
        })
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::with_template("{spinner:.green} {msg}")
            .expect("Failed to create spinner style template")
    }

    fn bar_style() -> ProgressStyle {
        ProgressStyle::with_template("{msg:<12} [{bar:40.cyan/blue}] {pos}/{len} ({eta})")
            .expect("Failed to create bar style template")
            .with_key(
                "eta",
                |state: &ProgressState, w: &mut dyn std::fmt::Write| {
                    let _ = write!(w, "{:.1}s", state.eta().as_secs_f64());
                },
            )
            .progress_chars("##-")
    }
}

impl Default for CliProgressHandler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use foldscope::core::models::ids::StructureId;
    use std::thread;

    #[test]
    fn handler_initializes_in_a_clean_state() {
        let handler = CliProgressHandler::new();
        let pb = handler.pb.lock().unwrap();
        assert_eq!(pb.length(), Some(0));
        assert!(pb.is_finished());
    }

    #[test]
    fn load_events_drive_the_bar() {
        let handler = CliProgressHandler::new();
        let callback = handler.get_callback();

        callback(Progress::LoadStart { total_files: 3 });
        {
            let pb = handler.pb.lock().unwrap();
            assert_eq!(pb.length(), Some(3));
            assert_eq!(pb.position(), 0);
            assert_eq!(pb.message(), "Loading");
        }

        callback(Progress::FileLoaded {
            id: StructureId::new("a.pdb-1"),
            atoms: 10,
        });
        callback(Progress::FileFailed {
            name: "b.pdb".into(),
            reason: "not UTF-8".into(),
        });
        {
            let pb = handler.pb.lock().unwrap();
            assert_eq!(pb.position(), 2);
        }

        callback(Progress::LoadFinish);
        {
            let pb = handler.pb.lock().unwrap();
            assert!(pb.is_finished());
            assert_eq!(pb.position(), 3);
        }
    }

    #[test]
    fn analysis_phase_finishes_after_the_last_structure() {
        let handler = CliProgressHandler::new();
        let callback = handler.get_callback();

        callback(Progress::AnalysisStart { total_structures: 2 });
        {
            let pb = handler.pb.lock().unwrap();
            assert_eq!(pb.length(), Some(2));
            assert_eq!(pb.message(), "Distograms");
        }

        callback(Progress::StructureAnalyzed {
            id: StructureId::new("a.pdb-1"),
            residues: 42,
        });
        {
            let pb = handler.pb.lock().unwrap();
            assert_eq!(pb.position(), 1);
            assert!(!pb.is_finished());
        }

        callback(Progress::StructureAnalyzed {
            id: StructureId::new("b.pdb-2"),
            residues: 7,
        });
        callback(Progress::AnalysisFinish);
        let pb = handler.pb.lock().unwrap();
        assert!(pb.is_finished());
        assert_eq!(pb.position(), 2);
        assert_eq!(pb.message(), "✓ 2 distogram(s)");
    }

    #[test]
    fn callback_is_thread_safe() {
        let handler = CliProgressHandler::new();
        let callback = handler.get_callback();

        thread::spawn(move || {
            callback(Progress::AnalysisStart { total_structures: 1 });
            callback(Progress::Message("working".into()));
            callback(Progress::StructureAnalyzed {
                id: StructureId::new("t"),
                residues: 1,
            });
            callback(Progress::AnalysisFinish);
        })
        .join()
        .unwrap();

        let pb = handler.pb.lock().unwrap();
        assert!(pb.is_finished());
        assert_eq!(pb.position(), 1);
        assert_eq!(pb.message(), "✓ 1 distogram(s)");
    }
}
