//! Shared application state for the imgtools GUI

use crate::channels;
use crate::channels::Channel;
use crate::channels::ChannelAssignment;
use crate::grid::GridSpec;
use crate::gui::tiles::pan_zoom::PanZoomState;
use crate::image_io;
use crate::split;
use crate::split::PreviewStyle;
use eframe::egui::TextureHandle;
use image::DynamicImage;
use image::RgbaImage;
use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::mpsc::Receiver;
use std::sync::mpsc::Sender;
use std::sync::mpsc::{self};
use std::thread;
use tracing::info;
use tracing::warn;

/// Longest side of the on-screen split preview
pub const PREVIEW_MAX_DIMENSION: u32 = 1024;

/// Shared application state, passed to every pane
pub struct AppState {
    pub splitter: SplitterState,
    pub packer: PackerState,
    /// Pane under the pointer this frame; decides where dropped files go
    pub hovered_pane: Option<DropTarget>,
    /// Blocking error dialog, shown until dismissed
    pub error_dialog: Option<ErrorDialog>,
    /// Success messages waiting to be shown as toasts
    pub notifications: Vec<String>,
    /// Whether the about window is open
    pub about_open: bool,
    /// Sender for background tasks
    background_sender: Sender<BackgroundMessage>,
    /// Receiver for background task results
    background_receiver: Receiver<BackgroundMessage>,
}

/// Which tool receives dropped files
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DropTarget {
    Splitter,
    Packer,
}

#[derive(Clone, Debug)]
pub struct ErrorDialog {
    pub title: String,
    pub message: String,
}

/// Loaded source image and its downscaled display copy
pub struct LoadedSource {
    pub path: PathBuf,
    pub image: Arc<DynamicImage>,
    pub display: RgbaImage,
}

/// State of the image splitter tool
pub struct SplitterState {
    pub source_path: Option<PathBuf>,
    pub source: Option<LoadedSource>,
    pub source_loading: bool,
    pub rows: u32,
    pub cols: u32,
    pub output_dir: String,
    /// Piece file prefix; empty means the source file stem
    pub base_name: String,
    pub line_width: u32,
    /// Grid the current preview texture was drawn for
    preview_key: Option<(PathBuf, u32, u32, u32)>,
    pub preview_texture: Option<TextureHandle>,
    pub pan_zoom: PanZoomState,
    pub running: bool,
    /// (completed, total)
    pub progress: Option<(usize, usize)>,
    pub last_result: Option<String>,
}

impl Default for SplitterState {
    fn default() -> Self {
        Self {
            source_path: None,
            source: None,
            source_loading: false,
            rows: 2,
            cols: 2,
            output_dir: String::new(),
            base_name: String::new(),
            line_width: 2,
            preview_key: None,
            preview_texture: None,
            pan_zoom: PanZoomState::new(),
            running: false,
            progress: None,
            last_result: None,
        }
    }
}

impl SplitterState {
    /// Grid from the current widget values
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidGrid`] if rows or columns are zero.
    pub fn grid(&self) -> crate::Result<GridSpec> {
        GridSpec::new(self.rows, self.cols)
    }

    /// Base name that will prefix piece files
    #[must_use]
    pub fn effective_base_name(&self) -> Option<String> {
        let trimmed = self.base_name.trim();
        if !trimmed.is_empty() {
            return Some(trimmed.to_string());
        }
        self.source_path.as_deref().map(split::default_base_name)
    }

    /// Annotated preview to upload if the grid or source changed since the last one.
    /// Returns `None` when the current texture is still valid or nothing can be drawn.
    pub fn take_stale_preview(&mut self) -> Option<RgbaImage> {
        let source = self.source.as_ref()?;
        let grid = self.grid().ok()?;
        let key = (source.path.clone(), grid.rows(), grid.cols(), self.line_width);
        if self.preview_key.as_ref() == Some(&key) && self.preview_texture.is_some() {
            return None;
        }

        let mut canvas = source.display.clone();
        let style = PreviewStyle {
            line_width: self.line_width,
            ..PreviewStyle::default()
        };
        split::draw_grid(
            &mut canvas,
            (source.image.width(), source.image.height()),
            grid,
            &style,
        );
        self.preview_key = Some(key);
        Some(canvas)
    }

    fn clear(&mut self) {
        *self = SplitterState {
            running: self.running,
            progress: self.progress,
            ..SplitterState::default()
        };
    }
}

/// One channel input of the packer
#[derive(Clone, Debug)]
pub struct ChannelSlot {
    pub channel: Channel,
    pub path: Option<PathBuf>,
}

/// State of the channel packer tool
pub struct PackerState {
    pub slots: [ChannelSlot; 3],
    pub output_path: String,
    /// Slot under the pointer this frame
    pub hovered_slot: Option<Channel>,
    pub running: bool,
    pub last_result: Option<String>,
}

impl Default for PackerState {
    fn default() -> Self {
        Self {
            slots: Channel::ALL.map(|channel| ChannelSlot {
                channel,
                path: None,
            }),
            output_path: String::new(),
            hovered_slot: None,
            running: false,
            last_result: None,
        }
    }
}

impl PackerState {
    #[must_use]
    pub fn slot(&self, channel: Channel) -> &ChannelSlot {
        &self.slots[channel_index(channel)]
    }

    pub fn slot_mut(&mut self, channel: Channel) -> &mut ChannelSlot {
        &mut self.slots[channel_index(channel)]
    }

    /// Channels with a file assigned
    #[must_use]
    pub fn loaded_channels(&self) -> Vec<Channel> {
        self.slots
            .iter()
            .filter(|s| s.path.is_some())
            .map(|s| s.channel)
            .collect()
    }

    #[must_use]
    pub fn status_text(&self) -> String {
        channels::readiness_summary(&self.loaded_channels())
    }

    /// Put dropped files into the hovered slot, or else into empty slots in R, G, B order.
    /// Returns the number of files assigned.
    pub fn assign_dropped(&mut self, paths: &[PathBuf]) -> usize {
        let mut images = paths.iter().filter(|p| image_io::is_supported_image(p));
        if let Some(channel) = self.hovered_slot {
            return match images.next() {
                Some(path) => {
                    self.slot_mut(channel).path = Some(path.clone());
                    1
                }
                None => 0,
            };
        }

        let mut assigned = 0;
        for slot in self.slots.iter_mut().filter(|s| s.path.is_none()) {
            let Some(path) = images.next() else {
                break;
            };
            slot.path = Some(path.clone());
            assigned += 1;
        }
        assigned
    }

    fn clear(&mut self) {
        for slot in &mut self.slots {
            slot.path = None;
        }
        self.last_result = None;
    }
}

fn channel_index(channel: Channel) -> usize {
    match channel {
        Channel::Red => 0,
        Channel::Green => 1,
        Channel::Blue => 2,
    }
}

/// Messages sent from background threads
pub enum BackgroundMessage {
    /// Source image for the splitter finished loading
    SourceLoaded(LoadedSource),
    /// Source image could not be loaded
    SourceFailed { path: PathBuf, error: String },
    /// A piece was written
    SplitProgress { current: usize, total: usize },
    /// All pieces were written
    SplitComplete {
        written: Vec<PathBuf>,
        output_dir: PathBuf,
    },
    /// Splitting stopped on an error; earlier pieces remain on disk
    SplitFailed { error: String },
    /// Packed image was saved
    PackComplete { path: PathBuf },
    /// Packing failed
    PackFailed { error: String },
}

impl Default for AppState {
    fn default() -> Self {
        let (background_sender, background_receiver) = mpsc::channel();
        Self {
            splitter: SplitterState::default(),
            packer: PackerState::default(),
            hovered_pane: None,
            error_dialog: None,
            notifications: Vec::new(),
            about_open: false,
            background_sender,
            background_receiver,
        }
    }
}

impl AppState {
    pub fn show_error(&mut self, title: &str, message: impl Into<String>) {
        let message = message.into();
        warn!("{}: {}", title, message);
        self.error_dialog = Some(ErrorDialog {
            title: title.to_string(),
            message,
        });
    }

    fn notify(&mut self, text: impl Into<String>) {
        self.notifications.push(text.into());
    }

    /// Whether any background job is running (the UI keeps repainting while true)
    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.splitter.source_loading || self.splitter.running || self.packer.running
    }

    /// Choose the splitter's source image and load it in the background
    pub fn select_source(&mut self, path: PathBuf) {
        if !image_io::is_supported_image(&path) {
            self.show_error(
                "Unsupported format",
                format!(
                    "{} is not a supported image ({}).",
                    path.display(),
                    image_io::SUPPORTED_EXTENSIONS.join(", ")
                ),
            );
            return;
        }

        info!("Loading {}", path.display());
        self.splitter.source_path = Some(path.clone());
        self.splitter.source = None;
        self.splitter.source_loading = true;
        self.splitter.preview_texture = None;
        self.splitter.pan_zoom.reset();
        if self.splitter.output_dir.is_empty()
            && let Some(parent) = path.parent()
        {
            self.splitter.output_dir = parent.display().to_string();
        }

        let sender = self.background_sender.clone();
        thread::spawn(move || {
            let msg = match image_io::load_image(&path) {
                Ok(image) => {
                    let display = split::preview_canvas(&image, Some(PREVIEW_MAX_DIMENSION));
                    BackgroundMessage::SourceLoaded(LoadedSource {
                        path,
                        image: Arc::new(image),
                        display,
                    })
                }
                Err(e) => BackgroundMessage::SourceFailed {
                    path,
                    error: e.to_string(),
                },
            };
            let _ = sender.send(msg);
        });
    }

    /// Validate the splitter inputs and write the pieces on a background thread
    pub fn start_split(&mut self) {
        if self.splitter.running {
            warn!("Split already running, ignoring request");
            return;
        }
        let Some(source) = self.splitter.source.as_ref() else {
            self.show_error("No image", "Please select an image first.");
            return;
        };
        let output_dir = self.splitter.output_dir.trim();
        if output_dir.is_empty() {
            self.show_error("No output directory", "Please select an output directory.");
            return;
        }
        let grid = match self.splitter.grid().and_then(|grid| {
            grid.ensure_fits(source.image.width(), source.image.height())
                .map(|()| grid)
        }) {
            Ok(grid) => grid,
            Err(e) => {
                self.show_error("Invalid grid", e.to_string());
                return;
            }
        };

        let image = Arc::clone(&source.image);
        let output_dir = PathBuf::from(output_dir);
        let base_name = self
            .splitter
            .effective_base_name()
            .unwrap_or_else(|| "image".to_string());
        let sender = self.background_sender.clone();

        self.splitter.running = true;
        self.splitter.progress = Some((0, grid.tile_count()));
        self.splitter.last_result = None;

        thread::spawn(move || {
            let progress_sender = sender.clone();
            let progress = move |current: usize, total: usize, _: &Path| {
                let _ = progress_sender.send(BackgroundMessage::SplitProgress { current, total });
            };
            let msg = match split::split(&image, grid, &output_dir, &base_name, Some(&progress)) {
                Ok(written) => BackgroundMessage::SplitComplete {
                    written,
                    output_dir,
                },
                Err(e) => BackgroundMessage::SplitFailed {
                    error: e.to_string(),
                },
            };
            let _ = sender.send(msg);
        });
    }

    /// Validate the packer inputs and pack + save on a background thread
    pub fn start_pack(&mut self) {
        if self.packer.running {
            warn!("Pack already running, ignoring request");
            return;
        }
        if self.packer.loaded_channels().is_empty() {
            self.show_error("No channels", crate::Error::NoChannels.to_string());
            return;
        }
        let output = self.packer.output_path.trim();
        if output.is_empty() {
            self.show_error("No output file", "Please specify an output filename.");
            return;
        }
        let output = image_io::png_output_path(Path::new(output));
        self.packer.output_path = output.display().to_string();

        let red = self.packer.slot(Channel::Red).path.clone();
        let green = self.packer.slot(Channel::Green).path.clone();
        let blue = self.packer.slot(Channel::Blue).path.clone();
        let sender = self.background_sender.clone();

        self.packer.running = true;
        self.packer.last_result = None;

        thread::spawn(move || {
            let result = ChannelAssignment::from_paths(
                red.as_deref(),
                green.as_deref(),
                blue.as_deref(),
            )
            .and_then(|assignment| channels::pack(&assignment))
            .and_then(|packed| channels::save_packed(&packed, &output));
            let msg = match result {
                Ok(path) => BackgroundMessage::PackComplete { path },
                Err(e) => BackgroundMessage::PackFailed {
                    error: e.to_string(),
                },
            };
            let _ = sender.send(msg);
        });
    }

    pub fn clear_splitter(&mut self) {
        self.splitter.clear();
    }

    pub fn clear_packer(&mut self) {
        self.packer.clear();
    }

    /// Poll for background task completions (call this each frame)
    pub fn poll_background_tasks(&mut self) {
        while let Ok(msg) = self.background_receiver.try_recv() {
            match msg {
                BackgroundMessage::SourceLoaded(loaded) => {
                    // Only keep it if this is still the selected file
                    if self.splitter.source_path.as_ref() == Some(&loaded.path) {
                        info!(
                            "Loaded {} ({}x{})",
                            loaded.path.display(),
                            loaded.image.width(),
                            loaded.image.height()
                        );
                        self.splitter.source = Some(loaded);
                        self.splitter.source_loading = false;
                    }
                }
                BackgroundMessage::SourceFailed { path, error } => {
                    if self.splitter.source_path.as_ref() == Some(&path) {
                        self.splitter.source_loading = false;
                        self.splitter.source_path = None;
                        self.show_error("Failed to load image", error);
                    }
                }
                BackgroundMessage::SplitProgress { current, total } => {
                    self.splitter.progress = Some((current, total));
                }
                BackgroundMessage::SplitComplete {
                    written,
                    output_dir,
                } => {
                    self.splitter.running = false;
                    self.splitter.progress = None;
                    let text = format!(
                        "Image split into {} pieces successfully! Saved to: {}",
                        written.len(),
                        output_dir.display()
                    );
                    self.splitter.last_result = Some(text.clone());
                    self.notify(text);
                }
                BackgroundMessage::SplitFailed { error } => {
                    self.splitter.running = false;
                    self.splitter.progress = None;
                    self.splitter.last_result = Some("Split failed".to_string());
                    self.show_error("Failed to split image", error);
                }
                BackgroundMessage::PackComplete { path } => {
                    self.packer.running = false;
                    let text = format!("Images successfully packed! Saved to: {}", path.display());
                    self.packer.last_result = Some(text.clone());
                    self.notify(text);
                }
                BackgroundMessage::PackFailed { error } => {
                    self.packer.running = false;
                    self.packer.last_result = Some("Error occurred during packing".to_string());
                    self.show_error("Failed to pack images", error);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dropped_files_fill_empty_slots_in_order() {
        let mut packer = PackerState::default();
        packer.slot_mut(Channel::Red).path = Some(PathBuf::from("existing.png"));

        let assigned = packer.assign_dropped(&[
            PathBuf::from("notes.txt"),
            PathBuf::from("g.png"),
            PathBuf::from("b.jpg"),
            PathBuf::from("extra.png"),
        ]);

        assert_eq!(assigned, 2);
        assert_eq!(packer.slot(Channel::Red).path, Some(PathBuf::from("existing.png")));
        assert_eq!(packer.slot(Channel::Green).path, Some(PathBuf::from("g.png")));
        assert_eq!(packer.slot(Channel::Blue).path, Some(PathBuf::from("b.jpg")));
    }

    #[test]
    fn dropping_on_a_slot_replaces_it() {
        let mut packer = PackerState::default();
        packer.slot_mut(Channel::Green).path = Some(PathBuf::from("old.png"));
        packer.hovered_slot = Some(Channel::Green);

        assert_eq!(packer.assign_dropped(&[PathBuf::from("new.bmp")]), 1);
        assert_eq!(packer.slot(Channel::Green).path, Some(PathBuf::from("new.bmp")));
        assert_eq!(packer.loaded_channels(), vec![Channel::Green]);
    }

    #[test]
    fn pack_without_channels_shows_error() {
        let mut state = AppState::default();
        state.packer.output_path = "out.png".to_string();
        state.start_pack();
        assert!(!state.packer.running);
        assert!(state.error_dialog.is_some());
    }

    #[test]
    fn split_without_source_shows_error() {
        let mut state = AppState::default();
        state.splitter.output_dir = "out".to_string();
        state.start_split();
        assert!(!state.splitter.running);
        assert!(state.error_dialog.is_some());
    }

    #[test]
    fn base_name_falls_back_to_stem() {
        let mut splitter = SplitterState {
            source_path: Some(PathBuf::from("/pics/castle.jpg")),
            ..SplitterState::default()
        };
        assert_eq!(splitter.effective_base_name().as_deref(), Some("castle"));
        splitter.base_name = "  tile ".to_string();
        assert_eq!(splitter.effective_base_name().as_deref(), Some("tile"));
    }

    #[test]
    fn zero_rows_is_an_invalid_grid() {
        let splitter = SplitterState {
            rows: 0,
            ..SplitterState::default()
        };
        assert!(matches!(
            splitter.grid(),
            Err(crate::Error::InvalidGrid { rows: 0, cols: 2 })
        ));
    }
}
