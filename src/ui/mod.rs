//! Desktop front end
//!
//! An iced application with two screens: picking and uploading an image,
//! then exploring its compression. All exploration state lives in
//! [`Explorer`]; this module only starts the timers and remote calls the
//! controller asks for and feeds their results back as messages.

mod explore;
mod upload;
mod zones;

use bytes::Bytes;
use iced::widget::image::Handle;
use iced::{Color, Element, Task, Theme};
use rfd::FileDialog;
use std::path::PathBuf;
use tracing::{info, warn};

use crate::config::ExplorerConfig;
use crate::error::ExploreError;
use crate::imaging::grayscale;
use crate::remote::{HttpBackend, RemoteService};
use crate::state::data::ImageId;
use crate::state::display::{DisplayHandle, HandleRegistry};
use crate::state::explorer::{CompressionRequest, DebounceTicket, Explorer, Resolution};
use crate::upload::{UploadError, UploadFile, ALLOWED_EXTENSIONS};

pub(crate) const ERROR_COLOR: Color = Color::from_rgb(0.86, 0.21, 0.27);

/// Run the GUI until the window is closed.
pub fn run(config: ExplorerConfig, backend: HttpBackend) -> iced::Result {
    iced::application(
        "SVD Image Compression",
        ExplorerApp::update,
        ExplorerApp::view,
    )
    .theme(ExplorerApp::theme)
    .window_size((1100.0, 900.0))
    .centered()
    .run_with(move || ExplorerApp::new(config, backend))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Screen {
    Upload,
    Explore,
}

/// State of the upload screen
#[derive(Debug, Default)]
pub(crate) struct UploadForm {
    pub selected: Option<UploadFile>,
    pub uploading: bool,
    pub error: Option<String>,
}

/// Application messages (events)
#[derive(Debug, Clone)]
pub(crate) enum Message {
    /// User clicked "Choose Image"
    PickFile,
    /// The picked file was read and validated
    FileLoaded(Result<UploadFile, UploadError>),
    /// User clicked "Upload and Compress"
    Upload,
    Uploaded(Result<ImageId, ExploreError>),
    /// Original fetched and converted to grayscale
    OriginalLoaded(ImageId, Result<Bytes, ExploreError>),
    SliderMoved(u16),
    DebounceElapsed(DebounceTicket),
    CompressionFinished(CompressionRequest, Result<Bytes, ExploreError>),
    Reset,
    /// Leave the explore screen and pick another image
    Back,
}

/// iced image handles for the controller's current display handles.
///
/// `Handle::from_bytes` mints a new id on every call, which would make the
/// renderer re-upload the texture each frame, so handles are converted
/// once per display handle id.
#[derive(Debug, Default)]
pub(crate) struct ViewHandles {
    original: Option<(u64, Handle)>,
    compressed: Option<(u64, Handle)>,
}

impl ViewHandles {
    pub fn sync(&mut self, explorer: &Explorer) {
        sync_slot(&mut self.original, explorer.original_handle());
        sync_slot(&mut self.compressed, explorer.compressed_handle());
    }

    pub fn original(&self) -> Option<&Handle> {
        self.original.as_ref().map(|(_, handle)| handle)
    }

    pub fn compressed(&self) -> Option<&Handle> {
        self.compressed.as_ref().map(|(_, handle)| handle)
    }
}

fn sync_slot(slot: &mut Option<(u64, Handle)>, current: Option<&DisplayHandle>) {
    match current {
        Some(handle) if slot.as_ref().map(|(id, _)| *id) == Some(handle.id()) => {}
        Some(handle) => *slot = Some((handle.id(), Handle::from_bytes(handle.bytes().clone()))),
        None => *slot = None,
    }
}

/// Main application state
struct ExplorerApp {
    config: ExplorerConfig,
    backend: HttpBackend,
    screen: Screen,
    form: UploadForm,
    /// Lives as long as the window so the cache survives "New image"
    explorer: Explorer,
    views: ViewHandles,
}

impl ExplorerApp {
    fn new(config: ExplorerConfig, backend: HttpBackend) -> (Self, Task<Message>) {
        info!("🎨 SVD explorer ready, backend at {}", backend.base_url());

        let explorer = Explorer::new(HandleRegistry::new(), config.default_quality);
        (
            ExplorerApp {
                config,
                backend,
                screen: Screen::Upload,
                form: UploadForm::default(),
                explorer,
                views: ViewHandles::default(),
            },
            Task::none(),
        )
    }

    /// Handle application messages and update state
    fn update(&mut self, message: Message) -> Task<Message> {
        let task = self.handle(message);
        self.views.sync(&self.explorer);
        task
    }

    fn handle(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::PickFile => {
                let picked = FileDialog::new()
                    .set_title("Select an image to compress")
                    .add_filter("Images", &ALLOWED_EXTENSIONS)
                    .pick_file();

                match picked {
                    Some(path) => self.read_file(path),
                    None => Task::none(),
                }
            }
            Message::FileLoaded(Ok(file)) => {
                self.form.selected = Some(file);
                self.form.error = None;
                Task::none()
            }
            Message::FileLoaded(Err(err)) => {
                self.form.selected = None;
                self.form.error = Some(err.to_string());
                Task::none()
            }
            Message::Upload => {
                let Some(file) = self.form.selected.clone() else {
                    self.form.error = Some("Please select an image first".to_string());
                    return Task::none();
                };
                if self.form.uploading {
                    return Task::none();
                }

                self.form.uploading = true;
                self.form.error = None;
                let backend = self.backend.clone();
                Task::perform(
                    async move { backend.upload(&file).await },
                    Message::Uploaded,
                )
            }
            Message::Uploaded(Ok(image)) => {
                self.form = UploadForm::default();
                self.screen = Screen::Explore;
                self.explorer.open(image.clone());
                self.load_original(image)
            }
            Message::Uploaded(Err(err)) => {
                warn!("Upload failed ({:?}): {}", err.kind(), err);
                self.form.uploading = false;
                self.form.error = Some(err.to_string());
                Task::none()
            }
            Message::OriginalLoaded(image, result) => {
                if self.explorer.original_loaded(&image, result).is_err() {
                    return Task::none();
                }
                let resolution = self.explorer.resolve_desired();
                self.dispatch(resolution)
            }
            Message::SliderMoved(value) => match self.explorer.set_parameter(value as i64) {
                Ok(ticket) => {
                    let delay = self.config.debounce();
                    Task::perform(
                        async move { tokio::time::sleep(delay).await },
                        move |_| Message::DebounceElapsed(ticket),
                    )
                }
                Err(_) => Task::none(),
            },
            Message::DebounceElapsed(ticket) => {
                let resolution = self.explorer.debounce_elapsed(ticket);
                self.dispatch(resolution)
            }
            Message::CompressionFinished(request, result) => {
                self.explorer.compression_finished(request, result);
                Task::none()
            }
            Message::Reset => {
                let resolution = self.explorer.reset();
                self.dispatch(resolution)
            }
            Message::Back => {
                self.explorer.teardown();
                self.form = UploadForm::default();
                self.screen = Screen::Upload;
                Task::none()
            }
        }
    }

    /// Build the user interface
    fn view(&self) -> Element<Message> {
        match self.screen {
            Screen::Upload => upload::view(&self.form, self.config.max_upload_bytes),
            Screen::Explore => explore::view(&self.explorer, &self.views),
        }
    }

    /// Set the application theme
    fn theme(&self) -> Theme {
        Theme::Dark
    }

    fn read_file(&self, path: PathBuf) -> Task<Message> {
        Task::perform(
            UploadFile::read(path, self.config.max_upload_bytes),
            Message::FileLoaded,
        )
    }

    fn load_original(&self, image: ImageId) -> Task<Message> {
        let backend = self.backend.clone();
        Task::perform(
            async move {
                let result = match backend.fetch_original(&image).await {
                    Ok(raw) => grayscale::to_grayscale_async(raw).await,
                    Err(err) => Err(err),
                };
                (image, result)
            },
            |(image, result)| Message::OriginalLoaded(image, result),
        )
    }

    /// Start the remote call a resolution asks for, if any.
    fn dispatch(&self, resolution: Option<Resolution>) -> Task<Message> {
        let Some(Resolution::Fetch(request)) = resolution else {
            return Task::none();
        };

        let backend = self.backend.clone();
        Task::perform(
            async move {
                let result = backend.compress(&request.image, request.quality).await;
                (request, result)
            },
            |(request, result)| Message::CompressionFinished(request, result),
        )
    }
}
