use iced::widget::image::Handle;
use iced::widget::scrollable::{self, AbsoluteOffset};
use iced::widget::{column, container, stack, text, Scrollable};
use iced::{keyboard, window, Element, Length, Padding, Size, Subscription, Task, Theme};
use std::collections::HashMap;
use std::path::PathBuf;
use tracing::{debug, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod cdn;
mod config;
mod error;
mod state;
mod ui;

use config::Config;
use state::category::Category;
use state::counts::{CountSource, CountTable};
use state::gallery::{GallerySession, PageRequest};
use ui::lightbox::Lightbox;
use ui::masonry::{self, Tile};
use ui::sentinel::{self, Sentinel, ViewportGeometry};

/// Id of the gallery scrollable
const GALLERY_SCROLLABLE: &str = "gallery";

/// Main application state
struct PicGallery {
    config: Config,
    /// Where settings are written back (None = never persist)
    settings_path: Option<PathBuf>,
    /// Shared HTTP client for the count script and images
    client: reqwest::Client,
    /// Count table loaded from the CDN, kept for the whole process
    counts: Option<CountTable>,
    /// The mounted gallery session
    session: GallerySession,
    /// Column count picked when the session mounted
    columns: usize,
    /// Display state of each image, keyed by id
    tiles: HashMap<u32, Tile>,
    sentinel: Sentinel,
    lightbox: Lightbox,
}

/// Application messages (events)
#[derive(Debug, Clone)]
enum Message {
    /// User picked a category
    SelectCategory(Category),
    /// Window size read while mounting a session
    ViewportMeasured(u64, Size),
    /// Count script finished (None = unavailable)
    CountsLoaded(u64, Option<CountTable>),
    /// The gallery scrollable moved or changed size
    Scrolled(scrollable::Viewport),
    /// A page started by `begin_page` is ready to be committed
    PageReady(u64, PageRequest),
    /// One image download finished
    ImageLoaded(u64, u32, Result<Handle, String>),
    OpenLightbox(usize),
    CloseLightbox,
    LightboxNext,
    LightboxPrevious,
}

impl PicGallery {
    /// Create a new instance of the application and mount the first session
    fn new(config: Config, settings_path: Option<PathBuf>) -> (Self, Task<Message>) {
        // Fall back to a plain client
        let client = cdn::client().unwrap_or_else(|e| {
            warn!(error = %e, "failed to configure HTTP client, using defaults");
            reqwest::Client::new()
        });

        let category = config.default_category();
        let columns = masonry::column_count_for_width(config.window_size().width);

        let mut app = PicGallery {
            config,
            settings_path,
            client,
            counts: None,
            session: GallerySession::new(category, 0),
            columns,
            tiles: HashMap::new(),
            sentinel: Sentinel::default(),
            lightbox: Lightbox::default(),
        };

        let task = app.mount(category);
        (app, task)
    }

    /// Discard the current session and start a fresh one for `category`
    fn mount(&mut self, category: Category) -> Task<Message> {
        let generation = self.session.generation() + 1;

        // Tear down everything bound to the old session before replacing it
        self.sentinel.unsubscribe();
        self.lightbox.unbind();
        self.tiles.clear();
        self.session = GallerySession::new(category, generation);
        self.sentinel.subscribe();

        info!(%category, generation, "mounting gallery");

        // Column count comes from the window width at mount time
        let measure = window::get_latest()
            .and_then(window::get_size)
            .map(move |size| Message::ViewportMeasured(generation, size));

        let scroll_to_top = scrollable::scroll_to(
            scrollable::Id::new(GALLERY_SCROLLABLE),
            AbsoluteOffset { x: 0.0, y: 0.0 },
        );

        // Reuse the table if an earlier session already downloaded it
        let counts = match &self.counts {
            Some(table) => {
                let count = table.count_for(category);
                self.resolve_count(count, CountSource::Cached)
            }
            None => Task::perform(
                cdn::counts::load_count_table(
                    self.client.clone(),
                    self.config.count_script_url(),
                    self.config.count_timeout(),
                ),
                move |table| Message::CountsLoaded(generation, table),
            ),
        };

        Task::batch([measure, scroll_to_top, counts])
    }

    /// Record the total count and start the first page
    fn resolve_count(&mut self, count: u32, source: CountSource) -> Task<Message> {
        self.session.resolve_count(count);
        self.sentinel.subscribe();

        info!(
            category = %self.session.category(),
            count,
            ?source,
            "image count resolved"
        );

        // The first page loads without waiting for a scroll event
        if self.session.take_initial_load() {
            self.load_next_page()
        } else {
            Task::none()
        }
    }

    /// Start the next page if the session allows it
    fn load_next_page(&mut self) -> Task<Message> {
        match self.session.begin_page() {
            Some(request) => {
                debug!(page = request.page, ids = ?request.ids, "loading page");

                // Commit on the next update; the loading flag stays set until then
                Task::done(Message::PageReady(self.session.generation(), request))
            }
            None => Task::none(),
        }
    }

    /// Feed a viewport observation to the sentinel and load a page if it fires
    fn observe_viewport(&mut self, geometry: ViewportGeometry) -> Task<Message> {
        if self.sentinel.observe(geometry, self.session.is_loading()) {
            self.load_next_page()
        } else {
            Task::none()
        }
    }

    /// Store `category` as the startup category
    fn remember_category(&mut self, category: Category) {
        self.config.default_category = Some(category);

        let Some(path) = &self.settings_path else {
            return;
        };
        if let Err(e) = config::save_to_path(&self.config, path) {
            warn!(error = %e, path = %path.display(), "failed to save settings");
        }
    }

    /// Handle application messages and update state
    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::SelectCategory(category) => {
                // Same category: keep the session
                if category == self.session.category() {
                    return Task::none();
                }

                self.remember_category(category);
                self.mount(category)
            }
            Message::ViewportMeasured(generation, size) => {
                if generation == self.session.generation() {
                    self.columns = masonry::column_count_for_width(size.width);
                    debug!(width = size.width, columns = self.columns, "viewport measured");
                }
                Task::none()
            }
            Message::CountsLoaded(generation, table) => {
                let (count, source) = match table {
                    Some(table) => {
                        let count = table.count_for(self.session.category());
                        self.counts = Some(table);
                        (count, CountSource::Remote)
                    }
                    None => (self.session.category().fallback_count(), CountSource::Fallback),
                };

                // Cache the table even if the session moved on
                if generation != self.session.generation() {
                    return Task::none();
                }
                self.resolve_count(count, source)
            }
            Message::Scrolled(viewport) => {
                self.observe_viewport(ViewportGeometry::from_viewport(&viewport))
            }
            Message::PageReady(generation, request) => {
                // Ignore pages from a session that has been replaced
                if generation != self.session.generation() {
                    return Task::none();
                }

                let Some(appended) = self.session.complete_page(&request) else {
                    return Task::none();
                };
                let appended = appended.to_vec();

                info!(
                    page = request.page,
                    loaded = self.session.images().len(),
                    total = ?self.session.total(),
                    "page committed"
                );

                // Rebind to the grown list and watch the marker again
                self.lightbox.bind(self.session.images());
                self.sentinel.subscribe();

                // Start downloading every image on the new page
                Task::batch(appended.into_iter().map(|image_ref| {
                    self.tiles.insert(image_ref.id, Tile::Loading);
                    let id = image_ref.id;
                    Task::perform(
                        cdn::image::load_image(self.client.clone(), image_ref.url),
                        move |result| Message::ImageLoaded(generation, id, result),
                    )
                }))
            }
            Message::ImageLoaded(generation, id, result) => {
                if generation != self.session.generation() {
                    return Task::none();
                }

                let tile = match result {
                    Ok(handle) => Tile::Loaded(handle),
                    Err(e) => {
                        warn!(id, error = %e, "image unavailable");
                        Tile::Broken
                    }
                };
                self.tiles.insert(id, tile);
                Task::none()
            }
            Message::OpenLightbox(index) => {
                if let Some(image_ref) = self.lightbox.open(index) {
                    debug!(id = image_ref.id, "lightbox opened");
                }
                Task::none()
            }
            Message::CloseLightbox => {
                self.lightbox.close();
                Task::none()
            }
            Message::LightboxNext => {
                self.lightbox.next();
                Task::none()
            }
            Message::LightboxPrevious => {
                self.lightbox.previous();
                Task::none()
            }
        }
    }

    /// Build the user interface
    fn view(&self) -> Element<Message> {
        let header = column![
            text("AT13xe PicGallery").size(32),
            ui::selector::view(self.session.category()),
        ]
        .spacing(12)
        .padding(24);

        let content = column![
            masonry::view(self.session.images(), &self.tiles, self.columns),
            sentinel::view(self.session.status_line()),
        ]
        .spacing(16)
        .padding(Padding::new(24.0).bottom(0.0));

        let gallery = Scrollable::new(content)
            .id(scrollable::Id::new(GALLERY_SCROLLABLE))
            .width(Length::Fill)
            .height(Length::Fill)
            .on_scroll(Message::Scrolled);

        let page = container(column![header, gallery])
            .width(Length::Fill)
            .height(Length::Fill);

        match self.lightbox.view(&self.tiles) {
            Some(overlay) => stack![page, overlay].into(),
            None => page.into(),
        }
    }

    /// Keyboard shortcuts are only live while the lightbox is open
    fn subscription(&self) -> Subscription<Message> {
        if self.lightbox.is_open() {
            keyboard::on_key_press(ui::lightbox::on_key)
        } else {
            Subscription::none()
        }
    }

    /// Set the application theme
    fn theme(&self) -> Theme {
        Theme::Dark
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("pic_gallery=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn main() -> iced::Result {
    init_tracing();

    let config = config::load().unwrap_or_else(|e| {
        warn!(error = %e, "failed to load settings, using defaults");
        Config::default()
    });
    let window_size = config.window_size();
    let settings_path = config::get_default_config_path();

    iced::application("AT13xe PicGallery", PicGallery::update, PicGallery::view)
        .subscription(PicGallery::subscription)
        .theme(PicGallery::theme)
        .window_size(window_size)
        .centered()
        .run_with(move || PicGallery::new(config, settings_path))
}
