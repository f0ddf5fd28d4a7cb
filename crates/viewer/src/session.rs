//! One viewer session: load lifecycle, control events and re-rendering.
//!
//! The session owns its [`SelectionStore`] and is passed around by
//! reference; there is no global state. Loading is split into
//! [`Session::begin_load`] and [`Session::finish_load`] so that a completion
//! arriving after a newer load started, or after teardown, is dropped
//! instead of overwriting fresher state.

use met_common::{Boundary, DataType, Dataset, ValueRange, Variable, VizError, VizResult};
use projection::{hit_test, Viewport};
use renderer::{ColorScale, GridLayer, GridRenderer, Legend, RenderOptions, RenderStats};
use tiny_skia::Pixmap;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::config::ViewerConfig;
use crate::error::{ViewerError, ViewerResult};
use crate::loader::{DataLoader, DataSource};
use crate::selection::{SelectedPoint, Selection};
use crate::series::TimeSeries;
use crate::store::SelectionStore;

/// Identifies one load request; only the newest may complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct LoadToken(u64);

/// Result of fetching the dataset and, if configured, the boundary.
#[derive(Debug)]
pub struct LoadOutcome {
    pub dataset: VizResult<Dataset>,
    pub boundary: Option<VizResult<Boundary>>,
}

/// A user control action. Each changes exactly one selection field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ControlEvent {
    SetDataType(DataType),
    SetVariable(Variable),
    SetDay(usize),
    SelectPoint(SelectedPoint),
    ClearPoint,
}

/// A rendered frame and the inputs it was drawn from.
#[derive(Debug, Clone)]
pub struct Frame {
    pub pixmap: Pixmap,
    pub selection: Selection,
    pub range: Option<ValueRange>,
    pub stats: RenderStats,
}

impl Frame {
    pub fn painted_cells(&self) -> usize {
        self.stats.painted_cells
    }

    pub fn encode_png(&self) -> ViewerResult<Vec<u8>> {
        Ok(renderer::png::encode_pixmap(&self.pixmap)?)
    }
}

pub struct Session {
    id: Uuid,
    config: ViewerConfig,
    options: RenderOptions,
    store: SelectionStore,
    renderer: Option<GridRenderer>,
    generation: u64,
    torn_down: bool,
}

impl Session {
    pub fn new(config: ViewerConfig) -> ViewerResult<Self> {
        config.validate()?;
        let options = config.render_options()?;
        let id = Uuid::new_v4();
        info!(session = %id, data = %config.data_source, "Session created");
        Ok(Self {
            id,
            config,
            options,
            store: SelectionStore::new(),
            renderer: None,
            generation: 0,
            torn_down: false,
        })
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    pub fn store(&self) -> &SelectionStore {
        &self.store
    }

    pub fn viewport(&self) -> Option<&Viewport> {
        self.renderer.as_ref().map(GridRenderer::viewport)
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    // ---------------------------------------------------------------------
    // Loading
    // ---------------------------------------------------------------------

    /// Start a load; any earlier outstanding token becomes stale.
    pub fn begin_load(&mut self) -> LoadToken {
        self.generation += 1;
        LoadToken(self.generation)
    }

    /// Apply a load result. Returns `false` when the result was dropped
    /// because the token is stale or the session was torn down.
    pub fn finish_load(&mut self, token: LoadToken, outcome: LoadOutcome) -> bool {
        if self.torn_down || token.0 != self.generation {
            debug!(session = %self.id, token = token.0, current = self.generation, "Dropping stale load");
            return false;
        }

        let dataset = match outcome.dataset {
            Ok(dataset) => dataset,
            Err(e) => {
                error!(session = %self.id, error = %e, "Dataset load failed");
                self.renderer = None;
                self.store.set_failed(e.to_string());
                return true;
            }
        };

        let viewport = match self.viewport_for(&dataset) {
            Ok(viewport) => viewport,
            Err(e) => {
                error!(session = %self.id, error = %e, "Cannot size canvas for dataset");
                self.renderer = None;
                self.store.set_failed(e.to_string());
                return true;
            }
        };
        self.renderer = Some(GridRenderer::new(dataset.geo_bounds(), viewport, self.options));

        let boundary = match outcome.boundary {
            Some(Ok(boundary)) => Some(boundary),
            Some(Err(e)) => {
                warn!(session = %self.id, error = %e, "Boundary unavailable, rendering grid only");
                None
            }
            None => None,
        };
        self.store.set_boundary(boundary);
        self.store.set_dataset(dataset);
        info!(
            session = %self.id,
            width = viewport.width,
            height = viewport.height,
            "Session ready"
        );
        true
    }

    fn viewport_for(&self, dataset: &Dataset) -> ViewerResult<Viewport> {
        let width = self.config.canvas_width;
        let padding = self.config.padding;
        match Viewport::fit_to_bounds(width, padding, &dataset.geo_bounds()) {
            Ok(viewport) => Ok(viewport),
            // Single-row or single-column data has no aspect ratio.
            Err(_) => Ok(Viewport::new(width, width, padding)?),
        }
    }

    /// Fetch the configured sources and apply them.
    ///
    /// A dataset failure is returned as the loader reported it. A result
    /// that could not be applied gives `TornDown` or `StaleLoad`.
    pub async fn load(&mut self, loader: &DataLoader) -> ViewerResult<()> {
        if self.torn_down {
            return Err(ViewerError::TornDown);
        }
        let token = self.begin_load();
        let data = DataSource::parse(&self.config.data_source);
        let boundary = self.config.boundary_source.as_deref().map(DataSource::parse);

        let (dataset, boundary) = tokio::join!(loader.load_dataset(&data), async {
            match &boundary {
                Some(source) => Some(loader.load_boundary(source).await),
                None => None,
            }
        });

        let failure = dataset.as_ref().err().cloned();
        if !self.finish_load(token, LoadOutcome { dataset, boundary }) {
            return Err(if self.torn_down {
                ViewerError::TornDown
            } else {
                ViewerError::StaleLoad
            });
        }
        match failure {
            Some(e) => Err(e.into()),
            None => Ok(()),
        }
    }

    /// End the session. Later load completions are ignored.
    pub fn teardown(&mut self) {
        if !self.torn_down {
            info!(session = %self.id, "Session torn down");
        }
        self.torn_down = true;
    }

    // ---------------------------------------------------------------------
    // Events
    // ---------------------------------------------------------------------

    /// Apply one control event and re-render.
    pub fn apply(&mut self, event: ControlEvent) -> ViewerResult<Frame> {
        if self.torn_down {
            return Err(ViewerError::TornDown);
        }
        match event {
            ControlEvent::SetDataType(data_type) => self.store.set_data_type(data_type)?,
            ControlEvent::SetVariable(variable) => self.store.set_variable(variable)?,
            ControlEvent::SetDay(day) => self.store.set_day(day)?,
            ControlEvent::SelectPoint(point) => self.store.select_point(point)?,
            ControlEvent::ClearPoint => self.store.clear_point(),
        }
        debug!(session = %self.id, ?event, selection = %self.store.selection(), "Applied event");
        self.render()
    }

    /// Render the current selection.
    ///
    /// An unavailable grid (absent day, all-missing difference) yields a
    /// blank frame rather than an error.
    pub fn render(&self) -> ViewerResult<Frame> {
        if self.torn_down {
            return Err(ViewerError::TornDown);
        }
        let (Some(renderer), Some(dataset)) = (&self.renderer, self.store.dataset()) else {
            return Err(VizError::NotLoaded.into());
        };
        let selection = *self.store.selection();
        let grid = self.store.current_grid();
        let range = self.store.current_range();
        if grid.is_none() {
            warn!(session = %self.id, selection = %selection, "Selected grid unavailable, drawing blank frame");
        }

        let meta = dataset.metadata();
        let scale = range.map(|r| ColorScale::new(selection.variable, selection.data_type, &r));
        let layer = match (grid.as_deref(), scale.as_ref()) {
            (Some(grid), Some(scale)) => Some(GridLayer::new(grid, &meta.lat, &meta.lon, scale)),
            _ => None,
        };

        let rendered = renderer.render(layer.as_ref(), self.store.boundary())?;
        debug!(
            session = %self.id,
            selection = %selection,
            painted = rendered.stats.painted_cells,
            "Frame rendered"
        );
        Ok(Frame {
            pixmap: rendered.pixmap,
            selection,
            range,
            stats: rendered.stats,
        })
    }

    /// Handle a pointer click at canvas pixel `(x, y)`.
    ///
    /// Selects the nearest grid cell and returns its time series. Clicks in
    /// the padding, or before the dataset is loaded, are ignored.
    pub fn click(&mut self, x: f64, y: f64) -> Option<TimeSeries> {
        if self.torn_down {
            return None;
        }
        let viewport = *self.viewport()?;
        let dataset = self.store.dataset()?;
        let meta = dataset.metadata();
        let Some(hit) = hit_test(x, y, &meta.lat, &meta.lon, &viewport) else {
            debug!(session = %self.id, x, y, "Click outside plot area ignored");
            return None;
        };

        if let Err(e) = self.store.select_point(hit.into()) {
            warn!(session = %self.id, error = %e, "Click rejected");
            return None;
        }
        self.store.time_series()
    }

    /// Legend for the current selection, `None` without a range.
    pub fn legend(&self) -> Option<Legend> {
        let selection = self.store.selection();
        let range = self.store.current_range()?;
        Some(Legend::new(
            selection.variable,
            selection.data_type,
            range,
            self.config.legend_ticks,
        ))
    }
}
