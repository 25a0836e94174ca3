use gym_core::MapConfig;

pub const MIN_ZOOM: u8 = 3;
pub const MAX_ZOOM: u8 = 18;
/// Width of the view in map tiles at the current zoom.
const TILES_ACROSS: f64 = 4.0;
/// Fraction of the visible span moved by one pan step.
const PAN_STEP: f64 = 0.1;
/// Terminal cells are roughly twice as tall as they are wide.
const CELL_ASPECT: f64 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub latitude: f64,
    pub longitude: f64,
    pub zoom: u8,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub x: [f64; 2],
    pub y: [f64; 2],
}

impl Bounds {
    pub fn height(&self) -> f64 {
        self.y[1] - self.y[0]
    }

    pub fn contains(&self, latitude: f64, longitude: f64) -> bool {
        (self.x[0]..=self.x[1]).contains(&longitude) && (self.y[0]..=self.y[1]).contains(&latitude)
    }
}

impl From<&MapConfig> for Viewport {
    fn from(config: &MapConfig) -> Self {
        Self {
            latitude: config.center[0],
            longitude: config.center[1],
            zoom: config.zoom.clamp(MIN_ZOOM, MAX_ZOOM),
        }
    }
}

impl Viewport {
    fn lon_span(&self) -> f64 {
        TILES_ACROSS * 360.0 / f64::from(1u32 << self.zoom)
    }

    fn lat_span(&self, width: u16, height: u16) -> f64 {
        let width = f64::from(width.max(1));
        let height = f64::from(height.max(1));
        let shrink = self.latitude.to_radians().cos().abs().max(0.01);
        self.lon_span() * shrink * (height * CELL_ASPECT) / width
    }

    /// Canvas bounds (longitude on x, latitude on y) for an area of `width` x `height` cells.
    pub fn bounds(&self, width: u16, height: u16) -> Bounds {
        let half_lon = self.lon_span() / 2.0;
        let half_lat = self.lat_span(width, height) / 2.0;
        Bounds {
            x: [self.longitude - half_lon, self.longitude + half_lon],
            y: [self.latitude - half_lat, self.latitude + half_lat],
        }
    }

    /// Move by whole pan steps; positive `dx` goes east, positive `dy` goes north.
    pub fn pan(&mut self, dx: i32, dy: i32) {
        let step = self.lon_span() * PAN_STEP;
        self.longitude = (self.longitude + f64::from(dx) * step).clamp(-180.0, 180.0);
        self.latitude = (self.latitude + f64::from(dy) * step).clamp(-85.0, 85.0);
    }

    pub fn zoom_in(&mut self) {
        self.zoom = (self.zoom + 1).min(MAX_ZOOM);
    }

    pub fn zoom_out(&mut self) {
        self.zoom = self.zoom.saturating_sub(1).max(MIN_ZOOM);
    }
}
