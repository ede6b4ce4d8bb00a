//! Office location map.
//!
//! One validated coordinate and a label, rendered as a read-only
//! OpenStreetMap embed. Tiles are the embed's business.

use crate::config::MapConfig;
use maud::{Markup, html};
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum MapError {
    #[error("latitude {0} outside [-90, 90]")]
    Latitude(f64),
    #[error("longitude {0} outside [-180, 180]")]
    Longitude(f64),
    #[error("zoom {0} outside [1, 19]")]
    Zoom(u8),
}

#[derive(Debug, Clone, PartialEq)]
pub struct MapMarker {
    lat: f64,
    lon: f64,
    zoom: u8,
    label: String,
}

impl MapMarker {
    pub fn new(lat: f64, lon: f64, zoom: u8, label: &str) -> Result<Self, MapError> {
        if !(-90.0..=90.0).contains(&lat) {
            return Err(MapError::Latitude(lat));
        }
        if !(-180.0..=180.0).contains(&lon) {
            return Err(MapError::Longitude(lon));
        }
        if !(1..=19).contains(&zoom) {
            return Err(MapError::Zoom(zoom));
        }
        Ok(Self {
            lat,
            lon,
            zoom,
            label: label.to_string(),
        })
    }

    pub fn from_config(config: &MapConfig) -> Result<Self, MapError> {
        Self::new(config.lat, config.lon, config.zoom, &config.label)
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Degrees of longitude/latitude shown around the marker at this zoom.
    fn span(&self) -> f64 {
        360.0 / f64::from(1u32 << self.zoom)
    }

    pub fn embed_url(&self) -> String {
        let half = self.span() / 2.0;
        format!(
            "https://www.openstreetmap.org/export/embed.html?bbox={:.5}%2C{:.5}%2C{:.5}%2C{:.5}&layer=mapnik&marker={:.5}%2C{:.5}",
            self.lon - half,
            self.lat - half / 2.0,
            self.lon + half,
            self.lat + half / 2.0,
            self.lat,
            self.lon,
        )
    }

    pub fn link_url(&self) -> String {
        format!(
            "https://www.openstreetmap.org/?mlat={:.5}&mlon={:.5}#map={}/{:.5}/{:.5}",
            self.lat, self.lon, self.zoom, self.lat, self.lon
        )
    }

    pub fn render(&self) -> Markup {
        html! {
            figure.map {
                iframe.map-frame src=(self.embed_url()) title=(self.label) loading="lazy"
                    referrerpolicy="no-referrer" tabindex="-1" {}
                figcaption {
                    a href=(self.link_url()) target="_blank" rel="noopener" { (self.label) }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_office_marker_is_valid() {
        let marker = MapMarker::from_config(&MapConfig::default()).unwrap();
        assert!(marker.embed_url().contains("marker=9.03200%2C38.74690"));
    }

    #[test]
    fn rejects_out_of_range_coordinates() {
        assert_eq!(MapMarker::new(91.0, 0.0, 10, "x"), Err(MapError::Latitude(91.0)));
        assert_eq!(MapMarker::new(0.0, -181.0, 10, "x"), Err(MapError::Longitude(-181.0)));
        assert_eq!(MapMarker::new(0.0, 0.0, 0, "x"), Err(MapError::Zoom(0)));
    }

    #[test]
    fn render_is_read_only_embed_with_caption() {
        let marker = MapMarker::new(9.032, 38.7469, 15, "Bole, Addis Ababa").unwrap();
        let html = marker.render().into_string();
        assert!(html.contains("<iframe"));
        assert!(html.contains("tabindex=\"-1\""));
        assert!(html.contains("Bole, Addis Ababa"));
    }
}
