//! Alert-subscription form state and validation, plus the geolocation
//! capability seam.

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use chrono::NaiveDate;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Crop {
    Rice,
    Wheat,
    Maize,
    Cotton,
    Sugarcane,
    Pulses,
    Vegetables,
}

impl Crop {
    pub const ALL: [Crop; 7] = [
        Crop::Rice,
        Crop::Wheat,
        Crop::Maize,
        Crop::Cotton,
        Crop::Sugarcane,
        Crop::Pulses,
        Crop::Vegetables,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Crop::Rice => "rice",
            Crop::Wheat => "wheat",
            Crop::Maize => "maize",
            Crop::Cotton => "cotton",
            Crop::Sugarcane => "sugarcane",
            Crop::Pulses => "pulses",
            Crop::Vegetables => "vegetables",
        }
    }
}

impl fmt::Display for Crop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

/// A completed subscription record, handed to the backend on submission
/// and not retained by the UI.
#[derive(Debug, Clone)]
pub struct Subscription {
    pub crop: Crop,
    pub location: Coordinates,
    pub planting_date: Option<NaiveDate>,
}

/// Single-shot device location capability. Platform-dependent; not
/// guaranteed present.
#[async_trait]
pub trait Locator: Send + Sync {
    async fn locate(&self) -> Result<Coordinates>;
}

/// Stand-in for platforms without a location service.
pub struct UnavailableLocator;

#[async_trait]
impl Locator for UnavailableLocator {
    async fn locate(&self) -> Result<Coordinates> {
        Err(anyhow!("no location service on this platform"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Crop,
    Latitude,
    Longitude,
    PlantingDate,
}

/// Subscription form state. Field values survive a failed submission; only
/// the inline error changes.
pub struct SubscribeForm {
    pub open: bool,
    pub crop_index: usize,
    pub lat: String,
    pub lon: String,
    pub planting_date: String,
    pub error: Option<String>,
    pub locating: bool,
    pub focus: FormField,
}

impl Default for SubscribeForm {
    fn default() -> Self {
        Self {
            open: false,
            crop_index: 0,
            lat: String::new(),
            lon: String::new(),
            planting_date: String::new(),
            error: None,
            locating: false,
            focus: FormField::Crop,
        }
    }
}

impl SubscribeForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open(&mut self) {
        self.open = true;
        self.error = None;
        self.focus = FormField::Crop;
    }

    pub fn close(&mut self) {
        self.open = false;
        self.error = None;
        self.locating = false;
    }

    pub fn crop(&self) -> Crop {
        Crop::ALL[self.crop_index % Crop::ALL.len()]
    }

    pub fn cycle_crop(&mut self, forward: bool) {
        let n = Crop::ALL.len();
        self.crop_index = if forward {
            (self.crop_index + 1) % n
        } else {
            (self.crop_index + n - 1) % n
        };
    }

    pub fn next_field(&mut self) {
        self.focus = match self.focus {
            FormField::Crop => FormField::Latitude,
            FormField::Latitude => FormField::Longitude,
            FormField::Longitude => FormField::PlantingDate,
            FormField::PlantingDate => FormField::Crop,
        };
    }

    /// Mutable access to the text of the focused field, if it is editable.
    pub fn focused_text(&mut self) -> Option<&mut String> {
        match self.focus {
            FormField::Crop => None,
            FormField::Latitude => Some(&mut self.lat),
            FormField::Longitude => Some(&mut self.lon),
            FormField::PlantingDate => Some(&mut self.planting_date),
        }
    }

    /// Validate and build the subscription record.
    ///
    /// Latitude and longitude are required and must be numeric; the
    /// planting date is optional but must parse as YYYY-MM-DD when given.
    /// On failure an inline error is set, no record is produced, and the
    /// field values are left untouched.
    pub fn submit(&mut self) -> Option<Subscription> {
        let lat = self.lat.trim();
        let lon = self.lon.trim();

        if lat.is_empty() || lon.is_empty() {
            self.error = Some("Latitude and Longitude are required.".to_string());
            return None;
        }

        let (Ok(lat), Ok(lon)) = (lat.parse::<f64>(), lon.parse::<f64>()) else {
            self.error = Some("Latitude and Longitude must be numeric.".to_string());
            return None;
        };

        let planting_date = match self.planting_date.trim() {
            "" => None,
            raw => match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
                Ok(date) => Some(date),
                Err(_) => {
                    self.error = Some("Planting date must be YYYY-MM-DD.".to_string());
                    return None;
                }
            },
        };

        self.error = None;
        Some(Subscription {
            crop: self.crop(),
            location: Coordinates { lat, lon },
            planting_date,
        })
    }

    /// Fill coordinates from a completed device-location lookup.
    pub fn location_received(&mut self, coords: Coordinates) {
        self.lat = format!("{:.4}", coords.lat);
        self.lon = format!("{:.4}", coords.lon);
        self.locating = false;
        self.error = None;
    }

    /// Device location was denied or failed; only this affordance degrades.
    pub fn location_failed(&mut self) {
        self.error = Some("Could not get location. Please enter it manually.".to_string());
        self.locating = false;
    }
}
