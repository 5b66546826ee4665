use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub const MIN_SEVERITY: u8 = 1;
pub const MAX_SEVERITY: u8 = 5;

/// Closed set of civic problem categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Accident,
    Graffiti,
    Trash,
    Crime,
    Infrastructure,
    TrafficLight,
    Pothole,
    Flooding,
    FallenTree,
    PowerOutage,
    BrokenStreetlight,
    PublicTransport,
    LostPet,
    BlockedRoad,
    SewageLeak,
    FireHazard,
    AnimalDanger,
    TrashOverflow,
    WaterLeak,
    GasLeak,
    StreetSign,
    ParkingIssue,
    SidewalkDamage,
    BikeLane,
    MinorityVulnerability,
    AlcoholRisk,
    MedicalEmergency,
    Other,
}

/// Presentation and triage attributes derived from a category
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryPolicy {
    pub label: &'static str,
    pub icon: &'static str,
    pub color: &'static str,
    pub severity: u8,
    pub deadline_days: i64,
}

/// Days allowed to address a problem of the given severity
pub fn deadline_days(severity: u8) -> i64 {
    match severity {
        5 => 1,
        4 => 2,
        3 => 4,
        2 => 7,
        _ => 14,
    }
}

impl Category {
    pub const ALL: [Category; 28] = [
        Category::Accident,
        Category::Graffiti,
        Category::Trash,
        Category::Crime,
        Category::Infrastructure,
        Category::TrafficLight,
        Category::Pothole,
        Category::Flooding,
        Category::FallenTree,
        Category::PowerOutage,
        Category::BrokenStreetlight,
        Category::PublicTransport,
        Category::LostPet,
        Category::BlockedRoad,
        Category::SewageLeak,
        Category::FireHazard,
        Category::AnimalDanger,
        Category::TrashOverflow,
        Category::WaterLeak,
        Category::GasLeak,
        Category::StreetSign,
        Category::ParkingIssue,
        Category::SidewalkDamage,
        Category::BikeLane,
        Category::MinorityVulnerability,
        Category::AlcoholRisk,
        Category::MedicalEmergency,
        Category::Other,
    ];

    pub fn policy(self) -> CategoryPolicy {
        let severity = self.severity();
        CategoryPolicy {
            label: self.label(),
            icon: self.icon(),
            color: self.color(),
            severity,
            deadline_days: deadline_days(severity),
        }
    }

    pub fn is_medical_emergency(self) -> bool {
        self == Category::MedicalEmergency
    }

    /// Categories that cannot be reported without a photo
    pub fn requires_photo(self) -> bool {
        self == Category::Trash
    }

    pub fn severity(self) -> u8 {
        match self {
            Category::MedicalEmergency | Category::Accident | Category::FireHazard => 5,
            Category::GasLeak | Category::Flooding | Category::Crime => 4,
            Category::BlockedRoad | Category::PowerOutage | Category::SewageLeak => 3,
            Category::Pothole | Category::BrokenStreetlight | Category::WaterLeak => 2,
            _ => 1,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Category::Accident => "Accident",
            Category::Graffiti => "Graffiti/Vandalism",
            Category::Trash => "Trash",
            Category::Crime => "Crime",
            Category::Infrastructure => "Infrastructure",
            Category::TrafficLight => "Broken Traffic Light",
            Category::Pothole => "Pothole",
            Category::Flooding => "Flooding",
            Category::FallenTree => "Fallen Tree",
            Category::PowerOutage => "Power Outage",
            Category::BrokenStreetlight => "Broken Streetlight",
            Category::PublicTransport => "Public Transport Issue",
            Category::LostPet => "Lost Pet",
            Category::BlockedRoad => "Blocked Road",
            Category::SewageLeak => "Sewage Leak",
            Category::FireHazard => "Fire Hazard",
            Category::AnimalDanger => "Dangerous Animal",
            Category::TrashOverflow => "Trash Overflow",
            Category::WaterLeak => "Water Leak",
            Category::GasLeak => "Gas Leak",
            Category::StreetSign => "Missing Street Sign",
            Category::ParkingIssue => "Parking Issue",
            Category::SidewalkDamage => "Damaged Sidewalk",
            Category::BikeLane => "Bike Lane",
            Category::MinorityVulnerability => "Minority Vulnerability",
            Category::AlcoholRisk => "Alcohol Risk",
            Category::MedicalEmergency => "Medical Emergency",
            Category::Other => "Other",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            Category::Accident => "car.fill",
            Category::Graffiti => "pencil.tip",
            Category::Trash => "trash.fill",
            Category::Crime => "shield.fill",
            Category::Infrastructure => "hammer.fill",
            Category::TrafficLight => "🚦",
            Category::Pothole => "circle.circle",
            Category::Flooding => "drop.fill",
            Category::FallenTree => "tree.fill",
            Category::PowerOutage => "bolt.fill",
            Category::BrokenStreetlight => "lightbulb.fill",
            Category::PublicTransport => "bus.fill",
            Category::LostPet => "pawprint.fill",
            Category::BlockedRoad => "xmark.octagon.fill",
            Category::SewageLeak => "exclamationmark.triangle.fill",
            Category::FireHazard => "flame.fill",
            Category::AnimalDanger => "ant.fill",
            Category::TrashOverflow => "trash.fill",
            Category::WaterLeak => "drop.triangle",
            Category::GasLeak => "wind",
            Category::StreetSign => "signpost.right.fill",
            Category::ParkingIssue => "parkingsign",
            Category::SidewalkDamage => "figure.walk",
            Category::BikeLane => "bicycle",
            Category::MinorityVulnerability => "person.2.slash.fill",
            Category::AlcoholRisk => "drop.fill",
            Category::MedicalEmergency => "cross.case.fill",
            Category::Other => "exclamationmark.triangle.fill",
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            Category::Accident
            | Category::BlockedRoad
            | Category::FireHazard
            | Category::GasLeak
            | Category::MedicalEmergency => "red",
            Category::Graffiti => "pink",
            Category::Trash | Category::Pothole | Category::SewageLeak => "brown",
            Category::Crime | Category::MinorityVulnerability => "purple",
            Category::Infrastructure
            | Category::PublicTransport
            | Category::WaterLeak
            | Category::ParkingIssue => "blue",
            Category::TrafficLight
            | Category::PowerOutage
            | Category::BrokenStreetlight
            | Category::StreetSign => "yellow",
            Category::Flooding => "cyan",
            Category::FallenTree | Category::BikeLane => "green",
            Category::LostPet => "indigo",
            Category::AnimalDanger | Category::AlcoholRisk => "orange",
            Category::TrashOverflow | Category::SidewalkDamage | Category::Other => "gray",
        }
    }

    /// Stable identifier used in URLs and persisted records
    pub fn slug(self) -> &'static str {
        match self {
            Category::Accident => "accident",
            Category::Graffiti => "graffiti",
            Category::Trash => "trash",
            Category::Crime => "crime",
            Category::Infrastructure => "infrastructure",
            Category::TrafficLight => "traffic_light",
            Category::Pothole => "pothole",
            Category::Flooding => "flooding",
            Category::FallenTree => "fallen_tree",
            Category::PowerOutage => "power_outage",
            Category::BrokenStreetlight => "broken_streetlight",
            Category::PublicTransport => "public_transport",
            Category::LostPet => "lost_pet",
            Category::BlockedRoad => "blocked_road",
            Category::SewageLeak => "sewage_leak",
            Category::FireHazard => "fire_hazard",
            Category::AnimalDanger => "animal_danger",
            Category::TrashOverflow => "trash_overflow",
            Category::WaterLeak => "water_leak",
            Category::GasLeak => "gas_leak",
            Category::StreetSign => "street_sign",
            Category::ParkingIssue => "parking_issue",
            Category::SidewalkDamage => "sidewalk_damage",
            Category::BikeLane => "bike_lane",
            Category::MinorityVulnerability => "minority_vulnerability",
            Category::AlcoholRisk => "alcohol_risk",
            Category::MedicalEmergency => "medical_emergency",
            Category::Other => "other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .iter()
            .copied()
            .find(|c| c.slug() == s)
            .ok_or_else(|| format!("Unknown category '{}'", s))
    }
}

/// Human-facing urgency name for a severity value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SeverityLevel {
    Minimal,
    Low,
    Medium,
    Urgent,
    Critical,
}

impl SeverityLevel {
    pub fn from_severity(severity: u8) -> Self {
        match severity {
            5 => SeverityLevel::Critical,
            4 => SeverityLevel::Urgent,
            3 => SeverityLevel::Medium,
            2 => SeverityLevel::Low,
            _ => SeverityLevel::Minimal,
        }
    }
}

impl fmt::Display for SeverityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SeverityLevel::Critical => write!(f, "Critical"),
            SeverityLevel::Urgent => write!(f, "Urgent"),
            SeverityLevel::Medium => write!(f, "Medium"),
            SeverityLevel::Low => write!(f, "Low"),
            SeverityLevel::Minimal => write!(f, "Minimal"),
        }
    }
}
