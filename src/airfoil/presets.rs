use crate::airfoil::generate::{Naca4Digit, NacaMetrics};
use crate::errors::ValidationError;
use crate::geometry::normalize::SurfaceSamples;
use serde::Serialize;

pub const NACA4_FAMILY: &str = "naca4";

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AirfoilPreset {
    pub id: &'static str,
    pub label: &'static str,
    pub family: &'static str,
    pub description: &'static str,
    pub default_alpha: f64,
    pub digits: &'static str,
    pub tags: &'static [&'static str],
}

/// A preset together with the section metrics derived from its code
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PresetSummary {
    #[serde(flatten)]
    pub preset: AirfoilPreset,
    pub metrics: NacaMetrics,
}

pub const PRESET_AIRFOILS: [AirfoilPreset; 11] = [
    AirfoilPreset {
        id: "naca-0012",
        label: "NACA 0012",
        family: NACA4_FAMILY,
        description: "Symmetric baseline airfoil common in wind-tunnel benchmarks.",
        default_alpha: 4.0,
        digits: "0012",
        tags: &["symmetric", "benchmark"],
    },
    AirfoilPreset {
        id: "naca-0018",
        label: "NACA 0018",
        family: NACA4_FAMILY,
        description: "Thick symmetric profile useful for vertical tails and flying wings.",
        default_alpha: 4.0,
        digits: "0018",
        tags: &["symmetric", "thick"],
    },
    AirfoilPreset {
        id: "naca-1408",
        label: "NACA 1408",
        family: NACA4_FAMILY,
        description: "Lightly cambered thin section for sailplanes and low-Reynolds applications.",
        default_alpha: 3.0,
        digits: "1408",
        tags: &["glider", "low-Re"],
    },
    AirfoilPreset {
        id: "naca-2309",
        label: "NACA 2309",
        family: NACA4_FAMILY,
        description: "Classic mild-camber wing section suited for trainers and UAVs.",
        default_alpha: 3.5,
        digits: "2309",
        tags: &["trainer", "balanced"],
    },
    AirfoilPreset {
        id: "naca-2412",
        label: "NACA 2412",
        family: NACA4_FAMILY,
        description: "Popular general aviation airfoil with moderate camber.",
        default_alpha: 4.0,
        digits: "2412",
        tags: &["general-aviation", "cambered"],
    },
    AirfoilPreset {
        id: "naca-3415",
        label: "NACA 3415",
        family: NACA4_FAMILY,
        description: "High-camber wing section prioritizing maximum lift at low speeds.",
        default_alpha: 2.5,
        digits: "3415",
        tags: &["short-takeoff", "high-lift"],
    },
    AirfoilPreset {
        id: "naca-4412",
        label: "NACA 4412",
        family: NACA4_FAMILY,
        description: "High-camber airfoil suited for low-speed lift-focused designs.",
        default_alpha: 2.0,
        digits: "4412",
        tags: &["high-lift", "trainer"],
    },
    AirfoilPreset {
        id: "naca-4415",
        label: "NACA 4415",
        family: NACA4_FAMILY,
        description: "Thicker variant of the 4412 offering extra structural depth.",
        default_alpha: 2.0,
        digits: "4415",
        tags: &["high-lift", "thick"],
    },
    AirfoilPreset {
        id: "naca-6312",
        label: "NACA 6312",
        family: NACA4_FAMILY,
        description: "Laminar-friendly section with camber pushed forward for smoother flow.",
        default_alpha: 1.5,
        digits: "6312",
        tags: &["laminar", "forward-camber"],
    },
    AirfoilPreset {
        id: "naca-6409",
        label: "NACA 6409",
        family: NACA4_FAMILY,
        description: "Laminar-flow oriented section with forward camber.",
        default_alpha: 0.0,
        digits: "6409",
        tags: &["laminar", "forward-camber"],
    },
    AirfoilPreset {
        id: "naca-9306",
        label: "NACA 9306",
        family: NACA4_FAMILY,
        description: "Extreme camber concept showcasing aggressive low-speed performance.",
        default_alpha: 0.0,
        digits: "9306",
        tags: &["concept", "experimental"],
    },
];

impl AirfoilPreset {
    pub fn generator(&self, chord_len: f64) -> Result<Naca4Digit, ValidationError> {
        Naca4Digit::from_code(self.digits, chord_len)
    }

    /// Sampled surfaces of the preset at the given chord
    pub fn generate(&self, chord_len: f64, n_points: usize) -> Result<SurfaceSamples, ValidationError> {
        self.generator(chord_len)?.surfaces(n_points)
    }

    pub fn summary(&self) -> Result<PresetSummary, ValidationError> {
        Ok(PresetSummary {
            preset: *self,
            metrics: self.generator(1.0)?.metrics(),
        })
    }
}

/// Summaries of every preset in catalog order
pub fn list_presets() -> Result<Vec<PresetSummary>, ValidationError> {
    PRESET_AIRFOILS.iter().map(|p| p.summary()).collect()
}

pub fn get_preset(id: &str) -> Result<&'static AirfoilPreset, ValidationError> {
    PRESET_AIRFOILS
        .iter()
        .find(|p| p.id == id)
        .ok_or_else(|| ValidationError::UnknownPreset(id.to_string()))
}
